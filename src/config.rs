/// Knobs for [`crate::run`]. The timers always tick at 60 Hz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Instruction throughput. Roughly what a COSMAC VIP managed by default.
    pub instructions_per_second: u32,

    /// Seed for `CXKK`. `None` seeds from the OS.
    pub seed: Option<u64>,

    /// Stop the run loop when the program jumps to itself forever.
    pub exit_on_halt: bool,
}

impl Config {
    pub const DEFAULT_IPS: u32 = 700;
}

impl Default for Config {
    fn default() -> Self {
        Self {
            instructions_per_second: Self::DEFAULT_IPS,
            seed: None,
            exit_on_halt: false,
        }
    }
}
