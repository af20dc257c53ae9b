use std::time::Duration;

/// The delay and sound timers. Both count down at 60 Hz of wall-clock time,
/// however fast instructions are being executed.
#[derive(Debug, Clone, Default)]
pub struct Timers {
    delay: u8,
    sound: u8,
    /// Elapsed time not yet turned into a tick.
    pending: Duration,
}

impl Timers {
    /// 60 Hz.
    pub const TICK: Duration = Duration::from_nanos(10_u64.pow(9) / 60);

    pub fn new() -> Self {
        Self::default()
    }

    /// Account for `elapsed` wall-clock time, ticking once per whole
    /// [`Timers::TICK`]. Returns the number of ticks performed.
    ///
    /// We may end up doing multiple ticks in one call, e.g. if the host
    /// stalled for a while.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.pending += elapsed;

        let mut ticks = 0;
        while self.pending >= Self::TICK {
            self.pending -= Self::TICK;
            self.delay = self.delay.saturating_sub(1);
            self.sound = self.sound.saturating_sub(1);
            ticks += 1;
        }
        ticks
    }

    pub fn delay(&self) -> u8 {
        self.delay
    }

    pub fn set_delay(&mut self, value: u8) {
        self.delay = value;
    }

    pub fn sound(&self) -> u8 {
        self.sound
    }

    pub fn set_sound(&mut self, value: u8) {
        self.sound = value;
    }

    /// Whether the host should be beeping right now.
    pub fn sound_active(&self) -> bool {
        self.sound > 0
    }
}
