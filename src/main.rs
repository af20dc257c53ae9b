use anyhow::{Context, Result};
use chip8_vm::{Chip8, Config, Exit, TerminalIo};
use clap::Parser;
use log::info;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Run a CHIP-8 ROM in the terminal.
///
/// Keys: 1234 / QWER / ASDF / ZXCV. Esc or Ctrl+C quits.
///
/// Logging is controlled by `RUST_LOG`. Without `--log` it goes to stderr,
/// which shares the terminal with the display; redirect it (`2>chip8.log`).
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the ROM file to run.
    rom: PathBuf,

    /// Instructions executed per second.
    #[arg(long, default_value_t = Config::DEFAULT_IPS)]
    ips: u32,

    /// Seed for the random number instruction.
    #[arg(long)]
    seed: Option<u64>,

    /// Exit when the program ends in a jump to itself.
    #[arg(long)]
    exit_on_halt: bool,

    /// Write log records to this file instead of stderr.
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Self {
            instructions_per_second: args.ips,
            seed: args.seed,
            exit_on_halt: args.exit_on_halt,
        }
    }
}

/// Where log records go: the given file (truncated), or stderr.
fn log_target(path: Option<&Path>) -> Result<env_logger::Target> {
    let Some(path) = path else {
        return Ok(env_logger::Target::Stderr);
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    Ok(env_logger::Target::Pipe(Box::new(file)))
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .target(log_target(args.log.as_deref())?)
        .init();

    let config = Config::from(&args);

    let rom = chip8_vm::read_rom(&args.rom)?;
    info!("read {} byte ROM from {}", rom.len(), args.rom.display());

    let mut chip8 = match config.seed {
        Some(seed) => Chip8::with_seed(seed),
        None => Chip8::new(),
    };
    chip8.load_program(&rom)?;

    // Scoped so the terminal is restored before any error gets printed.
    let exit = {
        let mut io = TerminalIo::setup()?;
        chip8_vm::run(&mut chip8, &mut io, &config)?
    };

    match exit {
        Exit::Quit => info!("quit"),
        Exit::Halted => info!("halted at 0x{:03x}", chip8.pc()),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_is_created_for_the_target() {
        let name = format!("chip8-vm-log-{}.log", std::process::id());
        let path = std::env::temp_dir().join(name);
        let target = log_target(Some(&path)).unwrap();
        assert!(matches!(target, env_logger::Target::Pipe(_)));
        assert!(path.exists());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn log_defaults_to_stderr() {
        assert!(matches!(log_target(None).unwrap(), env_logger::Target::Stderr));
    }

    #[test]
    fn unwritable_log_path_is_an_error() {
        let path = Path::new("/definitely/not/here/chip8.log");
        let err = log_target(Some(path)).err().unwrap();
        assert!(err.to_string().contains("chip8.log"));
    }

    #[test]
    fn log_flag_is_parsed() {
        let args = Args::try_parse_from(["chip8-vm", "rom.ch8", "--log", "out.log"]).unwrap();
        assert_eq!(args.log.as_deref(), Some(Path::new("out.log")));
    }
}
