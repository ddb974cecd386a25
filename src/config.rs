use crate::error::Chip8Error;
use crate::framebuffer::DrawPolicy;
use clap::Parser;
use std::path::PathBuf;

/// instruction rate used when nothing else is asked for
pub const DEFAULT_CLOCK_HZ: u32 = 700;
pub const MAX_CLOCK_HZ: u32 = 5_000;
pub const MAX_SCALE: u16 = 8;

/// run-time configuration; none of this is part of the machine itself
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "chip8vm", version, about = "CHIP-8 interpreter for the terminal")]
pub struct Config {
    /// raw CHIP-8 program, loaded verbatim at 0x200
    pub rom: PathBuf,

    /// terminal cells per CHIP-8 pixel, in each direction
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..=MAX_SCALE as i64))]
    pub scale: u16,

    /// instructions executed per second
    #[arg(long, default_value_t = DEFAULT_CLOCK_HZ, value_parser = clap::value_parser!(u32).range(1..=MAX_CLOCK_HZ as i64))]
    pub clock_hz: u32,

    /// what to do with sprite pixels that land off the screen
    #[arg(long, value_enum, default_value_t = DrawPolicy::Wrap)]
    pub draw_policy: DrawPolicy,

    /// never touch the speaker
    #[arg(long)]
    pub mute: bool,

    /// seed for the random-AND instruction
    #[arg(long)]
    pub seed: Option<u64>,

    /// halt after this many instructions
    #[arg(long)]
    pub cycle_limit: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rom: PathBuf::new(),
            scale: 1,
            clock_hz: DEFAULT_CLOCK_HZ,
            draw_policy: DrawPolicy::Wrap,
            mute: false,
            seed: None,
            cycle_limit: None,
        }
    }
}

impl Config {
    /// clap already range-checks the command line, but a `Config` can also be
    /// built by hand
    pub fn validate(&self) -> Result<(), Chip8Error> {
        if self.scale == 0 || self.scale > MAX_SCALE {
            return Err(Chip8Error::Config(format!(
                "scale must be 1..={}, got {}",
                MAX_SCALE, self.scale
            )));
        }
        if self.clock_hz == 0 || self.clock_hz > MAX_CLOCK_HZ {
            return Err(Chip8Error::Config(format!(
                "clock must be 1..={} Hz, got {}",
                MAX_CLOCK_HZ, self.clock_hz
            )));
        }
        Ok(())
    }
}
