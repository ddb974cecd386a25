use crate::error::Chip8Error;
use beep::beep;

/// the one tone CHIP-8 can make; on while the sound timer is non-zero
pub trait Sound {
    fn start(&mut self) -> Result<(), Chip8Error>;
    fn stop(&mut self) -> Result<(), Chip8Error>;
    fn is_active(&self) -> bool;

    /// start or stop as needed; only transitions reach the device
    fn set_active(&mut self, on: bool) -> Result<(), Chip8Error> {
        match (on, self.is_active()) {
            (true, false) => self.start(),
            (false, true) => self.stop(),
            _ => Ok(()),
        }
    }
}

const SIMPLEBEEP_PITCH: u16 = 2093; // C

/// PC speaker tone
pub struct SimpleBeep {
    is_beeping: bool,
}

impl SimpleBeep {
    pub fn new() -> Self {
        SimpleBeep { is_beeping: false }
    }
}

impl Sound for SimpleBeep {
    fn start(&mut self) -> Result<(), Chip8Error> {
        beep(SIMPLEBEEP_PITCH).map_err(|e| Chip8Error::Sound(e.to_string()))?;
        self.is_beeping = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Chip8Error> {
        beep(0).map_err(|e| Chip8Error::Sound(e.to_string()))?;
        self.is_beeping = false;
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.is_beeping
    }
}

/// silent; still tracks whether it would be beeping
#[derive(Default)]
pub struct Mute {
    active: bool,
    pub starts: usize,
}

impl Mute {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sound for Mute {
    fn start(&mut self) -> Result<(), Chip8Error> {
        self.active = true;
        self.starts += 1;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Chip8Error> {
        self.active = false;
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
