use beep::beep;
use crate::error::Chip8Error;

/// a single square-wave tone, driven by the machine's sound timer
pub trait Sound {
    fn start(&mut self) -> Result<(), Chip8Error>;
    fn stop(&mut self) -> Result<(), Chip8Error>;
}

const SIMPLEBEEP_PITCH: u16 = 2093; // C

pub struct SimpleBeep {
    is_beeping: bool,
}

impl SimpleBeep {
    pub fn new() -> Self {
        SimpleBeep { is_beeping: false }
    }
}

impl Default for SimpleBeep {
    fn default() -> Self {
        Self::new()
    }
}

impl Sound for SimpleBeep {
    fn start(&mut self) -> Result<(), Chip8Error> {
        if !self.is_beeping {
            beep(SIMPLEBEEP_PITCH)
                .map_err(|e| Chip8Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string())))?;
            self.is_beeping = true;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Chip8Error> {
        if self.is_beeping {
            beep(0)
                .map_err(|e| Chip8Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string())))?;
            self.is_beeping = false;
        }
        Ok(())
    }
}

pub struct Mute;

impl Mute {
    pub fn new() -> Self {
        Mute
    }
}

impl Default for Mute {
    fn default() -> Self {
        Self::new()
    }
}

impl Sound for Mute {
    fn start(&mut self) -> Result<(), Chip8Error> {
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Chip8Error> {
        Ok(())
    }
}
