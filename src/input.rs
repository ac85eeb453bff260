use crossterm::event::{poll, read, Event, KeyCode};
use crossterm::terminal;
use std::collections::HashMap;
use std::io;
use std::time::Duration;

/// hex keypad mapped onto the left-hand side of a qwerty keyboard
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('z', 0x0a),
    ('c', 0x0b),
    ('4', 0x0c),
    ('r', 0x0d),
    ('f', 0x0e),
    ('v', 0x0f),
];

/// Reads keypresses for the interpreter to fold into the machine's keyboard
/// map between cycles.
pub trait Input {
    /// get all the mapped keys pressed since the last flush, without
    /// removing them from the buffer
    fn peek_keys(&mut self) -> Result<&[u8], io::Error>;

    /// flush all the keypresses from the buffer
    fn flush_keys(&mut self) -> Result<(), io::Error>;
}

/// simple implementation of Input, using STDIN via crossterm
pub struct StdinInput {
    buffer: Vec<u8>,
    keymap: HashMap<char, u8>,
}

impl StdinInput {
    pub fn new() -> Self {
        terminal::enable_raw_mode().unwrap();
        StdinInput {
            buffer: Vec::new(),
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
        }
    }

    fn read_stdin(&mut self) -> Result<(), io::Error> {
        while poll(Duration::from_millis(0))? {
            match read()? {
                Event::Key(evt) => match evt.code {
                    KeyCode::Char(key) => match self.keymap.get(&key) {
                        Some(mapped_key) => self.buffer.push(*mapped_key),
                        None => {
                            log::warn!("can't map {:?} to a CHIP-8 key", key);
                        }
                    },
                    KeyCode::Esc => {
                        let _ = terminal::disable_raw_mode();
                        std::process::exit(0);
                    }
                    _ => {
                        log::warn!("unknown key event received");
                    }
                },
                _ => {
                    log::warn!("unknown event received");
                }
            }
        }
        Ok(())
    }
}

impl Default for StdinInput {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for StdinInput {
    fn drop(&mut self) {
        terminal::disable_raw_mode().unwrap();
    }
}

impl Input for StdinInput {
    fn peek_keys(&mut self) -> Result<&[u8], io::Error> {
        self.read_stdin()?;
        Ok(self.buffer.as_slice())
    }

    fn flush_keys(&mut self) -> Result<(), io::Error> {
        self.read_stdin()?;
        self.buffer.clear();
        Ok(())
    }
}

/// dummy Input implementation for testing
pub struct DummyInput {
    bytes: Vec<u8>,
}

impl DummyInput {
    pub fn new(keys: &[u8]) -> Self {
        DummyInput {
            bytes: Vec::from(keys),
        }
    }
}

impl Input for DummyInput {
    fn peek_keys(&mut self) -> Result<&[u8], io::Error> {
        Ok(self.bytes.as_slice())
    }

    fn flush_keys(&mut self) -> Result<(), io::Error> {
        self.bytes.clear();
        Ok(())
    }
}
