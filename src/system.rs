use crate::error::Chip8Error;
use std::io;
use std::io::Read;

/// how much RAM we have
pub const MEMORY_SIZE_BYTES: usize = 4096;

/// where programs are loaded
pub const PROGRAM_ADDR: u16 = 0x0200;

/// display geometry; one u64 per row, bit 63 is column 0
pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// font sprites live at the bottom of RAM, five bytes per hex digit
const FONT_ADDR: u16 = 0x0000;
const FONT_HEIGHT: u16 = 5;
const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// The whole of the machine the instructions run against: registers, RAM,
/// the packed monochrome framebuffer, keypad state and timers. Pure data;
/// all behaviour lives in the operations that mutate it.
///
/// Fields are public because the surrounding layers poke at them directly:
/// the loader writes program bytes into `memory`, the input layer sets
/// `keyboard` flags, the renderer reads `pixels`.
pub struct VirtualMachine {
    /// V0-VF; VF is overwritten as a flag by carry/borrow/collision ops
    pub registers: [u8; 16],
    /// the I register, used for memory-relative addressing
    pub index_register: u16,
    pub program_counter: u16,
    pub memory: [u8; MEMORY_SIZE_BYTES],
    /// one u64 per display row; bit `63 - x` is the pixel at column `x`,
    /// so a sprite row is a single word-level XOR
    pub pixels: [u64; DISPLAY_HEIGHT],
    /// pressed-state of the sixteen hex keys
    pub keyboard: [bool; 16],
    pub stack: [u16; 16],
    pub stack_pointer: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    /// cleared by the key-wait instruction when no key is down; the fetch
    /// loop stops advancing until input wakes the machine again
    pub running: bool,
}

impl VirtualMachine {
    /// power-on state: everything zeroed except the font sprites and the
    /// conventional program origin
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE_BYTES];
        let font_base = FONT_ADDR as usize;
        memory[font_base..font_base + CHIP8_FONT.len()].copy_from_slice(&CHIP8_FONT);

        VirtualMachine {
            registers: [0; 16],
            index_register: 0,
            program_counter: PROGRAM_ADDR,
            memory,
            pixels: [0; DISPLAY_HEIGHT],
            keyboard: [false; 16],
            stack: [0; 16],
            stack_pointer: 0,
            delay_timer: 0,
            sound_timer: 0,
            running: true,
        }
    }

    /// bounds-checked RAM read; memory addressing has no wraparound
    pub fn read_byte(&self, address: usize) -> Result<u8, Chip8Error> {
        self.memory
            .get(address)
            .copied()
            .ok_or(Chip8Error::MemoryOutOfBounds { address })
    }

    /// bounds-checked RAM write
    pub fn write_byte(&mut self, address: usize, value: u8) -> Result<(), Chip8Error> {
        match self.memory.get_mut(address) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Chip8Error::MemoryOutOfBounds { address }),
        }
    }

    /// the two-byte big-endian word at `address`, as fetched each cycle
    pub fn read_word(&self, address: usize) -> Result<u16, Chip8Error> {
        let hi = self.read_byte(address)?;
        let lo = self.read_byte(address + 1)?;
        Ok(u16::from(hi) << 8 | u16::from(lo))
    }

    /// where the font sprite for hex digit `digit` starts
    pub fn font_address(digit: u8) -> u16 {
        FONT_ADDR + FONT_HEIGHT * u16::from(digit)
    }

    /// load a CHIP-8 program at 0x200
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<(), Chip8Error> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        let start = PROGRAM_ADDR as usize;
        let end = start + buf.len();
        if end > MEMORY_SIZE_BYTES {
            return Err(Chip8Error::MemoryOutOfBounds { address: end - 1 });
        }
        self.memory[start..end].copy_from_slice(&buf);
        Ok(())
    }
}

impl Default for VirtualMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_zeroed_past_font() {
        let vm = VirtualMachine::new();
        assert_eq!(vm.memory[80..], [0; MEMORY_SIZE_BYTES - 80]);
    }

    #[test]
    fn test_font_seeded() {
        let vm = VirtualMachine::new();
        // the '0' glyph
        assert_eq!(vm.memory[..5], [0xF0, 0x90, 0x90, 0x90, 0xF0]);
        // the 'F' glyph
        assert_eq!(vm.memory[75..80], [0xF0, 0x80, 0xF0, 0x80, 0x80]);
    }

    #[test]
    fn test_power_on_state() {
        let vm = VirtualMachine::new();
        assert_eq!(vm.program_counter, 0x200);
        assert_eq!(vm.pixels, [0; 32]);
        assert_eq!(vm.keyboard, [false; 16]);
        assert!(vm.running);
    }

    #[test]
    fn test_font_address() {
        assert_eq!(VirtualMachine::font_address(0x0), 0x00);
        assert_eq!(VirtualMachine::font_address(0x6), 0x1E);
        assert_eq!(VirtualMachine::font_address(0xF), 0x4B);
    }

    #[test]
    fn test_read_byte_out_of_bounds() {
        let vm = VirtualMachine::new();
        assert!(matches!(
            vm.read_byte(4096),
            Err(Chip8Error::MemoryOutOfBounds { address: 4096 })
        ));
    }

    #[test]
    fn test_write_byte_roundtrip() {
        let mut vm = VirtualMachine::new();
        vm.write_byte(0x300, 0xAB).unwrap();
        assert_eq!(vm.read_byte(0x300).unwrap(), 0xAB);
    }

    #[test]
    fn test_read_word() {
        let mut vm = VirtualMachine::new();
        vm.write_byte(0x200, 0xD8).unwrap();
        vm.write_byte(0x201, 0xD4).unwrap();
        assert_eq!(vm.read_word(0x200).unwrap(), 0xD8D4);
    }

    #[test]
    fn test_program_load_ok() {
        let mut vm = VirtualMachine::new();
        let mut prog: &[u8] = &[0x00, 0xe0]; // clear screen
        vm.load_program(&mut prog).unwrap();
        assert_eq!(vm.memory[0x200..0x202], [0x00, 0xe0]);
    }

    #[test]
    fn test_program_load_too_big() {
        let mut vm = VirtualMachine::new();
        let mut prog: &[u8] = &[0u8; 4096];
        assert!(matches!(
            vm.load_program(&mut prog),
            Err(Chip8Error::MemoryOutOfBounds { .. })
        ));
    }
}
