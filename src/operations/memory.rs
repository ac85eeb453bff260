//! Index-register and bulk-memory instructions. All RAM access here goes
//! through the bounds-checked accessors; memory never wraps.

use super::{addr, vx, Operation, OperationParser};
use crate::error::Chip8Error;
use crate::system::VirtualMachine;
use std::fmt;

/// ANNN - load the index register
pub struct LoadIndexParser;

impl OperationParser for LoadIndexParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode >> 12 == 0xA
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(LoadIndexOp { address: addr(opcode) })
    }
}

pub struct LoadIndexOp {
    address: u16,
}

impl fmt::Display for LoadIndexOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "I = {:X}", self.address)
    }
}

impl Operation for LoadIndexOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        vm.index_register = self.address;
        Ok(())
    }
}

/// FX1E - add VX to the index register
pub struct AddIndexParser;

impl OperationParser for AddIndexParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode & 0xF0FF == 0xF01E
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(AddIndexOp { register: vx(opcode) })
    }
}

pub struct AddIndexOp {
    register: u8,
}

impl fmt::Display for AddIndexOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "I += V{:X}", self.register)
    }
}

impl Operation for AddIndexOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        vm.index_register = vm
            .index_register
            .wrapping_add(u16::from(vm.registers[self.register as usize]));
        Ok(())
    }
}

/// FX29 - point the index register at the font sprite for the digit in VX
pub struct LoadFontParser;

impl OperationParser for LoadFontParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode & 0xF0FF == 0xF029
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(LoadFontOp { register: vx(opcode) })
    }
}

pub struct LoadFontOp {
    register: u8,
}

impl fmt::Display for LoadFontOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "I = font(V{:X})", self.register)
    }
}

impl Operation for LoadFontOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        // only the low nibble selects a glyph
        let digit = vm.registers[self.register as usize] & 0x0F;
        vm.index_register = VirtualMachine::font_address(digit);
        Ok(())
    }
}

/// FX33 - write the binary-coded decimal of VX to memory at I
pub struct StoreBcdParser;

impl OperationParser for StoreBcdParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode & 0xF0FF == 0xF033
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(StoreBcdOp { register: vx(opcode) })
    }
}

pub struct StoreBcdOp {
    register: u8,
}

impl fmt::Display for StoreBcdOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BCD(V{:X}) -> I", self.register)
    }
}

impl Operation for StoreBcdOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        let value = vm.registers[self.register as usize];
        let base = usize::from(vm.index_register);
        vm.write_byte(base, value / 100)?;
        vm.write_byte(base + 1, value / 10 % 10)?;
        vm.write_byte(base + 2, value % 10)?;
        Ok(())
    }
}

/// FX55 - dump V0..=VX to memory at I
pub struct DumpRegistersParser;

impl OperationParser for DumpRegistersParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode & 0xF0FF == 0xF055
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(DumpRegistersOp { register: vx(opcode) })
    }
}

pub struct DumpRegistersOp {
    register: u8,
}

impl fmt::Display for DumpRegistersOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dump V0-V{:X} -> I", self.register)
    }
}

impl Operation for DumpRegistersOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        let base = usize::from(vm.index_register);
        for offset in 0..=usize::from(self.register) {
            vm.write_byte(base + offset, vm.registers[offset])?;
        }
        Ok(())
    }
}

/// FX65 - fill V0..=VX from memory at I
pub struct FillRegistersParser;

impl OperationParser for FillRegistersParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode & 0xF0FF == 0xF065
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(FillRegistersOp { register: vx(opcode) })
    }
}

pub struct FillRegistersOp {
    register: u8,
}

impl fmt::Display for FillRegistersOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fill V0-V{:X} <- I", self.register)
    }
}

impl Operation for FillRegistersOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        let base = usize::from(vm.index_register);
        for offset in 0..=usize::from(self.register) {
            vm.registers[offset] = vm.read_byte(base + offset)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_index() {
        let mut vm = VirtualMachine::new();
        let op = LoadIndexParser.create_op(0xA123);
        assert_eq!(op.to_string(), "I = 123");
        op.execute(&mut vm).unwrap();
        assert_eq!(vm.index_register, 0x123);
    }

    #[test]
    fn test_add_index() {
        let mut vm = VirtualMachine::new();
        vm.index_register = 0x100;
        vm.registers[0x4] = 0x22;
        AddIndexParser.create_op(0xF41E).execute(&mut vm).unwrap();
        assert_eq!(vm.index_register, 0x122);
    }

    #[test]
    fn test_load_font() {
        let mut vm = VirtualMachine::new();
        vm.registers[0x2] = 0x06;
        let op = LoadFontParser.create_op(0xF229);
        assert_eq!(op.to_string(), "I = font(V2)");
        op.execute(&mut vm).unwrap();
        assert_eq!(vm.index_register, 0x1E);

        // high nibble of the register is ignored
        vm.registers[0x2] = 0xA6;
        op.execute(&mut vm).unwrap();
        assert_eq!(vm.index_register, 0x1E);
    }

    #[test]
    fn test_store_bcd() {
        let mut vm = VirtualMachine::new();
        vm.registers[0x5] = 193;
        vm.index_register = 0x300;
        StoreBcdParser.create_op(0xF533).execute(&mut vm).unwrap();
        assert_eq!(vm.memory[0x300..0x303], [1, 9, 3]);
    }

    #[test]
    fn test_store_bcd_out_of_bounds() {
        let mut vm = VirtualMachine::new();
        vm.registers[0x5] = 7;
        vm.index_register = 0x0FFE;
        assert!(matches!(
            StoreBcdParser.create_op(0xF533).execute(&mut vm),
            Err(Chip8Error::MemoryOutOfBounds { address: 0x1000 })
        ));
    }

    #[test]
    fn test_dump_then_fill_registers() {
        let mut vm = VirtualMachine::new();
        vm.index_register = 0x400;
        for i in 0..4 {
            vm.registers[i] = (i as u8 + 1) * 0x11;
        }
        DumpRegistersParser.create_op(0xF355).execute(&mut vm).unwrap();
        assert_eq!(vm.memory[0x400..0x404], [0x11, 0x22, 0x33, 0x44]);
        // V4 is past X, left alone
        assert_eq!(vm.memory[0x404], 0);

        vm.registers = [0; 16];
        FillRegistersParser.create_op(0xF365).execute(&mut vm).unwrap();
        assert_eq!(vm.registers[..4], [0x11, 0x22, 0x33, 0x44]);
        assert_eq!(vm.registers[4], 0);
    }

    #[test]
    fn test_fill_registers_out_of_bounds() {
        let mut vm = VirtualMachine::new();
        vm.index_register = 0x0FFF;
        assert!(matches!(
            FillRegistersParser.create_op(0xF165).execute(&mut vm),
            Err(Chip8Error::MemoryOutOfBounds { address: 0x1000 })
        ));
    }
}
