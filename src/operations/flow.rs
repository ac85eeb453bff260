//! Control-flow instructions: subroutines, jumps and conditional skips.
//!
//! The fetch loop has already advanced the program counter past the current
//! instruction by the time `execute` runs, so a call pushes the address of
//! the *next* instruction, a return pops it straight back into the PC, and
//! a skip just adds another two bytes.

use super::{addr, byte_arg, vx, vy, Operation, OperationParser};
use crate::error::Chip8Error;
use crate::system::VirtualMachine;
use std::fmt;

/// 00EE - return from subroutine
pub struct ReturnParser;

impl OperationParser for ReturnParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode == 0x00EE
    }

    fn create_op(&self, _opcode: u16) -> Box<dyn Operation> {
        Box::new(ReturnOp)
    }
}

pub struct ReturnOp;

impl fmt::Display for ReturnOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Return")
    }
}

impl Operation for ReturnOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        if vm.stack_pointer == 0 {
            return Err(Chip8Error::StackUnderflow);
        }
        vm.stack_pointer -= 1;
        vm.program_counter = vm.stack[vm.stack_pointer as usize];
        Ok(())
    }
}

/// 1NNN - jump to address
pub struct JumpParser;

impl OperationParser for JumpParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode >> 12 == 0x1
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(JumpOp { address: addr(opcode) })
    }
}

pub struct JumpOp {
    address: u16,
}

impl fmt::Display for JumpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Jump to {:X}", self.address)
    }
}

impl Operation for JumpOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        vm.program_counter = self.address;
        Ok(())
    }
}

/// 2NNN - call subroutine
pub struct CallParser;

impl OperationParser for CallParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode >> 12 == 0x2
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(CallOp { address: addr(opcode) })
    }
}

pub struct CallOp {
    address: u16,
}

impl fmt::Display for CallOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Call {:X}", self.address)
    }
}

impl Operation for CallOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        if usize::from(vm.stack_pointer) >= vm.stack.len() {
            return Err(Chip8Error::StackOverflow);
        }
        vm.stack[vm.stack_pointer as usize] = vm.program_counter;
        vm.stack_pointer += 1;
        vm.program_counter = self.address;
        Ok(())
    }
}

/// BNNN - jump to address plus V0
pub struct JumpOffsetParser;

impl OperationParser for JumpOffsetParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode >> 12 == 0xB
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(JumpOffsetOp { address: addr(opcode) })
    }
}

pub struct JumpOffsetOp {
    address: u16,
}

impl fmt::Display for JumpOffsetOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Jump to {:X} + V0", self.address)
    }
}

impl Operation for JumpOffsetOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        vm.program_counter = self.address + u16::from(vm.registers[0x0]);
        Ok(())
    }
}

/// 3XNN - skip next instruction if VX == NN
pub struct SkipEqualByteParser;

impl OperationParser for SkipEqualByteParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode >> 12 == 0x3
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(SkipEqualByteOp {
            register: vx(opcode),
            value: byte_arg(opcode),
        })
    }
}

pub struct SkipEqualByteOp {
    register: u8,
    value: u8,
}

impl fmt::Display for SkipEqualByteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Skip if V{:X} == {:X}", self.register, self.value)
    }
}

impl Operation for SkipEqualByteOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        if vm.registers[self.register as usize] == self.value {
            vm.program_counter += 2;
        }
        Ok(())
    }
}

/// 4XNN - skip next instruction if VX != NN
pub struct SkipNotEqualByteParser;

impl OperationParser for SkipNotEqualByteParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode >> 12 == 0x4
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(SkipNotEqualByteOp {
            register: vx(opcode),
            value: byte_arg(opcode),
        })
    }
}

pub struct SkipNotEqualByteOp {
    register: u8,
    value: u8,
}

impl fmt::Display for SkipNotEqualByteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Skip if V{:X} != {:X}", self.register, self.value)
    }
}

impl Operation for SkipNotEqualByteOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        if vm.registers[self.register as usize] != self.value {
            vm.program_counter += 2;
        }
        Ok(())
    }
}

/// 5XY0 - skip next instruction if VX == VY
pub struct SkipEqualRegisterParser;

impl OperationParser for SkipEqualRegisterParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode & 0xF00F == 0x5000
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(SkipEqualRegisterOp {
            x_register: vx(opcode),
            y_register: vy(opcode),
        })
    }
}

pub struct SkipEqualRegisterOp {
    x_register: u8,
    y_register: u8,
}

impl fmt::Display for SkipEqualRegisterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Skip if V{:X} == V{:X}", self.x_register, self.y_register)
    }
}

impl Operation for SkipEqualRegisterOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        if vm.registers[self.x_register as usize] == vm.registers[self.y_register as usize] {
            vm.program_counter += 2;
        }
        Ok(())
    }
}

/// 9XY0 - skip next instruction if VX != VY
pub struct SkipNotEqualRegisterParser;

impl OperationParser for SkipNotEqualRegisterParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode & 0xF00F == 0x9000
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(SkipNotEqualRegisterOp {
            x_register: vx(opcode),
            y_register: vy(opcode),
        })
    }
}

pub struct SkipNotEqualRegisterOp {
    x_register: u8,
    y_register: u8,
}

impl fmt::Display for SkipNotEqualRegisterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Skip if V{:X} != V{:X}", self.x_register, self.y_register)
    }
}

impl Operation for SkipNotEqualRegisterOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        if vm.registers[self.x_register as usize] != vm.registers[self.y_register as usize] {
            vm.program_counter += 2;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump() {
        let parser = JumpParser;
        assert!(parser.matches(0x1FED));
        assert!(!parser.matches(0x2FED));

        let op = parser.create_op(0x1FED);
        assert_eq!(op.to_string(), "Jump to FED");

        let mut vm = VirtualMachine::new();
        op.execute(&mut vm).unwrap();
        assert_eq!(vm.program_counter, 0xFED);
    }

    #[test]
    fn test_call_then_return() {
        let mut vm = VirtualMachine::new();
        vm.program_counter = 0x202; // as if the loop already moved past a call at 0x200

        CallParser.create_op(0x2400).execute(&mut vm).unwrap();
        assert_eq!(vm.program_counter, 0x400);
        assert_eq!(vm.stack_pointer, 1);
        assert_eq!(vm.stack[0], 0x202);

        ReturnParser.create_op(0x00EE).execute(&mut vm).unwrap();
        assert_eq!(vm.program_counter, 0x202);
        assert_eq!(vm.stack_pointer, 0);
    }

    #[test]
    fn test_return_with_empty_stack() {
        let mut vm = VirtualMachine::new();
        assert!(matches!(
            ReturnOp.execute(&mut vm),
            Err(Chip8Error::StackUnderflow)
        ));
    }

    #[test]
    fn test_call_overflows_stack() {
        let mut vm = VirtualMachine::new();
        vm.stack_pointer = 16;
        assert!(matches!(
            CallOp { address: 0x400 }.execute(&mut vm),
            Err(Chip8Error::StackOverflow)
        ));
    }

    #[test]
    fn test_jump_offset() {
        let mut vm = VirtualMachine::new();
        vm.registers[0x0] = 0x10;
        let op = JumpOffsetParser.create_op(0xB300);
        assert_eq!(op.to_string(), "Jump to 300 + V0");
        op.execute(&mut vm).unwrap();
        assert_eq!(vm.program_counter, 0x310);
    }

    #[test]
    fn test_skip_equal_byte() {
        let mut vm = VirtualMachine::new();
        vm.registers[0x4] = 0xAB;
        let op = SkipEqualByteParser.create_op(0x34AB);
        assert_eq!(op.to_string(), "Skip if V4 == AB");

        op.execute(&mut vm).unwrap();
        assert_eq!(vm.program_counter, 0x202);

        vm.registers[0x4] = 0x00;
        op.execute(&mut vm).unwrap();
        assert_eq!(vm.program_counter, 0x202);
    }

    #[test]
    fn test_skip_not_equal_byte() {
        let mut vm = VirtualMachine::new();
        vm.registers[0x4] = 0xAB;
        let op = SkipNotEqualByteParser.create_op(0x44AB);

        op.execute(&mut vm).unwrap();
        assert_eq!(vm.program_counter, 0x200);

        vm.registers[0x4] = 0x01;
        op.execute(&mut vm).unwrap();
        assert_eq!(vm.program_counter, 0x202);
    }

    #[test]
    fn test_skip_register_comparisons_mask_low_nibble() {
        // 5XY1 and 9XY1 are not canonical words
        assert!(!SkipEqualRegisterParser.matches(0x5121));
        assert!(!SkipNotEqualRegisterParser.matches(0x9121));
        assert!(SkipEqualRegisterParser.matches(0x5120));
        assert!(SkipNotEqualRegisterParser.matches(0x9120));
    }

    #[test]
    fn test_skip_equal_register() {
        let mut vm = VirtualMachine::new();
        vm.registers[0x1] = 7;
        vm.registers[0x2] = 7;
        SkipEqualRegisterParser
            .create_op(0x5120)
            .execute(&mut vm)
            .unwrap();
        assert_eq!(vm.program_counter, 0x202);

        vm.registers[0x2] = 8;
        SkipNotEqualRegisterParser
            .create_op(0x9120)
            .execute(&mut vm)
            .unwrap();
        assert_eq!(vm.program_counter, 0x204);
    }
}
