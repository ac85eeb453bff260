//! Keypad instructions: the EX9E/EXA1 conditional skips and the FX0A
//! blocking key-wait.

use super::{byte_arg, vx, Operation, OperationParser};
use crate::error::Chip8Error;
use crate::system::VirtualMachine;
use std::fmt;

/// EX9E - skip next instruction if the key named by VX is down
pub struct SkipKeyPressedParser;

impl OperationParser for SkipKeyPressedParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode & 0xF0FF == 0xE09E
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(SkipKeyPressedOp { register: vx(opcode) })
    }
}

pub struct SkipKeyPressedOp {
    register: u8,
}

impl fmt::Display for SkipKeyPressedOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Skip if key(V{:X}) pressed", self.register)
    }
}

impl Operation for SkipKeyPressedOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        let key = vm.registers[self.register as usize] & 0x0F;
        if vm.keyboard[key as usize] {
            vm.program_counter += 2;
        }
        Ok(())
    }
}

/// EXA1 - skip next instruction if the key named by VX is up
pub struct SkipKeyNotPressedParser;

impl OperationParser for SkipKeyNotPressedParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode & 0xF0FF == 0xE0A1
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(SkipKeyNotPressedOp { register: vx(opcode) })
    }
}

pub struct SkipKeyNotPressedOp {
    register: u8,
}

impl fmt::Display for SkipKeyNotPressedOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Skip if key(V{:X}) not pressed", self.register)
    }
}

impl Operation for SkipKeyNotPressedOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        let key = vm.registers[self.register as usize] & 0x0F;
        if !vm.keyboard[key as usize] {
            vm.program_counter += 2;
        }
        Ok(())
    }
}

/// FX0A - wait for a keypress and store it in VX.
///
/// The core never blocks: when no key is down the program counter is wound
/// back over this instruction and `running` is cleared, so the fetch loop
/// re-dispatches the same word once input wakes the machine. When at least
/// one key is down the lowest-numbered one wins.
pub struct GetKeyParser;

impl OperationParser for GetKeyParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode >> 12 == 0xF && byte_arg(opcode) == 0x0A
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(GetKeyOp { register: vx(opcode) })
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct GetKeyOp {
    register: u8,
}

impl fmt::Display for GetKeyOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{:X} = get_key()", self.register)
    }
}

impl Operation for GetKeyOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        match vm.keyboard.iter().position(|&pressed| pressed) {
            Some(key) => {
                vm.registers[self.register as usize] = key as u8;
                vm.running = true;
            }
            None => {
                vm.program_counter -= 2;
                vm.running = false;
            }
        }
        Ok(())
    }
}
