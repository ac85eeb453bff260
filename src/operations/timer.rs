//! Timer instructions. The 60 Hz countdown itself belongs to the host loop;
//! these only move values between registers and timers.

use super::{vx, Operation, OperationParser};
use crate::error::Chip8Error;
use crate::system::VirtualMachine;
use std::fmt;

/// FX07 - read the delay timer into VX
pub struct ReadDelayParser;

impl OperationParser for ReadDelayParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode & 0xF0FF == 0xF007
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(ReadDelayOp { register: vx(opcode) })
    }
}

pub struct ReadDelayOp {
    register: u8,
}

impl fmt::Display for ReadDelayOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{:X} = delay_timer", self.register)
    }
}

impl Operation for ReadDelayOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        vm.registers[self.register as usize] = vm.delay_timer;
        Ok(())
    }
}

/// FX15 - set the delay timer from VX
pub struct SetDelayParser;

impl OperationParser for SetDelayParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode & 0xF0FF == 0xF015
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(SetDelayOp { register: vx(opcode) })
    }
}

pub struct SetDelayOp {
    register: u8,
}

impl fmt::Display for SetDelayOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "delay_timer = V{:X}", self.register)
    }
}

impl Operation for SetDelayOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        vm.delay_timer = vm.registers[self.register as usize];
        Ok(())
    }
}

/// FX18 - set the sound timer from VX
pub struct SetSoundParser;

impl OperationParser for SetSoundParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode & 0xF0FF == 0xF018
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(SetSoundOp { register: vx(opcode) })
    }
}

pub struct SetSoundOp {
    register: u8,
}

impl fmt::Display for SetSoundOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sound_timer = V{:X}", self.register)
    }
}

impl Operation for SetSoundOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        vm.sound_timer = vm.registers[self.register as usize];
        Ok(())
    }
}
