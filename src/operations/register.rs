//! Register instructions: immediates, the 8XY_ arithmetic/logic family and
//! CXNN random. Arithmetic is 8-bit wrapping; carry, borrow and shifted-out
//! bits land in VF after the result is written.

use super::{byte_arg, vx, vy, Operation, OperationParser};
use crate::error::Chip8Error;
use crate::system::VirtualMachine;
use rand::Rng;
use std::fmt;

/// 6XNN - load an immediate into VX
pub struct LoadByteParser;

impl OperationParser for LoadByteParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode >> 12 == 0x6
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(LoadByteOp {
            register: vx(opcode),
            value: byte_arg(opcode),
        })
    }
}

pub struct LoadByteOp {
    register: u8,
    value: u8,
}

impl fmt::Display for LoadByteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{:X} = {:X}", self.register, self.value)
    }
}

impl Operation for LoadByteOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        vm.registers[self.register as usize] = self.value;
        Ok(())
    }
}

/// 7XNN - add an immediate to VX, no carry flag
pub struct AddByteParser;

impl OperationParser for AddByteParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode >> 12 == 0x7
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(AddByteOp {
            register: vx(opcode),
            value: byte_arg(opcode),
        })
    }
}

pub struct AddByteOp {
    register: u8,
    value: u8,
}

impl fmt::Display for AddByteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{:X} += {:X}", self.register, self.value)
    }
}

impl Operation for AddByteOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        let x = self.register as usize;
        vm.registers[x] = vm.registers[x].wrapping_add(self.value);
        Ok(())
    }
}

/// 8XY0 - copy VY into VX
pub struct MoveParser;

impl OperationParser for MoveParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode & 0xF00F == 0x8000
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(MoveOp {
            x_register: vx(opcode),
            y_register: vy(opcode),
        })
    }
}

pub struct MoveOp {
    x_register: u8,
    y_register: u8,
}

impl fmt::Display for MoveOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{:X} = V{:X}", self.x_register, self.y_register)
    }
}

impl Operation for MoveOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        vm.registers[self.x_register as usize] = vm.registers[self.y_register as usize];
        Ok(())
    }
}

/// 8XY1 - VX |= VY
pub struct OrParser;

impl OperationParser for OrParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode & 0xF00F == 0x8001
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(OrOp {
            x_register: vx(opcode),
            y_register: vy(opcode),
        })
    }
}

pub struct OrOp {
    x_register: u8,
    y_register: u8,
}

impl fmt::Display for OrOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{:X} |= V{:X}", self.x_register, self.y_register)
    }
}

impl Operation for OrOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        vm.registers[self.x_register as usize] |= vm.registers[self.y_register as usize];
        Ok(())
    }
}

/// 8XY2 - VX &= VY
pub struct AndParser;

impl OperationParser for AndParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode & 0xF00F == 0x8002
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(AndOp {
            x_register: vx(opcode),
            y_register: vy(opcode),
        })
    }
}

pub struct AndOp {
    x_register: u8,
    y_register: u8,
}

impl fmt::Display for AndOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{:X} &= V{:X}", self.x_register, self.y_register)
    }
}

impl Operation for AndOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        vm.registers[self.x_register as usize] &= vm.registers[self.y_register as usize];
        Ok(())
    }
}

/// 8XY3 - VX ^= VY
pub struct XorParser;

impl OperationParser for XorParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode & 0xF00F == 0x8003
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(XorOp {
            x_register: vx(opcode),
            y_register: vy(opcode),
        })
    }
}

pub struct XorOp {
    x_register: u8,
    y_register: u8,
}

impl fmt::Display for XorOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{:X} ^= V{:X}", self.x_register, self.y_register)
    }
}

impl Operation for XorOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        vm.registers[self.x_register as usize] ^= vm.registers[self.y_register as usize];
        Ok(())
    }
}

/// 8XY4 - VX += VY, VF = carry
pub struct AddRegisterParser;

impl OperationParser for AddRegisterParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode & 0xF00F == 0x8004
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(AddRegisterOp {
            x_register: vx(opcode),
            y_register: vy(opcode),
        })
    }
}

pub struct AddRegisterOp {
    x_register: u8,
    y_register: u8,
}

impl fmt::Display for AddRegisterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{:X} += V{:X}", self.x_register, self.y_register)
    }
}

impl Operation for AddRegisterOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        let x = self.x_register as usize;
        let (sum, carried) =
            vm.registers[x].overflowing_add(vm.registers[self.y_register as usize]);
        vm.registers[x] = sum;
        vm.registers[0xF] = carried as u8;
        Ok(())
    }
}

/// 8XY5 - VX -= VY, VF = not-borrow
pub struct SubRegisterParser;

impl OperationParser for SubRegisterParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode & 0xF00F == 0x8005
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(SubRegisterOp {
            x_register: vx(opcode),
            y_register: vy(opcode),
        })
    }
}

pub struct SubRegisterOp {
    x_register: u8,
    y_register: u8,
}

impl fmt::Display for SubRegisterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{:X} -= V{:X}", self.x_register, self.y_register)
    }
}

impl Operation for SubRegisterOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        let x = self.x_register as usize;
        let (diff, borrowed) =
            vm.registers[x].overflowing_sub(vm.registers[self.y_register as usize]);
        vm.registers[x] = diff;
        vm.registers[0xF] = !borrowed as u8;
        Ok(())
    }
}

/// 8XY7 - VX = VY - VX, VF = not-borrow
pub struct SubReverseParser;

impl OperationParser for SubReverseParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode & 0xF00F == 0x8007
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(SubReverseOp {
            x_register: vx(opcode),
            y_register: vy(opcode),
        })
    }
}

pub struct SubReverseOp {
    x_register: u8,
    y_register: u8,
}

impl fmt::Display for SubReverseOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "V{:X} = V{:X} - V{:X}",
            self.x_register, self.y_register, self.x_register
        )
    }
}

impl Operation for SubReverseOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        let x = self.x_register as usize;
        let (diff, borrowed) =
            vm.registers[self.y_register as usize].overflowing_sub(vm.registers[x]);
        vm.registers[x] = diff;
        vm.registers[0xF] = !borrowed as u8;
        Ok(())
    }
}

/// 8XY6 - shift VX right one bit, VF = the bit shifted out
pub struct ShiftRightParser;

impl OperationParser for ShiftRightParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode & 0xF00F == 0x8006
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(ShiftRightOp { register: vx(opcode) })
    }
}

pub struct ShiftRightOp {
    register: u8,
}

impl fmt::Display for ShiftRightOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{:X} >>= 1", self.register)
    }
}

impl Operation for ShiftRightOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        let x = self.register as usize;
        vm.registers[0xF] = vm.registers[x] & 0x1;
        vm.registers[x] >>= 1;
        Ok(())
    }
}

/// 8XYE - shift VX left one bit, VF = the bit shifted out
pub struct ShiftLeftParser;

impl OperationParser for ShiftLeftParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode & 0xF00F == 0x800E
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(ShiftLeftOp { register: vx(opcode) })
    }
}

pub struct ShiftLeftOp {
    register: u8,
}

impl fmt::Display for ShiftLeftOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{:X} <<= 1", self.register)
    }
}

impl Operation for ShiftLeftOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        let x = self.register as usize;
        vm.registers[0xF] = vm.registers[x] >> 7;
        vm.registers[x] <<= 1;
        Ok(())
    }
}

/// CXNN - VX = random byte masked with NN
pub struct RandomParser;

impl OperationParser for RandomParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode >> 12 == 0xC
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(RandomOp {
            register: vx(opcode),
            mask: byte_arg(opcode),
        })
    }
}

pub struct RandomOp {
    register: u8,
    mask: u8,
}

impl fmt::Display for RandomOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{:X} = rand() & {:X}", self.register, self.mask)
    }
}

impl Operation for RandomOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        vm.registers[self.register as usize] = rand::thread_rng().gen::<u8>() & self.mask;
        Ok(())
    }
}
