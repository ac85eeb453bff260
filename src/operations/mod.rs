//! The opcode dispatch framework: one parser per instruction family, each
//! able to claim a 16-bit word and decode it into an executable operation,
//! plus the dispatcher that scans them in a fixed order.

use crate::error::Chip8Error;
use crate::system::VirtualMachine;
use std::fmt;

pub mod draw;
pub mod flow;
pub mod input;
pub mod memory;
pub mod register;
pub mod timer;

/// Claims and decodes the opcode words of one instruction family.
pub trait OperationParser {
    /// does this family own the given word?
    fn matches(&self, opcode: u16) -> bool;

    /// decode a word into an executable operation. Only valid on a word
    /// `matches` accepted; the dispatcher is the only legitimate caller.
    fn create_op(&self, opcode: u16) -> Box<dyn Operation>;
}

/// A fully-decoded instruction. `Display` renders the canonical disassembly
/// text for tracing; it must be deterministic.
pub trait Operation: fmt::Display {
    /// apply this instruction's effect to the machine
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error>;
}

// operand field extraction, shared by every parser

/// register index from bits 8-11 of `oXoo`
fn vx(opcode: u16) -> u8 {
    ((opcode & 0x0F00) >> 8) as u8
}

/// register index from bits 4-7 of `ooYo`
fn vy(opcode: u16) -> u8 {
    ((opcode & 0x00F0) >> 4) as u8
}

/// low nibble of `oooN`
fn nibble(opcode: u16) -> u8 {
    (opcode & 0x000F) as u8
}

/// low byte of `ooNN`
fn byte_arg(opcode: u16) -> u8 {
    (opcode & 0x00FF) as u8
}

/// 12-bit address from `oNNN`
fn addr(opcode: u16) -> u16 {
    opcode & 0x0FFF
}

/// Holds every known operation parser in a fixed order and finds the one
/// that owns a fetched word. The canonical families are mutually exclusive
/// at the masks they test, so first-match-wins is unambiguous.
pub struct Dispatcher {
    parsers: Vec<Box<dyn OperationParser>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Dispatcher {
            parsers: vec![
                Box::new(draw::ClearScreenParser),
                Box::new(flow::ReturnParser),
                Box::new(flow::JumpParser),
                Box::new(flow::CallParser),
                Box::new(flow::SkipEqualByteParser),
                Box::new(flow::SkipNotEqualByteParser),
                Box::new(flow::SkipEqualRegisterParser),
                Box::new(register::LoadByteParser),
                Box::new(register::AddByteParser),
                Box::new(register::MoveParser),
                Box::new(register::OrParser),
                Box::new(register::AndParser),
                Box::new(register::XorParser),
                Box::new(register::AddRegisterParser),
                Box::new(register::SubRegisterParser),
                Box::new(register::ShiftRightParser),
                Box::new(register::SubReverseParser),
                Box::new(register::ShiftLeftParser),
                Box::new(flow::SkipNotEqualRegisterParser),
                Box::new(memory::LoadIndexParser),
                Box::new(flow::JumpOffsetParser),
                Box::new(register::RandomParser),
                Box::new(draw::DrawParser),
                Box::new(input::SkipKeyPressedParser),
                Box::new(input::SkipKeyNotPressedParser),
                Box::new(timer::ReadDelayParser),
                Box::new(input::GetKeyParser),
                Box::new(timer::SetDelayParser),
                Box::new(timer::SetSoundParser),
                Box::new(memory::AddIndexParser),
                Box::new(memory::LoadFontParser),
                Box::new(memory::StoreBcdParser),
                Box::new(memory::DumpRegistersParser),
                Box::new(memory::FillRegistersParser),
            ],
        }
    }

    /// decode a fetched word into an executable operation, or fail with
    /// UnknownOpcode if no family claims it
    pub fn decode(&self, opcode: u16) -> Result<Box<dyn Operation>, Chip8Error> {
        self.parsers
            .iter()
            .find(|p| p.matches(opcode))
            .map(|p| p.create_op(opcode))
            .ok_or(Chip8Error::UnknownOpcode { opcode })
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
