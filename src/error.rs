use thiserror::Error;

/// Everything that can go wrong while decoding or executing CHIP-8 code.
///
/// Decode and execution failures are returned as values; the interpreter
/// loop decides whether to halt or carry on. Pixel coordinates wrap, memory
/// addresses do not: an address past the end of RAM is a hard error rather
/// than a silent truncation that would mask program bugs.
#[derive(Debug, Error)]
pub enum Chip8Error {
    /// no registered instruction family owns this word
    #[error("unknown opcode {opcode:#06x}")]
    UnknownOpcode { opcode: u16 },

    /// an instruction tried to read or write outside the 4K of RAM
    #[error("memory access out of bounds at {address:#06x}")]
    MemoryOutOfBounds { address: usize },

    /// a subroutine call would grow the stack past its sixteen slots
    #[error("call stack overflow")]
    StackOverflow,

    /// a return was executed with nothing on the call stack
    #[error("call stack underflow")]
    StackUnderflow,

    /// internal invariant violation; 4-bit field extraction should make
    /// this unreachable
    #[error("invalid operand: {detail}")]
    InvalidOperand { detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
