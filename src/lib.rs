//! A CHIP-8 virtual machine built around an opcode dispatch framework.
//!
//! ## Design
//!
//! * all machine state lives in one [`system::VirtualMachine`] aggregate,
//!   passed by exclusive reference into every instruction; no globals
//! * each of the ~35 instruction families has a parser that claims its
//!   16-bit words and decodes them into an executable operation; the
//!   [`operations::Dispatcher`] scans the parsers in a fixed order and
//!   first match wins
//! * the framebuffer is one u64 per row (bit 63 = column 0), so a sprite
//!   row composites with a single rotate-and-XOR; pixel coordinates wrap,
//!   memory addresses never do
//! * the core is single-threaded and never blocks: key-wait rewinds the
//!   program counter and clears `running`, and the fetch loop re-dispatches
//!   once a key arrives
//! * display, input and sound sit behind traits so the interpreter doesn't
//!   need to know the terminal exists; dummy implementations back the tests
pub mod display;
pub mod error;
pub mod input;
pub mod interpreter;
pub mod operations;
pub mod sound;
pub mod system;
