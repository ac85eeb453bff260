//! Display instructions: 00E0 clear screen and DXYN sprite draw.

use super::{nibble, vx, vy, Operation, OperationParser};
use crate::error::Chip8Error;
use crate::system::{VirtualMachine, DISPLAY_HEIGHT};
use std::fmt;

/// 00E0 - wipe the framebuffer
pub struct ClearScreenParser;

impl OperationParser for ClearScreenParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode == 0x00E0
    }

    fn create_op(&self, _opcode: u16) -> Box<dyn Operation> {
        Box::new(ClearScreenOp)
    }
}

pub struct ClearScreenOp;

impl fmt::Display for ClearScreenOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Clear Screen")
    }
}

impl Operation for ClearScreenOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        vm.pixels = [0; DISPLAY_HEIGHT];
        Ok(())
    }
}

/// DXYN - draw an 8-wide, N-tall sprite from memory at I to (VX, VY)
pub struct DrawParser;

impl OperationParser for DrawParser {
    fn matches(&self, opcode: u16) -> bool {
        opcode >> 12 == 0xD
    }

    fn create_op(&self, opcode: u16) -> Box<dyn Operation> {
        Box::new(DrawOp {
            x_register: vx(opcode),
            y_register: vy(opcode),
            height: nibble(opcode),
        })
    }
}

/// Sprite compositing - http://devernay.free.fr/hacks/chip8/C8TECH10.HTM#Dxyn
///
/// Each sprite byte is widened to a u64 and circularly rotated so its eight
/// bits land at the X origin; the rotation is what makes drawing past the
/// right edge wrap to column 0. Rows past the bottom wrap modulo 32. The
/// rotated word is XORed into the framebuffer row, so drawing the same
/// sprite twice erases it; VF reports whether any lit pixel was turned off.
#[derive(Debug, PartialEq, Eq)]
pub struct DrawOp {
    x_register: u8,
    y_register: u8,
    height: u8,
}

impl fmt::Display for DrawOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Draw Screen (V{:X}, V{:X}) Height: {:X}",
            self.x_register, self.y_register, self.height
        )
    }
}

impl Operation for DrawOp {
    fn execute(&self, vm: &mut VirtualMachine) -> Result<(), Chip8Error> {
        // collision flag starts clear; any row can set it, nothing clears it
        vm.registers[0xF] = 0;
        let x_pos = vm.registers[self.x_register as usize];
        let y_pos = vm.registers[self.y_register as usize];

        for row in 0..self.height {
            let y = (usize::from(y_pos) + usize::from(row)) % DISPLAY_HEIGHT;

            let address = usize::from(vm.index_register) + usize::from(row);
            let sprite_byte = vm.read_byte(address)?;

            // place the byte's MSB at column `x_pos mod 64`. A fresh byte
            // sits at columns 56-63, so rotate left by 56 - x; rem_euclid
            // keeps the amount in 0..64 when x exceeds 56
            let rotation = (56 - i32::from(x_pos)).rem_euclid(64) as u32;
            let sprite = u64::from(sprite_byte).rotate_left(rotation);

            // collision test must precede the composite
            if sprite & vm.pixels[y] != 0 {
                vm.registers[0xF] = 1;
            }

            vm.pixels[y] ^= sprite;
        }
        Ok(())
    }
}
