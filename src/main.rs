use std::error::Error;
use std::fs::File;

use chip8_vm::display::MonoTermDisplay;
use chip8_vm::input::StdinInput;
use chip8_vm::interpreter::Chip8Interpreter;
use chip8_vm::sound::SimpleBeep;

/// roughly the speed of the original interpreter
const INSTRUCTIONS_PER_SECOND: u32 = 700;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let rom_path = std::env::args()
        .nth(1)
        .ok_or("usage: chip8-vm <rom.ch8>")?;

    let mut display = MonoTermDisplay::new()?;
    let mut input = StdinInput::new();
    let mut sound = SimpleBeep::new();
    let mut interpreter = Chip8Interpreter::new(&mut display, &mut input, &mut sound);

    let mut f = File::open(rom_path)?;
    interpreter.load_program(&mut f)?;
    interpreter.main_loop(INSTRUCTIONS_PER_SECOND)?;

    Ok(())
}
