//! The fetch-decode-execute loop. All instruction semantics live in the
//! operations; this just moves the program counter, keeps wall-clock pace,
//! and shuttles state between the machine and the host display, keypad and
//! speaker.

use crate::display::Display;
use crate::error::Chip8Error;
use crate::input::Input;
use crate::operations::Dispatcher;
use crate::sound::Sound;
use crate::system::VirtualMachine;
use std::time::{Duration, Instant};

/// timers and the screen tick at the original hardware's refresh rate
const FRAME_RATE_HZ: u32 = 60;

pub struct Chip8Interpreter<'a> {
    vm: VirtualMachine,
    dispatcher: Dispatcher,
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    sound: &'a mut dyn Sound,
}

impl<'a> Chip8Interpreter<'a> {
    pub fn new(
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        sound: &'a mut dyn Sound,
    ) -> Self {
        Chip8Interpreter {
            vm: VirtualMachine::new(),
            dispatcher: Dispatcher::new(),
            display,
            input,
            sound,
        }
    }

    /// load a chip8 program
    pub fn load_program(&mut self, reader: &mut impl std::io::Read) -> Result<(), Chip8Error> {
        self.vm.load_program(reader)
    }

    pub fn machine(&self) -> &VirtualMachine {
        &self.vm
    }

    /// One fetch-decode-execute step. The program counter moves past the
    /// fetched word before execution, so jumps overwrite it, skips add to
    /// it and key-wait rewinds it.
    pub fn cycle(&mut self) -> Result<(), Chip8Error> {
        let pc = self.vm.program_counter;
        let word = self.vm.read_word(pc as usize)?;
        let op = self.dispatcher.decode(word)?;
        log::trace!("{:#06x}: {:#06x}  {}", pc, word, op);

        self.vm.program_counter = pc + 2;
        op.execute(&mut self.vm)
    }

    /// fold recent keypresses into the machine's keyboard map; a pressed
    /// key also wakes a machine paused on key-wait
    fn refresh_keyboard(&mut self) -> Result<(), Chip8Error> {
        let keys = self.input.peek_keys()?;
        self.vm.keyboard = [false; 16];
        for &key in keys {
            self.vm.keyboard[key as usize & 0xF] = true;
        }
        if !self.vm.running && !keys.is_empty() {
            self.vm.running = true;
        }
        self.input.flush_keys()?;
        Ok(())
    }

    /// One 60 Hz frame: refresh input, run this frame's share of the
    /// instruction budget, count the timers down, redraw and drive sound.
    pub fn frame(&mut self, instructions_per_second: u32) -> Result<(), Chip8Error> {
        self.refresh_keyboard()?;

        for _ in 0..instructions_per_second / FRAME_RATE_HZ {
            if !self.vm.running {
                break;
            }
            self.cycle()?;
        }

        if self.vm.delay_timer > 0 {
            self.vm.delay_timer -= 1;
        }
        if self.vm.sound_timer > 0 {
            self.vm.sound_timer -= 1;
            self.sound.start()?;
        } else {
            self.sound.stop()?;
        }

        self.display.draw(&self.vm.pixels)
    }

    /// run frames at 60 Hz until an error surfaces, pacing with spin_sleep
    pub fn main_loop(&mut self, instructions_per_second: u32) -> Result<(), Chip8Error> {
        let frame_budget = Duration::from_secs(1) / FRAME_RATE_HZ;
        let sleeper = spin_sleep::SpinSleeper::default();
        loop {
            let started = Instant::now();
            self.frame(instructions_per_second)?;
            let spent = started.elapsed();
            if spent < frame_budget {
                sleeper.sleep(frame_budget - spent);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DummyDisplay;
    use crate::input::DummyInput;
    use crate::sound::Mute;

    fn run_program(prog: &[u8], cycles: usize) -> VirtualMachine {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::new(&[]);
        let mut sound = Mute::new();
        let mut interpreter = Chip8Interpreter::new(&mut display, &mut input, &mut sound);
        let mut reader = prog;
        interpreter.load_program(&mut reader).unwrap();
        for _ in 0..cycles {
            interpreter.cycle().unwrap();
        }
        interpreter.vm
    }

    #[test]
    fn test_cycle_executes_load_then_add() {
        // V0 = 5; V0 += 3
        let vm = run_program(&[0x60, 0x05, 0x70, 0x03], 2);
        assert_eq!(vm.registers[0x0], 8);
        assert_eq!(vm.program_counter, 0x204);
    }

    #[test]
    fn test_cycle_draws_font_glyph() {
        // I = font('6'); V1 = 5; draw 5 rows at (V0, V1)
        let vm = run_program(&[0xA0, 0x1E, 0x61, 0x05, 0xD0, 0x15], 3);
        assert_eq!(vm.pixels[5], 0xF000000000000000);
        assert_eq!(vm.pixels[6], 0x8000000000000000);
        assert_eq!(vm.pixels[7], 0xF000000000000000);
        assert_eq!(vm.pixels[8], 0x9000000000000000);
        assert_eq!(vm.pixels[9], 0xF000000000000000);
    }

    #[test]
    fn test_cycle_surfaces_unknown_opcode() {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::new(&[]);
        let mut sound = Mute::new();
        let mut interpreter = Chip8Interpreter::new(&mut display, &mut input, &mut sound);
        let mut prog: &[u8] = &[0x5F, 0xF1]; // 5XY1 is not canonical
        interpreter.load_program(&mut prog).unwrap();
        assert!(matches!(
            interpreter.cycle(),
            Err(Chip8Error::UnknownOpcode { opcode: 0x5FF1 })
        ));
    }

    #[test]
    fn test_frame_pauses_on_key_wait_then_wakes() {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::new(&[]);
        let mut pressed = DummyInput::new(&[0xA]);
        let mut sound = Mute::new();
        let mut interpreter = Chip8Interpreter::new(&mut display, &mut input, &mut sound);
        let mut prog: &[u8] = &[0xF6, 0x0A, 0x12, 0x02]; // V6 = get_key(); spin
        interpreter.load_program(&mut prog).unwrap();

        interpreter.frame(600).unwrap();
        assert!(!interpreter.vm.running);
        assert_eq!(interpreter.vm.program_counter, 0x200);

        // a keypress wakes the machine and satisfies the wait
        interpreter.input = &mut pressed;
        interpreter.frame(600).unwrap();
        assert!(interpreter.vm.running);
        assert_eq!(interpreter.vm.registers[0x6], 0xA);
    }

    #[test]
    fn test_frame_counts_timers_down_and_redraws() {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::new(&[]);
        let mut sound = Mute::new();
        let mut interpreter = Chip8Interpreter::new(&mut display, &mut input, &mut sound);
        // delay_timer = V0 (0x20); spin
        let mut prog: &[u8] = &[0x60, 0x20, 0xF0, 0x15, 0x12, 0x04];
        interpreter.load_program(&mut prog).unwrap();

        interpreter.frame(180).unwrap(); // three cycles: load, set, jump
        assert_eq!(interpreter.vm.delay_timer, 0x1F);

        drop(interpreter);
        assert_eq!(display.frames_drawn, 1);
    }
}
