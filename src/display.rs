use crate::error::Chip8Error;
use crate::system::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

/// Display is used by the interpreter to put the framebuffer on a screen.
/// It abstracts the implementation details, so a variety of kinds of screen
/// would work. The framebuffer arrives in the machine's packed form: one
/// u64 per row, bit 63 = leftmost column.
pub trait Display {
    fn draw(&mut self, pixels: &[u64; DISPLAY_HEIGHT]) -> Result<(), Chip8Error>;
}

/// expand the lit bits of the packed rows into canvas coordinates
fn lit_points(pixels: &[u64; DISPLAY_HEIGHT]) -> Vec<(f64, f64)> {
    let mut points = Vec::new();
    for (y, row) in pixels.iter().enumerate() {
        for x in 0..DISPLAY_WIDTH {
            if row & (1u64 << (63 - x)) != 0 {
                points.push((x as f64, -1.0 * y as f64));
            }
        }
    }
    points
}

/// monochrome display in a terminal, rendered using TUI's crossterm backend
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl MonoTermDisplay {
    pub fn new() -> Result<MonoTermDisplay, Chip8Error> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        Ok(MonoTermDisplay { terminal })
    }
}

impl Display for MonoTermDisplay {
    fn draw(&mut self, pixels: &[u64; DISPLAY_HEIGHT]) -> Result<(), Chip8Error> {
        // 1:1 ratio between terminal cells, chip8 pixels and the TUI canvas
        self.terminal.draw(|f| {
            let size = Rect::new(0, 0, 2 + DISPLAY_WIDTH as u16, 2 + DISPLAY_HEIGHT as u16);

            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title("CHIP-8")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds([0.0, (DISPLAY_WIDTH - 1) as f64])
                .y_bounds([-1.0 * (DISPLAY_HEIGHT - 1) as f64, 0.0])
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &lit_points(pixels),
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }
}

/// useful for testing non-display routines
pub struct DummyDisplay {
    pub frames_drawn: usize,
}

impl DummyDisplay {
    pub fn new() -> Self {
        DummyDisplay { frames_drawn: 0 }
    }
}

impl Display for DummyDisplay {
    fn draw(&mut self, _pixels: &[u64; DISPLAY_HEIGHT]) -> Result<(), Chip8Error> {
        self.frames_drawn += 1;
        Ok(())
    }
}
