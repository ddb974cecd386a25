use crate::framebuffer::{Framebuffer, FB_HEIGHT, FB_WIDTH};
use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

/// Display is used by the scheduler to put the framebuffer on a screen. It
/// only ever sees a shared reference, so it can't change machine state.
pub trait Display {
    /// present every lit pixel as a filled scale x scale square
    fn draw(&mut self, fb: &Framebuffer) -> Result<(), io::Error>;

    /// output cells per CHIP-8 pixel, in each direction
    fn scale(&self) -> u16;
}

// store useful metadata about the output grid
struct Resolution {
    width: usize,
    height: usize,
    scale: usize,
}

impl Resolution {
    fn new(scale: u16) -> Self {
        Resolution {
            width: FB_WIDTH,
            height: FB_HEIGHT,
            scale: scale.max(1) as usize,
        }
    }

    /// output cells across and down, without the border
    fn cells(&self) -> (usize, usize) {
        (self.width * self.scale, self.height * self.scale)
    }

    fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.cells().0 - 1) as f64]
    }

    fn y_bounds(&self) -> [f64; 2] {
        [-1.0 * (self.cells().1 - 1) as f64, 0.0]
    }

    /// canvas coordinates of every output cell whose pixel is `lit`; y runs
    /// downward as negative numbers so row 0 is at the top
    fn plane<'a>(&self, fb: &'a Framebuffer, lit: bool) -> impl Iterator<Item = (f64, f64)> + 'a {
        let s = self.scale;
        fb.rows().enumerate().flat_map(move |(y, row)| {
            row.iter()
                .enumerate()
                .filter(move |(_, px)| **px == lit)
                .flat_map(move |(x, _)| {
                    (0..s * s).map(move |i| {
                        (
                            (x * s + i % s) as f64,
                            -1.0 * (y * s + i / s) as f64,
                        )
                    })
                })
        })
    }
}

/// monochrome display in a terminal, rendered using TUI and crossterm
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    resolution: Resolution,
}

impl MonoTermDisplay {
    pub fn new(scale: u16) -> Result<MonoTermDisplay, io::Error> {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        Ok(MonoTermDisplay {
            terminal,
            resolution: Resolution::new(scale),
        })
    }
}

impl Display for MonoTermDisplay {
    fn draw(&mut self, fb: &Framebuffer) -> Result<(), io::Error> {
        let resolution = &self.resolution;
        let (w, h) = resolution.cells();
        let off: Vec<_> = resolution.plane(fb, false).collect();
        let on: Vec<_> = resolution.plane(fb, true).collect();

        self.terminal.draw(|f| {
            let size = Rect::new(0, 0, 2 + w as u16, 2 + h as u16);

            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title("CHIP-8")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(resolution.x_bounds())
                .y_bounds(resolution.y_bounds())
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &off,
                        color: Color::Black,
                    });
                    ctx.draw(&Points {
                        coords: &on,
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }

    fn scale(&self) -> u16 {
        self.resolution.scale as u16
    }
}

/// useful for testing non-display routines; counts frames and remembers how
/// many pixels the last one had lit
#[derive(Default)]
pub struct DummyDisplay {
    pub frames: usize,
    pub last_lit: usize,
}

impl DummyDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Display for DummyDisplay {
    fn draw(&mut self, fb: &Framebuffer) -> Result<(), io::Error> {
        self.frames += 1;
        self.last_lit = fb.lit_count();
        Ok(())
    }

    fn scale(&self) -> u16 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::DrawPolicy;

    #[test]
    fn test_cells_scale() {
        assert_eq!(Resolution::new(1).cells(), (64, 32));
        assert_eq!(Resolution::new(3).cells(), (192, 96));
    }

    #[test]
    fn test_zero_scale_treated_as_one() {
        assert_eq!(Resolution::new(0).cells(), (64, 32));
    }

    #[test]
    fn test_bounds() {
        let r = Resolution::new(2);
        assert_eq!(r.x_bounds(), [0.0, 127.0]);
        assert_eq!(r.y_bounds(), [-63.0, 0.0]);
    }

    #[test]
    fn test_blank_screen_is_all_background() {
        let r = Resolution::new(1);
        let fb = Framebuffer::new();
        assert_eq!(r.plane(&fb, true).count(), 0);
        assert_eq!(r.plane(&fb, false).count(), 2048);
    }

    #[test]
    fn test_lit_pixel_fills_a_square() {
        let r = Resolution::new(2);
        let mut fb = Framebuffer::new();
        fb.draw_sprite(1, 1, &[0x80], DrawPolicy::Wrap);
        let mut on: Vec<_> = r.plane(&fb, true).collect();
        on.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(on, vec![(2.0, -3.0), (2.0, -2.0), (3.0, -3.0), (3.0, -2.0)]);
        assert_eq!(r.plane(&fb, false).count(), 4 * (2048 - 1));
    }

    #[test]
    fn test_dummy_display_counts_frames() -> Result<(), io::Error> {
        let mut d = DummyDisplay::new();
        let mut fb = Framebuffer::new();
        fb.draw_sprite(0, 0, &[0xff], DrawPolicy::Wrap);
        d.draw(&fb)?;
        assert_eq!(d.frames, 1);
        assert_eq!(d.last_lit, 8);
        Ok(())
    }
}
