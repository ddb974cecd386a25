use clap::ValueEnum;

pub const FB_WIDTH: usize = 64;
pub const FB_HEIGHT: usize = 32;

/// what happens to sprite pixels whose coordinates fall off the grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DrawPolicy {
    /// every coordinate is taken modulo the grid size
    Wrap,
    /// pixels off the grid are dropped
    Clip,
}

/// 64x32 monochrome pixel grid. Only the clear and draw instructions change
/// it; displays get a shared reference.
pub struct Framebuffer {
    pixels: [[bool; FB_WIDTH]; FB_HEIGHT],
    dirty: bool,
}

impl Framebuffer {
    pub fn new() -> Self {
        Framebuffer {
            pixels: [[false; FB_WIDTH]; FB_HEIGHT],
            dirty: true,
        }
    }

    pub fn clear(&mut self) {
        self.pixels = [[false; FB_WIDTH]; FB_HEIGHT];
        self.dirty = true;
    }

    /// XOR a sprite onto the grid, one byte per row, msb leftmost. Returns
    /// true if any lit pixel was switched off.
    pub fn draw_sprite(&mut self, x: u8, y: u8, sprite: &[u8], policy: DrawPolicy) -> bool {
        let mut collision = false;
        for (row, bits) in sprite.iter().enumerate() {
            for col in 0..8 {
                if bits & (0x80 >> col) == 0 {
                    continue;
                }
                let (px, py) = (x as usize + col, y as usize + row);
                let (px, py) = match policy {
                    DrawPolicy::Wrap => (px % FB_WIDTH, py % FB_HEIGHT),
                    DrawPolicy::Clip if px >= FB_WIDTH || py >= FB_HEIGHT => continue,
                    DrawPolicy::Clip => (px, py),
                };
                let cell = &mut self.pixels[py][px];
                collision |= *cell;
                *cell = !*cell;
            }
        }
        self.dirty = true;
        collision
    }

    /// out-of-range coordinates read as unlit
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < FB_WIDTH && y < FB_HEIGHT && self.pixels[y][x]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool; FB_WIDTH]> {
        self.pixels.iter()
    }

    pub fn lit_count(&self) -> usize {
        self.rows().flatten().filter(|p| **p).count()
    }

    /// has anything changed since the last call
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GLYPH_0: [u8; 5] = [0xF0, 0x90, 0x90, 0x90, 0xF0];

    #[test]
    fn test_starts_clear() {
        let fb = Framebuffer::new();
        assert_eq!(fb.lit_count(), 0);
    }

    #[test]
    fn test_draw_sets_bits_msb_first() {
        let mut fb = Framebuffer::new();
        assert!(!fb.draw_sprite(10, 4, &[0b1010_0000], DrawPolicy::Wrap));
        assert!(fb.get(10, 4));
        assert!(!fb.get(11, 4));
        assert!(fb.get(12, 4));
        assert_eq!(fb.lit_count(), 2);
    }

    #[test]
    fn test_draw_twice_restores_and_collides() {
        let mut fb = Framebuffer::new();
        fb.draw_sprite(0, 0, &[0x0f], DrawPolicy::Wrap);
        let before: Vec<_> = fb.rows().cloned().collect();

        assert!(!fb.draw_sprite(20, 10, &GLYPH_0, DrawPolicy::Wrap));
        assert_eq!(fb.lit_count(), 4 + 14);
        assert!(fb.draw_sprite(20, 10, &GLYPH_0, DrawPolicy::Wrap));
        let after: Vec<_> = fb.rows().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_overlap_without_erasing_is_no_collision() {
        let mut fb = Framebuffer::new();
        fb.draw_sprite(0, 0, &[0xf0], DrawPolicy::Wrap);
        assert!(!fb.draw_sprite(0, 0, &[0x0f], DrawPolicy::Wrap));
        assert_eq!(fb.lit_count(), 8);
    }

    #[test]
    fn test_wrap_policy_wraps_both_axes() {
        let mut fb = Framebuffer::new();
        fb.draw_sprite(62, 31, &[0xf0, 0xf0], DrawPolicy::Wrap);
        assert!(fb.get(62, 31) && fb.get(63, 31) && fb.get(0, 31) && fb.get(1, 31));
        assert!(fb.get(62, 0) && fb.get(1, 0));
        assert_eq!(fb.lit_count(), 8);
    }

    #[test]
    fn test_wrap_policy_wraps_origin() {
        let mut fb = Framebuffer::new();
        fb.draw_sprite(64 + 3, 32 + 2, &[0x80], DrawPolicy::Wrap);
        assert!(fb.get(3, 2));
    }

    #[test]
    fn test_clip_policy_drops_offscreen_pixels() {
        let mut fb = Framebuffer::new();
        fb.draw_sprite(62, 31, &[0xf0, 0xf0], DrawPolicy::Clip);
        assert!(fb.get(62, 31) && fb.get(63, 31));
        assert_eq!(fb.lit_count(), 2);

        fb.draw_sprite(70, 2, &[0xff], DrawPolicy::Clip);
        assert_eq!(fb.lit_count(), 2);
    }

    #[test]
    fn test_clear_and_dirty_tracking() {
        let mut fb = Framebuffer::new();
        assert!(fb.take_dirty());
        assert!(!fb.take_dirty());
        fb.draw_sprite(0, 0, &[0xff], DrawPolicy::Wrap);
        assert!(fb.take_dirty());
        fb.clear();
        assert!(fb.take_dirty());
        assert_eq!(fb.lit_count(), 0);
    }
}
