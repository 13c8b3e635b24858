//! Drawing primitives
//!
//! [`Draw`] layers lines, circles and text over the engine's rectangle and
//! pixel writes. Everything clips through the underlying surface, so the
//! provided methods never range-check; they just emit writes.

use tessera_gfx::{FlushEngine, Rgb565};

use crate::font;

/// Pixel width of a string at a given integer scale
pub fn text_width(text: &str, size: u16) -> u32 {
    text.chars().count() as u32 * font::GLYPH_WIDTH as u32 * size.max(1) as u32
}

/// Shape and text drawing over a pixel target
///
/// Implementors supply the three primitives; everything else is provided.
pub trait Draw {
    /// Target dimensions in pixels
    fn dimensions(&self) -> (u16, u16);
    /// Write one pixel
    fn pixel(&mut self, x: i16, y: i16, color: Rgb565);
    /// Fill a rectangle
    fn solid_rect(&mut self, x: i16, y: i16, w: u16, h: u16, color: Rgb565);

    /// Bresenham line between two points, endpoints included
    fn draw_line(&mut self, x0: i16, y0: i16, x1: i16, y1: i16, color: Rgb565) {
        let (mut x, mut y) = (x0 as i32, y0 as i32);
        let (x1, y1) = (x1 as i32, y1 as i32);
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.pixel(x as i16, y as i16, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// One-pixel rectangle outline
    fn draw_rect(&mut self, x: i16, y: i16, w: u16, h: u16, color: Rgb565) {
        if w == 0 || h == 0 {
            return;
        }
        self.solid_rect(x, y, w, 1, color);
        self.solid_rect(x, y + h as i16 - 1, w, 1, color);
        self.solid_rect(x, y, 1, h, color);
        self.solid_rect(x + w as i16 - 1, y, 1, h, color);
    }

    /// Midpoint circle outline
    fn draw_circle(&mut self, cx: i16, cy: i16, r: u16, color: Rgb565) {
        let cx = cx as i32;
        let cy = cy as i32;
        let mut x = r as i32;
        let mut y = 0i32;
        let mut err = 1 - x;
        while x >= y {
            self.pixel((cx + x) as i16, (cy + y) as i16, color);
            self.pixel((cx + y) as i16, (cy + x) as i16, color);
            self.pixel((cx - y) as i16, (cy + x) as i16, color);
            self.pixel((cx - x) as i16, (cy + y) as i16, color);
            self.pixel((cx - x) as i16, (cy - y) as i16, color);
            self.pixel((cx - y) as i16, (cy - x) as i16, color);
            self.pixel((cx + y) as i16, (cy - x) as i16, color);
            self.pixel((cx + x) as i16, (cy - y) as i16, color);
            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err += 2 * (y - x) + 1;
            }
        }
    }

    /// Filled circle, one horizontal span per scanline
    fn fill_circle(&mut self, cx: i16, cy: i16, r: u16, color: Rgb565) {
        let r = r as i32;
        for dy in -r..=r {
            let half = isqrt(r * r - dy * dy);
            let x = cx as i32 - half;
            let w = (2 * half + 1) as u16;
            self.solid_rect(x as i16, (cy as i32 + dy) as i16, w, 1, color);
        }
    }

    /// One glyph at integer scale, top-left at (x, y)
    fn draw_char(&mut self, x: i16, y: i16, c: char, color: Rgb565, size: u16) {
        let size = size.max(1);
        let columns = font::glyph(c);
        for (i, column) in columns.iter().enumerate() {
            for j in 0..font::GLYPH_HEIGHT {
                if column & (1 << j) == 0 {
                    continue;
                }
                let px = x as i32 + i as i32 * size as i32;
                let py = y as i32 + j as i32 * size as i32;
                if size == 1 {
                    self.pixel(px as i16, py as i16, color);
                } else {
                    self.solid_rect(px as i16, py as i16, size, size, color);
                }
            }
        }
    }

    /// Draw a string, wrapping at the right edge and on newlines
    fn draw_text(&mut self, x: i16, y: i16, text: &str, color: Rgb565, size: u16) {
        let size = size.max(1);
        let (width, _) = self.dimensions();
        let advance = font::GLYPH_WIDTH as i32 * size as i32;
        let line_height = font::GLYPH_HEIGHT as i32 * size as i32;
        let mut cx = x as i32;
        let mut cy = y as i32;
        for c in text.chars() {
            if c == '\n' {
                cx = x as i32;
                cy += line_height;
                continue;
            }
            if cx + advance > width as i32 {
                cx = 0;
                cy += line_height;
            }
            self.draw_char(cx as i16, cy as i16, c, color, size);
            cx += advance;
        }
    }

    /// Draw a string without wrapping, for scroll regions
    fn draw_text_clipped(&mut self, x: i16, y: i16, text: &str, color: Rgb565, size: u16) {
        let size = size.max(1);
        let advance = font::GLYPH_WIDTH as i32 * size as i32;
        let mut cx = x as i32;
        for c in text.chars() {
            self.draw_char(cx as i16, y, c, color, size);
            cx += advance;
        }
    }

    /// Draw a string horizontally centered at row y
    fn draw_text_centered(&mut self, y: i16, text: &str, color: Rgb565, size: u16) {
        let (width, _) = self.dimensions();
        let w = text_width(text, size) as i32;
        let x = (width as i32 - w) / 2;
        self.draw_text_clipped(x as i16, y, text, color, size);
    }
}

impl Draw for FlushEngine {
    fn dimensions(&self) -> (u16, u16) {
        (self.width(), self.height())
    }

    fn pixel(&mut self, x: i16, y: i16, color: Rgb565) {
        self.set_pixel(x, y, color);
    }

    fn solid_rect(&mut self, x: i16, y: i16, w: u16, h: u16, color: Rgb565) {
        self.fill_rect(x, y, w, h, color);
    }
}

/// Integer square root by counting up; operands stay below 2^15
fn isqrt(v: i32) -> i32 {
    let mut x = 0;
    while (x + 1) * (x + 1) <= v {
        x += 1;
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_gfx::BufferMode;

    fn engine() -> FlushEngine {
        let mut engine = FlushEngine::new(48, 48);
        engine
            .begin_buffering(BufferMode::Single)
            .expect("allocation");
        engine
    }

    #[test]
    fn test_horizontal_line() {
        let mut e = engine();
        e.draw_line(2, 5, 10, 5, Rgb565::WHITE);
        for x in 2..=10 {
            assert_eq!(e.get_pixel(x, 5), Some(Rgb565::WHITE));
        }
        assert_eq!(e.get_pixel(1, 5), Some(Rgb565::BLACK));
        assert_eq!(e.get_pixel(11, 5), Some(Rgb565::BLACK));
    }

    #[test]
    fn test_diagonal_line_hits_endpoints() {
        let mut e = engine();
        e.draw_line(0, 0, 9, 6, Rgb565::RED);
        assert_eq!(e.get_pixel(0, 0), Some(Rgb565::RED));
        assert_eq!(e.get_pixel(9, 6), Some(Rgb565::RED));
    }

    #[test]
    fn test_shallow_line_one_pixel_per_column() {
        let mut e = engine();
        e.draw_line(3, 2, 12, 9, Rgb565::WHITE);
        for x in 3..=12 {
            let lit = (0..48)
                .filter(|&y| e.get_pixel(x, y) == Some(Rgb565::WHITE))
                .count();
            assert_eq!(lit, 1, "column {}", x);
        }
    }

    #[test]
    fn test_rect_outline() {
        let mut e = engine();
        e.draw_rect(4, 4, 8, 6, Rgb565::GREEN);
        // corners and edges set
        assert_eq!(e.get_pixel(4, 4), Some(Rgb565::GREEN));
        assert_eq!(e.get_pixel(11, 9), Some(Rgb565::GREEN));
        assert_eq!(e.get_pixel(7, 4), Some(Rgb565::GREEN));
        assert_eq!(e.get_pixel(4, 7), Some(Rgb565::GREEN));
        // interior untouched
        assert_eq!(e.get_pixel(7, 6), Some(Rgb565::BLACK));
    }

    #[test]
    fn test_circle_cardinal_points() {
        let mut e = engine();
        e.draw_circle(20, 20, 10, Rgb565::CYAN);
        assert_eq!(e.get_pixel(30, 20), Some(Rgb565::CYAN));
        assert_eq!(e.get_pixel(10, 20), Some(Rgb565::CYAN));
        assert_eq!(e.get_pixel(20, 30), Some(Rgb565::CYAN));
        assert_eq!(e.get_pixel(20, 10), Some(Rgb565::CYAN));
        // center stays clear
        assert_eq!(e.get_pixel(20, 20), Some(Rgb565::BLACK));
    }

    #[test]
    fn test_fill_circle_covers_interior() {
        let mut e = engine();
        e.fill_circle(20, 20, 8, Rgb565::YELLOW);
        assert_eq!(e.get_pixel(20, 20), Some(Rgb565::YELLOW));
        assert_eq!(e.get_pixel(24, 24), Some(Rgb565::YELLOW));
        assert_eq!(e.get_pixel(28, 20), Some(Rgb565::YELLOW));
        // outside the radius
        assert_eq!(e.get_pixel(29, 20), Some(Rgb565::BLACK));
        assert_eq!(e.get_pixel(27, 27), Some(Rgb565::BLACK));
    }

    #[test]
    fn test_draw_char_pixels() {
        let mut e = engine();
        // '!' at origin: column 2 has rows 0-4 and 6 set
        e.draw_char(0, 0, '!', Rgb565::WHITE, 1);
        assert_eq!(e.get_pixel(2, 0), Some(Rgb565::WHITE));
        assert_eq!(e.get_pixel(2, 4), Some(Rgb565::WHITE));
        assert_eq!(e.get_pixel(2, 5), Some(Rgb565::BLACK));
        assert_eq!(e.get_pixel(2, 6), Some(Rgb565::WHITE));
        assert_eq!(e.get_pixel(2, 7), Some(Rgb565::BLACK));
        assert_eq!(e.get_pixel(0, 0), Some(Rgb565::BLACK));
    }

    #[test]
    fn test_draw_char_scaled() {
        let mut e = engine();
        e.draw_char(0, 0, '!', Rgb565::WHITE, 2);
        // each font pixel becomes a 2x2 block
        assert_eq!(e.get_pixel(4, 0), Some(Rgb565::WHITE));
        assert_eq!(e.get_pixel(5, 1), Some(Rgb565::WHITE));
        assert_eq!(e.get_pixel(4, 10), Some(Rgb565::BLACK));
        assert_eq!(e.get_pixel(4, 12), Some(Rgb565::WHITE));
    }

    #[test]
    fn test_text_advance() {
        let mut e = engine();
        e.draw_text(0, 0, "!!", Rgb565::WHITE, 1);
        assert_eq!(e.get_pixel(2, 0), Some(Rgb565::WHITE));
        assert_eq!(e.get_pixel(8, 0), Some(Rgb565::WHITE));
    }

    #[test]
    fn test_text_wraps_at_right_edge() {
        let mut e = engine();
        // 48 px wide = 8 glyphs per row at size 1; the 9th wraps
        e.draw_text(0, 0, "!!!!!!!!!", Rgb565::WHITE, 1);
        assert_eq!(e.get_pixel(2, 8), Some(Rgb565::WHITE));
    }

    #[test]
    fn test_text_width() {
        assert_eq!(text_width("", 1), 0);
        assert_eq!(text_width("abc", 1), 18);
        assert_eq!(text_width("abc", 2), 36);
        assert_eq!(text_width("abc", 0), 18);
    }

    #[test]
    fn test_centered_text_position() {
        let mut e = engine();
        // one glyph, 6 px wide on a 48 px screen: starts at x = 21
        e.draw_text_centered(10, "!", Rgb565::WHITE, 1);
        assert_eq!(e.get_pixel(23, 10), Some(Rgb565::WHITE));
    }

    #[test]
    fn test_isqrt() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(1), 1);
        assert_eq!(isqrt(3), 1);
        assert_eq!(isqrt(4), 2);
        assert_eq!(isqrt(63), 7);
        assert_eq!(isqrt(64), 8);
    }
}
