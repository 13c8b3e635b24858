//! Scrolling text ticker
//!
//! Carries its scroll position and step timing as explicit state so several
//! tickers can run at once and tests can drive them deterministically.

use heapless::String;
use tessera_gfx::{FlushEngine, Rgb565};

use crate::draw::{text_width, Draw};
use crate::font;

/// Longest ticker text
pub const MAX_TICKER_TEXT: usize = 96;

/// Milliseconds between scroll steps
pub const SCROLL_STEP_MS: u32 = 20;

/// Text scrolling right-to-left across a fixed band
pub struct ScrollTicker {
    text: String<MAX_TICKER_TEXT>,
    y: i16,
    speed: u16,
    color: Rgb565,
    size: u16,
    scrolled: u32,
    last_step_ms: u32,
}

impl ScrollTicker {
    /// New ticker; text beyond [`MAX_TICKER_TEXT`] characters is truncated
    pub fn new(text: &str, y: i16, speed: u16, color: Rgb565, size: u16) -> Self {
        let mut owned = String::new();
        for c in text.chars() {
            if owned.push(c).is_err() {
                break;
            }
        }
        Self {
            text: owned,
            y,
            speed: speed.max(1),
            color,
            size: size.max(1),
            scrolled: 0,
            last_step_ms: 0,
        }
    }

    /// Restart from the right edge
    pub fn reset(&mut self) {
        self.scrolled = 0;
        self.last_step_ms = 0;
    }

    /// Advance and redraw once the step interval has elapsed
    ///
    /// Returns true when the band was redrawn and needs a flush.
    pub fn tick(&mut self, engine: &mut FlushEngine, now_ms: u32) -> bool {
        if now_ms.wrapping_sub(self.last_step_ms) < SCROLL_STEP_MS {
            return false;
        }
        self.last_step_ms = now_ms;

        let width = engine.width();
        let band_h = font::GLYPH_HEIGHT * self.size;
        let x = width as i32 - self.scrolled as i32;

        engine.fill_rect(0, self.y, width, band_h, Rgb565::BLACK);
        engine.draw_text_clipped(x as i16, self.y, &self.text, self.color, self.size);

        self.scrolled += self.speed as u32;
        if self.scrolled > width as u32 + text_width(&self.text, self.size) {
            self.scrolled = 0;
        }
        true
    }
}
