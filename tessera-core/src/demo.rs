//! Built-in demo cycle
//!
//! Rotates through a few self-contained screens to show the panel off when
//! no host is driving it. Layout scales off the engine dimensions.

use tessera_gfx::{FlushEngine, Rgb565};

use crate::draw::Draw;

/// Time each screen stays up
pub const SCREEN_HOLD_MS: u32 = 3000;
/// Number of screens in the cycle
pub const SCREEN_COUNT: u8 = 4;

const BAR_COLORS: [Rgb565; 8] = [
    Rgb565::RED,
    Rgb565::ORANGE,
    Rgb565::YELLOW,
    Rgb565::GREEN,
    Rgb565::CYAN,
    Rgb565::BLUE,
    Rgb565::MAGENTA,
    Rgb565::WHITE,
];

/// Rotating demo screens
pub struct DemoCycle {
    screen: u8,
    last_switch_ms: u32,
}

impl DemoCycle {
    pub fn new() -> Self {
        Self {
            screen: 0,
            last_switch_ms: 0,
        }
    }

    pub fn get_screen(&self) -> u8 {
        self.screen
    }

    /// Draw the current screen immediately, for mode entry
    pub fn show(&mut self, engine: &mut FlushEngine, now_ms: u32) {
        self.last_switch_ms = now_ms;
        self.draw(engine);
    }

    /// Advance to the next screen once the hold time has elapsed
    ///
    /// Returns true when a new screen was drawn and needs a flush.
    pub fn tick(&mut self, engine: &mut FlushEngine, now_ms: u32) -> bool {
        if now_ms.wrapping_sub(self.last_switch_ms) < SCREEN_HOLD_MS {
            return false;
        }
        self.last_switch_ms = now_ms;
        self.screen = (self.screen + 1) % SCREEN_COUNT;
        self.draw(engine);
        true
    }

    fn draw(&self, engine: &mut FlushEngine) {
        engine.clear(Rgb565::BLACK);
        match self.screen {
            0 => draw_title(engine),
            1 => draw_bars(engine),
            2 => draw_shapes(engine),
            _ => draw_type_sizes(engine),
        }
    }
}

impl Default for DemoCycle {
    fn default() -> Self {
        Self::new()
    }
}

fn draw_title(engine: &mut FlushEngine) {
    let w = engine.width() as i16;
    let h = engine.height() as i16;
    engine.draw_text_centered(h / 3, "Tessera", Rgb565::WHITE, 3);
    engine.draw_text_centered(h / 2, "Demo Mode", Rgb565::CYAN, 1);
    engine.draw_line(w / 6, 2 * h / 3, 5 * w / 6, 2 * h / 3, Rgb565::BLUE);
}

fn draw_bars(engine: &mut FlushEngine) {
    let bar_w = engine.width() / BAR_COLORS.len() as u16;
    let h = engine.height();
    for (i, color) in BAR_COLORS.iter().enumerate() {
        engine.fill_rect((i as u16 * bar_w) as i16, 0, bar_w, h, *color);
    }
}

fn draw_shapes(engine: &mut FlushEngine) {
    let w = engine.width() as i16;
    let h = engine.height() as i16;
    engine.draw_circle(w / 4, h / 2, (h / 6) as u16, Rgb565::CYAN);
    engine.fill_circle(3 * w / 4, h / 2, (h / 8) as u16, Rgb565::MAGENTA);
    engine.draw_rect(w / 3, h / 3, (w / 3) as u16, (h / 3) as u16, Rgb565::YELLOW);
    engine.draw_line(0, 0, w - 1, h - 1, Rgb565::GREEN);
    engine.draw_line(w - 1, 0, 0, h - 1, Rgb565::GREEN);
}

fn draw_type_sizes(engine: &mut FlushEngine) {
    let h = engine.height() as i16;
    engine.draw_text_centered(h / 5, "Size 1", Rgb565::WHITE, 1);
    engine.draw_text_centered(2 * h / 5, "Size 2", Rgb565::YELLOW, 2);
    engine.draw_text_centered(3 * h / 5, "Size 3", Rgb565::ORANGE, 3);
}
