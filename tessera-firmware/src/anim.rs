//! Built-in animation for CUSTOM mode
//!
//! A looping pulse baked into flash at compile time: a disc that breathes
//! through four radii. Stands in for host-uploaded content, which this
//! firmware has no transport for.

use tessera_core::{Animation, AnimationFrame};
use tessera_gfx::Rgb565;

/// Frame edge length in pixels
const SIDE: usize = 64;

/// Per-frame hold time
const FRAME_MS: u16 = 120;

/// Paint a centered disc of the given radius into a square frame
const fn disc_frame(radius: i32, color: Rgb565) -> [Rgb565; SIDE * SIDE] {
    let mut data = [Rgb565::BLACK; SIDE * SIDE];
    let center = SIDE as i32 / 2;
    let mut y = 0;
    while y < SIDE {
        let mut x = 0;
        while x < SIDE {
            let dx = x as i32 - center;
            let dy = y as i32 - center;
            if dx * dx + dy * dy <= radius * radius {
                data[y * SIDE + x] = color;
            }
            x += 1;
        }
        y += 1;
    }
    data
}

const fn frame(data: &'static [Rgb565]) -> AnimationFrame {
    AnimationFrame {
        data,
        width: SIDE as u16,
        height: SIDE as u16,
        duration_ms: FRAME_MS,
    }
}

static DISC_8: [Rgb565; SIDE * SIDE] = disc_frame(8, Rgb565::CYAN);
static DISC_14: [Rgb565; SIDE * SIDE] = disc_frame(14, Rgb565::CYAN);
static DISC_20: [Rgb565; SIDE * SIDE] = disc_frame(20, Rgb565::CYAN);
static DISC_26: [Rgb565; SIDE * SIDE] = disc_frame(26, Rgb565::CYAN);

/// Grow-then-shrink so the loop seam is invisible. Every frame covers the
/// full square, so no background clear is needed between frames.
static PULSE_FRAMES: [AnimationFrame; 6] = [
    frame(&DISC_8),
    frame(&DISC_14),
    frame(&DISC_20),
    frame(&DISC_26),
    frame(&DISC_20),
    frame(&DISC_14),
];

/// The breathing-disc loop, centered on screen
pub static PULSE: Animation = Animation {
    frames: &PULSE_FRAMES,
    x: -1,
    y: -1,
    looping: true,
    clear_background: false,
};
