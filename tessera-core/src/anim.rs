//! Frame-sequence animation playback
//!
//! Frames are flash-resident RGB565 blocks with per-frame durations. The
//! player holds the sequence position; the control loop drives it with a
//! monotonic millisecond clock and flushes when a frame was drawn.

use tessera_gfx::{FlushEngine, Rgb565};

/// One animation frame: pixel block plus display duration
#[derive(Clone, Copy)]
pub struct AnimationFrame {
    /// Row-major RGB565 pixels, `width * height` long
    pub data: &'static [Rgb565],
    pub width: u16,
    pub height: u16,
    pub duration_ms: u16,
}

/// A frame sequence with placement and loop policy
pub struct Animation {
    pub frames: &'static [AnimationFrame],
    /// Left edge; -1 centers horizontally
    pub x: i16,
    /// Top edge; -1 centers vertically
    pub y: i16,
    pub looping: bool,
    /// Clear the screen before every frame, for frames of varying size
    pub clear_background: bool,
}

/// Sequence position and frame timing
pub struct AnimationPlayer {
    current: Option<&'static Animation>,
    frame_index: usize,
    last_frame_ms: u32,
}

impl AnimationPlayer {
    pub fn new() -> Self {
        Self {
            current: None,
            frame_index: 0,
            last_frame_ms: 0,
        }
    }

    /// Start an animation and draw its first frame
    ///
    /// Returns true when a frame was drawn and needs a flush.
    pub fn play(
        &mut self,
        engine: &mut FlushEngine,
        anim: &'static Animation,
        now_ms: u32,
    ) -> bool {
        if anim.frames.is_empty() {
            return false;
        }
        self.current = Some(anim);
        self.frame_index = 0;
        self.render_frame(engine, true, now_ms)
    }

    /// Stop playback, leaving the last frame on screen
    pub fn stop(&mut self) {
        self.current = None;
        self.frame_index = 0;
    }

    pub fn is_playing(&self) -> bool {
        self.current.is_some()
    }

    /// Advance to the next frame once the current one has run its duration
    ///
    /// Returns true when a new frame was drawn and needs a flush. A
    /// non-looping animation stops after its last frame, which stays on
    /// screen.
    pub fn tick(&mut self, engine: &mut FlushEngine, now_ms: u32) -> bool {
        let anim = match self.current {
            Some(anim) => anim,
            None => return false,
        };
        let frame = &anim.frames[self.frame_index];
        if now_ms.wrapping_sub(self.last_frame_ms) < frame.duration_ms as u32 {
            return false;
        }

        self.frame_index += 1;
        if self.frame_index >= anim.frames.len() {
            if anim.looping {
                self.frame_index = 0;
            } else {
                self.stop();
                return false;
            }
        }
        self.render_frame(engine, false, now_ms)
    }

    fn render_frame(&mut self, engine: &mut FlushEngine, force_clear: bool, now_ms: u32) -> bool {
        let anim = match self.current {
            Some(anim) => anim,
            None => return false,
        };
        let frame = &anim.frames[self.frame_index];
        let clear_first = force_clear || anim.clear_background || frame.data.is_empty();

        if clear_first {
            engine.clear(Rgb565::BLACK);
        }

        if !frame.data.is_empty() {
            let x = if anim.x == -1 {
                (engine.width() as i32 - frame.width as i32) / 2
            } else {
                anim.x as i32
            };
            let y = if anim.y == -1 {
                (engine.height() as i32 - frame.height as i32) / 2
            } else {
                anim.y as i32
            };
            engine.blit_rect(x as i16, y as i16, frame.width, frame.height, frame.data);
        }

        self.last_frame_ms = now_ms;
        clear_first || !frame.data.is_empty()
    }
}

impl Default for AnimationPlayer {
    fn default() -> Self {
        Self::new()
    }
}
