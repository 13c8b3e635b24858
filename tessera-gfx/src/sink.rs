//! Hardware boundary for pixel transfers
//!
//! The engine talks to the panel through exactly two operations: select a
//! window, stream pixels into it. Anything else a display controller can
//! do (init, sleep, inversion, backlight) belongs to the driver crate and
//! never leaks in here.

use crate::color::Rgb565;

/// A pixel-oriented display controller accepting windowed writes
///
/// `write_pixels` streams row-major into the window selected by the last
/// `set_window`; the controller's internal write pointer advances and
/// wraps within that window, so one window may be filled by several
/// `write_pixels` calls (the engine streams large regions row by row).
pub trait PixelSink {
    /// Transfer error, propagated out of flush unchanged
    type Error;

    /// Select the target rectangle for subsequent pixel data
    fn set_window(&mut self, x: u16, y: u16, w: u16, h: u16) -> Result<(), Self::Error>;

    /// Stream pixels into the current window, row-major
    fn write_pixels(&mut self, pixels: &[Rgb565]) -> Result<(), Self::Error>;
}
