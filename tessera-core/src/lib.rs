//! Board-agnostic renderers and UI state for the display controller
//!
//! Everything here draws through the flush engine and is driven by the
//! control loop with a monotonic millisecond clock:
//!
//! - Bitmap font and shape/text drawing primitives
//! - Scrolling text ticker
//! - Frame-sequence animation playback
//! - Clock face with simplified civil time
//! - Self-playing snake
//! - Demo screen cycle
//! - UI mode and sleep state
//!
//! Renderers report whether they drew anything; the controller owns the
//! flush. None of them touch hardware, so the whole crate tests on host.

#![no_std]
#![deny(unsafe_code)]

pub mod anim;
pub mod clock;
pub mod demo;
pub mod draw;
pub mod font;
pub mod mode;
pub mod scroll;
pub mod snake;

pub use anim::{Animation, AnimationFrame, AnimationPlayer};
pub use clock::ClockFace;
pub use demo::DemoCycle;
pub use draw::{text_width, Draw};
pub use mode::UiState;
pub use scroll::ScrollTicker;
pub use snake::SnakeGame;
