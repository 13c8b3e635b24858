//! Pixel buffer and dirty-region flush engine
//!
//! This crate contains the memory side of the display pipeline, with no
//! dependency on a specific panel or bus:
//!
//! - 16-bit RGB565 color values
//! - Rectangle geometry with clipping
//! - Pixel surfaces (display-sized in-memory images)
//! - Dirty-region tracking with bounded bookkeeping
//! - The flush engine that turns dirty state into bus transfers
//! - The `PixelSink` trait the hardware driver implements
//!
//! The design goal is minimal bus traffic: writes go into a RAM surface
//! and only the regions that actually changed are retransmitted on flush.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod color;
pub mod dirty;
pub mod engine;
pub mod rect;
pub mod sink;
pub mod surface;

pub use color::Rgb565;
pub use dirty::{DirtyTracker, MAX_DIRTY_REGIONS};
pub use engine::{BufferMode, EngineError, FlushEngine, SetModeOutcome};
pub use rect::Rect;
pub use sink::PixelSink;
pub use surface::{AllocError, PixelSurface};
