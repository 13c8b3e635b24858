//! Panel driver implementations
//!
//! Concrete hardware drivers behind the `tessera-gfx` [`PixelSink`] seam:
//!
//! - ST7789 TFT controller (240x240 IPS panels over 4-wire SPI)
//!
//! [`PixelSink`]: tessera_gfx::PixelSink

#![no_std]
#![deny(unsafe_code)]

pub mod st7789;

pub use st7789::{PanelError, St7789, St7789Config};
