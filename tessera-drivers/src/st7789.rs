//! ST7789 TFT panel driver (4-wire SPI)
//!
//! Blocking driver for 240x240 IPS panels built on the ST7789 controller,
//! such as the Waveshare Pico-LCD-1.3. Implements the `tessera-gfx`
//! [`PixelSink`] so a flush engine can stream dirty regions straight to
//! the glass.
//!
//! # Wire protocol
//!
//! 4-wire SPI: the D/C pin selects command bytes (low) or parameter and
//! pixel bytes (high). Pixels are RGB565, two bytes each, high byte first.
//! The controller RAM is 240x320; square glass exposes a 240x240 window
//! into it, so the configured x/y offsets are added to every address range.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use tessera_gfx::{PixelSink, Rgb565};

/// ST7789 commands (the subset this driver uses)
#[allow(dead_code)]
pub mod cmd {
    /// Software reset
    pub const SWRESET: u8 = 0x01;
    /// Enter sleep mode
    pub const SLPIN: u8 = 0x10;
    /// Exit sleep mode
    pub const SLPOUT: u8 = 0x11;
    /// Normal display mode on
    pub const NORON: u8 = 0x13;
    /// Display inversion on
    pub const INVON: u8 = 0x21;
    /// Display off
    pub const DISPOFF: u8 = 0x28;
    /// Display on
    pub const DISPON: u8 = 0x29;
    /// Column address set
    pub const CASET: u8 = 0x2A;
    /// Row address set
    pub const RASET: u8 = 0x2B;
    /// Memory write
    pub const RAMWR: u8 = 0x2C;
    /// Memory data access control (orientation)
    pub const MADCTL: u8 = 0x36;
    /// Interface pixel format
    pub const COLMOD: u8 = 0x3A;
}

/// COLMOD parameter for 16-bit RGB565
const COLMOD_16BPP: u8 = 0x55;

/// Staging buffer size in bytes; holds one full 240-pixel row per chunk
const STAGE_BYTES: usize = 512;

/// Panel errors: either the SPI bus or a control pin failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelError<SpiE, PinE> {
    /// SPI transfer failed
    Spi(SpiE),
    /// D/C, CS or RST pin failed
    Pin(PinE),
}

impl<SpiE, PinE> From<SpiE> for PanelError<SpiE, PinE> {
    fn from(e: SpiE) -> Self {
        Self::Spi(e)
    }
}

/// Panel geometry and orientation
///
/// `x_offset`/`y_offset` locate the visible glass inside the 240x320
/// controller RAM. With the default orientation (`MADCTL` 0) the window
/// starts at row 0; a 180-degree flip (`MADCTL` 0xC0) moves it to row 80.
#[derive(Debug, Clone)]
pub struct St7789Config {
    pub width: u16,
    pub height: u16,
    pub x_offset: u16,
    pub y_offset: u16,
    pub madctl: u8,
}

impl Default for St7789Config {
    fn default() -> Self {
        Self {
            width: 240,
            height: 240,
            x_offset: 0,
            y_offset: 0,
            madctl: 0x00,
        }
    }
}

/// ST7789 driver owning the bus and the D/C, CS and RST control pins
pub struct St7789<SPI, DC, CS, RST> {
    spi: SPI,
    dc: DC,
    cs: CS,
    rst: RST,
    config: St7789Config,
    stage: [u8; STAGE_BYTES],
}

impl<SPI, DC, CS, RST, PinE> St7789<SPI, DC, CS, RST>
where
    SPI: SpiBus,
    DC: OutputPin<Error = PinE>,
    CS: OutputPin<Error = PinE>,
    RST: OutputPin<Error = PinE>,
{
    pub fn new(spi: SPI, dc: DC, cs: CS, rst: RST, config: St7789Config) -> Self {
        Self {
            spi,
            dc,
            cs,
            rst,
            config,
            stage: [0; STAGE_BYTES],
        }
    }

    /// Run the power-up sequence. Call once at startup.
    pub fn init(
        &mut self,
        delay: &mut impl DelayNs,
    ) -> Result<(), PanelError<SPI::Error, PinE>> {
        // Hardware reset pulse, then give the controller time to settle
        self.rst.set_high().map_err(PanelError::Pin)?;
        delay.delay_ms(10);
        self.rst.set_low().map_err(PanelError::Pin)?;
        delay.delay_ms(10);
        self.rst.set_high().map_err(PanelError::Pin)?;
        delay.delay_ms(120);

        self.command(cmd::SWRESET, &[])?;
        delay.delay_ms(150);
        self.command(cmd::SLPOUT, &[])?;
        delay.delay_ms(120);

        self.command(cmd::COLMOD, &[COLMOD_16BPP])?;
        self.command(cmd::MADCTL, &[self.config.madctl])?;
        // IPS glass shows inverted colors without INVON
        self.command(cmd::INVON, &[])?;
        self.command(cmd::NORON, &[])?;
        delay.delay_ms(10);
        self.command(cmd::DISPON, &[])?;
        delay.delay_ms(20);
        Ok(())
    }

    /// Enter minimum-power sleep; RAM contents are retained
    pub fn sleep_in(
        &mut self,
        delay: &mut impl DelayNs,
    ) -> Result<(), PanelError<SPI::Error, PinE>> {
        self.command(cmd::SLPIN, &[])?;
        delay.delay_ms(5);
        Ok(())
    }

    /// Wake from sleep; the panel needs 120 ms before the next command
    pub fn sleep_out(
        &mut self,
        delay: &mut impl DelayNs,
    ) -> Result<(), PanelError<SPI::Error, PinE>> {
        self.command(cmd::SLPOUT, &[])?;
        delay.delay_ms(120);
        Ok(())
    }

    /// Send one command with its parameter bytes as a chip-select framed
    /// transaction
    fn command(
        &mut self,
        opcode: u8,
        params: &[u8],
    ) -> Result<(), PanelError<SPI::Error, PinE>> {
        self.cs.set_low().map_err(PanelError::Pin)?;
        self.dc.set_low().map_err(PanelError::Pin)?;
        self.spi.write(&[opcode])?;
        if !params.is_empty() {
            self.dc.set_high().map_err(PanelError::Pin)?;
            self.spi.write(params)?;
        }
        self.spi.flush()?;
        self.cs.set_high().map_err(PanelError::Pin)?;
        Ok(())
    }
}

impl<SPI, DC, CS, RST, PinE> PixelSink for St7789<SPI, DC, CS, RST>
where
    SPI: SpiBus,
    DC: OutputPin<Error = PinE>,
    CS: OutputPin<Error = PinE>,
    RST: OutputPin<Error = PinE>,
{
    type Error = PanelError<SPI::Error, PinE>;

    fn set_window(&mut self, x: u16, y: u16, w: u16, h: u16) -> Result<(), Self::Error> {
        // The flush engine clips before streaming; this guards raw callers
        if w == 0 || h == 0 || x >= self.config.width || y >= self.config.height {
            return Ok(());
        }
        let x0 = x + self.config.x_offset;
        let x1 = (x + w - 1).min(self.config.width - 1) + self.config.x_offset;
        let y0 = y + self.config.y_offset;
        let y1 = (y + h - 1).min(self.config.height - 1) + self.config.y_offset;

        self.command(cmd::CASET, &encode_range(x0, x1))?;
        self.command(cmd::RASET, &encode_range(y0, y1))?;
        self.command(cmd::RAMWR, &[])
    }

    fn write_pixels(&mut self, pixels: &[Rgb565]) -> Result<(), Self::Error> {
        if pixels.is_empty() {
            return Ok(());
        }
        // RAMWR stays active across chip-select deassert until the next
        // command byte, so each call can be its own framed transaction.
        self.cs.set_low().map_err(PanelError::Pin)?;
        self.dc.set_high().map_err(PanelError::Pin)?;
        let mut rest = pixels;
        while !rest.is_empty() {
            let used = pack_pixels(&mut self.stage, rest);
            self.spi.write(&self.stage[..used])?;
            rest = &rest[used / 2..];
        }
        self.spi.flush()?;
        self.cs.set_high().map_err(PanelError::Pin)?;
        Ok(())
    }
}

/// Encode a CASET/RASET address range as the four parameter bytes
fn encode_range(start: u16, end: u16) -> [u8; 4] {
    [
        (start >> 8) as u8,
        start as u8,
        (end >> 8) as u8,
        end as u8,
    ]
}

/// Pack pixels into the staging buffer as big-endian byte pairs
///
/// Returns the number of staged bytes; always even, at most `stage.len()`
/// rounded down to a whole pixel.
fn pack_pixels(stage: &mut [u8], pixels: &[Rgb565]) -> usize {
    let count = pixels.len().min(stage.len() / 2);
    for (i, px) in pixels[..count].iter().enumerate() {
        let [hi, lo] = px.to_be_bytes();
        stage[i * 2] = hi;
        stage[i * 2 + 1] = lo;
    }
    count * 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_range() {
        assert_eq!(encode_range(0, 239), [0x00, 0x00, 0x00, 0xEF]);
        assert_eq!(encode_range(80, 319), [0x00, 0x50, 0x01, 0x3F]);
    }

    #[test]
    fn test_pack_pixels_big_endian() {
        let mut stage = [0u8; 8];
        let used = pack_pixels(&mut stage, &[Rgb565::RED, Rgb565::BLUE]);
        assert_eq!(used, 4);
        assert_eq!(&stage[..4], &[0xF8, 0x00, 0x00, 0x1F]);
    }

    #[test]
    fn test_pack_pixels_caps_at_stage_capacity() {
        let mut stage = [0u8; 4];
        let pixels = [Rgb565::WHITE; 5];
        assert_eq!(pack_pixels(&mut stage, &pixels), 4);
    }

    #[test]
    fn test_stage_holds_a_full_row() {
        // Region flushes stream row by row; a 240-pixel row must fit in
        // one chunk so each row is a single SPI write
        assert!(STAGE_BYTES / 2 >= 240);
    }

    #[test]
    fn test_config_default_geometry() {
        let config = St7789Config::default();
        assert_eq!(config.width, 240);
        assert_eq!(config.height, 240);
        assert_eq!(config.x_offset, 0);
        assert_eq!(config.y_offset, 0);
    }
}
