//! Board constants for the Waveshare Pico-LCD-1.3
//!
//! Pin mapping, fixed by the board layout:
//! UART0 TX/RX on GPIO 0/1, panel D/C on GPIO 8, CS on GPIO 9,
//! SCLK on GPIO 10 (SPI1), MOSI on GPIO 11 (SPI1), RST on GPIO 12,
//! backlight on GPIO 13 (PWM slice 6, channel B).

/// Panel geometry
pub const DISPLAY_WIDTH: u16 = 240;
pub const DISPLAY_HEIGHT: u16 = 240;

/// Visible window offsets inside the controller's 240x320 RAM
pub const PANEL_X_OFFSET: u16 = 0;
pub const PANEL_Y_OFFSET: u16 = 0;

/// Portrait orientation, RGB subpixel order
pub const PANEL_MADCTL: u8 = 0x00;

/// Panel SPI clock
pub const SPI_FREQ_HZ: u32 = 62_500_000;

/// Command link baud rate
pub const UART_BAUD: u32 = 115_200;

/// Backlight PWM counter top; brightness 0-255 maps directly onto duty
pub const BACKLIGHT_PWM_TOP: u16 = 255;

/// Backlight level at power-up
pub const DEFAULT_BRIGHTNESS: u8 = 255;
