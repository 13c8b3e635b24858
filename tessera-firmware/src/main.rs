//! Tessera display controller firmware
//!
//! RP2040 firmware for the Waveshare Pico-LCD-1.3: an ST7789 panel fed by
//! the tessera flush engine, driven over UART0 by newline-delimited
//! commands (TEXT, MODE, SETTIME, ...). All rendering happens in the
//! controller task; the serial tasks only parse and format lines.

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::spi::{Config as SpiConfig, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Delay;
use embedded_alloc::LlffHeap as Heap;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use tessera_drivers::st7789::{St7789, St7789Config};

mod anim;
mod board;
mod channels;
mod tasks;

/// Heap size: 128KB, one full frame surface plus headroom. A second
/// surface does not fit, so requesting double buffering degrades.
const HEAP_SIZE: usize = 128 * 1024;

#[global_allocator]
static HEAP: Heap = Heap::empty();

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Tessera firmware starting...");

    // Initialize heap allocator
    init_heap();

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Setup UART for the command link
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = board::UART_BAUD;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for command link");

    // Panel SPI, transmit only: the ST7789 never talks back
    let mut spi_config = SpiConfig::default();
    spi_config.frequency = board::SPI_FREQ_HZ;
    let spi = Spi::new_blocking_txonly(p.SPI1, p.PIN_10, p.PIN_11, spi_config);

    let dc = Output::new(p.PIN_8, Level::Low);
    let cs = Output::new(p.PIN_9, Level::High);
    let rst = Output::new(p.PIN_12, Level::High);

    let panel_config = St7789Config {
        width: board::DISPLAY_WIDTH,
        height: board::DISPLAY_HEIGHT,
        x_offset: board::PANEL_X_OFFSET,
        y_offset: board::PANEL_Y_OFFSET,
        madctl: board::PANEL_MADCTL,
    };
    let mut panel = St7789::new(spi, dc, cs, rst, panel_config);
    if let Err(e) = panel.init(&mut Delay) {
        error!("Panel init failed: {:?}", e);
    } else {
        info!("Panel initialized");
    }

    // Backlight PWM; stays dark until the controller puts up a frame
    let backlight = Pwm::new_output_b(p.PWM_SLICE6, p.PIN_13, PwmConfig::default());

    // Spawn tasks
    spawner.spawn(tasks::tick_task()).unwrap();
    spawner.spawn(tasks::command_rx_task(rx)).unwrap();
    spawner.spawn(tasks::response_tx_task(tx)).unwrap();
    spawner.spawn(tasks::controller_task(panel, backlight)).unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}
