//! Serial command receive task
//!
//! Reads bytes from the UART, assembles newline-delimited lines and
//! parses them into commands for the controller. Malformed lines are
//! answered with an ERROR reply right here; the controller only ever
//! sees well-formed commands.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use tessera_protocol::{Command, CommandError, LineBuffer, LineError, Response};

use crate::channels::{Reply, COMMAND_CHANNEL, RESPONSE_CHANNEL};

/// Buffer size for UART reads
const RX_BUF_SIZE: usize = 64;

/// Command RX task - assembles and parses command lines from the host
#[embassy_executor::task]
pub async fn command_rx_task(mut rx: BufferedUartRx) {
    info!("Command RX task started");

    let mut lines = LineBuffer::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);
                for &byte in &buf[..n] {
                    match lines.feed(byte) {
                        Ok(Some(line)) => handle_line(line.as_str()).await,
                        Ok(None) => {}
                        Err(e) => {
                            warn!("Line assembly error: {:?}", e);
                            let reason = match e {
                                LineError::TooLong => "Line too long",
                                LineError::InvalidUtf8 => "Invalid encoding",
                            };
                            RESPONSE_CHANNEL.send(Reply::Line(Response::Error(reason))).await;
                        }
                    }
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

/// Parse one line and hand the command to the controller
async fn handle_line(line: &str) {
    match Command::parse(line) {
        Ok(cmd) => {
            debug!("Command: {:?}", cmd);
            COMMAND_CHANNEL.send(cmd).await;
        }
        // Blank lines are keep-alive noise, not errors
        Err(CommandError::Empty) => {}
        Err(e) => {
            warn!("Rejected line {=str}: {:?}", line, e);
            RESPONSE_CHANNEL.send(Reply::Line(Response::from(e))).await;
        }
    }
}
