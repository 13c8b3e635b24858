//! Serial response transmit task
//!
//! Formats queued replies and writes them to the UART, one line each,
//! CRLF-terminated. Formatting happens here so the channel carries small
//! values instead of full lines.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use crate::channels::{Reply, RESPONSE_CHANNEL};

/// Response TX task - writes reply lines to the host
#[embassy_executor::task]
pub async fn response_tx_task(mut tx: BufferedUartTx) {
    info!("Response TX task started");

    loop {
        let reply = RESPONSE_CHANNEL.receive().await;
        let result = match reply {
            Reply::Line(resp) => write_line(&mut tx, resp.to_line().as_str()).await,
            Reply::Status(report) => write_line(&mut tx, report.to_json().as_str()).await,
        };
        if let Err(e) = result {
            warn!("UART write error: {:?}", e);
        }
    }
}

/// Write one reply line with its CRLF terminator
async fn write_line(tx: &mut BufferedUartTx, line: &str) -> Result<(), embassy_rp::uart::Error> {
    trace!("TX: {=str}", line);
    tx.write_all(line.as_bytes()).await?;
    tx.write_all(b"\r\n").await?;
    Ok(())
}
