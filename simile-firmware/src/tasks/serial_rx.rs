//! Serial receive task
//!
//! Accumulates UART bytes into protocol lines and hands complete lines
//! to the engine task.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use simile_protocol::LineReader;

use crate::channels::{Line, LINE_CHANNEL};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Serial RX task - receives and frames lines from the host
#[embassy_executor::task]
pub async fn serial_rx_task(mut rx: BufferedUartRx<'static>) {
    info!("Serial RX task started");

    let mut reader = LineReader::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                for &byte in &buf[..n] {
                    let Some(line) = reader.feed(byte) else {
                        continue;
                    };
                    // Reader and channel line bounds match, so this
                    // conversion cannot fail.
                    let Ok(line) = Line::try_from(line) else {
                        continue;
                    };
                    if LINE_CHANNEL.try_send(line).is_err() {
                        warn!("Line channel full, dropping line");
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
