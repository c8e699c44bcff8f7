//! Matrix engine task
//!
//! Sole owner of the engine, the display driver, and the UART transmit
//! side. Alternates between draining received lines and evaluating the
//! playback tick, so every store mutation and every playback read
//! happens on this one task.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::spi::{Blocking, Spi};
use embassy_rp::uart::BufferedUartTx;
use embassy_time::{Duration, Instant, Ticker};
use embedded_io_async::Write;
use heapless::String;

use simile_core::engine::Engine;
use simile_core::traits::MatrixDisplayExt;

use crate::channels::LINE_CHANNEL;
use crate::max7219::Max7219;

/// Scheduler tick interval in milliseconds
///
/// Sets timing resolution only; frames advance on elapsed time, never
/// early, so a missed tick just lands a frame change slightly late.
const TICK_INTERVAL_MS: u64 = 20;

/// Upper bound for one command's diagnostic response
const RESPONSE_LEN: usize = 512;

/// Matrix task - processes commands and drives playback
#[embassy_executor::task]
pub async fn matrix_task(
    mut tx: BufferedUartTx<'static>,
    mut matrix: Max7219<Spi<'static, Blocking>>,
) {
    info!("Matrix task started");

    let mut engine = Engine::new();
    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS));

    loop {
        match select(LINE_CHANNEL.receive(), ticker.next()).await {
            Either::First(line) => {
                let now_ms = Instant::now().as_millis();

                let mut response: String<RESPONSE_LEN> = String::new();
                if engine.handle_line(&line, now_ms, &mut response).is_err() {
                    // The command still took effect; only response text
                    // past the buffer end is lost.
                    warn!("Response truncated");
                }
                if !response.is_empty() {
                    if let Err(e) = tx.write_all(response.as_bytes()).await {
                        warn!("UART write error: {:?}", e);
                    }
                }

                // A wiped store means nothing is due anymore; darken the
                // panel rather than holding the last frame.
                if engine.store().is_empty() {
                    if let Err(e) = matrix.blank() {
                        warn!("SPI write error: {:?}", e);
                    }
                }
            }
            Either::Second(()) => {
                let now_ms = Instant::now().as_millis();
                if let Some(bitmap) = engine.tick(now_ms) {
                    if let Err(e) = matrix.show(bitmap) {
                        warn!("SPI write error: {:?}", e);
                    }
                }
            }
        }
    }
}
