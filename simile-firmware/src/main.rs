//! Simile - 8x8 LED Matrix Animation Firmware
//!
//! Main firmware binary for RP2040-based boards driving a MAX7219
//! 8x8 LED matrix. Animations arrive as text lines over UART and are
//! replayed with per-frame timing; see `simile-protocol` for the line
//! format.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::UART0;
use embassy_rp::spi::{self, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use crate::max7219::Max7219;

mod channels;
mod max7219;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
// The RX side sees multi-kilobyte definition lines, so it gets the
// larger share.
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 1024]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Simile firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Setup UART for host communication
    let uart_config = UartConfig::default(); // 115200 baud default

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 1024]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for host communication");

    // Setup SPI for the MAX7219 matrix driver
    // Pin assignments: CLK=GPIO18, MOSI=GPIO19, CS=GPIO17
    let mut spi_config = spi::Config::default();
    spi_config.frequency = 1_000_000;

    let spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi_config);
    let cs = Output::new(p.PIN_17, Level::High);

    let mut matrix = Max7219::new(spi, cs);
    if let Err(e) = matrix.init() {
        error!("Failed to initialize matrix: {:?}", e);
    } else {
        info!("Matrix initialized");
    }

    // Spawn tasks
    spawner.spawn(tasks::serial_rx_task(rx)).unwrap();
    spawner.spawn(tasks::matrix_task(tx, matrix)).unwrap();

    info!("All tasks spawned");
}
