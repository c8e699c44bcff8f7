//! MAX7219 LED Matrix Driver
//!
//! Driver for a single 8x8 matrix behind a MAX7219 controller via SPI.
//! The chip latches one 16-bit register write per chip-select pulse:
//! an address byte followed by a data byte.

use embassy_rp::gpio::Output;
use embedded_hal::spi::SpiBus;

use simile_core::traits::MatrixDisplay;
use simile_protocol::codec::MATRIX_SIZE;

/// MAX7219 registers
#[allow(dead_code)]
mod reg {
    pub const NO_OP: u8 = 0x00;
    /// Digit registers are 0x01..=0x08, one per matrix row
    pub const DIGIT_0: u8 = 0x01;
    pub const DECODE_MODE: u8 = 0x09;
    pub const INTENSITY: u8 = 0x0A;
    pub const SCAN_LIMIT: u8 = 0x0B;
    pub const SHUTDOWN: u8 = 0x0C;
    pub const DISPLAY_TEST: u8 = 0x0F;
}

/// Default brightness (0x00-0x0F)
const INTENSITY: u8 = 0x07;

/// MAX7219 matrix driver
///
/// Generic over the SPI bus; the chip-select line is driven manually
/// because the MAX7219 latches on CS rising edge.
pub struct Max7219<SPI> {
    spi: SPI,
    cs: Output<'static>,
    /// Staged frame, one byte per row, MSB = leftmost column
    buffer: [u8; MATRIX_SIZE],
}

impl<SPI> Max7219<SPI>
where
    SPI: SpiBus<u8>,
{
    /// Create a new driver with a dark staged frame
    pub fn new(spi: SPI, cs: Output<'static>) -> Self {
        Self {
            spi,
            cs,
            buffer: [0; MATRIX_SIZE],
        }
    }

    /// Initialize the chip: raw pixel mode, all rows scanned, mid
    /// brightness, test mode off, shutdown off, display dark
    pub fn init(&mut self) -> Result<(), SPI::Error> {
        self.write_register(reg::DECODE_MODE, 0x00)?;
        self.write_register(reg::SCAN_LIMIT, 0x07)?;
        self.write_register(reg::INTENSITY, INTENSITY)?;
        self.write_register(reg::DISPLAY_TEST, 0x00)?;
        self.write_register(reg::SHUTDOWN, 0x01)?;

        self.buffer = [0; MATRIX_SIZE];
        self.flush_rows()
    }

    /// Darken the panel immediately, bypassing the staged frame
    pub fn blank(&mut self) -> Result<(), SPI::Error> {
        self.buffer = [0; MATRIX_SIZE];
        self.flush_rows()
    }

    /// Send one register write, latched by the CS pulse
    fn write_register(&mut self, register: u8, value: u8) -> Result<(), SPI::Error> {
        self.cs.set_low();
        let result = self.spi.write(&[register, value]);
        self.cs.set_high();
        result
    }

    fn flush_rows(&mut self) -> Result<(), SPI::Error> {
        for row in 0..MATRIX_SIZE {
            self.write_register(reg::DIGIT_0 + row as u8, self.buffer[row])?;
        }
        Ok(())
    }
}

impl<SPI> MatrixDisplay for Max7219<SPI>
where
    SPI: SpiBus<u8>,
{
    type Error = SPI::Error;

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.buffer = [0; MATRIX_SIZE];
        Ok(())
    }

    fn set_pixel(&mut self, x: u8, y: u8) -> Result<(), Self::Error> {
        if (x as usize) < MATRIX_SIZE && (y as usize) < MATRIX_SIZE {
            self.buffer[y as usize] |= 1 << (7 - x);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.flush_rows()
    }
}
