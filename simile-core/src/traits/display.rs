//! Display driver trait for the 8x8 matrix

use simile_protocol::Bitmap;

/// Trait for matrix display drivers
///
/// The driver owns a frame buffer; `clear` and `set_pixel` stage pixels
/// and `flush` pushes the staged frame to the hardware in one go, so a
/// repaint never flickers through a half-drawn state.
pub trait MatrixDisplay {
    /// Driver-specific error type
    type Error;

    /// Darken the whole staged frame
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Light the staged pixel at column `x`, row `y` (0-7 each)
    fn set_pixel(&mut self, x: u8, y: u8) -> Result<(), Self::Error>;

    /// Push the staged frame to the hardware
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Helper trait for rendering whole bitmaps
pub trait MatrixDisplayExt: MatrixDisplay {
    /// Render one bitmap: clear, light its pixels, flush
    ///
    /// The matrix is mounted rotated a quarter turn relative to the wire
    /// format; the fixed clockwise rotation applied here is what every
    /// displayed frame goes through.
    fn show(&mut self, bitmap: &Bitmap) -> Result<(), Self::Error> {
        self.clear()?;
        for (x, y) in bitmap.rotate_cw().iter_lit() {
            self.set_pixel(x, y)?;
        }
        self.flush()
    }
}

// Blanket implementation for all MatrixDisplay types
impl<T: MatrixDisplay> MatrixDisplayExt for T {}
