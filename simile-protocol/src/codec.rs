//! Frame token encoding and decoding.
//!
//! Token format:
//! - PATTERN (64 chars): `'0'`/`'1'`, row-major, most significant bit is
//!   the leftmost column
//! - SEPARATOR (1 char): `':'`
//! - DURATION: decimal seconds, terminated by a space or end of line

use core::fmt;

/// Matrix edge length in pixels
pub const MATRIX_SIZE: usize = 8;

/// Number of pattern characters in a frame token
pub const FRAME_BITS: usize = MATRIX_SIZE * MATRIX_SIZE;

/// Errors that can occur while decoding a frame token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodecError {
    /// Pattern character other than '0'/'1' (or pattern cut short)
    InvalidCharacter,
    /// Colon absent after the 64-character pattern
    MissingSeparator,
    /// Duration not a number, or not strictly positive
    InvalidDuration,
}

/// A packed 8x8 monochrome bitmap
///
/// One byte per row, most significant bit is the leftmost column.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bitmap([u8; MATRIX_SIZE]);

impl Bitmap {
    /// Create an all-dark bitmap
    pub const fn new() -> Self {
        Self([0; MATRIX_SIZE])
    }

    /// Create a bitmap from packed rows
    pub const fn from_rows(rows: [u8; MATRIX_SIZE]) -> Self {
        Self(rows)
    }

    /// Packed row bytes
    pub const fn rows(&self) -> &[u8; MATRIX_SIZE] {
        &self.0
    }

    /// Pixel at column `x`, row `y` (out-of-range coordinates are dark)
    pub fn get(&self, x: u8, y: u8) -> bool {
        if x as usize >= MATRIX_SIZE || y as usize >= MATRIX_SIZE {
            return false;
        }
        self.0[y as usize] & (1 << (7 - x)) != 0
    }

    /// Light the pixel at column `x`, row `y`
    pub fn set(&mut self, x: u8, y: u8) {
        if (x as usize) < MATRIX_SIZE && (y as usize) < MATRIX_SIZE {
            self.0[y as usize] |= 1 << (7 - x);
        }
    }

    /// The bitmap rotated 90 degrees clockwise
    ///
    /// The matrix is mounted rotated relative to the wire format, so every
    /// frame goes through this transform exactly once before display.
    pub fn rotate_cw(&self) -> Self {
        let mut out = Self::new();
        for y in 0..MATRIX_SIZE as u8 {
            for x in 0..MATRIX_SIZE as u8 {
                if self.get(x, y) {
                    out.set(7 - y, x);
                }
            }
        }
        out
    }

    /// Iterate over lit pixels as `(x, y)` pairs, row by row
    pub fn iter_lit(self) -> impl Iterator<Item = (u8, u8)> {
        (0..MATRIX_SIZE as u8).flat_map(move |y| {
            (0..MATRIX_SIZE as u8).filter_map(move |x| self.get(x, y).then_some((x, y)))
        })
    }
}

/// Decode the 64-character pattern at the start of `text`
///
/// Exactly [`FRAME_BITS`] characters are consumed on success. Any
/// character other than `'0'`/`'1'` in the pattern region, including the
/// pattern ending early, fails the whole token.
pub fn decode_frame(text: &str) -> Result<Bitmap, CodecError> {
    let bytes = text.as_bytes();
    if bytes.len() < FRAME_BITS {
        return Err(CodecError::InvalidCharacter);
    }

    let mut rows = [0u8; MATRIX_SIZE];
    for (i, &b) in bytes[..FRAME_BITS].iter().enumerate() {
        match b {
            b'1' => rows[i / MATRIX_SIZE] |= 1 << (7 - (i % MATRIX_SIZE)),
            b'0' => {}
            _ => return Err(CodecError::InvalidCharacter),
        }
    }

    Ok(Bitmap(rows))
}

/// Decode the duration that follows a frame pattern
///
/// `text` starts at the byte after the pattern: a `':'` separator, then
/// decimal seconds running to the next space or end of string. Returns
/// the duration and the number of bytes consumed (separator included).
///
/// A token that does not parse as a number is rejected as
/// [`CodecError::InvalidDuration`], the same as an explicit zero or
/// negative duration.
pub fn decode_duration(text: &str) -> Result<(f32, usize), CodecError> {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b':') {
        return Err(CodecError::MissingSeparator);
    }

    let end = bytes
        .iter()
        .position(|&b| b == b' ')
        .unwrap_or(bytes.len());
    let seconds: f32 = text[1..end]
        .parse()
        .map_err(|_| CodecError::InvalidDuration)?;

    // The inverted comparison also rejects NaN.
    if !(seconds > 0.0) {
        return Err(CodecError::InvalidDuration);
    }

    Ok((seconds, end))
}

/// Render a bitmap back into its 64-character wire pattern
pub fn encode_frame(bitmap: &Bitmap, out: &mut impl fmt::Write) -> fmt::Result {
    for y in 0..MATRIX_SIZE as u8 {
        for x in 0..MATRIX_SIZE as u8 {
            out.write_char(if bitmap.get(x, y) { '1' } else { '0' })?;
        }
    }
    Ok(())
}
