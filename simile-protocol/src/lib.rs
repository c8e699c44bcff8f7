//! Serial Line Protocol for the Simile Matrix
//!
//! This crate defines the newline-delimited text protocol between a host
//! and the matrix controller. The protocol is designed for hand-typing
//! over a serial monitor as much as for programmatic use: one ASCII
//! command per line, case-sensitive keywords, no acknowledgements.
//!
//! # Protocol Overview
//!
//! ```text
//! PLAY:<name>                          select one animation
//! ANIM:<name>|<frame> <frame> ...      define (or redefine) an animation
//! CLEAR                                wipe all animations
//! PLAY_ALL                             round-robin over all animations
//! DEBUG                                dump controller state as text
//! ```
//!
//! Each `<frame>` token packs one 8x8 monochrome bitmap and its display
//! duration:
//!
//! ```text
//! ┌──────────────────────┬───┬──────────┐
//! │ 64 x '0'/'1'         │ : │ duration │
//! │ row-major, MSB left  │   │ seconds  │
//! └──────────────────────┴───┴──────────┘
//! ```
//!
//! Unknown lines are ignored without an error response; malformed frame
//! tokens truncate the definition they appear in but never affect other
//! animations.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod codec;
pub mod command;
pub mod line;

pub use codec::{decode_duration, decode_frame, encode_frame, Bitmap, CodecError, FRAME_BITS};
pub use command::{Command, CommandError, Definition, MAX_NAME_LEN};
pub use line::{LineReader, MAX_LINE_LEN};
