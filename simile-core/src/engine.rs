//! The controller engine: one owned context for the whole control loop.
//!
//! The engine owns the animation store and the player and is the only
//! code that mutates either, so a `CLEAR` resets both under a single
//! `&mut self` and playback can never observe a wiped store through a
//! stale index.
//!
//! Command handling writes terse human-readable progress lines into a
//! caller-supplied sink. On the device that sink is the serial transmit
//! side, for the host to read back; it carries no protocol meaning and
//! may be a black hole.

use core::fmt::{self, Write};

use simile_protocol::{codec, Bitmap, CodecError, Command, CommandError, Definition};

use crate::player::{Mode, Player};
use crate::store::{AnimationStore, Frame, MAX_ANIMATIONS};

/// Animation store plus playback state, as one unit
#[derive(Debug, Default)]
pub struct Engine {
    store: AnimationStore,
    player: Player,
}

impl Engine {
    /// Create an engine with an empty store, in round-robin mode
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the store
    pub fn store(&self) -> &AnimationStore {
        &self.store
    }

    /// Read access to the playback state
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Process one received line
    ///
    /// Unknown lines are ignored without any response. Errors inside a
    /// command truncate that command's effect and surface only as
    /// diagnostic text in `out`; they never unwind into the caller.
    pub fn handle_line(&mut self, line: &str, now_ms: u64, out: &mut impl Write) -> fmt::Result {
        let Some(command) = Command::parse(line.trim()) else {
            return Ok(());
        };

        match command {
            Command::Play(name) => {
                // Unknown names are a silent no-op.
                if let Some(index) = self.store.find(name) {
                    self.player.play_single(index, now_ms);
                    writeln!(out, "play {name}")?;
                }
                Ok(())
            }
            Command::Define(payload) => self.define(payload, out),
            Command::Clear => {
                self.store.clear();
                self.player.reset(now_ms);
                writeln!(out, "cleared")
            }
            Command::PlayAll => {
                self.player.play_all(now_ms);
                writeln!(out, "play all")
            }
            Command::Debug => self.debug_dump(out),
        }
    }

    /// Evaluate one scheduling tick, returning the bitmap due for
    /// display
    pub fn tick(&mut self, now_ms: u64) -> Option<&Bitmap> {
        self.player.tick(&self.store, now_ms)
    }

    /// Write the DEBUG report: store occupancy and playback position
    pub fn debug_dump(&self, out: &mut impl Write) -> fmt::Result {
        writeln!(out, "animations: {}/{}", self.store.len(), MAX_ANIMATIONS)?;
        for (index, animation) in self.store.iter().enumerate() {
            writeln!(
                out,
                "  {}: {} frames={}",
                index,
                animation.name(),
                animation.frame_count()
            )?;
        }
        match self.player.mode() {
            Mode::All => writeln!(
                out,
                "mode: all cursor={} frame={}",
                self.player.cursor(),
                self.player.frame_index()
            ),
            Mode::Single(index) => writeln!(
                out,
                "mode: single index={} frame={}",
                index,
                self.player.frame_index()
            ),
        }
    }

    /// Ingest an animation-definition payload
    ///
    /// Frames decode left to right and commit one at a time; a codec
    /// error stops the line but keeps what was already committed.
    fn define(&mut self, payload: &str, out: &mut impl Write) -> fmt::Result {
        let definition = match Definition::parse(payload) {
            Ok(definition) => definition,
            Err(CommandError::MalformedPayload) => {
                return writeln!(out, "anim dropped: malformed payload");
            }
        };

        let index = match self.store.find_or_create(definition.name) {
            Ok(index) => index,
            Err(err) => {
                return writeln!(out, "anim {} dropped: {:?}", definition.name, err);
            }
        };
        // Redefinition replaces: empty the sequence before the first
        // token decodes.
        self.store.clear_frames(index);

        let mut rest = definition.tokens;
        let mut added = 0;
        let mut stopped: Option<CodecError> = None;

        loop {
            rest = rest.trim_start_matches(' ');
            // A full token needs the 64-char pattern plus at least the
            // separator; less than that is the normal end of the frame
            // list, even mid-token.
            if rest.len() <= codec::FRAME_BITS {
                break;
            }

            let bitmap = match codec::decode_frame(rest) {
                Ok(bitmap) => bitmap,
                Err(err) => {
                    stopped = Some(err);
                    break;
                }
            };
            let (seconds, consumed) = match codec::decode_duration(&rest[codec::FRAME_BITS..]) {
                Ok(pair) => pair,
                Err(err) => {
                    stopped = Some(err);
                    break;
                }
            };
            rest = &rest[codec::FRAME_BITS + consumed..];

            // Cap reached: remaining tokens are discarded, not an error.
            if !self.store.push_frame(index, Frame::from_seconds(bitmap, seconds)) {
                break;
            }
            added += 1;
        }

        writeln!(out, "anim {}: {} frames", definition.name, added)?;
        if let Some(err) = stopped {
            writeln!(out, "anim {}: truncated ({:?})", definition.name, err)?;
        }
        Ok(())
    }
}
