//! Time-driven playback state machine.
//!
//! The player is evaluated once per polling tick against a monotonic
//! millisecond clock. It holds indices into the [`AnimationStore`] and
//! never copies frame data; whoever owns both must reset the player
//! whenever the store is cleared.
//!
//! Ticks may arrive at any cadence: the elapsed-time check is evaluated
//! from scratch each time, so frames are never advanced early, only
//! possibly late.

use simile_protocol::Bitmap;

use crate::store::AnimationStore;

/// Playback mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Round-robin over all non-empty animations in store order
    All,
    /// Loop one animation by store index
    Single(usize),
}

/// Playback state: mode, position, and the last frame-change timestamp
#[derive(Debug)]
pub struct Player {
    mode: Mode,
    /// Animation cursor, used in [`Mode::All`]
    cursor: usize,
    /// Frame index within the current animation
    frame: usize,
    /// Timestamp of the last frame advance (ms)
    last_change_ms: u64,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    /// Create a player in round-robin mode at the start of the store
    pub fn new() -> Self {
        Self {
            mode: Mode::All,
            cursor: 0,
            frame: 0,
            last_change_ms: 0,
        }
    }

    /// Current playback mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Current animation cursor (meaningful in [`Mode::All`])
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current frame index
    pub fn frame_index(&self) -> usize {
        self.frame
    }

    /// Switch to round-robin playback, restarting from the first
    /// animation
    pub fn play_all(&mut self, now_ms: u64) {
        self.mode = Mode::All;
        self.reseed(now_ms);
    }

    /// Switch to single-animation playback of the animation at `index`
    pub fn play_single(&mut self, index: usize, now_ms: u64) {
        self.mode = Mode::Single(index);
        self.reseed(now_ms);
    }

    /// Return to the initial round-robin state
    ///
    /// Called together with [`AnimationStore::clear`]; any held index
    /// would be stale afterwards.
    pub fn reset(&mut self, now_ms: u64) {
        self.play_all(now_ms);
    }

    fn reseed(&mut self, now_ms: u64) {
        self.cursor = 0;
        self.frame = 0;
        self.last_change_ms = now_ms;
    }

    /// Evaluate one scheduling tick
    ///
    /// Advances frame/animation indices according to elapsed time and
    /// returns the bitmap currently due for display, or `None` when
    /// nothing should be shown this tick.
    pub fn tick<'a>(&mut self, store: &'a AnimationStore, now_ms: u64) -> Option<&'a Bitmap> {
        if store.is_empty() {
            return None;
        }

        match self.mode {
            Mode::Single(index) => self.tick_single(store, index, now_ms),
            Mode::All => self.tick_all(store, now_ms),
        }
    }

    fn tick_single<'a>(
        &mut self,
        store: &'a AnimationStore,
        index: usize,
        now_ms: u64,
    ) -> Option<&'a Bitmap> {
        let frames = store.get(index)?.frames();
        if frames.is_empty() {
            return None;
        }

        // Redefinition may have shrunk the sequence under us.
        if self.frame >= frames.len() {
            self.frame = 0;
        }

        if self.elapsed(now_ms) >= frames[self.frame].duration_ms as u64 {
            self.frame = (self.frame + 1) % frames.len();
            self.last_change_ms = now_ms;
        }

        Some(&frames[self.frame].bitmap)
    }

    fn tick_all<'a>(&mut self, store: &'a AnimationStore, now_ms: u64) -> Option<&'a Bitmap> {
        if self.cursor >= store.len() {
            self.cursor = 0;
        }

        let frames = store.get(self.cursor)?.frames();
        if frames.is_empty() {
            // Skip without consuming display time; the next tick looks
            // at the following animation immediately.
            self.cursor += 1;
            self.frame = 0;
            return None;
        }

        if self.frame >= frames.len() {
            self.frame = 0;
        }

        if self.elapsed(now_ms) >= frames[self.frame].duration_ms as u64 {
            self.frame += 1;
            if self.frame >= frames.len() {
                // Animation boundary: hard cut to the next entry.
                self.frame = 0;
                self.cursor += 1;
            }
            self.last_change_ms = now_ms;
        }

        // The cursor may just have run off the end; in that case nothing
        // is emitted this tick and the next one wraps back to the start.
        let current = store.get(self.cursor)?;
        Some(&current.frames().get(self.frame)?.bitmap)
    }

    fn elapsed(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_change_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Frame;
    use simile_protocol::Bitmap;

    /// Bitmap whose first row encodes `tag`, to tell frames apart
    fn tagged(tag: u8) -> Bitmap {
        Bitmap::from_rows([tag, 0, 0, 0, 0, 0, 0, 0])
    }

    fn store_with(animations: &[(&str, &[(u8, u32)])]) -> AnimationStore {
        let mut store = AnimationStore::new();
        for (name, frames) in animations {
            let index = store.find_or_create(name).unwrap();
            for &(tag, duration_ms) in *frames {
                store.push_frame(
                    index,
                    Frame {
                        bitmap: tagged(tag),
                        duration_ms,
                    },
                );
            }
        }
        store
    }

    #[test]
    fn test_empty_store_emits_nothing() {
        let store = AnimationStore::new();
        let mut player = Player::new();
        assert_eq!(player.tick(&store, 1000), None);
    }

    #[test]
    fn test_single_holds_frame_until_duration_elapses() {
        let store = store_with(&[("a", &[(1, 1000), (2, 1000)])]);
        let mut player = Player::new();
        player.play_single(0, 0);

        assert_eq!(player.tick(&store, 0), Some(&tagged(1)));
        assert_eq!(player.tick(&store, 999), Some(&tagged(1)));
        assert_eq!(player.tick(&store, 1000), Some(&tagged(2)));
    }

    #[test]
    fn test_single_full_cycle_returns_to_start() {
        // Durations 100/200/300: after each expiry the next frame shows.
        let store = store_with(&[("a", &[(1, 100), (2, 200), (3, 300)])]);
        let mut player = Player::new();
        player.play_single(0, 0);

        assert_eq!(player.tick(&store, 100), Some(&tagged(2)));
        assert_eq!(player.tick(&store, 300), Some(&tagged(3)));
        assert_eq!(player.tick(&store, 600), Some(&tagged(1)));
        assert_eq!(player.frame_index(), 0);
    }

    #[test]
    fn test_single_one_frame_stays_put_and_rearms() {
        let store = store_with(&[("a", &[(1, 1000)])]);
        let mut player = Player::new();
        player.play_single(0, 0);

        // Expiry wraps a one-frame animation back onto itself and
        // resets the timestamp.
        assert_eq!(player.tick(&store, 1000), Some(&tagged(1)));
        assert_eq!(player.frame_index(), 0);
        assert_eq!(player.tick(&store, 1500), Some(&tagged(1)));
        assert_eq!(player.tick(&store, 2000), Some(&tagged(1)));
    }

    #[test]
    fn test_single_with_no_frames_emits_nothing() {
        let store = store_with(&[("empty", &[])]);
        let mut player = Player::new();
        player.play_single(0, 0);
        assert_eq!(player.tick(&store, 500), None);
    }

    #[test]
    fn test_late_ticks_never_advance_early() {
        let store = store_with(&[("a", &[(1, 100), (2, 100)])]);
        let mut player = Player::new();
        player.play_single(0, 0);

        // A sparse tick long after expiry advances exactly once.
        assert_eq!(player.tick(&store, 950), Some(&tagged(2)));
        assert_eq!(player.tick(&store, 1000), Some(&tagged(2)));
        assert_eq!(player.tick(&store, 1050), Some(&tagged(1)));
    }

    #[test]
    fn test_all_skips_empty_animations_without_delay() {
        let store = store_with(&[("empty", &[]), ("b", &[(7, 100)])]);
        let mut player = Player::new();
        player.play_all(0);

        // First tick burns no display time skipping the empty entry.
        assert_eq!(player.tick(&store, 0), None);
        assert_eq!(player.tick(&store, 0), Some(&tagged(7)));
    }

    #[test]
    fn test_all_advances_across_animation_boundary() {
        let store = store_with(&[("a", &[(1, 100), (2, 100)]), ("b", &[(3, 100)])]);
        let mut player = Player::new();
        player.play_all(0);

        assert_eq!(player.tick(&store, 0), Some(&tagged(1)));
        assert_eq!(player.tick(&store, 100), Some(&tagged(2)));
        // Last frame of "a" expires: hard cut to "b" frame 0.
        assert_eq!(player.tick(&store, 200), Some(&tagged(3)));
        assert_eq!(player.cursor(), 1);
    }

    #[test]
    fn test_all_wraps_after_last_animation() {
        let store = store_with(&[("only", &[(1, 100)])]);
        let mut player = Player::new();
        player.play_all(0);

        assert_eq!(player.tick(&store, 0), Some(&tagged(1)));
        // Expiry pushes the cursor off the end: dark tick, then wrap.
        assert_eq!(player.tick(&store, 100), None);
        assert_eq!(player.tick(&store, 100), Some(&tagged(1)));
    }

    #[test]
    fn test_all_with_only_empty_animations_stays_dark() {
        let store = store_with(&[("x", &[]), ("y", &[])]);
        let mut player = Player::new();
        player.play_all(0);

        for now in 0..5 {
            assert_eq!(player.tick(&store, now), None);
        }
    }

    #[test]
    fn test_mode_change_reseeds_position() {
        let store = store_with(&[("a", &[(1, 100), (2, 100)]), ("b", &[(3, 100)])]);
        let mut player = Player::new();
        player.play_single(0, 0);
        player.tick(&store, 100);
        assert_eq!(player.frame_index(), 1);

        player.play_all(200);
        assert_eq!(player.cursor(), 0);
        assert_eq!(player.frame_index(), 0);
        // Timestamp reseeded at 200: the first frame gets a full period.
        assert_eq!(player.tick(&store, 299), Some(&tagged(1)));
        assert_eq!(player.tick(&store, 300), Some(&tagged(2)));
    }

    #[test]
    fn test_shrunken_redefinition_clamps_frame_index() {
        let mut store = store_with(&[("a", &[(1, 100), (2, 100), (3, 100)])]);
        let mut player = Player::new();
        player.play_single(0, 0);
        player.tick(&store, 100);
        player.tick(&store, 200);
        assert_eq!(player.frame_index(), 2);

        // Redefine down to one frame while playback points past it.
        store.clear_frames(0);
        store.push_frame(
            0,
            Frame {
                bitmap: tagged(9),
                duration_ms: 100,
            },
        );
        assert_eq!(player.tick(&store, 250), Some(&tagged(9)));
    }
}
