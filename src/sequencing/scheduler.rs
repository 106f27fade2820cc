//! Lookahead step scheduler.
//!
//! Driven by a cooperative frame loop, not a precise timer: every tick drains
//! all step deadlines that fall inside a fixed lookahead window and hands the
//! dispatch timestamps to the audio engine slightly ahead of real time, which
//! masks frame jitter. A late tick catches up (no step is dropped); a tick
//! with no elapsed time dispatches nothing new (no step fires twice).

use crate::errors::GridError;
use crate::instruments::SoundResolver;
use crate::pattern::Pattern;
use crate::tempo::Tempo;

/// How far ahead of `now` step deadlines are eagerly dispatched.
pub const LOOKAHEAD_WINDOW_SECS: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
}

/// Fire-and-forget trigger boundary into the external audio engine. The
/// scheduler never blocks on sound completion; a rejected trigger is logged
/// and skipped.
pub trait SoundSink {
    fn dispatch(&mut self, sound_key: &str, when_seconds: f64) -> Result<(), GridError>;
}

/// Cyclic step cursor plus the absolute deadline of the next step.
///
/// Owned state is deliberately minimal: pattern, tempo, and kit are read
/// fresh on every tick, so edits made between frames are picked up without
/// touching the cursor, and a BPM change never re-times a step that has
/// already been dispatched.
pub struct LookaheadScheduler {
    state: PlaybackState,
    cursor: usize,
    next_step_deadline: f64,
}

impl LookaheadScheduler {
    pub fn new() -> Self {
        Self {
            state: PlaybackState::Stopped,
            cursor: 0,
            next_step_deadline: 0.0,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Transition to `Playing`: cursor to 0, first deadline at `now` so the
    /// first tick fires step 0 immediately.
    pub fn start(&mut self, now: f64) {
        self.state = PlaybackState::Playing;
        self.cursor = 0;
        self.next_step_deadline = now;
    }

    /// Transition to `Stopped`. Effective before the next tick: a tick that
    /// arrives afterwards is a no-op. The cursor resets so the UI playhead
    /// returns to step 0.
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.cursor = 0;
    }

    /// Dispatch every step whose deadline falls inside the lookahead window
    /// and advance past it. Returns how many steps were advanced.
    ///
    /// Per-step failures (unresolved sound, rejected trigger) are logged and
    /// skipped; they never halt playback or corrupt the cursor.
    pub fn tick(
        &mut self,
        now: f64,
        pattern: &Pattern,
        tempo: &Tempo,
        kit: &str,
        resolver: &dyn SoundResolver,
        sink: &mut dyn SoundSink,
    ) -> usize {
        if self.state != PlaybackState::Playing {
            return 0;
        }

        let seconds_per_step = tempo.seconds_per_step();
        let horizon = now + LOOKAHEAD_WINDOW_SECS;
        let mut advanced = 0;

        // A pattern swap can shrink the grid mid-playback; keep the cursor
        // in range.
        self.cursor %= pattern.step_count();

        while self.next_step_deadline < horizon {
            let deadline = self.next_step_deadline;

            for (instrument, row) in pattern.iter_rows() {
                if !row[self.cursor] {
                    continue;
                }
                let key = match resolver.resolve(kit, instrument) {
                    Ok(key) => key,
                    Err(err) => {
                        log::warn!("step {}: {err}", self.cursor);
                        continue;
                    }
                };
                if let Err(err) = sink.dispatch(&key, deadline) {
                    log::warn!("step {}: dropped {key}: {err}", self.cursor);
                }
            }

            self.cursor = (self.cursor + 1) % pattern.step_count();
            self.next_step_deadline += seconds_per_step;
            advanced += 1;
        }

        advanced
    }
}

impl Default for LookaheadScheduler {
    fn default() -> Self {
        Self::new()
    }
}
