//! Step-sequencer core for a pattern-based drum machine.
//!
//! The crate owns the 16-instrument step grid, the preset catalog, the
//! lookahead playback scheduler, and the compiler that turns a grid into the
//! external engine's textual mini-notation. Audio rendering, sample loading,
//! and the UI live on the other side of the `SoundSink`, `Clock`, and
//! `FrameScheduler` boundaries.

pub mod commands;
pub mod errors;
pub mod events;
pub mod instruments;
pub mod machine;
pub mod notation;
pub mod pattern;
pub mod presets;
pub mod sequencing;
pub mod tempo;

pub use commands::{Command, CommandQueue};
pub use errors::GridError;
pub use events::{EngineEvent, EngineEventQueue};
pub use instruments::{Instrument, Kit, SoundResolver, INSTRUMENTS, KITS};
pub use machine::DrumMachine;
pub use pattern::{Pattern, DEFAULT_STEP_COUNT};
pub use sequencing::{
    Clock, FrameScheduler, LookaheadScheduler, PlaybackState, SoundSink, SystemClock, TickHandle,
    LOOKAHEAD_WINDOW_SECS,
};
pub use tempo::{Tempo, STEPS_PER_BEAT};
