use thiserror::Error;

/// Recoverable error taxonomy for the sequencer core.
///
/// `InvalidIndex` and `UnknownPreset` surface synchronously to the caller and
/// leave no partial mutation behind. `UnresolvedSound` and `DispatchFailure`
/// are swallowed at the scheduler boundary: logged, skipped, playback keeps
/// running.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("no cell at instrument {instrument:?}, step {step}")]
    InvalidIndex { instrument: String, step: usize },

    #[error("unknown preset {0:?}")]
    UnknownPreset(String),

    #[error("no playable sound for instrument {instrument:?} in kit {kit:?}")]
    UnresolvedSound { kit: String, instrument: String },

    #[error("trigger rejected by audio engine: {0}")]
    DispatchFailure(String),

    #[error("invalid pattern config: {0}")]
    InvalidConfig(String),
}
