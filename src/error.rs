//! Error handling for the SID decoder element.

use thiserror::Error;

/// Convenient result alias for decoder operations.
pub type Result<T> = std::result::Result<T, SidDecError>;

/// Errors that may occur while ingesting, building or playing a SID tune.
///
/// Nothing in the decoder retries after one of these: every fatal condition
/// moves the session to a terminal state and releases the emulator.
#[derive(Debug, Error, Clone)]
pub enum SidDecError {
    /// Accumulated tune data would exceed the ingest buffer capacity.
    #[error("tune data exceeds the {capacity} byte ingest buffer")]
    IngestOverflow {
        /// Hard capacity of the ingest buffer in bytes.
        capacity: usize,
    },

    /// The ingested bytes are not a recognized SID tune format.
    #[error("not a recognized SID tune: {0}")]
    TuneParse(String),

    /// The configured sub-song index is out of range for this tune.
    #[error("song {requested} out of range ({available} available)")]
    SongSelect {
        /// Sub-song index that was requested.
        requested: u32,
        /// Number of sub-songs the tune actually contains.
        available: u32,
    },

    /// The emulation engine refused to load the selected song.
    #[error("could not load tune: {0}")]
    Load(String),

    /// Downstream advertises nothing compatible with 16-bit interleaved PCM.
    #[error("downstream offers no compatible 16-bit PCM format")]
    NoAcceptableFormat,

    /// Downstream capabilities cannot be queried (e.g. not yet linked).
    #[error("downstream capabilities cannot be queried")]
    CapabilitiesUnavailable,

    /// The emulation backend could not be constructed or validated.
    #[error("could not create emulation backend: {0}")]
    BuilderInit(String),

    /// Downstream rejected a buffer during playback.
    #[error("downstream rejected buffer: {reason}")]
    PushRejected {
        /// Flow disposition reported by the downstream consumer.
        reason: String,
    },

    /// A unit conversion hit a zero denominator.
    #[error("conversion would divide by zero")]
    DivisionByZero,

    /// A position query arrived before any output format was negotiated.
    #[error("no output format negotiated yet")]
    NotNegotiated,
}
