//! Streaming SID tune decoder element
//!
//! Decodes SID chiptunes — small C64 machine-code programs executed against
//! an emulated MOS 6581/8580 sound chip — into a continuous stream of raw
//! 16-bit PCM buffers. The element sits inside a generic media pipeline: an
//! upstream source pushes the tune bytes in chunks, and once end-of-input
//! arrives the element builds a validated emulation session, negotiates an
//! output format with the downstream consumer and runs a production task
//! that emits correctly time-stamped audio buffers.
//!
//! The chip emulation itself is external: the embedding application supplies
//! an engine through the [`EmulationCore`] trait, and the pipeline transport
//! through the [`Downstream`] trait. Two interchangeable synthesis backends
//! (reference-accuracy and performance-tuned) are selected via
//! [`Emulation`].
//!
//! To play RSID-style tunes that execute machine startup firmware, assign
//! kernal/basic/chargen ROM images via the configuration; PSID-style tunes
//! play without them.
//!
//! Seeking is not (and cannot be) implemented for this format.
//!
//! # Quick start
//! ```no_run
//! use std::sync::Arc;
//! use siddec::{SidDecoder, SharedDownstream};
//! # fn engine() -> Arc<dyn siddec::EmulationCore> { unimplemented!() }
//! # fn sink() -> SharedDownstream { unimplemented!() }
//!
//! let mut decoder = SidDecoder::new(engine());
//! decoder.link(sink());
//! decoder.config_mut().set_song(2);
//!
//! // Upstream pushes the tune image, then signals completion.
//! decoder.chain(&std::fs::read("Delta.sid").unwrap()).unwrap();
//! decoder.end_of_input().unwrap();
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod decoder;
pub mod downstream;
pub mod emu;
pub mod error;
pub mod format;
pub mod ingest;
pub mod metadata;
pub mod negotiate;
pub mod session;
pub mod units;

pub use config::{Emulation, PlaybackConfig, RomSet, ToneShaping};
pub use decoder::{DecoderState, SidDecoder};
pub use downstream::{AudioBuffer, Downstream, FlowStatus, SharedDownstream};
pub use emu::{EmulationCore, EngineConfig, SidBackend, SidPlayer, SidTune};
pub use error::{Result, SidDecError};
pub use format::{AudioCaps, NegotiatedFormat, SampleFormat};
pub use ingest::{TUNE_CAPACITY, TuneBuffer};
pub use metadata::TuneTags;
pub use units::{Domain, TIME_UNIT, convert};

// ============================================================================
// Common Constants
// ============================================================================

/// Sample rate used when the downstream leaves it open (44.1 kHz).
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Channel count used when the downstream leaves it open (mono).
pub const DEFAULT_CHANNELS: u16 = 1;
