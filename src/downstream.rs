//! The abstract push transport towards the downstream consumer.
//!
//! The pipeline framework embedding this element implements [`Downstream`];
//! the decoder only ever talks to the trait. Events arrive in a fixed order
//! per session: `stream_start`, `format_changed`, `segment_start`, `tags`,
//! then repeated `push` calls and finally `end_of_stream`.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::format::{AudioCaps, NegotiatedFormat};
use crate::metadata::TuneTags;

/// Disposition of a buffer push reported by the downstream consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStatus {
    /// Buffer accepted; keep producing.
    Ok,
    /// Downstream requests end of stream; shut down gracefully.
    Eos,
    /// The consumer is not linked; fatal to the session.
    NotLinked,
    /// Any other downstream failure; fatal to the session.
    Error,
}

impl fmt::Display for FlowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlowStatus::Ok => "ok",
            FlowStatus::Eos => "eos",
            FlowStatus::NotLinked => "not-linked",
            FlowStatus::Error => "error",
        };
        f.write_str(name)
    }
}

/// One produced audio buffer with its stream stamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBuffer {
    /// Interleaved signed 16-bit samples.
    pub samples: Vec<i16>,
    /// Start offset in sample frames.
    pub offset: i64,
    /// End offset in sample frames (start offset of the next buffer).
    pub offset_end: i64,
    /// Presentation timestamp in nanoseconds.
    pub pts: i64,
    /// Duration in nanoseconds.
    pub duration: i64,
}

impl AudioBuffer {
    /// Payload size in bytes.
    pub fn byte_len(&self) -> usize {
        self.samples.len() * 2
    }
}

/// Streaming interface the downstream consumer provides.
pub trait Downstream: Send {
    /// The ordered capability set the consumer currently accepts, or `None`
    /// when it cannot be queried at all.
    fn allowed_caps(&self) -> Option<Vec<AudioCaps>>;

    /// Announce the start of a new stream.
    fn stream_start(&mut self, stream_id: &str, group_id: u32);

    /// Announce the negotiated output format.
    fn format_changed(&mut self, format: &NegotiatedFormat);

    /// Announce the start of a new segment.
    fn segment_start(&mut self);

    /// Announce decoded tag metadata.
    fn tags(&mut self, tags: &TuneTags);

    /// Hand over one audio buffer. May block under backpressure.
    fn push(&mut self, buffer: AudioBuffer) -> FlowStatus;

    /// Announce that no further buffers will follow.
    fn end_of_stream(&mut self);
}

/// Shared handle to a linked downstream consumer.
///
/// The production task and the element both hold this handle; the mutex is
/// only held for the duration of a single event or push call.
pub type SharedDownstream = Arc<Mutex<dyn Downstream>>;
