//! Output format negotiation with the downstream consumer.
//!
//! The consumer's capability list is taken as its preference order and the
//! first entry wins; the element never scores alternatives and never
//! transcodes. Only signed 16-bit interleaved PCM is acceptable.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use crate::error::{Result, SidDecError};
use crate::format::{
    MAX_CHANNELS, MAX_SAMPLE_RATE, MIN_SAMPLE_RATE, NegotiatedFormat, SampleFormat,
};
use crate::downstream::Downstream;
use crate::{DEFAULT_CHANNELS, DEFAULT_SAMPLE_RATE};

static NEXT_GROUP_ID: AtomicU32 = AtomicU32::new(0);
static NEXT_STREAM_SEQ: AtomicU64 = AtomicU64::new(0);

/// Allocate a fresh process-wide stream group id.
pub fn next_group_id() -> u32 {
    NEXT_GROUP_ID.fetch_add(1, Ordering::Relaxed)
}

fn next_stream_id() -> String {
    let seq = NEXT_STREAM_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("siddec/{seq:08x}")
}

/// Pick the concrete output format and announce the stream to `downstream`.
///
/// On success the stream-start event (carrying `upstream_group_id` when the
/// upstream established one, a freshly allocated group id otherwise) and the
/// format announcement have both been pushed. Fails with
/// [`SidDecError::CapabilitiesUnavailable`] when the consumer cannot be
/// queried and [`SidDecError::NoAcceptableFormat`] when nothing compatible is
/// advertised; neither emits any event.
pub fn negotiate(
    downstream: &mut dyn Downstream,
    upstream_group_id: Option<u32>,
) -> Result<NegotiatedFormat> {
    let allowed = downstream
        .allowed_caps()
        .ok_or(SidDecError::CapabilitiesUnavailable)?;
    log::debug!("allowed caps: {allowed:?}");

    // Normalize to the first candidate.
    let candidate = allowed.first().ok_or(SidDecError::NoAcceptableFormat)?;
    if candidate.format != SampleFormat::S16 {
        log::debug!("rejecting {} output: only S16 is produced", candidate.format);
        return Err(SidDecError::NoAcceptableFormat);
    }

    let rate = candidate.rate.unwrap_or(DEFAULT_SAMPLE_RATE);
    let channels = candidate.channels.unwrap_or(DEFAULT_CHANNELS);
    if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&rate) || !(1..=MAX_CHANNELS).contains(&channels)
    {
        log::debug!("rejecting {rate} Hz / {channels} ch: outside the element's ranges");
        return Err(SidDecError::NoAcceptableFormat);
    }

    let format = NegotiatedFormat {
        format: SampleFormat::S16,
        rate,
        channels,
    };

    let group_id = upstream_group_id.unwrap_or_else(next_group_id);
    let stream_id = next_stream_id();
    downstream.stream_start(&stream_id, group_id);
    downstream.format_changed(&format);
    log::debug!("negotiated {} at {rate} Hz, {channels} channel(s)", format.format);

    Ok(format)
}
