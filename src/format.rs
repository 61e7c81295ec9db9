//! Output format descriptions exchanged with the downstream consumer.

use std::fmt;

/// Lowest sample rate the element will produce.
pub const MIN_SAMPLE_RATE: u32 = 8_000;
/// Highest sample rate the element will produce.
pub const MAX_SAMPLE_RATE: u32 = 48_000;
/// Largest channel count the element will produce (stereo).
pub const MAX_CHANNELS: u16 = 2;

/// Raw PCM sample formats a downstream consumer may advertise.
///
/// The decoder itself only ever produces [`SampleFormat::S16`]; the other
/// variants exist so a capability set can be inspected and rejected without
/// any attempt to transcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// Signed 16-bit native-endian interleaved PCM.
    S16,
    /// Signed 8-bit PCM.
    S8,
    /// Unsigned 8-bit PCM.
    U8,
    /// 32-bit float PCM.
    F32,
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SampleFormat::S16 => "S16",
            SampleFormat::S8 => "S8",
            SampleFormat::U8 => "U8",
            SampleFormat::F32 => "F32",
        };
        f.write_str(name)
    }
}

/// One entry of a downstream capability set.
///
/// Unset rate or channel fields mean "anything within the element's allowed
/// range"; the negotiator fills them with its defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioCaps {
    /// Advertised sample format.
    pub format: SampleFormat,
    /// Advertised sample rate in Hz, if the consumer pins one.
    pub rate: Option<u32>,
    /// Advertised channel count, if the consumer pins one.
    pub channels: Option<u16>,
}

impl AudioCaps {
    /// Capability entry with only a format, leaving rate and channels open.
    pub fn new(format: SampleFormat) -> Self {
        AudioCaps {
            format,
            rate: None,
            channels: None,
        }
    }

    /// Pin the sample rate.
    pub fn with_rate(mut self, rate: u32) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Pin the channel count.
    pub fn with_channels(mut self, channels: u16) -> Self {
        self.channels = Some(channels);
        self
    }
}

/// The concrete output format agreed with the downstream consumer.
///
/// Fixed for the lifetime of one playback session; the element never changes
/// format mid-stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegotiatedFormat {
    /// Sample format (always [`SampleFormat::S16`] after a successful
    /// negotiation).
    pub format: SampleFormat,
    /// Sample rate in Hz.
    pub rate: u32,
    /// Interleaved channel count.
    pub channels: u16,
}

impl NegotiatedFormat {
    /// Bytes per interleaved sample frame (2 bytes per 16-bit sample).
    pub fn bytes_per_frame(&self) -> u32 {
        2 * u32::from(self.channels)
    }
}
