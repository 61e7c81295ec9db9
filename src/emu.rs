//! Trait abstractions over the external SID emulation engine.
//!
//! The decoder never synthesizes audio itself; it drives an engine supplied
//! by the embedding application through [`EmulationCore`]. The traits mirror
//! the engine's natural object model: a parsed tune descriptor, a player that
//! executes the tune, and a synthesis backend built and validated step by
//! step before it is installed into the player.
//!
//! Engine-side failures are surfaced as plain strings; the decoder wraps them
//! into its own error taxonomy at the call site.

use crate::config::{C64Model, CiaModel, Emulation, PlaybackConfig, SamplingMethod, SidModel, ToneShaping};
use crate::format::NegotiatedFormat;

/// Engine configuration derived from the decoder settings and the negotiated
/// output format, applied to a player when a session is finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Interleaved output channel count.
    pub channels: u16,
    /// Default SID chip model.
    pub sid_model: SidModel,
    /// Default C64 board model.
    pub c64_model: C64Model,
    /// CIA timer chip model.
    pub cia_model: CiaModel,
    /// Override the tune's own SID model declaration.
    pub force_sid_model: bool,
    /// Override the tune's own C64 model declaration.
    pub force_c64_model: bool,
    /// Resampling strategy.
    pub sampling_method: SamplingMethod,
    /// Boost digitized samples on the 8580.
    pub digi_boost: bool,
}

impl EngineConfig {
    /// Combine decoder configuration with a negotiated output format.
    pub fn derive(config: &PlaybackConfig, format: &NegotiatedFormat) -> Self {
        EngineConfig {
            sample_rate: format.rate,
            channels: format.channels,
            sid_model: config.sid_model,
            c64_model: config.c64_model,
            cia_model: config.cia_model,
            force_sid_model: config.force_sid_model,
            force_c64_model: config.force_c64_model,
            sampling_method: config.sampling_method,
            digi_boost: config.digi_boost,
        }
    }
}

/// A parsed tune descriptor.
pub trait SidTune: Send {
    /// Number of sub-songs in this tune.
    fn song_count(&self) -> u32;

    /// Select the sub-song to play, 0-based. Returns `false` when the index
    /// is out of range, leaving the selection unchanged.
    fn select_song(&mut self, song: u32) -> bool;

    /// Raw embedded info string: 0 = title, 1 = artist, 2 = copyright.
    ///
    /// Strings are in the tune's native 8-bit character set (Latin-1);
    /// [`crate::metadata::TuneTags`] converts them for announcement.
    fn info_string(&self, index: usize) -> Option<&[u8]>;
}

/// A player instance executing one loaded tune.
pub trait SidPlayer: Send {
    /// Load the currently selected song of `tune` into the player.
    fn load(&mut self, tune: &dyn SidTune) -> std::result::Result<(), String>;

    /// Number of SID chips the loaded tune addresses; the backend allocates
    /// one voice set per chip.
    fn chip_count(&self) -> u32;

    /// Hand over a kernal ROM image.
    fn set_kernal(&mut self, rom: &[u8]);

    /// Hand over a basic ROM image.
    fn set_basic(&mut self, rom: &[u8]);

    /// Hand over a chargen ROM image.
    fn set_chargen(&mut self, rom: &[u8]);

    /// Install a constructed synthesis backend. Replaces any previous one.
    fn install_backend(&mut self, backend: Box<dyn SidBackend>);

    /// Apply the engine configuration. Requires an installed backend.
    fn configure(&mut self, config: &EngineConfig) -> std::result::Result<(), String>;

    /// Render up to `buffer.len()` interleaved 16-bit samples, returning the
    /// number actually written. Returning 0 signals that the tune has
    /// completed; most SID tunes loop forever and never do.
    fn render(&mut self, buffer: &mut [i16]) -> usize;
}

/// A synthesis backend under construction.
///
/// Construction is incremental and each step can leave the backend unusable;
/// callers check [`status`](SidBackend::status) after every mutating call,
/// the way the engine's own builders report errors.
pub trait SidBackend: Send {
    /// Human-readable backend name, used in build tracing.
    fn name(&self) -> &str;

    /// Allocate voice channels for `chips` SID chips.
    fn create(&mut self, chips: u32);

    /// Whether the backend is still in a usable state.
    fn status(&self) -> bool;

    /// Enable or disable the synthesis filter.
    fn set_filter(&mut self, enabled: bool);

    /// Apply tone-shaping parameters. Cosmetic; never fails.
    fn set_tone_shaping(&mut self, shaping: &ToneShaping);
}

/// Entry points into the external emulation library.
pub trait EmulationCore: Send + Sync {
    /// Parse a complete tune image into a descriptor, or report why the
    /// bytes are not a recognized tune.
    fn parse_tune(&self, image: &[u8]) -> std::result::Result<Box<dyn SidTune>, String>;

    /// Create a fresh, unloaded player instance.
    fn create_player(&self) -> Box<dyn SidPlayer>;

    /// Instantiate the requested synthesis backend, or `None` when this
    /// library build does not ship it.
    fn create_backend(&self, emulation: Emulation) -> Option<Box<dyn SidBackend>>;
}
