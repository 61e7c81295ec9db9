//! Decoder configuration: emulation selection, chip variants, tone shaping
//! and ROM images.
//!
//! Every ranged value is validated at its setter; an out-of-range assignment
//! is logged as a warning and ignored, leaving the prior value intact.
//! Configuration is expected to happen before or between playback sessions,
//! never during one.

use std::fmt;

/// Default output block size in bytes.
pub const DEFAULT_BLOCK_SIZE: usize = 4096;
/// Highest selectable sub-song index.
pub const MAX_SONG: u32 = 100;
/// Required size of a kernal ROM image.
pub const KERNAL_ROM_SIZE: usize = 8192;
/// Required size of a basic ROM image.
pub const BASIC_ROM_SIZE: usize = 8192;
/// Required size of a chargen ROM image.
pub const CHARGEN_ROM_SIZE: usize = 4096;

/// Selectable emulation backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Emulation {
    /// Reference-accuracy engine (floating-point SID model).
    #[default]
    ReSidFp,
    /// Performance-tuned engine.
    ReSid,
}

impl fmt::Display for Emulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Emulation::ReSidFp => "residfp",
            Emulation::ReSid => "resid",
        };
        f.write_str(name)
    }
}

/// SID chip variants the emulator can reproduce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SidModel {
    /// Original 6581 chip (C64 breadbin).
    #[default]
    Mos6581,
    /// Later 8580 revision.
    Mos8580,
}

/// C64 board/region variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum C64Model {
    /// European PAL machine.
    #[default]
    Pal,
    /// North-American NTSC machine.
    Ntsc,
    /// Early NTSC revision.
    OldNtsc,
    /// Argentinian Drean clone.
    Drean,
    /// Brazilian PAL-M machine.
    PalM,
}

/// CIA timer chip variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CiaModel {
    /// Original 6526.
    #[default]
    Mos6526,
    /// 8521 revision.
    Mos8521,
    /// 6526 week-4485 batch.
    Mos6526W4485,
}

/// Resampling strategies offered by the emulation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplingMethod {
    /// Plain interpolation.
    #[default]
    Interpolate,
    /// Resampling followed by interpolation (higher quality).
    ResampleInterpolate,
}

/// Cosmetic tone-shaping parameters handed to the synthesis backend.
///
/// The curve values drive the reference-accuracy engine, the bias drives the
/// performance engine; each backend reads the fields it understands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneShaping {
    /// Filter curve for the 6581 model, 0.0 to 1.0.
    pub curve_6581: f64,
    /// Filter curve for the 8580 model, 0.0 to 1.0.
    pub curve_8580: f64,
    /// Filter bias in millivolts, -600.0 to 600.0.
    pub bias_mv: f64,
}

impl Default for ToneShaping {
    fn default() -> Self {
        ToneShaping {
            curve_6581: 0.5,
            curve_8580: 0.5,
            bias_mv: 0.5,
        }
    }
}

/// Optional firmware images required by tunes that execute machine startup
/// code. Tunes that do not touch the firmware play correctly without any.
#[derive(Debug, Clone, Default)]
pub struct RomSet {
    /// Kernal ROM, exactly [`KERNAL_ROM_SIZE`] bytes.
    pub kernal: Option<Box<[u8; KERNAL_ROM_SIZE]>>,
    /// Basic ROM, exactly [`BASIC_ROM_SIZE`] bytes.
    pub basic: Option<Box<[u8; BASIC_ROM_SIZE]>>,
    /// Character generator ROM, exactly [`CHARGEN_ROM_SIZE`] bytes.
    pub chargen: Option<Box<[u8; CHARGEN_ROM_SIZE]>>,
}

/// Tunable decoder parameters, read once per session at build time.
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Which emulation backend to construct.
    pub emulation: Emulation,
    /// Default SID chip model.
    pub sid_model: SidModel,
    /// Default C64 board model.
    pub c64_model: C64Model,
    /// CIA timer chip model.
    pub cia_model: CiaModel,
    /// Use the configured SID model even when the tune names another.
    pub force_sid_model: bool,
    /// Use the configured C64 model even when the tune names another.
    pub force_c64_model: bool,
    /// Resampling strategy.
    pub sampling_method: SamplingMethod,
    /// Enable the synthesis filter.
    pub filter: bool,
    /// Boost digitized samples on the 8580.
    pub digi_boost: bool,
    song: u32,
    tone_shaping: ToneShaping,
    block_size: usize,
    roms: RomSet,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        PlaybackConfig {
            emulation: Emulation::default(),
            sid_model: SidModel::default(),
            c64_model: C64Model::default(),
            cia_model: CiaModel::default(),
            force_sid_model: false,
            force_c64_model: false,
            sampling_method: SamplingMethod::default(),
            filter: true,
            digi_boost: false,
            song: 0,
            tone_shaping: ToneShaping::default(),
            block_size: DEFAULT_BLOCK_SIZE,
            roms: RomSet::default(),
        }
    }
}

impl PlaybackConfig {
    /// Selected sub-song index.
    pub fn song(&self) -> u32 {
        self.song
    }

    /// Select a sub-song, 0 to [`MAX_SONG`].
    pub fn set_song(&mut self, song: u32) {
        if song > MAX_SONG {
            log::warn!("ignoring song index {song}: valid range is 0..={MAX_SONG}");
            return;
        }
        self.song = song;
    }

    /// Current tone-shaping parameters.
    pub fn tone_shaping(&self) -> ToneShaping {
        self.tone_shaping
    }

    /// Filter curve for the 6581 model, 0.0 to 1.0.
    pub fn set_filter_curve_6581(&mut self, curve: f64) {
        if !(0.0..=1.0).contains(&curve) {
            log::warn!("ignoring 6581 filter curve {curve}: valid range is 0.0..=1.0");
            return;
        }
        self.tone_shaping.curve_6581 = curve;
    }

    /// Filter curve for the 8580 model, 0.0 to 1.0.
    pub fn set_filter_curve_8580(&mut self, curve: f64) {
        if !(0.0..=1.0).contains(&curve) {
            log::warn!("ignoring 8580 filter curve {curve}: valid range is 0.0..=1.0");
            return;
        }
        self.tone_shaping.curve_8580 = curve;
    }

    /// Filter bias in millivolts, -600.0 to 600.0.
    pub fn set_filter_bias_mv(&mut self, bias: f64) {
        if !(-600.0..=600.0).contains(&bias) {
            log::warn!("ignoring filter bias {bias}: valid range is -600.0..=600.0");
            return;
        }
        self.tone_shaping.bias_mv = bias;
    }

    /// Output block size in bytes.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Set the output block size; must be at least one byte.
    pub fn set_block_size(&mut self, bytes: usize) {
        if bytes == 0 {
            log::warn!("ignoring zero block size");
            return;
        }
        self.block_size = bytes;
    }

    /// Currently assigned ROM images.
    pub fn roms(&self) -> &RomSet {
        &self.roms
    }

    /// Assign a kernal ROM image; anything but exactly
    /// [`KERNAL_ROM_SIZE`] bytes is rejected and the previous value kept.
    pub fn set_kernal(&mut self, rom: &[u8]) {
        if let Ok(image) = <[u8; KERNAL_ROM_SIZE]>::try_from(rom) {
            self.roms.kernal = Some(Box::new(image));
        }
    }

    /// Assign a basic ROM image; anything but exactly
    /// [`BASIC_ROM_SIZE`] bytes is rejected and the previous value kept.
    pub fn set_basic(&mut self, rom: &[u8]) {
        if let Ok(image) = <[u8; BASIC_ROM_SIZE]>::try_from(rom) {
            self.roms.basic = Some(Box::new(image));
        }
    }

    /// Assign a chargen ROM image; anything but exactly
    /// [`CHARGEN_ROM_SIZE`] bytes is rejected and the previous value kept.
    pub fn set_chargen(&mut self, rom: &[u8]) {
        if let Ok(image) = <[u8; CHARGEN_ROM_SIZE]>::try_from(rom) {
            self.roms.chargen = Some(Box::new(image));
        }
    }
}
