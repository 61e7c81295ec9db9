//! Construction and ownership of one validated emulation session.
//!
//! A session is built in two halves because format negotiation sits between
//! loading the tune and constructing the synthesis backend: first
//! [`PendingSession::prepare`] parses, selects and loads, then
//! [`PendingSession::finish`] builds the backend against the negotiated
//! format. Every step is a hard gate; failing anywhere drops all partial
//! state. At most one finished session exists per decoder at a time.

use crate::config::PlaybackConfig;
use crate::emu::{EmulationCore, EngineConfig, SidBackend, SidPlayer, SidTune};
use crate::error::{Result, SidDecError};
use crate::format::NegotiatedFormat;

/// A tune parsed, selected and loaded, awaiting format negotiation.
pub struct PendingSession {
    tune: Box<dyn SidTune>,
    player: Box<dyn SidPlayer>,
    song_count: u32,
}

impl PendingSession {
    /// Parse `image`, select the configured sub-song and load it into a
    /// fresh player.
    pub fn prepare(core: &dyn EmulationCore, image: &[u8], song: u32) -> Result<Self> {
        let mut tune = core
            .parse_tune(image)
            .map_err(SidDecError::TuneParse)?;

        let available = tune.song_count();
        if !tune.select_song(song) {
            return Err(SidDecError::SongSelect {
                requested: song,
                available,
            });
        }

        let mut player = core.create_player();
        player.load(tune.as_ref()).map_err(SidDecError::Load)?;

        Ok(PendingSession {
            tune,
            player,
            song_count: available,
        })
    }

    /// Number of sub-songs in the parsed tune.
    pub fn song_count(&self) -> u32 {
        self.song_count
    }

    /// Build and install the synthesis backend and apply the engine
    /// configuration, yielding a ready-to-run session.
    pub fn finish(
        self,
        core: &dyn EmulationCore,
        config: &PlaybackConfig,
        format: &NegotiatedFormat,
    ) -> Result<EmulatorSession> {
        let mut player = self.player;

        let backend = build_backend(core, config, player.chip_count())?;

        let roms = config.roms();
        if let Some(kernal) = &roms.kernal {
            player.set_kernal(&kernal[..]);
        }
        if let Some(basic) = &roms.basic {
            player.set_basic(&basic[..]);
        }
        if let Some(chargen) = &roms.chargen {
            player.set_chargen(&chargen[..]);
        }

        player.install_backend(backend);
        player
            .configure(&EngineConfig::derive(config, format))
            .map_err(SidDecError::BuilderInit)?;

        Ok(EmulatorSession {
            player,
            tune: self.tune,
        })
    }
}

/// Instantiate, size and validate the configured synthesis backend.
fn build_backend(
    core: &dyn EmulationCore,
    config: &PlaybackConfig,
    chips: u32,
) -> Result<Box<dyn SidBackend>> {
    let mut backend = core.create_backend(config.emulation).ok_or_else(|| {
        SidDecError::BuilderInit(format!("{} backend unavailable", config.emulation))
    })?;

    check(backend.as_ref(), "construction")?;

    backend.create(chips);
    check(backend.as_ref(), "voice allocation")?;

    backend.set_filter(config.filter);
    check(backend.as_ref(), "filter setup")?;

    backend.set_tone_shaping(&config.tone_shaping());
    log::debug!("using {} emulation", backend.name());

    Ok(backend)
}

fn check(backend: &dyn SidBackend, step: &str) -> Result<()> {
    if backend.status() {
        Ok(())
    } else {
        Err(SidDecError::BuilderInit(format!(
            "{} reported an invalid state after {step}",
            backend.name()
        )))
    }
}

/// One constructed, validated emulation session.
///
/// Owns the loaded player (with its installed backend) and the tune
/// descriptor the tags are read from. Dropping the session releases the
/// whole emulator.
pub struct EmulatorSession {
    pub(crate) player: Box<dyn SidPlayer>,
    pub(crate) tune: Box<dyn SidTune>,
}

impl EmulatorSession {
    /// The tune this session plays.
    pub fn tune(&self) -> &dyn SidTune {
        self.tune.as_ref()
    }
}
