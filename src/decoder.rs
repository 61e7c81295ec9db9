//! The streaming decoder element: ingest state machine and production loop.
//!
//! Upstream pushes tune bytes into [`SidDecoder::chain`]; the end-of-input
//! signal triggers a session build (parse, song select, load, negotiate,
//! backend construction) and, on success, a production task that pulls
//! sample blocks from the emulator and pushes stamped buffers downstream
//! until the tune completes, the consumer asks for end-of-stream, or a fatal
//! error occurs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::thread::JoinHandle;

use parking_lot::Mutex;

use crate::config::PlaybackConfig;
use crate::downstream::{AudioBuffer, FlowStatus, SharedDownstream};
use crate::emu::EmulationCore;
use crate::error::{Result, SidDecError};
use crate::format::NegotiatedFormat;
use crate::ingest::TuneBuffer;
use crate::metadata::TuneTags;
use crate::negotiate;
use crate::session::{EmulatorSession, PendingSession};
use crate::units::{self, Domain};

/// Lifecycle states of one decode cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecoderState {
    /// No tune bytes received yet.
    #[default]
    Idle,
    /// Accumulating tune bytes until end-of-input.
    Ingesting,
    /// Building and validating the emulation session.
    Building,
    /// The production task is emitting buffers.
    Playing,
    /// The session ended gracefully.
    Finished,
    /// The session ended with a fatal error; see
    /// [`SidDecoder::last_error`].
    Errored,
}

/// State shared between the element and its production task.
struct Shared {
    state: Mutex<DecoderState>,
    total_bytes: AtomicU64,
    song_count: AtomicU32,
    stop: AtomicBool,
    last_error: Mutex<Option<SidDecError>>,
}

impl Shared {
    fn new() -> Self {
        Shared {
            state: Mutex::new(DecoderState::Idle),
            total_bytes: AtomicU64::new(0),
            song_count: AtomicU32::new(0),
            stop: AtomicBool::new(false),
            last_error: Mutex::new(None),
        }
    }
}

/// Streaming SID tune decoder element.
///
/// One instance decodes one tune at a time; a new cycle starts with fresh
/// ingest after the previous session reached a terminal state.
pub struct SidDecoder {
    core: Arc<dyn EmulationCore>,
    downstream: Option<SharedDownstream>,
    config: PlaybackConfig,
    buffer: TuneBuffer,
    format: Option<NegotiatedFormat>,
    upstream_group_id: Option<u32>,
    shared: Arc<Shared>,
    task: Option<JoinHandle<()>>,
}

impl SidDecoder {
    /// Create a decoder driving the given emulation library.
    pub fn new(core: Arc<dyn EmulationCore>) -> Self {
        SidDecoder {
            core,
            downstream: None,
            config: PlaybackConfig::default(),
            buffer: TuneBuffer::new(),
            format: None,
            upstream_group_id: None,
            shared: Arc::new(Shared::new()),
            task: None,
        }
    }

    /// Attach the downstream consumer.
    pub fn link(&mut self, downstream: SharedDownstream) {
        self.downstream = Some(downstream);
    }

    /// Record a stream group id established by the upstream; reused in the
    /// stream-start announcement instead of allocating a fresh one.
    pub fn set_upstream_group_id(&mut self, group_id: u32) {
        self.upstream_group_id = Some(group_id);
    }

    /// Current configuration.
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Mutable configuration access; meant for use before or between
    /// playback sessions.
    pub fn config_mut(&mut self) -> &mut PlaybackConfig {
        &mut self.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DecoderState {
        *self.shared.state.lock()
    }

    /// Number of sub-songs in the built tune; 0 before any tune was built.
    pub fn song_count(&self) -> u32 {
        self.shared.song_count.load(Ordering::Relaxed)
    }

    /// The fatal error that moved the decoder to [`DecoderState::Errored`],
    /// if any.
    pub fn last_error(&self) -> Option<SidDecError> {
        self.shared.last_error.lock().clone()
    }

    /// Answer a position query in the requested domain, derived from the
    /// bytes produced so far in the current session.
    pub fn position(&self, domain: Domain) -> Result<i64> {
        let format = self.format.ok_or(SidDecError::NotNegotiated)?;
        let bytes = self.shared.total_bytes.load(Ordering::Relaxed) as i64;
        units::convert(bytes, Domain::Bytes, domain, &format)
    }

    /// Upstream segment announcements carry no seek semantics for this
    /// format and are ignored.
    pub fn new_segment(&mut self) {}

    /// Append a chunk of tune bytes.
    ///
    /// The first chunk after a terminal state stops any previous production
    /// task, releases the old session and begins a fresh ingest cycle.
    pub fn chain(&mut self, chunk: &[u8]) -> Result<usize> {
        match self.state() {
            DecoderState::Playing | DecoderState::Finished | DecoderState::Errored => {
                self.reset_cycle();
            }
            _ => {}
        }
        *self.shared.state.lock() = DecoderState::Ingesting;

        self.buffer.append(chunk).map_err(|err| {
            self.fail(err.clone());
            err
        })
    }

    /// Signal that the tune image is complete; builds the session and starts
    /// the production task.
    pub fn end_of_input(&mut self) -> Result<()> {
        *self.shared.state.lock() = DecoderState::Building;
        match self.start_session() {
            Ok(()) => Ok(()),
            Err(err) => {
                self.fail(err.clone());
                Err(err)
            }
        }
    }

    /// Tear the element down: stop the production task, release the session
    /// and the tune image. Safe to call from any state.
    pub fn shutdown(&mut self) {
        self.reset_cycle();
        *self.shared.state.lock() = DecoderState::Idle;
    }

    fn start_session(&mut self) -> Result<()> {
        let pending =
            PendingSession::prepare(self.core.as_ref(), self.buffer.as_slice(), self.config.song())?;
        self.shared
            .song_count
            .store(pending.song_count(), Ordering::Relaxed);

        let downstream = self
            .downstream
            .clone()
            .ok_or(SidDecError::CapabilitiesUnavailable)?;
        let format = {
            let mut sink = downstream.lock();
            negotiate::negotiate(&mut *sink, self.upstream_group_id)?
        };

        let session = pending.finish(self.core.as_ref(), &self.config, &format)?;

        self.format = Some(format);
        self.shared.total_bytes.store(0, Ordering::Relaxed);
        self.shared.stop.store(false, Ordering::Relaxed);
        *self.shared.last_error.lock() = None;

        {
            let mut sink = downstream.lock();
            sink.segment_start();
            sink.tags(&TuneTags::from_tune(session.tune()));
        }
        *self.shared.state.lock() = DecoderState::Playing;

        let shared = Arc::clone(&self.shared);
        let block_size = self.config.block_size();
        self.task = Some(std::thread::spawn(move || {
            play_loop(session, downstream, format, shared, block_size);
        }));

        Ok(())
    }

    fn fail(&mut self, err: SidDecError) {
        log::debug!("decode cycle failed: {err}");
        *self.shared.last_error.lock() = Some(err);
        *self.shared.state.lock() = DecoderState::Errored;
    }

    /// Stop the production task (dropping its session) and clear all
    /// per-cycle state.
    fn reset_cycle(&mut self) {
        self.shared.stop.store(true, Ordering::Relaxed);
        if let Some(task) = self.task.take() {
            let _ = task.join();
        }
        self.buffer.clear();
        self.format = None;
        self.shared.total_bytes.store(0, Ordering::Relaxed);
        self.shared.song_count.store(0, Ordering::Relaxed);
        *self.shared.last_error.lock() = None;
    }
}

impl Drop for SidDecoder {
    fn drop(&mut self) {
        self.shared.stop.store(true, Ordering::Relaxed);
        if let Some(task) = self.task.take() {
            let _ = task.join();
        }
    }
}

/// The production loop body, run on its own thread until a terminal state.
fn play_loop(
    mut session: EmulatorSession,
    downstream: SharedDownstream,
    format: NegotiatedFormat,
    shared: Arc<Shared>,
    block_size: usize,
) {
    // A negotiated format always has a nonzero rate and channel count, so
    // the stamp conversions below cannot hit a zero denominator.
    let stamp = |bytes: u64, to: Domain| -> i64 {
        units::convert(bytes as i64, Domain::Bytes, to, &format).unwrap_or(0)
    };
    let samples_per_block = (block_size / 2).max(1);

    loop {
        if shared.stop.load(Ordering::Relaxed) {
            log::info!("pausing task, reason: stopped");
            return;
        }

        let mut samples = vec![0i16; samples_per_block];
        let produced = session.player.render(&mut samples);
        if produced == 0 {
            downstream.lock().end_of_stream();
            *shared.state.lock() = DecoderState::Finished;
            log::info!("pausing task, reason: tune complete");
            return;
        }
        samples.truncate(produced);

        let position = shared.total_bytes.load(Ordering::Relaxed);
        let next_position = position + (produced as u64) * 2;

        let pts = stamp(position, Domain::Time);
        let buffer = AudioBuffer {
            offset: stamp(position, Domain::Samples),
            offset_end: stamp(next_position, Domain::Samples),
            pts,
            duration: stamp(next_position, Domain::Time) - pts,
            samples,
        };
        shared.total_bytes.store(next_position, Ordering::Relaxed);

        let flow = downstream.lock().push(buffer);
        match flow {
            FlowStatus::Ok => {}
            FlowStatus::Eos => {
                downstream.lock().end_of_stream();
                *shared.state.lock() = DecoderState::Finished;
                log::info!("pausing task, reason: {flow}");
                return;
            }
            FlowStatus::NotLinked | FlowStatus::Error => {
                *shared.last_error.lock() = Some(SidDecError::PushRejected {
                    reason: flow.to_string(),
                });
                // Announce end-of-stream anyway so downstream stages can
                // terminate cleanly.
                downstream.lock().end_of_stream();
                *shared.state.lock() = DecoderState::Errored;
                log::info!("pausing task, reason: {flow}");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emu::{SidBackend, SidPlayer, SidTune};

    /// Minimal core whose parser recognizes nothing.
    struct NullCore;

    impl EmulationCore for NullCore {
        fn parse_tune(&self, _image: &[u8]) -> std::result::Result<Box<dyn SidTune>, String> {
            Err("no magic marker".to_string())
        }
        fn create_player(&self) -> Box<dyn SidPlayer> {
            unreachable!("parse always fails")
        }
        fn create_backend(
            &self,
            _emulation: crate::config::Emulation,
        ) -> Option<Box<dyn SidBackend>> {
            None
        }
    }

    fn decoder() -> SidDecoder {
        SidDecoder::new(Arc::new(NullCore))
    }

    #[test]
    fn starts_idle_with_no_songs() {
        let dec = decoder();
        assert_eq!(dec.state(), DecoderState::Idle);
        assert_eq!(dec.song_count(), 0);
        assert!(dec.last_error().is_none());
    }

    #[test]
    fn first_chunk_enters_ingesting() {
        let mut dec = decoder();
        dec.chain(b"PSID").unwrap();
        assert_eq!(dec.state(), DecoderState::Ingesting);
    }

    #[test]
    fn overflow_moves_to_errored() {
        let mut dec = decoder();
        let big = vec![0u8; crate::ingest::TUNE_CAPACITY + 1];
        let err = dec.chain(&big).unwrap_err();
        assert!(matches!(err, SidDecError::IngestOverflow { .. }));
        assert_eq!(dec.state(), DecoderState::Errored);
        assert!(dec.last_error().is_some());
    }

    #[test]
    fn unparseable_input_errors_the_cycle() {
        let mut dec = decoder();
        dec.chain(b"not a tune").unwrap();
        let err = dec.end_of_input().unwrap_err();
        assert!(matches!(err, SidDecError::TuneParse(_)));
        assert_eq!(dec.state(), DecoderState::Errored);
    }

    #[test]
    fn position_before_negotiation_is_not_negotiated() {
        let dec = decoder();
        assert!(matches!(
            dec.position(Domain::Time),
            Err(SidDecError::NotNegotiated)
        ));
    }

    #[test]
    fn shutdown_is_safe_from_any_state() {
        let mut dec = decoder();
        dec.shutdown();
        dec.chain(b"data").unwrap();
        dec.shutdown();
        assert_eq!(dec.state(), DecoderState::Idle);
        // A fresh cycle can start afterwards.
        dec.chain(b"data").unwrap();
        assert_eq!(dec.state(), DecoderState::Ingesting);
    }
}
