//! Session pipeline: text queue, inference worker, and control surface
//!
//! Two persistent worker threads live across sessions: the inference worker
//! drains the text queue one unit at a time, and the playback worker drains
//! the frame queue into the output device. Session boundaries travel through
//! the text queue itself as tagged commands, so the workers never need a
//! session object of their own.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};
use parking_lot::{Condvar, Mutex};

use aria_audio::{write_wav_mono16, AudioFrame, PlayCommand, PlaybackWorker};
use aria_foundation::{PipelineState, RuntimeConfig, StateTracker};
use aria_text::Segmenter;
use aria_tts::{CancelFlag, InferenceAdapter, SynthesisBackend, VoiceRegistry};

use crate::session::{SessionError, SessionOptions, StreamChunk};

/// Commands carried by the text queue. Session boundaries are in-band:
/// `Begin` installs the session config on the worker, `EndOfStream` drains
/// and finalizes, `Cancel` terminates the worker thread.
enum TextCommand {
    Begin(Box<SessionOptions>),
    Unit(String),
    EndOfStream,
    Cancel,
}

/// Signals session finalization to `wait_for_completion` callers.
#[derive(Clone, Default)]
struct CompletionGate(Arc<GateInner>);

#[derive(Default)]
struct GateInner {
    done: Mutex<bool>,
    cv: Condvar,
}

impl CompletionGate {
    fn reset(&self) {
        *self.0.done.lock() = false;
    }

    fn signal(&self) {
        let mut done = self.0.done.lock();
        *done = true;
        self.0.cv.notify_all();
    }

    fn wait(&self) {
        let mut done = self.0.done.lock();
        while !*done {
            self.0.cv.wait(&mut done);
        }
    }
}

/// Worker handles and queue endpoints, guarded by the one control lock so
/// session bookkeeping stays atomic relative to spawn/reset decisions.
struct Control {
    text_tx: Sender<TextCommand>,
    text_rx: Receiver<TextCommand>,
    play_tx: Sender<PlayCommand>,
    play_rx: Receiver<PlayCommand>,
    infer_handle: Option<JoinHandle<()>>,
    playback_handle: Option<JoinHandle<()>>,
}

/// The session control surface. All methods are safe to call from any
/// thread; control operations serialize through one coarse lock.
pub struct SessionPipeline {
    control: Mutex<Control>,
    gate: CompletionGate,
    cancel: CancelFlag,
    state: StateTracker,
    start_mark: Arc<Mutex<Option<Instant>>>,
    registry: Arc<VoiceRegistry>,
    adapter: InferenceAdapter,
    segmenter: Segmenter,
    config: RuntimeConfig,
}

impl SessionPipeline {
    pub fn new(
        registry: Arc<VoiceRegistry>,
        backend: Arc<dyn SynthesisBackend>,
        config: RuntimeConfig,
    ) -> Self {
        let (text_tx, text_rx) = crossbeam_channel::unbounded();
        let (play_tx, play_rx) = crossbeam_channel::bounded(config.playback_queue_capacity);
        Self {
            control: Mutex::new(Control {
                text_tx,
                text_rx,
                play_tx,
                play_rx,
                infer_handle: None,
                playback_handle: None,
            }),
            gate: CompletionGate::default(),
            cancel: CancelFlag::new(),
            state: StateTracker::new(),
            start_mark: Arc::new(Mutex::new(None)),
            registry,
            adapter: InferenceAdapter::new(backend, config.sample_rate),
            segmenter: Segmenter::new(config.min_unit_length),
            config,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state.current()
    }

    /// Begin a session. Discards anything left in the queues by a previous
    /// session and lazily (re)spawns workers that have exited. Fails only on
    /// an unrecoverable setup problem (a worker thread cannot be spawned).
    pub fn start_session(&self, options: SessionOptions) -> Result<(), SessionError> {
        let mut control = self.control.lock();

        self.gate.reset();
        self.cancel.clear();
        *self.start_mark.lock() = None;

        drain(&control.text_rx);
        drain(&control.play_rx);

        self.ensure_workers(&mut control)?;

        if let Err(e) = self.state.transition(PipelineState::Active) {
            tracing::debug!("{}", e);
        }
        if control
            .text_tx
            .send(TextCommand::Begin(Box::new(options)))
            .is_err()
        {
            tracing::warn!("Text queue disconnected while starting session");
        }
        Ok(())
    }

    /// Segment `text` and enqueue the units. Non-blocking; empty input is a
    /// no-op. The first call of a session marks the latency start point.
    pub fn feed(&self, text: &str) {
        let control = self.control.lock();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        self.mark_start();
        for unit in self.segmenter.segment(trimmed) {
            if control.text_tx.send(TextCommand::Unit(unit)).is_err() {
                tracing::warn!("Text queue disconnected, dropping units");
                break;
            }
        }
    }

    /// Enqueue `text` as one unit without segmentation.
    pub fn feed_unit(&self, text: &str) {
        let control = self.control.lock();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        self.mark_start();
        if control
            .text_tx
            .send(TextCommand::Unit(trimmed.to_string()))
            .is_err()
        {
            tracing::warn!("Text queue disconnected, dropping unit");
        }
    }

    /// Mark the end of the session's text. The worker finalizes (save,
    /// stream terminator, completion signal) once everything queued before
    /// this point has been synthesized.
    pub fn end_session(&self) {
        let control = self.control.lock();
        if let Err(e) = self.state.transition(PipelineState::Draining) {
            tracing::debug!("{}", e);
        }
        if control.text_tx.send(TextCommand::EndOfStream).is_err() {
            tracing::warn!("Text queue disconnected while ending session");
        }
    }

    /// Cancel whatever is queued or in flight and quiesce both workers.
    /// Idempotent; calling with no session or before any session is a no-op.
    /// Blocks until both workers acknowledge by exiting.
    pub fn stop(&self) {
        let mut control = self.control.lock();
        if control.infer_handle.is_none() && control.playback_handle.is_none() {
            return;
        }

        self.cancel.set();
        // Unblock anyone parked in wait_for_completion; the session will
        // produce nothing further.
        self.gate.signal();

        drain(&control.text_rx);
        let _ = control.text_tx.send(TextCommand::Cancel);
        if let Some(handle) = control.infer_handle.take() {
            let _ = handle.join();
        }

        // The inference worker is gone, so nothing refills the playback
        // queue between the drain and the poison pill.
        drain(&control.play_rx);
        let _ = control.play_tx.try_send(PlayCommand::Cancel);
        if let Some(handle) = control.playback_handle.take() {
            let _ = handle.join();
        }

        self.cancel.clear();
        if let Err(e) = self.state.transition(PipelineState::Idle) {
            tracing::debug!("{}", e);
        }
        tracing::info!("Session pipeline stopped");
    }

    /// Block until the current session's finalization has run. Returns
    /// immediately when it already has (or after `stop`).
    pub fn wait_for_completion(&self) {
        self.gate.wait();
    }

    fn mark_start(&self) {
        let mut mark = self.start_mark.lock();
        if mark.is_none() {
            *mark = Some(Instant::now());
        }
    }

    fn ensure_workers(&self, control: &mut Control) -> Result<(), SessionError> {
        let infer_dead = control
            .infer_handle
            .as_ref()
            .map(|h| h.is_finished())
            .unwrap_or(true);
        if infer_dead {
            if let Some(handle) = control.infer_handle.take() {
                let _ = handle.join();
            }
            let worker = InferenceWorker {
                text_rx: control.text_rx.clone(),
                play_tx: control.play_tx.clone(),
                registry: self.registry.clone(),
                adapter: self.adapter.clone(),
                cancel: self.cancel.clone(),
                gate: self.gate.clone(),
                state: self.state.clone(),
                start_mark: self.start_mark.clone(),
                config: self.config.clone(),
                session: None,
            };
            let handle = thread::Builder::new()
                .name("aria-inference".to_string())
                .spawn(move || worker.run())
                .map_err(|e| SessionError::WorkerSpawn(e.to_string()))?;
            control.infer_handle = Some(handle);
        }

        let playback_dead = control
            .playback_handle
            .as_ref()
            .map(|h| h.is_finished())
            .unwrap_or(true);
        if playback_dead {
            if let Some(handle) = control.playback_handle.take() {
                let _ = handle.join();
            }
            let handle = PlaybackWorker::spawn(control.play_rx.clone(), self.config.poll_interval())
                .map_err(|e| SessionError::WorkerSpawn(e.to_string()))?;
            control.playback_handle = Some(handle);
        }
        Ok(())
    }
}

impl Drop for SessionPipeline {
    fn drop(&mut self) {
        self.stop();
    }
}

fn drain<T>(rx: &Receiver<T>) {
    while rx.try_recv().is_ok() {}
}

/// Session-local state the inference worker carries between commands.
struct ActiveSession {
    options: SessionOptions,
    frames: Vec<AudioFrame>,
    first_frame_seen: bool,
}

struct InferenceWorker {
    text_rx: Receiver<TextCommand>,
    play_tx: Sender<PlayCommand>,
    registry: Arc<VoiceRegistry>,
    adapter: InferenceAdapter,
    cancel: CancelFlag,
    gate: CompletionGate,
    state: StateTracker,
    start_mark: Arc<Mutex<Option<Instant>>>,
    config: RuntimeConfig,
    session: Option<ActiveSession>,
}

impl InferenceWorker {
    fn run(mut self) {
        loop {
            match self.text_rx.recv_timeout(self.config.poll_interval()) {
                Ok(TextCommand::Begin(options)) => {
                    self.session = Some(ActiveSession {
                        options: *options,
                        frames: Vec::new(),
                        first_frame_seen: false,
                    });
                }
                Ok(TextCommand::Unit(unit)) => self.handle_unit(&unit),
                Ok(TextCommand::EndOfStream) => self.finalize(),
                Ok(TextCommand::Cancel) => break,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        tracing::debug!("Inference worker exiting");
    }

    fn handle_unit(&mut self, unit: &str) {
        if self.cancel.is_set() {
            return;
        }
        let Some(session) = self.session.as_ref() else {
            tracing::debug!("Dropping unit with no active session");
            return;
        };
        let Some(voice) = session.options.voice.clone() else {
            tracing::error!("No voice configured for this session, dropping unit");
            return;
        };
        let profile = match self.registry.resolve(&voice) {
            Ok(profile) => profile,
            Err(e) => {
                // Configuration problems are per-unit, never fatal: a later
                // unit may target a correctly configured voice.
                tracing::error!("Cannot synthesize unit: {}", e);
                return;
            }
        };

        let Some(frame) = self.adapter.synthesize(unit, &profile, &self.cancel) else {
            return;
        };
        // A stop may have landed while inference was in flight; its output
        // must not reach any sink.
        if self.cancel.is_set() {
            return;
        }
        self.deliver(frame);
    }

    /// Fan one frame out to every requested sink. Sinks fail independently;
    /// none of them can stall or abort the inference path.
    fn deliver(&mut self, frame: AudioFrame) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if !session.first_frame_seen {
            session.first_frame_seen = true;
            if let Some(started) = *self.start_mark.lock() {
                tracing::info!(
                    "First packet latency: {:.3} seconds",
                    started.elapsed().as_secs_f64()
                );
            }
        }

        if session.options.play {
            match self.play_tx.try_send(PlayCommand::Frame(frame.clone())) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    tracing::warn!("Playback queue full, dropping frame");
                }
                Err(TrySendError::Disconnected(_)) => {
                    tracing::warn!("Playback worker gone, dropping frame");
                }
            }
        }

        if session.options.save_path.is_some() {
            session.frames.push(frame.clone());
        }

        if let Some(stream) = &session.options.stream {
            if stream.send(StreamChunk::Pcm(frame.to_pcm16_bytes())).is_err() {
                tracing::warn!("Stream sink closed, dropping chunk");
            }
        }
    }

    /// End-of-stream: flush the accumulated audio to disk if requested,
    /// terminate the streaming channel, and wake completion waiters.
    fn finalize(&mut self) {
        if let Some(mut session) = self.session.take() {
            if let Some(path) = session.options.save_path.take() {
                if session.frames.is_empty() {
                    tracing::warn!("No audio produced, skipping save to {}", path.display());
                } else {
                    let samples: Vec<f32> = session
                        .frames
                        .iter()
                        .flat_map(|f| f.samples.iter().copied())
                        .collect();
                    match write_wav_mono16(&path, self.config.sample_rate, &samples) {
                        Ok(()) => tracing::info!("Saved session audio to {}", path.display()),
                        Err(e) => tracing::error!("Failed to save session audio: {}", e),
                    }
                }
            }
            if let Some(stream) = &session.options.stream {
                let _ = stream.send(StreamChunk::End);
            }
        }
        if let Err(e) = self.state.transition(PipelineState::Idle) {
            tracing::debug!("{}", e);
        }
        self.gate.signal();
    }
}
