//! High-level synthesis API
//!
//! Bundles the voice registry and the session pipeline behind the calls an
//! embedding application actually makes: configure a voice, then speak text
//! to playback, to a file, or to a streaming channel.

use std::path::Path;
use std::sync::Arc;

use aria_foundation::RuntimeConfig;
use aria_tts::{ModelProvider, SynthesisBackend, TtsError, TtsResult, VoiceRegistry};

use crate::pipeline::SessionPipeline;
use crate::session::{SessionError, SessionOptions, StreamChunk, StreamSender};

/// Per-call options for `say` and `say_streaming`.
#[derive(Debug, Clone, Default)]
pub struct SayOptions {
    /// Play the audio live as it is produced.
    pub play: bool,
    /// Segment the text into sentence units; otherwise the whole text is one
    /// inference call.
    pub split: bool,
    /// Write the session's audio to this WAV path at completion.
    pub save_path: Option<std::path::PathBuf>,
}

pub struct Engine {
    registry: Arc<VoiceRegistry>,
    pipeline: SessionPipeline,
}

impl Engine {
    pub fn new(
        backend: Arc<dyn SynthesisBackend>,
        provider: Arc<dyn ModelProvider>,
        config: RuntimeConfig,
    ) -> Self {
        let registry = Arc::new(VoiceRegistry::new(provider));
        let pipeline = SessionPipeline::new(registry.clone(), backend, config);
        Self { registry, pipeline }
    }

    pub fn registry(&self) -> &Arc<VoiceRegistry> {
        &self.registry
    }

    pub fn pipeline(&self) -> &SessionPipeline {
        &self.pipeline
    }

    /// Register a voice from a model directory.
    pub fn load_voice(&self, name: &str, model_dir: &Path) -> TtsResult<()> {
        self.registry.set_profile(name, model_dir)
    }

    /// Release a voice's model. Unknown names are a no-op.
    pub fn unload_voice(&self, name: &str) {
        self.registry.remove(name);
    }

    /// Set the voice-cloning reference recording and its transcript.
    /// Must be called for a voice before `say`/`say_streaming`.
    pub fn set_reference_audio(&self, name: &str, audio_path: &Path, transcript: &str) {
        self.registry.set_reference(name, audio_path, transcript);
    }

    /// Speak `text` with `voice`, blocking until the session has fully
    /// drained (and the file, if requested, is on disk).
    pub fn say(&self, voice: &str, text: &str, options: SayOptions) -> Result<(), SessionError> {
        self.begin_session(voice, &options, None)?;
        self.feed_text(text, options.split);
        self.pipeline.end_session();
        self.pipeline.wait_for_completion();
        Ok(())
    }

    /// Speak `text` with `voice`, returning a channel that yields raw PCM
    /// chunks as they are produced, terminated by [`StreamChunk::End`].
    /// Returns without waiting; drop the receiver to discard the rest.
    pub fn say_streaming(
        &self,
        voice: &str,
        text: &str,
        options: SayOptions,
    ) -> Result<tokio::sync::mpsc::UnboundedReceiver<StreamChunk>, SessionError> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        self.begin_session(voice, &options, Some(tx))?;
        self.feed_text(text, options.split);
        self.pipeline.end_session();
        Ok(rx)
    }

    pub fn stop(&self) {
        self.pipeline.stop();
    }

    pub fn wait_for_completion(&self) {
        self.pipeline.wait_for_completion();
    }

    /// Structural checks happen here, before anything is queued: a voice
    /// with no reference audio fails fast instead of producing a session
    /// that silently skips every unit.
    fn begin_session(
        &self,
        voice: &str,
        options: &SayOptions,
        stream: Option<StreamSender>,
    ) -> Result<(), SessionError> {
        if !self.registry.has_reference(voice) {
            return Err(TtsError::ReferenceNotSet(voice.to_string()).into());
        }
        if let Some(path) = &options.save_path {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }
        self.pipeline.start_session(SessionOptions {
            voice: Some(voice.to_string()),
            play: options.play,
            save_path: options.save_path.clone(),
            stream,
        })
    }

    fn feed_text(&self, text: &str, split: bool) {
        if split {
            self.pipeline.feed(text);
        } else {
            self.pipeline.feed_unit(text);
        }
    }
}
