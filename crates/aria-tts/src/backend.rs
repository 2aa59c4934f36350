//! Synthesis backend boundary and the adapter that normalizes its failures

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use aria_audio::AudioFrame;

use crate::types::{ModelHandle, ReferenceAudio, VoiceProfile};

/// Cooperative cancellation flag shared between the control surface and
/// backends. Long-running inference polls it and bails out early when set.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Inference cancelled")]
    Cancelled,

    #[error("Model handle has the wrong type for this backend")]
    ModelMismatch,
}

/// One inference call for one text unit.
///
/// Implementations poll `cancel` at a reasonable granularity so a stop
/// request does not have to wait for the full call; a backend that never
/// polls still works, with cancellation latency bounded by one call.
/// `Ok(None)` means the unit produced no audio (e.g. empty after
/// normalization).
pub trait SynthesisBackend: Send + Sync {
    fn run(
        &self,
        unit: &str,
        reference: &ReferenceAudio,
        model: &ModelHandle,
        cancel: &CancelFlag,
    ) -> Result<Option<Vec<f32>>, BackendError>;
}

/// Wraps the backend so the session pipeline only ever sees
/// `Some(frame)` or `None`: every failure is logged here and the pipeline
/// moves on to the next unit.
#[derive(Clone)]
pub struct InferenceAdapter {
    backend: Arc<dyn SynthesisBackend>,
    sample_rate: u32,
}

impl InferenceAdapter {
    pub fn new(backend: Arc<dyn SynthesisBackend>, sample_rate: u32) -> Self {
        Self {
            backend,
            sample_rate,
        }
    }

    pub fn synthesize(
        &self,
        unit: &str,
        profile: &VoiceProfile,
        cancel: &CancelFlag,
    ) -> Option<AudioFrame> {
        match self
            .backend
            .run(unit, &profile.reference, &profile.model, cancel)
        {
            Ok(Some(samples)) if !samples.is_empty() => {
                Some(AudioFrame::new(samples, self.sample_rate))
            }
            Ok(_) => {
                tracing::debug!(voice = %profile.name, "Unit produced no audio, skipping");
                None
            }
            Err(BackendError::Cancelled) => {
                tracing::debug!(voice = %profile.name, "Inference cancelled");
                None
            }
            Err(e) => {
                tracing::error!(voice = %profile.name, "Synthesis failed for unit: {}", e);
                None
            }
        }
    }
}
