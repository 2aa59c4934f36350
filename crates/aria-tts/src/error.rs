//! Error types for voice configuration and synthesis

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TtsError {
    /// Voice was never registered, or its model is no longer resident.
    #[error("Voice profile not found: {0}")]
    ProfileNotFound(String),

    /// `set_reference_audio` was never called for this voice.
    #[error("Reference audio not set for voice: {0}")]
    ReferenceNotSet(String),

    #[error("Model load failed for voice '{voice}': {reason}")]
    ModelLoad { voice: String, reason: String },

    #[error("Synthesis failed: {0}")]
    Synthesis(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TtsResult<T> = Result<T, TtsError>;
