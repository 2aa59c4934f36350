//! Voice profiles and the synthesis backend boundary for Aria
//!
//! This crate provides the types and traits at the edge between the session
//! pipeline and its external collaborators: the model cache that owns loaded
//! models and the neural backend that turns one text unit into samples.

pub mod backend;
pub mod error;
pub mod registry;
pub mod types;

pub use backend::{BackendError, CancelFlag, InferenceAdapter, SynthesisBackend};
pub use error::{TtsError, TtsResult};
pub use registry::{DirectoryModelProvider, ModelProvider, VoiceRegistry};
pub use types::{
    is_supported_audio_path, ModelHandle, ReferenceAudio, VoiceProfile, SUPPORTED_AUDIO_EXTS,
};
