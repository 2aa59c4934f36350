//! Core types for voice configuration

use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Opaque handle to a loaded synthesis model. The external model cache owns
/// the resource; backends downcast to their concrete model type.
pub type ModelHandle = Arc<dyn Any + Send + Sync>;

/// Reference audio file extensions the decoder collaborator accepts.
pub const SUPPORTED_AUDIO_EXTS: &[&str] = &["wav", "flac", "ogg", "aiff", "aif"];

pub fn is_supported_audio_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_AUDIO_EXTS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// A voice-cloning prompt: the reference recording and its transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceAudio {
    pub audio_path: PathBuf,
    pub transcript: String,
}

impl ReferenceAudio {
    pub fn new(audio_path: impl Into<PathBuf>, transcript: impl Into<String>) -> Self {
        Self {
            audio_path: audio_path.into(),
            transcript: transcript.into(),
        }
    }
}

/// A fully resolved voice: registered model plus reference audio. Only
/// profiles in this state may be synthesized.
#[derive(Clone)]
pub struct VoiceProfile {
    pub name: String,
    pub model: ModelHandle,
    pub reference: ReferenceAudio,
}

impl std::fmt::Debug for VoiceProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceProfile")
            .field("name", &self.name)
            .field("reference", &self.reference)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_extensions_are_case_insensitive() {
        assert!(is_supported_audio_path(Path::new("prompt.wav")));
        assert!(is_supported_audio_path(Path::new("prompt.WAV")));
        assert!(is_supported_audio_path(Path::new("prompt.FlAc")));
        assert!(is_supported_audio_path(Path::new("prompt.aif")));
    }

    #[test]
    fn unsupported_or_missing_extensions_are_rejected() {
        assert!(!is_supported_audio_path(Path::new("prompt.mp3")));
        assert!(!is_supported_audio_path(Path::new("prompt")));
        assert!(!is_supported_audio_path(Path::new("prompt.")));
    }
}
