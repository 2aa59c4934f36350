//! Voice profile registry
//!
//! Maps voice names to model handles (owned by the external model cache) and
//! reference-audio descriptors. Reference audio is tracked independently of
//! model registration so either can be configured first; synthesis requires
//! both.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{TtsError, TtsResult};
use crate::types::{is_supported_audio_path, ModelHandle, ReferenceAudio, VoiceProfile};
use crate::SUPPORTED_AUDIO_EXTS;

/// External model cache boundary. Loading, eviction, and resource lifetime
/// live behind this trait; the registry only calls through it.
pub trait ModelProvider: Send + Sync {
    fn load(&self, voice: &str, locator: &Path) -> TtsResult<ModelHandle>;
    /// `None` when the voice was never loaded or has been evicted.
    fn resolve(&self, voice: &str) -> Option<ModelHandle>;
    fn remove(&self, voice: &str);
}

/// Minimal provider used when no real cache is wired in: validates that the
/// model directory exists and hands the path back as the opaque handle.
#[derive(Default)]
pub struct DirectoryModelProvider {
    loaded: RwLock<HashMap<String, Arc<PathBuf>>>,
}

impl DirectoryModelProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModelProvider for DirectoryModelProvider {
    fn load(&self, voice: &str, locator: &Path) -> TtsResult<ModelHandle> {
        if !locator.is_dir() {
            return Err(TtsError::ModelLoad {
                voice: voice.to_string(),
                reason: format!("model directory {} does not exist", locator.display()),
            });
        }
        let handle = Arc::new(locator.to_path_buf());
        self.loaded
            .write()
            .insert(voice.to_string(), handle.clone());
        Ok(handle)
    }

    fn resolve(&self, voice: &str) -> Option<ModelHandle> {
        self.loaded
            .read()
            .get(voice)
            .map(|handle| handle.clone() as ModelHandle)
    }

    fn remove(&self, voice: &str) {
        self.loaded.write().remove(voice);
    }
}

pub struct VoiceRegistry {
    provider: Arc<dyn ModelProvider>,
    profiles: RwLock<HashSet<String>>,
    references: RwLock<HashMap<String, ReferenceAudio>>,
}

impl VoiceRegistry {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            provider,
            profiles: RwLock::new(HashSet::new()),
            references: RwLock::new(HashMap::new()),
        }
    }

    /// Register a voice, delegating the actual model load to the provider.
    /// `has_profile` becomes true only after the load succeeds.
    pub fn set_profile(&self, name: &str, locator: &Path) -> TtsResult<()> {
        self.provider.load(name, locator)?;
        self.profiles.write().insert(name.to_string());
        tracing::info!(voice = name, "Voice profile registered");
        Ok(())
    }

    pub fn has_profile(&self, name: &str) -> bool {
        self.profiles.read().contains(name)
    }

    /// Set the voice-cloning reference. An unsupported extension is logged
    /// and leaves any prior reference unchanged.
    pub fn set_reference(&self, name: &str, audio_path: &Path, transcript: &str) {
        if !is_supported_audio_path(audio_path) {
            tracing::error!(
                "Audio format {:?} is not supported. Only the following formats are supported: {:?}",
                audio_path.extension().unwrap_or_default(),
                SUPPORTED_AUDIO_EXTS
            );
            return;
        }
        self.references.write().insert(
            name.to_string(),
            ReferenceAudio::new(audio_path, transcript),
        );
        tracing::info!(voice = name, "Reference audio set");
    }

    pub fn has_reference(&self, name: &str) -> bool {
        self.references.read().contains_key(name)
    }

    /// Resolve a fully configured profile. Fails when the voice was never
    /// registered, its model is no longer resident, or no reference is set.
    pub fn resolve(&self, name: &str) -> TtsResult<VoiceProfile> {
        if !self.has_profile(name) {
            return Err(TtsError::ProfileNotFound(name.to_string()));
        }
        let model = self
            .provider
            .resolve(name)
            .ok_or_else(|| TtsError::ProfileNotFound(name.to_string()))?;
        let reference = self
            .references
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| TtsError::ReferenceNotSet(name.to_string()))?;
        Ok(VoiceProfile {
            name: name.to_string(),
            model,
            reference,
        })
    }

    /// Release the voice's model. Removing an unknown voice is a no-op; the
    /// reference audio is kept so the voice can be re-registered later.
    pub fn remove(&self, name: &str) {
        self.provider.remove(name);
        if self.profiles.write().remove(name) {
            tracing::info!(voice = name, "Voice profile removed");
        }
    }
}
