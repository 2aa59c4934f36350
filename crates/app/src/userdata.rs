//! Persisted REPL convenience data

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Remembers the last model directory used per voice so `/load <voice>` can
/// omit the path on later runs.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UserData {
    #[serde(default)]
    pub last_model_paths: HashMap<String, PathBuf>,
}

impl UserData {
    /// A missing or unreadable file just means empty data; the REPL must
    /// start regardless.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => match toml::from_str(&raw) {
                Ok(data) => data,
                Err(e) => {
                    tracing::warn!("Ignoring malformed user data {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self, path: &Path) {
        let raw = match toml::to_string_pretty(self) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Cannot serialize user data: {}", e);
                return;
            }
        };
        if let Err(e) = std::fs::write(path, raw) {
            tracing::warn!("Cannot write user data {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_model_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("userdata.toml");

        let mut data = UserData::default();
        data.last_model_paths
            .insert("mika".into(), PathBuf::from("./models/mika"));
        data.save(&path);

        let loaded = UserData::load(&path);
        assert_eq!(
            loaded.last_model_paths.get("mika"),
            Some(&PathBuf::from("./models/mika"))
        );
    }

    #[test]
    fn missing_file_loads_empty() {
        let data = UserData::load(Path::new("/nonexistent/userdata.toml"));
        assert!(data.last_model_paths.is_empty());
    }

    #[test]
    fn malformed_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("userdata.toml");
        std::fs::write(&path, "last_model_paths = 42").unwrap();
        let data = UserData::load(&path);
        assert!(data.last_model_paths.is_empty());
    }
}
