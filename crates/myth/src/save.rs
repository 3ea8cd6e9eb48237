//! # Quick-Save
//!
//! Persists the scalars needed to resume a session: play time, player pose,
//! camera orbit and every tracked region's pressure. Terrain is a pure
//! function of its coordinate and is never written.
//!
//! ## Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "playTime": 42.5,
//!   "player": { "position": [1.0, 0.0, 2.0], "yaw": 90.0 },
//!   "camera": { "yaw": 10.0, "pitch": 25.0, "distance": 8.0 },
//!   "regions": [ { "x": 0, "z": 0, "state": 1, "pressure": 0.42 } ]
//! }
//! ```
//!
//! Files are written to a sibling temp file and renamed into place, so a
//! crash mid-write leaves the previous save intact.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use myth_region::RegionState;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Default quick-save file, relative to the working directory.
pub const DEFAULT_SAVE_PATH: &str = "saves/quicksave.json";

/// Current save format version.
pub const SAVE_VERSION: u32 = 1;

/// Persistence errors.
#[derive(Error, Debug)]
pub enum SaveError {
    /// Filesystem failure.
    #[error("save file {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not a valid save.
    #[error("malformed save data: {0}")]
    Json(#[from] serde_json::Error),

    /// Written by an incompatible build.
    #[error("unsupported save version {found} (expected {SAVE_VERSION})")]
    UnsupportedVersion {
        /// Version found in the file.
        found: u32,
    },
}

/// Player pose.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerSave {
    /// World position.
    pub position: [f32; 3],
    /// Facing, degrees.
    pub yaw: f32,
}

/// Camera orbit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSave {
    /// Orbit yaw, degrees.
    pub yaw: f32,
    /// Orbit pitch, degrees.
    pub pitch: f32,
    /// Orbit distance.
    pub distance: f32,
}

impl Default for CameraSave {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 25.0,
            distance: 8.0,
        }
    }
}

/// One tracked region.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionSave {
    /// Region X.
    pub x: i32,
    /// Region Z.
    pub z: i32,
    /// State at save time. Informational; pressure is authoritative.
    pub state: RegionState,
    /// Pressure in `[0, 1]`.
    pub pressure: f32,
}

/// Complete save document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveData {
    /// Format version.
    pub version: u32,
    /// Seconds played.
    #[serde(default)]
    pub play_time: f32,
    /// Player pose.
    #[serde(default)]
    pub player: PlayerSave,
    /// Camera orbit.
    #[serde(default)]
    pub camera: CameraSave,
    /// Tracked regions.
    #[serde(default)]
    pub regions: Vec<RegionSave>,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            version: SAVE_VERSION,
            play_time: 0.0,
            player: PlayerSave::default(),
            camera: CameraSave::default(),
            regions: Vec::new(),
        }
    }
}

impl SaveData {
    /// Serializes to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// [`SaveError::Json`] if a value cannot be represented (non-finite floats).
    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a JSON document and checks its version.
    ///
    /// # Errors
    ///
    /// [`SaveError::Json`] on malformed input, [`SaveError::UnsupportedVersion`]
    /// for any version other than [`SAVE_VERSION`].
    pub fn from_json(text: &str) -> Result<Self, SaveError> {
        let data: Self = serde_json::from_str(text)?;
        if data.version != SAVE_VERSION {
            return Err(SaveError::UnsupportedVersion { found: data.version });
        }
        Ok(data)
    }
}

/// Reads and writes one save file.
#[derive(Clone, Debug)]
pub struct SaveManager {
    path: PathBuf,
}

impl Default for SaveManager {
    fn default() -> Self {
        Self::new(DEFAULT_SAVE_PATH)
    }
}

impl SaveManager {
    /// Manager for the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Save file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a save file exists.
    #[must_use]
    pub fn save_exists(&self) -> bool {
        self.path.is_file()
    }

    /// Writes `data`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// [`SaveError::Io`] on filesystem failure, [`SaveError::Json`] if `data`
    /// cannot be serialized.
    pub fn save(&self, data: &SaveData) -> Result<(), SaveError> {
        let json = data.to_json()?;
        let io_err = |source| SaveError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        let written = fs::File::create(&tmp)
            .and_then(|mut file| {
                file.write_all(json.as_bytes())?;
                file.sync_all()
            })
            .and_then(|()| fs::rename(&tmp, &self.path));
        if let Err(source) = written {
            if let Err(err) = fs::remove_file(&tmp) {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %tmp.display(), error = %err, "Could not remove partial save");
                }
            }
            return Err(io_err(source));
        }

        info!(
            path = %self.path.display(),
            regions = data.regions.len(),
            play_time = data.play_time,
            "Game saved"
        );
        Ok(())
    }

    /// Reads the save file.
    ///
    /// # Errors
    ///
    /// [`SaveError::Io`] if the file cannot be read, otherwise as
    /// [`SaveData::from_json`].
    pub fn load(&self) -> Result<SaveData, SaveError> {
        let text = fs::read_to_string(&self.path).map_err(|source| SaveError::Io {
            path: self.path.clone(),
            source,
        })?;
        let data = SaveData::from_json(&text)?;
        info!(
            path = %self.path.display(),
            regions = data.regions.len(),
            play_time = data.play_time,
            "Game loaded"
        );
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_keys() {
        let data = SaveData {
            play_time: 12.5,
            regions: vec![RegionSave {
                x: -1,
                z: 2,
                state: RegionState::Fractured,
                pressure: 0.7,
            }],
            ..SaveData::default()
        };
        let value: serde_json::Value = serde_json::from_str(&data.to_json().unwrap()).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["playTime"], 12.5);
        assert_eq!(value["camera"]["pitch"], 25.0);
        assert_eq!(value["regions"][0]["state"], 2);
        assert_eq!(value["regions"][0]["x"], -1);
    }

    #[test]
    fn test_missing_sections_take_defaults() {
        let data = SaveData::from_json(r#"{ "version": 1, "camera": { "yaw": 30.0 } }"#).unwrap();
        assert_eq!(data.play_time, 0.0);
        assert_eq!(data.camera.yaw, 30.0);
        assert_eq!(data.camera.distance, 8.0);
        assert!(data.regions.is_empty());
    }

    #[test]
    fn test_rejects_future_version() {
        let err = SaveData::from_json(r#"{ "version": 7 }"#).unwrap_err();
        assert!(matches!(err, SaveError::UnsupportedVersion { found: 7 }));
    }

    #[test]
    fn test_failed_save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A directory in the way makes the final rename fail.
        let path = dir.path().join("slot.json");
        fs::create_dir(&path).unwrap();

        let manager = SaveManager::new(&path);
        let err = manager.save(&SaveData::default()).unwrap_err();
        assert!(matches!(err, SaveError::Io { .. }));
        assert!(!path.with_extension("json.tmp").exists());
        assert!(path.is_dir());
    }

    #[test]
    fn test_rejects_unknown_state() {
        let err = SaveData::from_json(
            r#"{ "version": 1, "regions": [ { "x": 0, "z": 0, "state": 9, "pressure": 0.1 } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SaveError::Json(_)));
    }
}
