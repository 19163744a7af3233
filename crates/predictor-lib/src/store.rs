//! Persistence for trained model bundles
//!
//! Bundles are serialized into a schema-versioned envelope with a SHA-256
//! checksum over the payload. Loading verifies both before deserializing,
//! so an incompatible or corrupted artifact is rejected instead of silently
//! mis-mapping features.

use crate::error::EngineError;
use crate::trainer::TrainedModelBundle;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Envelope schema version; bump on any incompatible bundle change
pub const BUNDLE_SCHEMA_VERSION: u32 = 1;

/// Persists and restores trained bundles by opaque key
pub trait ModelStore {
    fn save(&self, bundle: &TrainedModelBundle, key: &str) -> Result<(), EngineError>;
    fn load(&self, key: &str) -> Result<TrainedModelBundle, EngineError>;
}

/// Versioned on-disk representation of a bundle
#[derive(Debug, Serialize, Deserialize)]
struct BundleEnvelope {
    schema_version: u32,
    /// SHA-256 over the payload bytes
    checksum: String,
    /// JSON-serialized [`TrainedModelBundle`]
    payload: String,
}

/// Directory-backed model store, one file per key
#[derive(Debug, Clone)]
pub struct FileModelStore {
    root: PathBuf,
}

impl FileModelStore {
    /// Open (creating if needed) a store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, EngineError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.bundle.json"))
    }

    /// Write via a temp file and rename so a crashed save never leaves a
    /// half-written bundle behind
    fn write_atomic(&self, path: &Path, contents: &str) -> Result<(), EngineError> {
        let temp = path.with_extension("tmp");
        let mut file = File::create(&temp)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp, path)?;
        Ok(())
    }
}

impl ModelStore for FileModelStore {
    fn save(&self, bundle: &TrainedModelBundle, key: &str) -> Result<(), EngineError> {
        let payload = serde_json::to_string(bundle)?;
        let envelope = BundleEnvelope {
            schema_version: BUNDLE_SCHEMA_VERSION,
            checksum: compute_checksum(payload.as_bytes()),
            payload,
        };
        let path = self.path_for(key);
        self.write_atomic(&path, &serde_json::to_string(&envelope)?)?;
        info!(key, path = %path.display(), "model bundle saved");
        Ok(())
    }

    fn load(&self, key: &str) -> Result<TrainedModelBundle, EngineError> {
        let path = self.path_for(key);
        let raw = fs::read_to_string(&path)?;
        let envelope: BundleEnvelope =
            serde_json::from_str(&raw).map_err(|e| EngineError::IncompatibleBundle {
                reason: format!("unreadable envelope: {e}"),
            })?;

        if envelope.schema_version != BUNDLE_SCHEMA_VERSION {
            return Err(EngineError::IncompatibleBundle {
                reason: format!(
                    "schema version {} (expected {})",
                    envelope.schema_version, BUNDLE_SCHEMA_VERSION
                ),
            });
        }
        let computed = compute_checksum(envelope.payload.as_bytes());
        if computed != envelope.checksum {
            return Err(EngineError::IncompatibleBundle {
                reason: format!(
                    "checksum mismatch: expected {}, got {computed}",
                    envelope.checksum
                ),
            });
        }

        let bundle = serde_json::from_str(&envelope.payload).map_err(|e| {
            EngineError::IncompatibleBundle {
                reason: format!("unreadable payload: {e}"),
            }
        })?;
        info!(key, path = %path.display(), "model bundle loaded");
        Ok(bundle)
    }
}

/// SHA-256 of data, hex-encoded
fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
