//! Durable draft persistence.
//!
//! This module stores the in-progress quote request as a single JSON
//! document so an interrupted session can resume where it left off. The
//! draft holds only the three step payloads; transient submission flags are
//! never persisted.

mod error;

pub use error::DraftError;

use crate::state::{Step1Data, Step2Data, Step3Data};
use log::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const DRAFT_FILE_NAME: &str = "draft.json";

/// The serialized projection of wizard progress.
///
/// Missing sections deserialize to their defaults, so partially-written or
/// older drafts still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftPayload {
    #[serde(default)]
    pub step1: Step1Data,
    #[serde(default)]
    pub step2: Step2Data,
    #[serde(default)]
    pub step3: Step3Data,
}

/// Durable key-value persistence for exactly one draft document.
///
/// Implementations assume a single logical writer per session; `save` is
/// last-write-wins with no merging.
pub trait DraftStore {
    /// Return the saved draft, or `None` if there is none.
    ///
    /// A stored value that fails to parse is deleted and reported as no
    /// draft; corruption never propagates to the caller.
    fn load(&self) -> Option<DraftPayload>;

    /// Serialize and overwrite the draft unconditionally.
    fn save(&self, payload: &DraftPayload) -> Result<(), DraftError>;

    /// Delete the draft. Clearing an already-absent draft is not an error.
    fn clear(&self) -> Result<(), DraftError>;
}

impl<S: DraftStore> DraftStore for std::sync::Arc<S> {
    fn load(&self) -> Option<DraftPayload> {
        (**self).load()
    }

    fn save(&self, payload: &DraftPayload) -> Result<(), DraftError> {
        (**self).save(payload)
    }

    fn clear(&self) -> Result<(), DraftError> {
        (**self).clear()
    }
}

/// Draft store backed by a JSON file on disk.
///
pub struct FileDraftStore {
    path: PathBuf,
}

impl FileDraftStore {
    /// Return a store persisting to `draft.json` inside the given directory.
    ///
    pub fn new(dir: &Path) -> FileDraftStore {
        FileDraftStore {
            path: dir.join(DRAFT_FILE_NAME),
        }
    }

    /// The full path of the draft file.
    ///
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DraftStore for FileDraftStore {
    fn load(&self) -> Option<DraftPayload> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Failed to read draft at {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<DraftPayload>(&contents) {
            Ok(payload) => {
                debug!("Loaded draft from {}", self.path.display());
                Some(payload)
            }
            Err(e) => {
                warn!(
                    "Discarding corrupt draft at {}: {}",
                    self.path.display(),
                    e
                );
                if let Err(e) = self.clear() {
                    warn!("Failed to remove corrupt draft: {}", e);
                }
                None
            }
        }
    }

    fn save(&self, payload: &DraftPayload) -> Result<(), DraftError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| DraftError::CreateDirectoryFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let content = serde_json::to_string(payload)
            .map_err(|e| DraftError::SerializationFailed(e.to_string()))?;
        fs::write(&self.path, content).map_err(|e| DraftError::SaveFailed {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(())
    }

    fn clear(&self) -> Result<(), DraftError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DraftError::ClearFailed {
                path: self.path.clone(),
                source: e,
            }),
        }
    }
}

/// In-memory draft store for tests and headless drivers.
///
/// Holds the raw JSON string rather than the parsed payload so tests can
/// inject corrupt content and exercise the self-healing path.
#[derive(Default)]
#[allow(dead_code)]
pub struct MemoryDraftStore {
    slot: Mutex<Option<String>>,
}

#[allow(dead_code)]
impl MemoryDraftStore {
    /// Return a new empty store.
    ///
    pub fn new() -> MemoryDraftStore {
        MemoryDraftStore::default()
    }

    /// Replace the stored document with raw text, bypassing serialization.
    ///
    pub fn set_raw(&self, raw: &str) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(raw.to_string());
        }
    }

    /// Whether a document is currently stored.
    ///
    pub fn is_present(&self) -> bool {
        self.slot.lock().map(|s| s.is_some()).unwrap_or(false)
    }
}

impl DraftStore for MemoryDraftStore {
    fn load(&self) -> Option<DraftPayload> {
        let mut slot = self.slot.lock().ok()?;
        let contents = slot.as_ref()?;
        match serde_json::from_str::<DraftPayload>(contents) {
            Ok(payload) => Some(payload),
            Err(e) => {
                warn!("Discarding corrupt in-memory draft: {}", e);
                *slot = None;
                None
            }
        }
    }

    fn save(&self, payload: &DraftPayload) -> Result<(), DraftError> {
        let content = serde_json::to_string(payload)
            .map_err(|e| DraftError::SerializationFailed(e.to_string()))?;
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(content);
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), DraftError> {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("quote-tui-test-{}", Uuid::new_v4()))
    }

    fn sample_payload() -> DraftPayload {
        DraftPayload {
            step1: Step1Data {
                company_name: "Acme Shipping Co".to_string(),
                contact_email: "ops@acme-shipping.com".to_string(),
            },
            step2: Step2Data {
                vessel_name: "MV Meridian".to_string(),
                vessel_type: "Oil Tanker".to_string(),
            },
            step3: Step3Data {
                coverage_level: "Premium".to_string(),
                cargo_value: 1500000.50,
            },
        }
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = temp_dir();
        let store = FileDraftStore::new(&dir);
        let payload = sample_payload();

        store.save(&payload).unwrap();
        assert_eq!(store.load(), Some(payload));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_file_store_load_missing_returns_none() {
        let dir = temp_dir();
        let store = FileDraftStore::new(&dir);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_file_store_discards_corrupt_draft() {
        let dir = temp_dir();
        let store = FileDraftStore::new(&dir);

        fs::create_dir_all(&dir).unwrap();
        fs::write(store.path(), "{not valid json").unwrap();

        assert_eq!(store.load(), None);
        // Self-healing: the corrupt file is gone afterwards.
        assert!(!store.path().exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_file_store_clear_is_idempotent() {
        let dir = temp_dir();
        let store = FileDraftStore::new(&dir);

        store.save(&sample_payload()).unwrap();
        store.clear().unwrap();
        assert!(!store.path().exists());
        // Clearing again must succeed with the same observable state.
        store.clear().unwrap();
        assert_eq!(store.load(), None);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_file_store_save_overwrites() {
        let dir = temp_dir();
        let store = FileDraftStore::new(&dir);

        store.save(&DraftPayload::default()).unwrap();
        let payload = sample_payload();
        store.save(&payload).unwrap();
        assert_eq!(store.load(), Some(payload));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryDraftStore::new();
        let payload = sample_payload();
        store.save(&payload).unwrap();
        assert_eq!(store.load(), Some(payload));
    }

    #[test]
    fn test_memory_store_discards_corrupt_draft() {
        let store = MemoryDraftStore::new();
        store.set_raw("][ junk");
        assert_eq!(store.load(), None);
        assert!(!store.is_present());
    }

    #[test]
    fn test_memory_store_clear_is_idempotent() {
        let store = MemoryDraftStore::new();
        store.save(&sample_payload()).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_partial_draft_deserializes_with_defaults() {
        let store = MemoryDraftStore::new();
        store.set_raw(r#"{"step1":{"companyName":"Acme","contactEmail":"a@b.co"}}"#);
        let payload = store.load().unwrap();
        assert_eq!(payload.step1.company_name, "Acme");
        assert_eq!(payload.step2, Step2Data::default());
        assert_eq!(payload.step3, Step3Data::default());
    }
}
