//! The draft slot in `localStorage`.

use gloo_storage::errors::StorageError;
use gloo_storage::{LocalStorage, Storage};
use notes_ui_core::{DraftError, DraftRecord, DraftStore, SmolStr};

/// Draft record persisted under a single `localStorage` key.
///
/// When local storage is unavailable (privacy modes, sandboxed frames) the
/// store behaves as permanently empty and saves fail softly.
pub struct LocalDraftStore {
    key: SmolStr,
    available: bool,
}

impl LocalDraftStore {
    pub fn new(key: impl Into<SmolStr>) -> Self {
        let available = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .is_some();
        if !available {
            tracing::warn!("localStorage unavailable, drafts will not persist");
        }
        Self {
            key: key.into(),
            available,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl DraftStore for LocalDraftStore {
    fn load(&self) -> Result<Option<DraftRecord>, DraftError> {
        if !self.available {
            return Ok(None);
        }
        match LocalStorage::get::<DraftRecord>(self.key.as_str()) {
            Ok(record) => Ok(Some(record)),
            Err(StorageError::KeyNotFound(_)) => Ok(None),
            Err(StorageError::SerdeError(err)) => Err(DraftError::Malformed(err)),
            Err(err) => Err(DraftError::Storage(err.to_string())),
        }
    }

    fn save(&self, record: &DraftRecord) -> Result<(), DraftError> {
        if !self.available {
            return Err(DraftError::Storage("localStorage unavailable".into()));
        }
        LocalStorage::set(self.key.as_str(), record).map_err(|err| match err {
            StorageError::SerdeError(err) => DraftError::Malformed(err),
            err => DraftError::Storage(err.to_string()),
        })
    }

    fn clear(&self) {
        if self.available {
            LocalStorage::delete(self.key.as_str());
        }
    }
}
