pub mod factory;

pub use factory::JsonStoreFactory;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use paycalc_core::models::{NewSavedCalculation, SavedCalculation};
use paycalc_core::store::repository::{CalculationStore, StoreError};

/// The on-disk document. Ids are never reused after a delete, so a saved
/// calculation keeps its id for its whole lifetime.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    next_id: i64,
    records: Vec<SavedCalculation>,
}

/// [`CalculationStore`] backed by a single JSON file.
///
/// The whole document is held in memory behind a mutex and rewritten on
/// every mutation, which is the right trade-off for a store that holds a
/// handful of user-saved calculations. Writes go to a sibling temp file
/// first and are renamed into place, so a crash mid-write never leaves a
/// truncated document behind.
///
/// The location `":memory:"` skips the file entirely and keeps the document
/// in memory only, which tests and one-off runs use.
pub struct JsonFileStore {
    path: Option<PathBuf>,
    state: Mutex<StoreDocument>,
}

impl JsonFileStore {
    /// Open the store at `location`, creating the file on first save.
    ///
    /// Accepted location values:
    /// * A file path, e.g. `"saved-calcs.json"`. If the file exists it is
    ///   read and deserialized; otherwise the store starts empty.
    /// * `":memory:"` for an ephemeral store.
    pub fn open(location: &str) -> Result<Self, StoreError> {
        if location == ":memory:" {
            return Ok(Self {
                path: None,
                state: Mutex::new(StoreDocument {
                    next_id: 1,
                    records: Vec::new(),
                }),
            });
        }

        let path = PathBuf::from(location);
        let document = if path.exists() {
            let json = fs::read_to_string(&path)
                .map_err(|e| StoreError::Storage(format!("failed to read {location}: {e}")))?;
            serde_json::from_str(&json)
                .map_err(|e| StoreError::Serialization(format!("invalid store document: {e}")))?
        } else {
            StoreDocument {
                next_id: 1,
                records: Vec::new(),
            }
        };

        Ok(Self {
            path: Some(path),
            state: Mutex::new(document),
        })
    }

    /// In-memory store, equivalent to `open(":memory:")`.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: Mutex::new(StoreDocument {
                next_id: 1,
                records: Vec::new(),
            }),
        }
    }

    fn persist(
        path: &Path,
        document: &StoreDocument,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(document)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .map_err(|e| StoreError::Storage(format!("failed to write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, path)
            .map_err(|e| StoreError::Storage(format!("failed to rename into {}: {e}", path.display())))?;

        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, StoreDocument>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Storage("store mutex poisoned".to_string()))
    }
}

#[async_trait]
impl CalculationStore for JsonFileStore {
    async fn save(
        &self,
        calc: NewSavedCalculation,
    ) -> Result<SavedCalculation, StoreError> {
        let mut state = self.lock()?;

        let record = SavedCalculation {
            id: state.next_id,
            created_at: Utc::now(),
            label: calc.label,
            inputs: calc.inputs,
            results: calc.results,
        };
        state.next_id += 1;
        state.records.push(record.clone());

        if let Some(path) = &self.path {
            Self::persist(path, &state)?;
        }
        debug!(id = record.id, "saved calculation");

        Ok(record)
    }

    async fn get(
        &self,
        id: i64,
    ) -> Result<SavedCalculation, StoreError> {
        let state = self.lock()?;
        state
            .records
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> Result<Vec<SavedCalculation>, StoreError> {
        let state = self.lock()?;
        // Records are appended in save order, so this is oldest first.
        Ok(state.records.clone())
    }

    async fn delete(
        &self,
        id: i64,
    ) -> Result<(), StoreError> {
        let mut state = self.lock()?;

        let before = state.records.len();
        state.records.retain(|r| r.id != id);
        if state.records.len() == before {
            return Err(StoreError::NotFound);
        }

        if let Some(path) = &self.path {
            Self::persist(path, &state)?;
        }
        debug!(id, "deleted calculation");

        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut state = self.lock()?;

        state.records.clear();
        if let Some(path) = &self.path {
            Self::persist(path, &state)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use paycalc_core::calculations::vehicle::calculate_all;
    use paycalc_core::models::{InputMode, VehicleQuote};

    use super::*;

    fn sample_calculation(label: &str) -> NewSavedCalculation {
        let quote = VehicleQuote {
            purchase_price: Some(dec!(30000)),
            ..VehicleQuote::default()
        };
        let inputs = quote
            .into_inputs(InputMode::Lenient)
            .expect("lenient conversion cannot fail");
        let results = calculate_all(&inputs);

        NewSavedCalculation {
            label: label.to_string(),
            inputs,
            results,
        }
    }

    fn temp_store_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "paycalc-store-test-{}-{tag}.json",
            std::process::id()
        ))
    }

    #[tokio::test]
    async fn test_save_assigns_sequential_ids() {
        let store = JsonFileStore::in_memory();

        let first = store.save(sample_calculation("first")).await.unwrap();
        let second = store.save(sample_calculation("second")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.label, "first");
    }

    #[tokio::test]
    async fn test_get_round_trip() {
        let store = JsonFileStore::in_memory();

        let saved = store.save(sample_calculation("commuter")).await.unwrap();
        let fetched = store.get(saved.id).await.unwrap();

        assert_eq!(fetched, saved);
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let store = JsonFileStore::in_memory();

        let result = store.get(99).await;

        assert_eq!(result, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_list_is_oldest_first() {
        let store = JsonFileStore::in_memory();

        store.save(sample_calculation("a")).await.unwrap();
        store.save(sample_calculation("b")).await.unwrap();
        store.save(sample_calculation("c")).await.unwrap();

        let all = store.list().await.unwrap();

        assert_eq!(all.len(), 3);
        assert_eq!(
            all.iter().map(|r| r.label.as_str()).collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
    }

    #[tokio::test]
    async fn test_delete_removes_only_the_target() {
        let store = JsonFileStore::in_memory();

        let first = store.save(sample_calculation("keep")).await.unwrap();
        let second = store.save(sample_calculation("drop")).await.unwrap();

        store.delete(second.id).await.unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, first.id);

        assert_eq!(store.get(second.id).await, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_unknown_id() {
        let store = JsonFileStore::in_memory();

        assert_eq!(store.delete(7).await, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let store = JsonFileStore::in_memory();

        let first = store.save(sample_calculation("a")).await.unwrap();
        store.delete(first.id).await.unwrap();

        let second = store.save(sample_calculation("b")).await.unwrap();

        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_clear_empties_the_store() {
        let store = JsonFileStore::in_memory();

        store.save(sample_calculation("a")).await.unwrap();
        store.save(sample_calculation("b")).await.unwrap();

        store.clear().await.unwrap();

        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let path = temp_store_path("reopen");
        let _ = fs::remove_file(&path);

        let saved = {
            let store = JsonFileStore::open(path.to_str().unwrap()).unwrap();
            store.save(sample_calculation("garaged")).await.unwrap()
        };

        let reopened = JsonFileStore::open(path.to_str().unwrap()).unwrap();
        let fetched = reopened.get(saved.id).await.unwrap();

        assert_eq!(fetched, saved);

        // Ids continue from where the previous session stopped.
        let next = reopened.save(sample_calculation("second")).await.unwrap();
        assert_eq!(next.id, saved.id + 1);

        let _ = fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_open_rejects_corrupt_document() {
        let path = temp_store_path("corrupt");
        fs::write(&path, "{ not json").unwrap();

        let result = JsonFileStore::open(path.to_str().unwrap());

        assert!(matches!(result, Err(StoreError::Serialization(_))));

        let _ = fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_open_missing_file_starts_empty() {
        let path = temp_store_path("missing");
        let _ = fs::remove_file(&path);

        let store = JsonFileStore::open(path.to_str().unwrap()).unwrap();

        assert!(store.list().await.unwrap().is_empty());
    }
}
