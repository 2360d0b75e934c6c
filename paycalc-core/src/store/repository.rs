use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewSavedCalculation, SavedCalculation};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Persistence seam for saved vehicle calculations.
///
/// The calculation functions have no knowledge of this trait — persistence is
/// an optional convenience layered on top. Backends may be backed by a
/// synchronous medium (a JSON file, browser-style local storage); the trait
/// is async for interface consistency across backends.
#[async_trait]
pub trait CalculationStore: Send + Sync {
    /// Persists a new calculation, assigning its id and timestamp.
    async fn save(
        &self,
        calc: NewSavedCalculation,
    ) -> Result<SavedCalculation, StoreError>;

    async fn get(
        &self,
        id: i64,
    ) -> Result<SavedCalculation, StoreError>;

    /// All saved calculations, oldest first.
    async fn list(&self) -> Result<Vec<SavedCalculation>, StoreError>;

    /// Deletes one record; [`StoreError::NotFound`] if the id is unknown.
    async fn delete(
        &self,
        id: i64,
    ) -> Result<(), StoreError>;

    /// Removes every saved calculation.
    async fn clear(&self) -> Result<(), StoreError>;
}

impl std::fmt::Debug for dyn CalculationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn CalculationStore")
    }
}
