use async_trait::async_trait;

use paycalc_core::store::factory::{StoreConfig, StoreFactory};
use paycalc_core::store::repository::{CalculationStore, StoreError};

use crate::JsonFileStore;

/// [`StoreFactory`] for the JSON file backend.
///
/// Register this with a [`paycalc_core::store::StoreRegistry`] to make the
/// `"jsonfile"` backend available:
///
/// ```rust,no_run
/// use paycalc_core::store::StoreRegistry;
/// use paycalc_store_json::JsonStoreFactory;
///
/// let mut registry = StoreRegistry::new();
/// registry.register(Box::new(JsonStoreFactory));
/// ```
pub struct JsonStoreFactory;

#[async_trait]
impl StoreFactory for JsonStoreFactory {
    fn backend_name(&self) -> &'static str {
        "jsonfile"
    }

    /// Open the store described by `config.location`.
    ///
    /// Accepted location values:
    /// * A file path, e.g. `"saved-calcs.json"`. Created on first save if it
    ///   does not exist.
    /// * `":memory:"` — an ephemeral in-memory store (useful for tests).
    async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn CalculationStore>, StoreError> {
        let store = JsonFileStore::open(&config.location)?;
        Ok(Box::new(store))
    }
}

#[cfg(test)]
mod tests {
    use paycalc_core::store::factory::{StoreConfig, StoreFactory};

    use super::JsonStoreFactory;

    #[test]
    fn backend_name_is_jsonfile() {
        assert_eq!(JsonStoreFactory.backend_name(), "jsonfile");
    }

    #[tokio::test]
    async fn creates_in_memory_store() {
        let config = StoreConfig {
            backend: "jsonfile".to_string(),
            location: ":memory:".to_string(),
        };

        let result = JsonStoreFactory.create(&config).await;
        assert!(
            result.is_ok(),
            "failed to create in-memory store: {:#?}",
            result.err()
        );
    }
}
