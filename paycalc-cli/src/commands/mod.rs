pub mod paystub;
pub mod saved;
pub mod vehicle;

use anyhow::Context;
use tracing::debug;

use paycalc_core::store::{CalculationStore, StoreConfig, StoreRegistry};
use paycalc_store_json::JsonStoreFactory;

/// Open the saved-calculation store named on the command line.
pub async fn open_store(
    backend: &str,
    location: &str,
) -> anyhow::Result<Box<dyn CalculationStore>> {
    let mut registry = StoreRegistry::new();
    registry.register(Box::new(JsonStoreFactory));

    let config = StoreConfig {
        backend: backend.to_string(),
        location: location.to_string(),
    };

    debug!(backend, location, "opening calculation store");
    registry
        .create(&config)
        .await
        .with_context(|| format!("failed to open the '{backend}' store at {location}"))
}
