use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{VehicleInputs, VehicleResults};

/// A vehicle calculation the user explicitly saved: the inputs and results
/// snapshotted at save time, plus an id and timestamp assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCalculation {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub label: String,
    pub inputs: VehicleInputs,
    pub results: VehicleResults,
}

/// For creating new saved calculations (no id or timestamp).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSavedCalculation {
    pub label: String,
    pub inputs: VehicleInputs,
    pub results: VehicleResults,
}
