use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Free-form metric name → textual value pairs extracted from a health
/// report (e.g. "Hemoglobin" → "12.5 g/dL"). No schema beyond that;
/// downstream rules do substring matching on the values.
pub type HealthMetrics = HashMap<String, String>;

/// Four-part wellness plan. Always exactly these four keys; each list is
/// non-empty when produced by the structured generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellnessPlan {
    pub diet: Vec<String>,
    pub exercise: Vec<String>,
    pub sleep: Vec<String>,
    #[serde(rename = "localFoods")]
    pub local_foods: Vec<String>,
}
