use serde::{Deserialize, Serialize};

use super::FEATURE_COUNT;

/// One normalized groundwater observation.
///
/// Field order matches the canonical column order of the combined dataset,
/// so serializing through `csv` reproduces the schema exactly. Numeric
/// fields are `Option<f64>`: `None` is an empty or non-numeric cell in the
/// source, while a column the source lacked entirely has already been filled
/// with the default by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// Raw date text as it appeared in the source; parsed (and possibly
    /// rejected) only when the prediction service loads the dataset.
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Water_Level_m")]
    pub water_level_m: Option<f64>,
    #[serde(rename = "Lat")]
    pub lat: Option<f64>,
    #[serde(rename = "Long")]
    pub long: Option<f64>,
    #[serde(rename = "Rainfall_mm")]
    pub rainfall_mm: Option<f64>,
    #[serde(rename = "Temperature_C")]
    pub temperature_c: Option<f64>,
    #[serde(rename = "pH")]
    pub ph: Option<f64>,
    #[serde(rename = "Dissolved_Oxygen_mg_L")]
    pub dissolved_oxygen_mg_l: Option<f64>,
}

impl CanonicalRecord {
    /// Feature cells in model order.
    pub fn feature_cells(&self) -> [Option<f64>; FEATURE_COUNT] {
        [
            self.lat,
            self.long,
            self.rainfall_mm,
            self.temperature_c,
            self.ph,
            self.dissolved_oxygen_mg_l,
        ]
    }

    /// True when the target and every feature carry a value, i.e. the row is
    /// usable for training.
    pub fn is_complete(&self) -> bool {
        self.water_level_m.is_some() && self.feature_cells().iter().all(Option::is_some)
    }
}
