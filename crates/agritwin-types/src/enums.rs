//! Enumeration types for the `AgriTwin` simulation core.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Crop
// ---------------------------------------------------------------------------

/// A crop that can be simulated on a field.
///
/// The list matches the crops offered by the product's field setup form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Crop {
    /// Maize, the default crop.
    Corn,
    /// Common wheat.
    Wheat,
    /// Paddy rice.
    Rice,
    /// Soybean.
    Soybean,
}

// ---------------------------------------------------------------------------
// Climate
// ---------------------------------------------------------------------------

/// Climate scenario applied as a static growth multiplier for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Climate {
    /// Standard weather patterns.
    Normal,
    /// Low rainfall, high temperatures.
    Dry,
    /// Heavy precipitation.
    Wet,
}

impl Climate {
    /// Growth multiplier applied for the whole run: 0.7 under drought,
    /// 1.2 under excess rain, 1.0 otherwise.
    pub const fn growth_multiplier(self) -> f64 {
        match self {
            Self::Dry => 0.7,
            Self::Wet => 1.2,
            Self::Normal => 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// FieldEventKind
// ---------------------------------------------------------------------------

/// The kind of a field event surfaced during a simulated day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum FieldEventKind {
    /// Dry spell detected on the field.
    Drought,
    /// Storm passing over the field.
    Storm,
    /// Growing conditions are optimal.
    Optimal,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn climate_multipliers() {
        assert_eq!(Climate::Dry.growth_multiplier(), 0.7);
        assert_eq!(Climate::Wet.growth_multiplier(), 1.2);
        assert_eq!(Climate::Normal.growth_multiplier(), 1.0);
    }

    #[test]
    fn enums_round_trip_through_json() {
        let json = serde_json::to_string(&Crop::Soybean).unwrap();
        let back: Crop = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Crop::Soybean);

        let json = serde_json::to_string(&FieldEventKind::Storm).unwrap();
        let back: FieldEventKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, FieldEventKind::Storm);
    }
}
