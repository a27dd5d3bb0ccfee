//! Core data structures for the `AgriTwin` simulation core.
//!
//! A [`RunPlan`] is the validated, immutable configuration of a single
//! simulation run. One [`DayState`] exists per simulated day, produced by
//! the stepper as a pure function of the previous day's state and the plan.
//! A [`RunSummary`] is derived once the run completes.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Climate, Crop, FieldEventKind};

// ---------------------------------------------------------------------------
// Initial day-state constants
// ---------------------------------------------------------------------------

/// Cumulative crop development at day 0, in percent.
pub const INITIAL_GROWTH: f64 = 0.0;

/// Plant health score at day 0, in percent.
pub const INITIAL_HEALTH: f64 = 100.0;

/// Soil moisture at day 0, in percent.
pub const INITIAL_SOIL_MOISTURE: f64 = 60.0;

/// Vegetation index proxy at day 0.
pub const INITIAL_NDVI: f64 = 0.2;

// ---------------------------------------------------------------------------
// RunPlan
// ---------------------------------------------------------------------------

/// Validated, immutable configuration of a simulation run.
///
/// Produced by config validation; the raw user-facing configuration lives
/// in the sim crate. Percentages are guaranteed to be in `[0, 100]`,
/// `area_hectares` is positive and finite, and `duration_days` is at
/// least 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RunPlan {
    /// Field identifier or display name.
    pub field: String,

    /// Crop grown on the field.
    pub crop: Crop,

    /// Field area in hectares (positive).
    pub area_hectares: f64,

    /// Irrigation level in percent of maximum water volume.
    pub irrigation_percent: u8,

    /// Fertilization level in percent of maximum NPK dosage.
    pub fertilization_percent: u8,

    /// Climate scenario for the whole run.
    pub climate: Climate,

    /// Run length in simulated days (at least 1).
    pub duration_days: u32,

    /// Noise seed; the same seed reproduces the same run exactly.
    pub seed: u64,
}

impl RunPlan {
    /// Irrigation level as a factor in `[0, 1]`.
    pub fn irrigation_factor(&self) -> f64 {
        f64::from(self.irrigation_percent) / 100.0
    }

    /// Fertilization level as a factor in `[0, 1]`.
    pub fn fertilization_factor(&self) -> f64 {
        f64::from(self.fertilization_percent) / 100.0
    }
}

// ---------------------------------------------------------------------------
// FieldEvent
// ---------------------------------------------------------------------------

/// An event surfaced during a simulated day.
///
/// Events are non-persistent: each [`DayState`] carries only the events
/// of its own day, never an accumulated history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FieldEvent {
    /// The kind of event.
    pub kind: FieldEventKind,

    /// Human-readable message for the event banner.
    pub message: String,
}

// ---------------------------------------------------------------------------
// DayState
// ---------------------------------------------------------------------------

/// The state of the simulated field on a single day.
///
/// All numeric fields are clamped to their stated ranges by construction:
/// `growth` and `health` in `[0, 100]`, `soil_moisture` in `[20, 100]`,
/// `ndvi` in `[0, 0.9]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DayState {
    /// The simulated day this state belongs to (`0..=duration_days`).
    pub day: u32,

    /// Cumulative crop development in percent.
    pub growth: f64,

    /// Plant health score in percent.
    pub health: f64,

    /// Soil moisture in percent.
    pub soil_moisture: f64,

    /// Normalized Difference Vegetation Index proxy.
    pub ndvi: f64,

    /// Events for this day only (empty most days, at most one entry).
    pub events: Vec<FieldEvent>,
}

impl DayState {
    /// The fixed state a run starts from before any day is computed.
    pub const fn initial() -> Self {
        Self {
            day: 0,
            growth: INITIAL_GROWTH,
            health: INITIAL_HEALTH,
            soil_moisture: INITIAL_SOIL_MOISTURE,
            ndvi: INITIAL_NDVI,
            events: Vec::new(),
        }
    }
}

impl Default for DayState {
    fn default() -> Self {
        Self::initial()
    }
}

// ---------------------------------------------------------------------------
// RunSummary
// ---------------------------------------------------------------------------

/// Final results of a completed run, shown on the results panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RunSummary {
    /// Total harvest estimate in tonnes.
    pub yield_tonnes: f64,

    /// Overall score in `[0, 100]` combining yield and sustainability.
    pub score: f64,

    /// Whether the run earned the sustainable-farming badge.
    pub sustainable_badge: bool,
}
