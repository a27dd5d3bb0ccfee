//! Final run results: harvest estimate, overall score, and badge.
//!
//! Derived once playback completes, from the final [`DayState`] and the
//! run plan. The score rewards both crop development and staying close to
//! the sustainable irrigation and fertilization sweet spots.

use agritwin_types::{DayState, RunPlan, RunSummary};

/// Harvest estimate per hectare at full growth and full inputs, in tonnes.
const YIELD_TONNES_PER_HECTARE: f64 = 8.0;

/// Irrigation level considered sustainable, in percent.
const IRRIGATION_SWEET_SPOT: f64 = 70.0;

/// Fertilization level considered sustainable, in percent.
const FERTILIZATION_SWEET_SPOT: f64 = 60.0;

/// Scores above this earn the sustainable-farming badge.
pub const BADGE_THRESHOLD: f64 = 80.0;

/// Compute the results of a completed run.
///
/// - yield: `growth/100 * area * 8 t/ha`, gated by the irrigation and
///   fertilization factors
/// - score: mean of the final growth and a sustainability term that
///   penalizes distance from the input sweet spots, floored to a whole
///   number
pub fn compute(final_state: &DayState, plan: &RunPlan) -> RunSummary {
    let growth_fraction = final_state.growth / 100.0;
    let yield_tonnes = growth_fraction
        * plan.area_hectares
        * YIELD_TONNES_PER_HECTARE
        * plan.irrigation_factor()
        * plan.fertilization_factor();

    let irrigation_distance = (f64::from(plan.irrigation_percent) - IRRIGATION_SWEET_SPOT).abs();
    let fertilization_distance =
        (f64::from(plan.fertilization_percent) - FERTILIZATION_SWEET_SPOT).abs();
    let sustainability = (100.0 - irrigation_distance) * (100.0 - fertilization_distance) / 100.0;

    let score = ((final_state.growth + sustainability) / 2.0).floor();

    RunSummary {
        yield_tonnes,
        score,
        sustainable_badge: score > BADGE_THRESHOLD,
    }
}
