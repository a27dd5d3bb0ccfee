//! The growth stepper: one simulated day of crop development.
//!
//! [`step_day`] is a pure function of `(day, previous state, plan)` plus
//! two draws from the injected noise source. It produces the next
//! [`DayState`] with every numeric field clamped to its documented range.
//!
//! # Day-step model
//!
//! - growth follows a logistic curve centered at the run midpoint,
//!   gated multiplicatively by irrigation and the climate multiplier
//! - health is a fixed function of irrigation and fertilization levels
//! - soil moisture decays by 5% per day, is replenished by irrigation,
//!   and jitters by up to ±10 points
//! - NDVI is derived from growth and health
//! - on every tenth day a single event may be emitted
//!
//! Health carries no day dependence and no randomness: for a given plan
//! it is the same on every day of the run.

use agritwin_types::{Climate, DayState, FieldEvent, FieldEventKind, RunPlan};

use crate::noise::DayRandomness;

// ---------------------------------------------------------------------------
// Model constants
// ---------------------------------------------------------------------------

/// Lower clamp for soil moisture, in percent.
pub const SOIL_MOISTURE_FLOOR: f64 = 20.0;

/// Upper clamp for soil moisture, in percent.
pub const SOIL_MOISTURE_CEILING: f64 = 100.0;

/// Upper clamp for the vegetation index.
pub const NDVI_CEILING: f64 = 0.9;

/// Steepness of the logistic growth curve.
const GROWTH_CURVE_STEEPNESS: f64 = 0.1;

/// Daily soil moisture retention (5% drains each day).
const MOISTURE_RETENTION: f64 = 0.95;

/// Moisture points added per day at full irrigation.
const IRRIGATION_MOISTURE_GAIN: f64 = 40.0;

/// Events are only considered every this many days.
const EVENT_CADENCE: u32 = 10;

/// An event fires when the day's roll lands below this threshold.
const EVENT_CHANCE: f64 = 0.3;

/// Rolls below this threshold escalate to a climate-specific event.
const SEVERE_EVENT_CHANCE: f64 = 0.15;

// ---------------------------------------------------------------------------
// step_day
// ---------------------------------------------------------------------------

/// Compute the field state for `day` from the previous day's state.
///
/// For `day == 0` the previous state is [`DayState::initial`]. The only
/// field that feeds forward from `prev` is soil moisture; growth, health,
/// and NDVI are recomputed from the plan and the day number each step.
pub fn step_day(
    day: u32,
    prev: &DayState,
    plan: &RunPlan,
    noise: &mut dyn DayRandomness,
) -> DayState {
    let irrigation = plan.irrigation_factor();
    let fertilization = plan.fertilization_factor();
    let climate = plan.climate.growth_multiplier();

    // Logistic curve centered at the run midpoint:
    //   growth_rate = 100 / (1 + exp(-0.1 * (day - duration/2)))
    let midpoint = f64::from(plan.duration_days) / 2.0;
    let offset = f64::from(day) - midpoint;
    let growth_rate = 100.0 / (1.0 + (-GROWTH_CURVE_STEEPNESS * offset).exp());

    let growth = (growth_rate * irrigation * climate).clamp(0.0, 100.0);

    // health = 50 + irrigation*30 + fertilization*20
    let health = irrigation
        .mul_add(30.0, fertilization.mul_add(20.0, 50.0))
        .clamp(0.0, 100.0);

    // moisture = prev * 0.95 + irrigation*40 + jitter
    let jitter = noise.moisture_jitter(day);
    let soil_moisture = prev
        .soil_moisture
        .mul_add(
            MOISTURE_RETENTION,
            irrigation.mul_add(IRRIGATION_MOISTURE_GAIN, jitter),
        )
        .clamp(SOIL_MOISTURE_FLOOR, SOIL_MOISTURE_CEILING);

    // ndvi = 0.2 + (growth/100) * 0.7 * (health/100)
    let ndvi = (growth / 100.0 * 0.7)
        .mul_add(health / 100.0, 0.2)
        .clamp(0.0, NDVI_CEILING);

    DayState {
        day,
        growth,
        health,
        soil_moisture,
        ndvi,
        events: roll_events(day, plan.climate, noise),
    }
}

/// Roll for this day's events. At most one event is ever emitted, and only
/// on days that are a multiple of [`EVENT_CADENCE`] (day 0 included).
fn roll_events(day: u32, climate: Climate, noise: &mut dyn DayRandomness) -> Vec<FieldEvent> {
    if day.checked_rem(EVENT_CADENCE) != Some(0) {
        return Vec::new();
    }

    let roll = noise.event_roll(day);
    if roll >= EVENT_CHANCE {
        return Vec::new();
    }

    let (kind, message) = if climate == Climate::Dry && roll < SEVERE_EVENT_CHANCE {
        (FieldEventKind::Drought, "Drought detected!")
    } else if climate == Climate::Wet && roll < SEVERE_EVENT_CHANCE {
        (FieldEventKind::Storm, "Storm in progress!")
    } else {
        (FieldEventKind::Optimal, "Optimal conditions!")
    };

    vec![FieldEvent {
        kind,
        message: message.to_owned(),
    }]
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::arithmetic_side_effects)]
mod tests {
    use agritwin_types::Crop;

    use super::*;
    use crate::noise::SeededNoise;

    fn plan(irrigation: u8, fertilization: u8, climate: Climate, duration: u32) -> RunPlan {
        RunPlan {
            field: String::from("Field Alpha"),
            crop: Crop::Corn,
            area_hectares: 50.0,
            irrigation_percent: irrigation,
            fertilization_percent: fertilization,
            climate,
            duration_days: duration,
            seed: 42,
        }
    }

    /// Noise stub with fixed draws, for deterministic event assertions.
    struct FixedNoise {
        jitter: f64,
        roll: f64,
    }

    impl DayRandomness for FixedNoise {
        fn moisture_jitter(&mut self, _day: u32) -> f64 {
            self.jitter
        }

        fn event_roll(&mut self, _day: u32) -> f64 {
            self.roll
        }
    }

    #[test]
    fn all_fields_stay_in_range_across_full_runs() {
        for seed in [0, 1, 7, 42, u64::MAX] {
            let mut noise = SeededNoise::new(seed);
            for climate in [Climate::Normal, Climate::Dry, Climate::Wet] {
                let plan = plan(100, 100, climate, 120);
                let mut state = DayState::initial();
                for day in 0..=120 {
                    state = step_day(day, &state, &plan, &mut noise);
                    assert!((0.0..=100.0).contains(&state.growth), "growth day {day}");
                    assert!((0.0..=100.0).contains(&state.health), "health day {day}");
                    assert!(
                        (20.0..=100.0).contains(&state.soil_moisture),
                        "moisture day {day}"
                    );
                    assert!((0.0..=0.9).contains(&state.ndvi), "ndvi day {day}");
                }
            }
        }
    }

    #[test]
    fn growth_is_half_at_run_midpoint() {
        // At day 45 of a 90-day run the logistic curve sits exactly at its
        // center, so growth_rate = 50 and full irrigation under Normal
        // climate passes it through unchanged.
        let plan = plan(100, 100, Climate::Normal, 90);
        let mut noise = SeededNoise::new(1);
        let state = step_day(45, &DayState::initial(), &plan, &mut noise);
        assert!((state.growth - 50.0).abs() < 1e-9, "growth {}", state.growth);
    }

    #[test]
    fn health_is_deterministic_in_the_plan_only() {
        // 50 + 0.7*30 + 0.5*20 = 81 on every day of the run.
        let plan = plan(70, 50, Climate::Normal, 90);
        let mut noise = SeededNoise::new(3);
        let mut state = DayState::initial();
        for day in 0..=90 {
            state = step_day(day, &state, &plan, &mut noise);
            assert_eq!(state.health, 81.0, "day {day}");
        }
    }

    #[test]
    fn zero_irrigation_gates_growth_to_zero() {
        let plan = plan(0, 0, Climate::Dry, 30);
        let mut noise = SeededNoise::new(5);
        let mut state = DayState::initial();
        for day in 0..=30 {
            state = step_day(day, &state, &plan, &mut noise);
            assert_eq!(state.growth, 0.0, "day {day}");
            assert_eq!(state.health, 50.0, "day {day}");
        }
    }

    #[test]
    fn events_only_on_every_tenth_day() {
        let plan = plan(70, 50, Climate::Normal, 120);
        let mut noise = SeededNoise::new(9);
        let mut state = DayState::initial();
        for day in 0..=120 {
            state = step_day(day, &state, &plan, &mut noise);
            if day % 10 != 0 {
                assert!(state.events.is_empty(), "unexpected event on day {day}");
            }
            assert!(state.events.len() <= 1, "multiple events on day {day}");
        }
    }

    #[test]
    fn severe_roll_emits_drought_under_dry_climate() {
        let plan = plan(70, 50, Climate::Dry, 90);
        let mut noise = FixedNoise {
            jitter: 0.0,
            roll: 0.1,
        };
        let state = step_day(10, &DayState::initial(), &plan, &mut noise);
        let event = state.events.first().unwrap();
        assert_eq!(event.kind, FieldEventKind::Drought);
    }

    #[test]
    fn severe_roll_emits_storm_under_wet_climate() {
        let plan = plan(70, 50, Climate::Wet, 90);
        let mut noise = FixedNoise {
            jitter: 0.0,
            roll: 0.1,
        };
        let state = step_day(10, &DayState::initial(), &plan, &mut noise);
        let event = state.events.first().unwrap();
        assert_eq!(event.kind, FieldEventKind::Storm);
    }

    #[test]
    fn moderate_roll_emits_optimal_conditions() {
        // A roll in [0.15, 0.3) is below the event chance but above the
        // severe threshold, so it reads as optimal under any climate.
        for climate in [Climate::Normal, Climate::Dry, Climate::Wet] {
            let plan = plan(70, 50, climate, 90);
            let mut noise = FixedNoise {
                jitter: 0.0,
                roll: 0.2,
            };
            let state = step_day(20, &DayState::initial(), &plan, &mut noise);
            let event = state.events.first().unwrap();
            assert_eq!(event.kind, FieldEventKind::Optimal);
        }
    }

    #[test]
    fn high_roll_emits_nothing() {
        let plan = plan(70, 50, Climate::Dry, 90);
        let mut noise = FixedNoise {
            jitter: 0.0,
            roll: 0.9,
        };
        let state = step_day(30, &DayState::initial(), &plan, &mut noise);
        assert!(state.events.is_empty());
    }

    #[test]
    fn day_zero_can_emit_an_event() {
        // Day 0 is a multiple of the cadence, matching the behavior of
        // the first applied state on playback start.
        let plan = plan(70, 50, Climate::Normal, 90);
        let mut noise = FixedNoise {
            jitter: 0.0,
            roll: 0.2,
        };
        let state = step_day(0, &DayState::initial(), &plan, &mut noise);
        assert_eq!(state.events.len(), 1);
    }

    #[test]
    fn moisture_feeds_forward_and_clamps() {
        let plan = plan(0, 0, Climate::Normal, 90);
        // Strong negative jitter with no irrigation drains moisture to
        // the floor within a few days.
        let mut noise = FixedNoise {
            jitter: -10.0,
            roll: 0.9,
        };
        let mut state = DayState::initial();
        for day in 0..40 {
            state = step_day(day, &state, &plan, &mut noise);
        }
        assert_eq!(state.soil_moisture, 20.0);

        // Full irrigation with positive jitter saturates at the ceiling.
        let plan = self::plan(100, 0, Climate::Normal, 90);
        let mut noise = FixedNoise {
            jitter: 10.0,
            roll: 0.9,
        };
        for day in 0..40 {
            state = step_day(day, &state, &plan, &mut noise);
        }
        assert_eq!(state.soil_moisture, 100.0);
    }

    #[test]
    fn ndvi_tracks_growth_and_health() {
        let plan = plan(100, 100, Climate::Normal, 90);
        let mut noise = SeededNoise::new(11);
        // Late in the run growth saturates; with health at 100 the NDVI
        // formula gives 0.2 + 1.0*0.7*1.0 = 0.9 exactly at the ceiling.
        let state = step_day(90, &DayState::initial(), &plan, &mut noise);
        assert!(state.ndvi <= 0.9);
        assert!(state.ndvi > 0.85, "ndvi {}", state.ndvi);
    }
}
