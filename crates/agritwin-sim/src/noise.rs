//! Deterministic per-day noise for the growth stepper.
//!
//! The only stochastic parts of the day-step model are the soil moisture
//! jitter and the event roll. Both are drawn from a seeded `xorshift64`
//! generator keyed on `(seed, day, stream)`, so the same seed always
//! reproduces the same run and a given day's values never depend on how
//! many times the run was stepped, paused, or reset.
//!
//! The stepper consumes randomness through the [`DayRandomness`] trait,
//! which lets tests substitute fixed values.

// ---------------------------------------------------------------------------
// DayRandomness
// ---------------------------------------------------------------------------

/// Source of the per-day random draws used by the growth stepper.
pub trait DayRandomness: Send {
    /// Soil moisture jitter for the given day, in `[-10, 10]`.
    fn moisture_jitter(&mut self, day: u32) -> f64;

    /// Event roll for the given day, in `[0, 1)`.
    fn event_roll(&mut self, day: u32) -> f64;
}

// ---------------------------------------------------------------------------
// SeededNoise
// ---------------------------------------------------------------------------

/// Stream constant separating moisture draws from event draws.
const MOISTURE_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

/// Stream constant separating event draws from moisture draws.
const EVENT_STREAM: u64 = 0x517c_c1b7_2722_0a95;

/// Deterministic noise source backed by `xorshift64`.
///
/// Stateless apart from the seed: every draw is a pure function of
/// `(seed, day, stream)`, which is what makes replay after a reset
/// bit-identical to the original run.
#[derive(Debug, Clone)]
pub struct SeededNoise {
    /// The run seed all per-day draws derive from.
    seed: u64,
}

impl SeededNoise {
    /// Create a noise source for the given run seed.
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Return the run seed.
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl DayRandomness for SeededNoise {
    fn moisture_jitter(&mut self, day: u32) -> f64 {
        let bits = day_noise(self.seed, u64::from(day), MOISTURE_STREAM);
        // Map [0, 1) onto [-10, 10).
        unit_interval(bits).mul_add(20.0, -10.0)
    }

    fn event_roll(&mut self, day: u32) -> f64 {
        let bits = day_noise(self.seed, u64::from(day), EVENT_STREAM);
        unit_interval(bits)
    }
}

/// Deterministic pseudo-random number generator using `xorshift64`.
///
/// Combines the run seed, day number, and stream constant to produce a
/// unique value for each `(seed, day, stream)` triple. The same inputs
/// always produce the same output.
const fn day_noise(seed: u64, day: u64, stream: u64) -> u64 {
    // Combine seed and day with a mixing step to avoid trivial patterns.
    let mut state = seed
        .wrapping_add(day.wrapping_mul(stream))
        .wrapping_add(stream);

    // Ensure non-zero state (xorshift requires non-zero input).
    if state == 0 {
        state = 0xdead_beef_cafe_babe;
    }

    // xorshift64 algorithm
    state ^= state << 13;
    state ^= state >> 7;
    state ^= state << 17;

    state
}

/// Map raw generator bits onto `[0, 1)`.
///
/// Uses the low 32 bits so the conversion to `f64` is exact.
fn unit_interval(bits: u64) -> f64 {
    let low = u32::try_from(bits & 0xFFFF_FFFF).unwrap_or(0);
    f64::from(low) / 4_294_967_296.0
}
