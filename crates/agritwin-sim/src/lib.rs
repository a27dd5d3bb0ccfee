//! Simulation core for `AgriTwin`: the crop-growth day stepper, the
//! playback controller, and the timer-driven runner.
//!
//! # Architecture
//!
//! - [`config`] -- YAML configuration, validated into a
//!   [`RunPlan`](agritwin_types::RunPlan)
//! - [`noise`] -- deterministic per-day randomness behind an injectable
//!   trait
//! - [`stepper`] -- the pure day-step function
//! - [`controller`] -- the run state machine
//!   (start/pause/resume/reset/advance)
//! - [`handle`] -- shared atomics for cross-task playback control
//! - [`runner`] -- the async loop advancing one day per tick interval
//! - [`summary`] -- final yield, score, and badge
//!
//! Rendering is a separate crate; nothing in here draws anything, and
//! the whole core is testable without timers via
//! [`SimulationRun::run_to_completion`].

pub mod config;
pub mod controller;
pub mod handle;
pub mod noise;
pub mod runner;
pub mod stepper;
pub mod summary;

pub use config::{ConfigError, EngineConfig, RunConfig};
pub use controller::{DayOutcome, PlaybackError, PlaybackPhase, SimulationRun};
pub use handle::PlaybackHandle;
pub use noise::{DayRandomness, SeededNoise};
pub use runner::{
    DayCallback, EndReason, NoOpCallback, PlaybackResult, RunnerError, run_playback,
};
pub use stepper::step_day;
