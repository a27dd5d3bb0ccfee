//! Timer-driven playback loop.
//!
//! [`run_playback`] drives a [`SimulationRun`] one simulated day per tick
//! interval (100 ms by default, so a 90-day run plays back in 9 seconds),
//! honoring the pause/resume/reset/stop controls on the shared
//! [`PlaybackHandle`]. The loop is the only writer of the run; control
//! requests from other tasks are polled between ticks, never applied
//! concurrently, so no two day-advances can ever overlap.
//!
//! The core stepper and controller know nothing about timers: tests and
//! batch drivers call [`SimulationRun::advance_day`] or
//! [`SimulationRun::run_to_completion`] directly.

use std::sync::Arc;

use tracing::{debug, info};

use agritwin_types::{DayState, RunPlan, RunSummary};

use crate::controller::{PlaybackError, SimulationRun};
use crate::handle::PlaybackHandle;

/// Errors that can occur during the playback loop.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A playback operation failed.
    #[error("playback error: {source}")]
    Playback {
        /// The underlying playback error.
        #[from]
        source: PlaybackError,
    },
}

/// Why the playback loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The run reached its final day.
    Completed,
    /// A stop was requested through the handle.
    Stopped,
    /// A reset was requested through the handle; the run is back at
    /// day 0 in the `Idle` phase.
    Reset,
}

/// Result of a playback loop.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackResult {
    /// Why the loop returned.
    pub end_reason: EndReason,
    /// Number of days advanced by this loop (day 0 not counted).
    pub days_run: u64,
    /// The final summary, present only when the run completed.
    pub summary: Option<RunSummary>,
}

/// Callback invoked after each day's state is applied.
///
/// Implementations render frames, push dashboard updates, log stats, and
/// so on. The callback receives the freshly computed state and the plan.
pub trait DayCallback: Send {
    /// Called once for day 0 on start and once per advanced day.
    fn on_day(&mut self, state: &DayState, plan: &RunPlan);
}

/// A no-op day callback for testing and headless batch runs.
pub struct NoOpCallback;

impl DayCallback for NoOpCallback {
    fn on_day(&mut self, _state: &DayState, _plan: &RunPlan) {}
}

/// Run the playback loop until the run completes or a control request
/// ends it.
///
/// Starts the run (applying day 0), then loops: sleep one tick interval,
/// honor any reset/stop request, park while paused, advance one day, and
/// notify the callback.
///
/// Control requests are polled once per tick, after the interval sleep
/// and before the day advances. A pause or reset that lands while a day
/// is being advanced therefore takes effect on the following tick --
/// requests can never interleave with a day computation.
///
/// # Errors
///
/// Returns [`RunnerError`] if starting or advancing the run fails.
pub async fn run_playback(
    run: &mut SimulationRun,
    handle: &Arc<PlaybackHandle>,
    callback: &mut dyn DayCallback,
) -> Result<PlaybackResult, RunnerError> {
    info!(
        field = run.plan().field,
        duration_days = run.plan().duration_days,
        tick_interval_ms = handle.tick_interval_ms(),
        seed = run.plan().seed,
        "Playback starting"
    );

    run.start()?;
    callback.on_day(run.state(), run.plan());

    let mut days_run: u64 = 0;

    loop {
        // Arm the tick: one simulated day per interval of wall clock.
        let interval_ms = handle.tick_interval_ms();
        if interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(interval_ms)).await;
        }

        // Park while paused; stop and reset requests wake the park.
        handle.wait_if_paused().await;

        if handle.take_reset_request() {
            info!(day = run.day(), "Reset requested, discarding run");
            run.reset();
            return Ok(PlaybackResult {
                end_reason: EndReason::Reset,
                days_run,
                summary: None,
            });
        }

        if handle.is_stop_requested() {
            info!(day = run.day(), "Stop requested");
            return Ok(PlaybackResult {
                end_reason: EndReason::Stopped,
                days_run,
                summary: None,
            });
        }

        let outcome = run.advance_day()?;
        days_run = days_run.saturating_add(1);

        debug!(
            day = outcome.day,
            growth = run.state().growth,
            health = run.state().health,
            soil_moisture = run.state().soil_moisture,
            ndvi = run.state().ndvi,
            "Day advanced"
        );

        callback.on_day(run.state(), run.plan());

        if outcome.completed {
            let summary = run.summary();
            info!(
                day = outcome.day,
                days_run,
                yield_tonnes = summary.as_ref().map(|s| s.yield_tonnes),
                score = summary.as_ref().map(|s| s.score),
                "Playback completed"
            );
            return Ok(PlaybackResult {
                end_reason: EndReason::Completed,
                days_run,
                summary,
            });
        }
    }
}

/// Log the end of a playback loop.
pub fn log_playback_end(result: &PlaybackResult) {
    info!(
        reason = ?result.end_reason,
        days_run = result.days_run,
        "Playback ended"
    );

    if let Some(ref summary) = result.summary {
        info!(
            yield_tonnes = summary.yield_tonnes,
            score = summary.score,
            sustainable_badge = summary.sustainable_badge,
            "Final run summary"
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use agritwin_types::{Climate, Crop};

    use super::*;

    fn plan(duration: u32) -> RunPlan {
        RunPlan {
            field: String::from("Field Alpha"),
            crop: Crop::Corn,
            area_hectares: 50.0,
            irrigation_percent: 70,
            fertilization_percent: 50,
            climate: Climate::Normal,
            duration_days: duration,
            seed: 7,
        }
    }

    #[tokio::test]
    async fn runs_to_completion_without_delay() {
        let mut run = SimulationRun::new(plan(30));
        let handle = Arc::new(PlaybackHandle::new(0));
        let mut cb = NoOpCallback;

        let result = run_playback(&mut run, &handle, &mut cb).await.unwrap();

        assert_eq!(result.end_reason, EndReason::Completed);
        assert_eq!(result.days_run, 30);
        assert!(result.summary.is_some());
        assert_eq!(run.day(), 30);
    }

    #[tokio::test]
    async fn callback_sees_day_zero_and_every_day() {
        struct CountCallback {
            days: Vec<u32>,
        }
        impl DayCallback for CountCallback {
            fn on_day(&mut self, state: &DayState, _plan: &RunPlan) {
                self.days.push(state.day);
            }
        }

        let mut run = SimulationRun::new(plan(5));
        let handle = Arc::new(PlaybackHandle::new(0));
        let mut cb = CountCallback { days: Vec::new() };

        let _ = run_playback(&mut run, &handle, &mut cb).await.unwrap();

        assert_eq!(cb.days, vec![0, 1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn pre_requested_stop_ends_before_any_day() {
        let mut run = SimulationRun::new(plan(30));
        let handle = Arc::new(PlaybackHandle::new(0));
        handle.request_stop();
        let mut cb = NoOpCallback;

        let result = run_playback(&mut run, &handle, &mut cb).await.unwrap();

        assert_eq!(result.end_reason, EndReason::Stopped);
        assert_eq!(result.days_run, 0);
        // Day 0 was still applied by start().
        assert_eq!(run.day(), 0);
    }

    #[tokio::test]
    async fn pre_requested_reset_discards_the_run() {
        let mut run = SimulationRun::new(plan(30));
        let handle = Arc::new(PlaybackHandle::new(0));
        handle.request_reset();
        let mut cb = NoOpCallback;

        let result = run_playback(&mut run, &handle, &mut cb).await.unwrap();

        assert_eq!(result.end_reason, EndReason::Reset);
        assert_eq!(result.days_run, 0);
        assert_eq!(run.day(), 0);
        assert_eq!(*run.state(), DayState::initial());
    }
}
