//! Playback controller: the state machine that owns a simulation run.
//!
//! A [`SimulationRun`] owns all mutable run state -- the current day's
//! [`DayState`], the playback phase, and the noise source -- and exposes
//! start/pause/resume/reset/advance as its only mutating operations. There
//! is no ambient state and no timer in here: any driver (the async runner,
//! a test, or batch mode) advances the run by calling
//! [`advance_day`](SimulationRun::advance_day) directly.
//!
//! # Phases
//!
//! ```text
//! Idle -> Running <-> Paused
//!           |
//!           v (day reaches duration_days)
//!       Completed
//! ```
//!
//! `reset` returns to `Idle` from any phase, discarding the run.

use agritwin_types::{DayState, RunPlan, RunSummary};

use crate::noise::{DayRandomness, SeededNoise};
use crate::stepper;
use crate::summary;

/// Errors from invalid playback operations.
#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    /// `start` was called while the run was already advancing.
    #[error("playback is already running")]
    AlreadyRunning,

    /// `start` or `advance_day` was called after the run completed.
    #[error("playback has already completed; reset to run again")]
    AlreadyCompleted,

    /// An operation that requires the `Running` phase was called from
    /// another phase.
    #[error("playback is not running (phase: {phase:?})")]
    NotRunning {
        /// The phase the run was actually in.
        phase: PlaybackPhase,
    },

    /// `resume` was called while the run was not paused.
    #[error("playback is not paused (phase: {phase:?})")]
    NotPaused {
        /// The phase the run was actually in.
        phase: PlaybackPhase,
    },

    /// The day counter would overflow.
    #[error("day counter overflow")]
    DayOverflow,
}

/// The lifecycle phase of a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    /// Day 0, nothing computed yet.
    Idle,
    /// Advancing one day per driver tick.
    Running,
    /// Frozen mid-run, resumable.
    Paused,
    /// The final day has been reached; only `reset` leaves this phase.
    Completed,
}

/// Outcome of a single [`advance_day`](SimulationRun::advance_day) call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayOutcome {
    /// The day that was just computed.
    pub day: u32,
    /// Whether this day completed the run.
    pub completed: bool,
}

/// A single simulation run: plan, current state, phase, and noise source.
pub struct SimulationRun {
    /// The validated, immutable run configuration.
    plan: RunPlan,

    /// The current playback phase.
    phase: PlaybackPhase,

    /// The most recently computed day state. `state.day` is the source
    /// of truth for the current day.
    state: DayState,

    /// Noise source for moisture jitter and event rolls.
    noise: Box<dyn DayRandomness>,
}

impl std::fmt::Debug for SimulationRun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationRun")
            .field("plan", &self.plan)
            .field("phase", &self.phase)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl SimulationRun {
    /// Create a run in the `Idle` phase, seeded from the plan.
    pub fn new(plan: RunPlan) -> Self {
        let noise = Box::new(SeededNoise::new(plan.seed));
        Self::with_noise(plan, noise)
    }

    /// Create a run with an explicit noise source (used by tests).
    pub fn with_noise(plan: RunPlan, noise: Box<dyn DayRandomness>) -> Self {
        Self {
            plan,
            phase: PlaybackPhase::Idle,
            state: DayState::initial(),
            noise,
        }
    }

    /// Start or resume playback.
    ///
    /// From `Idle` this also computes and applies the day-0 state
    /// immediately, so the first rendered frame reflects the plan rather
    /// than the blank defaults. From `Paused` it resumes without
    /// recomputing anything.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::AlreadyRunning`] from `Running` and
    /// [`PlaybackError::AlreadyCompleted`] from `Completed`.
    pub fn start(&mut self) -> Result<(), PlaybackError> {
        match self.phase {
            PlaybackPhase::Idle => {
                self.state = stepper::step_day(0, &self.state, &self.plan, self.noise.as_mut());
                self.phase = PlaybackPhase::Running;
                Ok(())
            }
            PlaybackPhase::Paused => {
                self.phase = PlaybackPhase::Running;
                Ok(())
            }
            PlaybackPhase::Running => Err(PlaybackError::AlreadyRunning),
            PlaybackPhase::Completed => Err(PlaybackError::AlreadyCompleted),
        }
    }

    /// Pause a running playback.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::NotRunning`] unless the run is `Running`.
    pub fn pause(&mut self) -> Result<(), PlaybackError> {
        if self.phase == PlaybackPhase::Running {
            self.phase = PlaybackPhase::Paused;
            Ok(())
        } else {
            Err(PlaybackError::NotRunning { phase: self.phase })
        }
    }

    /// Resume a paused playback.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::NotPaused`] unless the run is `Paused`.
    pub fn resume(&mut self) -> Result<(), PlaybackError> {
        if self.phase == PlaybackPhase::Paused {
            self.phase = PlaybackPhase::Running;
            Ok(())
        } else {
            Err(PlaybackError::NotPaused { phase: self.phase })
        }
    }

    /// Advance the run by one simulated day.
    ///
    /// When the new day reaches `duration_days` the phase flips to
    /// `Completed` and the returned outcome says so.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::NotRunning`] unless the run is `Running`,
    /// or [`PlaybackError::DayOverflow`] if the day counter would wrap.
    pub fn advance_day(&mut self) -> Result<DayOutcome, PlaybackError> {
        if self.phase != PlaybackPhase::Running {
            return Err(PlaybackError::NotRunning { phase: self.phase });
        }

        let next_day = self
            .state
            .day
            .checked_add(1)
            .ok_or(PlaybackError::DayOverflow)?;

        self.state = stepper::step_day(next_day, &self.state, &self.plan, self.noise.as_mut());

        let completed = next_day >= self.plan.duration_days;
        if completed {
            self.phase = PlaybackPhase::Completed;
        }

        Ok(DayOutcome {
            day: next_day,
            completed,
        })
    }

    /// Discard the run and return to the `Idle` phase.
    ///
    /// The state is restored to [`DayState::initial`] exactly; calling
    /// `reset` any number of times, from any phase, yields the same
    /// result. The noise source derives its draws per day, so a run
    /// replayed after a reset is identical to the original.
    pub fn reset(&mut self) {
        self.phase = PlaybackPhase::Idle;
        self.state = DayState::initial();
    }

    /// Drive the run to completion without a timer.
    ///
    /// Starts (or resumes) the run if needed, then advances day by day
    /// until it completes. Returns the final summary.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::AlreadyCompleted`] if the run already
    /// finished, or any error from the underlying operations.
    pub fn run_to_completion(&mut self) -> Result<RunSummary, PlaybackError> {
        match self.phase {
            PlaybackPhase::Idle => self.start()?,
            PlaybackPhase::Paused => self.resume()?,
            PlaybackPhase::Running => {}
            PlaybackPhase::Completed => return Err(PlaybackError::AlreadyCompleted),
        }

        loop {
            let outcome = self.advance_day()?;
            if outcome.completed {
                break;
            }
        }

        Ok(summary::compute(&self.state, &self.plan))
    }

    /// The run plan.
    pub const fn plan(&self) -> &RunPlan {
        &self.plan
    }

    /// The current playback phase.
    pub const fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    /// The current simulated day.
    pub const fn day(&self) -> u32 {
        self.state.day
    }

    /// The most recently computed day state.
    pub const fn state(&self) -> &DayState {
        &self.state
    }

    /// The final results, once the run has completed.
    pub fn summary(&self) -> Option<RunSummary> {
        if self.phase == PlaybackPhase::Completed {
            Some(summary::compute(&self.state, &self.plan))
        } else {
            None
        }
    }
}
