//! Shared playback handle for runtime control of a playback loop.
//!
//! The async runner polls this handle between ticks; any other task
//! (a UI layer, a signal handler, a test) can pause, resume, reset, or
//! stop the playback through it. All mutable fields are atomics wrapped
//! in [`Arc`](std::sync::Arc) sharing, so control reads on the tick loop
//! hot path take no locks.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::Notify;

/// Smallest accepted tick interval for runtime adjustment, in ms.
const MIN_TICK_INTERVAL_MS: u64 = 10;

/// Shared control state for a playback loop.
///
/// Wrapped in an `Arc` and shared between the runner and whoever drives
/// the controls.
#[derive(Debug)]
pub struct PlaybackHandle {
    /// Whether playback is currently paused.
    paused: AtomicBool,

    /// Notification used to wake the runner when resumed, stopped, or
    /// reset while paused.
    wake: Notify,

    /// Whether a stop has been requested.
    stop_requested: AtomicBool,

    /// Whether a reset has been requested.
    reset_requested: AtomicBool,

    /// Current tick interval in milliseconds (runtime-adjustable).
    tick_interval_ms: AtomicU64,

    /// Wall-clock time when the playback started.
    started_at: DateTime<Utc>,
}

impl PlaybackHandle {
    /// Create a handle with the given tick interval.
    ///
    /// An interval of 0 makes the runner advance as fast as it can
    /// (useful for batch runs and tests).
    pub fn new(tick_interval_ms: u64) -> Self {
        Self {
            paused: AtomicBool::new(false),
            wake: Notify::new(),
            stop_requested: AtomicBool::new(false),
            reset_requested: AtomicBool::new(false),
            tick_interval_ms: AtomicU64::new(tick_interval_ms),
            started_at: Utc::now(),
        }
    }

    // -----------------------------------------------------------------------
    // Pause / Resume
    // -----------------------------------------------------------------------

    /// Check whether playback is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Pause playback. The runner parks before advancing the next day.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume playback and wake a parked runner.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.wake.notify_one();
    }

    /// Wait until playback is no longer paused, or a stop/reset request
    /// arrives (both must be able to interrupt a paused runner).
    ///
    /// Returns immediately if not paused.
    pub async fn wait_if_paused(&self) {
        while self.paused.load(Ordering::Acquire)
            && !self.is_stop_requested()
            && !self.is_reset_requested()
        {
            self.wake.notified().await;
        }
    }

    // -----------------------------------------------------------------------
    // Stop / Reset
    // -----------------------------------------------------------------------

    /// Request a clean stop of the playback loop.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.wake.notify_one();
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Request that the runner discard the run and return it to day 0.
    ///
    /// The pending tick is cancelled: the runner honors the request
    /// before advancing another day, so a discarded run can never be
    /// resurrected by a stale tick.
    pub fn request_reset(&self) {
        self.reset_requested.store(true, Ordering::Release);
        self.wake.notify_one();
    }

    /// Check whether a reset has been requested, without consuming it.
    pub fn is_reset_requested(&self) -> bool {
        self.reset_requested.load(Ordering::Acquire)
    }

    /// Consume a pending reset request. Returns `true` if one was pending.
    pub fn take_reset_request(&self) -> bool {
        self.reset_requested.swap(false, Ordering::AcqRel)
    }

    // -----------------------------------------------------------------------
    // Tick speed
    // -----------------------------------------------------------------------

    /// Get the current tick interval in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms.load(Ordering::Acquire)
    }

    /// Set the tick interval in milliseconds. Must be at least 10 ms.
    ///
    /// Returns the previous interval on success, or `None` if the value
    /// was rejected.
    pub fn set_tick_interval_ms(&self, ms: u64) -> Option<u64> {
        if ms < MIN_TICK_INTERVAL_MS {
            return None;
        }
        let prev = self.tick_interval_ms.swap(ms, Ordering::AcqRel);
        Some(prev)
    }

    // -----------------------------------------------------------------------
    // Timing
    // -----------------------------------------------------------------------

    /// Return the wall-clock time the playback started.
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Return elapsed wall-clock seconds since playback start.
    pub fn elapsed_seconds(&self) -> u64 {
        let elapsed = Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds();
        u64::try_from(elapsed.max(0)).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_has_no_requests() {
        let handle = PlaybackHandle::new(100);
        assert!(!handle.is_paused());
        assert!(!handle.is_stop_requested());
        assert!(!handle.is_reset_requested());
        assert_eq!(handle.tick_interval_ms(), 100);
    }

    #[test]
    fn pause_and_resume() {
        let handle = PlaybackHandle::new(100);
        handle.pause();
        assert!(handle.is_paused());
        handle.resume();
        assert!(!handle.is_paused());
    }

    #[test]
    fn reset_request_is_consumed_once() {
        let handle = PlaybackHandle::new(100);
        handle.request_reset();
        assert!(handle.is_reset_requested());
        assert!(handle.take_reset_request());
        assert!(!handle.is_reset_requested());
        assert!(!handle.take_reset_request());
    }

    #[test]
    fn set_tick_interval() {
        let handle = PlaybackHandle::new(100);
        let prev = handle.set_tick_interval_ms(250);
        assert_eq!(prev, Some(100));
        assert_eq!(handle.tick_interval_ms(), 250);
    }

    #[test]
    fn reject_too_small_interval() {
        let handle = PlaybackHandle::new(100);
        assert!(handle.set_tick_interval_ms(5).is_none());
        assert_eq!(handle.tick_interval_ms(), 100);
    }

    #[tokio::test]
    async fn stop_interrupts_a_paused_wait() {
        let handle = PlaybackHandle::new(100);
        handle.pause();
        handle.request_stop();
        // Must return despite still being paused.
        handle.wait_if_paused().await;
        assert!(handle.is_paused());
        assert!(handle.is_stop_requested());
    }

    #[tokio::test]
    async fn reset_interrupts_a_paused_wait() {
        let handle = PlaybackHandle::new(100);
        handle.pause();
        handle.request_reset();
        handle.wait_if_paused().await;
        assert!(handle.is_reset_requested());
    }
}
