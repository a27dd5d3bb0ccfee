//! Per-day callback that prints field frames to stdout.
//!
//! The simulation core never draws anything; this adapter sits between
//! the playback loop and the renderer, printing a frame on a configured
//! day cadence plus the final day.

use agritwin_render::render_frame;
use agritwin_sim::DayCallback;
use agritwin_sim::config::RenderConfig;
use agritwin_types::{DayState, RunPlan};

/// Prints a rendered field frame for selected days of the playback.
#[derive(Debug)]
pub struct FrameCallback {
    enabled: bool,
    frame_every_days: u32,
}

impl FrameCallback {
    /// Create a callback from the render section of the engine config.
    pub const fn new(config: &RenderConfig) -> Self {
        Self {
            enabled: config.enabled,
            frame_every_days: config.frame_every_days,
        }
    }

    /// Whether a frame should be printed for this day.
    ///
    /// The final day always gets a frame. With a cadence of N, every Nth
    /// day does too (day 0 included); a cadence of 0 means final only.
    fn should_render(&self, day: u32, duration_days: u32) -> bool {
        if !self.enabled {
            return false;
        }
        if day == duration_days {
            return true;
        }
        self.frame_every_days > 0 && day.checked_rem(self.frame_every_days) == Some(0)
    }
}

impl DayCallback for FrameCallback {
    fn on_day(&mut self, state: &DayState, plan: &RunPlan) {
        if self.should_render(state.day, plan.duration_days) {
            println!("{}", render_frame(state, plan));
        }
    }
}
