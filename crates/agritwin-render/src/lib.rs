//! Presentation layer for `AgriTwin` day states.
//!
//! Turns a [`DayState`](agritwin_types::DayState) into a fixed-size text
//! frame of the field. Strictly read-only: nothing here feeds back into
//! the simulation, and a headless run never needs this crate.

pub mod frame;

pub use frame::{FRAME_WIDTH, render_frame};
