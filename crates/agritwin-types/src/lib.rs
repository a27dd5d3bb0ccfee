//! Shared type definitions for the `AgriTwin` simulation core.
//!
//! This crate is the single source of truth for the types shared between
//! the simulation core, the renderer, and the engine binary. Types defined
//! here flow downstream to `TypeScript` via `ts-rs` for the dashboard.
//!
//! # Modules
//!
//! - [`enums`] -- crop, climate scenario, and field event kinds
//! - [`structs`] -- run plan, per-day state, events, and run summary

pub mod enums;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Climate, Crop, FieldEventKind};
pub use structs::{
    DayState, FieldEvent, RunPlan, RunSummary, INITIAL_GROWTH, INITIAL_HEALTH, INITIAL_NDVI,
    INITIAL_SOIL_MOISTURE,
};

#[cfg(test)]
mod tests {
    //! Integration tests for type exports and `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs generates TypeScript bindings when types with
        // #[ts(export)] are used. Importing them here triggers generation.
        // The actual files are written to the `bindings/` directory
        // relative to the crate root.
        use ts_rs::TS;

        // Enums
        let _ = crate::enums::Crop::export_all();
        let _ = crate::enums::Climate::export_all();
        let _ = crate::enums::FieldEventKind::export_all();

        // Structs
        let _ = crate::structs::RunPlan::export_all();
        let _ = crate::structs::FieldEvent::export_all();
        let _ = crate::structs::DayState::export_all();
        let _ = crate::structs::RunSummary::export_all();
    }
}
