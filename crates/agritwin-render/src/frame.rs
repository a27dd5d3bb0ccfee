//! Schematic field frame: sky, soil, plant grid, rain, and a day counter.
//!
//! [`render_frame`] is a deterministic function of `(state, plan)` with no
//! side effects: the same inputs always produce the same string, and no
//! in-range [`DayState`] can make it panic. Everything the original
//! dashboard painted -- sun or clouds by climate, soil shading from
//! moisture, plants sized by growth and wilted by poor health, cob
//! markers on mature corn, rain strokes when the field is wet -- maps to
//! a character on a fixed-size grid.

use agritwin_types::{Climate, Crop, DayState, RunPlan};

/// Frame width in characters.
pub const FRAME_WIDTH: usize = 60;

/// Number of sky rows at the top of the canvas.
const SKY_ROWS: usize = 4;

/// Number of ground rows below the sky.
const GROUND_ROWS: usize = 12;

/// Canvas height (header and event lines not included).
const CANVAS_ROWS: usize = SKY_ROWS + GROUND_ROWS;

/// Plot grid dimensions, matching the original field layout.
const PLOT_ROWS: u32 = 6;
/// Number of plots per row.
const PLOT_COLS: u32 = 10;

/// Growth below this renders bare soil.
const SPROUT_THRESHOLD: f64 = 15.0;
/// Growth below this renders a seedling.
const YOUNG_THRESHOLD: f64 = 40.0;
/// Growth below this renders a mid-size plant; above, a tall one.
const TALL_THRESHOLD: f64 = 70.0;

/// Health below this renders plants as wilted.
const WILT_THRESHOLD: f64 = 40.0;

/// Soil moisture above this draws rain strokes (in addition to the Wet
/// climate always drawing them).
const RAIN_MOISTURE_THRESHOLD: f64 = 80.0;

/// Render one frame of the field for the given day state.
///
/// The frame is `CANVAS_ROWS + 2` lines: a header with the day counter
/// and live stats, the canvas, and a trailing event line (blank on
/// uneventful days).
pub fn render_frame(state: &DayState, plan: &RunPlan) -> String {
    let mut rows = vec![vec![' '; FRAME_WIDTH]; CANVAS_ROWS];

    fill_soil(&mut rows, state.soil_moisture);
    draw_sky(&mut rows, state.day, plan.climate);
    draw_plants(&mut rows, state, plan);
    if state.soil_moisture > RAIN_MOISTURE_THRESHOLD || plan.climate == Climate::Wet {
        draw_rain(&mut rows, state.day);
    }

    let header = format!(
        "Day {}/{}  growth {:>5.1}%  health {:>5.1}%  moisture {:>5.1}%  ndvi {:.2}",
        state.day, plan.duration_days, state.growth, state.health, state.soil_moisture, state.ndvi
    );
    let events = state
        .events
        .iter()
        .map(|event| format!("! {}", event.message))
        .collect::<Vec<_>>()
        .join("  ");

    let mut frame = String::with_capacity(
        FRAME_WIDTH
            .saturating_add(2)
            .saturating_mul(CANVAS_ROWS.saturating_add(2)),
    );
    frame.push_str(&header);
    frame.push('\n');
    for row in &rows {
        frame.extend(row.iter());
        frame.push('\n');
    }
    frame.push_str(&events);
    frame.push('\n');
    frame
}

/// Put a character on the canvas, ignoring out-of-bounds coordinates.
fn put(rows: &mut [Vec<char>], row: usize, col: usize, ch: char) {
    if let Some(cell) = rows.get_mut(row).and_then(|line| line.get_mut(col)) {
        *cell = ch;
    }
}

/// Fill the ground rows with a soil character picked from moisture.
fn fill_soil(rows: &mut [Vec<char>], soil_moisture: f64) {
    let soil = if soil_moisture >= 70.0 {
        '#'
    } else if soil_moisture >= 40.0 {
        ':'
    } else {
        '.'
    };
    for row in SKY_ROWS..CANVAS_ROWS {
        for col in 0..FRAME_WIDTH {
            put(rows, row, col, soil);
        }
    }
}

/// Draw a sun or a cloud bank in the sky band.
///
/// The sun shows under a Dry climate or whenever `sin(day * 0.1)` is
/// positive, so it alternates over the course of a run.
fn draw_sky(rows: &mut [Vec<char>], day: u32, climate: Climate) {
    let sunny = climate == Climate::Dry || (f64::from(day) * 0.1).sin() > 0.0;
    let right = FRAME_WIDTH.saturating_sub(8);
    if sunny {
        put(rows, 0, right.saturating_add(1), '\\');
        put(rows, 0, right.saturating_add(2), '|');
        put(rows, 0, right.saturating_add(3), '/');
        put(rows, 1, right, '-');
        put(rows, 1, right.saturating_add(2), 'O');
        put(rows, 1, right.saturating_add(4), '-');
        put(rows, 2, right.saturating_add(1), '/');
        put(rows, 2, right.saturating_add(2), '|');
        put(rows, 2, right.saturating_add(3), '\\');
    } else {
        for (offset, ch) in "(~~~)(~~)".chars().enumerate() {
            put(rows, 1, right.saturating_add(offset), ch);
        }
        for (offset, ch) in "(~~~~)".chars().enumerate() {
            put(rows, 2, right.saturating_add(offset).saturating_sub(3), ch);
        }
    }
}

/// Draw the 6x10 plot grid sized by growth and shaded by health.
fn draw_plants(rows: &mut [Vec<char>], state: &DayState, plan: &RunPlan) {
    for plot_row in 0..PLOT_ROWS {
        for plot_col in 0..PLOT_COLS {
            // Per-plot variation for a natural look: effective growth
            // swings between 0.8x and 1.0x of the field value.
            let phase = f64::from(plot_row.wrapping_mul(plot_col))
                + f64::from(state.day) * 0.05;
            let variation = (phase.sin() + 1.0) * 0.1;
            let effective = state.growth * (0.8 + variation);

            let glyph = plant_glyph(effective, state.health, state.growth, plan.crop);
            if let Some(glyph) = glyph {
                let row = SKY_ROWS
                    .saturating_add(1)
                    .saturating_add(usize::try_from(plot_row).unwrap_or(0).saturating_mul(2));
                let col = usize::try_from(plot_col)
                    .unwrap_or(0)
                    .saturating_mul(6)
                    .saturating_add(2);
                put(rows, row, col, glyph);
            }
        }
    }
}

/// Pick a glyph for one plot, or `None` for bare soil.
const fn plant_glyph(effective: f64, health: f64, growth: f64, crop: Crop) -> Option<char> {
    if effective < SPROUT_THRESHOLD {
        return None;
    }
    let wilted = health < WILT_THRESHOLD;
    if effective < YOUNG_THRESHOLD {
        return Some(',');
    }
    if effective < TALL_THRESHOLD {
        return Some(if wilted { ';' } else { 'i' });
    }
    if wilted {
        return Some('y');
    }
    // Mature corn carries a cob marker.
    if growth > TALL_THRESHOLD && matches!(crop, Crop::Corn) {
        return Some('&');
    }
    Some('Y')
}

/// Scatter rain strokes over the sky and upper ground rows, at positions
/// derived from the day number rather than from randomness.
fn draw_rain(rows: &mut [Vec<char>], day: u32) {
    for stroke in 0u32..24 {
        let col = stroke
            .wrapping_mul(7)
            .wrapping_add(day.wrapping_mul(3))
            .checked_rem(u32::try_from(FRAME_WIDTH).unwrap_or(60))
            .unwrap_or(0);
        let row = stroke
            .wrapping_mul(5)
            .wrapping_add(day)
            .checked_rem(10)
            .unwrap_or(0);
        put(
            rows,
            usize::try_from(row).unwrap_or(0),
            usize::try_from(col).unwrap_or(0),
            '/',
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use agritwin_types::{FieldEvent, FieldEventKind};

    use super::*;

    fn plan(climate: Climate, crop: Crop) -> RunPlan {
        RunPlan {
            field: String::from("Field Alpha"),
            crop,
            area_hectares: 50.0,
            irrigation_percent: 70,
            fertilization_percent: 50,
            climate,
            duration_days: 90,
            seed: 1,
        }
    }

    fn state(day: u32, growth: f64, health: f64, soil_moisture: f64) -> DayState {
        DayState {
            day,
            growth,
            health,
            soil_moisture,
            ndvi: 0.5,
            events: Vec::new(),
        }
    }

    #[test]
    fn frame_has_fixed_height_and_width() {
        let frame = render_frame(&state(45, 50.0, 81.0, 60.0), &plan(Climate::Normal, Crop::Corn));
        let lines: Vec<&str> = frame.lines().collect();
        assert_eq!(lines.len(), CANVAS_ROWS + 2);
        for line in lines.iter().skip(1).take(CANVAS_ROWS) {
            assert_eq!(line.chars().count(), FRAME_WIDTH);
        }
    }

    #[test]
    fn header_shows_the_day_counter() {
        let frame = render_frame(&state(45, 50.0, 81.0, 60.0), &plan(Climate::Normal, Crop::Corn));
        assert!(frame.starts_with("Day 45/90"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let s = state(30, 42.0, 81.0, 85.0);
        let p = plan(Climate::Wet, Crop::Wheat);
        assert_eq!(render_frame(&s, &p), render_frame(&s, &p));
    }

    #[test]
    fn no_plants_at_zero_growth() {
        let frame = render_frame(&state(0, 0.0, 100.0, 60.0), &plan(Climate::Normal, Crop::Corn));
        assert!(!frame.contains('Y'));
        assert!(!frame.contains('&'));
        assert!(!frame.contains('i'));
    }

    #[test]
    fn mature_corn_shows_cob_markers() {
        let frame =
            render_frame(&state(80, 95.0, 90.0, 60.0), &plan(Climate::Normal, Crop::Corn));
        assert!(frame.contains('&'));
    }

    #[test]
    fn mature_wheat_has_no_cob_markers() {
        let frame =
            render_frame(&state(80, 95.0, 90.0, 60.0), &plan(Climate::Normal, Crop::Wheat));
        assert!(!frame.contains('&'));
        assert!(frame.contains('Y'));
    }

    #[test]
    fn low_health_wilts_the_plants() {
        let frame =
            render_frame(&state(80, 95.0, 30.0, 60.0), &plan(Climate::Normal, Crop::Wheat));
        assert!(frame.contains('y'));
        assert!(!frame.contains('Y'));
    }

    #[test]
    fn wet_climate_draws_rain() {
        let frame = render_frame(&state(10, 20.0, 81.0, 60.0), &plan(Climate::Wet, Crop::Rice));
        assert!(frame.contains('/'));
    }

    #[test]
    fn saturated_soil_draws_rain_under_any_climate() {
        let frame =
            render_frame(&state(10, 20.0, 81.0, 90.0), &plan(Climate::Normal, Crop::Rice));
        assert!(frame.contains('/'));
    }

    #[test]
    fn event_line_carries_messages() {
        let mut s = state(10, 20.0, 81.0, 60.0);
        s.events.push(FieldEvent {
            kind: FieldEventKind::Optimal,
            message: String::from("Optimal conditions!"),
        });
        let frame = render_frame(&s, &plan(Climate::Normal, Crop::Corn));
        assert!(frame.contains("! Optimal conditions!"));
    }

    #[test]
    fn never_panics_across_range_corners() {
        let corners = [
            state(0, 0.0, 0.0, 20.0),
            state(1, 100.0, 100.0, 100.0),
            state(u32::MAX, 100.0, 0.0, 20.0),
            state(120, 50.0, 50.0, 55.0),
        ];
        for s in &corners {
            for climate in [Climate::Normal, Climate::Dry, Climate::Wet] {
                for crop in [Crop::Corn, Crop::Wheat, Crop::Rice, Crop::Soybean] {
                    let _ = render_frame(s, &plan(climate, crop));
                }
            }
        }
    }
}
