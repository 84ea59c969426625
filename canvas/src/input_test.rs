#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Mode
// =============================================================

#[test]
fn mode_default_is_cursor() {
    assert_eq!(Mode::default(), Mode::Cursor);
}

#[test]
fn mode_serde_lowercase() {
    assert_eq!(serde_json::to_string(&Mode::Eraser).unwrap(), "\"eraser\"");
    let m: Mode = serde_json::from_str("\"pencil\"").unwrap();
    assert_eq!(m, Mode::Pencil);
}

// =============================================================
// UiState
// =============================================================

#[test]
fn ui_state_defaults() {
    let ui = UiState::default();
    assert_eq!(ui.mode, Mode::Cursor);
    assert!(ui.selected_id.is_none());
    assert_eq!(ui.pencil_width, 10.0);
    assert_eq!(ui.eraser_width, 10.0);
    assert_eq!(ui.pencil_color, "#000000");
}

// =============================================================
// InputState
// =============================================================

#[test]
fn input_state_default_is_idle() {
    assert!(matches!(InputState::default(), InputState::Idle));
}

#[test]
fn push_point_when_idle_is_rejected() {
    let mut state = InputState::Idle;
    assert!(!state.push_point(Point::new(1.0, 1.0)));
}

#[test]
fn push_point_extends_erase_stroke() {
    let mut state = InputState::Erasing { points: vec![Point::new(0.0, 0.0)] };
    assert!(state.push_point(Point::new(1.0, 2.0)));
    let InputState::Erasing { points } = state else {
        panic!("expected Erasing");
    };
    assert_eq!(points, vec![Point::new(0.0, 0.0), Point::new(1.0, 2.0)]);
}

#[test]
fn push_point_extends_pencil_stroke() {
    let mut state = InputState::Drawing { points: Vec::new() };
    assert!(state.push_point(Point::new(3.0, 4.0)));
    assert!(matches!(state, InputState::Drawing { ref points } if points.len() == 1));
}
