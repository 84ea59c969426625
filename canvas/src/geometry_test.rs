#![allow(clippy::float_cmp)]

use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

// --- Point ---

#[test]
fn point_new() {
    let p = pt(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_serde_shape() {
    let json = serde_json::to_value(pt(1.5, 2.0)).unwrap();
    assert_eq!(json, serde_json::json!({"x": 1.5, "y": 2.0}));
}

// --- Bounds basics ---

#[test]
fn from_points_empty_is_none() {
    assert!(Bounds::from_points(&[]).is_none());
}

#[test]
fn from_points_covers_all_points() {
    let b = Bounds::from_points(&[pt(5.0, 1.0), pt(-2.0, 4.0), pt(3.0, 9.0)]).unwrap();
    assert_eq!(b, Bounds::new(-2.0, 1.0, 7.0, 8.0));
}

#[test]
fn from_single_point_is_zero_area() {
    let b = Bounds::from_points(&[pt(2.0, 3.0)]).unwrap();
    assert_eq!(b.width, 0.0);
    assert_eq!(b.height, 0.0);
}

#[test]
fn inflate_grows_every_side() {
    let b = Bounds::new(10.0, 10.0, 20.0, 30.0).inflate(5.0);
    assert_eq!(b, Bounds::new(5.0, 5.0, 30.0, 40.0));
}

#[test]
fn center_is_midpoint() {
    assert_eq!(Bounds::new(0.0, 0.0, 10.0, 20.0).center(), pt(5.0, 10.0));
}

#[test]
fn contains_includes_edges() {
    let b = Bounds::new(0.0, 0.0, 10.0, 10.0);
    assert!(b.contains(pt(0.0, 0.0)));
    assert!(b.contains(pt(10.0, 10.0)));
    assert!(!b.contains(pt(10.1, 5.0)));
}

// --- Segment intersection ---

#[test]
fn segment_inside_box_intersects() {
    let b = Bounds::new(0.0, 0.0, 10.0, 10.0);
    assert!(b.intersects_segment(pt(2.0, 2.0), pt(3.0, 3.0)));
}

#[test]
fn segment_crossing_box_intersects() {
    let b = Bounds::new(0.0, 0.0, 10.0, 10.0);
    assert!(b.intersects_segment(pt(-5.0, 5.0), pt(15.0, 5.0)));
}

#[test]
fn diagonal_segment_crossing_box_intersects() {
    let b = Bounds::new(0.0, 0.0, 10.0, 10.0);
    assert!(b.intersects_segment(pt(-5.0, -5.0), pt(15.0, 15.0)));
}

#[test]
fn segment_beside_box_misses() {
    let b = Bounds::new(0.0, 0.0, 10.0, 10.0);
    assert!(!b.intersects_segment(pt(-5.0, 20.0), pt(15.0, 20.0)));
}

#[test]
fn segment_passing_corner_misses() {
    let b = Bounds::new(0.0, 0.0, 10.0, 10.0);
    assert!(!b.intersects_segment(pt(12.0, -5.0), pt(20.0, 5.0)));
}

#[test]
fn vertical_segment_outside_misses() {
    let b = Bounds::new(0.0, 0.0, 10.0, 10.0);
    assert!(!b.intersects_segment(pt(-1.0, -10.0), pt(-1.0, 20.0)));
}

// --- Polyline ---

#[test]
fn empty_polyline_misses() {
    assert!(!Bounds::new(0.0, 0.0, 10.0, 10.0).intersects_polyline(&[]));
}

#[test]
fn single_point_polyline_uses_containment() {
    let b = Bounds::new(0.0, 0.0, 10.0, 10.0);
    assert!(b.intersects_polyline(&[pt(5.0, 5.0)]));
    assert!(!b.intersects_polyline(&[pt(50.0, 5.0)]));
}

#[test]
fn polyline_hits_when_any_segment_hits() {
    let b = Bounds::new(0.0, 0.0, 10.0, 10.0);
    let line = [pt(-20.0, -20.0), pt(-10.0, -20.0), pt(5.0, 5.0)];
    assert!(b.intersects_polyline(&line));
}
