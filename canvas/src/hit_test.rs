use serde_json::json;

use super::*;
use crate::defaults::{CanvasDefaults, ObjectFactory};
use crate::doc::ObjectKind;

fn store_with(objs: Vec<DrawableObject>) -> DocStore {
    let mut store = DocStore::new();
    for o in objs {
        store.insert(o);
    }
    store
}

fn rect_at(f: &mut ObjectFactory, x: f64, y: f64, w: f64, h: f64) -> DrawableObject {
    f.create(ObjectKind::Rect, Bounds::new(x, y, w, h), json!({"stroke_width": 2.0}))
}

fn stroke(points: &[(f64, f64)], width: f64) -> EraseStroke {
    EraseStroke::new(points.iter().map(|&(x, y)| Point::new(x, y)).collect(), width)
}

// =============================================================
// painted_bounds
// =============================================================

#[test]
fn painted_bounds_include_half_stroke() {
    let mut f = ObjectFactory::new(CanvasDefaults::standard());
    let obj = f.create(ObjectKind::Rect, Bounds::new(10.0, 10.0, 20.0, 20.0), json!({"stroke_width": 4.0}));
    assert_eq!(painted_bounds(&obj), Bounds::new(8.0, 8.0, 24.0, 24.0));
}

#[test]
fn painted_bounds_reach_triangle_miter_tip() {
    let mut f = ObjectFactory::new(CanvasDefaults::standard());
    let obj = f.create(ObjectKind::Triangle, Bounds::new(320.0, 320.0, 160.0, 160.0), json!({"stroke_width": 3.0}));
    // Apex angle 2 * atan(1/2); the tip sits 1.5 / sin(atan(1/2)) above the top.
    let tip = 1.5 * 5.0_f64.sqrt();
    let b = painted_bounds(&obj);
    assert!((b.y - (320.0 - tip)).abs() < 1e-9);
    assert!(b.y < 320.0 - 3.3);
}

#[test]
fn painted_bounds_fall_back_to_half_stroke_past_miter_limit() {
    let mut f = ObjectFactory::new(CanvasDefaults::standard());
    // A needle-thin triangle bevels its apex instead of mitering it.
    let obj = f.create(ObjectKind::Triangle, Bounds::new(0.0, 0.0, 2.0, 100.0), json!({"stroke_width": 4.0}));
    assert_eq!(painted_bounds(&obj), Bounds::new(-2.0, -2.0, 6.0, 104.0));
}

// =============================================================
// hit_test
// =============================================================

#[test]
fn hit_test_empty_doc_is_none() {
    assert!(hit_test(Point::new(0.0, 0.0), &DocStore::new()).is_none());
}

#[test]
fn hit_test_returns_top_most() {
    let mut f = ObjectFactory::new(CanvasDefaults::standard());
    let below = rect_at(&mut f, 0.0, 0.0, 100.0, 100.0);
    let above = rect_at(&mut f, 50.0, 50.0, 100.0, 100.0);
    let above_id = above.id;
    let store = store_with(vec![below, above]);
    assert_eq!(hit_test(Point::new(75.0, 75.0), &store), Some(above_id));
}

#[test]
fn hit_test_skips_hidden_and_non_evented() {
    let mut f = ObjectFactory::new(CanvasDefaults::standard());
    let base = rect_at(&mut f, 0.0, 0.0, 100.0, 100.0);
    let mut hidden = rect_at(&mut f, 0.0, 0.0, 100.0, 100.0);
    hidden.visible = false;
    let mut inert = rect_at(&mut f, 0.0, 0.0, 100.0, 100.0);
    inert.evented = false;
    let base_id = base.id;
    let store = store_with(vec![base, hidden, inert]);
    assert_eq!(hit_test(Point::new(50.0, 50.0), &store), Some(base_id));
}

#[test]
fn hit_test_miss() {
    let mut f = ObjectFactory::new(CanvasDefaults::standard());
    let store = store_with(vec![rect_at(&mut f, 0.0, 0.0, 10.0, 10.0)]);
    assert!(hit_test(Point::new(500.0, 500.0), &store).is_none());
}

// =============================================================
// objects_under_stroke
// =============================================================

#[test]
fn stroke_across_two_objects_targets_both_top_first() {
    let mut f = ObjectFactory::new(CanvasDefaults::standard());
    let left = rect_at(&mut f, 0.0, 0.0, 50.0, 50.0);
    let right = rect_at(&mut f, 100.0, 0.0, 50.0, 50.0);
    let (left_id, right_id) = (left.id, right.id);
    let store = store_with(vec![left, right]);
    let hits = objects_under_stroke(&stroke(&[(-10.0, 25.0), (200.0, 25.0)], 10.0), &store);
    assert_eq!(hits, vec![right_id, left_id]);
}

#[test]
fn stroke_reach_includes_brush_radius() {
    let mut f = ObjectFactory::new(CanvasDefaults::standard());
    let obj = rect_at(&mut f, 0.0, 0.0, 50.0, 50.0);
    let id = obj.id;
    let store = store_with(vec![obj]);
    // Centerline 5 units below the painted edge at y = 51.
    let near = stroke(&[(0.0, 56.0), (50.0, 56.0)], 12.0);
    let far = stroke(&[(0.0, 56.0), (50.0, 56.0)], 4.0);
    assert_eq!(objects_under_stroke(&near, &store), vec![id]);
    assert!(objects_under_stroke(&far, &store).is_empty());
}

#[test]
fn stroke_skips_non_erasable_and_hidden() {
    let mut f = ObjectFactory::new(CanvasDefaults::standard());
    let image = f.create(ObjectKind::Image, Bounds::new(0.0, 0.0, 50.0, 50.0), json!({}));
    let mut locked = rect_at(&mut f, 0.0, 0.0, 50.0, 50.0);
    locked.set_locked(true);
    let mut hidden = rect_at(&mut f, 0.0, 0.0, 50.0, 50.0);
    hidden.visible = false;
    let store = store_with(vec![image, locked, hidden]);
    assert!(objects_under_stroke(&stroke(&[(0.0, 0.0), (50.0, 50.0)], 10.0), &store).is_empty());
}

#[test]
fn single_point_stroke_hits_object_under_it() {
    let mut f = ObjectFactory::new(CanvasDefaults::standard());
    let obj = rect_at(&mut f, 0.0, 0.0, 50.0, 50.0);
    let id = obj.id;
    let store = store_with(vec![obj]);
    assert_eq!(objects_under_stroke(&stroke(&[(25.0, 25.0)], 10.0), &store), vec![id]);
}

#[test]
fn empty_stroke_hits_nothing() {
    let mut f = ObjectFactory::new(CanvasDefaults::standard());
    let store = store_with(vec![rect_at(&mut f, 0.0, 0.0, 50.0, 50.0)]);
    assert!(objects_under_stroke(&stroke(&[], 10.0), &store).is_empty());
}
