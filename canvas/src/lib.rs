//! Drawing surface for Next Pen: the scene graph, input handling, and the
//! offscreen rasteriser the eraser pipeline reads pixels from.
//!
//! The crate is host-agnostic. A host feeds pointer events into
//! [`engine::EngineCore`] and processes the returned [`engine::Action`]s; an
//! [`engine::Action::EraseCompleted`] is handed to the erase coordinator,
//! which calls back into the engine to commit masks, rasterise, and remove
//! objects.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Engine state and the pointer-driven gesture handlers |
//! | [`doc`] | Drawable objects, erase masks, and the scene graph store |
//! | [`defaults`] | Per-kind object defaults and the object factory |
//! | [`input`] | Modes, UI state, and the gesture state machine |
//! | [`hit`] | Point and stroke hit-testing |
//! | [`render`] | Rasterising an object and its erase mask to RGBA |
//! | [`geometry`] | Points, bounds, and segment intersection |
//! | [`consts`] | Shared sizes, ratios, and limits |

pub mod consts;
pub mod defaults;
pub mod doc;
pub mod engine;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod render;
