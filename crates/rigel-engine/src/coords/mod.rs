//! Coordinate, geometry, and color types shared across the engine.
//!
//! Canonical CPU space:
//! - Logical pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! The scene batcher converts to NDC in shaders using an orthographic
//! projection uploaded once per present.

mod color;
mod rect;
mod recti;

pub use color::Color;
pub use rect::Rect;
pub use recti::{Point2i, Rect2i, Size2i};
