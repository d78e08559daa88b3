//! Rigel engine crate.
//!
//! This crate owns the GPU device abstraction (an OpenGL state cache) and the
//! 2D scene batching layer built on top of it. Window creation and GL context
//! plumbing are collaborator traits supplied by the embedder.

pub mod coords;
pub mod device;
pub mod loader;
pub mod logging;
pub mod math;
pub mod scene2d;
pub mod window;
