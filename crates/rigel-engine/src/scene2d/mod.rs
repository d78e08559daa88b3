//! 2D scene batching and presentation.
//!
//! Two front ends share one batching core:
//! - [`Scene2d`] records retained command lists that [`Renderer2d::present`]
//!   replays onto any context;
//! - the renderer's `immediate_*` methods draw eagerly, flushing the single
//!   pending batch whenever its state changes.
//!
//! Both fold consecutive draws with identical state (mesh, technique, blend,
//! texture) into one instanced GPU command.

mod renderer;
mod scene;
mod shaders;
mod shapes;

pub use renderer::Renderer2d;
pub use scene::Scene2d;
pub use shapes::MeshKind;
