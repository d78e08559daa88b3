//! GPU device abstraction over an OpenGL backend.
//!
//! This module is responsible for:
//! - CPU-side resource handles (buffers, textures, samplers, vertex layouts,
//!   shader techniques) wrapping GL objects
//! - a per-context state cache that skips redundant GL binds
//! - translating engine enums to GL enums and issuing clear/draw calls
//!
//! # Error policy
//!
//! Two disjoint tiers. Resource creation failures are recoverable and
//! reported through [`DeviceError`] / [`TechniqueError`]. Everything else
//! (stale handles, drawing without a technique, stream indices out of range)
//! is a programmer contract violation and panics. Those panics are not meant
//! to be caught: they are bugs to fix, not conditions to handle.

mod context;
mod error;
mod gl;
mod glow_backend;
mod layout;
mod recording;
mod state;
mod translate;
mod types;

pub use context::{Device, GraphicsContext, HeadlessContext};
pub use error::{DeviceError, TechniqueError};
pub use gl::GlApi;
pub use glow_backend::GlowGl;
pub use layout::{
    LayoutAttribute, LayoutStream, MAX_STREAM_ATTRIBUTES, MAX_VERTEX_STREAMS, VertexLayout,
};
pub use recording::{GlCall, RecordingGl};
pub use types::{
    BlendFactor, BlendOp, BlendState, BufferDesc, BufferHandle, BufferType, BufferUsage,
    BufferView, ClearOps, ContextHandle, ImageFormat, ImageView, IndexBufferView, IndexType,
    PrimitiveType, SamplerDesc, SamplerFilter, SamplerHandle, SamplerWrap, TechniqueDesc,
    TechniqueHandle, TextureDesc, TextureHandle, TextureType, VertexAttributeDesc,
    VertexAttributeType, VertexLayoutDesc, VertexLayoutHandle, VertexStreamDesc,
};
