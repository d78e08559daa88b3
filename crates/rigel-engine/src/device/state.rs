use super::types::{
    BlendState, BufferView, TechniqueHandle, VertexLayoutHandle, NUM_BUFFER_TYPES,
    NUM_TEXTURE_TYPES,
};
use crate::coords::Rect2i;

/// Number of uniform-buffer binding slots tracked per context.
pub(crate) const MAX_CONSTANT_BUFFER_SLOTS: usize = 16;

/// Number of texture units tracked per context.
pub(crate) const MAX_TEXTURE_UNITS: usize = 16;

/// Mirror of the GL state owned by one context.
///
/// Every state-setting device call diffs its arguments against this cache
/// and issues GL only on a mismatch, then records what it set. GL context
/// state is per-context, so each [`super::ContextHandle`] owns its own copy.
/// The cache starts from "nothing bound", matching a fresh GL context.
#[derive(Debug)]
pub(crate) struct StateCache {
    pub technique: Option<TechniqueHandle>,
    pub vertex_layout: Option<VertexLayoutHandle>,
    /// Set when the layout changed but attribute pointers have not been
    /// re-specified yet; forces the next vertex-buffer bind (or draw) to
    /// rebind every stream.
    pub vertex_layout_dirty: bool,
    /// Highest attribute location currently enabled, exclusive.
    pub num_active_attributes: u32,
    /// Last bound vertex-stream views, indexed by stream.
    pub vertex_buffers: [Option<BufferView>; super::layout::MAX_VERTEX_STREAMS],
    /// Last bound uniform-buffer ranges, indexed by binding slot.
    pub constant_buffers: [Option<BufferView>; MAX_CONSTANT_BUFFER_SLOTS],
    /// Raw GL buffer name bound to each generic target, indexed by
    /// [`super::BufferType`] discriminant. `0` means none.
    pub bound_buffers: [u32; NUM_BUFFER_TYPES],
    /// Raw GL texture name per unit per target. `0` means none.
    pub textures: [[u32; NUM_TEXTURE_TYPES]; MAX_TEXTURE_UNITS],
    /// Raw GL sampler name per unit. `0` means none.
    pub samplers: [u32; MAX_TEXTURE_UNITS],
    pub blend: Option<BlendState>,
    pub viewport: Option<Rect2i>,
    /// `Some(None)` is "scissor known disabled"; outer `None` is unknown.
    pub scissor: Option<Option<Rect2i>>,
}

impl StateCache {
    pub(crate) fn new() -> Self {
        Self {
            technique: None,
            vertex_layout: None,
            vertex_layout_dirty: false,
            num_active_attributes: 0,
            vertex_buffers: [None; super::layout::MAX_VERTEX_STREAMS],
            constant_buffers: [None; MAX_CONSTANT_BUFFER_SLOTS],
            bound_buffers: [0; NUM_BUFFER_TYPES],
            textures: [[0; NUM_TEXTURE_TYPES]; MAX_TEXTURE_UNITS],
            samplers: [0; MAX_TEXTURE_UNITS],
            blend: None,
            viewport: None,
            scissor: None,
        }
    }
}
