use std::num::NonZeroU32;

// ─────────────────────────── handles ───────────────────────────

/// Opaque handle to a GPU buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BufferHandle(pub(crate) usize);

/// Opaque handle to a GPU texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureHandle(pub(crate) usize);

/// Opaque handle to a sampler object.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SamplerHandle(pub(crate) usize);

/// Opaque handle to a vertex layout.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct VertexLayoutHandle(pub(crate) usize);

/// Opaque handle to a window context registered with the device.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ContextHandle(pub(crate) usize);

/// Opaque handle to a shader technique.
///
/// Techniques live in an append-only registry, so handles are 1-based
/// registry indices and never dangle for the lifetime of the device.
/// `NonZeroU32` makes `Option<TechniqueHandle>` cost nothing.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TechniqueHandle(pub(crate) NonZeroU32);

impl TechniqueHandle {
    pub(crate) fn from_index(index: usize) -> Self {
        let one_based = u32::try_from(index + 1).expect("technique registry overflow");
        match NonZeroU32::new(one_based) {
            Some(raw) => Self(raw),
            None => unreachable!("1-based registry index is never zero"),
        }
    }

    pub(crate) fn index(self) -> usize {
        self.0.get() as usize - 1
    }
}

// ─────────────────────────── enums ───────────────────────────

/// Buffer binding class. Doubles as the index into the per-context
/// bound-buffer cache.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferType {
    Vertex = 0,
    Index = 1,
    Constant = 2,
}

pub(crate) const NUM_BUFFER_TYPES: usize = 3;

/// Expected update frequency, forwarded to the driver as a usage hint.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferUsage {
    /// Written once, drawn many times.
    Immutable,
    /// Rewritten every few frames.
    Dynamic,
    /// Rewritten every frame (e.g. instance streams).
    Stream,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrimitiveType {
    Points,
    Lines,
    LineStrip,
    LineLoop,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

/// Component type of a vertex attribute.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum VertexAttributeType {
    /// 32-bit float, passed through.
    Float,
    /// Unsigned byte normalized to [0, 1].
    Unorm8,
    /// Unsigned 16-bit integer normalized to [0, 1].
    Unorm16,
    /// Unsigned byte, not normalized.
    Uint8,
    /// Unsigned 16-bit integer, not normalized.
    Uint16,
    /// Unsigned 32-bit integer, not normalized.
    Uint32,
}

impl VertexAttributeType {
    /// Size in bytes of one component.
    pub fn byte_size(self) -> u32 {
        match self {
            Self::Float => 4,
            Self::Unorm8 | Self::Uint8 => 1,
            Self::Unorm16 | Self::Uint16 => 2,
            Self::Uint32 => 4,
        }
    }
}

/// Texture shape. Doubles as the per-unit index in the texture bind cache,
/// since GL tracks one binding per target per unit.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TextureType {
    Texture2D = 0,
    Texture2DArray = 1,
}

pub(crate) const NUM_TEXTURE_TYPES: usize = 2;

/// Texel storage format.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ImageFormat {
    R8Unorm,
    Rg8Unorm,
    Rgba8Unorm,
    Rgba8UnormSrgb,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SamplerFilter {
    Nearest,
    Linear,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SamplerWrap {
    Repeat,
    MirroredRepeat,
    ClampToEdge,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum IndexType {
    U16,
    U32,
}

impl IndexType {
    pub fn byte_size(self) -> u32 {
        match self {
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }
}

// ─────────────────────────── blend state ───────────────────────────

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    ConstantColor,
    OneMinusConstantColor,
    ConstantAlpha,
    OneMinusConstantAlpha,
    SrcAlphaSaturate,
    Src1Color,
    OneMinusSrc1Color,
    Src1Alpha,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BlendOp {
    Add,
    Subtract,
    ReverseSubtract,
    Min,
    Max,
}

/// Full separable blend equation, compared as a value by the state cache.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BlendState {
    pub src_rgb: BlendFactor,
    pub dst_rgb: BlendFactor,
    pub rgb_op: BlendOp,
    pub src_alpha: BlendFactor,
    pub dst_alpha: BlendFactor,
    pub alpha_op: BlendOp,
}

impl BlendState {
    /// Source replaces destination.
    pub const OPAQUE: Self = Self {
        src_rgb: BlendFactor::One,
        dst_rgb: BlendFactor::Zero,
        rgb_op: BlendOp::Add,
        src_alpha: BlendFactor::One,
        dst_alpha: BlendFactor::Zero,
        alpha_op: BlendOp::Add,
    };

    /// Standard premultiplied-free alpha blending.
    pub const ALPHA: Self = Self {
        src_rgb: BlendFactor::SrcAlpha,
        dst_rgb: BlendFactor::OneMinusSrcAlpha,
        rgb_op: BlendOp::Add,
        src_alpha: BlendFactor::One,
        dst_alpha: BlendFactor::OneMinusSrcAlpha,
        alpha_op: BlendOp::Add,
    };
}

// ─────────────────────────── descriptors ───────────────────────────

/// Description of a vertex stream within a layout.
#[derive(Debug, Copy, Clone)]
pub struct VertexStreamDesc {
    /// When set, attributes from this stream advance once per instance
    /// rather than once per vertex.
    pub instanced: bool,
}

/// Description of one vertex attribute.
///
/// Attributes bind to shader locations in declaration order across the whole
/// layout; byte offsets accumulate per stream in the same order.
#[derive(Debug, Copy, Clone)]
pub struct VertexAttributeDesc {
    /// Index of the stream this attribute reads from.
    pub stream: u32,
    pub ty: VertexAttributeType,
    /// Component count, 1 to 4.
    pub dimension: u32,
}

#[derive(Debug, Copy, Clone)]
pub struct VertexLayoutDesc<'a> {
    pub streams: &'a [VertexStreamDesc],
    pub attributes: &'a [VertexAttributeDesc],
}

#[derive(Debug, Copy, Clone)]
pub struct BufferDesc<'a> {
    pub ty: BufferType,
    pub usage: BufferUsage,
    /// Uploaded on creation when present.
    pub initial_data: Option<&'a [u8]>,
}

/// CPU-side image data with its interpretation.
///
/// `layers` is the array layer count carried by `pixels`; `1` for plain 2D
/// textures.
#[derive(Debug, Copy, Clone)]
pub struct ImageView<'a> {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub layers: u32,
    pub pixels: &'a [u8],
}

#[derive(Debug, Copy, Clone)]
pub struct TextureDesc<'a> {
    pub ty: TextureType,
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    /// Level-0 contents uploaded on creation when present.
    pub initial_data: Option<ImageView<'a>>,
}

#[derive(Debug, Copy, Clone)]
pub struct SamplerDesc {
    pub min_filter: SamplerFilter,
    pub mag_filter: SamplerFilter,
    pub wrap_u: SamplerWrap,
    pub wrap_v: SamplerWrap,
}

/// Description of a shader technique.
///
/// `constant_buffers` and `samplers` list the uniform block and sampler
/// uniform names the program is expected to use; each name is assigned the
/// binding slot equal to its position in the list. Names the linker
/// eliminated still consume their slot, so slot numbering is stable across
/// shader edits.
#[derive(Debug, Copy, Clone)]
pub struct TechniqueDesc<'a> {
    pub layout: VertexLayoutHandle,
    pub vertex_src: &'a str,
    pub geometry_src: Option<&'a str>,
    pub fragment_src: &'a str,
    pub constant_buffers: &'a [&'a str],
    pub samplers: &'a [&'a str],
}

// ─────────────────────────── views and ops ───────────────────────────

/// A byte range of a buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BufferView {
    pub buffer: BufferHandle,
    pub offset: usize,
    /// A size of zero means "the whole buffer as of bind time".
    pub size: usize,
}

impl BufferView {
    pub fn whole(buffer: BufferHandle) -> Self {
        Self { buffer, offset: 0, size: 0 }
    }

    pub fn range(buffer: BufferHandle, offset: usize, size: usize) -> Self {
        Self { buffer, offset, size }
    }
}

/// An index buffer range plus how to read it.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct IndexBufferView {
    pub view: BufferView,
    pub index_type: IndexType,
}

/// What to clear and with which values. At least one field must be set.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ClearOps {
    pub color: Option<[f32; 4]>,
    pub depth: Option<f32>,
    pub stencil: Option<u8>,
}

// ─────────────────────────── pool ───────────────────────────

/// Slot map for device resources. Freed slots are recycled LIFO; slot
/// indices are the public handle values.
#[derive(Debug)]
pub(crate) struct Pool<T> {
    slots: Vec<Option<T>>,
    free: Vec<usize>,
}

impl<T> Pool<T> {
    pub(crate) fn new() -> Self {
        Self { slots: Vec::new(), free: Vec::new() }
    }

    pub(crate) fn insert(&mut self, value: T) -> usize {
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(value);
                index
            }
            None => {
                self.slots.push(Some(value));
                self.slots.len() - 1
            }
        }
    }

    /// Panics on a stale or invalid index; handle misuse is a bug in the
    /// caller, not a runtime condition.
    pub(crate) fn get(&self, index: usize) -> &T {
        match self.slots.get(index) {
            Some(Some(value)) => value,
            _ => panic!("stale or invalid resource handle (slot {index})"),
        }
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> &mut T {
        match self.slots.get_mut(index) {
            Some(Some(value)) => value,
            _ => panic!("stale or invalid resource handle (slot {index})"),
        }
    }

    pub(crate) fn remove(&mut self, index: usize) -> T {
        match self.slots.get_mut(index).and_then(Option::take) {
            Some(value) => {
                self.free.push(index);
                value
            }
            None => panic!("stale or invalid resource handle (slot {index})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_recycles_slots() {
        let mut pool = Pool::new();
        let a = pool.insert("a");
        let b = pool.insert("b");
        assert_eq!(*pool.get(a), "a");
        assert_eq!(pool.remove(a), "a");
        let c = pool.insert("c");
        assert_eq!(c, a);
        assert_eq!(*pool.get(b), "b");
        assert_eq!(*pool.get(c), "c");
    }

    #[test]
    #[should_panic(expected = "stale or invalid resource handle")]
    fn pool_rejects_stale_slot() {
        let mut pool = Pool::new();
        let a = pool.insert(1);
        pool.remove(a);
        pool.get(a);
    }

    #[test]
    fn technique_handles_are_one_based() {
        let first = TechniqueHandle::from_index(0);
        assert_eq!(first.0.get(), 1);
        assert_eq!(first.index(), 0);
        assert_eq!(TechniqueHandle::from_index(7).index(), 7);
    }
}
