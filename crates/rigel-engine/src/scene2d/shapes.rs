use bytemuck::{Pod, Zeroable};

use crate::coords::{Color, Rect};
use crate::device::PrimitiveType;

/// Instanced mesh a 2D batch draws.
///
/// Both quad kinds expand a four-vertex triangle-strip template; they differ
/// only in per-instance payload and shading.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MeshKind {
    QuadSolid,
    QuadTextured,
}

impl MeshKind {
    pub(crate) fn instance_size(self) -> usize {
        match self {
            Self::QuadSolid => size_of::<QuadSolidInstance>(),
            Self::QuadTextured => size_of::<QuadTexturedInstance>(),
        }
    }

    pub(crate) fn instance_align(self) -> usize {
        match self {
            Self::QuadSolid => align_of::<QuadSolidInstance>(),
            Self::QuadTextured => align_of::<QuadTexturedInstance>(),
        }
    }

    pub(crate) fn primitive(self) -> PrimitiveType {
        PrimitiveType::TriangleStrip
    }

    pub(crate) fn vertex_count(self) -> u32 {
        4
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::QuadSolid => "solid quad",
            Self::QuadTextured => "textured quad",
        }
    }
}

/// Per-instance data of a solid quad. Field order matches the builtin
/// solid layout's instanced stream.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct QuadSolidInstance {
    /// Position and size: `(x, y, w, h)` in scene pixels.
    pub bounds: [f32; 4],
    /// Channel-swizzled color, ready for the unorm attribute.
    pub color: u32,
}

impl QuadSolidInstance {
    pub(crate) fn new(rect: Rect, color: Color) -> Self {
        Self {
            bounds: rect.to_bounds(),
            color: color.swizzle(),
        }
    }
}

/// Per-instance data of a textured quad. Field order matches the builtin
/// textured layout's instanced stream.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct QuadTexturedInstance {
    pub bounds: [f32; 4],
    pub color: u32,
    /// UV subrectangle: `(u, v, w, h)` in texture space.
    pub uv_bounds: [f32; 4],
    /// Array layer sampled by the textured technique.
    pub layer: u32,
}

impl QuadTexturedInstance {
    pub(crate) fn new(rect: Rect, uv: Rect, color: Color, layer: u32) -> Self {
        Self {
            bounds: rect.to_bounds(),
            color: color.swizzle(),
            uv_bounds: uv.to_bounds(),
            layer,
        }
    }
}
