//! Engine enum to GL enum translation.
//!
//! Pure value mapping, no GL calls. Kept in one place so the backend trait
//! can stay a thin pass-through.

use super::types::{
    BlendFactor, BlendOp, BufferType, BufferUsage, ImageFormat, IndexType, PrimitiveType,
    SamplerFilter, SamplerWrap, TextureType, VertexAttributeType,
};

pub(crate) fn buffer_target(ty: BufferType) -> u32 {
    match ty {
        BufferType::Vertex => glow::ARRAY_BUFFER,
        BufferType::Index => glow::ELEMENT_ARRAY_BUFFER,
        BufferType::Constant => glow::UNIFORM_BUFFER,
    }
}

pub(crate) fn buffer_usage(usage: BufferUsage) -> u32 {
    match usage {
        BufferUsage::Immutable => glow::STATIC_DRAW,
        BufferUsage::Dynamic => glow::DYNAMIC_DRAW,
        BufferUsage::Stream => glow::STREAM_DRAW,
    }
}

pub(crate) fn primitive_mode(primitive: PrimitiveType) -> u32 {
    match primitive {
        PrimitiveType::Points => glow::POINTS,
        PrimitiveType::Lines => glow::LINES,
        PrimitiveType::LineStrip => glow::LINE_STRIP,
        PrimitiveType::LineLoop => glow::LINE_LOOP,
        PrimitiveType::Triangles => glow::TRIANGLES,
        PrimitiveType::TriangleStrip => glow::TRIANGLE_STRIP,
        PrimitiveType::TriangleFan => glow::TRIANGLE_FAN,
    }
}

/// GL component type, whether it is normalized, and whether it feeds an
/// integer attribute (and thus needs the `IPointer` entry point).
pub(crate) fn attribute_gl(ty: VertexAttributeType) -> (u32, bool, bool) {
    match ty {
        VertexAttributeType::Float => (glow::FLOAT, false, false),
        VertexAttributeType::Unorm8 => (glow::UNSIGNED_BYTE, true, false),
        VertexAttributeType::Unorm16 => (glow::UNSIGNED_SHORT, true, false),
        VertexAttributeType::Uint8 => (glow::UNSIGNED_BYTE, false, true),
        VertexAttributeType::Uint16 => (glow::UNSIGNED_SHORT, false, true),
        VertexAttributeType::Uint32 => (glow::UNSIGNED_INT, false, true),
    }
}

pub(crate) fn texture_target(ty: TextureType) -> u32 {
    match ty {
        TextureType::Texture2D => glow::TEXTURE_2D,
        TextureType::Texture2DArray => glow::TEXTURE_2D_ARRAY,
    }
}

pub(crate) fn internal_format(format: ImageFormat) -> i32 {
    let value = match format {
        ImageFormat::R8Unorm => glow::R8,
        ImageFormat::Rg8Unorm => glow::RG8,
        ImageFormat::Rgba8Unorm => glow::RGBA8,
        ImageFormat::Rgba8UnormSrgb => glow::SRGB8_ALPHA8,
    };
    value as i32
}

/// Pixel transfer format and component type for uploads.
pub(crate) fn pixel_format(format: ImageFormat) -> (u32, u32) {
    match format {
        ImageFormat::R8Unorm => (glow::RED, glow::UNSIGNED_BYTE),
        ImageFormat::Rg8Unorm => (glow::RG, glow::UNSIGNED_BYTE),
        ImageFormat::Rgba8Unorm | ImageFormat::Rgba8UnormSrgb => {
            (glow::RGBA, glow::UNSIGNED_BYTE)
        }
    }
}

pub(crate) fn sampler_filter(filter: SamplerFilter) -> i32 {
    let value = match filter {
        SamplerFilter::Nearest => glow::NEAREST,
        SamplerFilter::Linear => glow::LINEAR,
    };
    value as i32
}

pub(crate) fn sampler_wrap(wrap: SamplerWrap) -> i32 {
    let value = match wrap {
        SamplerWrap::Repeat => glow::REPEAT,
        SamplerWrap::MirroredRepeat => glow::MIRRORED_REPEAT,
        SamplerWrap::ClampToEdge => glow::CLAMP_TO_EDGE,
    };
    value as i32
}

pub(crate) fn blend_factor(factor: BlendFactor) -> u32 {
    match factor {
        BlendFactor::Zero => glow::ZERO,
        BlendFactor::One => glow::ONE,
        BlendFactor::SrcColor => glow::SRC_COLOR,
        BlendFactor::OneMinusSrcColor => glow::ONE_MINUS_SRC_COLOR,
        BlendFactor::DstColor => glow::DST_COLOR,
        BlendFactor::OneMinusDstColor => glow::ONE_MINUS_DST_COLOR,
        BlendFactor::SrcAlpha => glow::SRC_ALPHA,
        BlendFactor::OneMinusSrcAlpha => glow::ONE_MINUS_SRC_ALPHA,
        BlendFactor::DstAlpha => glow::DST_ALPHA,
        BlendFactor::OneMinusDstAlpha => glow::ONE_MINUS_DST_ALPHA,
        BlendFactor::ConstantColor => glow::CONSTANT_COLOR,
        BlendFactor::OneMinusConstantColor => glow::ONE_MINUS_CONSTANT_COLOR,
        BlendFactor::ConstantAlpha => glow::CONSTANT_ALPHA,
        BlendFactor::OneMinusConstantAlpha => glow::ONE_MINUS_CONSTANT_ALPHA,
        BlendFactor::SrcAlphaSaturate => glow::SRC_ALPHA_SATURATE,
        BlendFactor::Src1Color => glow::SRC1_COLOR,
        BlendFactor::OneMinusSrc1Color => glow::ONE_MINUS_SRC1_COLOR,
        BlendFactor::Src1Alpha => glow::SRC1_ALPHA,
    }
}

pub(crate) fn blend_op(op: BlendOp) -> u32 {
    match op {
        BlendOp::Add => glow::FUNC_ADD,
        BlendOp::Subtract => glow::FUNC_SUBTRACT,
        BlendOp::ReverseSubtract => glow::FUNC_REVERSE_SUBTRACT,
        BlendOp::Min => glow::MIN,
        BlendOp::Max => glow::MAX,
    }
}

pub(crate) fn index_type(ty: IndexType) -> u32 {
    match ty {
        IndexType::U16 => glow::UNSIGNED_SHORT,
        IndexType::U32 => glow::UNSIGNED_INT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_translation() {
        assert_eq!(buffer_target(BufferType::Vertex), glow::ARRAY_BUFFER);
        assert_eq!(buffer_target(BufferType::Constant), glow::UNIFORM_BUFFER);
        assert_eq!(buffer_usage(BufferUsage::Stream), glow::STREAM_DRAW);
    }

    #[test]
    fn attribute_translation() {
        assert_eq!(attribute_gl(VertexAttributeType::Float), (glow::FLOAT, false, false));
        // Unorm8 normalizes, Uint32 goes through the integer entry point.
        assert_eq!(attribute_gl(VertexAttributeType::Unorm8), (glow::UNSIGNED_BYTE, true, false));
        assert_eq!(attribute_gl(VertexAttributeType::Uint8), (glow::UNSIGNED_BYTE, false, true));
        assert_eq!(attribute_gl(VertexAttributeType::Uint32), (glow::UNSIGNED_INT, false, true));
    }

    #[test]
    fn srgb_formats_upload_as_rgba() {
        assert_eq!(internal_format(ImageFormat::Rgba8UnormSrgb), glow::SRGB8_ALPHA8 as i32);
        assert_eq!(
            pixel_format(ImageFormat::Rgba8UnormSrgb),
            (glow::RGBA, glow::UNSIGNED_BYTE)
        );
    }

    #[test]
    fn blend_translation() {
        assert_eq!(blend_factor(BlendFactor::SrcAlphaSaturate), glow::SRC_ALPHA_SATURATE);
        assert_eq!(blend_factor(BlendFactor::OneMinusSrc1Color), glow::ONE_MINUS_SRC1_COLOR);
        assert_eq!(blend_op(BlendOp::ReverseSubtract), glow::FUNC_REVERSE_SUBTRACT);
    }
}
