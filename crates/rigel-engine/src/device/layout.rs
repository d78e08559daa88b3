use super::types::{VertexAttributeType, VertexLayoutDesc};

/// Maximum number of vertex streams in a layout.
pub const MAX_VERTEX_STREAMS: usize = 8;

/// Maximum number of attributes a single stream may carry.
pub const MAX_STREAM_ATTRIBUTES: usize = 16;

/// One attribute with its resolved shader location and byte offset.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayoutAttribute {
    /// Shader attribute location: the attribute's position in the
    /// declaration order of the whole layout, across all streams.
    pub location: u32,
    /// Byte offset within the stream's per-element block.
    pub offset: u32,
    pub ty: VertexAttributeType,
    pub dimension: u32,
}

/// One vertex stream with its computed stride.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutStream {
    pub instanced: bool,
    /// Total bytes per vertex (or per instance) in this stream.
    pub stride: u32,
    pub attributes: Vec<LayoutAttribute>,
}

/// A validated vertex layout.
///
/// Built once from a [`VertexLayoutDesc`]; locations and offsets are fixed
/// at build time so binding a stream is a straight walk over its attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexLayout {
    streams: Vec<LayoutStream>,
    attribute_count: u32,
}

impl VertexLayout {
    /// Resolves a layout description.
    ///
    /// # Panics
    /// Panics if the description exceeds [`MAX_VERTEX_STREAMS`], references
    /// a stream out of range, or packs more than [`MAX_STREAM_ATTRIBUTES`]
    /// attributes into one stream. Layout descriptions are compile-time
    /// artifacts of the caller, so a bad one is a bug.
    pub(crate) fn build(desc: &VertexLayoutDesc) -> Self {
        assert!(
            desc.streams.len() <= MAX_VERTEX_STREAMS,
            "vertex layout declares {} streams, maximum is {MAX_VERTEX_STREAMS}",
            desc.streams.len()
        );

        let mut streams: Vec<LayoutStream> = desc
            .streams
            .iter()
            .map(|stream| LayoutStream {
                instanced: stream.instanced,
                stride: 0,
                attributes: Vec::new(),
            })
            .collect();

        for (index, attribute) in desc.attributes.iter().enumerate() {
            assert!(
                (1..=4).contains(&attribute.dimension),
                "vertex attribute {index} has dimension {}, expected 1 to 4",
                attribute.dimension
            );
            let stream = match streams.get_mut(attribute.stream as usize) {
                Some(stream) => stream,
                None => panic!(
                    "vertex attribute {index} references stream {} of {}",
                    attribute.stream,
                    desc.streams.len()
                ),
            };
            assert!(
                stream.attributes.len() < MAX_STREAM_ATTRIBUTES,
                "vertex stream {} exceeds {MAX_STREAM_ATTRIBUTES} attributes",
                attribute.stream
            );

            stream.attributes.push(LayoutAttribute {
                location: index as u32,
                offset: stream.stride,
                ty: attribute.ty,
                dimension: attribute.dimension,
            });
            stream.stride += attribute.ty.byte_size() * attribute.dimension;
        }

        Self {
            streams,
            attribute_count: desc.attributes.len() as u32,
        }
    }

    pub fn streams(&self) -> &[LayoutStream] {
        &self.streams
    }

    /// Number of attribute locations this layout occupies, starting at 0.
    pub fn attribute_count(&self) -> u32 {
        self.attribute_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::types::{VertexAttributeDesc, VertexStreamDesc};

    fn desc<'a>(
        streams: &'a [VertexStreamDesc],
        attributes: &'a [VertexAttributeDesc],
    ) -> VertexLayoutDesc<'a> {
        VertexLayoutDesc { streams, attributes }
    }

    #[test]
    fn locations_flatten_across_streams() {
        // Two streams, interleaved declaration order. Locations follow the
        // declaration order, not the stream grouping.
        let layout = VertexLayout::build(&desc(
            &[
                VertexStreamDesc { instanced: false },
                VertexStreamDesc { instanced: true },
            ],
            &[
                VertexAttributeDesc { stream: 0, ty: VertexAttributeType::Float, dimension: 2 },
                VertexAttributeDesc { stream: 1, ty: VertexAttributeType::Float, dimension: 4 },
                VertexAttributeDesc { stream: 0, ty: VertexAttributeType::Unorm8, dimension: 4 },
                VertexAttributeDesc { stream: 1, ty: VertexAttributeType::Uint32, dimension: 1 },
            ],
        ));

        assert_eq!(layout.attribute_count(), 4);
        let s0 = &layout.streams()[0];
        let s1 = &layout.streams()[1];
        assert_eq!(
            s0.attributes.iter().map(|a| a.location).collect::<Vec<_>>(),
            vec![0, 2]
        );
        assert_eq!(
            s1.attributes.iter().map(|a| a.location).collect::<Vec<_>>(),
            vec![1, 3]
        );
    }

    #[test]
    fn offsets_and_strides_accumulate_per_stream() {
        let layout = VertexLayout::build(&desc(
            &[
                VertexStreamDesc { instanced: false },
                VertexStreamDesc { instanced: true },
            ],
            &[
                VertexAttributeDesc { stream: 0, ty: VertexAttributeType::Float, dimension: 2 },
                VertexAttributeDesc { stream: 1, ty: VertexAttributeType::Float, dimension: 4 },
                VertexAttributeDesc { stream: 1, ty: VertexAttributeType::Unorm8, dimension: 4 },
            ],
        ));

        let s0 = &layout.streams()[0];
        assert_eq!(s0.stride, 8);
        assert_eq!(s0.attributes[0].offset, 0);

        let s1 = &layout.streams()[1];
        assert!(s1.instanced);
        assert_eq!(s1.attributes[0].offset, 0);
        assert_eq!(s1.attributes[1].offset, 16);
        assert_eq!(s1.stride, 20);
    }

    #[test]
    fn empty_stream_is_allowed() {
        let layout = VertexLayout::build(&desc(
            &[
                VertexStreamDesc { instanced: false },
                VertexStreamDesc { instanced: false },
            ],
            &[VertexAttributeDesc { stream: 1, ty: VertexAttributeType::Float, dimension: 3 }],
        ));
        assert_eq!(layout.streams()[0].stride, 0);
        assert!(layout.streams()[0].attributes.is_empty());
        assert_eq!(layout.streams()[1].stride, 12);
    }

    #[test]
    #[should_panic(expected = "references stream")]
    fn attribute_with_bad_stream_panics() {
        VertexLayout::build(&desc(
            &[VertexStreamDesc { instanced: false }],
            &[VertexAttributeDesc { stream: 1, ty: VertexAttributeType::Float, dimension: 2 }],
        ));
    }

    #[test]
    #[should_panic(expected = "exceeds 16 attributes")]
    fn overfull_stream_panics() {
        let attributes: Vec<VertexAttributeDesc> = (0..17)
            .map(|_| VertexAttributeDesc {
                stream: 0,
                ty: VertexAttributeType::Float,
                dimension: 1,
            })
            .collect();
        VertexLayout::build(&desc(&[VertexStreamDesc { instanced: false }], &attributes));
    }
}
