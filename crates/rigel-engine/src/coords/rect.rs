/// Axis-aligned rectangle in logical pixels (top-left origin).
///
/// Carries quad bounds and UV subrectangles through the 2D recording API,
/// packed in the `(x, y, w, h)` order the instanced quad attributes read.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// The full-texture UV rectangle.
    pub const UNIT: Rect = Rect::new(0.0, 0.0, 1.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Bounds as the per-instance vec4 the quad shaders expand.
    #[inline]
    pub(crate) fn to_bounds(self) -> [f32; 4] {
        [self.x, self.y, self.width, self.height]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_pack_in_attribute_order() {
        assert_eq!(Rect::new(1.0, 2.0, 3.0, 4.0).to_bounds(), [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn unit_rect_covers_the_whole_texture() {
        assert_eq!(Rect::UNIT.to_bounds(), [0.0, 0.0, 1.0, 1.0]);
    }
}
