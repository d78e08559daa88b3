/// Integer point in pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Point2i {
    pub x: i32,
    pub y: i32,
}

impl Point2i {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Integer size in pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Size2i {
    pub width: i32,
    pub height: i32,
}

impl Size2i {
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Integer rectangle in pixels (top-left origin). Used for viewports and
/// scissor regions, where the GPU wants whole pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Rect2i {
    pub position: Point2i,
    pub size: Size2i,
}

impl Rect2i {
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            position: Point2i::new(x, y),
            size: Size2i::new(width, height),
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.width <= 0 || self.size.height <= 0
    }
}
