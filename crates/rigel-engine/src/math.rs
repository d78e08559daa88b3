//! Small fixed-function math helpers for the 2D pipeline.

/// Builds a column-major orthographic projection matrix.
///
/// `top` above `bottom` with a top-left-origin pixel space flips the Y axis,
/// which is what the 2D batcher wants: it passes `(x, y, x + w, y + h)`.
///
/// # Panics
/// Panics if `near == far`.
pub fn ortho(left: f32, top: f32, right: f32, bottom: f32, near: f32, far: f32) -> [f32; 16] {
    assert!(near != far, "degenerate orthographic depth range");

    let rl = right - left;
    let tb = top - bottom;
    let fnr = far - near;

    let mut m = [0.0f32; 16];
    m[0] = 2.0 / rl;
    m[5] = 2.0 / tb;
    m[10] = -2.0 / fnr;
    m[12] = -(right + left) / rl;
    m[13] = -(top + bottom) / tb;
    m[14] = -(far + near) / fnr;
    m[15] = 1.0;
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ortho_maps_viewport_corners_to_ndc() {
        // 800x600 viewport at origin, the way the batcher calls it.
        let m = ortho(0.0, 0.0, 800.0, 600.0, 0.0, 1.0);

        let apply = |m: &[f32; 16], x: f32, y: f32| -> (f32, f32) {
            (m[0] * x + m[12], m[5] * y + m[13])
        };

        // Top-left pixel corner lands at NDC (-1, 1), bottom-right at (1, -1).
        assert_eq!(apply(&m, 0.0, 0.0), (-1.0, 1.0));
        assert_eq!(apply(&m, 800.0, 600.0), (1.0, -1.0));
        assert_eq!(apply(&m, 400.0, 300.0), (0.0, 0.0));
    }

    #[test]
    fn ortho_depth_range() {
        let m = ortho(0.0, 0.0, 1.0, 1.0, 0.0, 1.0);
        // GL convention: eye-space z = -near maps to NDC -1, z = -far to +1.
        assert_eq!(m[10] * 0.0 + m[14], -1.0);
        assert_eq!(m[10] * -1.0 + m[14], 1.0);
    }
}
