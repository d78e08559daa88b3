/// Packed 32-bit color, `0xRRGGBBAA`.
///
/// This is the public color currency of the 2D API. GPU vertex attributes
/// consume the channels as four unsigned-normalized bytes in memory order
/// (R, G, B, A on little-endian), so the packed word is byte-reversed exactly
/// once when an instance is recorded; see [`Color::swizzle`].
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub const TRANSPARENT: Color = Color(0x0000_0000);
    pub const BLACK: Color = Color(0x0000_00FF);
    pub const WHITE: Color = Color(0xFFFF_FFFF);

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | a as u32)
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// Byte-reverses the packed word into the channel order the GPU reads.
    ///
    /// Applying the swizzle twice returns the original value.
    #[inline]
    pub const fn swizzle(self) -> u32 {
        self.0.swap_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── packing ───────────────────────────────────────────────────────────

    #[test]
    fn rgba_packs_in_declaration_order() {
        let c = Color::rgba(0x12, 0x34, 0x56, 0x78);
        assert_eq!(c.0, 0x1234_5678);
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (0x12, 0x34, 0x56, 0x78));
    }

    // ── swizzle ───────────────────────────────────────────────────────────

    #[test]
    fn swizzle_reverses_bytes() {
        assert_eq!(Color(0x0102_0304).swizzle(), 0x0403_0201);
        assert_eq!(Color(0xAABB_CCDD).swizzle(), 0xDDCC_BBAA);
    }

    #[test]
    fn swizzle_round_trips() {
        for raw in [0x0000_0000u32, 0xFFFF_FFFF, 0x0102_0304, 0xAABB_CCDD] {
            assert_eq!(Color(Color(raw).swizzle()).swizzle(), raw);
        }
    }
}
