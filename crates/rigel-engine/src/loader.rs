//! Probe-then-fill data source boundary.
//!
//! Embedders that bake GPU resources from external assets (font faces,
//! image files) supply raw bytes through this interface. The calling
//! convention is two-phase: the source is handed a buffer, and if the buffer
//! is too small it answers with the size it needs instead of writing anything.
//! [`read_to_vec`] wraps the retry loop so engine code only ever sees a
//! correctly-sized byte vector.

/// Outcome of one [`FaceDataSource::read_face`] call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FaceDataStatus {
    /// The buffer was large enough; this many bytes were written.
    Filled(usize),
    /// The buffer was too small; retry with at least this capacity.
    Needs(usize),
}

/// Supplier of raw face/asset bytes.
///
/// Implementations must be consistent: a `Needs(n)` answer followed by a call
/// with a buffer of at least `n` bytes must succeed.
pub trait FaceDataSource {
    fn read_face(&mut self, buf: &mut [u8]) -> FaceDataStatus;
}

/// Reads the full contents of `source` into `buf`, growing it as requested.
///
/// Returns the number of bytes read; `buf` is truncated to exactly that
/// length. Existing capacity is reused, so a caller-managed scratch vector
/// amortizes allocations across loads.
///
/// # Panics
/// Panics if the source keeps asking for more space without making progress
/// (a contract violation in the source).
pub fn read_to_vec(source: &mut dyn FaceDataSource, buf: &mut Vec<u8>) -> usize {
    loop {
        match source.read_face(buf.as_mut_slice()) {
            FaceDataStatus::Filled(len) => {
                debug_assert!(len <= buf.len());
                buf.truncate(len);
                return len;
            }
            FaceDataStatus::Needs(required) => {
                assert!(
                    required > buf.len(),
                    "data source requested {required} bytes but {} were offered",
                    buf.len()
                );
                buf.resize(required, 0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Answers `Needs` until offered enough room, then writes a payload.
    struct StubSource {
        payload: Vec<u8>,
        probes: u32,
    }

    impl FaceDataSource for StubSource {
        fn read_face(&mut self, buf: &mut [u8]) -> FaceDataStatus {
            if buf.len() < self.payload.len() {
                self.probes += 1;
                return FaceDataStatus::Needs(self.payload.len());
            }
            buf[..self.payload.len()].copy_from_slice(&self.payload);
            FaceDataStatus::Filled(self.payload.len())
        }
    }

    #[test]
    fn probe_then_fill() {
        let mut source = StubSource {
            payload: vec![7u8; 100],
            probes: 0,
        };
        let mut buf = Vec::new();
        let len = read_to_vec(&mut source, &mut buf);
        assert_eq!(len, 100);
        assert_eq!(buf, vec![7u8; 100]);
        assert_eq!(source.probes, 1);
    }

    #[test]
    fn oversized_scratch_is_reused_without_probe() {
        let mut source = StubSource {
            payload: vec![3u8; 10],
            probes: 0,
        };
        let mut buf = vec![0u8; 64];
        let len = read_to_vec(&mut source, &mut buf);
        assert_eq!(len, 10);
        assert_eq!(buf.len(), 10);
        assert_eq!(source.probes, 0);
    }
}
