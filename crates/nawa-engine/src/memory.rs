// ─────────────────────────────────────────────────────────────────────
// Nawa — Layer Memory
// ─────────────────────────────────────────────────────────────────────
//! Adaptive complex weights of one layer, and their byte encoding.
//!
//! Encoding (little-endian):
//!   dim: u64
//!   recurrent re (dim² f64), recurrent im (dim² f64)
//!   gate re, gate im, input re, input im, feedback re, feedback im
//!   (dim f64 each)

use nawa_types::{encoded_layer_bytes, NawaError, NawaResult};

use crate::params::{FEEDBACK_BIAS, FEEDBACK_NOISE, GATE_NOISE, RECURRENT_NOISE};
use crate::planes::ComplexPlanes;
use crate::rng::SimpleRng;

const WORD: usize = std::mem::size_of::<f64>();
const HEADER: usize = std::mem::size_of::<u64>();

/// Complex weight memory of width `dim`.
#[derive(Debug, Clone, PartialEq)]
pub struct Memory {
    dim: usize,
    /// dim×dim, row-major `[i * dim + j]`.
    recurrent: ComplexPlanes,
    gate: ComplexPlanes,
    input: ComplexPlanes,
    feedback: ComplexPlanes,
}

impl Memory {
    /// Zero-initialised memory.
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            recurrent: ComplexPlanes::zeros(dim * dim),
            gate: ComplexPlanes::zeros(dim),
            input: ComplexPlanes::zeros(dim),
            feedback: ComplexPlanes::zeros(dim),
        }
    }

    /// Memory filled by `initialize` from a fresh generator.
    pub fn seeded(dim: usize, seed: u64) -> Self {
        let mut memory = Self::new(dim);
        memory.initialize(&mut SimpleRng::new(seed));
        memory
    }

    /// Deterministic pseudo-random fill.
    ///
    /// Recurrent diagonal is (1, 0) with small Gaussian noise elsewhere;
    /// gate and input weights sit near (1, 0); feedback near (0.1, 0).
    pub fn initialize(&mut self, rng: &mut SimpleRng) {
        let n = self.dim;
        for i in 0..n {
            for j in 0..n {
                let value = if i == j {
                    (1.0, 0.0)
                } else {
                    (
                        RECURRENT_NOISE * rng.next_normal(),
                        RECURRENT_NOISE * rng.next_normal(),
                    )
                };
                self.recurrent.set(i * n + j, value);
            }
        }

        for i in 0..n {
            self.gate.set(
                i,
                (
                    1.0 + GATE_NOISE * rng.next_normal(),
                    GATE_NOISE * rng.next_normal(),
                ),
            );
            self.input.set(
                i,
                (
                    1.0 + GATE_NOISE * rng.next_normal(),
                    GATE_NOISE * rng.next_normal(),
                ),
            );
            self.feedback.set(
                i,
                (
                    FEEDBACK_BIAS + FEEDBACK_NOISE * rng.next_normal(),
                    FEEDBACK_NOISE * rng.next_normal(),
                ),
            );
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn recurrent(&self) -> &ComplexPlanes {
        &self.recurrent
    }

    pub fn recurrent_mut(&mut self) -> &mut ComplexPlanes {
        &mut self.recurrent
    }

    pub fn gate(&self) -> &ComplexPlanes {
        &self.gate
    }

    pub fn gate_mut(&mut self) -> &mut ComplexPlanes {
        &mut self.gate
    }

    pub fn input(&self) -> &ComplexPlanes {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut ComplexPlanes {
        &mut self.input
    }

    pub fn feedback(&self) -> &ComplexPlanes {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut ComplexPlanes {
        &mut self.feedback
    }

    /// Recurrent weight at row `i`, column `j`.
    #[inline]
    pub fn recurrent_at(&self, i: usize, j: usize) -> (f64, f64) {
        self.recurrent.get(i * self.dim + j)
    }

    /// Byte length of an encoded memory of width `dim`, `None` on overflow.
    pub fn encoded_len(dim: usize) -> Option<usize> {
        encoded_layer_bytes(dim)
    }

    /// Read the declared width at the head of an encoded block.
    pub fn peek_dim(bytes: &[u8]) -> NawaResult<usize> {
        let head: [u8; HEADER] = bytes
            .get(..HEADER)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| {
                NawaError::Persistence(format!(
                    "need {HEADER} header bytes, got {}",
                    bytes.len()
                ))
            })?;
        usize::try_from(u64::from_le_bytes(head))
            .map_err(|_| NawaError::Persistence("declared dim exceeds usize".to_string()))
    }

    /// Encode as `dim` followed by the eight weight planes.
    pub fn serialize(&self) -> Vec<u8> {
        let len = Self::encoded_len(self.dim).unwrap_or(HEADER);
        let mut out = Vec::with_capacity(len);
        out.extend_from_slice(&(self.dim as u64).to_le_bytes());
        for plane in self.planes() {
            for v in plane {
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
        out
    }

    /// Decode a block produced by `serialize`, returning bytes consumed.
    ///
    /// On any error the memory is left unchanged: a differing declared
    /// width yields `NawaError::Dimension`, a short buffer
    /// `NawaError::Persistence`.
    pub fn deserialize(&mut self, bytes: &[u8]) -> NawaResult<usize> {
        let declared = Self::peek_dim(bytes)?;
        if declared != self.dim {
            return Err(NawaError::Dimension {
                expected: self.dim,
                got: declared,
            });
        }
        let len = Self::encoded_len(self.dim)
            .ok_or_else(|| NawaError::Persistence("encoded length overflow".to_string()))?;
        if bytes.len() < len {
            return Err(NawaError::Persistence(format!(
                "truncated memory block: need {len} bytes, got {}",
                bytes.len()
            )));
        }

        let mut words = bytes[HEADER..len]
            .chunks_exact(WORD)
            .map(|chunk| {
                let mut buf = [0u8; WORD];
                buf.copy_from_slice(chunk);
                f64::from_le_bytes(buf)
            });

        let mut decoded = Self::new(self.dim);
        for plane in decoded.planes_mut() {
            for slot in plane.iter_mut() {
                // length checked above
                *slot = words.next().unwrap_or(0.0);
            }
        }
        *self = decoded;
        Ok(len)
    }

    fn planes(&self) -> [&[f64]; 8] {
        [
            self.recurrent.re(),
            self.recurrent.im(),
            self.gate.re(),
            self.gate.im(),
            self.input.re(),
            self.input.im(),
            self.feedback.re(),
            self.feedback.im(),
        ]
    }

    fn planes_mut(&mut self) -> [&mut [f64]; 8] {
        let (rr, ri) = self.recurrent.split_mut();
        let (gr, gi) = self.gate.split_mut();
        let (ir, ii) = self.input.split_mut();
        let (fr, fi) = self.feedback.split_mut();
        [rr, ri, gr, gi, ir, ii, fr, fi]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zero() {
        let m = Memory::new(3);
        assert_eq!(m.recurrent().len(), 9);
        assert!(m.recurrent().re().iter().all(|&v| v == 0.0));
        assert!(m.gate().im().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_seeded_bit_identical() {
        let a = Memory::seeded(6, 99);
        let b = Memory::seeded(6, 99);
        assert_eq!(a.serialize(), b.serialize());
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = Memory::seeded(4, 1);
        let b = Memory::seeded(4, 2);
        assert_ne!(a, b);
    }

    #[test]
    fn test_initialize_shape() {
        let m = Memory::seeded(8, 5);
        for i in 0..8 {
            assert_eq!(m.recurrent_at(i, i), (1.0, 0.0));
            for j in 0..8 {
                if i != j {
                    let (r, im) = m.recurrent_at(i, j);
                    assert!(r.abs() < 0.1 && im.abs() < 0.1);
                }
            }
            let (gr, gi) = m.gate().get(i);
            assert!((gr - 1.0).abs() < 0.6 && gi.abs() < 0.6);
            let (fr, fi) = m.feedback().get(i);
            assert!((fr - 0.1).abs() < 0.06 && fi.abs() < 0.06);
        }
    }

    #[test]
    fn test_encoded_len() {
        assert_eq!(Memory::encoded_len(0), Some(8));
        assert_eq!(Memory::encoded_len(4), Some(8 + 8 * (32 + 24)));
        assert_eq!(Memory::seeded(4, 1).serialize().len(), 8 + 8 * 56);
        assert_eq!(Memory::encoded_len(usize::MAX), None);
    }

    #[test]
    fn test_serialize_layout() {
        let mut m = Memory::new(2);
        m.recurrent_mut().set(1, (2.5, -1.0));
        m.feedback_mut().set(1, (0.0, 7.0));
        let bytes = m.serialize();
        assert_eq!(&bytes[..8], &2u64.to_le_bytes());
        // recurrent re[1]
        assert_eq!(&bytes[8 + 8..8 + 16], &2.5f64.to_le_bytes());
        // recurrent im starts after 4 re words
        assert_eq!(&bytes[8 + 8 * 5..8 + 8 * 6], &(-1.0f64).to_le_bytes());
        // feedback im[1] is the final word
        assert_eq!(&bytes[bytes.len() - 8..], &7.0f64.to_le_bytes());
    }

    #[test]
    fn test_roundtrip_exact() {
        let original = Memory::seeded(5, 1234);
        let mut restored = Memory::new(5);
        let used = restored.deserialize(&original.serialize()).unwrap();
        assert_eq!(used, Memory::encoded_len(5).unwrap());
        assert_eq!(restored, original);
    }

    #[test]
    fn test_dimension_mismatch_leaves_unchanged() {
        let mut m = Memory::seeded(4, 3);
        let before = m.clone();
        let other = Memory::seeded(5, 3).serialize();
        match m.deserialize(&other) {
            Err(NawaError::Dimension { expected, got }) => {
                assert_eq!(expected, 4);
                assert_eq!(got, 5);
            }
            other => panic!("expected dimension error, got {other:?}"),
        }
        assert_eq!(m, before);
    }

    #[test]
    fn test_truncated_leaves_unchanged() {
        let mut m = Memory::seeded(4, 3);
        let before = m.clone();
        let bytes = Memory::seeded(4, 9).serialize();
        assert!(matches!(
            m.deserialize(&bytes[..bytes.len() - 1]),
            Err(NawaError::Persistence(_))
        ));
        assert!(matches!(m.deserialize(&bytes[..4]), Err(NawaError::Persistence(_))));
        assert_eq!(m, before);
    }
}
