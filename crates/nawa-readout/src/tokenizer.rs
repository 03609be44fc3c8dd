// ─────────────────────────────────────────────────────────────────────
// Nawa — Resonant Byte Tokenizer
// ─────────────────────────────────────────────────────────────────────
//! Maps each of the 256 byte values to a fixed, seeded complex embedding
//! with unit-magnitude components, and decodes a complex vector back to
//! the byte whose embedding resonates with it most strongly.
//!
//! Encoded sequences are `(re, im)` pairs, the same shape
//! `FeatureCollector::collect` drives a system with.

use std::path::Path;

use serde::{Deserialize, Serialize};

use nawa_engine::SimpleRng;
use nawa_types::{NawaError, NawaResult};

/// Number of distinct tokens (one per byte value).
pub const VOCAB_SIZE: usize = 256;

/// Seed used by `ResonantTokenizer::new`.
pub const DEFAULT_TOKENIZER_SEED: u64 = 42;

const MAG_EPSILON: f64 = 1e-9;

/// Real part of `Σ a · conj(b)`.
///
/// For unit-magnitude components this is the sum of the cosines of the
/// phase differences, so it peaks at `len` when `a == b`.
pub fn resonance(a_re: &[f64], a_im: &[f64], b_re: &[f64], b_im: &[f64]) -> f64 {
    let re: f64 = a_re.iter().zip(b_re).map(|(x, y)| x * y).sum();
    let im: f64 = a_im.iter().zip(b_im).map(|(x, y)| x * y).sum();
    re + im
}

/// Byte-level tokenizer over seeded complex embeddings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResonantTokenizer {
    dim: usize,
    /// VOCAB_SIZE × dim, row-major `[byte * dim + i]`.
    embeddings_re: Vec<f64>,
    embeddings_im: Vec<f64>,
}

impl ResonantTokenizer {
    pub fn new(dim: usize) -> Self {
        Self::with_seed(dim, DEFAULT_TOKENIZER_SEED)
    }

    /// Draw every real part, then every imaginary part, from N(0, 1) and
    /// scale each component to unit magnitude.
    pub fn with_seed(dim: usize, seed: u64) -> Self {
        let mut rng = SimpleRng::new(seed);
        let len = VOCAB_SIZE * dim;
        let mut embeddings_re: Vec<f64> = (0..len).map(|_| rng.next_normal()).collect();
        let mut embeddings_im: Vec<f64> = (0..len).map(|_| rng.next_normal()).collect();
        for (r, i) in embeddings_re.iter_mut().zip(embeddings_im.iter_mut()) {
            let mag = (*r * *r + *i * *i).sqrt() + MAG_EPSILON;
            *r /= mag;
            *i /= mag;
        }
        Self {
            dim,
            embeddings_re,
            embeddings_im,
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Embedding planes of `byte`.
    pub fn embedding(&self, byte: u8) -> (&[f64], &[f64]) {
        let start = byte as usize * self.dim;
        let end = start + self.dim;
        (&self.embeddings_re[start..end], &self.embeddings_im[start..end])
    }

    /// One `(re, im)` embedding per byte.
    pub fn encode(&self, bytes: &[u8]) -> Vec<(Vec<f64>, Vec<f64>)> {
        bytes
            .iter()
            .map(|&b| {
                let (re, im) = self.embedding(b);
                (re.to_vec(), im.to_vec())
            })
            .collect()
    }

    /// Encode the UTF-8 bytes of `text`.
    pub fn encode_str(&self, text: &str) -> Vec<(Vec<f64>, Vec<f64>)> {
        self.encode(text.as_bytes())
    }

    /// Byte whose embedding has the highest resonance with `(re, im)`.
    /// Ties go to the lower byte value.
    pub fn decode(&self, re: &[f64], im: &[f64]) -> NawaResult<u8> {
        for plane in [re, im] {
            if plane.len() != self.dim {
                return Err(NawaError::Dimension {
                    expected: self.dim,
                    got: plane.len(),
                });
            }
        }
        if re.iter().chain(im).any(|v| !v.is_finite()) {
            return Err(NawaError::Numerical(
                "decode input contains NaN or Inf".to_string(),
            ));
        }

        let mut best = 0u8;
        let mut best_score = f64::NEG_INFINITY;
        for byte in 0..=u8::MAX {
            let (er, ei) = self.embedding(byte);
            let score = resonance(re, im, er, ei);
            if score > best_score {
                best = byte;
                best_score = score;
            }
        }
        Ok(best)
    }

    /// Decode every vector and read the bytes as UTF-8, replacing
    /// invalid sequences with U+FFFD.
    pub fn decode_sequence(&self, seq: &[(Vec<f64>, Vec<f64>)]) -> NawaResult<String> {
        let bytes = seq
            .iter()
            .map(|(re, im)| self.decode(re, im))
            .collect::<NawaResult<Vec<u8>>>()?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn to_json(&self) -> NawaResult<String> {
        serde_json::to_string(self)
            .map_err(|e| NawaError::Readout(format!("JSON encode error: {e}")))
    }

    /// Load a table stored with `to_json`, checking its shape.
    pub fn from_json(json: &str) -> NawaResult<Self> {
        let tok: Self = serde_json::from_str(json)
            .map_err(|e| NawaError::Readout(format!("JSON parse error: {e}")))?;
        let expected = tok
            .dim
            .checked_mul(VOCAB_SIZE)
            .ok_or_else(|| NawaError::Readout("embedding table size overflows".to_string()))?;
        for plane in [&tok.embeddings_re, &tok.embeddings_im] {
            if plane.len() != expected {
                return Err(NawaError::Dimension {
                    expected,
                    got: plane.len(),
                });
            }
        }
        Ok(tok)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> NawaResult<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        log::info!("saved tokenizer (dim {}) to {}", self.dim, path.display());
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> NawaResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }
}
