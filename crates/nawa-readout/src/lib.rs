// ─────────────────────────────────────────────────────────────────────
// Nawa — Layer Readout
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Linear readout over the states of a layered Nawa system.
//!
//! The recurrent stack is left untouched; only the readout is fitted:
//!   - features: concatenate chosen layers' (re, im) planes per step
//!   - RidgeReadout: W = (XᵀX + αI)⁺ XᵀY via symmetric eigendecomposition
//!   - linalg: cyclic Jacobi eigensolver and pseudo-inverse solve
//!   - tokenizer: bytes to seeded unit-magnitude complex embeddings and
//!     back by nearest resonance

pub mod features;
pub mod linalg;
pub mod readout;
pub mod tokenizer;

pub use features::{layer_features, FeatureCollector};
pub use linalg::{solve_symmetric_pinv, symmetric_eigen, SymmetricEigen};
pub use readout::{RidgeReadout, DEFAULT_ALPHA};
pub use tokenizer::{resonance, ResonantTokenizer, DEFAULT_TOKENIZER_SEED, VOCAB_SIZE};
