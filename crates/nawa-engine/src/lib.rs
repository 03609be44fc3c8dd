// ─────────────────────────────────────────────────────────────────────
// Nawa — Hierarchical Recurrent Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Multi-rate recurrent state evolution on complex vectors.
//!
//! Architecture:
//!   - Memory: per-layer complex weights (recurrent N×N, input, gate,
//!     feedback) with a flat little-endian byte encoding
//!   - Sphere: one layer's state, staging buffers, gated integration
//!     and local Hebbian-style adaptation
//!   - System: stack of spheres firing every 2^k ticks, wired
//!     bottom-up (input) and top-down (feedback)
//!   - SharedSystem: mutex-guarded handle for multi-threaded callers
//!
//! # Invariants
//!
//! 1. **Fatal-free hot path**: mismatched vector lengths and
//!    out-of-range layer indices are ignored (`false` / empty result).
//!    Only configuration, persistence decoding and file IO return errors.
//!
//! 2. **Bounded state**: after every integration each component has
//!    magnitude `tanh(|z|)`, never above 1.
//!
//! 3. **Asymmetric staleness**: within one tick layers fire bottom to
//!    top, so layer k reads layer k-1 from this tick and layer k+1 from
//!    its last firing.

pub mod memory;
pub mod params;
pub mod planes;
pub mod rng;
pub mod shared;
pub mod sphere;
pub mod system;

pub use memory::Memory;
pub use params::{time_ratio, DEFAULT_LAYERS, LEARNING_RATE, NORM_EPSILON, WEIGHT_DECAY};
pub use planes::ComplexPlanes;
pub use rng::SimpleRng;
pub use shared::SharedSystem;
pub use sphere::Sphere;
pub use system::System;

pub use nawa_types::{LayerState, NawaConfig, NawaError, NawaResult, RestoreReport, StepReport};
