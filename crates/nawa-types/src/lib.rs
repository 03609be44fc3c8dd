// ─────────────────────────────────────────────────────────────────────
// Nawa — Engine Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, and error hierarchy shared by the
//! Nawa recurrent engine and its readout.

pub mod config;
pub mod error;
pub mod state;

pub use config::{encoded_layer_bytes, NawaConfig};
pub use error::{NawaError, NawaResult};
pub use state::{LayerState, RestoreReport, StepReport};
