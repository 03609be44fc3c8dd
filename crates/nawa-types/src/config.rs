// ─────────────────────────────────────────────────────────────────────
// Nawa — Engine Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{NawaError, NawaResult};

/// Largest layer count whose time ratio `2^k` still fits in a `u64`.
pub const MAX_LAYERS: usize = 63;

/// Runtime configuration for a layered recurrent system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NawaConfig {
    /// Width N of every layer (complex components per state vector).
    /// Default: 64.
    pub dim: usize,

    /// Number of stacked layers. Layer k fires every `2^k` ticks.
    /// Default: 9.
    pub n_layers: usize,

    /// Layer k is initialised from seed `base_seed + k`.
    /// Default: 42.
    pub base_seed: u64,

    /// Step size for `adapt_layer`.
    /// Default: 0.05.
    pub learning_rate: f64,

    /// Multiplicative weight decay applied after every adaptation.
    /// Default: 0.9999.
    pub weight_decay: f64,

    /// Magnitudes at or below this snap to exactly zero on normalisation.
    /// Default: 1e-9.
    pub epsilon: f64,

    /// Reset non-finite state components to zero during integration.
    /// Default: true.
    pub finite_guard: bool,
}

impl Default for NawaConfig {
    fn default() -> Self {
        Self {
            dim: 64,
            n_layers: 9,
            base_seed: 42,
            learning_rate: 0.05,
            weight_decay: 0.9999,
            epsilon: 1e-9,
            finite_guard: true,
        }
    }
}

impl NawaConfig {
    /// Default configuration at a given width.
    pub fn with_dim(dim: usize) -> Self {
        Self {
            dim,
            ..Self::default()
        }
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> NawaResult<()> {
        if self.dim == 0 {
            return Err(NawaError::Config("dim must be >= 1".to_string()));
        }
        if encoded_layer_bytes(self.dim).is_none() {
            return Err(NawaError::Config(format!(
                "dim {} is too large: layer weights would overflow",
                self.dim
            )));
        }
        if self.n_layers == 0 || self.n_layers > MAX_LAYERS {
            return Err(NawaError::Config(format!(
                "n_layers must be in [1, {MAX_LAYERS}], got {}",
                self.n_layers
            )));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(NawaError::Config(format!(
                "learning_rate must be finite and > 0, got {}",
                self.learning_rate
            )));
        }
        if !(self.weight_decay > 0.0 && self.weight_decay <= 1.0) {
            return Err(NawaError::Config(format!(
                "weight_decay must be in (0, 1], got {}",
                self.weight_decay
            )));
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(NawaError::Config(format!(
                "epsilon must be finite and > 0, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }

    /// Load from JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> NawaResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| NawaError::Config(format!("JSON parse error: {e}")))
    }

    /// Serialise to a JSON string.
    pub fn to_json(&self) -> NawaResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| NawaError::Config(format!("JSON encode error: {e}")))
    }
}

/// Bytes of one encoded layer memory: a u64 width header plus
/// `2·dim² + 6·dim` f64 words. `None` when that does not fit a `usize`.
pub fn encoded_layer_bytes(dim: usize) -> Option<usize> {
    let square = dim.checked_mul(dim)?;
    let words = square.checked_mul(2)?.checked_add(dim.checked_mul(6)?)?;
    words.checked_mul(8)?.checked_add(8)
}
