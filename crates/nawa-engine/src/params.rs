// ─────────────────────────────────────────────────────────────────────
// Nawa — Canonical Parameters
// ─────────────────────────────────────────────────────────────────────
//! Fixed constants of the layered engine.

/// Layers in a default stack.
pub const DEFAULT_LAYERS: usize = 9;

/// Step size used by `System::adapt_layer`.
pub const LEARNING_RATE: f64 = 0.05;

/// Weight decay applied after every adaptation step.
pub const WEIGHT_DECAY: f64 = 0.9999;

/// Magnitudes at or below this are snapped to zero on normalisation.
pub const NORM_EPSILON: f64 = 1e-9;

/// σ of the off-diagonal recurrent noise.
pub const RECURRENT_NOISE: f64 = 0.01;

/// σ of the gate and input weight noise around (1, 0).
pub const GATE_NOISE: f64 = 0.1;

/// Mean real part of the feedback weights.
pub const FEEDBACK_BIAS: f64 = 0.1;

/// σ of the feedback weight noise.
pub const FEEDBACK_NOISE: f64 = 0.01;

/// Ticks between successive activations of layer `k` (`2^k`).
///
/// Saturates at `u64::MAX` for `k >= 64`.
#[inline]
pub fn time_ratio(k: usize) -> u64 {
    u32::try_from(k)
        .ok()
        .and_then(|shift| 1u64.checked_shl(shift))
        .unwrap_or(u64::MAX)
}
