// ─────────────────────────────────────────────────────────────────────
// Nawa — State Snapshots and Step Reports
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

/// Copy of one layer's complex state as two parallel real planes.
///
/// An out-of-range layer query yields the empty snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerState {
    pub re: Vec<f64>,
    pub im: Vec<f64>,
}

impl LayerState {
    pub fn new(re: Vec<f64>, im: Vec<f64>) -> Self {
        Self { re, im }
    }

    pub fn len(&self) -> usize {
        self.re.len()
    }

    pub fn is_empty(&self) -> bool {
        self.re.is_empty()
    }

    /// Per-component magnitude `sqrt(re² + im²)`.
    pub fn magnitudes(&self) -> Vec<f64> {
        self.re
            .iter()
            .zip(self.im.iter())
            .map(|(r, i)| (r * r + i * i).sqrt())
            .collect()
    }

    /// Largest component magnitude (0.0 for an empty snapshot).
    pub fn max_magnitude(&self) -> f64 {
        self.magnitudes().into_iter().fold(0.0, f64::max)
    }

    /// Mean component magnitude (0.0 for an empty snapshot).
    pub fn mean_magnitude(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.magnitudes().iter().sum();
        sum / self.len() as f64
    }

    pub fn is_finite(&self) -> bool {
        self.re.iter().chain(self.im.iter()).all(|v| v.is_finite())
    }
}

/// Outcome of one system-level step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// Tick value after the increment.
    pub tick: u64,
    /// Layers that integrated this tick, ascending.
    pub fired: Vec<usize>,
}

impl StepReport {
    pub fn fired(&self, layer: usize) -> bool {
        self.fired.contains(&layer)
    }
}

/// Outcome of restoring a concatenated weight stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestoreReport {
    /// Layers whose memory was replaced.
    pub restored: Vec<usize>,
    /// Layers skipped because the encoded width differed.
    pub skipped: Vec<usize>,
}

impl RestoreReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magnitudes() {
        let s = LayerState::new(vec![3.0, 0.0], vec![4.0, 0.5]);
        let m = s.magnitudes();
        assert!((m[0] - 5.0).abs() < 1e-12);
        assert!((m[1] - 0.5).abs() < 1e-12);
        assert!((s.max_magnitude() - 5.0).abs() < 1e-12);
        assert!((s.mean_magnitude() - 2.75).abs() < 1e-12);
    }

    #[test]
    fn test_empty_state() {
        let s = LayerState::default();
        assert!(s.is_empty());
        assert_eq!(s.max_magnitude(), 0.0);
        assert_eq!(s.mean_magnitude(), 0.0);
    }

    #[test]
    fn test_is_finite() {
        let s = LayerState::new(vec![0.1], vec![f64::NAN]);
        assert!(!s.is_finite());
    }

    #[test]
    fn test_step_report_fired() {
        let r = StepReport {
            tick: 2,
            fired: vec![0, 1],
        };
        assert!(r.fired(1));
        assert!(!r.fired(2));
    }
}
