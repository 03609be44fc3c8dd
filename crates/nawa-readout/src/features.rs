// ─────────────────────────────────────────────────────────────────────
// Nawa — Layer Features
// ─────────────────────────────────────────────────────────────────────
//! Flatten selected layer states into real feature rows.

use nawa_engine::System;

/// Concatenate `[re_k, im_k]` for each listed layer, in order.
///
/// Out-of-range layers contribute nothing.
pub fn layer_features(system: &System, layers: &[usize]) -> Vec<f64> {
    let mut row = Vec::with_capacity(layers.len() * 2 * system.dim());
    for &k in layers {
        let state = system.layer_state(k);
        row.extend_from_slice(&state.re);
        row.extend_from_slice(&state.im);
    }
    row
}

/// Drives a system over an input sequence, recording one feature row
/// per step.
#[derive(Debug, Clone)]
pub struct FeatureCollector {
    layers: Vec<usize>,
}

impl FeatureCollector {
    pub fn new(layers: Vec<usize>) -> Self {
        Self { layers }
    }

    pub fn layers(&self) -> &[usize] {
        &self.layers
    }

    /// Width of a feature row for `system` (only in-range layers count).
    pub fn feature_len(&self, system: &System) -> usize {
        let valid = self
            .layers
            .iter()
            .filter(|&&k| k < system.n_layers())
            .count();
        valid * 2 * system.dim()
    }

    /// Current features without stepping.
    pub fn snapshot(&self, system: &System) -> Vec<f64> {
        layer_features(system, &self.layers)
    }

    /// Step `system` once per `(re, im)` input and return the feature
    /// row observed after each step.
    pub fn collect(&self, system: &mut System, inputs: &[(Vec<f64>, Vec<f64>)]) -> Vec<Vec<f64>> {
        inputs
            .iter()
            .map(|(re, im)| {
                system.step(re, im);
                self.snapshot(system)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nawa_engine::NawaConfig;

    fn system() -> System {
        System::new(NawaConfig {
            dim: 3,
            n_layers: 5,
            ..NawaConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_feature_layout() {
        let mut sys = system();
        sys.step(&[0.5, 0.1, -0.2], &[0.2, 0.0, 0.3]);
        let row = layer_features(&sys, &[0, 4]);
        assert_eq!(row.len(), 12);
        let s0 = sys.layer_state(0);
        assert_eq!(&row[..3], s0.re.as_slice());
        assert_eq!(&row[3..6], s0.im.as_slice());
        // layer 4 has not fired yet
        assert!(row[6..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_out_of_range_layer_skipped() {
        let sys = system();
        let collector = FeatureCollector::new(vec![1, 9]);
        assert_eq!(collector.feature_len(&sys), 6);
        assert_eq!(collector.snapshot(&sys).len(), 6);
    }

    #[test]
    fn test_collect_rows_per_step() {
        let mut sys = system();
        let collector = FeatureCollector::new(vec![0, 1]);
        let inputs: Vec<(Vec<f64>, Vec<f64>)> = (0..5)
            .map(|t| (vec![0.1 * t as f64; 3], vec![0.0; 3]))
            .collect();
        let rows = collector.collect(&mut sys, &inputs);
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| r.len() == 12));
        assert_eq!(sys.tick(), 5);
        assert_eq!(rows[4], collector.snapshot(&sys));
    }
}
