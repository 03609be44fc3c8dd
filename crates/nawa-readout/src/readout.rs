// ─────────────────────────────────────────────────────────────────────
// Nawa — Ridge Readout
// ─────────────────────────────────────────────────────────────────────
//! Linear map from layer features to targets, fitted in closed form:
//!
//!   W = (XᵀX + αI)⁺ XᵀY
//!
//! The left-hand side is symmetric positive semi-definite, so the
//! pseudo-inverse through its eigendecomposition also covers α = 0 with
//! collinear features.

use serde::{Deserialize, Serialize};

use nawa_types::{NawaError, NawaResult};

use crate::linalg::solve_symmetric_pinv;

/// Eigenvalues at or below this fraction of the largest are treated as zero.
const PINV_RCOND: f64 = 1e-12;

/// Ridge strength used by `with_defaults`.
pub const DEFAULT_ALPHA: f64 = 1.0;

/// Ridge-regression readout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RidgeReadout {
    pub input_dim: usize,
    pub output_dim: usize,
    pub alpha: f64,
    /// input_dim × output_dim row-major; `None` until fitted.
    weights: Option<Vec<f64>>,
}

impl RidgeReadout {
    pub fn new(input_dim: usize, output_dim: usize, alpha: f64) -> NawaResult<Self> {
        check_alpha(alpha)?;
        Ok(Self {
            input_dim,
            output_dim,
            alpha,
            weights: None,
        })
    }

    /// Unfitted readout with `alpha = DEFAULT_ALPHA`.
    pub fn with_defaults(input_dim: usize, output_dim: usize) -> Self {
        Self {
            input_dim,
            output_dim,
            alpha: DEFAULT_ALPHA,
            weights: None,
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.weights.is_some()
    }

    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    /// Fit on rows of `x` (input_dim wide) against rows of `y`
    /// (output_dim wide).
    pub fn fit(&mut self, x: &[Vec<f64>], y: &[Vec<f64>]) -> NawaResult<()> {
        if x.is_empty() {
            return Err(NawaError::Readout("no training samples".to_string()));
        }
        if x.len() != y.len() {
            return Err(NawaError::Dimension {
                expected: x.len(),
                got: y.len(),
            });
        }
        check_rows(x, self.input_dim)?;
        check_rows(y, self.output_dim)?;

        let (d, o) = (self.input_dim, self.output_dim);
        let mut a = vec![0.0; d * d];
        let mut b = vec![0.0; d * o];
        for (xr, yr) in x.iter().zip(y.iter()) {
            for i in 0..d {
                let xi = xr[i];
                if xi == 0.0 {
                    continue;
                }
                for j in 0..d {
                    a[i * d + j] += xi * xr[j];
                }
                for k in 0..o {
                    b[i * o + k] += xi * yr[k];
                }
            }
        }
        for i in 0..d {
            a[i * d + i] += self.alpha;
        }

        let w = solve_symmetric_pinv(&a, d, &b, o, PINV_RCOND)?;
        if w.iter().any(|v| !v.is_finite()) {
            return Err(NawaError::Numerical(
                "readout solve produced non-finite weights".to_string(),
            ));
        }
        log::info!("readout fitted: {} samples, {d} → {o}, alpha {}", x.len(), self.alpha);
        self.weights = Some(w);
        Ok(())
    }

    /// Map one feature row to an output row.
    pub fn predict(&self, row: &[f64]) -> NawaResult<Vec<f64>> {
        let w = self
            .weights
            .as_ref()
            .ok_or_else(|| NawaError::Readout("readout has not been fitted".to_string()))?;
        if row.len() != self.input_dim {
            return Err(NawaError::Dimension {
                expected: self.input_dim,
                got: row.len(),
            });
        }
        let o = self.output_dim;
        let mut out = vec![0.0; o];
        for (i, &xi) in row.iter().enumerate() {
            for (k, slot) in out.iter_mut().enumerate() {
                *slot += xi * w[i * o + k];
            }
        }
        Ok(out)
    }

    pub fn predict_batch(&self, rows: &[Vec<f64>]) -> NawaResult<Vec<Vec<f64>>> {
        rows.iter().map(|r| self.predict(r)).collect()
    }

    pub fn to_json(&self) -> NawaResult<String> {
        serde_json::to_string(self)
            .map_err(|e| NawaError::Readout(format!("JSON encode error: {e}")))
    }

    /// Load a readout stored with `to_json`, checking alpha and the
    /// weight shape.
    pub fn from_json(json: &str) -> NawaResult<Self> {
        let readout: Self = serde_json::from_str(json)
            .map_err(|e| NawaError::Readout(format!("JSON parse error: {e}")))?;
        check_alpha(readout.alpha)?;
        if let Some(w) = &readout.weights {
            let expected = readout
                .input_dim
                .checked_mul(readout.output_dim)
                .ok_or_else(|| NawaError::Readout("weight shape overflows".to_string()))?;
            if w.len() != expected {
                return Err(NawaError::Dimension {
                    expected,
                    got: w.len(),
                });
            }
        }
        Ok(readout)
    }
}

fn check_alpha(alpha: f64) -> NawaResult<()> {
    if !alpha.is_finite() || alpha < 0.0 {
        return Err(NawaError::Config(format!(
            "alpha must be finite and >= 0, got {alpha}"
        )));
    }
    Ok(())
}

fn check_rows(rows: &[Vec<f64>], width: usize) -> NawaResult<()> {
    for row in rows {
        if row.len() != width {
            return Err(NawaError::Dimension {
                expected: width,
                got: row.len(),
            });
        }
        if row.iter().any(|v| !v.is_finite()) {
            return Err(NawaError::Numerical(
                "training data contains NaN or Inf".to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureCollector;
    use nawa_engine::{NawaConfig, System};

    fn linear_data() -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
        let x: Vec<Vec<f64>> = (0..20)
            .map(|t| {
                let t = t as f64;
                vec![(t * 0.3).sin(), (t * 0.7).cos(), 1.0]
            })
            .collect();
        let y = x
            .iter()
            .map(|r| vec![2.0 * r[0] - r[1] + 0.5 * r[2]])
            .collect();
        (x, y)
    }

    #[test]
    fn test_negative_alpha_rejected() {
        assert!(matches!(
            RidgeReadout::new(2, 1, -1.0),
            Err(NawaError::Config(_))
        ));
    }

    #[test]
    fn test_recovers_linear_map() {
        let (x, y) = linear_data();
        let mut r = RidgeReadout::new(3, 1, 1e-9).unwrap();
        r.fit(&x, &y).unwrap();
        let w = r.weights().unwrap();
        assert!((w[0] - 2.0).abs() < 1e-6);
        assert!((w[1] + 1.0).abs() < 1e-6);
        assert!((w[2] - 0.5).abs() < 1e-6);
        let pred = r.predict(&x[3]).unwrap();
        assert!((pred[0] - y[3][0]).abs() < 1e-6);
    }

    #[test]
    fn test_alpha_shrinks_weights() {
        let (x, y) = linear_data();
        let mut loose = RidgeReadout::new(3, 1, 1e-6).unwrap();
        let mut tight = RidgeReadout::new(3, 1, 100.0).unwrap();
        loose.fit(&x, &y).unwrap();
        tight.fit(&x, &y).unwrap();
        let norm = |w: &[f64]| w.iter().map(|v| v * v).sum::<f64>();
        assert!(norm(tight.weights().unwrap()) < norm(loose.weights().unwrap()));
    }

    #[test]
    fn test_collinear_features_zero_alpha() {
        // Second column duplicates the first: XᵀX is singular.
        let x: Vec<Vec<f64>> = (1..6).map(|t| vec![t as f64, t as f64]).collect();
        let y: Vec<Vec<f64>> = (1..6).map(|t| vec![4.0 * t as f64]).collect();
        let mut r = RidgeReadout::new(2, 1, 0.0).unwrap();
        r.fit(&x, &y).unwrap();
        let w = r.weights().unwrap();
        assert!((w[0] - 2.0).abs() < 1e-8);
        assert!((w[1] - 2.0).abs() < 1e-8);
    }

    #[test]
    fn test_predict_before_fit() {
        let r = RidgeReadout::new(2, 1, 1.0).unwrap();
        assert!(matches!(r.predict(&[0.0, 0.0]), Err(NawaError::Readout(_))));
    }

    #[test]
    fn test_shape_errors() {
        let mut r = RidgeReadout::new(2, 1, 1.0).unwrap();
        assert!(matches!(r.fit(&[], &[]), Err(NawaError::Readout(_))));
        assert!(matches!(
            r.fit(&[vec![1.0, 2.0]], &[vec![1.0], vec![2.0]]),
            Err(NawaError::Dimension { .. })
        ));
        assert!(matches!(
            r.fit(&[vec![1.0, 2.0, 3.0]], &[vec![1.0]]),
            Err(NawaError::Dimension { expected: 2, got: 3 })
        ));
        assert!(matches!(
            r.fit(&[vec![1.0, f64::NAN]], &[vec![1.0]]),
            Err(NawaError::Numerical(_))
        ));
        r.fit(&[vec![1.0, 2.0]], &[vec![1.0]]).unwrap();
        assert!(matches!(
            r.predict(&[1.0]),
            Err(NawaError::Dimension { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let (x, y) = linear_data();
        let mut r = RidgeReadout::new(3, 1, 0.1).unwrap();
        r.fit(&x, &y).unwrap();
        let back = RidgeReadout::from_json(&r.to_json().unwrap()).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn test_small_scale_features_solved_exactly() {
        let x: Vec<Vec<f64>> = (1..11).map(|t| vec![t as f64 * 1e-7]).collect();
        let y: Vec<Vec<f64>> = x.iter().map(|r| vec![3.0 * r[0]]).collect();
        let mut r = RidgeReadout::new(1, 1, 0.0).unwrap();
        r.fit(&x, &y).unwrap();
        let w = r.weights().unwrap();
        assert!((w[0] - 3.0).abs() < 1e-9, "w = {}", w[0]);
    }

    #[test]
    fn test_with_defaults_alpha() {
        let r = RidgeReadout::with_defaults(3, 2);
        assert_eq!(r.alpha, DEFAULT_ALPHA);
        assert!(!r.is_fitted());
    }

    #[test]
    fn test_json_bad_alpha_rejected() {
        let json = r#"{"input_dim":1,"output_dim":1,"alpha":-2.0,"weights":null}"#;
        assert!(matches!(
            RidgeReadout::from_json(json),
            Err(NawaError::Config(_))
        ));
    }

    #[test]
    fn test_json_bad_shape_rejected() {
        let json = r#"{"input_dim":2,"output_dim":2,"alpha":1.0,"weights":[1.0,2.0]}"#;
        assert!(matches!(
            RidgeReadout::from_json(json),
            Err(NawaError::Dimension { expected: 4, got: 2 })
        ));
    }

    #[test]
    fn test_fit_on_system_features() {
        let mut sys = System::new(NawaConfig {
            dim: 4,
            n_layers: 3,
            ..NawaConfig::default()
        })
        .unwrap();
        let collector = FeatureCollector::new(vec![0, 2]);
        let inputs: Vec<(Vec<f64>, Vec<f64>)> = (0..40)
            .map(|t| {
                let p = t as f64 * 0.25;
                (vec![p.sin(); 4], vec![p.cos(); 4])
            })
            .collect();
        let rows = collector.collect(&mut sys, &inputs);
        let targets: Vec<Vec<f64>> = inputs.iter().map(|(re, _)| vec![re[0]]).collect();

        let width = collector.feature_len(&sys);
        let mut r = RidgeReadout::new(width, 1, 1e-3).unwrap();
        r.fit(&rows, &targets).unwrap();
        let preds = r.predict_batch(&rows).unwrap();
        assert_eq!(preds.len(), 40);
        assert!(preds.iter().all(|p| p.len() == 1 && p[0].is_finite()));
    }
}
