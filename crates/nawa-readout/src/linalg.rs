// ─────────────────────────────────────────────────────────────────────
// Nawa — Symmetric Linear Algebra
// ─────────────────────────────────────────────────────────────────────
//! Pure-Rust cyclic Jacobi eigensolver for symmetric matrices, and the
//! pseudo-inverse solve built on it. Matrices are row-major `Vec<f64>`.

use nawa_types::{NawaError, NawaResult};

/// Eigenpairs of a symmetric matrix.
#[derive(Debug, Clone)]
pub struct SymmetricEigen {
    pub n: usize,
    /// Eigenvalues, ascending.
    pub values: Vec<f64>,
    /// n×n row-major, column k is the eigenvector of `values[k]`.
    pub vectors: Vec<f64>,
}

/// Eigendecomposition of the symmetric n×n matrix `a`.
///
/// Converges in a handful of sweeps for the feature widths used here
/// (a few hundred); cost is O(n³) per sweep. Convergence is judged
/// relative to the largest entry, so tiny-scale matrices are still
/// diagonalised.
pub fn symmetric_eigen(a: &[f64], n: usize) -> NawaResult<SymmetricEigen> {
    const MAX_SWEEPS: usize = 60;
    const TOL: f64 = 1e-14;

    check_len("matrix", a.len(), square(n)?)?;
    if a.iter().any(|x| !x.is_finite()) {
        return Err(NawaError::Numerical(
            "matrix contains NaN or Inf".to_string(),
        ));
    }

    let mut m = a.to_vec();
    let mut v = vec![0.0; n * n];
    for i in 0..n {
        v[i * n + i] = 1.0;
    }
    let scale = m.iter().fold(0.0f64, |acc, x| acc.max(x.abs()));

    for sweep in 0..MAX_SWEEPS {
        let mut max_off = 0.0f64;
        for p in 0..n {
            for q in (p + 1)..n {
                max_off = max_off.max(m[p * n + q].abs());
            }
        }
        if max_off <= TOL * scale {
            break;
        }

        // Skip tiny rotations during the first sweeps.
        let threshold = if sweep < 4 {
            0.2 * max_off / (n * n) as f64
        } else {
            0.0
        };

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = m[p * n + q];
                if apq.abs() <= threshold {
                    continue;
                }
                let diff = m[q * n + q] - m[p * n + p];
                let t = if diff.abs() < 1e-300 {
                    apq.signum()
                } else {
                    let theta = diff / (2.0 * apq);
                    theta.signum() / (theta.abs() + (1.0 + theta * theta).sqrt())
                };
                let c = 1.0 / (1.0 + t * t).sqrt();
                let s = t * c;
                let tau = s / (1.0 + c);

                m[p * n + p] -= t * apq;
                m[q * n + q] += t * apq;
                m[p * n + q] = 0.0;
                m[q * n + p] = 0.0;

                for r in 0..n {
                    if r != p && r != q {
                        let arp = m[r * n + p];
                        let arq = m[r * n + q];
                        m[r * n + p] = arp - s * (arq + tau * arp);
                        m[p * n + r] = m[r * n + p];
                        m[r * n + q] = arq + s * (arp - tau * arq);
                        m[q * n + r] = m[r * n + q];
                    }
                    let vrp = v[r * n + p];
                    let vrq = v[r * n + q];
                    v[r * n + p] = vrp - s * (vrq + tau * vrp);
                    v[r * n + q] = vrq + s * (vrp - tau * vrq);
                }
            }
        }
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&x, &y| {
        m[x * n + x]
            .partial_cmp(&m[y * n + y])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let values = order.iter().map(|&k| m[k * n + k]).collect();
    let mut vectors = vec![0.0; n * n];
    for (new_col, &old_col) in order.iter().enumerate() {
        for row in 0..n {
            vectors[row * n + new_col] = v[row * n + old_col];
        }
    }

    Ok(SymmetricEigen { n, values, vectors })
}

/// Solve `A X = B` for symmetric n×n `A` and n×m `B` using the
/// pseudo-inverse `V Λ⁺ Vᵀ`.
///
/// Eigenvalues with `|λ| <= rcond · max|λ|` are dropped, so singular
/// systems yield the minimum-norm solution while well-conditioned ones
/// are solved exactly whatever their overall scale.
pub fn solve_symmetric_pinv(
    a: &[f64],
    n: usize,
    b: &[f64],
    m: usize,
    rcond: f64,
) -> NawaResult<Vec<f64>> {
    if !rcond.is_finite() || rcond < 0.0 {
        return Err(NawaError::Config(format!(
            "rcond must be finite and >= 0, got {rcond}"
        )));
    }
    let rhs_len = n
        .checked_mul(m)
        .ok_or_else(|| NawaError::Readout("right-hand side size overflow".to_string()))?;
    check_len("right-hand side", b.len(), rhs_len)?;

    let eig = symmetric_eigen(a, n)?;
    let v = &eig.vectors;
    let largest = eig.values.iter().fold(0.0f64, |acc, x| acc.max(x.abs()));
    let tol = rcond * largest;

    // C = Λ⁺ Vᵀ B   (n×m)
    let mut c = vec![0.0; n * m];
    for k in 0..n {
        let lambda = eig.values[k];
        if lambda == 0.0 || lambda.abs() <= tol {
            continue;
        }
        for col in 0..m {
            let mut dot = 0.0;
            for row in 0..n {
                dot += v[row * n + k] * b[row * m + col];
            }
            c[k * m + col] = dot / lambda;
        }
    }

    // X = V C
    let mut x = vec![0.0; n * m];
    for row in 0..n {
        for k in 0..n {
            let vrk = v[row * n + k];
            if vrk == 0.0 {
                continue;
            }
            for col in 0..m {
                x[row * m + col] += vrk * c[k * m + col];
            }
        }
    }
    Ok(x)
}

fn square(n: usize) -> NawaResult<usize> {
    n.checked_mul(n)
        .ok_or_else(|| NawaError::Readout(format!("matrix order {n} overflows")))
}

fn check_len(what: &str, got: usize, expected: usize) -> NawaResult<()> {
    if got != expected {
        log::debug!("{what}: expected {expected} entries, got {got}");
        return Err(NawaError::Dimension { expected, got });
    }
    Ok(())
}
