use crate::error::{Result, VarQiteError};
use faer::Mat;
use statevec::linalg::lstsq;

/// Solves (M + α·diag(M)) x = g in the least-squares sense.
///
/// The regularizer scales each diagonal entry by its own value rather than
/// adding α·I. Rank-deficient systems return the minimum-norm solution.
/// Non-finite input or output is reported as
/// [`VarQiteError::SingularMetricTensor`].
pub fn natural_gradient(gradient: &[f64], metric: &Mat<f64>, regularization: f64) -> Result<Vec<f64>> {
    let n = gradient.len();
    if metric.nrows() != n || metric.ncols() != n {
        return Err(VarQiteError::DimensionMismatch {
            expected: n,
            actual: metric.nrows().max(metric.ncols()),
        });
    }

    let mut a = Mat::<f64>::zeros(n, n);
    for i in 0..n {
        for j in 0..n {
            let v = metric.read(i, j);
            if !v.is_finite() {
                return Err(VarQiteError::SingularMetricTensor {
                    reason: format!("non-finite entry at ({}, {})", i, j),
                });
            }
            a.write(i, j, if i == j { v + regularization * v } else { v });
        }
    }
    if let Some(k) = gradient.iter().position(|g| !g.is_finite()) {
        return Err(VarQiteError::SingularMetricTensor {
            reason: format!("non-finite gradient component {}", k),
        });
    }

    let x = lstsq(&a, gradient).map_err(|e| VarQiteError::SingularMetricTensor {
        reason: e.to_string(),
    })?;
    if x.iter().any(|v| !v.is_finite()) {
        return Err(VarQiteError::SingularMetricTensor {
            reason: "least-squares solution is not finite".to_string(),
        });
    }
    Ok(x)
}
