/// Priority weights from a comparison matrix.
///
/// Two interchangeable strategies: the principal eigenvector (Saaty's method,
/// the default) and the row geometric mean (decomposition-free). The
/// eigenvector itself can be normalised two ways; both are named explicitly so
/// the caller chooses rather than inheriting a silent default.
use std::fmt;
use std::str::FromStr;

use nalgebra::{DMatrix, DVector};

use crate::constants::{DECOMPOSITION_EPSILON, DECOMPOSITION_MAX_ITERATIONS};
use crate::error::{AhpError, Result};
use crate::matrix::ComparisonMatrix;

/// How the real part of the principal eigenvector is turned into weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum EigenNormalization {
    /// Absolute values, then divide by their sum. Immune to the solver
    /// returning the vector with flipped sign.
    #[default]
    AbsoluteSum,
    /// Divide by the signed sum. Fails if the result has a negative entry,
    /// which only happens when the eigenvector has mixed signs.
    PlainSum,
}

impl fmt::Display for EigenNormalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EigenNormalization::AbsoluteSum => f.write_str("absolute"),
            EigenNormalization::PlainSum => f.write_str("plain"),
        }
    }
}

impl FromStr for EigenNormalization {
    type Err = AhpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "absolute" | "absolute-sum" | "abs" => Ok(EigenNormalization::AbsoluteSum),
            "plain" | "plain-sum" | "sum" => Ok(EigenNormalization::PlainSum),
            _ => Err(AhpError::invalid(format!(
                "unknown normalization \"{s}\" (expected absolute or plain)"
            ))),
        }
    }
}

/// Weight-derivation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightMethod {
    Eigenvector(EigenNormalization),
    GeometricMean,
}

impl Default for WeightMethod {
    fn default() -> Self {
        WeightMethod::Eigenvector(EigenNormalization::default())
    }
}

impl fmt::Display for WeightMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightMethod::Eigenvector(norm) => write!(f, "eigenvector ({norm} sum)"),
            WeightMethod::GeometricMean => f.write_str("geometric mean"),
        }
    }
}

impl FromStr for WeightMethod {
    type Err = AhpError;

    /// Parses the method name only; the eigenvector variant gets the default
    /// normalization.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "eigenvector" | "eigen" => Ok(WeightMethod::default()),
            "geometric-mean" | "geometric" | "gm" => Ok(WeightMethod::GeometricMean),
            _ => Err(AhpError::invalid(format!(
                "unknown weight method \"{s}\" (expected eigenvector or geometric-mean)"
            ))),
        }
    }
}

/// Principal eigenvalue and the real part of its (unnormalised) eigenvector.
#[derive(Debug, Clone, PartialEq)]
pub struct PrincipalEigen {
    pub lambda_max: f64,
    pub vector: Vec<f64>,
}

/// Find the eigenvalue with the largest real part and its eigenvector.
///
/// Eigenvalues come from the real Schur form; imaginary parts are discarded
/// (slightly inconsistent matrices produce small complex pairs). The
/// eigenvector is the right singular vector of `M - lambda_max * I` with the
/// smallest singular value, i.e. the null-space direction.
pub fn principal_eigen(matrix: &ComparisonMatrix) -> Result<PrincipalEigen> {
    let n = matrix.size();
    if n == 1 {
        return Ok(PrincipalEigen {
            lambda_max: 1.0,
            vector: vec![1.0],
        });
    }

    let a: &DMatrix<f64> = matrix.as_dmatrix();

    let schur = a
        .clone()
        .try_schur(DECOMPOSITION_EPSILON, DECOMPOSITION_MAX_ITERATIONS)
        .ok_or_else(|| AhpError::Numeric("Schur decomposition did not converge".to_string()))?;

    let lambda_max = schur
        .complex_eigenvalues()
        .iter()
        .map(|c| c.re)
        .fold(f64::NEG_INFINITY, f64::max);

    if !lambda_max.is_finite() {
        return Err(AhpError::Numeric(format!(
            "principal eigenvalue is not finite ({lambda_max})"
        )));
    }

    let shifted = a - DMatrix::<f64>::identity(n, n) * lambda_max;
    let svd = shifted
        .try_svd(false, true, DECOMPOSITION_EPSILON, DECOMPOSITION_MAX_ITERATIONS)
        .ok_or_else(|| AhpError::Numeric("SVD did not converge".to_string()))?;
    let v_t = svd
        .v_t
        .ok_or_else(|| AhpError::Numeric("SVD returned no right singular vectors".to_string()))?;

    let null_idx = svd.singular_values.imin();
    let vector: Vec<f64> = v_t.row(null_idx).iter().copied().collect();

    tracing::debug!(
        n,
        lambda_max,
        residual = svd.singular_values[null_idx],
        "principal eigenpair"
    );

    Ok(PrincipalEigen { lambda_max, vector })
}

/// Turn a raw eigenvector into a weight vector that sums to 1.
pub fn normalize_eigenvector(vector: &[f64], normalization: EigenNormalization) -> Result<Vec<f64>> {
    match normalization {
        EigenNormalization::AbsoluteSum => {
            let abs: Vec<f64> = vector.iter().map(|v| v.abs()).collect();
            let total: f64 = abs.iter().sum();
            if !(total > 0.0) || !total.is_finite() {
                return Err(AhpError::Numeric(format!(
                    "eigenvector has no usable magnitude (sum = {total})"
                )));
            }
            Ok(abs.iter().map(|v| v / total).collect())
        }
        EigenNormalization::PlainSum => {
            let total: f64 = vector.iter().sum();
            if total == 0.0 || !total.is_finite() {
                return Err(AhpError::Numeric(format!(
                    "eigenvector components cancel out (sum = {total})"
                )));
            }
            let weights: Vec<f64> = vector.iter().map(|v| v / total).collect();
            if let Some(i) = weights.iter().position(|w| *w < 0.0) {
                return Err(AhpError::Numeric(format!(
                    "eigenvector has mixed signs: weight {} is {}",
                    i, weights[i]
                )));
            }
            Ok(weights)
        }
    }
}

/// Weights from the principal eigenvector.
pub fn compute_weights_eigenvector(
    matrix: &ComparisonMatrix,
    normalization: EigenNormalization,
) -> Result<Vec<f64>> {
    let eigen = principal_eigen(matrix)?;
    normalize_eigenvector(&eigen.vector, normalization)
}

/// Weights from the normalised geometric mean of each row,
/// `w_i = (prod_j M[i][j])^(1/n)`. Computed in log space.
pub fn compute_weights_geometric_mean(matrix: &ComparisonMatrix) -> Vec<f64> {
    let a = matrix.as_dmatrix();
    let n = a.ncols() as f64;

    let means = DVector::from_iterator(
        a.nrows(),
        a.row_iter()
            .map(|row| (row.iter().map(|v| v.ln()).sum::<f64>() / n).exp()),
    );
    let total = means.sum();

    means.iter().map(|m| m / total).collect()
}

/// Dispatch to the selected weight method.
pub fn compute_weights(matrix: &ComparisonMatrix, method: WeightMethod) -> Result<Vec<f64>> {
    match method {
        WeightMethod::Eigenvector(normalization) => compute_weights_eigenvector(matrix, normalization),
        WeightMethod::GeometricMean => Ok(compute_weights_geometric_mean(matrix)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judgment::Judgment;
    use crate::matrix::build_matrix;
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    fn example_matrix() -> ComparisonMatrix {
        build_matrix(
            3,
            &[
                Judgment::new(0, 1, 3.0),
                Judgment::new(0, 2, 5.0),
                Judgment::new(1, 2, 2.0),
            ],
        )
        .unwrap()
    }

    /// Matrix of exact ratios `w_i / w_j`.
    fn consistent_matrix(weights: &[f64]) -> ComparisonMatrix {
        let rows = weights
            .iter()
            .map(|wi| weights.iter().map(|wj| wi / wj).collect())
            .collect();
        ComparisonMatrix::from_rows(rows).unwrap()
    }

    fn assert_normalized(weights: &[f64]) {
        let total: f64 = weights.iter().sum();
        assert!((total - 1.0).abs() < 1e-9, "weights sum to {total}");
        assert!(weights.iter().all(|w| *w >= 0.0), "negative weight in {weights:?}");
    }

    #[test]
    fn test_known_example_eigenvector() {
        let m = example_matrix();
        let eigen = principal_eigen(&m).unwrap();
        assert!((eigen.lambda_max - 3.0037).abs() < 1e-3, "lambda_max = {}", eigen.lambda_max);

        for normalization in [EigenNormalization::AbsoluteSum, EigenNormalization::PlainSum] {
            let w = compute_weights_eigenvector(&m, normalization).unwrap();
            assert_normalized(&w);
            assert!((w[0] - 0.648).abs() < 1e-3, "{w:?}");
            assert!((w[1] - 0.230).abs() < 1e-3, "{w:?}");
            assert!((w[2] - 0.122).abs() < 1e-3, "{w:?}");
        }
    }

    #[test]
    fn test_known_example_geometric_mean() {
        let w = compute_weights_geometric_mean(&example_matrix());
        assert_normalized(&w);
        // Row products 15, 2/3, 1/10 -> cube roots, normalised.
        let raw = [15f64.cbrt(), (2.0f64 / 3.0).cbrt(), 0.1f64.cbrt()];
        let total: f64 = raw.iter().sum();
        for i in 0..3 {
            assert!((w[i] - raw[i] / total).abs() < 1e-12);
        }
    }

    #[test]
    fn test_single_alternative() {
        let m = ComparisonMatrix::identity(1);
        let eigen = principal_eigen(&m).unwrap();
        assert_eq!(eigen.lambda_max, 1.0);
        assert_eq!(compute_weights_eigenvector(&m, EigenNormalization::PlainSum).unwrap(), vec![1.0]);
        assert_eq!(compute_weights_geometric_mean(&m), vec![1.0]);
    }

    #[test]
    fn test_all_ones_matrix_gives_equal_weights() {
        let m = ComparisonMatrix::identity(4);
        let eigen = principal_eigen(&m).unwrap();
        assert!((eigen.lambda_max - 4.0).abs() < 1e-9);
        let w = compute_weights_eigenvector(&m, EigenNormalization::AbsoluteSum).unwrap();
        assert!(w.iter().all(|x| (x - 0.25).abs() < 1e-9), "{w:?}");
    }

    #[test]
    fn test_consistent_matrices_recover_true_weights() {
        let mut rng = SmallRng::seed_from_u64(7);
        for n in 2..=9 {
            let raw: Vec<f64> = (0..n).map(|_| rng.random_range(0.5..9.0)).collect();
            let total: f64 = raw.iter().sum();
            let truth: Vec<f64> = raw.iter().map(|w| w / total).collect();
            let m = consistent_matrix(&truth);

            let eigen = principal_eigen(&m).unwrap();
            assert!((eigen.lambda_max - n as f64).abs() < 1e-8, "n = {n}: {}", eigen.lambda_max);

            for method in [
                WeightMethod::Eigenvector(EigenNormalization::AbsoluteSum),
                WeightMethod::Eigenvector(EigenNormalization::PlainSum),
                WeightMethod::GeometricMean,
            ] {
                let w = compute_weights(&m, method).unwrap();
                assert_normalized(&w);
                for i in 0..n {
                    assert!((w[i] - truth[i]).abs() < 1e-8, "{method}: {w:?} vs {truth:?}");
                }
            }
        }
    }

    #[test]
    fn test_perturbed_matrices_stay_normalized() {
        let mut rng = SmallRng::seed_from_u64(2024);
        for _ in 0..25 {
            let n = rng.random_range(3..=8);
            let mut judgments = Vec::new();
            for i in 0..n {
                for j in (i + 1)..n {
                    let grade: f64 = rng.random_range(1.0..9.0);
                    let value = if rng.random::<bool>() { grade } else { 1.0 / grade };
                    judgments.push(Judgment::new(i, j, value));
                }
            }
            let m = build_matrix(n, &judgments).unwrap();
            let eigen = principal_eigen(&m).unwrap();
            // Perron root of a positive reciprocal matrix is at least n.
            assert!(eigen.lambda_max >= n as f64 - 1e-9);

            assert_normalized(&compute_weights_eigenvector(&m, EigenNormalization::AbsoluteSum).unwrap());
            assert_normalized(&compute_weights_geometric_mean(&m));
        }
    }

    #[test]
    fn test_plain_sum_rejects_mixed_signs() {
        let err = normalize_eigenvector(&[0.8, -0.1, 0.3], EigenNormalization::PlainSum).unwrap_err();
        assert!(matches!(err, AhpError::Numeric(_)));

        let w = normalize_eigenvector(&[0.8, -0.1, 0.3], EigenNormalization::AbsoluteSum).unwrap();
        assert!((w[1] - 0.1 / 1.2).abs() < 1e-12);

        // A fully negated vector is fine either way.
        let w = normalize_eigenvector(&[-0.5, -0.5], EigenNormalization::PlainSum).unwrap();
        assert_eq!(w, vec![0.5, 0.5]);

        assert!(normalize_eigenvector(&[0.0, 0.0], EigenNormalization::AbsoluteSum).is_err());
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("eigenvector".parse::<WeightMethod>().unwrap(), WeightMethod::default());
        assert_eq!("Geometric_Mean".parse::<WeightMethod>().unwrap(), WeightMethod::GeometricMean);
        assert!("median".parse::<WeightMethod>().is_err());
        assert_eq!("plain".parse::<EigenNormalization>().unwrap(), EigenNormalization::PlainSum);
        assert_eq!("ABS".parse::<EigenNormalization>().unwrap(), EigenNormalization::AbsoluteSum);
    }
}
