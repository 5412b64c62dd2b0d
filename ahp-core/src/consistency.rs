/// Saaty's consistency test: lambda_max, CI, CR and a pass/fail verdict.
use nalgebra::DVector;

use crate::constants::{CONSISTENCY_THRESHOLD, RANDOM_INDEX, RANDOM_INDEX_FALLBACK};
use crate::error::{AhpError, Result};
use crate::matrix::ComparisonMatrix;
use crate::types::ConsistencyReport;

/// Random Index for an n×n matrix.
pub fn random_index(n: usize) -> f64 {
    if (1..=RANDOM_INDEX.len()).contains(&n) {
        RANDOM_INDEX[n - 1]
    } else {
        RANDOM_INDEX_FALLBACK
    }
}

/// Build the report from a known principal eigenvalue.
pub fn consistency_from_eigenvalue(n: usize, lambda_max: f64) -> ConsistencyReport {
    let ci = if n > 1 {
        (lambda_max - n as f64) / (n as f64 - 1.0)
    } else {
        0.0
    };

    let ri = random_index(n);
    let cr = if ri > 0.0 { ci / ri } else { 0.0 };
    let is_consistent = cr <= CONSISTENCY_THRESHOLD;

    ConsistencyReport {
        lambda_max,
        ci,
        cr,
        is_consistent,
        recommendations: recommendations(cr, is_consistent),
    }
}

fn recommendations(cr: f64, is_consistent: bool) -> Vec<String> {
    if is_consistent {
        vec![format!(
            "Judgments are consistent (CR = {cr:.4} ≤ {CONSISTENCY_THRESHOLD:.2})"
        )]
    } else {
        vec![
            format!("Judgments are inconsistent (CR = {cr:.4} > {CONSISTENCY_THRESHOLD:.2})"),
            "Consider reviewing your pairwise comparisons".to_string(),
            "Look for contradictory judgments".to_string(),
        ]
    }
}

/// Check the consistency of a matrix against a weight vector.
///
/// `lambda_max` is estimated as the mean of `(M w)_i / w_i`, which equals the
/// principal eigenvalue when `w` is the principal eigenvector and gives the
/// usual estimate for geometric-mean weights. Alternatives with zero weight
/// are left out of the mean.
pub fn check_consistency(matrix: &ComparisonMatrix, weights: &[f64]) -> Result<ConsistencyReport> {
    let n = matrix.size();
    if weights.len() != n {
        return Err(AhpError::invalid(format!(
            "weight vector has {} entries for a {}x{} matrix",
            weights.len(),
            n,
            n
        )));
    }
    if n == 1 {
        return Ok(consistency_from_eigenvalue(1, 1.0));
    }

    let w = DVector::from_column_slice(weights);
    let weighted = matrix.as_dmatrix() * &w;

    let ratios: Vec<f64> = weighted
        .iter()
        .zip(w.iter())
        .filter(|(_, wi)| **wi > 0.0)
        .map(|(aw, wi)| aw / wi)
        .collect();

    if ratios.is_empty() {
        return Err(AhpError::Numeric("weight vector has no positive entries".to_string()));
    }

    let lambda_max = ratios.iter().sum::<f64>() / ratios.len() as f64;
    let report = consistency_from_eigenvalue(n, lambda_max);

    tracing::debug!(
        n,
        lambda_max = report.lambda_max,
        ci = report.ci,
        cr = report.cr,
        consistent = report.is_consistent,
        "consistency check"
    );

    Ok(report)
}
