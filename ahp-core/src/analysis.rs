/// Single-judge pipeline: judgments → matrix → weights → consistency → ranking.
use crate::consistency::check_consistency;
use crate::error::Result;
use crate::judgment::Judgment;
use crate::matrix::{build_matrix_with_policy, MissingJudgments};
use crate::priority::{compute_weights, WeightMethod};
use crate::ranking::rank;
use crate::types::AnalysisResult;

/// Options for `analyze()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnalysisOptions {
    pub method: WeightMethod,
    pub missing: MissingJudgments,
}

/// Run the full single-judge analysis over `n` alternatives.
pub fn analyze(n: usize, judgments: &[Judgment], options: &AnalysisOptions) -> Result<AnalysisResult> {
    let matrix = build_matrix_with_policy(n, judgments, options.missing)?;
    let weights = compute_weights(&matrix, options.method)?;
    let consistency = check_consistency(&matrix, &weights)?;
    let rankings = rank(&weights);

    tracing::debug!(
        n,
        judgments = judgments.len(),
        method = %options.method,
        cr = consistency.cr,
        "analysis complete"
    );

    Ok(AnalysisResult {
        matrix,
        weights,
        rankings,
        consistency,
    })
}
