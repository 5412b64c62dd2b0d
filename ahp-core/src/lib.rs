/// ahp-core: Pure-computation Analytic Hierarchy Process engine.
///
/// Pairwise judgments → reciprocal comparison matrix → priority weights,
/// consistency ratio and ranking. Several experts' judgments can be pooled
/// into one group matrix (AIJ). Pure math: no IO, no storage.
///
/// Alternatives are identified by their index `0..n` in the caller's
/// alternative list; experts by caller-provided `i64` IDs.
///
/// # Quick start
///
/// ```rust
/// use ahp_core::{analyze, AnalysisOptions, Direction, Judgment, ScaleFamily};
///
/// let judgments = vec![
///     Judgment::new(0, 1, 3.0),
///     Judgment::new(0, 2, 5.0),
///     Judgment::from_grade(1, 2, 2, Direction::More, ScaleFamily::Integer),
/// ];
///
/// let result = analyze(3, &judgments, &AnalysisOptions::default()).unwrap();
///
/// for (idx, weight) in result.weights.iter().enumerate() {
///     println!("Alternative {}: {:.4} (rank {})", idx, weight, result.rankings[idx]);
/// }
/// println!("CR = {:.4}", result.consistency.cr);
/// assert!(result.consistency.is_consistent);
/// ```

pub mod aggregation;
pub mod analysis;
pub mod consistency;
pub mod constants;
pub mod error;
pub mod judgment;
pub mod matrix;
pub mod priority;
pub mod ranking;
pub mod scale;
pub mod types;

// Re-export primary public API at crate root.
pub use aggregation::{
    aggregate, aggregate_aij, aggregate_judgment_sets, AggregationMethod, CollaborationStatus,
};
pub use analysis::{analyze, AnalysisOptions};
pub use consistency::{check_consistency, consistency_from_eigenvalue, random_index};
pub use error::{AhpError, Result};
pub use judgment::{required_judgments, Direction, Judgment, JudgmentSet};
pub use matrix::{build_matrix, build_matrix_with_policy, ComparisonMatrix, MissingJudgments};
pub use priority::{
    compute_weights, compute_weights_eigenvector, compute_weights_geometric_mean,
    principal_eigen, EigenNormalization, PrincipalEigen, WeightMethod,
};
pub use ranking::{rank, ranked_alternatives};
pub use scale::{
    gradation_labels, gradual_scale, proportional_widths, scale_value, scale_value_continuous,
    unify, ScaleFamily, ScaleTable,
};
pub use types::{
    AggregationResult, AnalysisResult, ConsistencyReport, ExpertResult, RankedAlternative,
};
