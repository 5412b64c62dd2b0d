use crate::matrix::ComparisonMatrix;

/// Saaty consistency measures for one matrix and its weight vector.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConsistencyReport {
    /// Principal eigenvalue (or its estimate from the weight vector).
    pub lambda_max: f64,
    /// Consistency Index, `(lambda_max - n) / (n - 1)`.
    pub ci: f64,
    /// Consistency Ratio, `CI / RI(n)`.
    pub cr: f64,
    /// `cr <= 0.10`.
    pub is_consistent: bool,
    pub recommendations: Vec<String>,
}

/// One alternative's place in a ranking.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankedAlternative {
    /// Index into the alternative set.
    pub index: usize,
    pub weight: f64,
    /// 1 = most preferred.
    pub rank: usize,
}

/// Single-judge result: matrix, priorities, ranking and consistency.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalysisResult {
    pub matrix: ComparisonMatrix,
    /// Index-aligned with the alternative set, sums to 1.
    pub weights: Vec<f64>,
    /// Index-aligned rank of each alternative.
    pub rankings: Vec<usize>,
    pub consistency: ConsistencyReport,
}

/// Priorities derived from one expert's own matrix, reported next to the
/// group result.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExpertResult {
    pub expert_id: i64,
    pub weights: Vec<f64>,
    pub lambda_max: f64,
    pub ci: f64,
    pub cr: f64,
}

/// Group result of aggregating several experts' judgments.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AggregationResult {
    pub method: crate::aggregation::AggregationMethod,
    pub aggregated_matrix: ComparisonMatrix,
    pub weights: Vec<f64>,
    pub rankings: Vec<usize>,
    pub lambda_max: f64,
    pub ci: f64,
    pub cr: f64,
    pub is_consistent: bool,
    pub num_experts: usize,
    /// Ascending.
    pub expert_ids: Vec<i64>,
    /// Per-expert breakdown, in `expert_ids` order.
    pub individual: Vec<ExpertResult>,
}
