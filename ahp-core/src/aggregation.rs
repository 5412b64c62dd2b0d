/// Group decisions: aggregation of individual judgments (AIJ).
///
/// Each expert's matrix is pooled cell by cell with the geometric mean, which
/// keeps the group matrix reciprocal: the geometric mean of reciprocals is the
/// reciprocal of the geometric mean. The group matrix then goes through the
/// same eigenvector engine as a single judge.
///
/// Experts are identified by caller-provided `i64` IDs. Inputs are taken as
/// `BTreeMap`s so results come out in ascending ID order and re-running an
/// aggregation on the same inputs reproduces it bit for bit.
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use nalgebra::DMatrix;

use crate::consistency::consistency_from_eigenvalue;
use crate::error::{AhpError, Result};
use crate::judgment::JudgmentSet;
use crate::matrix::ComparisonMatrix;
use crate::priority::{normalize_eigenvector, principal_eigen, EigenNormalization};
use crate::ranking::rank;
use crate::types::{AggregationResult, ExpertResult};

/// Group aggregation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum AggregationMethod {
    /// Aggregation of Individual Judgments: pool raw judgments, then derive
    /// priorities once.
    #[default]
    Aij,
    /// Aggregation of Individual Priorities. Recognised but not implemented.
    Aip,
}

impl fmt::Display for AggregationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationMethod::Aij => f.write_str("AIJ"),
            AggregationMethod::Aip => f.write_str("AIP"),
        }
    }
}

impl FromStr for AggregationMethod {
    type Err = AhpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AIJ" => Ok(AggregationMethod::Aij),
            "AIP" => Ok(AggregationMethod::Aip),
            _ => Err(AhpError::UnsupportedMethod(s.to_string())),
        }
    }
}

/// Where a collaborative project stands from one judge's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CollaborationStatus {
    /// This judge still has pairs to compare.
    InProgress,
    /// This judge is done, others are not.
    WaitingForOthers,
    /// Every participating expert has completed their judgments.
    ReadyForAggregation,
}

impl CollaborationStatus {
    pub fn evaluate(judge_complete: bool, completed_experts: usize, total_experts: usize) -> Self {
        if !judge_complete {
            CollaborationStatus::InProgress
        } else if completed_experts < total_experts {
            CollaborationStatus::WaitingForOthers
        } else {
            CollaborationStatus::ReadyForAggregation
        }
    }
}

/// Aggregate expert matrices with the requested method.
pub fn aggregate(
    n: usize,
    experts: &BTreeMap<i64, ComparisonMatrix>,
    method: AggregationMethod,
) -> Result<AggregationResult> {
    match method {
        AggregationMethod::Aij => aggregate_aij(n, experts),
        AggregationMethod::Aip => Err(AhpError::UnsupportedMethod(
            "AIP (only AIJ is currently supported)".to_string(),
        )),
    }
}

/// Aggregate complete expert matrices by per-cell geometric mean.
///
/// Callers must pass only experts whose judgment sets are complete; this is
/// not re-checked here.
pub fn aggregate_aij(
    n: usize,
    experts: &BTreeMap<i64, ComparisonMatrix>,
) -> Result<AggregationResult> {
    if n < 2 {
        return Err(AhpError::invalid("need at least 2 alternatives"));
    }
    if experts.is_empty() {
        return Err(AhpError::NoData("no completed judgments to aggregate".to_string()));
    }
    for (id, matrix) in experts {
        if matrix.size() != n {
            return Err(AhpError::invalid(format!(
                "expert {} has a {}x{} matrix, expected {}x{}",
                id,
                matrix.size(),
                matrix.size(),
                n,
                n
            )));
        }
    }

    let num_experts = experts.len();
    let k = num_experts as f64;

    let mut pooled = DMatrix::from_element(n, n, 1.0);
    for i in 0..n {
        for j in (i + 1)..n {
            let log_sum: f64 = experts.values().map(|m| m.get(i, j).ln()).sum();
            let value = (log_sum / k).exp();
            pooled[(i, j)] = value;
            pooled[(j, i)] = 1.0 / value;
        }
    }
    let aggregated_matrix = ComparisonMatrix::from_dmatrix(pooled);

    let eigen = principal_eigen(&aggregated_matrix)?;
    let weights = normalize_eigenvector(&eigen.vector, EigenNormalization::AbsoluteSum)?;
    let report = consistency_from_eigenvalue(n, eigen.lambda_max);

    let individual = experts
        .iter()
        .map(|(&expert_id, matrix)| expert_result(expert_id, matrix))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        n,
        num_experts,
        lambda_max = report.lambda_max,
        cr = report.cr,
        "aggregated expert judgments"
    );

    Ok(AggregationResult {
        method: AggregationMethod::Aij,
        rankings: rank(&weights),
        aggregated_matrix,
        weights,
        lambda_max: report.lambda_max,
        ci: report.ci,
        cr: report.cr,
        is_consistent: report.is_consistent,
        num_experts,
        expert_ids: experts.keys().copied().collect(),
        individual,
    })
}

fn expert_result(expert_id: i64, matrix: &ComparisonMatrix) -> Result<ExpertResult> {
    let eigen = principal_eigen(matrix)?;
    let weights = normalize_eigenvector(&eigen.vector, EigenNormalization::AbsoluteSum)?;
    let report = consistency_from_eigenvalue(matrix.size(), eigen.lambda_max);
    Ok(ExpertResult {
        expert_id,
        weights,
        lambda_max: report.lambda_max,
        ci: report.ci,
        cr: report.cr,
    })
}

/// Build each expert's matrix from their judgments and aggregate the ones
/// that are complete. Incomplete sets are skipped.
pub fn aggregate_judgment_sets(
    n: usize,
    sets: &BTreeMap<i64, JudgmentSet>,
) -> Result<AggregationResult> {
    let mut matrices = BTreeMap::new();
    for (&id, set) in sets {
        if set.num_alternatives() != n {
            return Err(AhpError::invalid(format!(
                "expert {} judged {} alternatives, expected {}",
                id,
                set.num_alternatives(),
                n
            )));
        }
        if !set.is_complete() {
            tracing::debug!(
                expert = id,
                have = set.len(),
                need = set.required_count(),
                "skipping incomplete expert"
            );
            continue;
        }
        matrices.insert(id, set.to_matrix()?);
    }
    aggregate_aij(n, &matrices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judgment::Judgment;
    use crate::matrix::build_matrix;
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    fn expert(values: [f64; 3]) -> ComparisonMatrix {
        build_matrix(
            3,
            &[
                Judgment::new(0, 1, values[0]),
                Judgment::new(0, 2, values[1]),
                Judgment::new(1, 2, values[2]),
            ],
        )
        .unwrap()
    }

    fn panel() -> BTreeMap<i64, ComparisonMatrix> {
        let mut experts = BTreeMap::new();
        experts.insert(30, expert([3.0, 5.0, 2.0]));
        experts.insert(10, expert([2.0, 4.0, 3.0]));
        experts.insert(20, expert([4.0, 7.0, 1.0]));
        experts
    }

    #[test]
    fn test_geometric_mean_per_cell() {
        let result = aggregate_aij(3, &panel()).unwrap();
        let m = &result.aggregated_matrix;

        assert!((m.get(0, 1) - 24f64.cbrt()).abs() < 1e-12);
        assert!((m.get(0, 2) - 140f64.cbrt()).abs() < 1e-12);
        assert!((m.get(1, 2) - 6f64.cbrt()).abs() < 1e-12);
        assert!(m.is_reciprocal(1e-9));

        assert_eq!(result.num_experts, 3);
        assert_eq!(result.expert_ids, vec![10, 20, 30]);
        assert_eq!(result.method, AggregationMethod::Aij);
        assert_eq!(result.rankings, vec![1, 2, 3]);

        let total: f64 = result.weights.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(result.weights.iter().all(|w| *w >= 0.0));
        assert!(result.is_consistent);
    }

    #[test]
    fn test_individual_breakdown() {
        let result = aggregate_aij(3, &panel()).unwrap();
        let ids: Vec<i64> = result.individual.iter().map(|e| e.expert_id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
        for e in &result.individual {
            assert_eq!(e.weights.len(), 3);
            assert!((e.weights.iter().sum::<f64>() - 1.0).abs() < 1e-9);
            assert!(e.lambda_max >= 3.0 - 1e-9);
        }
    }

    #[test]
    fn test_single_expert_reproduces_their_matrix() {
        let mut experts = BTreeMap::new();
        experts.insert(1, expert([3.0, 5.0, 2.0]));
        let result = aggregate_aij(3, &experts).unwrap();

        for i in 0..3 {
            for j in 0..3 {
                let diff = result.aggregated_matrix.get(i, j) - experts[&1].get(i, j);
                assert!(diff.abs() < 1e-12);
            }
        }
        assert!((result.lambda_max - 3.0037).abs() < 1e-3);
        assert!((result.weights[0] - 0.648).abs() < 1e-3);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let first = aggregate_aij(3, &panel()).unwrap();
        let second = aggregate_aij(3, &panel()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_random_panels_stay_reciprocal() {
        let mut rng = SmallRng::seed_from_u64(99);
        for _ in 0..10 {
            let n = rng.random_range(2..=7);
            let num_experts = rng.random_range(1..=5);
            let mut experts = BTreeMap::new();
            for id in 0..num_experts {
                let mut judgments = Vec::new();
                for i in 0..n {
                    for j in (i + 1)..n {
                        let grade = rng.random_range(1..=9);
                        let value = if rng.random::<bool>() {
                            grade as f64
                        } else {
                            1.0 / grade as f64
                        };
                        judgments.push(Judgment::new(i, j, value));
                    }
                }
                experts.insert(id as i64, build_matrix(n, &judgments).unwrap());
            }

            let result = aggregate_aij(n, &experts).unwrap();
            assert!(result.aggregated_matrix.is_reciprocal(1e-9));
            assert!((result.weights.iter().sum::<f64>() - 1.0).abs() < 1e-9);
            assert_eq!(result.num_experts, num_experts);
        }
    }

    #[test]
    fn test_rejects_too_few_alternatives() {
        let mut experts = BTreeMap::new();
        experts.insert(1, ComparisonMatrix::identity(1));
        let err = aggregate_aij(1, &experts).unwrap_err();
        assert_eq!(err, AhpError::InvalidInput("need at least 2 alternatives".to_string()));
    }

    #[test]
    fn test_rejects_empty_panel() {
        let err = aggregate_aij(3, &BTreeMap::new()).unwrap_err();
        assert_eq!(err, AhpError::NoData("no completed judgments to aggregate".to_string()));
    }

    #[test]
    fn test_rejects_mismatched_matrix() {
        let mut experts = panel();
        experts.insert(40, ComparisonMatrix::identity(4));
        assert!(matches!(aggregate_aij(3, &experts), Err(AhpError::InvalidInput(_))));
    }

    #[test]
    fn test_method_selection() {
        assert!(aggregate(3, &panel(), AggregationMethod::Aij).is_ok());
        assert!(matches!(
            aggregate(3, &panel(), AggregationMethod::Aip),
            Err(AhpError::UnsupportedMethod(_))
        ));
        assert_eq!("aij".parse::<AggregationMethod>().unwrap(), AggregationMethod::Aij);
        assert_eq!("AIP".parse::<AggregationMethod>().unwrap(), AggregationMethod::Aip);
        assert!(matches!(
            "median".parse::<AggregationMethod>(),
            Err(AhpError::UnsupportedMethod(_))
        ));
    }

    #[test]
    fn test_judgment_sets_skip_incomplete_experts() {
        let complete = JudgmentSet::from_judgments(
            3,
            &[
                Judgment::new(0, 1, 3.0),
                Judgment::new(0, 2, 5.0),
                Judgment::new(1, 2, 2.0),
            ],
        )
        .unwrap();
        let partial = JudgmentSet::from_judgments(3, &[Judgment::new(0, 1, 9.0)]).unwrap();

        let mut sets = BTreeMap::new();
        sets.insert(7, complete);
        sets.insert(8, partial.clone());

        let result = aggregate_judgment_sets(3, &sets).unwrap();
        assert_eq!(result.expert_ids, vec![7]);
        assert!((result.aggregated_matrix.get(0, 1) - 3.0).abs() < 1e-12);

        let mut only_partial = BTreeMap::new();
        only_partial.insert(8, partial);
        assert!(matches!(
            aggregate_judgment_sets(3, &only_partial),
            Err(AhpError::NoData(_))
        ));

        let mut wrong_size = BTreeMap::new();
        wrong_size.insert(9, JudgmentSet::new(4));
        assert!(matches!(
            aggregate_judgment_sets(3, &wrong_size),
            Err(AhpError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_collaboration_status() {
        assert_eq!(CollaborationStatus::evaluate(false, 2, 3), CollaborationStatus::InProgress);
        assert_eq!(CollaborationStatus::evaluate(true, 2, 3), CollaborationStatus::WaitingForOthers);
        assert_eq!(CollaborationStatus::evaluate(true, 3, 3), CollaborationStatus::ReadyForAggregation);
    }
}
