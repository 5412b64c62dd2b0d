/// Reciprocal pairwise-comparison matrices.
///
/// The matrix is held as an `nalgebra::DMatrix<f64>`, but crosses the crate
/// boundary as plain nested rows.
use nalgebra::DMatrix;

use crate::error::{AhpError, Result};
use crate::judgment::{reciprocal, required_judgments, Judgment, JudgmentSet};

/// What to do with pairs that have no judgment when building a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum MissingJudgments {
    /// Leave missing cells at 1, i.e. assume the judge is indifferent.
    #[default]
    Indifference,
    /// Refuse to build unless every pair has a judgment.
    Strict,
}

/// A dense square comparison matrix. `M[i][j]` is the ratio of importance of
/// alternative `i` over alternative `j`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonMatrix {
    inner: DMatrix<f64>,
}

impl ComparisonMatrix {
    /// The all-ones matrix: every pair judged equally important.
    pub fn identity(n: usize) -> Self {
        ComparisonMatrix {
            inner: DMatrix::from_element(n, n, 1.0),
        }
    }

    /// Build from row-major nested vectors. Rows must form a non-empty square
    /// matrix of finite, strictly positive ratios.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        if n == 0 {
            return Err(AhpError::invalid("comparison matrix must have at least one row"));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(AhpError::invalid(format!(
                    "comparison matrix must be square: row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    n
                )));
            }
            if let Some(j) = row.iter().position(|v| !v.is_finite() || *v <= 0.0) {
                return Err(AhpError::invalid(format!(
                    "comparison matrix entry ({}, {}) must be a finite positive ratio, got {}",
                    i, j, row[j]
                )));
            }
        }
        Ok(ComparisonMatrix {
            inner: DMatrix::from_fn(n, n, |i, j| rows[i][j]),
        })
    }

    pub(crate) fn from_dmatrix(inner: DMatrix<f64>) -> Self {
        ComparisonMatrix { inner }
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.inner
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect()
    }

    /// Number of alternatives.
    pub fn size(&self) -> usize {
        self.inner.nrows()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.inner[(i, j)]
    }

    pub fn as_dmatrix(&self) -> &DMatrix<f64> {
        &self.inner
    }

    /// Set `M[i][j] = value` and `M[j][i] = 1/value`.
    fn set_pair(&mut self, i: usize, j: usize, value: f64) {
        self.inner[(i, j)] = value;
        self.inner[(j, i)] = reciprocal(value);
    }

    /// True when the diagonal is 1 and every `M[i][j] * M[j][i]` is within
    /// `tolerance` of 1.
    pub fn is_reciprocal(&self, tolerance: f64) -> bool {
        let n = self.size();
        (0..n).all(|i| {
            (self.inner[(i, i)] - 1.0).abs() <= tolerance
                && ((i + 1)..n)
                    .all(|j| (self.inner[(i, j)] * self.inner[(j, i)] - 1.0).abs() <= tolerance)
        })
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ComparisonMatrix {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serde::Serialize::serialize(&self.to_rows(), serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ComparisonMatrix {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let rows = <Vec<Vec<f64>> as serde::Deserialize>::deserialize(deserializer)?;
        ComparisonMatrix::from_rows(rows).map_err(serde::de::Error::custom)
    }
}

/// Assemble a dense reciprocal matrix from sparse judgments.
///
/// Pairs without a judgment stay at 1. A zero ratio is treated as 1 in both
/// cells so the matrix never holds a division by zero. Completeness is not
/// checked; see [`build_matrix_with_policy`].
pub fn build_matrix(n: usize, judgments: &[Judgment]) -> Result<ComparisonMatrix> {
    if n < 1 {
        return Err(AhpError::invalid("need at least 1 alternative"));
    }

    let mut matrix = ComparisonMatrix::identity(n);
    for raw in judgments {
        let judgment = Judgment::new(raw.i, raw.j, raw.value);
        judgment.validate(n)?;

        if !judgment.value.is_finite() || judgment.value < 0.0 {
            return Err(AhpError::invalid(format!(
                "judgment ({}, {}) has invalid ratio {}",
                judgment.i, judgment.j, judgment.value
            )));
        }

        let value = if judgment.value == 0.0 {
            tracing::warn!(i = judgment.i, j = judgment.j, "zero ratio treated as indifference");
            1.0
        } else {
            judgment.value
        };
        matrix.set_pair(judgment.i, judgment.j, value);
    }

    Ok(matrix)
}

/// Build a matrix, applying an explicit policy for missing pairs.
pub fn build_matrix_with_policy(
    n: usize,
    judgments: &[Judgment],
    missing: MissingJudgments,
) -> Result<ComparisonMatrix> {
    if missing == MissingJudgments::Strict && n > 1 {
        let set = JudgmentSet::from_judgments(n, judgments)?;
        if !set.is_complete() {
            return Err(AhpError::IncompleteJudgments {
                have: set.len(),
                need: required_judgments(n),
            });
        }
    }
    build_matrix(n, judgments)
}

impl JudgmentSet {
    /// Build this judge's comparison matrix (missing pairs at indifference).
    pub fn to_matrix(&self) -> Result<ComparisonMatrix> {
        build_matrix(self.num_alternatives(), &self.to_vec())
    }
}
