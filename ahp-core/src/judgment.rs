/// Pairwise judgments and per-judge judgment sets.
///
/// A judgment is always stored in canonical form `i < j`; the value reads as
/// "how many times more important alternative i is than alternative j".
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{AhpError, Result};
use crate::scale::{scale_value, ScaleFamily};

/// Which side of a pair the judge prefers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    /// The first alternative is more important.
    #[default]
    More,
    /// The first alternative is less important.
    Less,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::More => Direction::Less,
            Direction::Less => Direction::More,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::More => f.write_str("more"),
            Direction::Less => f.write_str("less"),
        }
    }
}

impl FromStr for Direction {
    type Err = AhpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "more" => Ok(Direction::More),
            "less" => Ok(Direction::Less),
            _ => Err(AhpError::invalid(format!(
                "unknown direction \"{s}\" (expected more or less)"
            ))),
        }
    }
}

/// Reciprocal of a ratio, with 0 treated as indifference rather than infinity.
pub(crate) fn reciprocal(value: f64) -> f64 {
    if value == 0.0 {
        1.0
    } else {
        1.0 / value
    }
}

/// A single pairwise judgment in canonical `(i < j)` form.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Judgment {
    pub i: usize,
    pub j: usize,
    /// Ratio of importance of `i` over `j`.
    pub value: f64,
}

impl Judgment {
    /// Create a judgment, swapping the indices (and inverting the value) when
    /// given in `i > j` order.
    pub fn new(i: usize, j: usize, value: f64) -> Self {
        if i > j {
            Judgment {
                i: j,
                j: i,
                value: reciprocal(value),
            }
        } else {
            Judgment { i, j, value }
        }
    }

    /// Create a judgment from a grade on a scale family.
    ///
    /// `Direction::More` means `i` is preferred to `j` by the scaled ratio;
    /// `Direction::Less` records the reciprocal.
    pub fn from_grade(
        i: usize,
        j: usize,
        grade: i32,
        direction: Direction,
        family: ScaleFamily,
    ) -> Self {
        let ratio = scale_value(grade, family);
        let value = match direction {
            Direction::More => ratio,
            Direction::Less => reciprocal(ratio),
        };
        Judgment::new(i, j, value)
    }

    /// Preference direction implied by the value (ties read as `More`).
    pub fn direction(&self) -> Direction {
        if self.value < 1.0 {
            Direction::Less
        } else {
            Direction::More
        }
    }

    pub(crate) fn validate(&self, n: usize) -> Result<()> {
        if self.i == self.j {
            return Err(AhpError::invalid(format!(
                "judgment compares alternative {} with itself",
                self.i
            )));
        }
        if self.j >= n {
            return Err(AhpError::invalid(format!(
                "judgment ({}, {}) out of range for {} alternatives",
                self.i, self.j, n
            )));
        }
        Ok(())
    }
}

/// Number of judgments needed to cover every unordered pair of `n` alternatives.
pub fn required_judgments(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// One judge's judgments over a fixed number of alternatives.
///
/// At most one judgment exists per unordered pair; inserting a judgment for a
/// pair that already has one replaces it.
#[derive(Debug, Clone, PartialEq)]
pub struct JudgmentSet {
    n: usize,
    judgments: BTreeMap<(usize, usize), f64>,
}

impl JudgmentSet {
    pub fn new(n: usize) -> Self {
        JudgmentSet {
            n,
            judgments: BTreeMap::new(),
        }
    }

    /// Build a set from judgments, later entries replacing earlier ones.
    pub fn from_judgments(n: usize, judgments: &[Judgment]) -> Result<Self> {
        let mut set = JudgmentSet::new(n);
        for judgment in judgments {
            set.insert(*judgment)?;
        }
        Ok(set)
    }

    pub fn num_alternatives(&self) -> usize {
        self.n
    }

    /// Insert or replace the judgment for a pair. Returns the replaced judgment.
    pub fn insert(&mut self, judgment: Judgment) -> Result<Option<Judgment>> {
        let judgment = Judgment::new(judgment.i, judgment.j, judgment.value);
        judgment.validate(self.n)?;

        let previous = self
            .judgments
            .insert((judgment.i, judgment.j), judgment.value);
        Ok(previous.map(|value| Judgment {
            i: judgment.i,
            j: judgment.j,
            value,
        }))
    }

    /// Remove the judgment for a pair, in either index order.
    pub fn remove(&mut self, i: usize, j: usize) -> Option<Judgment> {
        let (a, b) = if i <= j { (i, j) } else { (j, i) };
        self.judgments
            .remove(&(a, b))
            .map(|value| Judgment { i: a, j: b, value })
    }

    /// Look up a pair. Asking for `(j, i)` returns the canonical judgment.
    pub fn get(&self, i: usize, j: usize) -> Option<Judgment> {
        let (a, b) = if i <= j { (i, j) } else { (j, i) };
        self.judgments
            .get(&(a, b))
            .map(|&value| Judgment { i: a, j: b, value })
    }

    pub fn len(&self) -> usize {
        self.judgments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.judgments.is_empty()
    }

    pub fn required_count(&self) -> usize {
        required_judgments(self.n)
    }

    pub fn is_complete(&self) -> bool {
        self.len() >= self.required_count()
    }

    /// Pairs without a judgment, in `(i, j)` lexicographic order.
    pub fn missing_pairs(&self) -> Vec<(usize, usize)> {
        let mut missing = Vec::with_capacity(self.required_count() - self.len());
        for i in 0..self.n {
            for j in (i + 1)..self.n {
                if !self.judgments.contains_key(&(i, j)) {
                    missing.push((i, j));
                }
            }
        }
        missing
    }

    /// Judgments in `(i, j)` order.
    pub fn iter(&self) -> impl Iterator<Item = Judgment> + '_ {
        self.judgments
            .iter()
            .map(|(&(i, j), &value)| Judgment { i, j, value })
    }

    pub fn to_vec(&self) -> Vec<Judgment> {
        self.iter().collect()
    }
}
