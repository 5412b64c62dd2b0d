/// Scale transforms: ordinal grades (1..9) to pairwise-comparison ratios.
///
/// Five families are supported. Every function here is total: grades and
/// gradation counts are clamped, and a degenerate Donegan evaluation falls back
/// to the neutral ratio 1.0 instead of failing.
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    DONEGAN_ARG_LIMIT, MAX_GRADATIONS, MAX_GRADE, MIN_GRADATIONS, MIN_GRADE, UNIFY_LOWER,
    UNIFY_UPPER,
};
use crate::error::AhpError;

/// Transformation family applied to a grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ScaleFamily {
    #[default]
    Integer,
    Balanced,
    Power,
    MaZheng,
    Donegan,
}

impl ScaleFamily {
    pub const ALL: [ScaleFamily; 5] = [
        ScaleFamily::Integer,
        ScaleFamily::Balanced,
        ScaleFamily::Power,
        ScaleFamily::MaZheng,
        ScaleFamily::Donegan,
    ];

    /// Numeric id used by stored projects (1 = Integer .. 5 = Donegan).
    /// Unknown ids fall back to Integer.
    pub fn from_id(id: u8) -> Self {
        match id {
            2 => ScaleFamily::Balanced,
            3 => ScaleFamily::Power,
            4 => ScaleFamily::MaZheng,
            5 => ScaleFamily::Donegan,
            _ => ScaleFamily::Integer,
        }
    }

    pub fn id(self) -> u8 {
        match self {
            ScaleFamily::Integer => 1,
            ScaleFamily::Balanced => 2,
            ScaleFamily::Power => 3,
            ScaleFamily::MaZheng => 4,
            ScaleFamily::Donegan => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ScaleFamily::Integer => "integer",
            ScaleFamily::Balanced => "balanced",
            ScaleFamily::Power => "power",
            ScaleFamily::MaZheng => "ma-zheng",
            ScaleFamily::Donegan => "donegan",
        }
    }
}

impl fmt::Display for ScaleFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScaleFamily {
    type Err = AhpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "integer" | "1" => Ok(ScaleFamily::Integer),
            "balanced" | "2" => Ok(ScaleFamily::Balanced),
            "power" | "3" => Ok(ScaleFamily::Power),
            "ma-zheng" | "mazheng" | "4" => Ok(ScaleFamily::MaZheng),
            "donegan" | "5" => Ok(ScaleFamily::Donegan),
            _ => Err(AhpError::invalid(format!(
                "unknown scale family \"{s}\" (expected integer, balanced, power, ma-zheng or donegan)"
            ))),
        }
    }
}

/// Transform an integer grade into a comparison ratio.
///
/// The grade is clamped to [1, 9] first, so out-of-range grades behave exactly
/// like the nearest bound.
pub fn scale_value(grade: i32, family: ScaleFamily) -> f64 {
    let grade = grade.clamp(MIN_GRADE, MAX_GRADE);
    scale_value_continuous(grade as f64, family)
}

/// Same transform on a real-valued grade, used for unified gradation values
/// such as 1.5 or 8.17 that do not sit on an integer grade.
pub fn scale_value_continuous(grade: f64, family: ScaleFamily) -> f64 {
    let g = if grade.is_nan() {
        MIN_GRADE as f64
    } else {
        grade.clamp(MIN_GRADE as f64, MAX_GRADE as f64)
    };

    match family {
        ScaleFamily::Integer => g,
        ScaleFamily::Balanced => {
            let w = 0.5 + (g - 1.0) * 0.05;
            balanced_ratio(w)
        }
        ScaleFamily::Power => 9f64.powf((g - 1.0) / 8.0),
        ScaleFamily::MaZheng => 9.0 / (9.0 + 1.0 - g),
        ScaleFamily::Donegan => donegan_ratio(g),
    }
}

fn balanced_ratio(w: f64) -> f64 {
    if w < 1.0 {
        w / (1.0 - w)
    } else {
        9.0
    }
}

fn donegan_ratio(grade: f64) -> f64 {
    let arg = ((grade - 1.0) / 14.0 * 3f64.sqrt()).clamp(-DONEGAN_ARG_LIMIT, DONEGAN_ARG_LIMIT);
    let ratio = arg.atanh().exp();
    if ratio.is_finite() {
        ratio
    } else {
        1.0
    }
}

/// Map gradation index `i` (1-based) of `n` onto the unified [1.5, 9.5] axis.
pub fn unify(index: usize, gradations: usize) -> f64 {
    let n = gradations.max(1) as f64;
    UNIFY_LOWER + (index as f64 - 0.5) * (UNIFY_UPPER - UNIFY_LOWER) / n
}

/// Ratio values for each gradation of a family at a given gradation count.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScaleTable {
    pub family: ScaleFamily,
    /// Clamped to [3, 9].
    pub gradations: usize,
    /// `values[k]` is the ratio of gradation `k + 1`.
    pub values: Vec<f64>,
}

impl ScaleTable {
    pub fn new(family: ScaleFamily, gradations: usize) -> Self {
        let n = gradations.clamp(MIN_GRADATIONS, MAX_GRADATIONS);
        let values = (1..=n).map(|i| table_value(family, i, n)).collect();
        ScaleTable {
            family,
            gradations: n,
            values,
        }
    }

    /// Unified cardinal value of gradation `index` (1-based) in this table.
    pub fn unify(&self, index: usize) -> f64 {
        unify(index, self.gradations)
    }

    pub fn labels(&self) -> &'static [&'static str] {
        gradation_labels(self.gradations)
    }
}

fn table_value(family: ScaleFamily, i: usize, n: usize) -> f64 {
    let fi = i as f64;
    let fn_ = n as f64;
    match family {
        ScaleFamily::Integer => fi,
        ScaleFamily::Balanced => balanced_ratio(fi / (fn_ + 1.0)),
        ScaleFamily::Power => 9f64.powf((fi - 1.0) / (fn_ - 1.0)),
        ScaleFamily::MaZheng => 9.0 / (9.0 + 1.0 - fi),
        ScaleFamily::Donegan => donegan_ratio(fi),
    }
}

const GRADATION_LABELS: [&[&str]; 7] = [
    &["Weak", "Strong", "Extreme"],
    &["Weak", "Medium", "Strong", "Extreme"],
    &["Weak", "Medium", "Above Medium", "Strong", "Extreme"],
    &["Weak", "Medium", "Above Medium", "Strong", "Very Strong", "Extreme"],
    &[
        "Weak",
        "Medium",
        "Above Medium",
        "Strong",
        "Very Strong",
        "Very Very Strong",
        "Extreme",
    ],
    &[
        "Weak",
        "Medium",
        "Above Medium",
        "Strong",
        "Very Strong",
        "Very Very Strong",
        "Extremely Strong",
        "Absolute",
    ],
    &[
        "Weak",
        "Medium",
        "Above Medium",
        "Strong",
        "Very Strong",
        "Very Very Strong",
        "Extremely Strong",
        "Nearly Absolute",
        "Absolute",
    ],
];

/// Human-readable intensity labels for a gradation count (3..9).
/// Any other count gets the 3-gradation set.
pub fn gradation_labels(count: usize) -> &'static [&'static str] {
    if (MIN_GRADATIONS..=MAX_GRADATIONS).contains(&count) {
        GRADATION_LABELS[count - MIN_GRADATIONS]
    } else {
        GRADATION_LABELS[0]
    }
}

const GRADUAL_SCALES: [&[u8]; 7] = [
    &[2, 5],
    &[2, 5, 9],
    &[3, 5, 7, 9],
    &[2, 3, 5, 7, 9],
    &[2, 3, 4, 5, 7, 9],
    &[2, 3, 4, 5, 6, 7, 9],
    &[2, 3, 4, 5, 6, 7, 8, 9],
];

/// Grades offered at a progressive-refinement level with `gradations` buttons
/// (2..8). Unknown counts get the initial Weak/Strong/Extreme set `[2, 5, 9]`.
pub fn gradual_scale(gradations: usize) -> &'static [u8] {
    if (2..=8).contains(&gradations) {
        GRADUAL_SCALES[gradations - 2]
    } else {
        GRADUAL_SCALES[1]
    }
}

/// Percentage widths for `count` grade buttons, proportional to the ratio each
/// unified gradation maps to. The Integer family gets equal widths.
pub fn proportional_widths(count: usize, family: ScaleFamily) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    if family == ScaleFamily::Integer {
        return vec![100.0 / count as f64; count];
    }

    let ratios: Vec<f64> = (1..=count)
        .map(|k| scale_value_continuous(unify(k, count), family))
        .collect();
    let total: f64 = ratios.iter().sum();

    ratios.iter().map(|r| r / total * 100.0).collect()
}
