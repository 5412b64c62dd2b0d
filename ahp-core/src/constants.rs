/// Saaty's Random Index: expected CI of a random reciprocal matrix of size n.
/// Index 0 holds RI(1). Sizes beyond the table use `RANDOM_INDEX_FALLBACK`.
pub const RANDOM_INDEX: [f64; 15] = [
    0.00, 0.00, 0.58, 0.90, 1.12, 1.24, 1.32, 1.41, 1.45, 1.49, 1.51, 1.48, 1.56, 1.57, 1.59,
];

/// RI used for matrix sizes outside `RANDOM_INDEX`.
pub const RANDOM_INDEX_FALLBACK: f64 = 1.49;

/// Judgments with CR at or below this threshold are accepted as consistent.
pub const CONSISTENCY_THRESHOLD: f64 = 0.10;

/// Grades are ordinal values on Saaty's 1..9 scale. Inputs are clamped here.
pub const MIN_GRADE: i32 = 1;
pub const MAX_GRADE: i32 = 9;

/// Scale tables support between 3 and 9 gradations.
pub const MIN_GRADATIONS: usize = 3;
pub const MAX_GRADATIONS: usize = 9;

/// Bounds of the cardinal interval that gradation indices are unified onto.
///
/// Gradation `i` of `n` maps to the midpoint of the i-th of `n` equal
/// sub-intervals of [1.5, 9.5], so every refinement level shares one axis.
pub const UNIFY_LOWER: f64 = 1.5;
pub const UNIFY_UPPER: f64 = 9.5;

/// Donegan's atanh argument is clamped to this magnitude to stay inside (-1, 1).
pub const DONEGAN_ARG_LIMIT: f64 = 0.999;

/// Convergence tolerance and iteration cap handed to the Schur and SVD solvers.
pub const DECOMPOSITION_EPSILON: f64 = 1e-12;
pub const DECOMPOSITION_MAX_ITERATIONS: usize = 10_000;
