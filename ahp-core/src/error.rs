use thiserror::Error;

/// Errors surfaced by the engine. All are local and synchronous: a failed call
/// produces no partial result and leaves nothing behind to clean up.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AhpError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unsupported aggregation method: {0}")]
    UnsupportedMethod(String),

    #[error("{0}")]
    NoData(String),

    #[error("incomplete judgments: need {need} pairwise comparisons, have {have}")]
    IncompleteJudgments { have: usize, need: usize },

    #[error("numeric failure: {0}")]
    Numeric(String),
}

pub type Result<T> = std::result::Result<T, AhpError>;

impl AhpError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        AhpError::InvalidInput(msg.into())
    }
}
