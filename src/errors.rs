use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NestedSetError {
    #[error("Invalid bound [left={left},right={right}]: bounds must be positive and left < right")]
    InvalidBound { left: i64, right: i64 },

    #[error("Element not found: {0}")]
    NotFound(String),

    #[error("Element already in nested set: {0}")]
    DuplicateElement(String),

    #[error("Inconsistent bounds: {reason}")]
    InconsistentBounds { reason: String },
}

impl NestedSetError {
    pub(crate) fn not_found(key: &impl std::fmt::Debug) -> Self {
        Self::NotFound(format!("{:?}", key))
    }

    pub(crate) fn duplicate(key: &impl std::fmt::Debug) -> Self {
        Self::DuplicateElement(format!("{:?}", key))
    }

    pub(crate) fn inconsistent(reason: impl Into<String>) -> Self {
        Self::InconsistentBounds {
            reason: reason.into(),
        }
    }
}

pub type NestedSetResult<T> = Result<T, NestedSetError>;
