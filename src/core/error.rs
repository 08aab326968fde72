use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BagError {
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Undefined field '{0}'")]
    UndefinedField(String),

    #[error("Comparator cannot be invoked: {0}")]
    ComparatorInvocation(String),

    #[error("Comparator failed: {0}")]
    ComparatorFailed(String),

    #[error("Collection modified during sort: {0}")]
    ConcurrentModification(String),

    #[error("Borrow conflict: {0}")]
    BorrowConflict(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}

pub type Result<T> = std::result::Result<T, BagError>;

impl From<std::cell::BorrowError> for BagError {
    fn from(err: std::cell::BorrowError) -> Self {
        Self::BorrowConflict(err.to_string())
    }
}

impl From<std::cell::BorrowMutError> for BagError {
    fn from(err: std::cell::BorrowMutError) -> Self {
        Self::BorrowConflict(err.to_string())
    }
}
