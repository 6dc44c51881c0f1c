use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("unknown product {0}")]
    UnknownProduct(Uuid),
    #[error("invalid quantity {0}, must be a positive integer")]
    InvalidQuantity(i32),
    #[error("cascade delete incomplete: {0}")]
    PartialCascadeFailure(String),
    #[error("operation timed out")]
    Timeout,
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("internal error: {0}")]
    Internal(String),
}
