use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The entity is absent, or not visible to the caller.
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("name '{0}' is already taken")]
    Conflict(String),

    #[error("store lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, StoreError>;
