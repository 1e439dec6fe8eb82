use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("illegal lifecycle transition: {0}")]
    Transition(String),
}
