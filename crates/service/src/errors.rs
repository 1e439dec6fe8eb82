use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Field-path -> message map produced by the validation gate. Paths
/// into embedded collections are indexed, e.g. `features[2].title`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(pub BTreeMap<String, String>);

impl FieldErrors {
    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.insert(path.into(), message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errs = FieldErrors::default();
        errs.push(path, message);
        errs
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (path, msg) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{path}: {msg}")?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("not authorized: {0}")]
    NotAuthorized(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("version conflict: expected revision {expected}, found {actual}")]
    VersionConflict { expected: u64, actual: u64 },
    #[error("storage error: {0}")]
    Storage(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(format!("{} not found", entity))
    }

    pub fn invalid(path: &str, message: &str) -> Self {
        Self::Validation(FieldErrors::single(path, message))
    }
}
