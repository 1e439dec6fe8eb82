use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

/// An authenticated account at the boundary of the catalog. The core
/// only cares about `id` and `is_admin` for authorization decisions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let trimmed = email.trim();
    let mut parts = trimmed.splitn(2, '@');
    match (parts.next(), parts.next()) {
        (Some(local), Some(domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ModelError::Validation("invalid email".into())),
    }
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("name required".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation_requires_local_and_domain() {
        assert!(validate_email("a@b.co").is_ok());
        assert!(validate_email("@b.co").is_err());
        assert!(validate_email("a@nodot").is_err());
        assert!(validate_email("plain").is_err());
    }

    #[test]
    fn name_must_not_be_blank() {
        assert!(validate_name("Ada").is_ok());
        assert!(validate_name("  ").is_err());
    }
}
