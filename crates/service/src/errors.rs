use thiserror::Error;

use crate::validation::ValidationErrors;

/// Coarse failure category, used by the web layer to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Malformed,
    Conflict,
    NotFound,
    Db,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(ValidationErrors),
    /// Body passed validation but could not be decoded into the typed fields.
    #[error("{0}")]
    Malformed(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// Lookup miss inside an owner's relation.
    pub fn relation_missing(relation: &str) -> Self { Self::NotFound(format!("Error {} inexistente", relation)) }

    /// Unique field already taken inside an owner's relation.
    pub fn relation_exists(relation: &str) -> Self { Self::Conflict(format!("El {} ya existe", relation)) }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Validation(_) => ErrorKind::Validation,
            ServiceError::Malformed(_) => ErrorKind::Malformed,
            ServiceError::Conflict(_) => ErrorKind::Conflict,
            ServiceError::NotFound(_) => ErrorKind::NotFound,
            ServiceError::Model(models::errors::ModelError::Validation(_)) => ErrorKind::Validation,
            ServiceError::Db(_) | ServiceError::Model(_) => ErrorKind::Db,
        }
    }

    /// Field-level messages, when the failure came from a rule set.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            ServiceError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(e: ValidationErrors) -> Self { ServiceError::Validation(e) }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self { ServiceError::Db(e.to_string()) }
}
