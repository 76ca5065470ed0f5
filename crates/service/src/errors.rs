use thiserror::Error;

/// Business errors shared by the user and subscription services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("invalid email or password")]
    Unauthorized,
    #[error("{0} not found")]
    NotFound(String),
    #[error("hashing error: {0}")]
    Hash(String),
    #[error("token error: {0}")]
    Token(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(entity.to_string()) }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 1001,
            ServiceError::Conflict(_) => 1002,
            ServiceError::NotFound(_) => 1003,
            ServiceError::Unauthorized => 1004,
            ServiceError::Hash(_) => 1101,
            ServiceError::Token(_) => 1102,
            ServiceError::Db(_) => 1200,
        }
    }
}

impl From<models::errors::ModelError> for ServiceError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation(m) => ServiceError::Validation(m),
            models::errors::ModelError::Db(m) => {
                // The only externally reachable unique constraint is user.email;
                // a storage-level violation means the pre-check lost a race.
                if m.contains("duplicate key") || m.contains("unique constraint") {
                    ServiceError::Conflict("email already in use".into())
                } else {
                    ServiceError::Db(m)
                }
            }
        }
    }
}
