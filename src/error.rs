use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error("invalid metadata: {0}")]
    Validation(String),

    #[error("unauthorized service request")]
    Unauthorized,

    #[error("rate limit exceeded for service: {0}")]
    RateLimited(String),

    #[error("unknown payment type: {0}")]
    UnknownServiceType(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntegrationError {
    pub fn code(&self) -> &'static str {
        match self {
            IntegrationError::Validation(_) => "INVALID_METADATA",
            IntegrationError::Unauthorized => "UNAUTHORIZED_SERVICE",
            IntegrationError::RateLimited(_) => "RATE_LIMITED",
            IntegrationError::UnknownServiceType(_) => "UNKNOWN_SERVICE_TYPE",
            IntegrationError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
