use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("{0}")]
    Validation(String),
    #[error("Authentication required")]
    Unauthenticated,
    #[error("Premium subscription required for AI analysis")]
    SubscriptionRequired,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Payment processing is currently unavailable. Please check back later.")]
    PaymentUnavailable,
    #[error("Text generation failed: {0}")]
    Generation(anyhow::Error),
    #[error("Billing provider request failed: {0}")]
    Billing(anyhow::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl UseCaseError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UseCaseError::Validation(_) => StatusCode::BAD_REQUEST,
            UseCaseError::Unauthenticated => StatusCode::UNAUTHORIZED,
            UseCaseError::SubscriptionRequired => StatusCode::FORBIDDEN,
            UseCaseError::NotFound(_) => StatusCode::NOT_FOUND,
            UseCaseError::PaymentUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            UseCaseError::Generation(_) | UseCaseError::Billing(_) => StatusCode::BAD_GATEWAY,
            UseCaseError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable tag sent alongside the status code.
    pub fn reason(&self) -> &'static str {
        match self {
            UseCaseError::Validation(_) => "validation_failed",
            UseCaseError::Unauthenticated => "unauthenticated",
            UseCaseError::SubscriptionRequired => "subscription_required",
            UseCaseError::NotFound(_) => "not_found",
            UseCaseError::PaymentUnavailable => "payment_unavailable",
            UseCaseError::Generation(_) => "generation_failed",
            UseCaseError::Billing(_) => "billing_failed",
            UseCaseError::Internal(_) => "internal_error",
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, UseCaseError>;
