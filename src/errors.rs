use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("unknown product {0}")]
    UnknownProduct(String),

    #[error("missing or invalid credentials")]
    Unauthorized,

    #[error("insufficient permissions")]
    Forbidden,

    #[error("cascade delete incomplete: {0}")]
    PartialCascadeFailure(String),

    #[error("operation timed out")]
    Timeout,

    #[error("store unavailable")]
    Unavailable,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable code reported alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::UnknownProduct(_) => "UNKNOWN_PRODUCT",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::PartialCascadeFailure(_) => "PARTIAL_CASCADE_FAILURE",
            AppError::Timeout => "TIMEOUT",
            AppError::Unavailable => "STORE_UNAVAILABLE",
            AppError::Internal(_) => "INTERNAL",
        }
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound(what) => AppError::NotFound(what),
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::UnknownProduct(id) => AppError::UnknownProduct(id.to_string()),
            DomainError::InvalidQuantity(q) => {
                AppError::Validation(format!("quantity {q} must be a positive integer"))
            }
            DomainError::PartialCascadeFailure(detail) => AppError::PartialCascadeFailure(detail),
            DomainError::Timeout => AppError::Timeout,
            DomainError::Unavailable(msg) => {
                log::error!("store unavailable: {msg}");
                AppError::Unavailable
            }
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<r2d2::Error> for AppError {
    fn from(e: r2d2::Error) -> Self {
        log::error!("connection pool error: {e}");
        AppError::Unavailable
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            diesel::result::Error::NotFound => AppError::NotFound("record"),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::UnknownProduct(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::PartialCascadeFailure(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Server-side failures are logged with detail but reported
        // generically, so internals never leak to the caller.
        let message = match self {
            AppError::Internal(detail) => {
                log::error!("internal error: {detail}");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "code": self.code(),
            "error": message,
        }))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::ResponseError;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn not_found_returns_404() {
        let resp = AppError::NotFound("order").error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_returns_400() {
        let resp = AppError::Validation("bad".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unknown_product_returns_400() {
        let resp = AppError::UnknownProduct(Uuid::new_v4().to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unauthorized_and_forbidden_statuses() {
        assert_eq!(
            AppError::Unauthorized.error_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden.error_response().status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn partial_cascade_failure_is_a_server_error() {
        let resp = AppError::PartialCascadeFailure("1 of 2 line items removed".to_string())
            .error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn timeout_returns_504_and_unavailable_503() {
        assert_eq!(
            AppError::Timeout.error_response().status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            AppError::Unavailable.error_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn internal_error_message_is_not_leaked() {
        let err = AppError::Internal("password = hunter2".to_string());
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Internal error: password = hunter2");
    }

    #[test]
    fn domain_errors_map_to_stable_codes() {
        let app: AppError = DomainError::NotFound("order").into();
        assert_eq!(app.code(), "NOT_FOUND");

        let app: AppError = DomainError::InvalidQuantity(0).into();
        assert_eq!(app.code(), "VALIDATION_ERROR");

        let app: AppError = DomainError::UnknownProduct(Uuid::new_v4()).into();
        assert_eq!(app.code(), "UNKNOWN_PRODUCT");

        let app: AppError = DomainError::PartialCascadeFailure("1 of 2 line items removed".to_string()).into();
        assert_eq!(app.code(), "PARTIAL_CASCADE_FAILURE");
    }
}
