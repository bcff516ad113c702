pub use crate::repository::RepositoryError;
use anyhow::Error;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::*;
use std::any::Any;

pub trait IServiceError: Any {
    fn error_type(&self) -> String {
        "internal_server_error".to_string()
    }

    fn status_code(&self) -> http::StatusCode {
        http::StatusCode::INTERNAL_SERVER_ERROR
    }
}

#[derive(Debug)]
pub struct ServiceError {
    type_id: std::any::TypeId,
    error_type: String,
    status_code: http::StatusCode,
    message: Option<String>,
    inner: Error,
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Body of every failed response.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub message: String,
}

impl ServiceError {
    pub fn new<E>(err: impl IServiceError, detail: E) -> ServiceError
    where
        Error: From<E>,
    {
        ServiceError {
            type_id: err.type_id(),
            error_type: err.error_type(),
            status_code: err.status_code(),
            message: None,
            inner: From::from(detail),
        }
    }

    pub fn only(err: impl IServiceError) -> ServiceError {
        ServiceError {
            type_id: err.type_id(),
            error_type: err.error_type(),
            status_code: err.status_code(),
            message: None,
            inner: Error::msg("error"),
        }
    }

    /// Attach the message shown to the caller, overriding the detail.
    pub fn with_message(mut self, message: impl Into<String>) -> ServiceError {
        self.message = Some(message.into());
        self
    }

    pub fn into_inner(self) -> Error {
        self.inner
    }

    pub fn status_code(&self) -> http::StatusCode {
        self.status_code
    }

    pub fn error_type(&self) -> String {
        self.error_type.clone()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_error_of(&self, err: impl IServiceError) -> bool {
        self.type_id == err.type_id() && self.error_type() == err.error_type()
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            message: self
                .message
                .clone()
                .unwrap_or_else(|| format!("{:#}", self.inner)),
        }
    }

    // 500 responses only carry an explicit message, never the detail
    pub fn to_secure_error_response(&self) -> ErrorResponse {
        if self.status_code.is_server_error() && self.message.is_none() {
            ErrorResponse {
                message: self.error_type.clone(),
            }
        } else {
            self.to_error_response()
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        if self.status_code.is_server_error() {
            tracing::error!(
                error_type = %self.error_type,
                error = ?self.inner,
                "request failed"
            );
        }
        let body = self.to_secure_error_response();
        (self.status_code, Json(body)).into_response()
    }
}

// anyhow::Error can be treated as ServiceError
impl IServiceError for Error {}

pub enum FutureError {
    JoinError,
}

// for tokio::task::spawn_blocking
impl IServiceError for FutureError {
    fn error_type(&self) -> String {
        match self {
            FutureError::JoinError => "internal_server_error".to_string(),
        }
    }

    fn status_code(&self) -> http::StatusCode {
        match self {
            FutureError::JoinError => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<tokio::task::JoinError> for ServiceError {
    fn from(err: tokio::task::JoinError) -> ServiceError {
        ServiceError::new(FutureError::JoinError, err)
    }
}

// Request-level rejections shared by the middleware chain. Keep domain logic out of here.
pub enum GeneralError {
    InvalidPayload,
    Unauthorized,
    Forbidden,
}

impl GeneralError {
    pub fn invalid_payload(message: impl Into<String>) -> ServiceError {
        let message = message.into();
        ServiceError::new(GeneralError::InvalidPayload, Error::msg(message.clone()))
            .with_message(message)
    }

    pub fn unauthorized(message: impl Into<String>) -> ServiceError {
        ServiceError::only(GeneralError::Unauthorized).with_message(message)
    }

    pub fn forbidden(message: impl Into<String>) -> ServiceError {
        ServiceError::only(GeneralError::Forbidden).with_message(message)
    }
}

impl IServiceError for GeneralError {
    fn error_type(&self) -> String {
        use GeneralError::*;

        match self {
            InvalidPayload => "invalid_payload".to_string(),
            Unauthorized => "unauthorized".to_string(),
            Forbidden => "forbidden".to_string(),
        }
    }

    fn status_code(&self) -> http::StatusCode {
        use GeneralError::*;

        match self {
            InvalidPayload => http::StatusCode::BAD_REQUEST,
            Unauthorized => http::StatusCode::UNAUTHORIZED,
            Forbidden => http::StatusCode::FORBIDDEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum E {
        E1,
        E2,
    }

    impl IServiceError for E {
        fn error_type(&self) -> String {
            use E::*;

            match self {
                E1 => "e1",
                E2 => "e2",
            }
            .to_string()
        }

        fn status_code(&self) -> http::StatusCode {
            use E::*;

            match self {
                E1 => http::StatusCode::INTERNAL_SERVER_ERROR,
                E2 => http::StatusCode::NOT_FOUND,
            }
        }
    }

    #[test]
    fn it_should_handle_errors() {
        let err = ServiceError::only(E::E1);
        assert_eq!(err.error_type(), "e1".to_string());
        assert!(err.is_error_of(E::E1));
        assert!(!err.is_error_of(E::E2));
    }

    #[derive(PartialEq, Debug)]
    enum F {
        E1,
    }

    impl IServiceError for F {
        fn error_type(&self) -> String {
            "e1".to_string()
        }
    }

    #[test]
    fn it_should_distinguish_between_different_types_with_same_name() {
        let e1 = ServiceError::only(E::E1);
        let e2 = ServiceError::only(F::E1);

        assert!(!e1.is_error_of(F::E1));
        assert!(!e2.is_error_of(E::E1));
    }

    #[test]
    fn it_should_hide_details_of_server_errors() {
        let err = ServiceError::new(E::E1, Error::msg("disk on fire"));
        assert_eq!(err.to_secure_error_response().message, "e1");

        let err = ServiceError::new(E::E1, Error::msg("disk on fire")).with_message("not updated");
        assert_eq!(err.to_secure_error_response().message, "not updated");
    }

    #[test]
    fn it_should_show_messages_of_client_errors() {
        let err = ServiceError::new(E::E2, Error::msg("no such tweet"));
        assert_eq!(err.to_secure_error_response().message, "no such tweet");

        let err = GeneralError::forbidden("nope");
        assert_eq!(err.status_code(), http::StatusCode::FORBIDDEN);
        assert_eq!(err.message(), Some("nope"));
    }
}
