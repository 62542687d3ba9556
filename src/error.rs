//! Error types for the VHS Club server

use std::collections::HashMap;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Stable error codes exposed to API clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    DbFailure = 2,
    NoSuchUser = 3,
    NoSuchTape = 4,
    NoActiveRental = 5,
    TapeUnavailable = 6,
    MaxRentalsReached = 7,
    Duplicate = 8,
    BadValue = 9,
    InvalidIdentifier = 10,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Tape not found")]
    TapeNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("No active rental for this tape and user")]
    RentalNotFound,

    #[error("User already has the maximum number of active rentals")]
    MaxRentalsPerUser,

    #[error("All copies of this tape are currently rented out")]
    TapeUnavailable,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Input validation failed")]
    Validation(#[from] ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidIdentifier(_)
            | AppError::Validation(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::TapeNotFound | AppError::UserNotFound | AppError::RentalNotFound => {
                StatusCode::NOT_FOUND
            }
            AppError::MaxRentalsPerUser | AppError::TapeUnavailable | AppError::Conflict(_) => {
                StatusCode::CONFLICT
            }
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::InvalidIdentifier(_) => ErrorCode::InvalidIdentifier,
            AppError::TapeNotFound => ErrorCode::NoSuchTape,
            AppError::UserNotFound => ErrorCode::NoSuchUser,
            AppError::RentalNotFound => ErrorCode::NoActiveRental,
            AppError::MaxRentalsPerUser => ErrorCode::MaxRentalsReached,
            AppError::TapeUnavailable => ErrorCode::TapeUnavailable,
            AppError::Database(_) => ErrorCode::DbFailure,
            AppError::Validation(_) | AppError::BadRequest(_) => ErrorCode::BadValue,
            AppError::Conflict(_) => ErrorCode::Duplicate,
            AppError::Internal(_) => ErrorCode::Failure,
        }
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<HashMap<String, String>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        let (message, fields) = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                ("Database error".to_string(), None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("Internal server error".to_string(), None)
            }
            AppError::Validation(errors) => {
                (self.to_string(), Some(field_messages(errors)))
            }
            AppError::InvalidIdentifier(msg)
            | AppError::BadRequest(msg)
            | AppError::Conflict(msg) => (msg.clone(), None),
            _ => (self.to_string(), None),
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            fields,
        });

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// One readable message per invalid field, nested fields flattened as `parent[idx].field`
fn field_messages(errors: &ValidationErrors) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    collect_field_messages(errors, "", &mut fields);
    fields
}

fn collect_field_messages(
    errors: &ValidationErrors,
    prefix: &str,
    out: &mut HashMap<String, String>,
) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                if let Some(error) = field_errors.first() {
                    out.insert(path, describe(error));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_field_messages(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    collect_field_messages(inner, &format!("{}[{}]", path, idx), out);
                }
            }
        }
    }
}

fn describe(error: &validator::ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    let param = |name: &str| {
        error
            .params
            .get(name)
            .map(|v| v.to_string())
            .unwrap_or_default()
    };

    match &*error.code {
        "required" => "This field is required".to_string(),
        "email" => "Must be a valid email address".to_string(),
        "alphanum" => "Must be formed of only letters and/or numbers".to_string(),
        "length" if error.params.contains_key("min") && !error.params.contains_key("max") => {
            format!("Must be at least {} characters", param("min"))
        }
        "length" if error.params.contains_key("max") && !error.params.contains_key("min") => {
            format!("Must be at most {} characters", param("max"))
        }
        "length" => format!(
            "Must be between {} and {} characters",
            param("min"),
            param("max")
        ),
        "range" if error.params.contains_key("min") => {
            format!("Must be at least {}", param("min"))
        }
        _ => "Invalid value".to_string(),
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Signup {
        #[validate(email)]
        email: String,
        #[validate(length(min = 8))]
        password: String,
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::TapeNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::TapeUnavailable.status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::MaxRentalsPerUser.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::InvalidIdentifier("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_field_messages() {
        let signup = Signup {
            email: "not-an-email".into(),
            password: "short".into(),
        };
        let errors = signup.validate().unwrap_err();
        let fields = field_messages(&errors);

        assert_eq!(fields["email"], "Must be a valid email address");
        assert_eq!(fields["password"], "Must be at least 8 characters");
    }
}
