use crate::errors::{error::ErrorResponse, repository::RepositoryError, service::ServiceError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug)]
pub enum HttpError {
    BadRequest(String),
    Validation(Vec<String>),
    NotFound(String),
    Conflict(String),
    Internal { error: String, details: String },
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::BadRequest(_) | HttpError::Validation(_) => StatusCode::BAD_REQUEST,
            HttpError::NotFound(_) => StatusCode::NOT_FOUND,
            HttpError::Conflict(_) => StatusCode::CONFLICT,
            HttpError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn classify(err: &ServiceError, message: String, wrapped: bool) -> HttpError {
    match err {
        ServiceError::Validation(errors) => {
            if errors.len() > 1 && !wrapped {
                HttpError::Validation(errors.clone())
            } else {
                HttpError::BadRequest(message)
            }
        }
        ServiceError::NotFound(_) => HttpError::NotFound(message),
        ServiceError::Conflict(_) => HttpError::Conflict(message),
        ServiceError::Repo(repo_err) => HttpError::Internal {
            error: "Database operation failed".into(),
            details: match repo_err {
                RepositoryError::Sqlx(e) => e.to_string(),
                other => other.to_string(),
            },
        },
        ServiceError::Internal(msg) => HttpError::Internal {
            error: msg.clone(),
            details: message,
        },
        ServiceError::BulkItemFailed { source, .. } => classify(source, message, true),
    }
}

impl From<ServiceError> for HttpError {
    fn from(err: ServiceError) -> Self {
        let message = match &err {
            ServiceError::Validation(errors) if errors.len() == 1 => errors[0].clone(),
            ServiceError::NotFound(msg) | ServiceError::Conflict(msg) => msg.clone(),
            other => other.to_string(),
        };

        classify(&err, message, false)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            HttpError::BadRequest(msg) | HttpError::NotFound(msg) | HttpError::Conflict(msg) => {
                ErrorResponse::new(msg)
            }
            HttpError::Validation(errors) => {
                ErrorResponse::new("Validation failed").with_details(json!(errors))
            }
            HttpError::Internal { error, details } => {
                ErrorResponse::new(error).with_details(json!(details))
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ServiceError::validation("product_id: Missing required field"), StatusCode::BAD_REQUEST)]
    #[case(ServiceError::Validation(vec!["a".into(), "b".into()]), StatusCode::BAD_REQUEST)]
    #[case(ServiceError::NotFound("Inventory item not found".into()), StatusCode::NOT_FOUND)]
    #[case(ServiceError::Conflict("Product ID already exists".into()), StatusCode::CONFLICT)]
    #[case(ServiceError::Repo(RepositoryError::Custom("boom".into())), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(ServiceError::Internal("Failed to delete inventory item".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    fn maps_service_errors_to_status(#[case] err: ServiceError, #[case] expected: StatusCode) {
        assert_eq!(HttpError::from(err).status(), expected);
    }

    #[test]
    fn bulk_failure_uses_failing_item_status_and_names_it() {
        let err = ServiceError::BulkItemFailed {
            index: 1,
            id: 42,
            source: Box::new(ServiceError::Conflict("Product ID already exists".into())),
        };

        match HttpError::from(err) {
            HttpError::Conflict(msg) => {
                assert!(msg.contains("item 42"));
                assert!(msg.contains("index 1"));
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn infrastructure_errors_hide_driver_text_behind_generic_message() {
        let err = ServiceError::Repo(RepositoryError::Sqlx(sqlx::Error::PoolTimedOut));

        match HttpError::from(err) {
            HttpError::Internal { error, details } => {
                assert_eq!(error, "Database operation failed");
                assert!(!details.is_empty());
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
    }
}
