//! Validating extractors for Axum
//!
//! `ValidatedJson<T>` and `ValidatedForm<T>` work like `axum::Json<T>` and
//! `axum::Form<T>`, but additionally run `validator::Validate::validate()`
//! on the deserialized value. On validation failure they return a 422
//! response with field-level error details.

use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::FromRequest;
use axum::Form;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use super::ApiResponse;

/// An extractor that deserializes JSON and validates it.
///
/// ```ignore
/// async fn handler(ValidatedJson(body): ValidatedJson<LoginRequest>) {
///     // `body` is guaranteed to pass validation
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

/// Same as [`ValidatedJson`] for `application/x-www-form-urlencoded` bodies
pub struct ValidatedForm<T>(pub T);

/// Error type for validating extractor failures.
pub enum ValidatedRejection {
    /// JSON parsing failed.
    JsonError(JsonRejection),
    /// Form parsing failed.
    FormError(FormRejection),
    /// Validation failed.
    ValidationError(validator::ValidationErrors),
}

fn validation_message(errors: &validator::ValidationErrors) -> String {
    let mut field_errors: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let msg = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{}: {}", field, msg)
            })
        })
        .collect();
    field_errors.sort();

    if field_errors.is_empty() {
        "Validation failed".to_string()
    } else {
        field_errors.join("; ")
    }
}

impl IntoResponse for ValidatedRejection {
    fn into_response(self) -> Response {
        match self {
            Self::JsonError(rejection) => {
                let body = ApiResponse::<()>::error(format!("Invalid JSON: {}", rejection));
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Self::FormError(rejection) => {
                let body = ApiResponse::<()>::error(format!("Invalid form: {}", rejection));
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Self::ValidationError(errors) => {
                let body = ApiResponse::<()>::error(validation_message(&errors));
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
        }
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedRejection;

    async fn from_request(
        req: axum::extract::Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedRejection::JsonError)?;

        value
            .validate()
            .map_err(ValidatedRejection::ValidationError)?;

        Ok(ValidatedJson(value))
    }
}

impl<S, T> FromRequest<S> for ValidatedForm<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedRejection;

    async fn from_request(
        req: axum::extract::Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(ValidatedRejection::FormError)?;

        value
            .validate()
            .map_err(ValidatedRejection::ValidationError)?;

        Ok(ValidatedForm(value))
    }
}

// ── Tests ──────────────────────────────────────────────────────
