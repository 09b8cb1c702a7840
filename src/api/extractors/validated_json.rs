//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::errors::AppError;

/// JSON body that has passed `validator` checks.
///
/// A field failing an `email` rule is reported as `InvalidEmailFormat`, the
/// same error the domain raises, so clients see one code for a bad address.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value.validate().map_err(|e| rejection(&e))?;

        Ok(ValidatedJson(value))
    }
}

fn rejection(errors: &ValidationErrors) -> AppError {
    let field_errors = errors.field_errors();

    let bad_email = field_errors
        .values()
        .flat_map(|errs| errs.iter())
        .any(|e| e.code == "email");
    if bad_email {
        return AppError::InvalidEmailFormat;
    }

    let message = field_errors
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ");
    AppError::validation(message)
}
