use axum::extract::rejection::JsonRejection;
use shared_types::AppError;
use std::collections::HashMap;

use crate::store::StoreError;

/// Convert a store failure into an opaque AppError. The detail is logged,
/// never returned to the client.
pub fn store_to_app_error(err: StoreError) -> AppError {
    tracing::error!(error = %err, "store call failed");
    AppError::database("Storage unavailable")
}

/// Extension trait providing `.into_app_error()` on StoreError.
pub trait StoreErrorExt {
    fn into_app_error(self) -> AppError;
}

impl StoreErrorExt for StoreError {
    fn into_app_error(self) -> AppError {
        store_to_app_error(self)
    }
}

/// Map a JSON body rejection to an AppError.
///
/// Well-formed JSON with a wrongly typed field is a validation error (422);
/// anything else about the body is a bad request (400).
pub fn json_rejection_to_app_error(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(e) => {
            let mut fields = HashMap::new();
            fields.insert("body".to_string(), e.body_text());
            AppError::validation("Validation failed", fields)
        }
        other => AppError::bad_request(other.body_text()),
    }
}
