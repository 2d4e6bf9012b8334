/**
 * Error Conversion
 *
 * `AuthError` implements `IntoResponse`, so handlers return it directly
 * and the framework turns it into a JSON error body:
 *
 * ```json
 * {
 *   "error": "invalid email or password",
 *   "status": 401
 * }
 * ```
 *
 * The body carries only the public message; whatever internal detail the
 * error wraps was logged at the point of failure.
 */

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::types::AuthError;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {}", self);
        }

        let body = serde_json::json!({
            "error": self.public_message(),
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::decision::DenyReason;

    #[test]
    fn test_denied_response_status() {
        let response = AuthError::Denied(DenyReason::UnknownUser).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_conflict_response_status() {
        let response = AuthError::conflict("email already registered").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
