// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::blockchain::SolanaClientError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    pub fn gateway_timeout(message: impl Into<String>) -> Self {
        Self::new(StatusCode::GATEWAY_TIMEOUT, message)
    }
}

impl From<SolanaClientError> for ApiError {
    fn from(err: SolanaClientError) -> Self {
        use SolanaClientError::*;

        let message = err.to_string();
        match err {
            UnknownNetwork(_) | NetworkMismatch { .. } | InvalidAddress(_)
            | InvalidSignature(_) | InvalidAmount(_) => Self::bad_request(message),
            AccountNotFound { .. } => Self::not_found(message),
            UnconfirmedSubmission { .. } => Self::gateway_timeout(message),
            InvalidRpcUrl(_) | TransportFailure(_) => Self::service_unavailable(message),
            // The only key in play is the service's own
            InvalidKey(_) => Self::service_unavailable("Transfer signer is misconfigured"),
            TransactionBuild(_) => Self::new(StatusCode::UNPROCESSABLE_ENTITY, message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn constructors_set_status_and_message() {
        let nf = ApiError::not_found("missing");
        assert_eq!(nf.status, StatusCode::NOT_FOUND);
        assert_eq!(nf.message, "missing");

        let bad = ApiError::bad_request("bad");
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);

        let down = ApiError::service_unavailable("down");
        assert_eq!(down.status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn client_errors_map_to_distinct_statuses() {
        let cases = [
            (
                SolanaClientError::UnknownNetwork("x".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                SolanaClientError::AccountNotFound {
                    owner: "o".into(),
                    mint: "m".into(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                SolanaClientError::TransportFailure("timeout".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                SolanaClientError::UnconfirmedSubmission {
                    signature: "sig".into(),
                    reason: "slow".into(),
                },
                StatusCode::GATEWAY_TIMEOUT,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn invalid_key_message_does_not_leak() {
        let err = ApiError::from(SolanaClientError::InvalidKey("abc...".into()));
        assert!(!err.message.contains("abc"));
    }

    #[tokio::test]
    async fn into_response_returns_json_body() {
        let response = ApiError::bad_request("bad data").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"error":"bad data"}"#);
    }
}
