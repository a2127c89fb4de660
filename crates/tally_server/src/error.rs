//! Maps engine failures onto HTTP responses with a `{error, message}` body.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tally_engine::TallyError;
use tally_logging::{tally_error, tally_warn};

#[derive(Debug)]
pub struct ApiError(pub TallyError);

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            TallyError::Validation(_) => StatusCode::BAD_REQUEST,
            TallyError::UpstreamFetch(_) => StatusCode::BAD_GATEWAY,
            TallyError::Generation(err) if err.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            TallyError::Generation(_) => StatusCode::SERVICE_UNAVAILABLE,
            TallyError::MalformedModelResponse { .. } => StatusCode::BAD_GATEWAY,
            TallyError::CountMismatch { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn kind(&self) -> &'static str {
        match &self.0 {
            TallyError::Validation(_) => "ValidationError",
            TallyError::UpstreamFetch(_) => "UpstreamFetchError",
            TallyError::Generation(_) => "GenerationError",
            TallyError::MalformedModelResponse { .. } => "MalformedModelResponse",
            TallyError::CountMismatch { .. } => "CountMismatchError",
        }
    }
}

impl From<TallyError> for ApiError {
    fn from(err: TallyError) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(TallyError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.0.to_string();
        if status.is_server_error() {
            tally_error!("{} ({}): {}", self.kind(), status.as_u16(), message);
        } else {
            tally_warn!("{} ({}): {}", self.kind(), status.as_u16(), message);
        }
        let body = ErrorBody {
            error: self.kind(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_engine::{FailureKind, FetchError, GenerationError};

    #[test]
    fn status_table() {
        let cases = [
            (TallyError::Validation("x".into()), 400, "ValidationError"),
            (
                TallyError::UpstreamFetch(FetchError::new(FailureKind::HttpStatus(503), "down")),
                502,
                "UpstreamFetchError",
            ),
            (
                TallyError::Generation(GenerationError::Timeout),
                504,
                "GenerationError",
            ),
            (
                TallyError::Generation(GenerationError::RateLimited { attempts: 3 }),
                503,
                "GenerationError",
            ),
            (
                TallyError::MalformedModelResponse {
                    reply: "2,one".into(),
                    segment: "one".into(),
                },
                502,
                "MalformedModelResponse",
            ),
            (
                TallyError::CountMismatch {
                    expected: 2,
                    actual: 3,
                },
                502,
                "CountMismatchError",
            ),
        ];
        for (err, status, kind) in cases {
            let api = ApiError(err);
            assert_eq!(api.status().as_u16(), status, "{kind}");
            assert_eq!(api.kind(), kind);
        }
    }
}
