use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Failure of a single upstream call.
#[derive(Debug, thiserror::Error)]
pub enum TmdbError {
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{path} returned {status}")]
    Status { path: String, status: StatusCode },
}

impl TmdbError {
    pub fn path(&self) -> &str {
        match self {
            TmdbError::Transport { path, .. } | TmdbError::Status { path, .. } => path,
        }
    }

    /// Upstream status, if the upstream answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            TmdbError::Transport { source, .. } => source
                .status()
                .and_then(|s| StatusCode::from_u16(s.as_u16()).ok()),
            TmdbError::Status { status, .. } => Some(*status),
        }
    }
}

/// Errors returned to the browser.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Query parameter is required")]
    MissingQuery,
    #[error("Failed to fetch {what}")]
    Upstream {
        what: &'static str,
        #[source]
        source: TmdbError,
    },
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self.to_string();
        match &self {
            ApiError::MissingQuery => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody { error, path: None })).into_response()
            }
            ApiError::Upstream { source, .. } => {
                let status = source
                    .status()
                    .filter(|s| !s.is_success())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                let body = ErrorBody {
                    error,
                    path: Some(source.path()),
                };
                (status, Json(body)).into_response()
            }
        }
    }
}
