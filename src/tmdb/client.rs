use axum::http::StatusCode;
use axum::body::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use tracing::debug;

use super::error::TmdbError;
use super::params::UpstreamParams;

/// A successful upstream answer, relayed to the caller as is.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Client for the upstream movie-metadata API.
///
/// Holds the base URL and bearer credential; every call is a single GET with
/// no retries.
#[derive(Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TmdbClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub async fn get(
        &self,
        path: &str,
        params: &UpstreamParams,
    ) -> Result<UpstreamResponse, TmdbError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, params = ?params, "upstream request");

        let transport = |source| TmdbError::Transport {
            path: path.to_string(),
            source,
        };

        let response = self
            .http
            .get(&url)
            .query(params)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(transport)?;

        let status = StatusCode::from_u16(response.status().as_u16())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if !status.is_success() {
            return Err(TmdbError::Status {
                path: path.to_string(),
                status,
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        Ok(UpstreamResponse { status, body })
    }
}
