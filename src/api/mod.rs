mod http;

pub use http::HttpClient;

use crate::catalog::FilterState;
use crate::model::{
    Celebrity, CelebritySummary, Envelope, GenreOption, Movie, PaginationInfo, QueryInfo, Review, Session,
    StatsPayload,
};
use crate::review::NewReview;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Everything that can go wrong talking to the backend.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Backend error: HTTP {status} - {}", .message.as_deref().unwrap_or("no message"))]
    Backend { status: u16, message: Option<String> },

    #[error("Response decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Response carried no data")]
    EmptyResponse,
}

pub const NETWORK_ERROR_MESSAGE: &str = "Network error, please check your connection and try again";

impl ApiError {
    /// Text shown to the user. Backend-provided messages win; `fallback` is the
    /// per-action generic message.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::MissingParameter(name) => format!("Missing {name}, nothing to load"),
            ApiError::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            ApiError::Backend {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Backend { message: None, .. } | ApiError::Decode(_) | ApiError::EmptyResponse => {
                fallback.to_string()
            }
        }
    }
}

pub(crate) fn decode_envelope<T: serde::de::DeserializeOwned>(
    status: u16,
    body: &[u8],
) -> Result<Envelope<T>, ApiError> {
    let ok = (200..300).contains(&status);
    let envelope: Envelope<T> = match serde_json::from_slice(body) {
        Ok(envelope) => envelope,
        Err(e) if ok => return Err(ApiError::Decode(e)),
        Err(_) => return Err(ApiError::Backend { status, message: None }),
    };
    if !ok || !envelope.success {
        return Err(ApiError::Backend {
            status,
            message: envelope.error.filter(|m| !m.trim().is_empty()),
        });
    }
    Ok(envelope)
}

impl<T> Envelope<T> {
    pub fn into_data(self) -> Result<T, ApiError> {
        self.data.ok_or(ApiError::EmptyResponse)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MoviePage {
    pub movies: Vec<Movie>,
    pub pagination: Option<PaginationInfo>,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewPage {
    pub reviews: Vec<Review>,
    pub total: u64,
}

#[derive(Debug, Clone, Default)]
pub struct AiSearchResult {
    pub movies: Vec<Movie>,
    pub query_info: QueryInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// The MovieMind REST surface, one method per endpoint.
#[async_trait]
pub trait MovieApi: Send + Sync {
    async fn list_movies(&self, filters: &FilterState, page: u32, per_page: u32) -> Result<MoviePage, ApiError>;
    async fn movie(&self, movie_id: i64) -> Result<Movie, ApiError>;
    async fn search(&self, keyword: &str) -> Result<Vec<Movie>, ApiError>;
    async fn ai_search(&self, query: &str) -> Result<AiSearchResult, ApiError>;
    async fn genres(&self) -> Result<Vec<GenreOption>, ApiError>;
    async fn reviews(&self, movie_id: i64, per_page: u32) -> Result<ReviewPage, ApiError>;
    async fn create_review(&self, movie_id: i64, review: &NewReview) -> Result<Review, ApiError>;
    async fn celebrity(&self, name: &str) -> Result<Celebrity, ApiError>;
    /// Celebrity index, optionally narrowed to `"director"` or `"actor"`.
    async fn celebrities(&self, role: Option<&str>) -> Result<Vec<CelebritySummary>, ApiError>;
    async fn stats(&self) -> Result<StatsPayload, ApiError>;
    async fn login(&self, request: &LoginRequest) -> Result<Session, ApiError>;
    async fn register(&self, request: &RegisterRequest) -> Result<Session, ApiError>;
    /// Check that an image URL is reachable.
    async fn probe_image(&self, url: &str) -> Result<(), ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_success_envelope() {
        let body = br#"{"success": true, "data": [{"name": "Drama", "movie_count": 120}]}"#;
        let env: Envelope<Vec<GenreOption>> = decode_envelope(200, body).unwrap();
        assert_eq!(env.into_data().unwrap()[0].name, "Drama");
    }

    #[test]
    fn test_decode_backend_failure_keeps_message() {
        let body = br#"{"success": false, "error": "Movie not found"}"#;
        let err = decode_envelope::<Movie>(404, body).unwrap_err();
        assert_eq!(err.user_message("Failed to load movie"), "Movie not found");
    }

    #[test]
    fn test_decode_success_flag_false_on_200() {
        let body = br#"{"success": false}"#;
        let err = decode_envelope::<Movie>(200, body).unwrap_err();
        assert!(matches!(err, ApiError::Backend { status: 200, message: None }));
        assert_eq!(err.user_message("Failed to load movie"), "Failed to load movie");
    }

    #[test]
    fn test_decode_non_json_error_page() {
        let err = decode_envelope::<Movie>(502, b"<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, ApiError::Backend { status: 502, message: None }));
    }

    #[test]
    fn test_decode_malformed_success_body() {
        let err = decode_envelope::<Movie>(200, b"not json").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn test_missing_data_is_empty_response() {
        let env: Envelope<Movie> = decode_envelope(200, br#"{"success": true}"#).unwrap();
        assert!(matches!(env.into_data(), Err(ApiError::EmptyResponse)));
    }

    #[test]
    fn test_user_message_variants() {
        let err = ApiError::MissingParameter("movie id");
        assert!(err.user_message("x").contains("movie id"));
        let err = ApiError::Backend { status: 500, message: Some("boom".into()) };
        assert_eq!(err.to_string(), "Backend error: HTTP 500 - boom");
    }
}
