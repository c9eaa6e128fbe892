use super::{
    AiSearchResult, ApiError, LoginRequest, MovieApi, MoviePage, RegisterRequest, ReviewPage,
    decode_envelope,
};
use crate::catalog::FilterState;
use crate::config::Config;
use crate::model::{Celebrity, CelebritySummary, Envelope, GenreOption, Movie, Review, Session, StatsPayload};
use crate::review::NewReview;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// reqwest-backed client for the MovieMind backend.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("moviemind/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        label: &str,
        request: RequestBuilder,
    ) -> Result<Envelope<T>, ApiError> {
        debug!(request = label, "sending");
        let response = request.send().await.inspect_err(|e| {
            warn!(request = label, error = %e, "request failed");
        })?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        let result = decode_envelope(status, &body);
        if let Err(e) = &result {
            warn!(request = label, status, error = %e, "backend rejected request");
        }
        result
    }
}

#[async_trait]
impl MovieApi for HttpClient {
    async fn list_movies(&self, filters: &FilterState, page: u32, per_page: u32) -> Result<MoviePage, ApiError> {
        let mut query = vec![("page", page.to_string()), ("per_page", per_page.to_string())];
        query.extend(filters.query_pairs());
        let request = self.client.get(self.url("/movies")).query(&query);
        let envelope: Envelope<Vec<Movie>> = self.send("list_movies", request).await?;
        let pagination = envelope.pagination.clone();
        Ok(MoviePage {
            movies: envelope.into_data()?,
            pagination,
        })
    }

    async fn movie(&self, movie_id: i64) -> Result<Movie, ApiError> {
        let request = self.client.get(self.url(&format!("/movies/{movie_id}")));
        self.send("movie", request).await?.into_data()
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Movie>, ApiError> {
        let request = self
            .client
            .get(self.url("/search"))
            .query(&[("keyword", keyword)]);
        self.send("search", request).await?.into_data()
    }

    async fn ai_search(&self, query: &str) -> Result<AiSearchResult, ApiError> {
        let request = self
            .client
            .post(self.url("/ai-search"))
            .json(&serde_json::json!({ "query": query }));
        let envelope: Envelope<Vec<Movie>> = self.send("ai_search", request).await?;
        let query_info = envelope.query_info.clone().unwrap_or_default();
        Ok(AiSearchResult {
            movies: envelope.data.unwrap_or_default(),
            query_info,
        })
    }

    async fn genres(&self) -> Result<Vec<GenreOption>, ApiError> {
        let request = self.client.get(self.url("/genres"));
        self.send("genres", request).await?.into_data()
    }

    async fn reviews(&self, movie_id: i64, per_page: u32) -> Result<ReviewPage, ApiError> {
        let request = self
            .client
            .get(self.url(&format!("/reviews/{movie_id}")))
            .query(&[("per_page", per_page)]);
        let envelope: Envelope<Vec<Review>> = self.send("reviews", request).await?;
        let reviews = envelope.data.unwrap_or_default();
        let total = envelope
            .pagination
            .map(|p| p.total)
            .unwrap_or(reviews.len() as u64);
        Ok(ReviewPage { reviews, total })
    }

    async fn create_review(&self, movie_id: i64, review: &NewReview) -> Result<Review, ApiError> {
        let request = self
            .client
            .post(self.url(&format!("/reviews/{movie_id}")))
            .json(review);
        self.send("create_review", request).await?.into_data()
    }

    async fn celebrity(&self, name: &str) -> Result<Celebrity, ApiError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::MissingParameter("celebrity name"));
        }
        let path = format!("/celebrities/{}", urlencoding::encode(name));
        let request = self.client.get(self.url(&path));
        self.send("celebrity", request).await?.into_data()
    }

    async fn celebrities(&self, role: Option<&str>) -> Result<Vec<CelebritySummary>, ApiError> {
        let mut request = self.client.get(self.url("/celebrities"));
        if let Some(role) = role {
            request = request.query(&[("role", role)]);
        }
        self.send("celebrities", request).await?.into_data()
    }

    async fn stats(&self) -> Result<StatsPayload, ApiError> {
        let request = self.client.get(self.url("/stats"));
        self.send("stats", request).await?.into_data()
    }

    async fn login(&self, request: &LoginRequest) -> Result<Session, ApiError> {
        let builder = self.client.post(self.url("/auth/login")).json(request);
        self.send("login", builder).await?.into_data()
    }

    async fn register(&self, request: &RegisterRequest) -> Result<Session, ApiError> {
        let builder = self.client.post(self.url("/auth/register")).json(request);
        self.send("register", builder).await?.into_data()
    }

    async fn probe_image(&self, url: &str) -> Result<(), ApiError> {
        let response = self.client.head(url).send().await?;
        response.error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = Config {
            api_base_url: "http://localhost:5000/api/".to_string(),
            ..Config::default()
        };
        let client = HttpClient::new(&config).unwrap();
        assert_eq!(client.url("/movies/3"), "http://localhost:5000/api/movies/3");
    }

    #[tokio::test]
    async fn test_empty_celebrity_name_sends_nothing() {
        // Unroutable base URL: reaching the network would fail differently.
        let config = Config {
            api_base_url: "http://127.0.0.1:9".to_string(),
            ..Config::default()
        };
        let client = HttpClient::new(&config).unwrap();
        let err = client.celebrity("   ").await.unwrap_err();
        assert!(matches!(err, ApiError::MissingParameter(_)));
    }
}
