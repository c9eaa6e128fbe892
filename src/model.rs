use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Delimiters accepted in list-like fields that arrive as one string.
static LIST_DELIMITERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,/，／]").expect("static delimiter pattern"));

/// A list-like field that the backend sends either as a delimited string or as an array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListField {
    Text(String),
    Items(Vec<String>),
}

impl ListField {
    /// Canonical form: ordered, trimmed, empties dropped.
    pub fn normalized(&self) -> Vec<String> {
        match self {
            ListField::Text(s) => split_delimited(s),
            ListField::Items(items) => items.iter().flat_map(|s| split_delimited(s)).collect(),
        }
    }
}

fn split_delimited(s: &str) -> Vec<String> {
    LIST_DELIMITERS
        .split(s)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalize an optional list field. Absent fields yield an empty list.
pub fn normalize_list(field: Option<&ListField>) -> Vec<String> {
    field.map(ListField::normalized).unwrap_or_default()
}

/// Loosely typed scalar (years, durations, ids) that may be a number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    pub fn is_blank(&self) -> bool {
        matches!(self, Scalar::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(v) if v.fract() == 0.0 => write!(f, "{}", *v as i64),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Text(s) => f.write_str(s.trim()),
        }
    }
}

/// Movie rating as sent by the backend: a number, a numeric string, or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RatingValue {
    Number(f64),
    Text(String),
}

impl RatingValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RatingValue::Number(v) => Some(*v),
            RatingValue::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }
}

/// The logged-in user as cached on this machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: i64,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub movie_id: i64,
    #[serde(default)]
    pub rank: Option<i64>,
    #[serde(default)]
    pub cn_title: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub rating: Option<RatingValue>,
    #[serde(default)]
    pub year: Option<Scalar>,
    #[serde(default)]
    pub durations: Option<Scalar>,
    #[serde(default)]
    pub languages: Option<ListField>,
    #[serde(default)]
    pub countries: Option<ListField>,
    #[serde(default)]
    pub genres: Option<ListField>,
    #[serde(default)]
    pub directors: Option<ListField>,
    #[serde(default)]
    pub actors: Option<ListField>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub douban_id: Option<Scalar>,
    #[serde(default)]
    pub introduction: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Douban's own comment tally, carried over from the scraped record.
    #[serde(default)]
    pub comment_count: Option<i64>,
    /// Reviews written through MovieMind; only the detail endpoint sends it.
    #[serde(default)]
    pub review_count: Option<i64>,
}

impl Movie {
    /// Display title, falling back to the original title and then the id.
    pub fn title(&self) -> String {
        [self.cn_title.as_deref(), self.original_title.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", self.movie_id))
    }

    pub fn synopsis(&self) -> Option<&str> {
        [self.introduction.as_deref(), self.description.as_deref()]
            .into_iter()
            .flatten()
            .find(|t| !t.trim().is_empty())
    }

    pub fn genre_list(&self) -> Vec<String> {
        normalize_list(self.genres.as_ref())
    }

    pub fn director_list(&self) -> Vec<String> {
        normalize_list(self.directors.as_ref())
    }

    pub fn actor_list(&self) -> Vec<String> {
        normalize_list(self.actors.as_ref())
    }

    /// Review tally for display: MovieMind's own count when the backend
    /// sent one, otherwise the scraped comment count.
    pub fn review_total(&self) -> Option<i64> {
        self.review_count.or(self.comment_count)
    }

    pub fn poster(&self) -> Option<&str> {
        self.poster_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub comment_id: Option<Scalar>,
    #[serde(default)]
    pub review_id: Option<i64>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub user_rating: Option<RatingValue>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Review {
    /// Identifying number shown next to the review.
    pub fn number(&self) -> String {
        match (&self.comment_id, self.review_id) {
            (Some(id), _) if !id.is_blank() => id.to_string(),
            (_, Some(id)) => id.to_string(),
            _ => "-".to_string(),
        }
    }

    pub fn author(&self) -> &str {
        self.username
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or("anonymous")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Celebrity {
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub total_movies: i64,
    #[serde(default)]
    pub as_director: Vec<Movie>,
    #[serde(default)]
    pub as_actor: Vec<Movie>,
}

/// One row of the `/celebrities` index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CelebritySummary {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreOption {
    pub name: String,
    #[serde(default)]
    pub movie_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecadeBucket {
    pub decade: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreBucket {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingBucket {
    pub rating_group: Option<Scalar>,
    pub count: i64,
}

/// Aggregate distributions from `/stats`. Each one is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsPayload {
    #[serde(default)]
    pub year_distribution: Option<Vec<DecadeBucket>>,
    #[serde(default)]
    pub genre_distribution: Option<Vec<GenreBucket>>,
    #[serde(default)]
    pub rating_distribution: Option<Vec<RatingBucket>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaginationInfo {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub total_pages: u32,
}

fn first_page() -> u32 {
    1
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryInfo {
    #[serde(default)]
    pub original_query: Option<String>,
    #[serde(default)]
    pub interpretation: String,
    #[serde(default)]
    pub generated_sql: Option<String>,
}

/// Uniform response wrapper used by every backend endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub pagination: Option<PaginationInfo>,
    #[serde(default)]
    pub query_info: Option<QueryInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_string_and_array_agree() {
        let text = ListField::Text(" 剧情 / 爱情,  / 同性 ".to_string());
        let items = ListField::Items(vec![
            "剧情".to_string(),
            " 爱情 ".to_string(),
            "".to_string(),
            "同性".to_string(),
        ]);
        assert_eq!(text.normalized(), vec!["剧情", "爱情", "同性"]);
        assert_eq!(text.normalized(), items.normalized());
    }

    #[test]
    fn test_normalize_absent_is_empty() {
        assert!(normalize_list(None).is_empty());
        assert!(ListField::Text("  ".to_string()).normalized().is_empty());
    }

    #[test]
    fn test_movie_deserializes_mixed_shapes() {
        let json = r#"{
            "movie_id": 1, "rank": 1, "cn_title": "肖申克的救赎",
            "rating": "9.7", "year": 1994, "durations": "142分钟",
            "genres": "剧情/犯罪", "directors": ["弗兰克·德拉邦特"],
            "actors": "蒂姆·罗宾斯, 摩根·弗里曼",
            "review_count": 12
        }"#;
        let movie: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.genre_list(), vec!["剧情", "犯罪"]);
        assert_eq!(movie.director_list(), vec!["弗兰克·德拉邦特"]);
        assert_eq!(movie.actor_list(), vec!["蒂姆·罗宾斯", "摩根·弗里曼"]);
        assert_eq!(movie.review_total(), Some(12));
        assert_eq!(movie.rating.as_ref().and_then(RatingValue::as_f64), Some(9.7));
        assert_eq!(movie.year.unwrap().to_string(), "1994");
    }

    #[test]
    fn test_detail_payload_with_both_counts() {
        let json = r#"{
            "movie_id": 1, "rank": 1, "cn_title": "肖申克的救赎",
            "original_title": "The Shawshank Redemption", "rating": 9.7,
            "year": "1994", "imdb_id": "tt0111161", "douban_id": 1292052,
            "comment_count": 3076925, "review_count": 12,
            "created_at": "Tue, 14 Feb 2023 18:37:03 GMT"
        }"#;
        let movie: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.comment_count, Some(3076925));
        assert_eq!(movie.review_count, Some(12));
        assert_eq!(movie.review_total(), Some(12));

        let listed = Movie { comment_count: Some(40), ..movie };
        let listed = Movie { review_count: None, ..listed };
        assert_eq!(listed.review_total(), Some(40));
    }

    #[test]
    fn test_movie_title_fallbacks() {
        let movie = Movie {
            movie_id: 7,
            cn_title: Some("  ".to_string()),
            original_title: Some("Heat".to_string()),
            ..Default::default()
        };
        assert_eq!(movie.title(), "Heat");
        let bare = Movie { movie_id: 9, ..Default::default() };
        assert_eq!(bare.title(), "#9");
    }

    #[test]
    fn test_review_number_and_author() {
        let review = Review {
            comment_id: Some(Scalar::Text("1700000000000".to_string())),
            review_id: Some(3),
            ..Default::default()
        };
        assert_eq!(review.number(), "1700000000000");
        assert_eq!(review.author(), "anonymous");

        let review = Review { review_id: Some(3), username: Some("ann".into()), ..Default::default() };
        assert_eq!(review.number(), "3");
        assert_eq!(review.author(), "ann");
    }

    #[test]
    fn test_envelope_failure_shape() {
        let env: Envelope<Movie> =
            serde_json::from_str(r#"{"success": false, "error": "电影不存在"}"#).unwrap();
        assert!(!env.success);
        assert!(env.data.is_none());
        assert_eq!(env.error.as_deref(), Some("电影不存在"));
    }

    proptest! {
        #[test]
        fn prop_joined_string_matches_array(parts in proptest::collection::vec("[a-z ]{0,6}", 0..6)) {
            let joined = ListField::Text(parts.join("/"));
            let items = ListField::Items(parts.clone());
            prop_assert_eq!(joined.normalized(), items.normalized());
            for item in joined.normalized() {
                prop_assert!(!item.is_empty());
                prop_assert_eq!(item.trim(), item.as_str());
            }
        }
    }
}
