//! Standalone HTML page for a movie's reviews.

use crate::api::{ApiError, MovieApi};
use crate::config::REVIEW_PAGE_SIZE;
use crate::detail::info_fields;
use crate::format::{self, escape_html};
use crate::model::{Movie, Review};
use std::fmt::{self, Write as _};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render error: {0}")]
    Render(#[from] fmt::Error),
}

impl ExportError {
    pub fn user_message(&self) -> String {
        match self {
            ExportError::Api(e) => e.user_message("Failed to load the movie"),
            ExportError::Io(e) => format!("Could not write the export file: {e}"),
            ExportError::Render(_) => "Could not render the export page".to_string(),
        }
    }
}

const STYLE: &str = "body{font-family:sans-serif;max-width:52em;margin:2em auto;padding:0 1em}\
dt{font-weight:bold;float:left;width:8em}dd{margin-left:9em}\
.review{border-top:1px solid #ccc;padding:.6em 0}.stars{color:#e0a800}\
.meta{color:#777;font-size:.85em}";

/// Render the page. Every backend-supplied string is escaped.
pub fn render_html(movie: &Movie, reviews: &[Review], total: u64) -> Result<String, fmt::Error> {
    let title = escape_html(&movie.title());
    let mut out = String::new();
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html><head><meta charset=\"utf-8\"><title>{title}</title>")?;
    writeln!(out, "<style>{STYLE}</style></head><body>")?;
    writeln!(out, "<h1>{title}</h1>")?;
    if let Some(original) = movie.original_title.as_deref().filter(|t| !t.trim().is_empty()) {
        writeln!(out, "<p><em>{}</em></p>", escape_html(original))?;
    }

    writeln!(out, "<dl>")?;
    for (label, value) in info_fields(movie) {
        writeln!(out, "<dt>{label}</dt><dd>{}</dd>", escape_html(&value))?;
    }
    writeln!(out, "</dl>")?;
    if let Some(synopsis) = movie.synopsis() {
        writeln!(out, "<p>{}</p>", escape_html(synopsis))?;
    }

    writeln!(out, "<h2>Reviews ({total})</h2>")?;
    if reviews.is_empty() {
        writeln!(out, "<p>No reviews yet</p>")?;
    }
    for review in reviews {
        let when = review
            .created_at
            .as_deref()
            .map(format::format_timestamp)
            .unwrap_or_default();
        writeln!(out, "<div class=\"review\">")?;
        writeln!(
            out,
            "<p class=\"meta\">#{} {} <span class=\"stars\">{}</span> {}</p>",
            escape_html(&review.number()),
            escape_html(review.author()),
            format::star_string(review.user_rating.as_ref()),
            escape_html(&when),
        )?;
        writeln!(
            out,
            "<p>{}</p>",
            escape_html(review.comment.as_deref().unwrap_or_default())
        )?;
        writeln!(out, "</div>")?;
    }
    writeln!(out, "</body></html>")?;
    Ok(out)
}

/// Fetch the movie and its first page of reviews, then write the page to `output`.
pub async fn export_reviews(api: &dyn MovieApi, movie_id: i64, output: &Path) -> Result<usize, ExportError> {
    let (movie, reviews) = tokio::join!(api.movie(movie_id), api.reviews(movie_id, REVIEW_PAGE_SIZE));
    let movie = movie?;
    let reviews = reviews?;
    let html = render_html(&movie, &reviews.reviews, reviews.total)?;
    tokio::fs::write(output, html).await?;
    info!(movie_id, path = %output.display(), count = reviews.reviews.len(), "exported reviews");
    Ok(reviews.reviews.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ListField, RatingValue};

    fn movie() -> Movie {
        Movie {
            movie_id: 5,
            cn_title: Some("Tom & Jerry".into()),
            genres: Some(ListField::Text("Comedy/Animation".into())),
            introduction: Some("Cat <chases> mouse".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_user_text_is_escaped() {
        let reviews = vec![Review {
            review_id: Some(1),
            username: Some("<b>mallory</b>".into()),
            user_rating: Some(RatingValue::Number(4.0)),
            comment: Some("<script>alert('x')</script>".into()),
            ..Default::default()
        }];
        let html = render_html(&movie(), &reviews, 1).unwrap();
        assert!(html.contains("<title>Tom &amp; Jerry</title>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(html.contains("&lt;b&gt;mallory&lt;/b&gt;"));
        assert!(html.contains("Cat &lt;chases&gt; mouse"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("★★★★☆"));
        assert!(html.contains("Comedy / Animation"));
    }

    #[test]
    fn test_empty_review_list() {
        let html = render_html(&movie(), &[], 0).unwrap();
        assert!(html.contains("<h2>Reviews (0)</h2>"));
        assert!(html.contains("No reviews yet"));
    }
}
