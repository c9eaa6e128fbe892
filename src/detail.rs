use crate::catalog::PosterState;
use crate::format;
use crate::model::Movie;
use crate::review::{ReviewForm, ReviewList};

const MAX_CAST_DIRECTORS: usize = 2;
const MAX_CAST_ACTORS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastRole {
    Director,
    Actor,
}

impl CastRole {
    pub fn label(self) -> &'static str {
        match self {
            CastRole::Director => "Director",
            CastRole::Actor => "Actor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastEntry {
    pub name: String,
    pub role: CastRole,
}

impl CastEntry {
    pub fn badge(&self) -> String {
        format::initials(&self.name)
    }
}

/// Up to two directors followed by up to six actors.
pub fn build_cast(directors: &[String], actors: &[String]) -> Vec<CastEntry> {
    let directors = directors.iter().take(MAX_CAST_DIRECTORS).map(|name| CastEntry {
        name: name.clone(),
        role: CastRole::Director,
    });
    let actors = actors.iter().take(MAX_CAST_ACTORS).map(|name| CastEntry {
        name: name.clone(),
        role: CastRole::Actor,
    });
    directors.chain(actors).collect()
}

/// Labelled fields of the info panel, already formatted for display.
pub fn info_fields(movie: &Movie) -> Vec<(&'static str, String)> {
    vec![
        ("Rating", format::format_rating(movie.rating.as_ref())),
        ("Year", format::scalar_or_dash(movie.year.as_ref())),
        ("Duration", format::scalar_or_dash(movie.durations.as_ref())),
        ("Genres", format::join_or_dash(&movie.genre_list())),
        ("Directors", format::join_or_dash(&movie.director_list())),
        ("Actors", format::join_or_dash(&movie.actor_list())),
        (
            "Language",
            format::join_or_dash(&crate::model::normalize_list(movie.languages.as_ref())),
        ),
        (
            "Countries",
            format::join_or_dash(&crate::model::normalize_list(movie.countries.as_ref())),
        ),
        ("Released", format::or_dash(movie.release_date.as_deref())),
        (
            "Reviews",
            movie.review_total().map(|n| n.to_string()).unwrap_or_else(|| format::PLACEHOLDER.to_string()),
        ),
    ]
}

/// A region of a view that loads independently of its neighbours.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Region<T> {
    #[default]
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Region<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Region::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            Region::Ready(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailFocus {
    #[default]
    Info,
    Cast,
    Reviews,
    Stars,
    Comment,
}

impl DetailFocus {
    pub fn next(self) -> Self {
        match self {
            DetailFocus::Info => DetailFocus::Cast,
            DetailFocus::Cast => DetailFocus::Reviews,
            DetailFocus::Reviews => DetailFocus::Stars,
            DetailFocus::Stars => DetailFocus::Comment,
            DetailFocus::Comment => DetailFocus::Info,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            DetailFocus::Info => DetailFocus::Comment,
            DetailFocus::Cast => DetailFocus::Info,
            DetailFocus::Reviews => DetailFocus::Cast,
            DetailFocus::Stars => DetailFocus::Reviews,
            DetailFocus::Comment => DetailFocus::Stars,
        }
    }
}

/// Detail view: movie record and review list load as separate regions.
#[derive(Debug, Clone)]
pub struct DetailState {
    pub movie_id: i64,
    pub movie: Region<Movie>,
    pub poster: PosterState,
    pub cast: Vec<CastEntry>,
    pub cast_selected: usize,
    pub reviews: Region<ReviewList>,
    pub form: ReviewForm,
    pub focus: DetailFocus,
    pub info_scroll: u16,
    pub review_scroll: u16,
}

impl DetailState {
    pub fn new(movie_id: i64, logged_in: bool) -> Self {
        let mut form = ReviewForm::default();
        form.stars.set_enabled(logged_in);
        Self {
            movie_id,
            movie: Region::Loading,
            poster: PosterState::Placeholder,
            cast: Vec::new(),
            cast_selected: 0,
            reviews: Region::Loading,
            form,
            focus: DetailFocus::Info,
            info_scroll: 0,
            review_scroll: 0,
        }
    }

    pub fn set_movie(&mut self, movie: Movie) {
        self.poster = PosterState::for_movie(&movie);
        self.cast = build_cast(&movie.director_list(), &movie.actor_list());
        self.cast_selected = 0;
        self.movie = Region::Ready(movie);
    }

    pub fn selected_cast(&self) -> Option<&CastEntry> {
        self.cast.get(self.cast_selected)
    }

    pub fn move_cast(&mut self, forward: bool) {
        if forward {
            if self.cast_selected + 1 < self.cast.len() {
                self.cast_selected += 1;
            }
        } else {
            self.cast_selected = self.cast_selected.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ListField, RatingValue};

    fn names(prefix: &str, n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("{prefix} {i}")).collect()
    }

    #[test]
    fn test_cast_limits_and_order() {
        let cast = build_cast(&names("Dir", 3), &names("Act", 8));
        assert_eq!(cast.len(), 8);
        assert_eq!(cast[0], CastEntry { name: "Dir 1".into(), role: CastRole::Director });
        assert_eq!(cast[1].role, CastRole::Director);
        assert_eq!(cast[2], CastEntry { name: "Act 1".into(), role: CastRole::Actor });
        assert_eq!(cast[7].name, "Act 6");
        assert_eq!(cast[0].badge(), "D1");
    }

    #[test]
    fn test_info_fields_fallbacks() {
        let movie = Movie {
            movie_id: 1,
            rating: Some(RatingValue::Text("N/A".into())),
            genres: Some(ListField::Items(vec!["剧情".into(), "爱情".into()])),
            ..Default::default()
        };
        let fields = info_fields(&movie);
        let get = |label: &str| fields.iter().find(|(l, _)| *l == label).map(|(_, v)| v.clone()).unwrap();
        assert_eq!(get("Rating"), "N/A");
        assert_eq!(get("Genres"), "剧情 / 爱情");
        assert_eq!(get("Duration"), "-");
        assert_eq!(get("Language"), "-");
        assert_eq!(get("Released"), "-");
        assert_eq!(get("Reviews"), "-");

        let counted = Movie { comment_count: Some(900), review_count: Some(4), ..movie };
        let fields = info_fields(&counted);
        assert!(fields.contains(&("Reviews", "4".to_string())));
    }

    #[test]
    fn test_set_movie_derives_cast_and_poster() {
        let mut state = DetailState::new(3, false);
        assert!(!state.form.stars.is_enabled());
        state.set_movie(Movie {
            movie_id: 3,
            directors: Some(ListField::Text("Wong Kar-wai".into())),
            actors: Some(ListField::Text("Tony Leung / Maggie Cheung".into())),
            poster_url: Some("https://img/3.jpg".into()),
            ..Default::default()
        });
        assert_eq!(state.cast.len(), 3);
        assert_eq!(state.poster, PosterState::Remote("https://img/3.jpg".into()));
        state.move_cast(true);
        state.move_cast(true);
        state.move_cast(true);
        assert_eq!(state.selected_cast().unwrap().name, "Maggie Cheung");
    }
}
