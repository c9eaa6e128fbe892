use crate::model::{GenreOption, Movie, PaginationInfo};

/// Minimum-rating choices offered by the filter control.
pub const MIN_RATING_CHOICES: [Option<f64>; 6] = [None, Some(9.0), Some(8.5), Some(8.0), Some(7.5), Some(7.0)];

/// Year-range choices offered by the filter control. Empty means any year.
pub const YEAR_RANGE_CHOICES: [&str; 8] = [
    "",
    "2020-2029",
    "2010-2019",
    "2000-2009",
    "1990-1999",
    "1980-1989",
    "1970-1979",
    "1900-1969",
];

/// Active list filters, as sent to `GET /movies`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub genre: Option<String>,
    pub min_rating: Option<f64>,
    pub year_start: Option<i32>,
    pub year_end: Option<i32>,
}

impl FilterState {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(genre) = &self.genre {
            pairs.push(("genre", genre.clone()));
        }
        if let Some(rating) = self.min_rating {
            pairs.push(("min_rating", rating.to_string()));
        }
        if let Some(start) = self.year_start {
            pairs.push(("year_start", start.to_string()));
        }
        if let Some(end) = self.year_end {
            pairs.push(("year_end", end.to_string()));
        }
        pairs
    }

    pub fn is_empty(&self) -> bool {
        *self == FilterState::default()
    }

    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(genre) = &self.genre {
            parts.push(genre.clone());
        }
        if let Some(rating) = self.min_rating {
            parts.push(format!("≥{rating:.1}"));
        }
        match (self.year_start, self.year_end) {
            (Some(s), Some(e)) if s == e => parts.push(s.to_string()),
            (Some(s), Some(e)) => parts.push(format!("{s}-{e}")),
            (Some(s), None) => parts.push(format!("{s}-")),
            (None, Some(e)) => parts.push(format!("-{e}")),
            (None, None) => {}
        }
        if parts.is_empty() {
            "all".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Split a combined year-range control value ("1990-1999", "1994", "") into bounds.
pub fn split_year_range(value: &str) -> (Option<i32>, Option<i32>) {
    let value = value.trim();
    if value.is_empty() {
        return (None, None);
    }
    match value.split_once('-') {
        Some((start, end)) => (start.trim().parse().ok(), end.trim().parse().ok()),
        None => {
            let year = value.parse().ok();
            (year, year)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterRow {
    #[default]
    Genre,
    MinRating,
    YearRange,
}

impl FilterRow {
    pub const ALL: [FilterRow; 3] = [FilterRow::Genre, FilterRow::MinRating, FilterRow::YearRange];

    pub fn label(self) -> &'static str {
        match self {
            FilterRow::Genre => "Genre",
            FilterRow::MinRating => "Min rating",
            FilterRow::YearRange => "Years",
        }
    }

    pub fn next(self) -> Self {
        match self {
            FilterRow::Genre => FilterRow::MinRating,
            FilterRow::MinRating => FilterRow::YearRange,
            FilterRow::YearRange => FilterRow::Genre,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FilterRow::Genre => FilterRow::YearRange,
            FilterRow::MinRating => FilterRow::Genre,
            FilterRow::YearRange => FilterRow::MinRating,
        }
    }
}

/// The filter form: each row cycles through its choices; index 0 means "any".
#[derive(Debug, Clone, Default)]
pub struct FilterControls {
    pub genres: Vec<GenreOption>,
    pub row: FilterRow,
    genre_idx: usize,
    rating_idx: usize,
    year_idx: usize,
}

impl FilterControls {
    pub fn set_genres(&mut self, genres: Vec<GenreOption>) {
        self.genres = genres;
        self.genre_idx = 0;
    }

    pub fn cycle(&mut self, forward: bool) {
        let (idx, len) = match self.row {
            FilterRow::Genre => (&mut self.genre_idx, self.genres.len() + 1),
            FilterRow::MinRating => (&mut self.rating_idx, MIN_RATING_CHOICES.len()),
            FilterRow::YearRange => (&mut self.year_idx, YEAR_RANGE_CHOICES.len()),
        };
        *idx = if forward { (*idx + 1) % len } else { (*idx + len - 1) % len };
    }

    pub fn reset(&mut self) {
        self.genre_idx = 0;
        self.rating_idx = 0;
        self.year_idx = 0;
    }

    pub fn value_label(&self, row: FilterRow) -> String {
        match row {
            FilterRow::Genre => match self.genre_idx.checked_sub(1).and_then(|i| self.genres.get(i)) {
                Some(g) => format!("{} ({})", g.name, g.movie_count),
                None => "Any".to_string(),
            },
            FilterRow::MinRating => match MIN_RATING_CHOICES[self.rating_idx] {
                Some(r) => format!("{r:.1}+"),
                None => "Any".to_string(),
            },
            FilterRow::YearRange => match YEAR_RANGE_CHOICES[self.year_idx] {
                "" => "Any".to_string(),
                range => range.to_string(),
            },
        }
    }

    /// Read the current control values into a filter object.
    pub fn read(&self) -> FilterState {
        let genre = self
            .genre_idx
            .checked_sub(1)
            .and_then(|i| self.genres.get(i))
            .map(|g| g.name.clone());
        let (year_start, year_end) = split_year_range(YEAR_RANGE_CHOICES[self.year_idx]);
        FilterState {
            genre,
            min_rating: MIN_RATING_CHOICES[self.rating_idx],
            year_start,
            year_end,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub page: u32,
    pub per_page: u32,
}

/// One pagination control, carrying the page it loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageControl {
    Prev(u32),
    Number { page: u32, active: bool },
    Next(u32),
}

impl PageControl {
    pub fn target(self) -> u32 {
        match self {
            PageControl::Prev(p) | PageControl::Next(p) => p,
            PageControl::Number { page, .. } => page,
        }
    }

    pub fn label(self) -> String {
        match self {
            PageControl::Prev(_) => "‹ Prev".to_string(),
            PageControl::Next(_) => "Next ›".to_string(),
            PageControl::Number { page, .. } => page.to_string(),
        }
    }
}

/// Controls for `{page, total_pages}`: prev iff page > 1, numbers for the
/// window `[page-2, page+2]` clamped to `[1, total_pages]`, next iff
/// page < total_pages.
pub fn pagination_controls(page: u32, total_pages: u32) -> Vec<PageControl> {
    if total_pages == 0 {
        return Vec::new();
    }
    let mut controls = Vec::new();
    if page > 1 {
        controls.push(PageControl::Prev(page - 1));
    }
    let start = page.saturating_sub(2).max(1);
    let end = page.saturating_add(2).min(total_pages);
    for n in start..=end {
        controls.push(PageControl::Number { page: n, active: n == page });
    }
    if page < total_pages {
        controls.push(PageControl::Next(page + 1));
    }
    controls
}

/// Poster display state. Each load failure moves one step down and
/// `Text` is terminal, so a broken placeholder never loops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosterState {
    Remote(String),
    Placeholder,
    Text,
}

impl PosterState {
    pub fn for_movie(movie: &Movie) -> Self {
        match movie.poster() {
            Some(url) => PosterState::Remote(url.to_string()),
            None => PosterState::Placeholder,
        }
    }

    /// One-cell marker for list cards, which show the state without probing.
    pub fn badge(&self) -> &'static str {
        match self {
            PosterState::Remote(_) => "▣",
            PosterState::Placeholder => "▢",
            PosterState::Text => "T",
        }
    }

    pub fn on_load_error(&mut self) {
        *self = match self {
            PosterState::Remote(_) => PosterState::Placeholder,
            PosterState::Placeholder | PosterState::Text => PosterState::Text,
        };
    }
}

/// Where the grid's content came from; decides whether pagination shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CatalogSource {
    #[default]
    Browse,
    Keyword(String),
    Ai(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogFocus {
    #[default]
    Grid,
    Filters,
    Pagination,
}

/// Interpretation area above the grid for AI search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AiPanel {
    #[default]
    Hidden,
    Loading,
    Ready {
        interpretation: String,
        generated_sql: Option<String>,
    },
    Failed(String),
}

pub const EMPTY_LIST_MESSAGE: &str = "No movies match these filters";
pub const EMPTY_SEARCH_MESSAGE: &str = "No movies found";

/// State of the movie list view.
#[derive(Debug, Clone)]
pub struct CatalogState {
    pub movies: Vec<Movie>,
    pub selected: usize,
    /// Empty-state or error text shown instead of cards.
    pub message: Option<String>,
    /// Whether `message` is an error rather than an empty-state notice.
    pub failed: bool,
    pub loading: bool,
    pub pagination: Option<PaginationInfo>,
    pub page: PageState,
    pub filters: FilterState,
    pub controls: FilterControls,
    pub source: CatalogSource,
    pub focus: CatalogFocus,
    pub page_cursor: usize,
    pub ai_panel: AiPanel,
}

impl CatalogState {
    pub fn new(per_page: u32) -> Self {
        Self {
            movies: Vec::new(),
            selected: 0,
            message: None,
            failed: false,
            loading: false,
            pagination: None,
            page: PageState { page: 1, per_page },
            filters: FilterState::default(),
            controls: FilterControls::default(),
            source: CatalogSource::Browse,
            focus: CatalogFocus::Grid,
            page_cursor: 0,
            ai_panel: AiPanel::Hidden,
        }
    }

    /// Replace the grid with a fresh result set.
    pub fn show_movies(&mut self, movies: Vec<Movie>, empty_message: &str) {
        self.message = if movies.is_empty() {
            Some(empty_message.to_string())
        } else {
            None
        };
        self.failed = false;
        self.movies = movies;
        self.selected = 0;
    }

    /// Clear the grid and show an error in its place.
    pub fn show_error(&mut self, message: String) {
        self.movies.clear();
        self.selected = 0;
        self.message = Some(message);
        self.failed = true;
    }

    pub fn controls(&self) -> Vec<PageControl> {
        match (&self.source, &self.pagination) {
            (CatalogSource::Browse, Some(p)) => pagination_controls(self.page.page, p.total_pages),
            _ => Vec::new(),
        }
    }

    /// Move the pagination cursor onto the active page number.
    pub fn reset_page_cursor(&mut self) {
        self.page_cursor = self
            .controls()
            .iter()
            .position(|c| matches!(c, PageControl::Number { active: true, .. }))
            .unwrap_or(0);
    }

    pub fn selected_movie(&self) -> Option<&Movie> {
        self.movies.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.movies.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(controls: &[PageControl]) -> Vec<u32> {
        controls
            .iter()
            .filter_map(|c| match c {
                PageControl::Number { page, .. } => Some(*page),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_pagination_middle_window() {
        let controls = pagination_controls(5, 10);
        assert_eq!(numbers(&controls), vec![3, 4, 5, 6, 7]);
        assert_eq!(controls.first(), Some(&PageControl::Prev(4)));
        assert_eq!(controls.last(), Some(&PageControl::Next(6)));
        assert!(controls.contains(&PageControl::Number { page: 5, active: true }));
        assert_eq!(
            controls
                .iter()
                .filter(|c| matches!(c, PageControl::Number { active: true, .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_pagination_edges() {
        let first = pagination_controls(1, 10);
        assert_eq!(numbers(&first), vec![1, 2, 3]);
        assert!(!first.iter().any(|c| matches!(c, PageControl::Prev(_))));

        let last = pagination_controls(10, 10);
        assert_eq!(numbers(&last), vec![8, 9, 10]);
        assert!(!last.iter().any(|c| matches!(c, PageControl::Next(_))));

        let single = pagination_controls(1, 1);
        assert_eq!(single, vec![PageControl::Number { page: 1, active: true }]);

        assert!(pagination_controls(1, 0).is_empty());
    }

    #[test]
    fn test_split_year_range() {
        assert_eq!(split_year_range("1990-1999"), (Some(1990), Some(1999)));
        assert_eq!(split_year_range("1994"), (Some(1994), Some(1994)));
        assert_eq!(split_year_range(""), (None, None));
        assert_eq!(split_year_range("2000-"), (Some(2000), None));
    }

    #[test]
    fn test_controls_read_into_filters() {
        let mut controls = FilterControls::default();
        controls.set_genres(vec![
            GenreOption { name: "剧情".into(), movie_count: 10 },
            GenreOption { name: "喜剧".into(), movie_count: 4 },
        ]);
        controls.cycle(true);
        controls.cycle(true);
        controls.row = FilterRow::MinRating;
        controls.cycle(true);
        controls.row = FilterRow::YearRange;
        controls.cycle(false);

        let filters = controls.read();
        assert_eq!(filters.genre.as_deref(), Some("喜剧"));
        assert_eq!(filters.min_rating, Some(9.0));
        assert_eq!((filters.year_start, filters.year_end), (Some(1900), Some(1969)));
        assert_eq!(
            filters.query_pairs(),
            vec![
                ("genre", "喜剧".to_string()),
                ("min_rating", "9".to_string()),
                ("year_start", "1900".to_string()),
                ("year_end", "1969".to_string()),
            ]
        );

        controls.reset();
        assert!(controls.read().is_empty());
    }

    #[test]
    fn test_poster_fallback_never_loops() {
        let movie = Movie {
            movie_id: 1,
            poster_url: Some("https://img/1.jpg".into()),
            ..Default::default()
        };
        let mut poster = PosterState::for_movie(&movie);
        assert_eq!(poster, PosterState::Remote("https://img/1.jpg".into()));
        poster.on_load_error();
        assert_eq!(poster, PosterState::Placeholder);
        poster.on_load_error();
        assert_eq!(poster, PosterState::Text);
        poster.on_load_error();
        assert_eq!(poster, PosterState::Text);

        let bare = Movie { movie_id: 2, poster_url: Some(" ".into()), ..Default::default() };
        assert_eq!(PosterState::for_movie(&bare), PosterState::Placeholder);
        assert_eq!(PosterState::for_movie(&bare).badge(), "▢");
        assert_eq!(PosterState::for_movie(&movie).badge(), "▣");
        assert_eq!(poster.badge(), "T");
    }

    #[test]
    fn test_search_results_hide_pagination() {
        let mut state = CatalogState::new(20);
        state.pagination = Some(PaginationInfo { page: 1, per_page: 20, total: 100, total_pages: 5 });
        assert!(!state.controls().is_empty());
        state.source = CatalogSource::Keyword("heat".into());
        assert!(state.controls().is_empty());
    }

    #[test]
    fn test_empty_result_shows_message() {
        let mut state = CatalogState::new(20);
        state.show_movies(Vec::new(), EMPTY_LIST_MESSAGE);
        assert_eq!(state.message.as_deref(), Some(EMPTY_LIST_MESSAGE));
        assert!(!state.failed);
        state.show_error("Network error".into());
        assert!(state.failed && state.movies.is_empty());
        state.show_movies(vec![Movie::default()], EMPTY_LIST_MESSAGE);
        assert!(state.message.is_none());
        assert!(!state.failed);
    }
}
