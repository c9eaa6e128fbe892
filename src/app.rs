use crate::api::{ApiError, LoginRequest, MovieApi, RegisterRequest};
use crate::catalog::{AiPanel, CatalogSource, CatalogState, EMPTY_LIST_MESSAGE, EMPTY_SEARCH_MESSAGE, PosterState};
use crate::celebrity::{CelebrityIndex, CelebrityView, RoleFilter};
use crate::config::{Config, REVIEW_PAGE_SIZE};
use crate::detail::{DetailState, Region};
use crate::model::Session;
use crate::review::{NewReview, ReviewList, SUBMIT_FALLBACK_MESSAGE};
use crate::session;
use crate::stats::{self, ChartSeries};
use crate::storage::Storage;
use crate::theme::ThemeController;
use crate::ui::auth_overlay::AuthOverlay;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Which view is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Catalog,
    Detail,
    Celebrity,
    People,
    Stats,
}

/// Where typed characters go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    AiQuery,
    Comment,
}

/// A user intent. `App::queue` applies its immediate effects; the network
/// part runs on the next `run_pending`.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    LoadMovies,
    ApplyFilters,
    ResetFilters,
    GoToPage(u32),
    LoadGenres,
    Search(String),
    AiSearch(String),
    OpenDetail(i64),
    OpenCelebrity(String),
    OpenPeople,
    CycleRole,
    LoadStats,
    SubmitReview,
    Login(LoginRequest),
    Register(RegisterRequest),
    Logout,
    ToggleTheme,
}

/// The network half of an action, already validated.
#[derive(Debug, Clone, PartialEq)]
enum Request {
    Movies,
    Genres,
    Search(String),
    AiSearch(String),
    Detail(i64),
    Celebrity(String),
    Celebrities(RoleFilter),
    Stats,
    Review { movie_id: i64, draft: NewReview },
    Login(LoginRequest),
    Register(RegisterRequest),
}

/// Main application state.
pub struct App {
    api: Arc<dyn MovieApi>,
    storage: Storage,
    pub config: Config,
    pub session: Option<Session>,
    pub theme: ThemeController,

    pub should_quit: bool,
    pub show_help: bool,
    pub view: View,
    history: Vec<View>,
    pub input_mode: InputMode,
    pub search_input: String,
    pub ai_input: String,

    pub catalog: CatalogState,
    pub detail: Option<DetailState>,
    pub celebrity: Option<CelebrityView>,
    pub people: CelebrityIndex,
    pub stats: Region<Vec<ChartSeries>>,
    pub auth: Option<AuthOverlay>,

    pending: VecDeque<Request>,
    pub status_msg: String,
}

impl App {
    pub fn new(api: Arc<dyn MovieApi>, storage: Storage, config: Config) -> Self {
        let session = session::load(&storage);
        let theme = ThemeController::load(&storage);
        let status_msg = match &session {
            Some(user) => format!("Logged in as {}", user.username),
            None => "Not logged in".to_string(),
        };
        Self {
            api,
            catalog: CatalogState::new(config.per_page),
            storage,
            config,
            session,
            theme,

            should_quit: false,
            show_help: false,
            view: View::Catalog,
            history: Vec::new(),
            input_mode: InputMode::Normal,
            search_input: String::new(),
            ai_input: String::new(),

            detail: None,
            celebrity: None,
            people: CelebrityIndex::default(),
            stats: Region::Loading,
            auth: None,

            pending: VecDeque::new(),
            status_msg,
        }
    }

    /// Initial data load: genre choices, then the first page.
    pub fn start(&mut self) {
        self.queue(Action::LoadGenres);
        self.queue(Action::LoadMovies);
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Greeting shown in the header.
    pub fn greeting(&self) -> String {
        match &self.session {
            Some(user) => format!("Hello, {}", user.username),
            None => "Not logged in".to_string(),
        }
    }

    /// Apply the synchronous part of `action` and queue its request.
    pub fn queue(&mut self, action: Action) {
        let request = match action {
            Action::LoadMovies => Some(self.begin_browse()),
            Action::ApplyFilters => {
                self.catalog.filters = self.catalog.controls.read();
                self.catalog.page.page = 1;
                Some(self.begin_browse())
            }
            Action::ResetFilters => {
                self.catalog.controls.reset();
                self.catalog.filters = Default::default();
                self.catalog.page.page = 1;
                Some(self.begin_browse())
            }
            Action::GoToPage(page) => {
                self.catalog.page.page = page.max(1);
                Some(self.begin_browse())
            }
            Action::LoadGenres => Some(Request::Genres),
            Action::Search(keyword) => {
                let keyword = keyword.trim().to_string();
                if keyword.is_empty() {
                    None
                } else {
                    self.catalog.page.page = 1;
                    self.catalog.ai_panel = AiPanel::Hidden;
                    self.catalog.loading = true;
                    Some(Request::Search(keyword))
                }
            }
            Action::AiSearch(query) => {
                let query = query.trim().to_string();
                if query.is_empty() {
                    None
                } else {
                    self.catalog.ai_panel = AiPanel::Loading;
                    Some(Request::AiSearch(query))
                }
            }
            Action::OpenDetail(movie_id) => {
                self.navigate(View::Detail);
                self.detail = Some(DetailState::new(movie_id, self.session.is_some()));
                Some(Request::Detail(movie_id))
            }
            Action::OpenCelebrity(name) => {
                self.navigate(View::Celebrity);
                self.celebrity = Some(CelebrityView::Loading { name: name.clone() });
                Some(Request::Celebrity(name))
            }
            Action::OpenPeople => {
                if self.view != View::People {
                    self.navigate(View::People);
                }
                self.people.entries = Region::Loading;
                Some(Request::Celebrities(self.people.role))
            }
            Action::CycleRole => {
                self.people.cycle_role();
                Some(Request::Celebrities(self.people.role))
            }
            Action::LoadStats => {
                if self.view != View::Stats {
                    self.navigate(View::Stats);
                }
                self.stats = Region::Loading;
                Some(Request::Stats)
            }
            Action::SubmitReview => {
                let session = self.session.as_ref();
                self.detail.as_mut().and_then(|detail| {
                    detail.form.begin_submit(session).map(|draft| Request::Review {
                        movie_id: detail.movie_id,
                        draft,
                    })
                })
            }
            Action::Login(request) => {
                if let Some(overlay) = &mut self.auth {
                    overlay.set_busy();
                }
                Some(Request::Login(request))
            }
            Action::Register(request) => {
                if let Some(overlay) = &mut self.auth {
                    overlay.set_busy();
                }
                Some(Request::Register(request))
            }
            Action::Logout => {
                self.set_session(None);
                self.status_msg = "Logged out".to_string();
                None
            }
            Action::ToggleTheme => {
                match self.theme.toggle(&mut self.storage) {
                    Ok(theme) => debug!(theme = theme.as_str(), "theme toggled"),
                    Err(e) => warn!(error = %e, "could not persist theme"),
                }
                None
            }
        };
        if let Some(request) = request {
            self.pending.push_back(request);
        }
    }

    /// Run queued requests in order.
    pub async fn run_pending(&mut self) {
        while let Some(request) = self.pending.pop_front() {
            self.perform(request).await;
        }
    }

    /// Animation bookkeeping, called once per loop iteration.
    pub fn tick(&mut self, now: Instant) {
        self.theme.tick(now);
    }

    fn begin_browse(&mut self) -> Request {
        self.catalog.source = CatalogSource::Browse;
        self.catalog.ai_panel = AiPanel::Hidden;
        self.catalog.loading = true;
        Request::Movies
    }

    fn navigate(&mut self, to: View) {
        if self.view != to || to == View::Detail {
            self.history.push(self.view);
        }
        self.view = to;
        self.input_mode = InputMode::Normal;
    }

    /// Return to the previous view; the catalog is the root.
    pub fn go_back(&mut self) {
        self.view = self.history.pop().unwrap_or(View::Catalog);
        self.input_mode = InputMode::Normal;
    }

    fn set_session(&mut self, user: Option<Session>) {
        if let Err(e) = session::save(&mut self.storage, user.as_ref()) {
            warn!(error = %e, "could not persist session");
        }
        self.session = user;
        let logged_in = self.session.is_some();
        if let Some(detail) = &mut self.detail {
            detail.form.stars.set_enabled(logged_in);
        }
    }

    pub fn open_login(&mut self) {
        self.auth = Some(AuthOverlay::login());
    }

    pub fn open_register(&mut self) {
        self.auth = Some(AuthOverlay::register());
    }

    async fn perform(&mut self, request: Request) {
        match request {
            Request::Movies => {
                let page = self.catalog.page;
                let result = self.api.list_movies(&self.catalog.filters, page.page, page.per_page).await;
                self.catalog.loading = false;
                match result {
                    Ok(result) => {
                        self.catalog.pagination = result.pagination;
                        self.catalog.show_movies(result.movies, EMPTY_LIST_MESSAGE);
                        self.catalog.reset_page_cursor();
                        self.status_msg = format!("Filters: {}", self.catalog.filters.describe());
                    }
                    Err(e) => {
                        warn!(error = %e, "movie list failed");
                        self.catalog.pagination = None;
                        self.catalog.show_error(e.user_message("Failed to load movies"));
                    }
                }
            }
            Request::Genres => match self.api.genres().await {
                Ok(genres) => self.catalog.controls.set_genres(genres),
                Err(e) => {
                    warn!(error = %e, "genre list failed");
                    self.status_msg = e.user_message("Failed to load genres");
                }
            },
            Request::Search(keyword) => {
                let result = self.api.search(&keyword).await;
                self.catalog.loading = false;
                self.catalog.pagination = None;
                self.catalog.source = CatalogSource::Keyword(keyword);
                match result {
                    Ok(movies) => {
                        self.status_msg = format!("{} results", movies.len());
                        self.catalog.show_movies(movies, EMPTY_SEARCH_MESSAGE);
                    }
                    Err(e) => {
                        warn!(error = %e, "search failed");
                        self.catalog.show_error(e.user_message("Search failed"));
                    }
                }
            }
            Request::AiSearch(query) => match self.api.ai_search(&query).await {
                Ok(result) => {
                    self.catalog.pagination = None;
                    self.catalog.source = CatalogSource::Ai(query);
                    self.catalog.show_movies(result.movies, EMPTY_SEARCH_MESSAGE);
                    self.catalog.ai_panel = AiPanel::Ready {
                        interpretation: result.query_info.interpretation,
                        generated_sql: result.query_info.generated_sql.filter(|sql| !sql.trim().is_empty()),
                    };
                }
                Err(e) => {
                    warn!(error = %e, "ai search failed");
                    self.catalog.ai_panel = AiPanel::Failed(e.user_message("AI search failed"));
                }
            },
            Request::Detail(movie_id) => self.load_detail(movie_id).await,
            Request::Celebrity(name) => {
                let view = if name.trim().is_empty() {
                    CelebrityView::Failed(
                        ApiError::MissingParameter("celebrity name").user_message("Failed to load celebrity"),
                    )
                } else {
                    match self.api.celebrity(&name).await {
                        Ok(celebrity) => CelebrityView::loaded(celebrity),
                        Err(e) => {
                            warn!(error = %e, name = %name, "celebrity failed");
                            CelebrityView::Failed(e.user_message("Failed to load celebrity"))
                        }
                    }
                };
                self.celebrity = Some(view);
            }
            Request::Celebrities(role) => {
                let result = self.api.celebrities(role.query_value()).await;
                // A later role change supersedes this response.
                if role != self.people.role {
                    return;
                }
                match result {
                    Ok(entries) => self.people.show(entries),
                    Err(e) => {
                        warn!(error = %e, role = role.label(), "celebrity index failed");
                        self.people.entries = Region::Failed(e.user_message("Failed to load celebrities"));
                    }
                }
            }
            Request::Stats => {
                self.stats = match self.api.stats().await {
                    Ok(payload) => Region::Ready(stats::shape(&payload)),
                    Err(e) => {
                        warn!(error = %e, "stats failed");
                        Region::Failed(e.user_message("Failed to load statistics"))
                    }
                };
            }
            Request::Review { movie_id, draft } => {
                let result = self.api.create_review(movie_id, &draft).await;
                let Some(detail) = self.detail.as_mut().filter(|d| d.movie_id == movie_id) else {
                    return;
                };
                match result {
                    Ok(review) => {
                        info!(movie_id, "review posted");
                        match detail.reviews.ready_mut() {
                            Some(list) => list.prepend(review),
                            None => {
                                let mut list = ReviewList::default();
                                list.prepend(review);
                                detail.reviews = Region::Ready(list);
                            }
                        }
                        detail.form.succeed();
                    }
                    Err(e) => {
                        warn!(error = %e, movie_id, "review submission failed");
                        detail.form.fail(e.user_message(SUBMIT_FALLBACK_MESSAGE));
                    }
                }
            }
            Request::Login(request) => {
                let result = self.api.login(&request).await;
                self.finish_auth(result, "Login failed");
            }
            Request::Register(request) => {
                let result = self.api.register(&request).await;
                self.finish_auth(result, "Registration failed");
            }
        }
    }

    async fn load_detail(&mut self, movie_id: i64) {
        let api = Arc::clone(&self.api);
        let (movie, reviews) = tokio::join!(api.movie(movie_id), api.reviews(movie_id, REVIEW_PAGE_SIZE));

        let Some(detail) = self.detail.as_mut().filter(|d| d.movie_id == movie_id) else {
            return;
        };
        match movie {
            Ok(movie) => detail.set_movie(movie),
            Err(e) => {
                warn!(error = %e, movie_id, "movie detail failed");
                detail.movie = Region::Failed(e.user_message("Failed to load movie"));
            }
        }
        detail.reviews = match reviews {
            Ok(page) => Region::Ready(ReviewList {
                items: page.reviews,
                total: page.total,
            }),
            Err(e) => {
                warn!(error = %e, movie_id, "review list failed");
                Region::Failed(e.user_message("Failed to load reviews"))
            }
        };

        let poster = detail.movie.ready().map(|_| detail.poster.clone());
        if let Some(poster) = poster {
            let poster = self.resolve_poster(poster).await;
            if let Some(detail) = &mut self.detail {
                detail.poster = poster;
            }
        }
    }

    /// Walk the poster fallback chain until an image answers or `Text` is reached.
    async fn resolve_poster(&self, mut poster: PosterState) -> PosterState {
        loop {
            let url = match &poster {
                PosterState::Remote(url) => url.clone(),
                PosterState::Placeholder => match &self.config.placeholder_poster_url {
                    Some(url) => url.clone(),
                    None => return poster,
                },
                PosterState::Text => return poster,
            };
            match self.api.probe_image(&url).await {
                Ok(()) => return poster,
                Err(e) => {
                    debug!(url = %url, error = %e, "poster did not load");
                    poster.on_load_error();
                }
            }
        }
    }

    fn finish_auth(&mut self, result: Result<Session, ApiError>, fallback: &str) {
        match result {
            Ok(user) => {
                info!(username = %user.username, "authenticated");
                self.status_msg = format!("Welcome, {}", user.username);
                self.set_session(Some(user));
                self.auth = None;
            }
            Err(e) => {
                warn!(error = %e, "authentication failed");
                if let Some(overlay) = &mut self.auth {
                    overlay.set_error(e.user_message(fallback));
                } else {
                    self.status_msg = e.user_message(fallback);
                }
            }
        }
    }
}
