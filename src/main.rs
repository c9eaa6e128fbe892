mod api;
mod app;
mod catalog;
mod celebrity;
mod config;
mod detail;
mod export;
mod format;
mod model;
mod review;
mod session;
mod stats;
mod storage;
mod theme;
mod ui;

use api::{HttpClient, MovieApi};
use app::{Action, App, InputMode, View};
use catalog::CatalogFocus;
use clap::{Parser, Subcommand};
use config::{AppDirs, Config};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use detail::DetailFocus;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use storage::Storage;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use ui::auth_overlay::{self, AuthInputResult};

/// Terminal client for the MovieMind movie catalog
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Backend base URL (overrides config file and MOVIEMIND_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the TUI (default)
    Run,
    /// Log in and cache the session
    Login {
        /// Account name
        username: String,
    },
    /// Create an account and cache the session
    Register {
        /// Account name
        username: String,
        /// Contact email
        email: String,
    },
    /// Forget the cached session
    Logout,
    /// Show the cached session
    Whoami,
    /// Write a movie's reviews to a standalone HTML page
    ExportReviews {
        /// Movie to export
        movie_id: i64,
        /// Output HTML file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Toggle and persist the dark/light theme
    Theme,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let dirs = AppDirs::discover()?;
    init_logging(&dirs)?;

    let mut config = match Config::load(&dirs) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
        config.validate()?;
    }
    info!(api = %config.api_base_url, "starting");

    let mut storage = Storage::open(dirs.storage_file())?;
    info!(path = %storage.path().display(), "storage opened");
    let client: Arc<dyn MovieApi> = Arc::new(HttpClient::new(&config)?);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Login { username } => {
            eprint!("Password: ");
            let password = rpassword::read_password()?;
            let request = auth_overlay::login_request(&username, &password)?;
            match client.login(&request).await {
                Ok(user) => {
                    session::save(&mut storage, Some(&user))?;
                    eprintln!("Logged in as {} (id {})", user.username, user.user_id);
                }
                Err(e) => {
                    error!(error = %e, "login failed");
                    eprintln!("Error: {}", e.user_message("Login failed"));
                    std::process::exit(1);
                }
            }
        }
        Commands::Register { username, email } => {
            eprint!("Password: ");
            let password = rpassword::read_password()?;
            eprint!("Repeat password: ");
            if rpassword::read_password()? != password {
                eprintln!("Error: passwords do not match");
                std::process::exit(1);
            }
            let request = auth_overlay::register_request(&username, &email, &password)?;
            match client.register(&request).await {
                Ok(user) => {
                    session::save(&mut storage, Some(&user))?;
                    eprintln!("Registered and logged in as {}", user.username);
                }
                Err(e) => {
                    error!(error = %e, "registration failed");
                    eprintln!("Error: {}", e.user_message("Registration failed"));
                    std::process::exit(1);
                }
            }
        }
        Commands::Logout => {
            session::save(&mut storage, None)?;
            eprintln!("Logged out");
        }
        Commands::Whoami => match session::load(&storage) {
            Some(user) => {
                println!("{} (id {})", user.username, user.user_id);
                if let Some(email) = user.email {
                    println!("email: {email}");
                }
                if let Some(last_login) = user.last_login {
                    println!("last login: {}", format::format_timestamp(&last_login));
                }
            }
            None => println!("Not logged in"),
        },
        Commands::ExportReviews { movie_id, output } => {
            match export::export_reviews(client.as_ref(), movie_id, &output).await {
                Ok(count) => eprintln!("Wrote {count} reviews to {}", output.display()),
                Err(e) => {
                    error!(error = %e, movie_id, "export failed");
                    eprintln!("Error: {}", e.user_message());
                    std::process::exit(1);
                }
            }
        }
        Commands::Theme => {
            let mut controller = theme::ThemeController::load(&storage);
            let now = controller.toggle(&mut storage)?;
            eprintln!("Theme set to {}", now.as_str());
        }
        Commands::Run => {
            let mut app = App::new(client, storage, config);

            app.start();

            // Init terminal
            let mut terminal = ratatui::init();

            // Main loop
            let result = run_app(&mut terminal, &mut app).await;

            // Restore terminal
            ratatui::restore();

            if let Err(e) = result {
                error!(error = %e, "terminal loop failed");
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Log to a file in the data directory; the terminal belongs to the TUI.
fn init_logging(dirs: &AppDirs) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(&dirs.data_dir)?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dirs.log_file())?;
    let filter = EnvFilter::try_from_env(config::LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.tick(Instant::now());
        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Pending indicators are on screen; now do the request.
        if app.has_pending() {
            app.run_pending().await;
            continue;
        }

        // Poll for events with a 250ms timeout
        if crossterm::event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                handle_key(app, key);
            }
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if let Some(overlay) = &mut app.auth {
        match overlay.handle_key(key) {
            Some(AuthInputResult::Submit(action)) => app.queue(action),
            Some(AuthInputResult::Cancel) => app.auth = None,
            None => {}
        }
        return;
    }

    if app.input_mode != InputMode::Normal {
        handle_text_input(app, key);
        return;
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        KeyCode::Char('?') => {
            app.show_help = true;
            return;
        }
        KeyCode::Char('t') => {
            app.queue(Action::ToggleTheme);
            return;
        }
        KeyCode::Char('L') => {
            app.open_login();
            return;
        }
        KeyCode::Char('U') => {
            app.open_register();
            return;
        }
        KeyCode::Char('O') => {
            app.queue(Action::Logout);
            return;
        }
        KeyCode::Char('S') if app.view != View::Stats => {
            app.queue(Action::LoadStats);
            return;
        }
        KeyCode::Char('P') if app.view != View::People => {
            app.queue(Action::OpenPeople);
            return;
        }
        _ => {}
    }

    match app.view {
        View::Catalog => match app.catalog.focus {
            CatalogFocus::Grid => handle_catalog_key(app, key),
            CatalogFocus::Filters => handle_filters_key(app, key),
            CatalogFocus::Pagination => handle_pagination_key(app, key),
        },
        View::Detail => handle_detail_key(app, key),
        View::Celebrity => handle_celebrity_key(app, key),
        View::People => handle_people_key(app, key),
        View::Stats => handle_stats_key(app, key),
    }
}

fn handle_text_input(app: &mut App, key: KeyEvent) {
    let buffer = match app.input_mode {
        InputMode::Search => &mut app.search_input,
        InputMode::AiQuery => &mut app.ai_input,
        InputMode::Comment => match &mut app.detail {
            Some(detail) => &mut detail.form.comment,
            None => {
                app.input_mode = InputMode::Normal;
                return;
            }
        },
        InputMode::Normal => return,
    };
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            buffer.pop();
        }
        KeyCode::Char(c) => {
            buffer.push(c);
        }
        KeyCode::Enter => {
            let text = buffer.clone();
            let mode = app.input_mode;
            app.input_mode = InputMode::Normal;
            match mode {
                InputMode::Search => app.queue(Action::Search(text)),
                InputMode::AiQuery => app.queue(Action::AiSearch(text)),
                InputMode::Comment => app.queue(Action::SubmitReview),
                InputMode::Normal => {}
            }
        }
        _ => {}
    }
}

fn handle_catalog_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Search;
        }
        KeyCode::Char('a') => {
            app.input_mode = InputMode::AiQuery;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.catalog.select_next();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.catalog.select_prev();
        }
        KeyCode::Enter => {
            if let Some(movie) = app.catalog.selected_movie() {
                let id = movie.movie_id;
                app.queue(Action::OpenDetail(id));
            }
        }
        KeyCode::Char('f') => {
            app.catalog.focus = CatalogFocus::Filters;
        }
        KeyCode::Char('p') if !app.catalog.controls().is_empty() => {
            app.catalog.focus = CatalogFocus::Pagination;
            app.catalog.reset_page_cursor();
        }
        KeyCode::Char(']') | KeyCode::PageDown => {
            let next = app.catalog.page.page + 1;
            let last = app.catalog.pagination.as_ref().map(|p| p.total_pages).unwrap_or(0);
            if app.catalog.source == catalog::CatalogSource::Browse && next <= last {
                app.queue(Action::GoToPage(next));
            }
        }
        KeyCode::Char('[') | KeyCode::PageUp => {
            if app.catalog.source == catalog::CatalogSource::Browse && app.catalog.page.page > 1 {
                let prev = app.catalog.page.page - 1;
                app.queue(Action::GoToPage(prev));
            }
        }
        KeyCode::Esc => {
            // Leave search results and return to browsing
            if app.catalog.source != catalog::CatalogSource::Browse {
                app.search_input.clear();
                app.ai_input.clear();
                app.queue(Action::LoadMovies);
            }
        }
        _ => {}
    }
}

fn handle_filters_key(app: &mut App, key: KeyEvent) {
    let controls = &mut app.catalog.controls;
    match key.code {
        KeyCode::Esc | KeyCode::Char('f') => {
            app.catalog.focus = CatalogFocus::Grid;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            controls.row = controls.row.next();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            controls.row = controls.row.prev();
        }
        KeyCode::Right | KeyCode::Char('l') => {
            controls.cycle(true);
        }
        KeyCode::Left | KeyCode::Char('h') => {
            controls.cycle(false);
        }
        KeyCode::Enter => {
            app.catalog.focus = CatalogFocus::Grid;
            app.queue(Action::ApplyFilters);
        }
        KeyCode::Char('r') => {
            app.catalog.focus = CatalogFocus::Grid;
            app.queue(Action::ResetFilters);
        }
        _ => {}
    }
}

fn handle_pagination_key(app: &mut App, key: KeyEvent) {
    let controls = app.catalog.controls();
    match key.code {
        KeyCode::Esc | KeyCode::Char('p') => {
            app.catalog.focus = CatalogFocus::Grid;
        }
        KeyCode::Right | KeyCode::Char('l') => {
            if app.catalog.page_cursor + 1 < controls.len() {
                app.catalog.page_cursor += 1;
            }
        }
        KeyCode::Left | KeyCode::Char('h') => {
            app.catalog.page_cursor = app.catalog.page_cursor.saturating_sub(1);
        }
        KeyCode::Enter => {
            if let Some(control) = controls.get(app.catalog.page_cursor) {
                app.catalog.focus = CatalogFocus::Grid;
                app.queue(Action::GoToPage(control.target()));
            }
        }
        _ => {}
    }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) {
    let Some(detail) = app.detail.as_mut() else {
        app.go_back();
        return;
    };
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            app.go_back();
        }
        KeyCode::Tab => {
            detail.focus = detail.focus.next();
        }
        KeyCode::BackTab => {
            detail.focus = detail.focus.prev();
        }
        KeyCode::Char(c @ '1'..='5') => {
            detail.focus = DetailFocus::Stars;
            detail.form.stars.click(c as u8 - b'0');
        }
        KeyCode::Char('c') => {
            detail.focus = DetailFocus::Comment;
            app.input_mode = InputMode::Comment;
        }
        KeyCode::Enter => match detail.focus {
            DetailFocus::Cast => {
                if let Some(entry) = detail.selected_cast() {
                    let name = entry.name.clone();
                    app.queue(Action::OpenCelebrity(name));
                }
            }
            DetailFocus::Stars => detail.form.stars.click_cursor(),
            DetailFocus::Comment => {
                app.input_mode = InputMode::Comment;
            }
            _ => {}
        },
        KeyCode::Char(' ') if detail.focus == DetailFocus::Stars => {
            detail.form.stars.click_cursor();
        }
        KeyCode::Down | KeyCode::Char('j') => match detail.focus {
            DetailFocus::Cast => detail.move_cast(true),
            DetailFocus::Reviews => detail.review_scroll = detail.review_scroll.saturating_add(1),
            _ => detail.info_scroll = detail.info_scroll.saturating_add(1),
        },
        KeyCode::Up | KeyCode::Char('k') => match detail.focus {
            DetailFocus::Cast => detail.move_cast(false),
            DetailFocus::Reviews => detail.review_scroll = detail.review_scroll.saturating_sub(1),
            _ => detail.info_scroll = detail.info_scroll.saturating_sub(1),
        },
        KeyCode::Right | KeyCode::Char('l') if detail.focus == DetailFocus::Stars => {
            detail.form.stars.move_cursor(true);
        }
        KeyCode::Left | KeyCode::Char('h') if detail.focus == DetailFocus::Stars => {
            detail.form.stars.move_cursor(false);
        }
        _ => {}
    }
}

fn handle_celebrity_key(app: &mut App, key: KeyEvent) {
    let Some(view) = app.celebrity.as_mut() else {
        app.go_back();
        return;
    };
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            app.go_back();
        }
        KeyCode::Tab => {
            view.switch_grid();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            view.move_selection(true);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            view.move_selection(false);
        }
        KeyCode::Enter => {
            if let Some(movie) = view.selected_movie() {
                let id = movie.movie_id;
                app.queue(Action::OpenDetail(id));
            }
        }
        _ => {}
    }
}

fn handle_people_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            app.go_back();
        }
        KeyCode::Tab => {
            app.queue(Action::CycleRole);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.people.move_selection(true);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.people.move_selection(false);
        }
        KeyCode::Enter => {
            if let Some(name) = app.people.selected_name() {
                let name = name.to_string();
                app.queue(Action::OpenCelebrity(name));
            }
        }
        _ => {}
    }
}

fn handle_stats_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            app.go_back();
        }
        KeyCode::Char('r') => {
            app.queue(Action::LoadStats);
        }
        _ => {}
    }
}
