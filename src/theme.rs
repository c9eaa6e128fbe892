use crate::storage::{Storage, StorageError};
use ratatui::style::Color;
use std::time::{Duration, Instant};
use tracing::warn;

pub const THEME_KEY: &str = "moviemind_theme";

/// How long the toggle icon stays in its "spinning" glyph.
const TOGGLE_ANIMATION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Theme::Dark => "☾",
            Theme::Light => "☀",
        }
    }

    pub fn tooltip(self) -> &'static str {
        match self {
            Theme::Dark => "Switch to light mode",
            Theme::Light => "Switch to dark mode",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                fg: Color::White,
                bg: Color::Reset,
                accent: Color::Cyan,
                muted: Color::DarkGray,
                highlight_fg: Color::White,
                highlight_bg: Color::DarkGray,
                warn: Color::Yellow,
                error: Color::Red,
                ok: Color::Green,
            },
            Theme::Light => Palette {
                fg: Color::Black,
                bg: Color::White,
                accent: Color::Blue,
                muted: Color::Gray,
                highlight_fg: Color::Black,
                highlight_bg: Color::LightCyan,
                warn: Color::Rgb(176, 112, 0),
                error: Color::Red,
                ok: Color::Rgb(0, 128, 0),
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
    pub accent: Color,
    pub muted: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub warn: Color,
    pub error: Color,
    pub ok: Color,
}

/// Current theme plus the cosmetic toggle animation.
#[derive(Debug, Clone, Default)]
pub struct ThemeController {
    theme: Theme,
    animating_until: Option<Instant>,
}

impl ThemeController {
    /// Read the stored preference; unknown values fall back to dark.
    pub fn load(storage: &Storage) -> Self {
        let theme = match storage.get(THEME_KEY) {
            Some(raw) => Theme::parse(raw).unwrap_or_else(|| {
                warn!(value = raw, "unknown stored theme, using dark");
                Theme::Dark
            }),
            None => Theme::Dark,
        };
        Self {
            theme,
            animating_until: None,
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle(&mut self, storage: &mut Storage) -> Result<Theme, StorageError> {
        self.toggle_at(storage, Instant::now())
    }

    fn toggle_at(&mut self, storage: &mut Storage, now: Instant) -> Result<Theme, StorageError> {
        self.theme = self.theme.other();
        self.animating_until = Some(now + TOGGLE_ANIMATION);
        storage.set(THEME_KEY, self.theme.as_str().to_string())?;
        Ok(self.theme)
    }

    /// Drop the animation once its delay has passed.
    pub fn tick(&mut self, now: Instant) {
        if self.animating_until.is_some_and(|until| now >= until) {
            self.animating_until = None;
        }
    }

    pub fn is_animating(&self) -> bool {
        self.animating_until.is_some()
    }

    pub fn icon(&self) -> &'static str {
        if self.is_animating() {
            "◌"
        } else {
            self.theme.icon()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_dark() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path().join("s.json")).unwrap();
        assert_eq!(ThemeController::load(&storage).theme(), Theme::Dark);
    }

    #[test]
    fn test_toggle_persists_across_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        {
            let mut storage = Storage::open(&path).unwrap();
            let mut controller = ThemeController::load(&storage);
            assert_eq!(controller.toggle(&mut storage).unwrap(), Theme::Light);
        }
        let storage = Storage::open(&path).unwrap();
        let controller = ThemeController::load(&storage);
        assert_eq!(controller.theme(), Theme::Light);
        assert_eq!(controller.icon(), "☀");
        assert_eq!(controller.theme().tooltip(), "Switch to dark mode");
    }

    #[test]
    fn test_animation_reverts_after_delay() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = Storage::open(dir.path().join("s.json")).unwrap();
        let mut controller = ThemeController::load(&storage);
        let start = Instant::now();
        controller.toggle_at(&mut storage, start).unwrap();
        assert!(controller.is_animating());

        controller.tick(start + Duration::from_millis(100));
        assert!(controller.is_animating());

        controller.tick(start + TOGGLE_ANIMATION);
        assert!(!controller.is_animating());
        assert_eq!(controller.icon(), "☀");
    }

    #[test]
    fn test_garbage_value_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = Storage::open(dir.path().join("s.json")).unwrap();
        storage.set(THEME_KEY, "sepia".to_string()).unwrap();
        assert_eq!(ThemeController::load(&storage).theme(), Theme::Dark);
    }
}
