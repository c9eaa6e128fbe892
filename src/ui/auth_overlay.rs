use crate::api::{LoginRequest, RegisterRequest};
use crate::app::Action;
use crate::theme::Palette;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use thiserror::Error;

/// Minimum password length accepted on registration.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthFormError {
    #[error("Please fill in all fields")]
    MissingField,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
}

pub fn login_request(username: &str, password: &str) -> Result<LoginRequest, AuthFormError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AuthFormError::MissingField);
    }
    Ok(LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    })
}

pub fn register_request(username: &str, email: &str, password: &str) -> Result<RegisterRequest, AuthFormError> {
    let (username, email) = (username.trim(), email.trim());
    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AuthFormError::MissingField);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthFormError::PasswordTooShort);
    }
    Ok(RegisterRequest {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthField {
    Username,
    Email,
    Password,
}

/// Result of a key press in the overlay
#[derive(Debug, Clone, PartialEq)]
pub enum AuthInputResult {
    /// Form passed client-side checks
    Submit(Action),
    /// User closed the overlay
    Cancel,
}

/// Login / register form drawn over the current view
#[derive(Debug, Clone)]
pub struct AuthOverlay {
    mode: AuthMode,
    username: String,
    email: String,
    password: String,
    field: AuthField,
    error_message: Option<String>,
    busy: bool,
}

impl AuthOverlay {
    pub fn login() -> Self {
        Self::new(AuthMode::Login)
    }

    pub fn register() -> Self {
        Self::new(AuthMode::Register)
    }

    fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            username: String::new(),
            email: String::new(),
            password: String::new(),
            field: AuthField::Username,
            error_message: None,
            busy: false,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn set_busy(&mut self) {
        self.busy = true;
        self.error_message = None;
    }

    /// Show an error and clear the password so it can be retyped.
    pub fn set_error(&mut self, message: String) {
        self.error_message = Some(message);
        self.password.clear();
        self.busy = false;
    }

    fn fields(&self) -> &'static [AuthField] {
        match self.mode {
            AuthMode::Login => &[AuthField::Username, AuthField::Password],
            AuthMode::Register => &[AuthField::Username, AuthField::Email, AuthField::Password],
        }
    }

    fn move_field(&mut self, forward: bool) {
        let fields = self.fields();
        let idx = fields.iter().position(|f| *f == self.field).unwrap_or(0);
        let next = if forward {
            (idx + 1) % fields.len()
        } else {
            (idx + fields.len() - 1) % fields.len()
        };
        self.field = fields[next];
    }

    fn buffer_mut(&mut self) -> &mut String {
        match self.field {
            AuthField::Username => &mut self.username,
            AuthField::Email => &mut self.email,
            AuthField::Password => &mut self.password,
        }
    }

    fn submit(&mut self) -> Option<AuthInputResult> {
        let action = match self.mode {
            AuthMode::Login => login_request(&self.username, &self.password).map(Action::Login),
            AuthMode::Register => {
                register_request(&self.username, &self.email, &self.password).map(Action::Register)
            }
        };
        match action {
            Ok(action) => Some(AuthInputResult::Submit(action)),
            Err(e) => {
                self.error_message = Some(e.to_string());
                None
            }
        }
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<AuthInputResult> {
        if self.busy {
            return None;
        }
        match key.code {
            KeyCode::Esc => Some(AuthInputResult::Cancel),
            KeyCode::Tab | KeyCode::Down => {
                self.move_field(true);
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.move_field(false);
                None
            }
            KeyCode::Enter => {
                if self.field == AuthField::Password {
                    self.submit()
                } else {
                    self.move_field(true);
                    None
                }
            }
            KeyCode::Char(c) => {
                self.buffer_mut().push(c);
                None
            }
            KeyCode::Backspace => {
                self.buffer_mut().pop();
                None
            }
            _ => None,
        }
    }

    pub fn render(&self, frame: &mut Frame, palette: &Palette) {
        let height = if self.mode == AuthMode::Register { 40 } else { 34 };
        let area = super::help::centered_rect(50, height, frame.area());
        frame.render_widget(Clear, area);

        let title = match self.mode {
            AuthMode::Login => " Log in ",
            AuthMode::Register => " Register ",
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.warn))
            .style(Style::default().fg(palette.fg).bg(palette.bg));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let masked = "*".repeat(self.password.chars().count());
        let mut lines = vec![Line::from("")];
        for field in self.fields() {
            let (label, value) = match field {
                AuthField::Username => ("Username", self.username.as_str()),
                AuthField::Email => ("Email", self.email.as_str()),
                AuthField::Password => ("Password", masked.as_str()),
            };
            let focused = *field == self.field;
            let style = if focused {
                Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.muted)
            };
            lines.push(Line::from(vec![
                Span::styled(format!(" {} {label:<9}", if focused { "▸" } else { " " }), style),
                Span::styled(value.to_string(), Style::default().fg(palette.fg)),
            ]));
        }
        lines.push(Line::from(""));

        let footer = if self.busy {
            Line::from(Span::styled(" Please wait...", Style::default().fg(palette.muted)))
        } else if let Some(error) = &self.error_message {
            Line::from(Span::styled(format!(" {error}"), Style::default().fg(palette.error)))
        } else {
            Line::from(Span::styled(
                " Tab: Next field | Enter: Submit | Esc: Cancel",
                Style::default().fg(palette.muted),
            ))
        };
        lines.push(footer);

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, crossterm::event::KeyModifiers::NONE)
    }

    fn type_str(overlay: &mut AuthOverlay, text: &str) {
        for c in text.chars() {
            overlay.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_login_submit() {
        let mut overlay = AuthOverlay::login();
        type_str(&mut overlay, "ann");
        assert!(overlay.handle_key(key(KeyCode::Enter)).is_none());
        type_str(&mut overlay, "pw");
        let result = overlay.handle_key(key(KeyCode::Enter));
        assert_eq!(
            result,
            Some(AuthInputResult::Submit(Action::Login(LoginRequest {
                username: "ann".into(),
                password: "pw".into(),
            })))
        );
    }

    #[test]
    fn test_login_requires_all_fields() {
        let mut overlay = AuthOverlay::login();
        overlay.handle_key(key(KeyCode::Tab));
        type_str(&mut overlay, "secret");
        assert!(overlay.handle_key(key(KeyCode::Enter)).is_none());
        assert_eq!(overlay.error(), Some("Please fill in all fields"));
    }

    #[test]
    fn test_register_short_password() {
        let mut overlay = AuthOverlay::register();
        type_str(&mut overlay, "bob");
        overlay.handle_key(key(KeyCode::Enter));
        type_str(&mut overlay, "bob@example.com");
        overlay.handle_key(key(KeyCode::Enter));
        type_str(&mut overlay, "12345");
        assert!(overlay.handle_key(key(KeyCode::Enter)).is_none());
        assert_eq!(overlay.error(), Some("Password must be at least 6 characters"));

        type_str(&mut overlay, "6");
        assert!(matches!(
            overlay.handle_key(key(KeyCode::Enter)),
            Some(AuthInputResult::Submit(Action::Register(_)))
        ));
    }

    #[test]
    fn test_backspace_and_escape() {
        let mut overlay = AuthOverlay::login();
        type_str(&mut overlay, "abc");
        overlay.handle_key(key(KeyCode::Backspace));
        assert_eq!(overlay.username, "ab");
        assert_eq!(overlay.handle_key(key(KeyCode::Esc)), Some(AuthInputResult::Cancel));
    }

    #[test]
    fn test_busy_ignores_keys_until_error() {
        let mut overlay = AuthOverlay::login();
        overlay.set_busy();
        assert!(overlay.handle_key(key(KeyCode::Esc)).is_none());
        overlay.password = "wrong".into();
        overlay.set_error("Invalid username or password".into());
        assert!(!overlay.busy);
        assert!(overlay.password.is_empty());
        assert_eq!(overlay.handle_key(key(KeyCode::Esc)), Some(AuthInputResult::Cancel));
    }

    #[test]
    fn test_request_builders_trim() {
        let req = register_request(" bob ", " b@x.io ", "abcdef").unwrap();
        assert_eq!(req.username, "bob");
        assert_eq!(req.email, "b@x.io");
        assert_eq!(login_request("  ", "x"), Err(AuthFormError::MissingField));
    }
}
