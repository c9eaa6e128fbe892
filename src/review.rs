use crate::model::{Review, Session};
use serde::Serialize;
use thiserror::Error;

pub const MAX_STARS: u8 = 5;

/// Five-star rating input. Value 0 means "no rating".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarWidget {
    value: u8,
    enabled: bool,
    /// Control under the keyboard cursor, 1..=5.
    cursor: u8,
}

impl Default for StarWidget {
    fn default() -> Self {
        Self {
            value: 0,
            enabled: false,
            cursor: 1,
        }
    }
}

impl StarWidget {
    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn cursor(&self) -> u8 {
        self.cursor
    }

    /// Activate control `star`. Activating 1 while the value is exactly 1
    /// resets to 0; any other activation sets the value. Ignored when disabled.
    pub fn click(&mut self, star: u8) {
        if !self.enabled || !(1..=MAX_STARS).contains(&star) {
            return;
        }
        self.cursor = star;
        self.value = if star == 1 && self.value == 1 { 0 } else { star };
    }

    pub fn click_cursor(&mut self) {
        self.click(self.cursor);
    }

    pub fn move_cursor(&mut self, forward: bool) {
        self.cursor = if forward {
            (self.cursor + 1).min(MAX_STARS)
        } else {
            self.cursor.saturating_sub(1).max(1)
        };
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }

    /// Enable or disable every control at once, following the session.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether control `star` renders highlighted.
    pub fn is_lit(&self, star: u8) -> bool {
        star <= self.value
    }

    pub fn hint(&self) -> String {
        if self.value == 0 {
            "Not rated (0/5)".to_string()
        } else {
            format!("{}/5", self.value)
        }
    }
}

/// Request body for `POST /reviews/:movie_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewReview {
    pub user_id: i64,
    pub rating: u8,
    pub comment: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReviewValidationError {
    #[error("Please log in before posting a review")]
    NotLoggedIn,

    #[error("Rating must be a whole number between 0 and 5")]
    InvalidRating,

    #[error("Review text cannot be empty")]
    EmptyComment,
}

/// Check a draft before any request is sent.
pub fn validate(
    session: Option<&Session>,
    rating: f64,
    comment: &str,
) -> Result<NewReview, ReviewValidationError> {
    let session = session.ok_or(ReviewValidationError::NotLoggedIn)?;
    if !rating.is_finite() || rating.fract() != 0.0 || !(0.0..=f64::from(MAX_STARS)).contains(&rating) {
        return Err(ReviewValidationError::InvalidRating);
    }
    let comment = comment.trim();
    if comment.is_empty() {
        return Err(ReviewValidationError::EmptyComment);
    }
    Ok(NewReview {
        user_id: session.user_id,
        rating: rating as u8,
        comment: comment.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitState {
    #[default]
    Idle,
    Validating,
    Submitting,
    Success(String),
    Error(String),
}

pub const SUBMITTING_MESSAGE: &str = "Submitting review...";
pub const SUBMIT_SUCCESS_MESSAGE: &str = "Review posted";
pub const SUBMIT_FALLBACK_MESSAGE: &str = "Failed to post review, please try again later";

/// Review form: star widget, comment text and submission state.
#[derive(Debug, Clone, Default)]
pub struct ReviewForm {
    pub stars: StarWidget,
    pub comment: String,
    pub state: SubmitState,
}

impl ReviewForm {
    pub fn is_submitting(&self) -> bool {
        self.state == SubmitState::Submitting
    }

    /// Idle/Success/Error -> Validating -> Submitting, or -> Error without a request.
    pub fn begin_submit(&mut self, session: Option<&Session>) -> Option<NewReview> {
        if self.is_submitting() {
            return None;
        }
        self.state = SubmitState::Validating;
        match validate(session, f64::from(self.stars.value()), &self.comment) {
            Ok(draft) => {
                self.state = SubmitState::Submitting;
                Some(draft)
            }
            Err(e) => {
                self.state = SubmitState::Error(e.to_string());
                None
            }
        }
    }

    pub fn succeed(&mut self) {
        self.comment.clear();
        self.stars.reset();
        self.state = SubmitState::Success(SUBMIT_SUCCESS_MESSAGE.to_string());
    }

    /// Leave the draft untouched so the user can retry.
    pub fn fail(&mut self, message: String) {
        self.state = SubmitState::Error(message);
    }

    pub fn status_text(&self) -> Option<&str> {
        match &self.state {
            SubmitState::Idle | SubmitState::Validating => None,
            SubmitState::Submitting => Some(SUBMITTING_MESSAGE),
            SubmitState::Success(msg) | SubmitState::Error(msg) => Some(msg),
        }
    }
}

/// Reviews shown on the detail view plus the displayed running total.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewList {
    pub items: Vec<Review>,
    pub total: u64,
}

impl ReviewList {
    /// Newest first: the created review goes to the top and the total grows by one.
    pub fn prepend(&mut self, review: Review) {
        self.items.insert(0, review);
        self.total += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn session() -> Session {
        Session {
            user_id: 42,
            username: "ann".to_string(),
            email: None,
            created_at: None,
            last_login: None,
        }
    }

    fn enabled_widget() -> StarWidget {
        let mut w = StarWidget::default();
        w.set_enabled(true);
        w
    }

    #[test]
    fn test_star_one_toggles_off() {
        let mut w = enabled_widget();
        w.click(1);
        assert_eq!(w.value(), 1);
        w.click(1);
        assert_eq!(w.value(), 0);
        w.click(1);
        assert_eq!(w.value(), 1);
    }

    #[test]
    fn test_other_stars_do_not_toggle() {
        let mut w = enabled_widget();
        w.click(4);
        w.click(4);
        assert_eq!(w.value(), 4);
        w.click(1);
        assert_eq!(w.value(), 1);
        assert_eq!(w.hint(), "1/5");
        assert!(w.is_lit(1));
        assert!(!w.is_lit(2));
    }

    #[test]
    fn test_disabled_widget_ignores_clicks() {
        let mut w = StarWidget::default();
        w.click(3);
        assert_eq!(w.value(), 0);
        w.set_enabled(true);
        w.click(3);
        assert_eq!(w.value(), 3);
        w.set_enabled(false);
        w.click(5);
        assert_eq!(w.value(), 3);
        w.set_enabled(true);
        assert!(w.is_lit(3));
        assert!(!w.is_lit(4));
    }

    #[test]
    fn test_validation_rules_each_independent() {
        assert_eq!(validate(None, 3.0, "great"), Err(ReviewValidationError::NotLoggedIn));
        let s = session();
        assert_eq!(validate(Some(&s), 6.0, "great"), Err(ReviewValidationError::InvalidRating));
        assert_eq!(validate(Some(&s), -1.0, "great"), Err(ReviewValidationError::InvalidRating));
        assert_eq!(validate(Some(&s), 2.5, "great"), Err(ReviewValidationError::InvalidRating));
        assert_eq!(validate(Some(&s), f64::NAN, "great"), Err(ReviewValidationError::InvalidRating));
        assert_eq!(validate(Some(&s), 3.0, "   "), Err(ReviewValidationError::EmptyComment));

        let draft = validate(Some(&s), 0.0, "  fine  ").unwrap();
        assert_eq!(draft, NewReview { user_id: 42, rating: 0, comment: "fine".to_string() });
    }

    #[test]
    fn test_validation_messages_are_distinct() {
        let messages = [
            ReviewValidationError::NotLoggedIn.to_string(),
            ReviewValidationError::InvalidRating.to_string(),
            ReviewValidationError::EmptyComment.to_string(),
        ];
        assert_ne!(messages[0], messages[1]);
        assert_ne!(messages[1], messages[2]);
        assert_ne!(messages[0], messages[2]);
    }

    #[test]
    fn test_form_failure_keeps_draft() {
        let mut form = ReviewForm::default();
        form.stars.set_enabled(true);
        form.stars.click(4);
        form.comment = "loved it".to_string();

        let draft = form.begin_submit(Some(&session())).unwrap();
        assert_eq!(draft.rating, 4);
        assert!(form.is_submitting());
        assert!(form.begin_submit(Some(&session())).is_none());

        form.fail("server down".to_string());
        assert_eq!(form.state, SubmitState::Error("server down".to_string()));
        assert_eq!(form.comment, "loved it");
        assert_eq!(form.stars.value(), 4);

        assert!(form.begin_submit(Some(&session())).is_some());
        form.succeed();
        assert!(form.comment.is_empty());
        assert_eq!(form.stars.value(), 0);
        assert_eq!(form.status_text(), Some(SUBMIT_SUCCESS_MESSAGE));
    }

    #[test]
    fn test_form_rejects_without_session() {
        let mut form = ReviewForm::default();
        form.comment = "hello".to_string();
        assert!(form.begin_submit(None).is_none());
        assert_eq!(
            form.state,
            SubmitState::Error(ReviewValidationError::NotLoggedIn.to_string())
        );
    }

    #[test]
    fn test_prepend_grows_total_by_one() {
        let mut list = ReviewList {
            items: vec![Review::default(), Review::default(), Review::default()],
            total: 57,
        };
        let newest = Review { review_id: Some(99), ..Default::default() };
        list.prepend(newest.clone());
        assert_eq!(list.items.len(), 4);
        assert_eq!(list.items[0], newest);
        assert_eq!(list.total, 58);
    }

    proptest! {
        #[test]
        fn prop_star_value_stays_in_range(clicks in proptest::collection::vec(0u8..8, 0..40)) {
            let mut w = enabled_widget();
            for c in clicks {
                w.click(c);
                prop_assert!(w.value() <= MAX_STARS);
            }
        }

        #[test]
        fn prop_non_one_click_sets_value(prior in proptest::collection::vec(1u8..=5, 0..10), star in 2u8..=5) {
            let mut w = enabled_widget();
            for c in prior {
                w.click(c);
            }
            w.click(star);
            prop_assert_eq!(w.value(), star);
        }
    }
}
