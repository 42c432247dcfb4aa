use crate::error::{AppError, AppResult};

/// Literal prefix a submitted link must carry.
pub const HTTPS_PREFIX: &str = "https:";

/// What fired the search input handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTrigger {
    Click,
    Key(String),
}

impl SearchTrigger {
    /// `click` (any case) is the button; anything else is a key name.
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("click") {
            SearchTrigger::Click
        } else {
            SearchTrigger::Key(raw.to_string())
        }
    }

    /// Only the button and the Enter key submit.
    pub fn submits(&self) -> bool {
        match self {
            SearchTrigger::Click => true,
            SearchTrigger::Key(key) => key == "Enter",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAction {
    /// Non-submitting key press.
    Ignored,
    /// Accepted link, already trimmed.
    Submit(String),
}

/// Decide what a search input event does. Returns `AppError::Validation`
/// carrying `alert` when a submission does not start with `https:`.
pub fn interpret(trigger: &SearchTrigger, raw: &str, alert: &str) -> AppResult<SearchAction> {
    if !trigger.submits() {
        return Ok(SearchAction::Ignored);
    }

    let value = raw.trim();
    if !value.starts_with(HTTPS_PREFIX) {
        return Err(AppError::Validation(alert.to_string()));
    }

    Ok(SearchAction::Submit(value.to_string()))
}
