use std::collections::HashMap;
use std::path::Path;

use crate::error::{AppError, AppResult};

pub const SUPPORTED_LOCALES: &[&str] = &["ar", "es", "hi", "zh"];

pub const KEY_TITLE: &str = "title";
pub const KEY_SEARCH: &str = "search";
pub const KEY_SEARCH_PLACEHOLDER: &str = "search-placeholder";
pub const KEY_INVALID_LINK: &str = "invalid-link";

/// Key → text lookup injected into each card.
#[derive(Debug, Clone)]
pub struct Strings {
    locale: String,
    table: HashMap<String, String>,
}

impl Default for Strings {
    fn default() -> Self {
        let table = [
            (KEY_TITLE, "Title"),
            (KEY_SEARCH, "Search"),
            (KEY_SEARCH_PLACEHOLDER, "Search"),
            (KEY_INVALID_LINK, "Please enter a valid URL starting with https:."),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            locale: "en".to_string(),
            table,
        }
    }
}

impl Strings {
    /// Overlay `{dir}/link-preview-card.{locale}.json` on the defaults.
    ///
    /// Unsupported locales and missing files yield the defaults; a file that
    /// exists but is not a flat JSON object of strings is a config error.
    pub fn load(dir: &Path, locale: &str) -> AppResult<Self> {
        let mut strings = Self::default();
        if !SUPPORTED_LOCALES.contains(&locale) {
            return Ok(strings);
        }

        let path = dir.join(format!("link-preview-card.{locale}.json"));
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Locale file unavailable, using defaults");
                return Ok(strings);
            }
        };

        let overrides: HashMap<String, String> = serde_json::from_str(&raw)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))?;

        strings.table.extend(overrides);
        strings.locale = locale.to_string();
        Ok(strings)
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Unknown keys resolve to the key itself.
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.table.get(key).map(String::as_str).unwrap_or(key)
    }
}
