use std::collections::HashSet;
use std::sync::RwLock;

use crate::card;
use crate::error::{AppError, AppResult};

/// Element tags the host has defined. Registration is an explicit call made
/// once at startup; defining the same tag twice is an error.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    tags: RwLock<HashSet<String>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&self, tag: &str) -> AppResult<()> {
        if !is_valid_tag(tag) {
            return Err(AppError::Validation(format!(
                "{tag:?} is not a valid custom element name"
            )));
        }

        let mut tags = self.tags.write().map_err(|_| AppError::Internal)?;
        if !tags.insert(tag.to_string()) {
            return Err(AppError::Conflict(format!("{tag} has already been defined")));
        }

        tracing::info!(tag, "Component defined");
        Ok(())
    }

    pub fn is_defined(&self, tag: &str) -> bool {
        self.tags
            .read()
            .map(|tags| tags.contains(tag))
            .unwrap_or(false)
    }
}

/// Define every component this crate provides.
pub fn register_components(registry: &ComponentRegistry) -> AppResult<()> {
    registry.define(card::TAG)
}

/// Custom element naming rules, restricted to ASCII: starts with a
/// lowercase letter, contains a hyphen, no uppercase.
fn is_valid_tag(tag: &str) -> bool {
    let mut chars = tag.chars();
    let starts_lower = chars.next().is_some_and(|c| c.is_ascii_lowercase());

    starts_lower
        && tag.contains('-')
        && tag
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '.' | '_'))
}
