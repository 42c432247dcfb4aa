//! Metadata refresh state machine: tickets, commit outcomes and the mapping
//! from a metadata `data` object onto card fields.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use strum::{AsRefStr, Display};

use crate::models::PreviewState;

pub const NO_TITLE: &str = "Error: No title found";
pub const NO_DESCRIPTION: &str = "Error: No description found";

/// Stored in `image-link` when the metadata has no usable image. Not a URL;
/// the renderer drops the `src` attribute when it sees it.
pub const MISSING_IMAGE: &str = "no-image";

/// When the loading flag is cleared after a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadingPolicy {
    /// Cleared when the current generation's request completes.
    #[default]
    OnCompletion,
    /// Also cleared by a timer after the delay, unless a newer trigger
    /// happened in the meantime.
    FixedDelay(Duration),
}

/// Last observable phase of a card's refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RefreshPhase {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Issued for every write of the web link. Only the ticket carrying the
/// card's latest generation may commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTicket {
    pub generation: u64,
    pub web_link: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum RefreshOutcome {
    Applied,
    Failed,
    /// A newer trigger exists; the response was dropped.
    Superseded,
}

/// Card fields resolved from one metadata response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataFields {
    pub title: String,
    pub description: String,
    pub image_link: String,
}

impl MetadataFields {
    /// Resolve fields from the `data` object. First non-empty candidate wins,
    /// independently per field.
    pub fn from_data(data: &Value) -> Self {
        let title = first_text(&[&data["og:title"], &data["title"]])
            .unwrap_or_else(|| NO_TITLE.to_string());

        let description = first_text(&[&data["og:description"], &data["description"]])
            .unwrap_or_else(|| NO_DESCRIPTION.to_string());

        let ld = ld_json(data);
        let image_link = first_text(&[
            &data["og:image"],
            &image_url(&ld["logo"]),
            &image_url(&ld["publisher"]["logo"]),
        ])
        .unwrap_or_else(|| MISSING_IMAGE.to_string());

        MetadataFields {
            title,
            description,
            image_link,
        }
    }

    pub fn apply_to(self, state: &mut PreviewState) {
        state.title = self.title;
        state.description = self.description;
        state.image_link = self.image_link;
    }
}

/// `true` when the image link should not be used as an image source.
pub fn image_is_missing(image_link: &str) -> bool {
    let link = image_link.trim();
    link.is_empty() || link == MISSING_IMAGE
}

fn first_text(candidates: &[&Value]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|v| v.as_str())
        .find(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Services return JSON-LD either as one object or as an array of graph
/// nodes; the first node is used for the array form.
fn ld_json(data: &Value) -> Value {
    match &data["ld+json"] {
        Value::Array(nodes) => nodes.first().cloned().unwrap_or(Value::Null),
        other => other.clone(),
    }
}

/// A JSON-LD logo is either a URL string or an `ImageObject` with `url`.
fn image_url(logo: &Value) -> Value {
    match logo {
        Value::Object(_) => logo["url"].clone(),
        other => other.clone(),
    }
}
