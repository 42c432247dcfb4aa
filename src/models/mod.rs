use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::refresh::RefreshPhase;

// ============================================================================
// Card State
// ============================================================================

/// Everything the card renders. Keys serialize with the attribute names
/// host pages use (`web-link`, `image-link`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PreviewState {
    pub title: String,
    pub web_link: String,
    pub description: String,
    pub image_link: String,
    pub loading: bool,
}

impl PreviewState {
    pub fn with_web_link(web_link: impl Into<String>) -> Self {
        Self {
            web_link: web_link.into(),
            ..Self::default()
        }
    }
}

/// Partial attribute assignment. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "kebab-case")]
pub struct AttributeUpdate {
    #[validate(length(max = 2048, message = "title must be at most 2048 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 2048, message = "web-link must be at most 2048 characters"))]
    pub web_link: Option<String>,
    #[validate(length(max = 2048, message = "description must be at most 2048 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 2048, message = "image-link must be at most 2048 characters"))]
    pub image_link: Option<String>,
}

// ============================================================================
// API Shapes
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCardDto {
    /// Registered element tag; defaults to `link-preview-card`.
    pub tag: Option<String>,
    #[serde(flatten)]
    #[validate(nested)]
    pub attributes: AttributeUpdate,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SearchDto {
    #[validate(length(max = 2048, message = "search value must be at most 2048 characters"))]
    pub value: String,
    /// `click`, or the name of the pressed key (`Enter`, `a`, `Shift`, ...).
    pub trigger: String,
}

/// One hosted card as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct CardDto {
    pub id: Uuid,
    pub tag: String,
    pub state: PreviewState,
    pub phase: RefreshPhase,
    pub refreshed_at: Option<DateTime<Utc>>,
}
