use std::sync::Arc;

use crate::card::PreviewCard;
use crate::i18n::Strings;
use crate::metadata::HttpMetadataClient;
use crate::models::PreviewState;
use crate::refresh::LoadingPolicy;
use crate::registry::ComponentRegistry;
use crate::store::CardStore;

/// Shared application state passed to all handlers.
/// The metadata client and string table are built once at startup and
/// handed to every card created through the API.
#[derive(Clone)]
pub struct AppState {
    pub cards: CardStore,
    pub registry: Arc<ComponentRegistry>,
    pub metadata: Arc<HttpMetadataClient>,
    pub strings: Arc<Strings>,
    pub loading_policy: LoadingPolicy,
    pub default_web_link: Arc<str>,
}

impl AppState {
    /// Construct a detached card with the configured defaults.
    pub fn new_card(&self) -> PreviewCard<HttpMetadataClient> {
        PreviewCard::with_state(
            PreviewState::with_web_link(self.default_web_link.to_string()),
            Arc::clone(&self.metadata),
            Arc::clone(&self.strings),
            self.loading_policy,
        )
    }
}
