//! The link preview card: render state, string table and metadata source
//! composed at construction.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::error::AppResult;
use crate::i18n::{Strings, KEY_INVALID_LINK};
use crate::metadata::MetadataSource;
use crate::models::{AttributeUpdate, PreviewState};
use crate::refresh::{LoadingPolicy, MetadataFields, RefreshOutcome, RefreshPhase, RefreshTicket};
use crate::render::render_card;
use crate::search::{self, SearchAction, SearchTrigger};

pub const TAG: &str = "link-preview-card";

/// Point-in-time view of a card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardStatus {
    pub state: PreviewState,
    pub phase: RefreshPhase,
    pub refreshed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct CardState {
    preview: PreviewState,
    phase: RefreshPhase,
    /// Bumped on every web link write; guarded by the same lock as
    /// `preview` so trigger and commit never interleave.
    generation: u64,
    refreshed_at: Option<DateTime<Utc>>,
}

impl CardState {
    fn trigger(&mut self, web_link: String) -> RefreshTicket {
        self.generation += 1;
        self.preview.web_link = web_link.clone();
        self.preview.loading = true;
        self.phase = RefreshPhase::Loading;
        RefreshTicket {
            generation: self.generation,
            web_link,
        }
    }
}

struct CardInner<S> {
    state: RwLock<CardState>,
    strings: Arc<Strings>,
    source: Arc<S>,
    policy: LoadingPolicy,
}

/// Cheaply cloneable. Clones share the same card.
pub struct PreviewCard<S> {
    inner: Arc<CardInner<S>>,
}

impl<S> Clone for PreviewCard<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: MetadataSource> PreviewCard<S> {
    pub fn new(source: Arc<S>, strings: Arc<Strings>, policy: LoadingPolicy) -> Self {
        Self::with_state(PreviewState::default(), source, strings, policy)
    }

    pub fn with_state(
        initial: PreviewState,
        source: Arc<S>,
        strings: Arc<Strings>,
        policy: LoadingPolicy,
    ) -> Self {
        Self {
            inner: Arc::new(CardInner {
                state: RwLock::new(CardState {
                    preview: initial,
                    ..CardState::default()
                }),
                strings,
                source,
                policy,
            }),
        }
    }

    pub async fn snapshot(&self) -> PreviewState {
        self.inner.state.read().await.preview.clone()
    }

    pub async fn phase(&self) -> RefreshPhase {
        self.inner.state.read().await.phase
    }

    pub async fn status(&self) -> CardStatus {
        let state = self.inner.state.read().await;
        CardStatus {
            state: state.preview.clone(),
            phase: state.phase,
            refreshed_at: state.refreshed_at,
        }
    }

    /// Initial refresh for a card constructed with a web link, mirroring
    /// the first update of a freshly attached element. No-op once any
    /// trigger has happened or when the link is empty.
    pub async fn connect(&self) -> Option<RefreshTicket> {
        let mut state = self.inner.state.write().await;
        if state.generation > 0 || state.preview.web_link.is_empty() {
            return None;
        }
        let web_link = state.preview.web_link.clone();
        Some(state.trigger(web_link))
    }

    /// Attribute assignment from the host page. A web link write, even of
    /// the current value, starts a refresh.
    pub async fn set_attributes(&self, update: AttributeUpdate) -> Option<RefreshTicket> {
        let mut state = self.inner.state.write().await;
        if let Some(title) = update.title {
            state.preview.title = title;
        }
        if let Some(description) = update.description {
            state.preview.description = description;
        }
        if let Some(image_link) = update.image_link {
            state.preview.image_link = image_link;
        }
        update.web_link.map(|web_link| state.trigger(web_link))
    }

    /// Search box event. Invalid submissions return the alert as
    /// `AppError::Validation` and leave the state untouched.
    pub async fn submit_search(
        &self,
        trigger: &SearchTrigger,
        raw: &str,
    ) -> AppResult<Option<RefreshTicket>> {
        let alert = self.inner.strings.get(KEY_INVALID_LINK);
        match search::interpret(trigger, raw, alert)? {
            SearchAction::Ignored => Ok(None),
            SearchAction::Submit(web_link) => Ok(Some(self.begin_refresh(web_link).await)),
        }
    }

    pub async fn begin_refresh(&self, web_link: String) -> RefreshTicket {
        self.inner.state.write().await.trigger(web_link)
    }

    /// Commit a metadata result for `ticket`. Results for anything but the
    /// latest generation are dropped without touching the state.
    pub async fn complete_refresh(
        &self,
        ticket: &RefreshTicket,
        result: AppResult<Value>,
    ) -> RefreshOutcome {
        let mut state = self.inner.state.write().await;

        if state.generation != ticket.generation {
            tracing::debug!(
                generation = ticket.generation,
                latest = state.generation,
                web_link = %ticket.web_link,
                "Discarding superseded metadata response"
            );
            return RefreshOutcome::Superseded;
        }

        state.preview.loading = false;
        match result {
            Ok(data) => {
                MetadataFields::from_data(&data).apply_to(&mut state.preview);
                state.phase = RefreshPhase::Succeeded;
                state.refreshed_at = Some(Utc::now());
                tracing::info!(
                    generation = ticket.generation,
                    web_link = %ticket.web_link,
                    "Metadata refresh applied"
                );
                RefreshOutcome::Applied
            }
            Err(e) => {
                state.phase = RefreshPhase::Failed;
                tracing::error!(
                    generation = ticket.generation,
                    web_link = %ticket.web_link,
                    error = %e,
                    "Error fetching metadata"
                );
                RefreshOutcome::Failed
            }
        }
    }

    /// Fetch metadata for `ticket` and commit it.
    pub async fn refresh(&self, ticket: RefreshTicket) -> RefreshOutcome {
        let result = self.inner.source.fetch(&ticket.web_link).await;
        self.complete_refresh(&ticket, result).await
    }

    /// Run the refresh in the background. Under the fixed-delay policy a
    /// timer also clears `loading` once the delay passes.
    pub fn spawn_refresh(&self, ticket: RefreshTicket) -> JoinHandle<RefreshOutcome> {
        if let LoadingPolicy::FixedDelay(delay) = self.inner.policy {
            let card = self.clone();
            let generation = ticket.generation;
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                card.expire_loading(generation).await;
            });
        }

        let card = self.clone();
        tokio::spawn(async move { card.refresh(ticket).await })
    }

    /// Clear `loading` for `generation` regardless of request completion.
    /// Returns `false` when a newer trigger exists or loading already ended.
    pub async fn expire_loading(&self, generation: u64) -> bool {
        let mut state = self.inner.state.write().await;
        if state.generation != generation || !state.preview.loading {
            return false;
        }
        tracing::debug!(generation, "Loading delay elapsed before metadata completed");
        state.preview.loading = false;
        true
    }

    pub async fn render(&self) -> String {
        let state = self.inner.state.read().await;
        render_card(&state.preview, &self.inner.strings)
    }
}
