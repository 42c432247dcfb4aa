use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::card::PreviewCard;
use crate::metadata::{HttpMetadataClient, MetadataSource};
use crate::models::CardDto;

/// A card instance attached to the host.
pub struct HostedCard<S = HttpMetadataClient> {
    pub id: Uuid,
    pub tag: String,
    pub card: PreviewCard<S>,
}

impl<S> Clone for HostedCard<S> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            tag: self.tag.clone(),
            card: self.card.clone(),
        }
    }
}

impl<S: MetadataSource> HostedCard<S> {
    pub async fn to_dto(&self) -> CardDto {
        let status = self.card.status().await;
        CardDto {
            id: self.id,
            tag: self.tag.clone(),
            state: status.state,
            phase: status.phase,
            refreshed_at: status.refreshed_at,
        }
    }
}

/// Live cards keyed by ID. Cards never share state with each other.
///
/// Cheaply cloneable; all clones share the same underlying map via `Arc`.
pub struct CardStore<S = HttpMetadataClient> {
    cards: Arc<RwLock<HashMap<Uuid, HostedCard<S>>>>,
}

impl<S> Default for CardStore<S> {
    fn default() -> Self {
        Self {
            cards: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<S> Clone for CardStore<S> {
    fn clone(&self) -> Self {
        Self {
            cards: Arc::clone(&self.cards),
        }
    }
}

impl<S: MetadataSource> CardStore<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a card under a fresh ID.
    pub async fn insert(&self, tag: &str, card: PreviewCard<S>) -> HostedCard<S> {
        let hosted = HostedCard {
            id: Uuid::new_v4(),
            tag: tag.to_string(),
            card,
        };
        self.cards.write().await.insert(hosted.id, hosted.clone());
        hosted
    }

    pub async fn get(&self, id: Uuid) -> Option<HostedCard<S>> {
        self.cards.read().await.get(&id).cloned()
    }

    /// Detach a card. In-flight refreshes still finish against the detached
    /// instance but are no longer observable.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.cards.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.cards.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cards.read().await.is_empty()
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
