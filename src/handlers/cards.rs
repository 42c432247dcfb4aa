use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    card,
    error::{validation_error, AppError, AppResult},
    models::{AttributeUpdate, CardDto, CreateCardDto, SearchDto},
    search::SearchTrigger,
    state::AppState,
    store::HostedCard,
};

/// Fetch a hosted card, returning 404 if it does not exist.
async fn fetch_card(state: &AppState, id: Uuid) -> AppResult<HostedCard> {
    state
        .cards
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound("Card not found".into()))
}

// ── Handlers ───────────────────────────────────────────────────────────────

/// POST /cards
///
/// Attaches a new card. A `web-link` in the body (or a configured default
/// link) starts the first refresh; the response reflects the state before
/// it completes.
pub async fn create_card(
    State(state): State<AppState>,
    Json(req): Json<CreateCardDto>,
) -> AppResult<(StatusCode, Json<CardDto>)> {
    req.validate().map_err(validation_error)?;

    let tag = req.tag.as_deref().unwrap_or(card::TAG);
    if !state.registry.is_defined(tag) {
        return Err(AppError::NotFound(format!("{tag} is not a defined component")));
    }

    let card = state.new_card();
    let ticket = match card.set_attributes(req.attributes).await {
        Some(ticket) => Some(ticket),
        None => card.connect().await,
    };

    let hosted = state.cards.insert(tag, card).await;
    let dto = hosted.to_dto().await;
    tracing::info!(card_id = %hosted.id, tag, "Card created");

    if let Some(ticket) = ticket {
        hosted.card.spawn_refresh(ticket);
    }

    Ok((StatusCode::CREATED, Json(dto)))
}

/// GET /cards/:id
pub async fn get_card(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CardDto>> {
    let hosted = fetch_card(&state, id).await?;
    Ok(Json(hosted.to_dto().await))
}

/// PATCH /cards/:id
///
/// Attribute assignment from the host page. Writing `web-link` refreshes.
pub async fn update_card(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AttributeUpdate>,
) -> AppResult<Json<CardDto>> {
    req.validate().map_err(validation_error)?;

    let hosted = fetch_card(&state, id).await?;
    let ticket = hosted.card.set_attributes(req).await;
    let dto = hosted.to_dto().await;

    if let Some(ticket) = ticket {
        tracing::info!(card_id = %id, generation = ticket.generation, "Web link assigned");
        hosted.card.spawn_refresh(ticket);
    }

    Ok(Json(dto))
}

/// DELETE /cards/:id
pub async fn delete_card(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !state.cards.remove(id).await {
        return Err(AppError::NotFound("Card not found".into()));
    }
    tracing::info!(card_id = %id, "Card removed");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /cards/:id/search
///
/// Search box event. Invalid submissions return 400 with the alert text and
/// leave the card as it was.
pub async fn search_card(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SearchDto>,
) -> AppResult<Json<CardDto>> {
    req.validate().map_err(validation_error)?;

    let hosted = fetch_card(&state, id).await?;
    let trigger = SearchTrigger::parse(&req.trigger);
    let ticket = hosted.card.submit_search(&trigger, &req.value).await?;
    let dto = hosted.to_dto().await;

    if let Some(ticket) = ticket {
        tracing::info!(card_id = %id, generation = ticket.generation, "Search submitted");
        hosted.card.spawn_refresh(ticket);
    }

    Ok(Json(dto))
}

/// GET /cards/:id/render
pub async fn render_card(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Html<String>> {
    let hosted = fetch_card(&state, id).await?;
    Ok(Html(hosted.card.render().await))
}
