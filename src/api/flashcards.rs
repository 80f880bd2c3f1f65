//! Flashcard CRUD, reviews and deck export/import.
//!
//! Every query runs under the caller's [`Scope`]: regular users only see
//! their own cards, admins see all of them. Cards outside the scope are
//! reported as not found.

use axum::{
    Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::{ApiJson, ApiPath, ApiQuery, AppState, created, ok};
use crate::auth::AuthUser;
use crate::database::Scope;
use crate::error::{AppError, Result};
use crate::models::flashcard::DEFAULT_DECK;
use crate::models::scheduler::calculate_next_review;
use crate::models::{Deck, FlashcardUpdate, NewFlashcard, ReviewRequest};

#[derive(Debug, Deserialize)]
struct ListQuery {
    deck: Option<String>,
    /// Admin only: list another user's cards
    user_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ExportQuery {
    deck: Option<String>,
}

async fn list(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<impl IntoResponse> {
    let scope = match query.user_id {
        Some(user_id) if user_id != principal.user_id => {
            if !principal.is_admin() {
                return Err(AppError::Forbidden);
            }
            Scope::Owner(user_id)
        }
        _ => Scope::Owner(principal.user_id),
    };
    let cards = state.store.list_flashcards(scope, query.deck.as_deref())?;
    Ok(ok(cards))
}

async fn due(AuthUser(principal): AuthUser, State(state): State<AppState>) -> Result<impl IntoResponse> {
    let cards = state
        .store
        .get_flashcards_due_for_review(principal.user_id, Utc::now())?;
    Ok(ok(cards))
}

async fn create(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
    ApiJson(card): ApiJson<NewFlashcard>,
) -> Result<impl IntoResponse> {
    let errors = card.validate();
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }
    let card = state.store.add_flashcard(
        principal.user_id,
        &card,
        state.scheduler.initial_ease,
        Utc::now(),
    )?;
    tracing::debug!(user_id = principal.user_id, card_id = card.id, "flashcard created");
    Ok(created(card))
}

async fn get_one(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse> {
    Ok(ok(state.store.get_flashcard(id, principal.scope())?))
}

async fn update(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(update): ApiJson<FlashcardUpdate>,
) -> Result<impl IntoResponse> {
    let errors = update.validate();
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }
    let card = state
        .store
        .update_flashcard(id, principal.scope(), &update, Utc::now())?;
    Ok(ok(card))
}

async fn remove(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse> {
    state.store.delete_flashcard(id, principal.scope())?;
    tracing::debug!(user_id = principal.user_id, card_id = id, "flashcard deleted");
    Ok(ok(json!({ "id": id, "deleted": true })))
}

async fn review(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<ReviewRequest>,
) -> Result<impl IntoResponse> {
    let quality = req.grade().map_err(|e| AppError::Validation(vec![e]))?;
    let config = state.scheduler;
    let now = Utc::now();
    let card = state.store.apply_review(id, principal.scope(), |current| {
        calculate_next_review(current, quality, now, &config)
    })?;
    tracing::debug!(
        card_id = id,
        quality,
        interval_days = card.review.interval_days,
        "flashcard reviewed"
    );
    Ok(ok(card))
}

async fn export_deck(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ExportQuery>,
) -> Result<impl IntoResponse> {
    let name = query.deck.unwrap_or_else(|| DEFAULT_DECK.to_string());
    let cards = state
        .store
        .list_flashcards(Scope::Owner(principal.user_id), Some(&name))?;
    Ok(ok(Deck::from_flashcards(name, &cards)))
}

async fn import_deck(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
    ApiJson(deck): ApiJson<Deck>,
) -> Result<impl IntoResponse> {
    let errors = deck.validate();
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }
    let imported = state.store.import_deck(
        principal.user_id,
        &deck,
        state.scheduler.initial_ease,
        Utc::now(),
    )?;
    tracing::info!(user_id = principal.user_id, deck = %deck.name, imported, "deck imported");
    Ok(created(json!({ "deck": deck.name, "imported": imported })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/flashcards", get(list).post(create))
        .route("/flashcards/due", get(due))
        .route("/flashcards/export", get(export_deck))
        .route("/flashcards/import", post(import_deck))
        .route(
            "/flashcards/{id}",
            get(get_one).put(update).delete(remove),
        )
        .route("/flashcards/{id}/review", post(review))
}
