use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::gate;
use crate::auth::token::Claim;
use crate::errors::AppError;
use crate::models::{CartLine, MenuItem, Payment, Review, Role, User};
use crate::payments::{amount_minor, settlement};
use crate::stats::{self, AdminStats};
use crate::store::UpdateAck;
use crate::AppState;

// ── Request / Response DTOs ──────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: String,
}

/// Insert acknowledgment. `insertedId` is null when the operation was a
/// deliberate no-op (record already present).
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub inserted_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub deleted_count: u64,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Serialize)]
pub struct AdminFlag {
    pub admin: bool,
}

#[derive(Deserialize)]
pub struct CartQuery {
    pub email: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartRequest {
    pub email: String,
    pub menu_id: Uuid,
    pub name: String,
    pub price: f64,
}

#[derive(Deserialize)]
pub struct CreateIntentRequest {
    pub price: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentResponse {
    pub client_secret: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleRequest {
    pub email: String,
    pub amount: f64,
    pub currency: Option<String>,
    pub transaction_id: String,
    pub cart_ids: Vec<Uuid>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleResponse {
    pub inserted_id: Uuid,
    pub deleted_count: u64,
}

// ── Handlers ─────────────────────────────────────────────────

pub async fn banner() -> &'static str {
    "Bistro server is running"
}

/// POST /jwt: sign whatever claim the client supplies.
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    Json(claim): Json<Claim>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = state.tokens.issue(claim)?;
    Ok(Json(TokenResponse { token }))
}

/// GET /users (admin)
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.store.list_users().await?))
}

/// GET /users/admin/:email (self-only): is this email an admin?
pub async fn is_admin(
    State(state): State<Arc<AppState>>,
    Extension(claim): Extension<Claim>,
    Path(email): Path<String>,
) -> Result<Json<AdminFlag>, AppError> {
    gate::require_self(&claim, &email)?;

    let admin = state
        .store
        .find_user_by_email(&email)
        .await?
        .map(|user| user.role == Role::Admin)
        .unwrap_or(false);

    Ok(Json(AdminFlag { admin }))
}

/// POST /users: register if absent.
///
/// Find-before-insert, not a uniqueness constraint: two racing
/// registrations for one email can both pass the check.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<InsertAck>, AppError> {
    if state.store.find_user_by_email(&req.email).await?.is_some() {
        return Ok(Json(InsertAck {
            inserted_id: None,
            message: Some("user already exists in database".to_string()),
        }));
    }

    let id = state
        .store
        .insert_user(User {
            id: Uuid::new_v4(),
            name: req.name,
            email: req.email,
            role: Role::default(),
        })
        .await?;

    Ok(Json(InsertAck {
        inserted_id: Some(id),
        message: None,
    }))
}

/// PATCH /users/admin/:id (admin): promote to Admin. Idempotent; absent
/// ids match zero records.
pub async fn promote_admin(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<UpdateAck>, AppError> {
    let ack = state.store.set_user_role(id, Role::Admin).await?;
    Ok(Json(ack))
}

/// DELETE /users/:id (admin)
pub async fn remove_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteAck>, AppError> {
    let deleted_count = state.store.delete_user(id).await?;
    Ok(Json(DeleteAck { deleted_count }))
}

/// GET /menu
pub async fn list_menu(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MenuItem>>, AppError> {
    Ok(Json(state.store.list_menu().await?))
}

/// GET /reviews
pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Review>>, AppError> {
    Ok(Json(state.store.list_reviews().await?))
}

/// GET /carts?email=
pub async fn list_carts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CartQuery>,
) -> Result<Json<Vec<CartLine>>, AppError> {
    let email = query.email.unwrap_or_default();
    Ok(Json(state.store.carts_for_email(&email).await?))
}

/// POST /carts
pub async fn add_cart(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddCartRequest>,
) -> Result<Json<InsertAck>, AppError> {
    let id = state
        .store
        .insert_cart_line(CartLine {
            id: Uuid::new_v4(),
            email: req.email,
            menu_id: req.menu_id,
            name: req.name,
            price: req.price,
        })
        .await?;

    Ok(Json(InsertAck {
        inserted_id: Some(id),
        message: None,
    }))
}

/// DELETE /carts/:id
pub async fn remove_cart(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteAck>, AppError> {
    let deleted_count = state.store.delete_cart_line(id).await?;
    Ok(Json(DeleteAck { deleted_count }))
}

/// POST /create-payment-intent: price in, client secret out, verbatim.
/// The price is not validated here; a zero or negative value is the
/// provider's to reject.
pub async fn create_payment_intent(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateIntentRequest>,
) -> Result<Json<CreateIntentResponse>, AppError> {
    let amount = amount_minor(req.price);
    tracing::debug!(amount, "creating payment intent");

    let intent = state
        .provider
        .create_payment_intent(amount, "usd", &["card"])
        .await?;

    let client_secret = intent
        .client_secret
        .ok_or_else(|| AppError::Upstream("provider response missing client_secret".to_string()))?;

    Ok(Json(CreateIntentResponse { client_secret }))
}

/// GET /payments/:email (self-only)
pub async fn list_payments(
    State(state): State<Arc<AppState>>,
    Extension(claim): Extension<Claim>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Payment>>, AppError> {
    gate::require_self(&claim, &email)?;
    Ok(Json(state.store.payments_for_email(&email).await?))
}

/// POST /payments: settle a confirmed payment.
///
/// The intent is verified with the provider before anything is written.
/// After settlement the delete count is compared against the covered set
/// and a mismatch is flagged for reconciliation; the payment record is
/// never rolled back.
pub async fn settle(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SettleRequest>,
) -> Result<Json<SettleResponse>, AppError> {
    settlement::verify_intent(&state.provider, &req.transaction_id, req.amount).await?;

    let payment = Payment {
        id: Uuid::new_v4(),
        email: req.email,
        amount: req.amount,
        currency: req.currency.unwrap_or_else(|| "usd".to_string()),
        transaction_id: req.transaction_id,
        cart_ids: req.cart_ids,
        paid_at: Utc::now(),
    };

    let ack = settlement::settle(&state.store, payment).await?;
    if ack.removed != ack.expected {
        tracing::warn!(
            payment_id = %ack.payment_id,
            expected = ack.expected,
            removed = ack.removed,
            "settled payment left cart lines behind"
        );
    }

    Ok(Json(SettleResponse {
        inserted_id: ack.payment_id,
        deleted_count: ack.removed,
    }))
}

/// GET /admin-stats (admin)
pub async fn admin_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AdminStats>, AppError> {
    Ok(Json(stats::admin_stats(&state.store).await?))
}
