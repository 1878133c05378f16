//! Access gate: composable checks applied in front of protected routes.
//!
//! `authenticate` establishes identity, `require_admin` gates on role,
//! and `require_self` is the lighter ownership variant for routes scoped
//! to the caller's own email. Admin routes stack `authenticate` then
//! `require_admin`; `require_admin` assumes the claim is already in the
//! request extensions and treats its absence as a failed authentication.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::auth::token::Claim;
use crate::errors::AppError;
use crate::models::Role;
use crate::AppState;

/// Authentication check: require a bearer token and attach the decoded
/// claim to the request.
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    // "Bearer <token>": only the position is significant, the scheme
    // word itself is not inspected.
    let token = header_value
        .split_whitespace()
        .nth(1)
        .ok_or(AppError::Unauthorized)?;

    let claim = state.tokens.verify(token)?;
    tracing::debug!(email = %claim.email, "bearer token verified");

    req.extensions_mut().insert(claim);
    Ok(next.run(req).await)
}

/// Role check: the authenticated email must map to an `Admin` record in
/// the user directory. Runs strictly after `authenticate`.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claim = req
        .extensions()
        .get::<Claim>()
        .ok_or(AppError::Unauthorized)?;

    match state.store.find_user_by_email(&claim.email).await? {
        Some(user) if user.role == Role::Admin => Ok(next.run(req).await),
        _ => {
            tracing::warn!(email = %claim.email, "admin route denied");
            Err(AppError::Forbidden)
        }
    }
}

/// Ownership check for self-scoped routes: the authenticated email must
/// match the path parameter. No directory lookup involved.
pub fn require_self(claim: &Claim, email: &str) -> Result<(), AppError> {
    if claim.email != email {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

// ── Tests ───────────────────────────────────────────────────────
