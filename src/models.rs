use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The two access tiers. Every record starts as `Member`; only the
/// promotion operation ever writes `Admin`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[default]
    Member,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

/// One purchasable item a user has queued, prior to payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: Uuid,
    pub email: String,
    pub menu_id: Uuid,
    pub name: String,
    pub price: f64,
}

/// Durable record of one settled payment. Immutable once inserted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub email: String,
    pub amount: f64,
    pub currency: String,
    /// Provider-side payment-intent id this record settles.
    pub transaction_id: String,
    /// Cart lines covered by the charge; retired after the insert lands.
    pub cart_ids: Vec<Uuid>,
    pub paid_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub recipe: String,
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub name: String,
    pub details: String,
    pub rating: f64,
}
