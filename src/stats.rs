//! Dashboard roll-up over the persisted collections.

use serde::Serialize;

use crate::errors::AppError;
use crate::store::MemStore;

/// Counts are the store's fast counts (dashboard metrics, not financial
/// statements); revenue is a single grouped sum the store performs over
/// payment amounts.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub users: u64,
    pub menu_items: u64,
    pub orders: u64,
    pub revenue: f64,
}

pub async fn admin_stats(store: &MemStore) -> Result<AdminStats, AppError> {
    Ok(AdminStats {
        users: store.user_count().await?,
        menu_items: store.menu_item_count().await?,
        orders: store.payment_count().await?,
        revenue: store.revenue_total().await?,
    })
}

// ── Tests ───────────────────────────────────────────────────────
