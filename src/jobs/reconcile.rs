//! Background job: retire cart lines orphaned by a partial settlement.
//!
//! Settlement inserts its payment record first and bulk-deletes the
//! covered cart lines second; when the delete under-counts, the payment
//! stands and stale lines linger. This sweep re-runs the bulk delete for
//! every recorded payment so the cart converges. Per-id deletes are
//! no-ops once a line is gone, so overlapping sweeps are harmless.

use std::time::Duration;

use tokio::time;

use crate::store::MemStore;

const SWEEP_INTERVAL: Duration = Duration::from_secs(300);

/// Spawn the background reconciler task. Call this once at startup.
pub fn spawn(store: MemStore) {
    tokio::spawn(async move {
        let mut interval = time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            if let Err(e) = sweep(&store).await {
                tracing::error!("cart reconciliation failed: {}", e);
            }
        }
    });
}

/// One reconciliation pass over all recorded payments.
pub async fn sweep(store: &MemStore) -> anyhow::Result<()> {
    let mut retired = 0u64;
    for payment in store.list_payments().await? {
        retired += store.delete_cart_lines(&payment.cart_ids).await?;
    }

    if retired > 0 {
        tracing::info!(retired, "retired stale cart lines left behind by settlement");
    }

    Ok(())
}

// ── Tests ───────────────────────────────────────────────────────
