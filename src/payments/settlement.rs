//! Post-payment settlement: verify the charge, record it, retire the
//! cart lines it paid for.
//!
//! The two mutations are separate store operations, not one transaction.
//! The payment insert is authoritative: once it lands, the payment is
//! settled for accounting purposes even if the cart delete then removes
//! fewer lines than expected. Under-counts are surfaced in the ack for
//! the caller to report, never rolled back; the reconciler job sweeps
//! stale lines up later.

use uuid::Uuid;

use crate::errors::AppError;
use crate::models::Payment;
use crate::payments::amount_minor;
use crate::payments::provider::StripeClient;
use crate::store::MemStore;

/// Acknowledgments from both halves of a settlement.
#[derive(Debug, Clone, Copy)]
pub struct SettlementAck {
    pub payment_id: Uuid,
    /// Cart lines the payment claims to cover.
    pub expected: u64,
    /// Cart lines the bulk delete actually removed.
    pub removed: u64,
}

/// Confirm with the provider that the referenced intent actually charged
/// the claimed amount. Called before any state is mutated; failure here
/// leaves both collections untouched.
pub async fn verify_intent(
    provider: &StripeClient,
    transaction_id: &str,
    amount: f64,
) -> Result<(), AppError> {
    let intent = provider.retrieve_payment_intent(transaction_id).await?;

    if intent.status != "succeeded" {
        return Err(AppError::PaymentUnverified {
            reason: format!("intent {} has status '{}'", intent.id, intent.status),
        });
    }

    let claimed = amount_minor(amount);
    if intent.amount != claimed {
        return Err(AppError::PaymentUnverified {
            reason: format!(
                "intent {} charged {} but settlement claims {}",
                intent.id, intent.amount, claimed
            ),
        });
    }

    Ok(())
}

/// Record `payment` and retire the cart lines it covers.
///
/// Insertion failure aborts with no cart mutation. A delete that removes
/// fewer lines than expected is reported through the ack; detecting and
/// flagging the mismatch is the caller's job.
pub async fn settle(store: &MemStore, payment: Payment) -> Result<SettlementAck, AppError> {
    let expected = payment.cart_ids.len() as u64;
    let cart_ids = payment.cart_ids.clone();

    let payment_id = store.insert_payment(payment).await?;
    let removed = store.delete_cart_lines(&cart_ids).await?;

    Ok(SettlementAck {
        payment_id,
        expected,
        removed,
    })
}

// ── Tests ───────────────────────────────────────────────────────
