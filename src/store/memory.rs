//! In-process document store.
//!
//! Collections are keyed by UUID and offer the operation surface a
//! driver-backed document store would: find, insert, update, delete,
//! bulk delete, fast counts, and a grouped amount sum. Consistency is
//! per-document only; nothing here spans two collections atomically,
//! which is exactly the guarantee settlement is written against.
//!
//! Methods are async and fallible so the rest of the crate composes the
//! same way it would against a remote store.

use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use crate::models::{CartLine, MenuItem, Payment, Review, Role, User};
use crate::store::UpdateAck;

#[derive(Clone, Default)]
pub struct MemStore {
    inner: Arc<Collections>,
}

#[derive(Default)]
struct Collections {
    users: DashMap<Uuid, User>,
    menu: DashMap<Uuid, MenuItem>,
    reviews: DashMap<Uuid, Review>,
    carts: DashMap<Uuid, CartLine>,
    payments: DashMap<Uuid, Payment>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    // -- User operations --

    pub async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self
            .inner
            .users
            .iter()
            .find(|entry| entry.value().email == email)
            .map(|entry| entry.value().clone()))
    }

    pub async fn list_users(&self) -> anyhow::Result<Vec<User>> {
        Ok(self
            .inner
            .users
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    pub async fn insert_user(&self, user: User) -> anyhow::Result<Uuid> {
        let id = user.id;
        self.inner.users.insert(id, user);
        Ok(id)
    }

    /// Unconditionally set the role. Absent ids match zero records and
    /// are not an error.
    pub async fn set_user_role(&self, id: Uuid, role: Role) -> anyhow::Result<UpdateAck> {
        match self.inner.users.get_mut(&id) {
            Some(mut user) => {
                let modified = user.role != role;
                user.role = role;
                Ok(UpdateAck {
                    matched_count: 1,
                    modified_count: modified as u64,
                })
            }
            None => Ok(UpdateAck {
                matched_count: 0,
                modified_count: 0,
            }),
        }
    }

    pub async fn delete_user(&self, id: Uuid) -> anyhow::Result<u64> {
        Ok(self.inner.users.remove(&id).is_some() as u64)
    }

    // -- Menu / review operations --

    pub async fn list_menu(&self) -> anyhow::Result<Vec<MenuItem>> {
        Ok(self
            .inner
            .menu
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    pub async fn insert_menu_item(&self, item: MenuItem) -> anyhow::Result<Uuid> {
        let id = item.id;
        self.inner.menu.insert(id, item);
        Ok(id)
    }

    pub async fn list_reviews(&self) -> anyhow::Result<Vec<Review>> {
        Ok(self
            .inner
            .reviews
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    pub async fn insert_review(&self, review: Review) -> anyhow::Result<Uuid> {
        let id = review.id;
        self.inner.reviews.insert(id, review);
        Ok(id)
    }

    // -- Cart operations --

    pub async fn carts_for_email(&self, email: &str) -> anyhow::Result<Vec<CartLine>> {
        Ok(self
            .inner
            .carts
            .iter()
            .filter(|entry| entry.value().email == email)
            .map(|entry| entry.value().clone())
            .collect())
    }

    pub async fn insert_cart_line(&self, line: CartLine) -> anyhow::Result<Uuid> {
        let id = line.id;
        self.inner.carts.insert(id, line);
        Ok(id)
    }

    pub async fn delete_cart_line(&self, id: Uuid) -> anyhow::Result<u64> {
        Ok(self.inner.carts.remove(&id).is_some() as u64)
    }

    /// Bulk delete, the "id in set" form. Counts only lines that still
    /// existed; re-deleting an already-deleted id is a no-op.
    pub async fn delete_cart_lines(&self, ids: &[Uuid]) -> anyhow::Result<u64> {
        Ok(ids
            .iter()
            .filter(|id| self.inner.carts.remove(id).is_some())
            .count() as u64)
    }

    // -- Payment operations --

    pub async fn insert_payment(&self, payment: Payment) -> anyhow::Result<Uuid> {
        let id = payment.id;
        self.inner.payments.insert(id, payment);
        Ok(id)
    }

    pub async fn payments_for_email(&self, email: &str) -> anyhow::Result<Vec<Payment>> {
        Ok(self
            .inner
            .payments
            .iter()
            .filter(|entry| entry.value().email == email)
            .map(|entry| entry.value().clone())
            .collect())
    }

    pub async fn list_payments(&self) -> anyhow::Result<Vec<Payment>> {
        Ok(self
            .inner
            .payments
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    // -- Counts and aggregation --

    pub async fn user_count(&self) -> anyhow::Result<u64> {
        Ok(self.inner.users.len() as u64)
    }

    pub async fn menu_item_count(&self) -> anyhow::Result<u64> {
        Ok(self.inner.menu.len() as u64)
    }

    pub async fn payment_count(&self) -> anyhow::Result<u64> {
        Ok(self.inner.payments.len() as u64)
    }

    /// Total revenue in one grouped pass over payment amounts. Handlers
    /// never page payment documents to fold this themselves.
    pub async fn revenue_total(&self) -> anyhow::Result<f64> {
        Ok(self
            .inner
            .payments
            .iter()
            .map(|entry| entry.value().amount)
            .sum())
    }
}

// ── Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(email: &str, role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            name: None,
            email: email.to_string(),
            role,
        }
    }

    fn cart_line(email: &str, price: f64) -> CartLine {
        CartLine {
            id: Uuid::new_v4(),
            email: email.to_string(),
            menu_id: Uuid::new_v4(),
            name: "tuna salad".to_string(),
            price,
        }
    }

    fn payment(email: &str, amount: f64, cart_ids: Vec<Uuid>) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            email: email.to_string(),
            amount,
            currency: "usd".to_string(),
            transaction_id: "pi_test".to_string(),
            cart_ids,
            paid_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn find_user_by_email_distinguishes_records() {
        let store = MemStore::new();
        store.insert_user(user("a@x.com", Role::Member)).await.unwrap();
        store.insert_user(user("b@x.com", Role::Admin)).await.unwrap();

        let found = store.find_user_by_email("b@x.com").await.unwrap().unwrap();
        assert_eq!(found.role, Role::Admin);
        assert!(store.find_user_by_email("c@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn promoting_a_missing_id_matches_zero_records() {
        let store = MemStore::new();
        let ack = store
            .set_user_role(Uuid::new_v4(), Role::Admin)
            .await
            .unwrap();
        assert_eq!(ack.matched_count, 0);
        assert_eq!(ack.modified_count, 0);
    }

    #[tokio::test]
    async fn promotion_is_idempotent() {
        let store = MemStore::new();
        let id = store.insert_user(user("a@x.com", Role::Member)).await.unwrap();

        let first = store.set_user_role(id, Role::Admin).await.unwrap();
        assert_eq!(first.modified_count, 1);

        let second = store.set_user_role(id, Role::Admin).await.unwrap();
        assert_eq!(second.matched_count, 1);
        assert_eq!(second.modified_count, 0);
        assert_eq!(
            store.find_user_by_email("a@x.com").await.unwrap().unwrap().role,
            Role::Admin
        );
    }

    #[tokio::test]
    async fn deleting_a_user_twice_reports_zero_the_second_time() {
        let store = MemStore::new();
        let id = store.insert_user(user("a@x.com", Role::Member)).await.unwrap();
        assert_eq!(store.delete_user(id).await.unwrap(), 1);
        assert_eq!(store.delete_user(id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn bulk_cart_delete_counts_only_existing_lines() {
        let store = MemStore::new();
        let keep = cart_line("a@x.com", 5.0);
        let gone = cart_line("a@x.com", 7.5);
        let keep_id = store.insert_cart_line(keep).await.unwrap();
        let gone_id = store.insert_cart_line(gone).await.unwrap();

        let removed = store
            .delete_cart_lines(&[gone_id, Uuid::new_v4()])
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.carts_for_email("a@x.com").await.unwrap().len(), 1);

        // Re-running the same bulk delete is a no-op.
        assert_eq!(store.delete_cart_lines(&[gone_id]).await.unwrap(), 0);
        assert_eq!(store.delete_cart_lines(&[keep_id]).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn revenue_is_zero_on_empty_collection_then_sums_amounts() {
        let store = MemStore::new();
        assert_eq!(store.revenue_total().await.unwrap(), 0.0);

        store.insert_payment(payment("a@x.com", 10.0, vec![])).await.unwrap();
        store.insert_payment(payment("b@x.com", 15.0, vec![])).await.unwrap();

        assert_eq!(store.revenue_total().await.unwrap(), 25.0);
        assert_eq!(store.payment_count().await.unwrap(), 2);
    }
}
