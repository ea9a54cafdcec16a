//! The subscription ledger store.

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;
use tollgate_types::{
    Error, NewSubscription, Result, Subscription, SubscriptionId, SubscriptionPatch,
    SubscriptionStatus, UserId,
};

/// Storage contract for the subscription ledger.
///
/// The single-active-entry-per-user invariant is a precondition enforced by
/// the lifecycle engine, not here: `create` will happily record a second
/// active entry, so callers must serialize per-user creation. `payment_id`
/// uniqueness *is* store-enforced.
pub trait SubscriptionStore: Send + Sync {
    fn create(&self, new: NewSubscription) -> Result<Subscription>;

    fn find_by_id(&self, id: SubscriptionId) -> Result<Option<Subscription>>;

    /// The user's most recent `Active` ledger entry, if any.
    fn find_active_for_user(&self, user_id: UserId) -> Result<Option<Subscription>>;

    fn count_active_for_user(&self, user_id: UserId) -> Result<usize>;

    /// Applies a partial update. Fails `NotFound` for an unknown id.
    fn update(&self, id: SubscriptionId, patch: SubscriptionPatch) -> Result<Subscription>;

    /// Number of ledger entries whose plan-key snapshot equals `plan_key`.
    fn count_for_plan_key(&self, plan_key: &str) -> Result<usize>;

    fn list(&self) -> Result<Vec<Subscription>>;
}

/// In-memory subscription ledger.
#[derive(Default)]
pub struct MemorySubscriptionStore {
    entries: RwLock<HashMap<SubscriptionId, Subscription>>,
}

impl MemorySubscriptionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SubscriptionStore for MemorySubscriptionStore {
    fn create(&self, new: NewSubscription) -> Result<Subscription> {
        let mut entries = self.entries.write();

        if let Some(payment_id) = &new.payment_id {
            let taken = entries
                .values()
                .any(|s| s.payment_id.as_deref() == Some(payment_id.as_str()));
            if taken {
                return Err(Error::conflict("payment id already recorded"));
            }
        }

        let now = Utc::now();
        let entry = Subscription {
            id: SubscriptionId::new(),
            user_id: new.user_id,
            subscription_type: new.subscription_type,
            status: SubscriptionStatus::Active,
            price: new.price,
            currency: new.currency,
            payment_id: new.payment_id,
            payment_status: new.payment_status,
            payment_method: new.payment_method,
            subscription_start: new.subscription_start,
            subscription_end: new.subscription_end,
            auto_renew: new.auto_renew,
            trial_end: new.trial_end,
            notes: None,
            created_by: new.created_by,
            updated_by: None,
            created_at: now,
            updated_at: now,
        };
        entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    fn find_by_id(&self, id: SubscriptionId) -> Result<Option<Subscription>> {
        Ok(self.entries.read().get(&id).cloned())
    }

    fn find_active_for_user(&self, user_id: UserId) -> Result<Option<Subscription>> {
        Ok(self
            .entries
            .read()
            .values()
            .filter(|s| s.user_id == user_id && s.status == SubscriptionStatus::Active)
            .max_by_key(|s| s.created_at)
            .cloned())
    }

    fn count_active_for_user(&self, user_id: UserId) -> Result<usize> {
        Ok(self
            .entries
            .read()
            .values()
            .filter(|s| s.user_id == user_id && s.status == SubscriptionStatus::Active)
            .count())
    }

    fn update(&self, id: SubscriptionId, patch: SubscriptionPatch) -> Result<Subscription> {
        let mut entries = self.entries.write();
        let entry = entries
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("subscription not found"))?;

        if let Some(user_id) = patch.user_id {
            entry.user_id = user_id;
        }
        if let Some(subscription_type) = patch.subscription_type {
            entry.subscription_type = subscription_type;
        }
        if let Some(status) = patch.status {
            entry.status = status;
        }
        if let Some(payment_status) = patch.payment_status {
            entry.payment_status = payment_status;
        }
        if let Some(auto_renew) = patch.auto_renew {
            entry.auto_renew = auto_renew;
        }
        if let Some(notes) = patch.notes {
            entry.notes = Some(notes);
        }
        if let Some(end) = patch.subscription_end {
            entry.subscription_end = end;
        }
        if let Some(updated_by) = patch.updated_by {
            entry.updated_by = Some(updated_by);
        }
        entry.updated_at = Utc::now();

        Ok(entry.clone())
    }

    fn count_for_plan_key(&self, plan_key: &str) -> Result<usize> {
        Ok(self
            .entries
            .read()
            .values()
            .filter(|s| s.subscription_type == plan_key)
            .count())
    }

    fn list(&self) -> Result<Vec<Subscription>> {
        let mut all: Vec<Subscription> = self.entries.read().values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }
}
