//! The plan catalog store.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;
use tollgate_types::{Error, NewPlan, PlanId, PlanPatch, Result, SubscriptionPlan};

/// Storage contract for the plan catalog.
///
/// The catalog is read on every registration and subscription change, so
/// implementations are expected to serve lookups from current data with no
/// caching contract of their own. Reference checks before deletion are the
/// caller's job (the catalog service), since they span other stores.
pub trait PlanStore: Send + Sync {
    /// Creates a plan. Fails `Conflict` when the key already exists.
    fn create(&self, new: NewPlan) -> Result<SubscriptionPlan>;

    /// Looks up a plan by key, optionally restricted to active plans.
    fn find_by_key(&self, key: &str, active_only: bool) -> Result<Option<SubscriptionPlan>>;

    fn find_by_id(&self, id: PlanId) -> Result<Option<SubscriptionPlan>>;

    /// Lists plans sorted by ascending price.
    fn list(&self, active_only: bool) -> Result<Vec<SubscriptionPlan>>;

    /// Applies a partial update. Fails `Conflict` when renaming onto a key
    /// already used by another plan, `NotFound` for an unknown id.
    fn update(&self, id: PlanId, patch: PlanPatch) -> Result<SubscriptionPlan>;

    /// Removes a plan outright. Fails `NotFound` for an unknown id.
    fn delete(&self, id: PlanId) -> Result<SubscriptionPlan>;
}

/// In-memory plan catalog.
#[derive(Default)]
pub struct MemoryPlanStore {
    plans: RwLock<HashMap<PlanId, SubscriptionPlan>>,
}

impl MemoryPlanStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlanStore for MemoryPlanStore {
    fn create(&self, new: NewPlan) -> Result<SubscriptionPlan> {
        let mut plans = self.plans.write();

        if plans.values().any(|p| p.plan_key == new.plan_key) {
            return Err(Error::conflict("plan key already exists"));
        }

        let now = Utc::now();
        let plan = SubscriptionPlan {
            id: PlanId::new(),
            plan_key: new.plan_key,
            name: new.name,
            price: new.price,
            currency: new.currency,
            duration_days: new.duration_days,
            description: new.description,
            features: new.features,
            max_users: new.max_users,
            is_active: new.is_active,
            created_by: new.created_by,
            updated_by: None,
            created_at: now,
            updated_at: now,
        };
        plans.insert(plan.id, plan.clone());
        Ok(plan)
    }

    fn find_by_key(&self, key: &str, active_only: bool) -> Result<Option<SubscriptionPlan>> {
        Ok(self
            .plans
            .read()
            .values()
            .find(|p| p.plan_key == key && (!active_only || p.is_active))
            .cloned())
    }

    fn find_by_id(&self, id: PlanId) -> Result<Option<SubscriptionPlan>> {
        Ok(self.plans.read().get(&id).cloned())
    }

    fn list(&self, active_only: bool) -> Result<Vec<SubscriptionPlan>> {
        let mut all: Vec<SubscriptionPlan> = self
            .plans
            .read()
            .values()
            .filter(|p| !active_only || p.is_active)
            .cloned()
            .collect();
        all.sort_by(|a, b| a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal));
        Ok(all)
    }

    fn update(&self, id: PlanId, patch: PlanPatch) -> Result<SubscriptionPlan> {
        let mut plans = self.plans.write();

        if let Some(new_key) = &patch.plan_key {
            let taken = plans
                .values()
                .any(|p| p.id != id && p.plan_key == *new_key);
            if taken {
                return Err(Error::conflict("plan key already exists"));
            }
        }

        let plan = plans
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("subscription plan not found"))?;

        if let Some(plan_key) = patch.plan_key {
            plan.plan_key = plan_key;
        }
        if let Some(name) = patch.name {
            plan.name = name;
        }
        if let Some(price) = patch.price {
            plan.price = price;
        }
        if let Some(currency) = patch.currency {
            plan.currency = currency;
        }
        if let Some(duration_days) = patch.duration_days {
            plan.duration_days = duration_days;
        }
        if let Some(description) = patch.description {
            plan.description = description;
        }
        if let Some(features) = patch.features {
            plan.features = features;
        }
        if let Some(max_users) = patch.max_users {
            plan.max_users = max_users;
        }
        if let Some(is_active) = patch.is_active {
            plan.is_active = is_active;
        }
        if let Some(updated_by) = patch.updated_by {
            plan.updated_by = Some(updated_by);
        }
        plan.updated_at = Utc::now();

        Ok(plan.clone())
    }

    fn delete(&self, id: PlanId) -> Result<SubscriptionPlan> {
        self.plans
            .write()
            .remove(&id)
            .ok_or_else(|| Error::not_found("subscription plan not found"))
    }
}
