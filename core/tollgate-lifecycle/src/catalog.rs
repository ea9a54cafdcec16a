//! Plan catalog administration.

use std::sync::Arc;

use tollgate_store::{PlanStore, SubscriptionStore, UserStore};
use tollgate_types::{Error, NewPlan, PlanId, PlanPatch, Result, SubscriptionPlan};
use tracing::info;

/// Administrative surface over the plan catalog.
///
/// Holds the other stores too because deletion must prove the plan is
/// unreferenced: live user plan links and ledger key snapshots both pin a
/// plan in place.
pub struct PlanCatalog<U, P, S> {
    users: Arc<U>,
    plans: Arc<P>,
    subscriptions: Arc<S>,
}

impl<U, P, S> PlanCatalog<U, P, S>
where
    U: UserStore,
    P: PlanStore,
    S: SubscriptionStore,
{
    pub fn new(users: Arc<U>, plans: Arc<P>, subscriptions: Arc<S>) -> Self {
        Self {
            users,
            plans,
            subscriptions,
        }
    }

    /// Creates a plan. The key must be unique and the duration positive.
    pub fn create_plan(&self, new: NewPlan) -> Result<SubscriptionPlan> {
        validate_plan_fields(&new.plan_key, &new.name, new.duration_days)?;
        let plan = self.plans.create(new)?;
        info!(plan = %plan.plan_key, "plan created");
        Ok(plan)
    }

    pub fn get_plan(&self, id: PlanId) -> Result<SubscriptionPlan> {
        self.plans
            .find_by_id(id)?
            .ok_or_else(|| Error::not_found("subscription plan not found"))
    }

    pub fn get_plan_by_key(&self, key: &str) -> Result<SubscriptionPlan> {
        self.plans
            .find_by_key(key, false)?
            .ok_or_else(|| Error::not_found("subscription plan not found"))
    }

    /// Plans sorted by ascending price. Non-administrative callers should
    /// pass `active_only = true`.
    pub fn list_plans(&self, active_only: bool) -> Result<Vec<SubscriptionPlan>> {
        self.plans.list(active_only)
    }

    pub fn update_plan(&self, id: PlanId, patch: PlanPatch) -> Result<SubscriptionPlan> {
        if let Some(days) = patch.duration_days {
            if days <= 0 {
                return Err(Error::bad_request("duration must be at least one day"));
            }
        }
        if matches!(&patch.plan_key, Some(key) if key.trim().is_empty()) {
            return Err(Error::bad_request("plan key must not be empty"));
        }
        if matches!(&patch.name, Some(name) if name.trim().is_empty()) {
            return Err(Error::bad_request("plan name must not be empty"));
        }

        let plan = self.plans.update(id, patch)?;
        info!(plan = %plan.plan_key, "plan updated");
        Ok(plan)
    }

    /// Deletes a plan, but only when nothing references it: no user's live
    /// plan link and no ledger entry's key snapshot. Referenced plans can
    /// only be deactivated.
    pub fn delete_plan(&self, id: PlanId) -> Result<SubscriptionPlan> {
        let plan = self.get_plan(id)?;

        if self.users.count_referencing_plan(plan.id)? > 0 {
            return Err(Error::conflict(
                "plan is assigned to users and cannot be deleted",
            ));
        }
        if self.subscriptions.count_for_plan_key(&plan.plan_key)? > 0 {
            return Err(Error::conflict(
                "plan is referenced by subscriptions and cannot be deleted",
            ));
        }

        let deleted = self.plans.delete(id)?;
        info!(plan = %deleted.plan_key, "plan deleted");
        Ok(deleted)
    }

    /// Takes a plan off sale. Existing holders are unaffected.
    pub fn deactivate_plan(&self, id: PlanId) -> Result<SubscriptionPlan> {
        self.set_active(id, false)
    }

    pub fn reactivate_plan(&self, id: PlanId) -> Result<SubscriptionPlan> {
        self.set_active(id, true)
    }

    fn set_active(&self, id: PlanId, active: bool) -> Result<SubscriptionPlan> {
        let plan = self.get_plan(id)?;
        if plan.is_active == active {
            return Err(Error::bad_request(if active {
                "plan is already active"
            } else {
                "plan is already inactive"
            }));
        }

        let plan = self.plans.update(
            id,
            PlanPatch {
                is_active: Some(active),
                updated_by: Some("admin".to_string()),
                ..Default::default()
            },
        )?;
        info!(plan = %plan.plan_key, active, "plan availability changed");
        Ok(plan)
    }
}

fn validate_plan_fields(plan_key: &str, name: &str, duration_days: i64) -> Result<()> {
    if plan_key.trim().is_empty() {
        return Err(Error::bad_request("plan key must not be empty"));
    }
    if name.trim().is_empty() {
        return Err(Error::bad_request("plan name must not be empty"));
    }
    if duration_days <= 0 {
        return Err(Error::bad_request("duration must be at least one day"));
    }
    Ok(())
}
