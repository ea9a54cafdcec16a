//! Ledger purchases, upgrades, cancellation, and administrative updates.

use std::sync::Arc;

use chrono::Utc;
use tollgate_store::{PlanStore, SubscriptionStore, UserStore};
use tollgate_types::{
    days_remaining_ceil, Error, NewSubscription, PaymentStatus, Result, Subscription,
    SubscriptionId, SubscriptionPatch, SubscriptionStatus, UserId, UserPatch, UserStatus,
};
use tracing::{info, warn};

/// Plan key whose purchases also record a trial-end marker.
const TRIAL_PLAN_KEY: &str = "free_trial";

/// Actor recorded on writes that no authenticated user initiated.
const SYSTEM_ACTOR: &str = "system";

/// A subscription purchase.
#[derive(Debug, Clone)]
pub struct CreateSubscriptionRequest {
    pub user_id: UserId,
    /// Plan key to purchase.
    pub subscription_type: String,
    pub payment_id: Option<String>,
    pub payment_method: Option<String>,
    pub auto_renew: bool,
    /// Who initiated the purchase; defaults to `"system"`.
    pub created_by: Option<String>,
}

/// An administrative partial update of a ledger entry.
#[derive(Debug, Clone, Default)]
pub struct UpdateSubscriptionRequest {
    /// Move the entry to another (existing) user.
    pub user_id: Option<UserId>,
    /// Change the plan-key snapshot; recomputes the window when the new
    /// key resolves to an active plan.
    pub subscription_type: Option<String>,
    pub status: Option<SubscriptionStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub auto_renew: Option<bool>,
    pub notes: Option<String>,
    pub updated_by: Option<String>,
}

/// A user's active ledger entry with the derived days-remaining figure.
#[derive(Debug, Clone)]
pub struct ActiveSubscription {
    pub subscription: Subscription,
    pub days_remaining: i64,
}

/// The subscription lifecycle engine.
///
/// Two subscription-change paths exist deliberately, mirroring the system
/// this replaces: purchases write a ledger entry *and* update the user row,
/// while upgrades rewrite the user row only. See `DESIGN.md` for the
/// trade-off.
pub struct SubscriptionService<U, P, S> {
    users: Arc<U>,
    plans: Arc<P>,
    subscriptions: Arc<S>,
}

impl<U, P, S> SubscriptionService<U, P, S>
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

    /// Records a subscription purchase.
    ///
    /// Snapshots the plan's key, price, and currency into the ledger entry
    /// so later catalog edits cannot rewrite history. Fails `Conflict` when
    /// the user already holds an active entry.
    ///
    /// The existing-active check and the create are two store calls, not
    /// one atomic unit; callers must serialize purchases per user.
    pub fn create_subscription(&self, req: CreateSubscriptionRequest) -> Result<Subscription> {
        let plan = self
            .plans
            .find_by_key(&req.subscription_type, true)?
            .ok_or_else(|| Error::bad_request("invalid subscription type"))?;

        let user = self
            .users
            .find_by_id(req.user_id)?
            .ok_or_else(|| Error::not_found("user not found"))?;

        if self.subscriptions.count_active_for_user(user.id)? > 0 {
            return Err(Error::conflict("user already has an active subscription"));
        }

        let now = Utc::now();
        let end = now + plan.duration();
        let actor = req.created_by.unwrap_or_else(|| SYSTEM_ACTOR.to_string());

        let payment_status = if req.payment_id.is_some() {
            PaymentStatus::Completed
        } else {
            PaymentStatus::Pending
        };

        let entry = self.subscriptions.create(NewSubscription {
            user_id: user.id,
            subscription_type: plan.plan_key.clone(),
            price: plan.price,
            currency: plan.currency.clone(),
            payment_id: req.payment_id,
            payment_status,
            payment_method: req.payment_method,
            subscription_start: now,
            subscription_end: end,
            auto_renew: req.auto_renew,
            trial_end: (plan.plan_key == TRIAL_PLAN_KEY).then_some(end),
            created_by: Some(actor.clone()),
        })?;

        self.users.update(
            user.id,
            UserPatch {
                status: Some(UserStatus::Active),
                subscription_plan_id: Some(Some(plan.id)),
                updated_by: Some(actor),
                ..Default::default()
            },
        )?;

        info!(user_id = %user.id, plan = %plan.plan_key, subscription_id = %entry.id,
              "subscription created");
        Ok(entry)
    }

    /// The caller's own active subscription, with days remaining.
    pub fn get_user_subscription(&self, user_id: UserId) -> Result<ActiveSubscription> {
        let subscription = self
            .subscriptions
            .find_active_for_user(user_id)?
            .ok_or_else(|| Error::not_found("no active subscription found"))?;

        let days_remaining = days_remaining_ceil(Utc::now(), subscription.subscription_end);
        Ok(ActiveSubscription {
            subscription,
            days_remaining,
        })
    }

    /// Self-service upgrade: the window restarts now, it is not appended to
    /// the previous end.
    pub fn upgrade_subscription(&self, user_id: UserId, plan_key: &str) -> Result<()> {
        self.apply_upgrade(user_id, plan_key, None)
    }

    /// Administrator upgrade of any user.
    pub fn admin_upgrade_user_subscription(&self, user_id: UserId, plan_key: &str) -> Result<()> {
        self.apply_upgrade(user_id, plan_key, Some("admin".to_string()))
    }

    fn apply_upgrade(
        &self,
        user_id: UserId,
        plan_key: &str,
        updated_by: Option<String>,
    ) -> Result<()> {
        let plan = self
            .plans
            .find_by_key(plan_key, true)?
            .ok_or_else(|| Error::bad_request("invalid subscription type"))?;

        let user = self
            .users
            .find_by_id(user_id)?
            .ok_or_else(|| Error::not_found("user not found"))?;

        let now = Utc::now();
        self.users.update(
            user.id,
            UserPatch {
                subscription_type: Some(plan.plan_key.clone()),
                subscription_plan_id: Some(Some(plan.id)),
                subscription_end: Some(now + plan.duration()),
                status: Some(UserStatus::Active),
                updated_by: Some(updated_by.unwrap_or_else(|| user.username.clone())),
                ..Default::default()
            },
        )?;

        info!(user_id = %user.id, plan = %plan.plan_key, "subscription upgraded");
        Ok(())
    }

    /// Cancels a ledger entry (administrator only). `cancelled_by` records
    /// the acting administrator; absent, the write is attributed to
    /// `"system"`.
    ///
    /// When this was the user's last active entry, the user drops to
    /// `Expired`.
    pub fn cancel_subscription(
        &self,
        subscription_id: SubscriptionId,
        reason: Option<&str>,
        cancelled_by: Option<&str>,
    ) -> Result<Subscription> {
        let entry = self
            .subscriptions
            .find_by_id(subscription_id)?
            .ok_or_else(|| Error::not_found("subscription not found"))?;

        let notes = match reason {
            Some(reason) => format!("Cancelled: {reason}"),
            None => "Subscription cancelled".to_string(),
        };
        let actor = cancelled_by.unwrap_or(SYSTEM_ACTOR);

        let cancelled = self.subscriptions.update(
            entry.id,
            SubscriptionPatch {
                status: Some(SubscriptionStatus::Cancelled),
                notes: Some(notes),
                updated_by: Some(actor.to_string()),
                ..Default::default()
            },
        )?;

        if self.subscriptions.count_active_for_user(entry.user_id)? == 0 {
            self.users.update(
                entry.user_id,
                UserPatch {
                    status: Some(UserStatus::Expired),
                    updated_by: Some(actor.to_string()),
                    ..Default::default()
                },
            )?;
            warn!(user_id = %entry.user_id, "last active subscription cancelled, user expired");
        }

        info!(subscription_id = %entry.id, "subscription cancelled");
        Ok(cancelled)
    }

    /// Administrative partial update of a ledger entry.
    pub fn update_subscription(
        &self,
        subscription_id: SubscriptionId,
        req: UpdateSubscriptionRequest,
    ) -> Result<Subscription> {
        let entry = self
            .subscriptions
            .find_by_id(subscription_id)?
            .ok_or_else(|| Error::not_found("subscription not found"))?;

        if let Some(new_user) = req.user_id {
            if new_user != entry.user_id && self.users.find_by_id(new_user)?.is_none() {
                return Err(Error::not_found("new user not found"));
            }
        }

        // A plan change restarts the window from now, when the new plan
        // resolves active. An unknown key changes only the snapshot label,
        // matching the original behavior.
        let mut subscription_end = None;
        if let Some(new_key) = &req.subscription_type {
            if *new_key != entry.subscription_type {
                if let Some(plan) = self.plans.find_by_key(new_key, true)? {
                    subscription_end = Some(Utc::now() + plan.duration());
                }
            }
        }

        let updated = self.subscriptions.update(
            entry.id,
            SubscriptionPatch {
                user_id: req.user_id,
                subscription_type: req.subscription_type,
                status: req.status,
                payment_status: req.payment_status,
                auto_renew: req.auto_renew,
                notes: req.notes,
                subscription_end,
                updated_by: Some(req.updated_by.unwrap_or_else(|| "admin".to_string())),
            },
        )?;

        info!(subscription_id = %updated.id, "subscription updated");
        Ok(updated)
    }

    /// Every ledger entry, newest first (administrator only).
    pub fn list_subscriptions(&self) -> Result<Vec<Subscription>> {
        self.subscriptions.list()
    }
}
