//! Subscription plan catalog records.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::PlanId;

/// A purchasable subscription offering.
///
/// Plans are shared, read-mostly reference data. Once a plan is referenced
/// by a user or a ledger entry it can only be deactivated, never deleted;
/// ledger entries snapshot the fields they need at purchase time instead of
/// holding a live reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    pub id: PlanId,
    /// Stable unique key, e.g. `"1_year"`. Used as the snapshot reference
    /// in user records and ledger entries.
    pub plan_key: String,
    pub name: String,
    pub price: f64,
    pub currency: String,
    pub duration_days: i64,
    pub description: Option<String>,
    pub features: Vec<String>,
    /// Capacity hint, not enforced by the catalog.
    pub max_users: u32,
    pub is_active: bool,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SubscriptionPlan {
    /// The subscription window length this plan grants.
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::days(self.duration_days)
    }
}

/// Fields for creating a plan.
#[derive(Debug, Clone)]
pub struct NewPlan {
    pub plan_key: String,
    pub name: String,
    pub price: f64,
    pub currency: String,
    pub duration_days: i64,
    pub description: Option<String>,
    pub features: Vec<String>,
    pub max_users: u32,
    pub is_active: bool,
    pub created_by: Option<String>,
}

impl NewPlan {
    /// A plan with the catalog defaults: USD, single seat, active.
    #[must_use]
    pub fn basic(
        plan_key: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        duration_days: i64,
    ) -> Self {
        Self {
            plan_key: plan_key.into(),
            name: name.into(),
            price,
            currency: "USD".to_string(),
            duration_days,
            description: None,
            features: Vec::new(),
            max_users: 1,
            is_active: true,
            created_by: None,
        }
    }
}

/// Partial update of a plan. `description` follows the double-`Option`
/// convention: `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct PlanPatch {
    pub plan_key: Option<String>,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub duration_days: Option<i64>,
    pub description: Option<Option<String>>,
    pub features: Option<Vec<String>>,
    pub max_users: Option<u32>,
    pub is_active: Option<bool>,
    pub updated_by: Option<String>,
}
