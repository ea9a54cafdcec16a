//! Subscription ledger records.
//!
//! A ledger entry is a historical record of a subscription purchase or
//! change. Plan key, price, and currency are value-copied at creation time
//! so the entry stays accurate when the catalog changes later.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{SubscriptionId, UserId};

/// Lifecycle status of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Cancelled,
    Expired,
}

/// Payment settlement status recorded on the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

/// A subscription ledger entry. Belongs to exactly one user; at most one
/// `Active` entry may exist per user at any time (enforced by the lifecycle
/// engine, not the store).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub user_id: UserId,
    /// Plan key snapshot taken at purchase time.
    pub subscription_type: String,
    pub status: SubscriptionStatus,
    /// Price snapshot taken at purchase time.
    pub price: f64,
    pub currency: String,
    /// External payment reference, unique when set.
    pub payment_id: Option<String>,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub subscription_start: DateTime<Utc>,
    pub subscription_end: DateTime<Utc>,
    pub auto_renew: bool,
    /// End of the trial window, set only for trial plans.
    pub trial_end: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a ledger entry. Entries always start `Active`.
#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub user_id: UserId,
    pub subscription_type: String,
    pub price: f64,
    pub currency: String,
    pub payment_id: Option<String>,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub subscription_start: DateTime<Utc>,
    pub subscription_end: DateTime<Utc>,
    pub auto_renew: bool,
    pub trial_end: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
}

/// Partial update of a ledger entry.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionPatch {
    pub user_id: Option<UserId>,
    pub subscription_type: Option<String>,
    pub status: Option<SubscriptionStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub auto_renew: Option<bool>,
    pub notes: Option<String>,
    pub subscription_end: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}
