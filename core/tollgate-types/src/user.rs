//! User account records and their state machine vocabulary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{PlanId, UserId};

/// Account role. Administrators may manage plans, ledger entries, and other
/// users; everything else is a regular user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}

/// Account status.
///
/// `New`, `Pending`, `Trial`, and `AwaitingActivation` are pre-activation
/// placeholders: a gated request while the subscription window is still open
/// promotes them to `Active`. The blocked statuses are administrator sink
/// states and refuse login until an administrator moves the user out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    New,
    Active,
    Suspended,
    Expired,
    Banned,
    Inactive,
    Disabled,
    Pending,
    Trial,
    AwaitingActivation,
}

impl UserStatus {
    /// Statuses that refuse login and gated requests outright.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        matches!(
            self,
            Self::Suspended | Self::Expired | Self::Banned | Self::Inactive | Self::Disabled
        )
    }

    /// Pre-activation placeholders that a valid subscription window promotes
    /// to `Active` on the next gated request.
    #[must_use]
    pub fn awaits_activation(&self) -> bool {
        matches!(
            self,
            Self::New | Self::Pending | Self::Trial | Self::AwaitingActivation
        )
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Expired => "expired",
            Self::Banned => "banned",
            Self::Inactive => "inactive",
            Self::Disabled => "disabled",
            Self::Pending => "pending",
            Self::Trial => "trial",
            Self::AwaitingActivation => "awaiting_activation",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user account as persisted by the credential store.
///
/// `password_hash` is always a PHC-format Argon2id hash; plaintext never
/// crosses the persistence boundary. `device_id` is set at most once per
/// account until an administrator resets it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub status: UserStatus,
    /// Device binding. `None` until the first successful login binds it.
    pub device_id: Option<String>,
    /// Plan key snapshot of the most recent subscription change.
    pub subscription_type: String,
    pub subscription_plan_id: Option<PlanId>,
    pub subscription_start: DateTime<Utc>,
    pub subscription_end: DateTime<Utc>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether the subscription window is still open at `now`.
    #[must_use]
    pub fn subscription_active_at(&self, now: DateTime<Utc>) -> bool {
        now < self.subscription_end
    }

    /// The projection returned to callers. Never contains the hash.
    #[must_use]
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            username: self.username.clone(),
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            role: self.role,
            status: self.status,
            subscription_type: self.subscription_type.clone(),
            subscription_plan_id: self.subscription_plan_id,
            subscription_end: self.subscription_end,
            device_id: self.device_id.clone(),
        }
    }
}

/// Public projection of a user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: UserId,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    pub subscription_type: String,
    pub subscription_plan_id: Option<PlanId>,
    pub subscription_end: DateTime<Utc>,
    pub device_id: Option<String>,
}

/// Fields for creating a user. The `password` is plaintext here and is
/// hashed by the credential store before anything is persisted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub status: UserStatus,
    pub subscription_type: String,
    pub subscription_plan_id: Option<PlanId>,
    pub subscription_end: DateTime<Utc>,
    pub created_by: Option<String>,
}

/// Partial update of a user record.
///
/// For `device_id` and `subscription_plan_id`, `Some(None)` clears the
/// field, `Some(Some(v))` sets it, `None` leaves it untouched. A present
/// `password` is re-hashed by the store before persistence.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub password: Option<String>,
    pub status: Option<UserStatus>,
    pub device_id: Option<Option<String>>,
    pub subscription_type: Option<String>,
    pub subscription_plan_id: Option<Option<PlanId>>,
    pub subscription_start: Option<DateTime<Utc>>,
    pub subscription_end: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}
