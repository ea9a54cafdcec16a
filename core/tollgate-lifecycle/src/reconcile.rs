//! Lazy status reconciliation.

use chrono::Utc;
use tollgate_store::UserStore;
use tollgate_types::{Error, Result, User, UserPatch, UserStatus};
use tracing::info;

/// Reconciles a user's status against the current clock.
///
/// Runs on every gated request, so expiry and activation never need a
/// scheduler:
/// - a blocked status rejects outright;
/// - a closed subscription window persists `Expired` and rejects;
/// - a pre-activation placeholder with an open window is promoted to
///   `Active` and persisted;
/// - anything else passes through unchanged.
pub fn reconcile<U: UserStore + ?Sized>(users: &U, user: User) -> Result<User> {
    if user.status.is_blocked() {
        return Err(Error::forbidden(format!(
            "account is {}, contact support",
            user.status
        )));
    }

    let now = Utc::now();
    if !user.subscription_active_at(now) {
        users.update(
            user.id,
            UserPatch {
                status: Some(UserStatus::Expired),
                ..Default::default()
            },
        )?;
        info!(user_id = %user.id, "subscription lapsed, user expired");
        return Err(Error::forbidden("subscription expired, renew to continue"));
    }

    if user.status.awaits_activation() {
        let activated = users.update(
            user.id,
            UserPatch {
                status: Some(UserStatus::Active),
                ..Default::default()
            },
        )?;
        info!(user_id = %user.id, from = %user.status, "user activated on gated request");
        return Ok(activated);
    }

    Ok(user)
}
