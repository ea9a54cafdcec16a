//! Administrator operations on user accounts.

use std::sync::Arc;

use tollgate_store::UserStore;
use tollgate_types::{Error, PublicUser, Result, UserId, UserPatch, UserStatus};
use tracing::info;

/// Administrative surface over user accounts.
pub struct UserAdmin<U> {
    users: Arc<U>,
}

impl<U: UserStore> UserAdmin<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    /// Forces a user into any status, bypassing lifecycle rules. This is the
    /// only way out of a blocked status.
    pub fn set_user_status(&self, user_id: UserId, status: UserStatus) -> Result<PublicUser> {
        let user = self.users.update(
            user_id,
            UserPatch {
                status: Some(status),
                updated_by: Some("admin".to_string()),
                ..Default::default()
            },
        )?;
        info!(user_id = %user.id, status = %status, "user status overridden");
        Ok(user.to_public())
    }

    /// Clears a user's device binding so their next login can bind a new
    /// device. The account drops back to `New` until that login.
    pub fn reset_device_binding(&self, user_id: UserId) -> Result<PublicUser> {
        let user = self
            .users
            .find_by_id(user_id)?
            .ok_or_else(|| Error::not_found("user not found"))?;

        let user = self.users.update(
            user.id,
            UserPatch {
                device_id: Some(None),
                status: Some(UserStatus::New),
                updated_by: Some("admin".to_string()),
                ..Default::default()
            },
        )?;
        info!(user_id = %user.id, "device binding reset");
        Ok(user.to_public())
    }

    /// Every account, newest first, as public projections.
    pub fn list_users(&self) -> Result<Vec<PublicUser>> {
        Ok(self
            .users
            .list()?
            .iter()
            .map(|u| u.to_public())
            .collect())
    }
}
