//! The credential store.

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;
use tollgate_crypto::{hash_password, HashParams};
use tollgate_types::{Error, NewUser, PlanId, Result, User, UserId, UserPatch, UserStatus};
use tracing::error;

/// Storage contract for user accounts.
///
/// Implementations must guarantee that no plaintext password is ever
/// persisted: any write carrying a password field hashes it first. They
/// must also enforce uniqueness of username, email, and device binding.
pub trait UserStore: Send + Sync {
    /// Creates a user, hashing the password before persistence.
    ///
    /// Fails `Conflict` when the username or email is already taken.
    fn create(&self, new: NewUser) -> Result<User>;

    fn find_by_id(&self, id: UserId) -> Result<Option<User>>;

    fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Finds a user whose email **or** username equals `needle`.
    fn find_by_email_or_username(&self, needle: &str) -> Result<Option<User>>;

    /// Applies a partial update. A present password is re-hashed; a device
    /// binding in the patch is checked for uniqueness.
    ///
    /// Fails `NotFound` for an unknown id, `Conflict` on a unique-field
    /// collision.
    fn update(&self, id: UserId, patch: UserPatch) -> Result<User>;

    /// Binds `device_id` to the user only if no binding exists, as a single
    /// conditional update. Returns whether the binding was written.
    ///
    /// A successful bind is first-login activation: it also moves the user
    /// to `Active`. Two concurrent first logins can both observe an empty
    /// binding, but only one of them gets `Ok(true)` here.
    fn bind_device_if_unbound(&self, id: UserId, device_id: &str) -> Result<bool>;

    fn list(&self) -> Result<Vec<User>>;

    /// Number of users whose live plan link points at `plan_id`.
    fn count_referencing_plan(&self, plan_id: PlanId) -> Result<usize>;
}

/// In-memory credential store.
pub struct MemoryUserStore {
    users: RwLock<HashMap<UserId, User>>,
    hash_params: HashParams,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_params(HashParams::default())
    }

    /// Creates a store with explicit hashing cost parameters. Tests use
    /// [`HashParams::fast`] to keep Argon2 cheap.
    #[must_use]
    pub fn with_params(hash_params: HashParams) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            hash_params,
        }
    }

    fn hash(&self, password: &str) -> Result<String> {
        hash_password(password, &self.hash_params).map_err(|e| {
            error!("password hashing failed: {e}");
            Error::Internal
        })
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore for MemoryUserStore {
    fn create(&self, new: NewUser) -> Result<User> {
        let mut users = self.users.write();

        for existing in users.values() {
            if existing.email == new.email || existing.username == new.username {
                return Err(Error::conflict("email or username already registered"));
            }
        }

        let password_hash = self.hash(&new.password)?;
        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            username: new.username,
            full_name: new.full_name,
            email: new.email,
            password_hash,
            role: new.role,
            status: new.status,
            device_id: None,
            subscription_type: new.subscription_type,
            subscription_plan_id: new.subscription_plan_id,
            subscription_start: now,
            subscription_end: new.subscription_end,
            created_by: new.created_by,
            updated_by: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.users.read().get(&id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    fn find_by_email_or_username(&self, needle: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.email == needle || u.username == needle)
            .cloned())
    }

    fn update(&self, id: UserId, patch: UserPatch) -> Result<User> {
        // Hash outside the borrow of the target record but inside the write
        // lock, so the uniqueness checks below stay atomic with the write.
        let mut users = self.users.write();

        if let Some(Some(device_id)) = &patch.device_id {
            let taken = users
                .values()
                .any(|u| u.id != id && u.device_id.as_deref() == Some(device_id.as_str()));
            if taken {
                return Err(Error::conflict("device already bound to another account"));
            }
        }

        let password_hash = match &patch.password {
            Some(password) => Some(self.hash(password)?),
            None => None,
        };

        let user = users
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("user not found"))?;

        if let Some(hash) = password_hash {
            user.password_hash = hash;
        }
        if let Some(status) = patch.status {
            user.status = status;
        }
        if let Some(device_id) = patch.device_id {
            user.device_id = device_id;
        }
        if let Some(subscription_type) = patch.subscription_type {
            user.subscription_type = subscription_type;
        }
        if let Some(plan_id) = patch.subscription_plan_id {
            user.subscription_plan_id = plan_id;
        }
        if let Some(start) = patch.subscription_start {
            user.subscription_start = start;
        }
        if let Some(end) = patch.subscription_end {
            user.subscription_end = end;
        }
        if let Some(updated_by) = patch.updated_by {
            user.updated_by = Some(updated_by);
        }
        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    fn bind_device_if_unbound(&self, id: UserId, device_id: &str) -> Result<bool> {
        let mut users = self.users.write();

        let taken = users
            .values()
            .any(|u| u.id != id && u.device_id.as_deref() == Some(device_id));
        if taken {
            return Err(Error::conflict("device already bound to another account"));
        }

        let user = users
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("user not found"))?;

        if user.device_id.is_some() {
            return Ok(false);
        }

        user.device_id = Some(device_id.to_string());
        user.status = UserStatus::Active;
        user.updated_by = Some(user.username.clone());
        user.updated_at = Utc::now();
        Ok(true)
    }

    fn list(&self) -> Result<Vec<User>> {
        let mut all: Vec<User> = self.users.read().values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    fn count_referencing_plan(&self, plan_id: PlanId) -> Result<usize> {
        Ok(self
            .users
            .read()
            .values()
            .filter(|u| u.subscription_plan_id == Some(plan_id))
            .count())
    }
}
