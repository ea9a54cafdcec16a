//! Registration, login, and subscription status checks.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tollgate_crypto::{SessionIdentity, TokenConfig, TokenSigner, TokenVerifier};
use tollgate_store::{PlanStore, UserStore};
use tollgate_types::{
    days_remaining_ceil, Error, NewUser, PublicUser, Result, Role, User, UserId, UserStatus,
};
use tracing::{debug, error, info, warn};

use crate::validate::{is_valid_email, is_valid_password, MIN_PASSWORD_LEN};

/// Plan key assigned when a registration does not name one.
pub const DEFAULT_PLAN_KEY: &str = "free_trial";

/// One message for both unknown email and wrong password, so callers cannot
/// enumerate accounts.
const GENERIC_CREDENTIALS_MSG: &str = "invalid email or password";

const DEVICE_MISMATCH_MSG: &str = "account is bound to another device";

/// A registration request.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
    /// Plan key; defaults to [`DEFAULT_PLAN_KEY`].
    pub subscription_type: Option<String>,
    /// Defaults to [`Role::User`].
    pub role: Option<Role>,
}

/// A login request. All three fields are required.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub device_id: String,
}

/// A successful login: the signed session token plus the public projection.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub token: String,
    pub user: PublicUser,
}

/// Snapshot of a user's subscription window.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionStatusReport {
    pub subscription_active: bool,
    pub subscription_type: String,
    pub subscription_end: DateTime<Utc>,
    /// Ceiling of the remaining span in days, floored at zero.
    pub days_remaining: i64,
}

/// The authentication service.
pub struct AuthService<U, P> {
    users: Arc<U>,
    plans: Arc<P>,
    signer: TokenSigner,
}

impl<U: UserStore, P: PlanStore> AuthService<U, P> {
    pub fn new(users: Arc<U>, plans: Arc<P>, signer: TokenSigner) -> Self {
        Self {
            users,
            plans,
            signer,
        }
    }

    /// Convenience constructor with a fresh random signing key and the
    /// default 7-day token TTL.
    pub fn with_generated_key(users: Arc<U>, plans: Arc<P>) -> Self {
        Self::new(users, plans, TokenSigner::generate(TokenConfig::default()))
    }

    /// A verifier for tokens issued by this service, for the request gate.
    #[must_use]
    pub fn verifier(&self) -> TokenVerifier {
        self.signer.verifier()
    }

    /// Registers a new account.
    ///
    /// The subscription window opens now and closes after the resolved
    /// plan's duration. Admin accounts start `Active`; everyone else starts
    /// `New` and is activated by their first login.
    pub fn register(&self, req: RegisterRequest) -> Result<PublicUser> {
        if req.username.is_empty()
            || req.full_name.is_empty()
            || req.email.is_empty()
            || req.password.is_empty()
        {
            return Err(Error::bad_request("all fields are required"));
        }
        if !is_valid_email(&req.email) {
            return Err(Error::bad_request("invalid email format"));
        }
        if !is_valid_password(&req.password) {
            return Err(Error::bad_request(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters long"
            )));
        }

        if self.users.find_by_email(&req.email)?.is_some()
            || self
                .users
                .find_by_email_or_username(&req.username)?
                .is_some()
        {
            return Err(Error::conflict("email or username already registered"));
        }

        let plan_key = req
            .subscription_type
            .unwrap_or_else(|| DEFAULT_PLAN_KEY.to_string());
        let plan = self
            .plans
            .find_by_key(&plan_key, true)?
            .ok_or_else(|| Error::bad_request("invalid subscription type"))?;

        let role = req.role.unwrap_or_default();
        let status = if role.is_admin() {
            UserStatus::Active
        } else {
            UserStatus::New
        };

        let user = self.users.create(NewUser {
            created_by: Some(req.username.clone()),
            username: req.username,
            full_name: req.full_name,
            email: req.email,
            password: req.password,
            role,
            status,
            subscription_type: plan.plan_key.clone(),
            subscription_plan_id: Some(plan.id),
            subscription_end: Utc::now() + plan.duration(),
        })?;

        info!(user_id = %user.id, plan = %plan.plan_key, "user registered");
        Ok(user.to_public())
    }

    /// Logs a user in and issues a session token.
    ///
    /// Check order: blocked status, then password, then subscription
    /// expiry, then device binding. Verifying the password before touching
    /// subscription state means expiry information is never disclosed to a
    /// caller who has not proven the credentials.
    pub fn login(&self, req: LoginRequest) -> Result<LoginResponse> {
        if req.email.is_empty() || req.password.is_empty() {
            return Err(Error::bad_request("email and password are required"));
        }
        if req.device_id.is_empty() {
            return Err(Error::bad_request("device id is required"));
        }

        let user = self
            .users
            .find_by_email(&req.email)?
            .ok_or_else(|| Error::unauthorized(GENERIC_CREDENTIALS_MSG))?;

        if user.status.is_blocked() {
            warn!(user_id = %user.id, status = %user.status, "login refused: blocked status");
            return Err(Error::forbidden(format!("account is {}", user.status)));
        }

        tollgate_crypto::verify_password(&req.password, &user.password_hash).map_err(|e| {
            debug!(user_id = %user.id, "password verification failed: {e}");
            Error::unauthorized(GENERIC_CREDENTIALS_MSG)
        })?;

        let now = Utc::now();
        if !user.subscription_active_at(now) {
            return Err(Error::forbidden(
                "subscription expired, renew to continue",
            ));
        }

        let user = self.enforce_device_binding(user, &req.device_id)?;

        let token = self
            .signer
            .issue(&SessionIdentity {
                user_id: user.id,
                email: user.email.clone(),
                subscription_type: user.subscription_type.clone(),
                subscription_end: user.subscription_end,
                device_id: req.device_id,
            })
            .map_err(|e| {
                error!(user_id = %user.id, "token issuance failed: {e}");
                Error::Internal
            })?;

        info!(user_id = %user.id, "login succeeded");
        Ok(LoginResponse {
            token,
            user: user.to_public(),
        })
    }

    /// Applies the device-binding protocol and returns the user as bound.
    fn enforce_device_binding(&self, user: User, device_id: &str) -> Result<User> {
        match &user.device_id {
            Some(bound) if bound == device_id => Ok(user),
            Some(_) => {
                warn!(user_id = %user.id, "login refused: device mismatch");
                Err(Error::forbidden(DEVICE_MISMATCH_MSG))
            }
            None => {
                if self.users.bind_device_if_unbound(user.id, device_id)? {
                    self.users
                        .find_by_id(user.id)?
                        .ok_or(Error::Internal)
                } else {
                    // Lost a bind race. Re-read and accept only an identical
                    // binding.
                    let current = self.users.find_by_id(user.id)?.ok_or(Error::Internal)?;
                    if current.device_id.as_deref() == Some(device_id) {
                        Ok(current)
                    } else {
                        warn!(user_id = %user.id, "login refused: device bound concurrently");
                        Err(Error::forbidden(DEVICE_MISMATCH_MSG))
                    }
                }
            }
        }
    }

    /// Reports whether the user's subscription window is still open and how
    /// many whole days remain.
    pub fn check_subscription_status(&self, user_id: UserId) -> Result<SubscriptionStatusReport> {
        let user = self
            .users
            .find_by_id(user_id)?
            .ok_or_else(|| Error::not_found("user not found"))?;

        let now = Utc::now();
        let active = user.subscription_active_at(now);
        Ok(SubscriptionStatusReport {
            subscription_active: active,
            subscription_type: user.subscription_type,
            subscription_end: user.subscription_end,
            days_remaining: if active {
                days_remaining_ceil(now, user.subscription_end)
            } else {
                0
            },
        })
    }
}
