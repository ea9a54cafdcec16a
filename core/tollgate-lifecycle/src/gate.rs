//! The request gate for protected operations.

use std::sync::Arc;

use tollgate_crypto::TokenVerifier;
use tollgate_store::UserStore;
use tollgate_types::{Error, Result, Role, UserId};
use tracing::debug;

use crate::reconcile::reconcile;

/// The identity a gated request runs as, after verification and
/// reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: UserId,
    pub role: Role,
}

impl AuthContext {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Gates every protected operation: token verification, then lazy status
/// reconciliation, then (for administrative surfaces) a role check.
pub struct RequestGuard<U> {
    users: Arc<U>,
    verifier: TokenVerifier,
}

impl<U: UserStore> RequestGuard<U> {
    pub fn new(users: Arc<U>, verifier: TokenVerifier) -> Self {
        Self { users, verifier }
    }

    /// Authorizes a request. `None` or an unverifiable token is
    /// `Unauthorized`; a blocked or lapsed account is `Forbidden` per the
    /// reconciliation rules.
    pub fn authorize(&self, token: Option<&str>) -> Result<AuthContext> {
        let token = token.ok_or_else(|| Error::unauthorized("no token provided"))?;

        let claims = self.verifier.verify(token).map_err(|e| {
            debug!("token rejected: {e}");
            Error::unauthorized("invalid or expired token")
        })?;

        let user = self
            .users
            .find_by_id(claims.sub)?
            .ok_or_else(|| Error::not_found("user not found"))?;

        let user = reconcile(self.users.as_ref(), user)?;

        Ok(AuthContext {
            user_id: user.id,
            role: user.role,
        })
    }

    /// Authorizes an administrator-only request.
    pub fn authorize_admin(&self, token: Option<&str>) -> Result<AuthContext> {
        let ctx = self.authorize(token)?;
        if !ctx.is_admin() {
            return Err(Error::forbidden("admin privileges required"));
        }
        Ok(ctx)
    }
}
