//! Subscription lifecycle engine for Tollgate.
//!
//! This crate owns everything that moves subscription state:
//! - [`SubscriptionService`] — ledger purchases, upgrades, cancellation,
//!   and administrative ledger updates
//! - [`PlanCatalog`] — plan administration, including the
//!   referenced-plans-cannot-be-deleted rule
//! - [`UserAdmin`] — administrator status overrides and device-binding
//!   resets
//! - [`reconcile`] — lazy status reconciliation, run on every gated request
//! - [`RequestGuard`] — token verification, reconciliation, and role checks
//!   for protected operations
//!
//! Expiry is never detected by a background job: every check happens at
//! request time against the current clock.

mod admin;
mod catalog;
mod engine;
mod gate;
mod reconcile;

pub use admin::UserAdmin;
pub use catalog::PlanCatalog;
pub use engine::{
    ActiveSubscription, CreateSubscriptionRequest, SubscriptionService, UpdateSubscriptionRequest,
};
pub use gate::{AuthContext, RequestGuard};
pub use reconcile::reconcile;
