//! Store layer for Tollgate.
//!
//! Three stores back the service crates:
//! - [`UserStore`] — the credential store. Enforces uniqueness of username,
//!   email, and device binding, and hashes any password that crosses its
//!   boundary (creation and update alike).
//! - [`PlanStore`] — the plan catalog, shared read-mostly reference data.
//! - [`SubscriptionStore`] — the subscription ledger of purchase/change
//!   events.
//!
//! Each store is a trait so the persistence technology stays swappable; the
//! in-memory implementations here hold a `parking_lot::RwLock` over a map
//! and perform each operation under a single lock acquisition, which makes
//! the check-and-write sequences (device binding, uniqueness) atomic within
//! one process.

mod plans;
mod subscriptions;
mod users;

pub use plans::{MemoryPlanStore, PlanStore};
pub use subscriptions::{MemorySubscriptionStore, SubscriptionStore};
pub use users::{MemoryUserStore, UserStore};
