//! Core type definitions for Tollgate.
//!
//! This crate defines the fundamental types shared by every service crate:
//! - User, plan, and subscription-ledger identifiers (UUID v7)
//! - The domain records (`User`, `SubscriptionPlan`, `Subscription`) with
//!   their patch and projection types
//! - The domain error taxonomy
//!
//! Anything that touches a store, a hash, or a wire format belongs in the
//! crates layered above this one, not here.

mod error;
mod ids;
pub mod plan;
pub mod subscription;
pub mod time;
pub mod user;

pub use error::{Error, Result};
pub use ids::{PlanId, SubscriptionId, UserId};
pub use time::days_remaining_ceil;
pub use plan::{NewPlan, PlanPatch, SubscriptionPlan};
pub use subscription::{
    NewSubscription, PaymentStatus, Subscription, SubscriptionPatch, SubscriptionStatus,
};
pub use user::{NewUser, PublicUser, Role, User, UserPatch, UserStatus};
