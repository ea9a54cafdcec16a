//! Authentication service for Tollgate.
//!
//! This crate handles:
//! - Registration with input validation and plan resolution
//! - Password login bound to a single device per account
//! - Signed session-token issuance
//! - Subscription status reporting
//!
//! # Device Binding
//!
//! An account's first successful login binds it to whatever device id the
//! client presented, and that login activates the account. Every later
//! login must present the same device id until an administrator resets the
//! binding. The bind itself is a single conditional store update, so two
//! racing first logins from different devices cannot both win.

mod service;
mod validate;

pub use service::{
    AuthService, LoginRequest, LoginResponse, RegisterRequest, SubscriptionStatusReport,
    DEFAULT_PLAN_KEY,
};
