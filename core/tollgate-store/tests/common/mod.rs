//! Shared builders for store tests.

#![allow(dead_code)]

use chrono::{Duration, Utc};
use tollgate_crypto::HashParams;
use tollgate_store::MemoryUserStore;
use tollgate_types::{NewPlan, NewSubscription, NewUser, PaymentStatus, Role, UserId, UserStatus};

/// A user store with cheap Argon2 parameters.
pub fn user_store() -> MemoryUserStore {
    MemoryUserStore::with_params(HashParams::fast())
}

/// A registration-shaped user: role user, status new, 7-day window.
pub fn new_user(username: &str, email: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        full_name: format!("{username} Example"),
        email: email.to_string(),
        password: "password123".to_string(),
        role: Role::User,
        status: UserStatus::New,
        subscription_type: "free_trial".to_string(),
        subscription_plan_id: None,
        subscription_end: Utc::now() + Duration::days(7),
        created_by: Some(username.to_string()),
    }
}

pub fn new_plan(key: &str, price: f64, duration_days: i64) -> NewPlan {
    NewPlan::basic(key, format!("{key} plan"), price, duration_days)
}

/// An active 30-day ledger entry for `user_id`.
pub fn new_subscription(user_id: UserId, plan_key: &str) -> NewSubscription {
    let now = Utc::now();
    NewSubscription {
        user_id,
        subscription_type: plan_key.to_string(),
        price: 9.99,
        currency: "USD".to_string(),
        payment_id: None,
        payment_status: PaymentStatus::Pending,
        payment_method: None,
        subscription_start: now,
        subscription_end: now + Duration::days(30),
        auto_renew: false,
        trial_end: None,
        created_by: Some("system".to_string()),
    }
}
