//! Shared fixtures for auth service tests.

#![allow(dead_code)]

use std::sync::Arc;

use tollgate_auth::{AuthService, LoginRequest, RegisterRequest};
use tollgate_crypto::{HashParams, TokenConfig, TokenSigner};
use tollgate_store::{MemoryPlanStore, MemoryUserStore, PlanStore};
use tollgate_types::NewPlan;

pub struct Fixture {
    pub users: Arc<MemoryUserStore>,
    pub plans: Arc<MemoryPlanStore>,
    pub auth: AuthService<MemoryUserStore, MemoryPlanStore>,
}

/// An auth service over fresh stores, with `free_trial` (7 days) and
/// `1_month` (30 days, 9.99) seeded into the catalog.
pub fn fixture() -> Fixture {
    let users = Arc::new(MemoryUserStore::with_params(HashParams::fast()));
    let plans = Arc::new(MemoryPlanStore::new());

    plans
        .create(NewPlan::basic("free_trial", "Free Trial", 0.0, 7))
        .unwrap();
    plans
        .create(NewPlan::basic("1_month", "Monthly", 9.99, 30))
        .unwrap();

    let seed: [u8; 32] = [7; 32];
    let auth = AuthService::new(
        users.clone(),
        plans.clone(),
        TokenSigner::from_seed(seed, TokenConfig::default()),
    );
    Fixture { users, plans, auth }
}

pub fn register_request(username: &str, email: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        full_name: format!("{username} Example"),
        email: email.to_string(),
        password: "password123".to_string(),
        subscription_type: None,
        role: None,
    }
}

pub fn login_request(email: &str, password: &str, device_id: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
        device_id: device_id.to_string(),
    }
}
