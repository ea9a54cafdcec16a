//! Shared fixtures for lifecycle engine tests.

#![allow(dead_code)]

use std::sync::Arc;

use tollgate_auth::{AuthService, RegisterRequest};
use tollgate_crypto::{HashParams, TokenConfig, TokenSigner};
use tollgate_lifecycle::{
    CreateSubscriptionRequest, PlanCatalog, RequestGuard, SubscriptionService, UserAdmin,
};
use tollgate_store::{MemoryPlanStore, MemorySubscriptionStore, MemoryUserStore, PlanStore};
use tollgate_types::{NewPlan, PublicUser, Role, UserId};

type Users = MemoryUserStore;
type Plans = MemoryPlanStore;
type Subs = MemorySubscriptionStore;

pub struct Fixture {
    pub users: Arc<Users>,
    pub plans: Arc<Plans>,
    pub subscriptions: Arc<Subs>,
    pub auth: AuthService<Users, Plans>,
    pub service: SubscriptionService<Users, Plans, Subs>,
    pub catalog: PlanCatalog<Users, Plans, Subs>,
    pub admin: UserAdmin<Users>,
    pub guard: RequestGuard<Users>,
}

/// Fresh stores with `free_trial` (7 days), `1_month` (30 days, 9.99), and
/// `1_year` (365 days, 99.99) seeded, plus every service wired over them.
pub fn fixture() -> Fixture {
    let users = Arc::new(MemoryUserStore::with_params(HashParams::fast()));
    let plans = Arc::new(MemoryPlanStore::new());
    let subscriptions = Arc::new(MemorySubscriptionStore::new());

    plans
        .create(NewPlan::basic("free_trial", "Free Trial", 0.0, 7))
        .unwrap();
    plans
        .create(NewPlan::basic("1_month", "Monthly", 9.99, 30))
        .unwrap();
    plans
        .create(NewPlan::basic("1_year", "Yearly", 99.99, 365))
        .unwrap();

    let seed: [u8; 32] = [7; 32];
    let auth = AuthService::new(
        users.clone(),
        plans.clone(),
        TokenSigner::from_seed(seed, TokenConfig::default()),
    );
    let guard = RequestGuard::new(users.clone(), auth.verifier());

    Fixture {
        service: SubscriptionService::new(users.clone(), plans.clone(), subscriptions.clone()),
        catalog: PlanCatalog::new(users.clone(), plans.clone(), subscriptions.clone()),
        admin: UserAdmin::new(users.clone()),
        auth,
        guard,
        users,
        plans,
        subscriptions,
    }
}

/// Registers a regular user on the default trial plan.
pub fn register_user(fx: &Fixture, username: &str) -> PublicUser {
    fx.auth
        .register(RegisterRequest {
            username: username.to_string(),
            full_name: format!("{username} Example"),
            email: format!("{username}@example.com"),
            password: "password123".to_string(),
            subscription_type: None,
            role: None,
        })
        .unwrap()
}

/// Registers an administrator account.
pub fn register_admin(fx: &Fixture, username: &str) -> PublicUser {
    fx.auth
        .register(RegisterRequest {
            username: username.to_string(),
            full_name: format!("{username} Admin"),
            email: format!("{username}@example.com"),
            password: "password123".to_string(),
            subscription_type: None,
            role: Some(Role::Admin),
        })
        .unwrap()
}

pub fn purchase_request(user_id: UserId, plan_key: &str) -> CreateSubscriptionRequest {
    CreateSubscriptionRequest {
        user_id,
        subscription_type: plan_key.to_string(),
        payment_id: None,
        payment_method: None,
        auto_renew: false,
        created_by: None,
    }
}
