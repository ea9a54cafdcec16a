//! Subscription lifecycle engine tests.

mod common;

use chrono::{Duration, Utc};
use common::{fixture, purchase_request, register_user};
use pretty_assertions::assert_eq;
use tollgate_lifecycle::UpdateSubscriptionRequest;
use tollgate_store::{SubscriptionStore, UserStore};
use tollgate_types::{
    Error, NewSubscription, PaymentStatus, SubscriptionStatus, UserId, UserStatus,
};

// ── Purchases ──

#[test]
fn purchase_snapshots_plan_and_activates_user() {
    let fx = fixture();
    let user = register_user(&fx, "alice");

    let entry = fx
        .service
        .create_subscription(purchase_request(user.id, "1_month"))
        .unwrap();

    assert_eq!(entry.subscription_type, "1_month");
    assert_eq!(entry.price, 9.99);
    assert_eq!(entry.currency, "USD");
    assert_eq!(entry.status, SubscriptionStatus::Active);
    assert_eq!(
        entry.subscription_end - entry.subscription_start,
        Duration::days(30)
    );
    assert_eq!(entry.trial_end, None);

    let stored = fx.users.find_by_id(user.id).unwrap().unwrap();
    assert_eq!(stored.status, UserStatus::Active);
    let monthly = fx.catalog.get_plan_by_key("1_month").unwrap();
    assert_eq!(stored.subscription_plan_id, Some(monthly.id));
}

#[test]
fn payment_status_follows_payment_id() {
    let fx = fixture();
    let alice = register_user(&fx, "alice");
    let bob = register_user(&fx, "bob");

    let unpaid = fx
        .service
        .create_subscription(purchase_request(alice.id, "1_month"))
        .unwrap();
    assert_eq!(unpaid.payment_status, PaymentStatus::Pending);

    let mut req = purchase_request(bob.id, "1_month");
    req.payment_id = Some("pay_42".to_string());
    let paid = fx.service.create_subscription(req).unwrap();
    assert_eq!(paid.payment_status, PaymentStatus::Completed);
}

#[test]
fn trial_end_is_set_only_for_the_trial_plan() {
    let fx = fixture();
    let user = register_user(&fx, "alice");

    let entry = fx
        .service
        .create_subscription(purchase_request(user.id, "free_trial"))
        .unwrap();

    assert_eq!(entry.trial_end, Some(entry.subscription_end));
}

#[test]
fn purchase_of_unknown_plan_is_rejected() {
    let fx = fixture();
    let user = register_user(&fx, "alice");

    let err = fx
        .service
        .create_subscription(purchase_request(user.id, "platinum"))
        .unwrap_err();
    assert!(matches!(err, Error::BadRequest(_)));
}

#[test]
fn purchase_for_unknown_user_is_not_found() {
    let fx = fixture();

    let err = fx
        .service
        .create_subscription(purchase_request(UserId::new(), "1_month"))
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn second_active_subscription_conflicts() {
    let fx = fixture();
    let user = register_user(&fx, "alice");

    fx.service
        .create_subscription(purchase_request(user.id, "1_month"))
        .unwrap();
    let err = fx
        .service
        .create_subscription(purchase_request(user.id, "1_year"))
        .unwrap_err();
    assert!(err.is_conflict());
}

// ── Lookup ──

#[test]
fn active_subscription_reports_days_remaining() {
    let fx = fixture();
    let user = register_user(&fx, "alice");
    fx.service
        .create_subscription(purchase_request(user.id, "1_month"))
        .unwrap();

    let active = fx.service.get_user_subscription(user.id).unwrap();
    assert_eq!(active.days_remaining, 30);
}

#[test]
fn lookup_without_subscription_is_not_found() {
    let fx = fixture();
    let user = register_user(&fx, "alice");

    let err = fx.service.get_user_subscription(user.id).unwrap_err();
    assert!(err.is_not_found());
}

// ── Upgrades ──

#[test]
fn upgrade_rewrites_the_user_row_only() {
    let fx = fixture();
    let user = register_user(&fx, "alice");
    fx.service
        .create_subscription(purchase_request(user.id, "1_month"))
        .unwrap();

    fx.service.upgrade_subscription(user.id, "1_year").unwrap();

    let stored = fx.users.find_by_id(user.id).unwrap().unwrap();
    assert_eq!(stored.subscription_type, "1_year");
    assert_eq!(stored.status, UserStatus::Active);
    let remaining = stored.subscription_end - Utc::now();
    assert!(remaining > Duration::days(364) && remaining <= Duration::days(365));

    // The ledger entry is untouched by the upgrade path.
    let entry = fx
        .subscriptions
        .find_active_for_user(user.id)
        .unwrap()
        .unwrap();
    assert_eq!(entry.subscription_type, "1_month");
}

#[test]
fn upgrade_restarts_the_window_from_now() {
    let fx = fixture();
    let user = register_user(&fx, "alice");

    // Trial gives 7 days; upgrading to monthly should land at ~30 days out,
    // not 37.
    fx.service.upgrade_subscription(user.id, "1_month").unwrap();
    let stored = fx.users.find_by_id(user.id).unwrap().unwrap();
    let remaining = stored.subscription_end - Utc::now();
    assert!(remaining > Duration::days(29) && remaining <= Duration::days(30));
}

#[test]
fn upgrade_to_unknown_plan_is_rejected() {
    let fx = fixture();
    let user = register_user(&fx, "alice");

    let err = fx
        .service
        .upgrade_subscription(user.id, "platinum")
        .unwrap_err();
    assert!(matches!(err, Error::BadRequest(_)));
}

// ── Cancellation ──

#[test]
fn cancelling_the_last_active_entry_expires_the_user() {
    let fx = fixture();
    let user = register_user(&fx, "alice");
    let entry = fx
        .service
        .create_subscription(purchase_request(user.id, "1_month"))
        .unwrap();

    let cancelled = fx
        .service
        .cancel_subscription(entry.id, Some("test"), None)
        .unwrap();

    assert_eq!(cancelled.status, SubscriptionStatus::Cancelled);
    assert_eq!(cancelled.notes.as_deref(), Some("Cancelled: test"));

    let stored = fx.users.find_by_id(user.id).unwrap().unwrap();
    assert_eq!(stored.status, UserStatus::Expired);
}

#[test]
fn cancellation_records_the_acting_admin() {
    let fx = fixture();
    let user = register_user(&fx, "alice");
    let entry = fx
        .service
        .create_subscription(purchase_request(user.id, "1_month"))
        .unwrap();

    let cancelled = fx
        .service
        .cancel_subscription(entry.id, Some("chargeback"), Some("root"))
        .unwrap();
    assert_eq!(cancelled.updated_by.as_deref(), Some("root"));

    let stored = fx.users.find_by_id(user.id).unwrap().unwrap();
    assert_eq!(stored.updated_by.as_deref(), Some("root"));
}

#[test]
fn cancellation_without_an_actor_is_attributed_to_the_system() {
    let fx = fixture();
    let user = register_user(&fx, "alice");
    let entry = fx
        .service
        .create_subscription(purchase_request(user.id, "1_month"))
        .unwrap();

    let cancelled = fx.service.cancel_subscription(entry.id, None, None).unwrap();
    assert_eq!(cancelled.updated_by.as_deref(), Some("system"));
}

#[test]
fn cancellation_without_reason_gets_the_default_note() {
    let fx = fixture();
    let user = register_user(&fx, "alice");
    let entry = fx
        .service
        .create_subscription(purchase_request(user.id, "1_month"))
        .unwrap();

    let cancelled = fx.service.cancel_subscription(entry.id, None, None).unwrap();
    assert_eq!(cancelled.notes.as_deref(), Some("Subscription cancelled"));
}

#[test]
fn cancelling_one_of_several_entries_keeps_the_user_active() {
    let fx = fixture();
    let user = register_user(&fx, "alice");
    let first = fx
        .service
        .create_subscription(purchase_request(user.id, "1_month"))
        .unwrap();

    // The engine forbids a second active entry, so seed one directly to
    // model imported historical data.
    let now = Utc::now();
    fx.subscriptions
        .create(NewSubscription {
            user_id: user.id,
            subscription_type: "1_year".to_string(),
            price: 99.99,
            currency: "USD".to_string(),
            payment_id: None,
            payment_status: PaymentStatus::Pending,
            payment_method: None,
            subscription_start: now,
            subscription_end: now + Duration::days(365),
            auto_renew: false,
            trial_end: None,
            created_by: None,
        })
        .unwrap();

    fx.service.cancel_subscription(first.id, None, None).unwrap();

    let stored = fx.users.find_by_id(user.id).unwrap().unwrap();
    assert_eq!(stored.status, UserStatus::Active);
}

#[test]
fn cancelling_an_unknown_entry_is_not_found() {
    let fx = fixture();
    let err = fx
        .service
        .cancel_subscription(tollgate_types::SubscriptionId::new(), None, None)
        .unwrap_err();
    assert!(err.is_not_found());
}

// ── Administrative updates ──

#[test]
fn update_can_change_status_and_notes() {
    let fx = fixture();
    let user = register_user(&fx, "alice");
    let entry = fx
        .service
        .create_subscription(purchase_request(user.id, "1_month"))
        .unwrap();

    let updated = fx
        .service
        .update_subscription(
            entry.id,
            UpdateSubscriptionRequest {
                status: Some(SubscriptionStatus::Expired),
                notes: Some("migrated".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(updated.status, SubscriptionStatus::Expired);
    assert_eq!(updated.notes.as_deref(), Some("migrated"));
}

#[test]
fn moving_an_entry_to_an_unknown_user_is_not_found() {
    let fx = fixture();
    let user = register_user(&fx, "alice");
    let entry = fx
        .service
        .create_subscription(purchase_request(user.id, "1_month"))
        .unwrap();

    let err = fx
        .service
        .update_subscription(
            entry.id,
            UpdateSubscriptionRequest {
                user_id: Some(UserId::new()),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn plan_change_recomputes_the_window_when_the_plan_resolves() {
    let fx = fixture();
    let user = register_user(&fx, "alice");
    let entry = fx
        .service
        .create_subscription(purchase_request(user.id, "1_month"))
        .unwrap();

    let updated = fx
        .service
        .update_subscription(
            entry.id,
            UpdateSubscriptionRequest {
                subscription_type: Some("1_year".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(updated.subscription_type, "1_year");
    let remaining = updated.subscription_end - Utc::now();
    assert!(remaining > Duration::days(364));
}

#[test]
fn plan_change_to_unknown_key_relabels_without_recomputing() {
    let fx = fixture();
    let user = register_user(&fx, "alice");
    let entry = fx
        .service
        .create_subscription(purchase_request(user.id, "1_month"))
        .unwrap();

    let updated = fx
        .service
        .update_subscription(
            entry.id,
            UpdateSubscriptionRequest {
                subscription_type: Some("legacy_gold".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(updated.subscription_type, "legacy_gold");
    assert_eq!(updated.subscription_end, entry.subscription_end);
}

#[test]
fn list_returns_every_entry_newest_first() {
    let fx = fixture();
    let alice = register_user(&fx, "alice");
    let bob = register_user(&fx, "bob");

    fx.service
        .create_subscription(purchase_request(alice.id, "1_month"))
        .unwrap();
    let second = fx
        .service
        .create_subscription(purchase_request(bob.id, "1_year"))
        .unwrap();

    let all = fx.service.list_subscriptions().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, second.id);
}
