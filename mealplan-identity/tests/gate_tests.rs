//! Access gate properties over every user state and required level

use mealplan_identity::catalog::{duration_options, Feature, PlanDuration};
use mealplan_identity::gate::{evaluate, AccessLevel, DenyReason, GateDecision};
use mealplan_identity::identity::IdentityActor;
use mealplan_identity::{IdentityConfig, MemoryStore, UserRecord};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Visitor, signed-up and subscribed users
async fn user_states() -> Vec<Option<UserRecord>> {
    let handle = IdentityActor::spawn_with_store(
        Arc::new(MemoryStore::new()),
        IdentityConfig::new("/unused").with_storage_key("user"),
    )
    .await
    .unwrap();

    let free = handle.sign_up("free@x.com", "pw", None).await.unwrap();
    let paid = handle.upgrade_subscription().await.unwrap();
    vec![None, Some(free), Some(paid)]
}

#[tokio::test]
async fn test_evaluate_is_deterministic() {
    for user in user_states().await {
        for level in AccessLevel::ALL {
            let first = evaluate(user.as_ref(), level);
            for _ in 0..10 {
                assert_eq!(evaluate(user.as_ref(), level), first);
            }
        }
    }
}

#[tokio::test]
async fn test_allow_is_monotone() {
    for user in user_states().await {
        for required in AccessLevel::ALL {
            if !evaluate(user.as_ref(), required).is_allowed() {
                continue;
            }
            for lower in AccessLevel::ALL.into_iter().filter(|l| *l <= required) {
                assert_eq!(evaluate(user.as_ref(), lower), GateDecision::Allow);
            }
        }
    }
}

#[tokio::test]
async fn test_deny_reasons_match_user_presence() {
    for user in user_states().await {
        for level in AccessLevel::ALL {
            match (evaluate(user.as_ref(), level), user.as_ref()) {
                (GateDecision::Allow, _) => {
                    assert!(AccessLevel::of(user.as_ref()) >= level)
                }
                (GateDecision::Deny(DenyReason::NeedsSignUp), None) => {
                    assert!(level > AccessLevel::Visitor)
                }
                (GateDecision::Deny(DenyReason::NeedsSubscription), Some(u)) => {
                    assert!(!u.is_subscribed);
                    assert_eq!(level, AccessLevel::Subscribed);
                }
                (decision, u) => panic!("unexpected {decision:?} for {u:?}"),
            }
        }
    }
}

#[test]
fn test_visitor_content_always_allowed() {
    assert_eq!(evaluate(None, AccessLevel::Visitor), GateDecision::Allow);
    assert!(Feature::MealPlanPreview.evaluate(None).is_allowed());
    assert!(PlanDuration::ONE_WEEK.evaluate(None).is_allowed());
}

#[tokio::test]
async fn test_subscriber_unlocks_catalog() {
    let states = user_states().await;
    let paid = states[2].as_ref();

    assert!(Feature::ALL.iter().all(|f| f.evaluate(paid).is_allowed()));
    assert!(duration_options(paid).iter().all(|o| o.available));

    let visitor_options = duration_options(None);
    assert_eq!(visitor_options.iter().filter(|o| o.available).count(), 1);

    let prompt = Feature::MultiWeekPlans
        .evaluate(states[1].as_ref())
        .prompt(Some(Feature::MultiWeekPlans.label()))
        .unwrap();
    assert_eq!(prompt.reason, DenyReason::NeedsSubscription);
    assert_eq!(prompt.call_to_action, "Upgrade to Premium");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reads_during_upgrade() {
    let handle = IdentityActor::spawn_with_store(
        Arc::new(MemoryStore::new()),
        IdentityConfig::new("/unused").with_storage_key("user"),
    )
    .await
    .unwrap();
    handle.sign_up("reader@x.com", "pw", None).await.unwrap();

    let upgraded = Arc::new(AtomicBool::new(false));
    let readers: Vec<_> = (0..8)
        .map(|_| {
            let handle = handle.clone();
            let upgraded = Arc::clone(&upgraded);
            tokio::spawn(async move {
                let mut seen_allow = false;
                let mut reads_after_upgrade = 0;
                while reads_after_upgrade < 100 {
                    if upgraded.load(Ordering::Acquire) {
                        reads_after_upgrade += 1;
                    }
                    match handle.evaluate(AccessLevel::Subscribed) {
                        GateDecision::Allow => seen_allow = true,
                        GateDecision::Deny(DenyReason::NeedsSubscription) => {
                            assert!(!seen_allow, "subscription observed, then lost");
                        }
                        other => panic!("unexpected decision {other:?}"),
                    }
                    assert!(handle.current_user().is_some());
                    tokio::task::yield_now().await;
                }
                seen_allow
            })
        })
        .collect();

    let writer = {
        let handle = handle.clone();
        tokio::spawn(async move { handle.upgrade_subscription().await })
    };
    writer.await.unwrap().unwrap();
    upgraded.store(true, Ordering::Release);

    for reader in readers {
        // Every reader finishes with reads taken after the upgrade returned
        assert!(reader.await.unwrap());
    }
    assert_eq!(handle.evaluate(AccessLevel::Subscribed), GateDecision::Allow);
}
