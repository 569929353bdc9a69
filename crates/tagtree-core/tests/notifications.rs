//! Notification timing as seen through a session

use std::time::Duration;
use tagtree_core::prelude::*;
use tagtree_test_utils::MockSource;
use tokio::time::sleep;

async fn advance(ms: u64) {
    sleep(Duration::from_millis(ms)).await;
    tokio::task::yield_now().await;
}

#[tokio::test(start_paused = true)]
async fn success_clears_after_six_seconds() {
    let source = MockSource::with_samples();
    let mut session = EditingSession::new(TagtreeConfig::default());
    session.load_schema(&source, "customers").await.unwrap();
    session.schema_mut().toggle_selected(&"0".parse().unwrap()).unwrap();
    session.checked_mut().check("tags/financial");
    session.apply_policy_tags().unwrap();

    advance(5999).await;
    assert!(session.notifier().current().is_some());
    advance(2).await;
    assert!(session.notifier().current().is_none());
}

#[tokio::test(start_paused = true)]
async fn fetch_error_stays() {
    let source = MockSource::new();
    source.fail_with("offline");
    let mut session = EditingSession::new(TagtreeConfig::default());
    session.load_hierarchy(&source).await.unwrap();

    advance(60_000).await;
    assert_eq!(session.notifier().current().unwrap().status, Severity::Error);
}

#[tokio::test(start_paused = true)]
async fn error_replaced_by_success_then_clears() {
    let source = MockSource::with_samples();
    source.fail_with("offline");
    let mut session = EditingSession::new(TagtreeConfig::default());
    session.load_schema(&source, "customers").await.unwrap();
    assert_eq!(session.notifier().current().unwrap().status, Severity::Error);

    source.recover();
    session.load_schema(&source, "customers").await.unwrap();
    session.schema_mut().toggle_selected(&"1".parse().unwrap()).unwrap();
    session.checked_mut().check("tags/pii");
    session.apply_policy_tags().unwrap();
    assert_eq!(session.notifier().current().unwrap().status, Severity::Success);

    advance(6001).await;
    assert!(session.notifier().current().is_none());
}

#[tokio::test(start_paused = true)]
async fn configured_delay_is_used() {
    let config = TagtreeConfig::from_toml_str("[notify]\nsuccess_ms = 1000\n").unwrap();
    let mut session = EditingSession::new(config);
    let source = MockSource::with_samples();
    session.load_schema(&source, "customers").await.unwrap();
    session.schema_mut().toggle_selected(&"0".parse().unwrap()).unwrap();
    session.checked_mut().check("tags/financial");
    session.apply_policy_tags().unwrap();

    advance(999).await;
    assert!(session.notifier().current().is_some());
    advance(2).await;
    assert!(session.notifier().current().is_none());
}

#[tokio::test(start_paused = true)]
async fn shared_notifier_has_one_slot() {
    let notifier = Notifier::new();
    let mut hierarchy_page = EditingSession::with_notifier(TagtreeConfig::default(), notifier.clone());
    let schema_page = EditingSession::with_notifier(TagtreeConfig::default(), notifier.clone());

    let source = MockSource::new();
    source.fail_with("down");
    hierarchy_page.load_hierarchy(&source).await.unwrap();
    schema_page.notifier().notify(Notification::info("loaded elsewhere"));

    let shown = notifier.current().unwrap();
    assert_eq!(shown.msg, "loaded elsewhere");
    advance(6001).await;
    assert!(notifier.current().is_none());
}
