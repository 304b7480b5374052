//! Integration tests for the acceptance workflow.
//!
//! Covers:
//! - Due-ness scenarios against the store
//! - One prompt per session, then suppression
//! - Recording acceptance and its effect on the next visit
//! - Anonymous visitors

mod common;

use common::{days_ago, reference_now, settings_with_period, TestHarness};
use gdpr_sla::common::ContactId;
use gdpr_sla::domains::sla::actions::{
    handle_request, is_contact_due_acceptance, record_acceptance, FormPrompt, PromptDecision,
    RecordOutcome, SlaRequest,
};
use gdpr_sla::domains::sla::{PromptFlag, PromptStateMachine, SlaError};
use gdpr_sla::kernel::test_dependencies::{MockAcceptanceStore, StaticSettingsProvider};
use gdpr_sla::kernel::BaseAcceptanceStore;
use gdpr_sla::{RawSlaSettings, SlaSettings};

fn browse(path: &str) -> SlaRequest {
    SlaRequest {
        path: path.to_string(),
        ..Default::default()
    }
}

fn submit() -> SlaRequest {
    SlaRequest {
        path: "/civicrm/sla/accept".to_string(),
        accepted: true,
        ..Default::default()
    }
}

fn form() -> PromptDecision {
    PromptDecision::Show(FormPrompt {
        form_path: "/civicrm/sla/accept",
    })
}

// ============================================================================
// Due-ness scenarios
// ============================================================================

#[tokio::test]
async fn twelve_month_period_accepted_400_days_ago_is_due() {
    let contact = ContactId::new();
    let h = TestHarness::new(
        settings_with_period(12.0),
        MockAcceptanceStore::new().with_acceptance(contact, days_ago(400)),
        reference_now(),
    );
    let session = h.visit(Some(contact)).await;

    let due = is_contact_due_acceptance(None, &session, &h.deps).await.unwrap();
    assert_eq!(due, Some(true));
}

#[tokio::test]
async fn twelve_month_period_accepted_30_days_ago_is_not_due() {
    let contact = ContactId::new();
    let h = TestHarness::new(
        settings_with_period(12.0),
        MockAcceptanceStore::new().with_acceptance(contact, days_ago(30)),
        reference_now(),
    );
    let session = h.visit(Some(contact)).await;

    let due = is_contact_due_acceptance(None, &session, &h.deps).await.unwrap();
    assert_eq!(due, Some(false));
}

#[tokio::test]
async fn six_month_period_accepted_200_days_ago_is_due() {
    let contact = ContactId::new();
    let h = TestHarness::new(
        settings_with_period(6.0),
        MockAcceptanceStore::new().with_acceptance(contact, days_ago(200)),
        reference_now(),
    );
    let session = h.visit(Some(contact)).await;

    let due = is_contact_due_acceptance(None, &session, &h.deps).await.unwrap();
    assert_eq!(due, Some(true));
}

#[tokio::test]
async fn contact_without_acceptance_is_due() {
    let h = TestHarness::new(
        settings_with_period(12.0),
        MockAcceptanceStore::new(),
        reference_now(),
    );
    let session = h.visit(Some(ContactId::new())).await;

    let due = is_contact_due_acceptance(None, &session, &h.deps).await.unwrap();
    assert_eq!(due, Some(true));
}

#[tokio::test]
async fn same_timestamp_prefers_newest_record() {
    let contact = ContactId::new();
    let h = TestHarness::new(
        settings_with_period(12.0),
        MockAcceptanceStore::new(),
        reference_now(),
    );

    // The fixed clock stamps both acceptances with the same instant
    let first = record_acceptance(Some(contact), &h.deps).await.unwrap();
    let second = record_acceptance(Some(contact), &h.deps).await.unwrap();
    assert_eq!(
        first.event().map(|e| e.accepted_at),
        second.event().map(|e| e.accepted_at)
    );

    let latest = h
        .deps
        .acceptance_store
        .find_latest_acceptance(contact)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(Some(&latest), second.event());
}

// ============================================================================
// Recording
// ============================================================================

#[tokio::test]
async fn anonymous_acceptance_is_not_recorded() {
    let h = TestHarness::new(
        settings_with_period(12.0),
        MockAcceptanceStore::new(),
        reference_now(),
    );

    let outcome = record_acceptance(None, &h.deps).await.unwrap();

    assert_eq!(outcome, RecordOutcome::NotRecorded);
    assert!(h.store.created().is_empty());
}

// ============================================================================
// Orchestration across requests
// ============================================================================

#[tokio::test]
async fn due_contact_is_prompted_until_they_accept() {
    let contact = ContactId::new();
    let h = TestHarness::new(
        settings_with_period(12.0),
        MockAcceptanceStore::new().with_acceptance(contact, days_ago(400)),
        reference_now(),
    );
    let session = h.visit(Some(contact)).await;

    // First request flags the form
    let decision = handle_request(&browse("/civicrm/dashboard"), &session, &h.deps)
        .await
        .unwrap();
    assert_eq!(decision, form());

    // Still pending on the next page; the pending flag is re-checked
    let decision = handle_request(&browse("/civicrm/contribute"), &session, &h.deps)
        .await
        .unwrap();
    assert_eq!(decision, form());
    assert_eq!(h.store.lookups(), vec![contact, contact]);

    // Submitting records and suppresses
    let decision = handle_request(&submit(), &session, &h.deps).await.unwrap();
    assert_eq!(decision, PromptDecision::Recorded);
    assert_eq!(h.store.created().len(), 1);

    let prompt = PromptStateMachine::new(&session);
    assert!(prompt.show_form_is_unflagged().await.unwrap());
    assert!(!prompt.show_form_is_flagged().await.unwrap());

    let decision = handle_request(&browse("/civicrm/dashboard"), &session, &h.deps)
        .await
        .unwrap();
    assert_eq!(decision, PromptDecision::Suppressed);
    assert_eq!(h.store.lookups().len(), 2, "Suppressed sessions skip the store");
}

#[tokio::test]
async fn next_visit_after_acceptance_is_not_due() {
    let contact = ContactId::new();
    let h = TestHarness::new(
        settings_with_period(12.0),
        MockAcceptanceStore::new(),
        reference_now(),
    );

    let first_visit = h.visit(Some(contact)).await;
    handle_request(&browse("/civicrm"), &first_visit, &h.deps)
        .await
        .unwrap();
    handle_request(&submit(), &first_visit, &h.deps).await.unwrap();

    let second_visit = h.visit(Some(contact)).await;
    let decision = handle_request(&browse("/civicrm"), &second_visit, &h.deps)
        .await
        .unwrap();
    assert_eq!(decision, PromptDecision::NotDue);
}

#[tokio::test]
async fn flag_over_suppressed_is_revalidated_against_the_store() {
    let contact = ContactId::new();
    let h = TestHarness::new(
        settings_with_period(12.0),
        MockAcceptanceStore::new().with_acceptance(contact, days_ago(30)),
        reference_now(),
    );
    let session = h.visit(Some(contact)).await;

    handle_request(&browse("/civicrm"), &session, &h.deps)
        .await
        .unwrap();
    let prompt = PromptStateMachine::new(&session);
    assert_eq!(prompt.state().await.unwrap(), PromptFlag::Suppressed);

    // Flagging goes straight from Suppressed to ShouldShow
    prompt.flag_show_form().await.unwrap();
    assert_eq!(prompt.state().await.unwrap(), PromptFlag::ShouldShow);

    // The acceptance is still current, so the pending prompt is dropped again
    let decision = handle_request(&browse("/civicrm"), &session, &h.deps)
        .await
        .unwrap();
    assert_eq!(decision, PromptDecision::NotDue);
    assert_eq!(prompt.state().await.unwrap(), PromptFlag::Suppressed);
}

#[tokio::test]
async fn fractional_period_from_settings_drives_due_check() {
    let contact = ContactId::new();
    let settings = SlaSettings::from_raw(RawSlaSettings {
        sla_prompt: Some("1".to_string()),
        sla_period: Some("1.5".to_string()),
        ..Default::default()
    })
    .unwrap();
    let h = TestHarness::new(
        settings,
        MockAcceptanceStore::new().with_acceptance(contact, days_ago(50)),
        reference_now(),
    );
    let session = h.visit(Some(contact)).await;

    // 1.5 months is 45 days 15 hours
    let decision = handle_request(&browse("/civicrm"), &session, &h.deps)
        .await
        .unwrap();
    assert_eq!(decision, form());
}

#[tokio::test]
async fn anonymous_visitor_is_left_alone() {
    let h = TestHarness::new(
        settings_with_period(12.0),
        MockAcceptanceStore::new(),
        reference_now(),
    );
    let session = h.visit(None).await;

    let decision = handle_request(&browse("/civicrm"), &session, &h.deps)
        .await
        .unwrap();
    assert_eq!(decision, PromptDecision::Anonymous);

    let decision = handle_request(&submit(), &session, &h.deps).await.unwrap();
    assert_eq!(decision, PromptDecision::NotRecorded);

    assert_eq!(
        PromptStateMachine::new(&session).state().await.unwrap(),
        PromptFlag::Unset
    );
    assert!(h.store.lookups().is_empty());
}

#[tokio::test]
async fn invalid_period_is_reported_not_prompted() {
    let contact = ContactId::new();
    let h = TestHarness::new(
        settings_with_period(-3.0),
        MockAcceptanceStore::new().with_acceptance(contact, days_ago(30)),
        reference_now(),
    );
    let session = h.visit(Some(contact)).await;

    let result = handle_request(&browse("/civicrm"), &session, &h.deps).await;

    assert!(matches!(
        result,
        Err(SlaError::InvalidPeriod { months }) if months == -3.0
    ));
    assert_eq!(
        PromptStateMachine::new(&session).state().await.unwrap(),
        PromptFlag::Unset
    );
}

// ============================================================================
// Settings lifecycle
// ============================================================================

#[tokio::test]
async fn settings_are_read_once_at_load() {
    let provider = StaticSettingsProvider::new(RawSlaSettings {
        sla_prompt: Some("1".to_string()),
        sla_period: Some("6".to_string()),
        ..Default::default()
    });

    let settings = SlaSettings::load(&provider).await.unwrap();

    assert_eq!(provider.reads(), 1);
    assert!(settings.prompt_enabled);
    assert_eq!(settings.period_months, 6.0);
}
