//! End-to-end flows: sign up, fill in the form, submit, watch the lists.

mod common;

use analysttrack::backend::{DocumentStore, Query};
use analysttrack::error::AuthErrorKind;
use analysttrack::model::{Confidence, PREDICTIONS, PredictionStatus, Timeframe, USERS, UserProfile};
use analysttrack::state::{Action, InputMode, Store, SubmitField, View};
use analysttrack::{Error, LocalBackend, Services};
use common::faulty_services;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn store() -> Store {
    Store::new()
}

fn type_text(store: &mut Store, text: &str) {
    for c in text.chars() {
        store.reduce(Action::InputChar(c));
    }
}

/// Focus `field` on the submission form and type into it.
fn fill(store: &mut Store, field: SubmitField, text: &str) {
    while store.submit_form.focus != field {
        store.reduce(Action::NextField);
    }
    type_text(store, text);
}

#[tokio::test]
async fn test_jane_doe_signs_up_and_predicts_aapl() {
    let backend = LocalBackend::new();
    let services = Services::local(backend.clone());
    let mut store = store();
    let mut sessions = services.session.watch();
    store.reduce(Action::SessionChanged(sessions.next_snapshot().await.unwrap()));
    assert!(!store.session.is_signed_in());

    // Sign up
    let session = services
        .session
        .signup("jane@example.com", "secret123", "Jane Doe", "")
        .await
        .unwrap();
    store.reduce(Action::SessionChanged(Some(session)));
    assert_eq!(store.session.display_name(), Some("Jane Doe"));
    assert_eq!(store.session.accuracy(), 0.0);

    // The observer reports the same principal with its profile.
    let observed = sessions.next_snapshot().await.flatten().unwrap();
    assert_eq!(observed.profile.map(|p| p.stats.total_predictions), Some(0));

    // Fill in the form
    store.reduce(Action::SetView(View::Submit));
    store.reduce(Action::SetInputMode(InputMode::Editing));
    fill(&mut store, SubmitField::Stock, "aapl");
    fill(&mut store, SubmitField::TargetPrice, "210.00");
    fill(&mut store, SubmitField::Timeframe, "");
    store.reduce(Action::CycleOption(1));
    fill(&mut store, SubmitField::Confidence, "");
    store.reduce(Action::CycleOption(1));
    fill(&mut store, SubmitField::Reasoning, "strong earnings");

    // Submit
    let principal = store.session.current.as_ref().unwrap().principal.clone();
    let new = store.submit_form.draft.validate().unwrap();
    store.reduce(Action::SubmitPrediction);
    let id = services
        .predictions
        .create_prediction(&principal, new)
        .await
        .unwrap();
    store.reduce(Action::PredictionSubmitted(id.clone()));

    assert!(store.submit_form.draft.stock.is_empty());
    assert_eq!(store.submit_form.draft.timeframe, Timeframe::ThreeMonths);
    assert_eq!(store.submit_form.draft.confidence, Confidence::Medium);
    assert_eq!(
        store.app.notification.as_ref().map(|n| n.message.as_str()),
        Some("Prediction submitted successfully!")
    );

    // Profile counter
    let doc = backend.get(USERS, &principal.uid).await.unwrap().unwrap();
    let profile = UserProfile::from_document(&doc).unwrap();
    assert_eq!(profile.stats.total_predictions, 1);

    // Ledger
    let mut ledger = services.predictions.subscribe_to_all_predictions().unwrap();
    let views = ledger.next_snapshot().await.unwrap();
    store.reduce(Action::SetView(View::Predictions));
    store.reduce(Action::PredictionsLoaded(views));

    let view = store.predictions.selected().unwrap();
    assert_eq!(view.analyst, "Jane Doe");
    assert_eq!(view.prediction.id, id);
    assert_eq!(view.prediction.stock, "AAPL");
    assert_eq!(view.prediction.target_price, dec!(210.00));
    assert_eq!(view.prediction.timeframe, Timeframe::SixMonths);
    assert_eq!(view.prediction.confidence, Confidence::High);
    assert_eq!(view.prediction.status, PredictionStatus::Active);

    // Directory
    let mut analysts = services.analysts.subscribe_to_top_analysts(20).unwrap();
    let top = analysts.next_snapshot().await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].name, "Jane Doe");
    assert_eq!(top[0].stats.accuracy, 0.0);

    ledger.unsubscribe();
    analysts.unsubscribe();
    assert_eq!(backend.listener_count(), 0);
}

#[tokio::test]
async fn test_empty_reasoning_is_rejected_without_writing() {
    let (services, store_backend) = faulty_services();
    let session = services
        .session
        .signup("sam@example.com", "secret123", "Sam", "Energy & Utilities")
        .await
        .unwrap();
    let attempts_after_signup = store_backend.commit_attempts();

    let mut store = store();
    store.reduce(Action::SessionChanged(Some(session)));
    store.reduce(Action::SetView(View::Submit));
    store.reduce(Action::SetInputMode(InputMode::Editing));
    fill(&mut store, SubmitField::Stock, "xom");
    fill(&mut store, SubmitField::TargetPrice, "125");

    let err = store.submit_form.draft.validate().unwrap_err();
    assert_eq!(err.to_string(), "Validation error: Please fill in all required fields");

    // The draft survives for correction and nothing was written.
    assert_eq!(store.submit_form.draft.stock, "xom");
    assert_eq!(store_backend.commit_attempts(), attempts_after_signup);
    let predictions = store_backend
        .query(&Query::collection(PREDICTIONS))
        .await
        .unwrap();
    assert!(predictions.is_empty());
}

#[tokio::test]
async fn test_sign_in_errors_and_sign_out() {
    let backend = LocalBackend::new();
    let services = Services::local(backend.clone());
    services
        .session
        .signup("jane@example.com", "secret123", "Jane Doe", "")
        .await
        .unwrap();
    services.session.logout().await.unwrap();

    let err = services.session.login("jane@example.com", "wrong-pass").await.unwrap_err();
    assert!(matches!(err, Error::Authentication(AuthErrorKind::WrongPassword)));
    let err = services.session.login("nobody@example.com", "secret123").await.unwrap_err();
    assert!(matches!(err, Error::Authentication(AuthErrorKind::UserNotFound)));
    let err = services
        .session
        .signup("jane@example.com", "secret123", "Jane Again", "")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Authentication(AuthErrorKind::EmailAlreadyInUse)));

    let mut sessions = services.session.watch();
    assert_eq!(sessions.next_snapshot().await, Some(None));

    let principal = services.session.login("JANE@example.com", "secret123").await.unwrap();
    let session = sessions.next_snapshot().await.flatten().unwrap();
    assert_eq!(session.principal, principal);
    assert_eq!(session.profile.map(|p| p.name), Some("Jane Doe".to_string()));

    services.session.logout().await.unwrap();
    assert_eq!(sessions.next_snapshot().await, Some(None));
}

#[tokio::test]
async fn test_failed_profile_write_leaves_account_without_profile() {
    let (services, store_backend) = faulty_services();
    store_backend.fail_commits(true);

    let err = services
        .session
        .signup("jane@example.com", "secret123", "Jane Doe", "")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Write(_)));

    // The account exists and can sign in, but no profile was written.
    services.session.logout().await.unwrap();
    let principal = services.session.login("jane@example.com", "secret123").await.unwrap();
    assert_eq!(store_backend.get(USERS, &principal.uid).await.unwrap(), None);
    assert!(store_backend.query(&Query::collection(USERS)).await.unwrap().is_empty());

    let mut sessions = services.session.watch();
    let session = sessions.next_snapshot().await.flatten().unwrap();
    assert_eq!(session.principal.uid, principal.uid);
    assert_eq!(session.profile, None);
}
