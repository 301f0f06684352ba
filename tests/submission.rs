//! Prediction submission against the local backend.

mod common;

use analysttrack::backend::{DocumentStore, Principal, Query};
use analysttrack::model::{
    PREDICTIONS, Prediction, PredictionDraft, PredictionStatus, Timeframe, USERS, UserProfile,
};
use analysttrack::{Error, LocalBackend, Services};
use common::{faulty_services, seed_analyst};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn principal(uid: &str) -> Principal {
    Principal {
        uid: uid.to_string(),
        email: format!("{uid}@example.com"),
        display_name: None,
    }
}

fn draft(stock: &str, target: &str, reasoning: &str) -> PredictionDraft {
    PredictionDraft {
        stock: stock.to_string(),
        target_price: target.to_string(),
        reasoning: reasoning.to_string(),
        ..Default::default()
    }
}

async fn total_predictions(store: &dyn DocumentStore, uid: &str) -> u32 {
    let doc = store.get(USERS, uid).await.unwrap().unwrap();
    UserProfile::from_document(&doc).unwrap().stats.total_predictions
}

async fn stored_predictions(store: &dyn DocumentStore) -> Vec<Prediction> {
    store
        .query(&Query::collection(PREDICTIONS))
        .await
        .unwrap()
        .iter()
        .map(|doc| Prediction::from_document(doc).unwrap())
        .collect()
}

#[tokio::test]
async fn test_submission_writes_record_and_bumps_counter() {
    let backend = LocalBackend::new();
    let services = Services::local(backend.clone());
    seed_analyst(&backend, "u1", "Sam", 62.5, 3).await;

    let new = draft("nvda", "950", "Datacenter demand").validate().unwrap();
    let id = services
        .predictions
        .create_prediction(&principal("u1"), new)
        .await
        .unwrap();

    let stored = stored_predictions(&backend).await;
    assert_eq!(stored.len(), 1);
    let prediction = &stored[0];
    assert_eq!(prediction.id, id);
    assert_eq!(prediction.user_id, "u1");
    assert_eq!(prediction.stock, "NVDA");
    assert_eq!(prediction.status, PredictionStatus::Active);
    assert_eq!(prediction.views, 0);
    assert_eq!(prediction.likes, 0);
    assert!(prediction.current_price >= dec!(50) && prediction.current_price < dec!(550));
    assert_eq!(prediction.current_price, prediction.current_price.round_dp(2));

    assert_eq!(total_predictions(&backend, "u1").await, 4);
}

#[tokio::test]
async fn test_submission_leaves_other_stats_alone() {
    let backend = LocalBackend::new();
    let services = Services::local(backend.clone());
    let before = seed_analyst(&backend, "u1", "Sam", 62.5, 8).await;

    let new = draft("amd", "200", "Share gains").validate().unwrap();
    services
        .predictions
        .create_prediction(&principal("u1"), new)
        .await
        .unwrap();

    let doc = backend.get(USERS, "u1").await.unwrap().unwrap();
    let after = UserProfile::from_document(&doc).unwrap();
    assert_eq!(after.stats.accuracy, before.stats.accuracy);
    assert_eq!(after.stats.correct_predictions, before.stats.correct_predictions);
    assert_eq!(after.stats.avg_return, before.stats.avg_return);
}

#[tokio::test]
async fn test_failed_commit_writes_nothing() {
    let (services, store) = faulty_services();
    seed_analyst(store.as_ref(), "u1", "Sam", 50.0, 2).await;
    store.fail_commits(true);

    let new = draft("aapl", "210", "Services growth").validate().unwrap();
    let err = services
        .predictions
        .create_prediction(&principal("u1"), new)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Write(_)));
    assert!(stored_predictions(&store.inner).await.is_empty());
    assert_eq!(total_predictions(&store.inner, "u1").await, 2);
}

#[tokio::test]
async fn test_author_without_profile_is_rejected_atomically() {
    let backend = LocalBackend::new();
    let services = Services::local(backend.clone());

    let new = draft("aapl", "210", "Services growth").validate().unwrap();
    let err = services
        .predictions
        .create_prediction(&principal("ghost"), new)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Write(_)));
    assert!(stored_predictions(&backend).await.is_empty());
}

#[tokio::test]
async fn test_invalid_drafts_never_reach_the_store() {
    let (_services, store) = faulty_services();

    for draft in [
        draft("", "210", "why"),
        draft("AAPL", "", "why"),
        draft("AAPL", "210", ""),
        draft("AAPL", "lots", "why"),
    ] {
        assert!(matches!(draft.validate(), Err(Error::Validation(_))));
    }
    assert_eq!(store.commit_attempts(), 0);
}

#[tokio::test]
async fn test_lowercase_symbol_is_stored_uppercase() {
    let backend = LocalBackend::new();
    let services = Services::local(backend.clone());
    seed_analyst(&backend, "u1", "Sam", 0.0, 0).await;

    let mut form = draft("  aapl ", "210.00", "Strong iPhone sales expected");
    form.timeframe = Timeframe::SixMonths;
    services
        .predictions
        .create_prediction(&principal("u1"), form.validate().unwrap())
        .await
        .unwrap();

    let stored = stored_predictions(&backend).await;
    assert_eq!(stored[0].stock, "AAPL");
    assert_eq!(stored[0].timeframe, Timeframe::SixMonths);
    assert_eq!(stored[0].target_price, dec!(210.00));
}
