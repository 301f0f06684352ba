//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use analysttrack::backend::{Document, DocumentStore, Query, Subscription, WriteBatch};
use analysttrack::model::{
    Confidence, NewPrediction, PREDICTIONS, Prediction, Timeframe, USERS, UserProfile,
};
use analysttrack::{Error, LocalBackend, Result, Services};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A document store that fails on request.
///
/// Reads of the ids in `failing_gets` return a lookup error; commits fail
/// while `fail_commits` is set. Everything else goes to the wrapped
/// [`LocalBackend`].
pub struct FaultyStore {
    pub inner: LocalBackend,
    failing_gets: Mutex<HashSet<String>>,
    fail_commits: AtomicBool,
    commits: AtomicUsize,
}

impl FaultyStore {
    pub fn new(inner: LocalBackend) -> Arc<Self> {
        Arc::new(Self {
            inner,
            failing_gets: Mutex::new(HashSet::new()),
            fail_commits: AtomicBool::new(false),
            commits: AtomicUsize::new(0),
        })
    }

    pub fn fail_get(&self, id: &str) {
        self.failing_gets.lock().unwrap().insert(id.to_string());
    }

    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    /// Number of commits attempted, failed or not.
    pub fn commit_attempts(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for FaultyStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        if self.failing_gets.lock().unwrap().contains(id) {
            return Err(Error::lookup(format!("unavailable: {collection}/{id}")));
        }
        self.inner.get(collection, id).await
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>> {
        self.inner.query(query).await
    }

    fn listen(&self, query: Query) -> Result<Subscription<Vec<Document>>> {
        self.inner.listen(query)
    }

    async fn commit(&self, batch: WriteBatch) -> Result<()> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(Error::write("backend unavailable"));
        }
        self.inner.commit(batch).await
    }
}

/// Services over a fresh local backend wrapped in a [`FaultyStore`].
pub fn faulty_services() -> (Services, Arc<FaultyStore>) {
    let backend = LocalBackend::new();
    let store = FaultyStore::new(backend.clone());
    (Services::new(Arc::new(backend), store.clone()), store)
}

/// Write a profile with the given track record.
pub async fn seed_analyst(
    store: &dyn DocumentStore,
    uid: &str,
    name: &str,
    accuracy: f64,
    total: u32,
) -> UserProfile {
    let mut profile = UserProfile::new(uid, name, format!("{uid}@example.com"), "Technology Stocks");
    profile.stats.accuracy = accuracy;
    profile.stats.total_predictions = total;
    profile.stats.correct_predictions = (f64::from(total) * accuracy / 100.0).round() as u32;
    profile.stats.rating = 4.5;

    let mut batch = WriteBatch::new();
    batch.set(USERS, uid, serde_json::to_value(&profile).unwrap());
    store.commit(batch).await.unwrap();
    profile
}

/// Write a prediction with an explicit creation time.
pub async fn seed_prediction(
    store: &dyn DocumentStore,
    id: &str,
    user_id: &str,
    stock: &str,
    created_at: DateTime<Utc>,
) {
    let draft = NewPrediction {
        stock: stock.to_string(),
        target_price: Decimal::new(15000, 2),
        timeframe: Timeframe::ThreeMonths,
        reasoning: format!("{stock} looks cheap"),
        confidence: Confidence::Medium,
    };
    let prediction = Prediction::new(user_id, draft, Decimal::new(12000, 2), created_at);

    let mut batch = WriteBatch::new();
    batch.set(PREDICTIONS, id, serde_json::to_value(&prediction).unwrap());
    store.commit(batch).await.unwrap();
}

/// A fixed point in time, `minutes` after a base instant.
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).unwrap() + chrono::Duration::minutes(minutes)
}
