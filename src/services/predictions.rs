//! Prediction ledger and submission.

use crate::backend::{
    Direction, Document, DocumentStore, Principal, Query, Subscription, WriteBatch,
    new_document_id,
};
use crate::error::Result;
use crate::model::{
    NewPrediction, PREDICTIONS, Prediction, PredictionView, USERS, UserProfile,
};
use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Range of the placeholder "current price" attached to new predictions.
const PLACEHOLDER_PRICE_MIN: f64 = 50.0;
const PLACEHOLDER_PRICE_MAX: f64 = 550.0;

/// Reads and writes predictions.
#[derive(Clone)]
pub struct PredictionLedger {
    store: Arc<dyn DocumentStore>,
}

impl PredictionLedger {
    /// Create a new ledger.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Query for every prediction, newest first.
    pub fn all_predictions_query() -> Query {
        Query::collection(PREDICTIONS).order_by("createdAt", Direction::Descending)
    }

    /// Live list of every prediction, newest first, joined with author
    /// display fields.
    ///
    /// Authors are resolved for the whole snapshot before it is published.
    /// An author that cannot be resolved degrades that one entry to
    /// "Unknown Analyst".
    pub fn subscribe_to_all_predictions(&self) -> Result<Subscription<Vec<PredictionView>>> {
        let store = self.store.clone();
        let sub = self.store.listen(Self::all_predictions_query())?;
        Ok(sub.then(move |docs| join_authors(store.clone(), docs)))
    }

    /// Write a prediction and bump the author's prediction count, atomically.
    ///
    /// Returns the new prediction id. On failure neither change is applied.
    pub async fn create_prediction(&self, author: &Principal, draft: NewPrediction) -> Result<String> {
        let prediction = Prediction::new(author.uid.clone(), draft, placeholder_price(), Utc::now());
        let id = new_document_id();

        let mut batch = WriteBatch::new();
        batch
            .set(PREDICTIONS, id.clone(), serde_json::to_value(&prediction)?)
            .increment(USERS, author.uid.clone(), "stats.totalPredictions", 1);

        self.store.commit(batch).await.map_err(|e| {
            tracing::error!(uid = %author.uid, "Error creating prediction: {}", e);
            e.into_write()
        })?;

        tracing::info!(id = %id, stock = %prediction.stock, "Created prediction");
        Ok(id)
    }
}

/// Sample a placeholder price in the configured range, to the cent.
fn placeholder_price() -> Decimal {
    let price = rand::thread_rng().gen_range(PLACEHOLDER_PRICE_MIN..PLACEHOLDER_PRICE_MAX);
    Decimal::from_f64(price)
        .map(|d| d.round_dp(2))
        .unwrap_or(Decimal::ONE_HUNDRED)
}

/// Resolve the authors of one snapshot and build the joined list.
async fn join_authors(store: Arc<dyn DocumentStore>, docs: Vec<Document>) -> Vec<PredictionView> {
    let predictions: Vec<Prediction> = docs
        .iter()
        .filter_map(|doc| match Prediction::from_document(doc) {
            Ok(prediction) => Some(prediction),
            Err(e) => {
                tracing::warn!(id = %doc.id, "Skipping malformed prediction: {}", e);
                None
            }
        })
        .collect();

    let author_ids: Vec<&str> = predictions
        .iter()
        .map(|p| p.user_id.as_str())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let lookups = author_ids.iter().map(|id| store.get(USERS, id));
    let results = futures::future::join_all(lookups).await;

    let authors: HashMap<&str, UserProfile> = author_ids
        .iter()
        .zip(results)
        .filter_map(|(id, result)| match result {
            Ok(Some(doc)) => match UserProfile::from_document(&doc) {
                Ok(profile) => Some((*id, profile)),
                Err(e) => {
                    tracing::warn!(uid = id, "Malformed analyst profile: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(uid = id, "Error fetching analyst data: {}", e);
                None
            }
        })
        .collect();

    predictions
        .iter()
        .map(|p| PredictionView::join(p.clone(), authors.get(p.user_id.as_str())))
        .collect()
}
