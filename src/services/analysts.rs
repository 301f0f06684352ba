//! Analyst directory.

use crate::backend::{Direction, Document, DocumentStore, FilterOp, Query, Subscription};
use crate::error::Result;
use crate::model::{USERS, UserProfile};
use std::sync::Arc;

/// Default cap on the number of analysts published.
pub const DEFAULT_ANALYST_LIMIT: usize = 20;

/// Read access to analyst profiles.
#[derive(Clone)]
pub struct AnalystDirectory {
    store: Arc<dyn DocumentStore>,
}

impl AnalystDirectory {
    /// Create a new directory.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Query for analysts with at least one prediction, best accuracy
    /// first, ties broken by prediction count.
    pub fn top_analysts_query(limit: usize) -> Query {
        Query::collection(USERS)
            .filter("stats.totalPredictions", FilterOp::Gte, 1)
            .order_by("stats.accuracy", Direction::Descending)
            .order_by("stats.totalPredictions", Direction::Descending)
            .limit(limit)
    }

    /// Live list of the top `limit` analysts.
    ///
    /// Every change publishes the full ordered list.
    pub fn subscribe_to_top_analysts(&self, limit: usize) -> Result<Subscription<Vec<UserProfile>>> {
        let sub = self.store.listen(Self::top_analysts_query(limit))?;
        Ok(sub.map(|docs| decode_profiles(&docs)))
    }

    /// Fetch a single profile. `Ok(None)` when it does not exist.
    pub async fn get_analyst_profile(&self, id: &str) -> Result<Option<UserProfile>> {
        let doc = self.store.get(USERS, id).await.map_err(|e| {
            tracing::error!(id, "Error fetching analyst profile: {}", e);
            e.into_lookup()
        })?;
        doc.as_ref()
            .map(UserProfile::from_document)
            .transpose()
            .map_err(|e| e.into_lookup())
    }
}

fn decode_profiles(docs: &[Document]) -> Vec<UserProfile> {
    docs.iter()
        .filter_map(|doc| match UserProfile::from_document(doc) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!(id = %doc.id, "Skipping malformed profile: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{LocalBackend, WriteBatch};
    use pretty_assertions::assert_eq;

    async fn seed(store: &LocalBackend, profiles: &[(&str, u32, f64)]) {
        let mut batch = WriteBatch::new();
        for (id, total, accuracy) in profiles {
            let mut profile = UserProfile::new(*id, id.to_uppercase(), "", "");
            profile.stats.total_predictions = *total;
            profile.stats.accuracy = *accuracy;
            batch.set(USERS, *id, serde_json::to_value(&profile).unwrap());
        }
        store.commit(batch).await.unwrap();
    }

    #[tokio::test]
    async fn test_top_analysts_ordering_and_filter() {
        let store = Arc::new(LocalBackend::new());
        seed(
            &store,
            &[("a", 4, 50.0), ("b", 10, 75.0), ("c", 9, 50.0), ("d", 0, 99.0)],
        )
        .await;

        let directory = AnalystDirectory::new(store);
        let mut sub = directory.subscribe_to_top_analysts(DEFAULT_ANALYST_LIMIT).unwrap();
        let ids: Vec<String> = sub
            .next_snapshot()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.uid)
            .collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[tokio::test]
    async fn test_limit_caps_published_list() {
        let store = Arc::new(LocalBackend::new());
        seed(&store, &[("a", 1, 10.0), ("b", 1, 20.0), ("c", 1, 30.0)]).await;

        let directory = AnalystDirectory::new(store);
        let mut sub = directory.subscribe_to_top_analysts(2).unwrap();
        let snapshot = sub.next_snapshot().await.unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].uid, "c");
    }

    #[tokio::test]
    async fn test_get_profile_missing_is_none() {
        let directory = AnalystDirectory::new(Arc::new(LocalBackend::new()));
        assert_eq!(directory.get_analyst_profile("nobody").await.unwrap(), None);
    }
}
