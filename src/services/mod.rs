//! Data-access services.
//!
//! Thin layers over the backend traits: the session service wraps the
//! identity provider, the directory and ledger wrap live queries over the
//! profile and prediction collections.

mod analysts;
mod predictions;
mod session;

pub use analysts::{AnalystDirectory, DEFAULT_ANALYST_LIMIT};
pub use predictions::PredictionLedger;
pub use session::{Session, SessionService};

use crate::backend::{DocumentStore, IdentityProvider, LocalBackend};
use std::sync::Arc;

/// All services, sharing one backend.
#[derive(Clone)]
pub struct Services {
    pub session: SessionService,
    pub analysts: AnalystDirectory,
    pub predictions: PredictionLedger,
}

impl Services {
    /// Build the services over an identity provider and a document store.
    pub fn new(identity: Arc<dyn IdentityProvider>, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            session: SessionService::new(identity, store.clone()),
            analysts: AnalystDirectory::new(store.clone()),
            predictions: PredictionLedger::new(store),
        }
    }

    /// Build the services over the in-process backend.
    pub fn local(backend: LocalBackend) -> Self {
        let backend = Arc::new(backend);
        Self::new(backend.clone(), backend)
    }
}
