//! Backend integration.
//!
//! The application never owns storage or credentials. It talks to a hosted
//! document store and identity provider through the two traits below.
//! [`LocalBackend`] implements both in-process and is what the terminal
//! client and the tests run against.

mod local;
mod query;
mod subscription;
mod write;

pub use local::LocalBackend;
pub use query::{Direction, Document, Filter, FilterOp, OrderBy, Query, compare_values, field};
pub use subscription::Subscription;
pub use write::{WriteBatch, WriteOp, new_document_id};

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// An authenticated identity issued by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Stable identity id; also the key of the user's profile document.
    pub uid: String,
    /// Email the account was created with.
    pub email: String,
    /// Display name, once set.
    pub display_name: Option<String>,
}

/// Document database with live queries.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document. `Ok(None)` when it does not exist.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Run a query once.
    async fn query(&self, query: &Query) -> Result<Vec<Document>>;

    /// Register a live query.
    ///
    /// The current result set is delivered immediately, then again after
    /// every committed change to the queried collection.
    fn listen(&self, query: Query) -> Result<Subscription<Vec<Document>>>;

    /// Apply a batch atomically.
    async fn commit(&self, batch: WriteBatch) -> Result<()>;
}

/// Email/password identity provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify credentials and start a session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Principal>;

    /// Create an account and start a session for it.
    async fn create_user(&self, email: &str, password: &str) -> Result<Principal>;

    /// Set the display name of an account.
    async fn update_display_name(&self, uid: &str, display_name: &str) -> Result<Principal>;

    /// End the current session.
    async fn sign_out(&self) -> Result<()>;

    /// Observe the current principal. Changes on sign-in and sign-out.
    fn observe_session(&self) -> watch::Receiver<Option<Principal>>;
}
