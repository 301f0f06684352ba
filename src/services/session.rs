//! Sign-in, sign-up, sign-out and session observation.

use crate::backend::{DocumentStore, IdentityProvider, Principal, Subscription, WriteBatch};
use crate::error::{Error, Result};
use crate::model::{USERS, UserProfile};
use std::sync::Arc;
use tokio_stream::wrappers::WatchStream;

/// A signed-in principal and its profile.
///
/// The profile is `None` when it does not exist yet or could not be
/// fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub principal: Principal,
    pub profile: Option<UserProfile>,
}

/// Identity operations backed by the identity provider and the profile
/// collection.
#[derive(Clone)]
pub struct SessionService {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn DocumentStore>,
}

impl SessionService {
    /// Create a new session service.
    pub fn new(identity: Arc<dyn IdentityProvider>, store: Arc<dyn DocumentStore>) -> Self {
        Self { identity, store }
    }

    /// Sign in with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<Principal> {
        self.identity.sign_in(email, password).await
    }

    /// Create an account, name it, and write its initial profile.
    ///
    /// The identity and the profile are two separate writes. If the
    /// profile write fails the account remains without a profile.
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
        specialty: &str,
    ) -> Result<Session> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(Error::validation("Display name is required"));
        }

        let principal = self.identity.create_user(email, password).await?;
        let principal = self
            .identity
            .update_display_name(&principal.uid, display_name)
            .await?;

        let profile = UserProfile::new(
            principal.uid.clone(),
            display_name,
            principal.email.clone(),
            specialty.trim(),
        );
        let mut batch = WriteBatch::new();
        batch.set(USERS, principal.uid.clone(), serde_json::to_value(&profile)?);

        if let Err(e) = self.store.commit(batch).await {
            tracing::error!(uid = %principal.uid, "Account created but profile write failed: {}", e);
            return Err(e.into_write());
        }

        tracing::info!(uid = %principal.uid, "Created analyst profile");
        Ok(Session {
            principal,
            profile: Some(profile),
        })
    }

    /// End the current session.
    pub async fn logout(&self) -> Result<()> {
        self.identity.sign_out().await
    }

    /// Observe the session.
    ///
    /// Yields the current state immediately, then again on every sign-in
    /// or sign-out, with the principal's profile re-fetched each time.
    pub fn watch(&self) -> Subscription<Option<Session>> {
        let changes = WatchStream::new(self.identity.observe_session());
        let store = self.store.clone();

        Subscription::new(changes, || tracing::debug!("Released session observer")).then(
            move |principal| {
                let store = store.clone();
                async move {
                    let principal = principal?;
                    let profile = fetch_profile(store.as_ref(), &principal.uid).await;
                    Some(Session { principal, profile })
                }
            },
        )
    }
}

async fn fetch_profile(store: &dyn DocumentStore, uid: &str) -> Option<UserProfile> {
    match store.get(USERS, uid).await {
        Ok(Some(doc)) => match UserProfile::from_document(&doc) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!(uid, "Malformed profile: {}", e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(uid, "Error fetching user profile: {}", e);
            None
        }
    }
}
