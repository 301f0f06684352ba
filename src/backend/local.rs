//! In-process backend.
//!
//! Keeps collections and accounts in memory and pushes live-query
//! snapshots to registered listeners after every commit. Optionally
//! mirrors its contents to a JSON file so a terminal session can be
//! resumed.

use super::query::{Document, Query};
use super::subscription::Subscription;
use super::write::{WriteBatch, WriteOp, increment_field};
use super::{DocumentStore, IdentityProvider, Principal};
use crate::error::{AuthErrorKind, Error, Result};
use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, watch};
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Shortest password the provider accepts.
const MIN_PASSWORD_LEN: usize = 6;

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Account {
    uid: String,
    email: String,
    /// Argon2id PHC string with its own salt.
    password_hash: String,
    display_name: Option<String>,
}

impl Account {
    fn principal(&self) -> Principal {
        Principal {
            uid: self.uid.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
        }
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::write(format!("Could not hash password: {e}")))
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

/// Everything that is mirrored to the data file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Contents {
    collections: BTreeMap<String, BTreeMap<String, Value>>,
    /// Accounts keyed by lowercase email.
    accounts: BTreeMap<String, Account>,
}

impl Contents {
    fn documents(&self, collection: &str) -> Vec<Document> {
        self.collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| Document::new(id.clone(), data.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn exists(&self, collection: &str, id: &str) -> bool {
        self.collections
            .get(collection)
            .is_some_and(|docs| docs.contains_key(id))
    }
}

struct Listener {
    query: Query,
    tx: mpsc::UnboundedSender<Vec<Document>>,
}

#[derive(Default)]
struct Inner {
    contents: Contents,
    listeners: HashMap<u64, Listener>,
    next_listener_id: u64,
    /// Bumped on every mutation of `contents`.
    revision: u64,
}

/// Serialized contents waiting to be written out.
struct Pending {
    revision: u64,
    raw: String,
}

impl Inner {
    fn notify(&mut self, collections: &HashSet<&str>) {
        let mut closed = Vec::new();
        for (id, listener) in &self.listeners {
            if !collections.contains(listener.query.collection.as_str()) {
                continue;
            }
            let docs = self.contents.documents(&listener.query.collection);
            if listener.tx.send(listener.query.apply(&docs)).is_err() {
                closed.push(*id);
            }
        }
        for id in closed {
            self.listeners.remove(&id);
        }
    }
}

/// In-process document store and identity provider.
#[derive(Clone)]
pub struct LocalBackend {
    inner: Arc<Mutex<Inner>>,
    session: Arc<watch::Sender<Option<Principal>>>,
    data_file: Option<PathBuf>,
    /// Revision last written to the data file.
    written: Arc<tokio::sync::Mutex<u64>>,
}

impl LocalBackend {
    /// Create an empty backend that lives only in memory.
    pub fn new() -> Self {
        let (session, _) = watch::channel(None);
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            session: Arc::new(session),
            data_file: None,
            written: Arc::new(tokio::sync::Mutex::new(0)),
        }
    }

    /// Open a backend mirrored to a JSON file, loading it if it exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let contents = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            Contents::default()
        };
        tracing::info!(path = %path.display(), "Opened local backend");

        let backend = Self::new();
        backend.lock().contents = contents;
        Ok(Self {
            data_file: Some(path),
            ..backend
        })
    }

    /// Number of live-query registrations currently held.
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record a mutation and serialize the contents, if mirrored to a file.
    /// Runs under the lock; the write itself happens in `persist`.
    fn snapshot(&self, inner: &mut Inner) -> Option<Pending> {
        inner.revision += 1;
        self.data_file.as_ref()?;
        match serde_json::to_string_pretty(&inner.contents) {
            Ok(raw) => Some(Pending {
                revision: inner.revision,
                raw,
            }),
            Err(e) => {
                tracing::warn!("Failed to serialize local backend: {}", e);
                None
            }
        }
    }

    /// Write a snapshot out unless a newer one already landed.
    async fn persist(&self, pending: Option<Pending>) {
        let (Some(path), Some(pending)) = (&self.data_file, pending) else {
            return;
        };
        let mut written = self.written.lock().await;
        if pending.revision <= *written {
            return;
        }
        if let Err(e) = write_file(path, &pending.raw).await {
            tracing::warn!("Failed to persist local backend: {}", e);
            return;
        }
        *written = pending.revision;
    }

    fn validate_email(email: &str) -> Result<String> {
        let email = email.trim().to_lowercase();
        let valid = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if valid {
            Ok(email)
        } else {
            Err(Error::Authentication(AuthErrorKind::InvalidEmail))
        }
    }
}

async fn write_file(path: &Path, raw: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, raw).await?;
    Ok(())
}

impl Default for LocalBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LocalBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalBackend")
            .field("data_file", &self.data_file)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DocumentStore for LocalBackend {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let inner = self.lock();
        Ok(inner
            .contents
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|data| Document::new(id, data.clone())))
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>> {
        let inner = self.lock();
        let docs = inner.contents.documents(&query.collection);
        Ok(query.apply(&docs))
    }

    fn listen(&self, query: Query) -> Result<Subscription<Vec<Document>>> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.lock();

        let initial = query.apply(&inner.contents.documents(&query.collection));
        tx.send(initial)
            .map_err(|e| Error::channel(e.to_string()))?;

        let id = inner.next_listener_id;
        inner.next_listener_id += 1;
        tracing::debug!(listener = id, collection = %query.collection, "Registered live query");
        inner.listeners.insert(id, Listener { query, tx });
        drop(inner);

        let registry = Arc::downgrade(&self.inner);
        Ok(Subscription::new(UnboundedReceiverStream::new(rx), move || {
            if let Some(inner) = registry.upgrade() {
                let mut inner = inner.lock().unwrap_or_else(|p| p.into_inner());
                inner.listeners.remove(&id);
                tracing::debug!(listener = id, "Released live query");
            }
        }))
    }

    async fn commit(&self, batch: WriteBatch) -> Result<()> {
        let pending = self.apply(&batch)?;
        self.persist(pending).await;
        Ok(())
    }
}

impl LocalBackend {
    /// Validate and apply a batch under the lock.
    fn apply(&self, batch: &WriteBatch) -> Result<Option<Pending>> {
        let mut inner = self.lock();

        // Every increment must target a document that exists before the
        // batch or is created earlier in it.
        let mut created: HashSet<(&str, &str)> = HashSet::new();
        for op in batch.ops() {
            match op {
                WriteOp::Set { collection, id, .. } => {
                    created.insert((collection.as_str(), id.as_str()));
                }
                WriteOp::Increment { collection, id, .. } => {
                    if !inner.contents.exists(collection, id)
                        && !created.contains(&(collection.as_str(), id.as_str()))
                    {
                        return Err(Error::write(format!("No document to update: {collection}/{id}")));
                    }
                }
            }
        }

        for op in batch.ops() {
            match op {
                WriteOp::Set {
                    collection,
                    id,
                    data,
                } => {
                    inner
                        .contents
                        .collections
                        .entry(collection.clone())
                        .or_default()
                        .insert(id.clone(), data.clone());
                }
                WriteOp::Increment {
                    collection,
                    id,
                    field,
                    by,
                } => {
                    if let Some(doc) = inner
                        .contents
                        .collections
                        .get_mut(collection)
                        .and_then(|docs| docs.get_mut(id))
                    {
                        increment_field(doc, field, *by);
                    }
                }
            }
        }

        let touched: HashSet<&str> = batch.ops().iter().map(WriteOp::collection).collect();
        inner.notify(&touched);

        Ok(self.snapshot(&mut inner))
    }
}

#[async_trait]
impl IdentityProvider for LocalBackend {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Principal> {
        let email = Self::validate_email(email)?;
        let account = self
            .lock()
            .contents
            .accounts
            .get(&email)
            .cloned()
            .ok_or(Error::Authentication(AuthErrorKind::UserNotFound))?;
        if !verify_password(password, &account.password_hash) {
            return Err(Error::Authentication(AuthErrorKind::WrongPassword));
        }
        let principal = account.principal();

        tracing::info!(uid = %principal.uid, "Signed in");
        self.session.send_replace(Some(principal.clone()));
        Ok(principal)
    }

    async fn create_user(&self, email: &str, password: &str) -> Result<Principal> {
        let email = Self::validate_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::Authentication(AuthErrorKind::WeakPassword));
        }

        let password_hash = hash_password(password)?;

        let (principal, pending) = {
            let mut inner = self.lock();
            if inner.contents.accounts.contains_key(&email) {
                return Err(Error::Authentication(AuthErrorKind::EmailAlreadyInUse));
            }
            let account = Account {
                uid: uuid::Uuid::new_v4().simple().to_string(),
                email: email.clone(),
                password_hash,
                display_name: None,
            };
            let principal = account.principal();
            inner.contents.accounts.insert(email, account);
            (principal, self.snapshot(&mut inner))
        };
        self.persist(pending).await;

        tracing::info!(uid = %principal.uid, "Created account");
        self.session.send_replace(Some(principal.clone()));
        Ok(principal)
    }

    async fn update_display_name(&self, uid: &str, display_name: &str) -> Result<Principal> {
        let (principal, pending) = {
            let mut inner = self.lock();
            let account = inner
                .contents
                .accounts
                .values_mut()
                .find(|a| a.uid == uid)
                .ok_or(Error::Authentication(AuthErrorKind::UserNotFound))?;
            account.display_name = Some(display_name.to_string());
            let principal = account.principal();
            (principal, self.snapshot(&mut inner))
        };
        self.persist(pending).await;

        // A display-name change is not a session change; update silently.
        self.session.send_if_modified(|current| {
            if let Some(current) = current.as_mut().filter(|c| c.uid == principal.uid) {
                current.display_name = principal.display_name.clone();
            }
            false
        });
        Ok(principal)
    }

    async fn sign_out(&self) -> Result<()> {
        self.session.send_replace(None);
        tracing::info!("Signed out");
        Ok(())
    }

    fn observe_session(&self) -> watch::Receiver<Option<Principal>> {
        self.session.subscribe()
    }
}
