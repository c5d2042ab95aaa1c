//! IdentityActor — Tokio actor owning the single current user record
//!
//! Mutations are processed sequentially via an mpsc channel. Each mutation is written
//! to the [`KeyValueStore`] before the in-memory record changes and before the reply
//! is sent, so once a caller's `.await` returns, both a fresh process and every
//! snapshot reader observe the new state.
//!
//! Snapshots are published on a `watch` channel: [`IdentityHandle::current_user`] and
//! [`IdentityHandle::evaluate`] are synchronous and never touch the actor.
//!
//! # Usage
//!
//! ```rust,no_run
//! use mealplan_identity::gate::{AccessLevel, GateDecision};
//! use mealplan_identity::identity::IdentityActor;
//! use mealplan_identity::IdentityConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let handle = IdentityActor::spawn(IdentityConfig::new("/data/mealplan")).await?;
//!
//!     let user = handle.sign_up("a@x.com", "pw", None).await?;
//!     assert_eq!(user.display_name(), "a");
//!     assert!(!handle.evaluate(AccessLevel::Subscribed).is_allowed());
//!
//!     handle.upgrade_subscription().await?;
//!     assert_eq!(handle.evaluate(AccessLevel::Subscribed), GateDecision::Allow);
//!
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use crate::config::IdentityConfig;
use crate::error::{IdentityError, Result};
use crate::gate::{self, AccessLevel, GateDecision};
use crate::store::{FileStore, KeyValueStore};

use super::types::*;

// ─── Actor Messages ───

enum IdentityMsg {
    SignIn {
        email: String,
        reply: oneshot::Sender<Result<UserRecord>>,
    },
    SignUp {
        email: String,
        name: Option<String>,
        reply: oneshot::Sender<Result<UserRecord>>,
    },
    SignOut {
        reply: oneshot::Sender<Result<()>>,
    },
    UpdatePreferences {
        preferences: UserPreferences,
        reply: oneshot::Sender<Result<Option<UserRecord>>>,
    },
    UpgradeSubscription {
        reply: oneshot::Sender<Result<UserRecord>>,
    },
}

// ─── Actor ───

/// Identity actor — owns the current record and its persisted copy
pub struct IdentityActor {
    store: Arc<dyn KeyValueStore>,
    storage_key: String,
    current: Option<UserRecord>,
    snapshot: watch::Sender<Option<UserRecord>>,
    rx: mpsc::Receiver<IdentityMsg>,
}

impl IdentityActor {
    /// Open the file store under `config.base_path`, load the persisted record and
    /// spawn the actor
    pub async fn spawn(config: IdentityConfig) -> Result<IdentityHandle> {
        let store = Arc::new(FileStore::open(&config.base_path).await?);
        Self::spawn_with_store(store, config).await
    }

    /// Spawn over an existing store (shared file store, in-memory store, ...)
    pub async fn spawn_with_store(
        store: Arc<dyn KeyValueStore>,
        config: IdentityConfig,
    ) -> Result<IdentityHandle> {
        let current = load_record(store.as_ref(), &config.storage_key).await?;
        let (snapshot, snapshot_rx) = watch::channel(current.clone());
        let (tx, rx) = mpsc::channel(config.channel_capacity.max(1));

        match &current {
            Some(user) => info!(user_id = %user.id, level = %user.access_level(), "Restored session"),
            None => debug!("No persisted session"),
        }

        let actor = Self {
            store,
            storage_key: config.storage_key,
            current,
            snapshot,
            rx,
        };

        tokio::spawn(actor.run());
        info!("IdentityActor spawned");
        Ok(IdentityHandle {
            tx,
            snapshot: snapshot_rx,
        })
    }

    /// Main event loop
    async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                IdentityMsg::SignIn { email, reply } => {
                    let _ = reply.send(self.handle_sign_in(&email).await);
                }
                IdentityMsg::SignUp { email, name, reply } => {
                    let _ = reply.send(self.handle_sign_up(&email, name.as_deref()).await);
                }
                IdentityMsg::SignOut { reply } => {
                    let _ = reply.send(self.handle_sign_out().await);
                }
                IdentityMsg::UpdatePreferences { preferences, reply } => {
                    let _ = reply.send(self.handle_update_preferences(preferences).await);
                }
                IdentityMsg::UpgradeSubscription { reply } => {
                    let _ = reply.send(self.handle_upgrade().await);
                }
            }
        }
        info!("IdentityActor stopped");
    }

    // ─── Handler Implementations ───

    async fn handle_sign_in(&mut self, email: &str) -> Result<UserRecord> {
        require_email(email)?;

        if let Some(existing) = self.current.as_ref().filter(|u| u.matches_email(email)) {
            debug!(user_id = %existing.id, "Sign-in matched current session");
            return Ok(existing.clone());
        }

        let candidate = UserRecord::for_sign_in(email);
        self.commit(candidate.clone()).await?;
        info!(user_id = %candidate.id, "Signed in");
        Ok(candidate)
    }

    async fn handle_sign_up(&mut self, email: &str, name: Option<&str>) -> Result<UserRecord> {
        require_email(email)?;

        let user = UserRecord::for_sign_up(email, name);
        self.commit(user.clone()).await?;
        info!(user_id = %user.id, "Signed up");
        Ok(user)
    }

    async fn handle_sign_out(&mut self) -> Result<()> {
        self.store.remove(&self.storage_key).await?;
        if let Some(user) = self.current.take() {
            info!(user_id = %user.id, "Signed out");
        }
        self.publish();
        Ok(())
    }

    async fn handle_update_preferences(
        &mut self,
        preferences: UserPreferences,
    ) -> Result<Option<UserRecord>> {
        let Some(current) = self.current.as_ref() else {
            debug!("Preference update ignored: no session");
            return Ok(None);
        };

        let updated = UserRecord {
            preferences: Some(preferences),
            ..current.clone()
        };
        self.commit(updated.clone()).await?;
        info!(user_id = %updated.id, "Preferences updated");
        Ok(Some(updated))
    }

    async fn handle_upgrade(&mut self) -> Result<UserRecord> {
        let current = self.current.as_ref().ok_or(IdentityError::NotSignedIn)?;
        if current.is_subscribed {
            debug!(user_id = %current.id, "Already subscribed");
            return Ok(current.clone());
        }

        let upgraded = UserRecord {
            is_subscribed: true,
            ..current.clone()
        };
        self.commit(upgraded.clone()).await?;
        info!(user_id = %upgraded.id, "Subscription upgraded");
        Ok(upgraded)
    }

    // ─── Helpers ───

    /// Persist `user`, then make it current. A failed write leaves state untouched.
    async fn commit(&mut self, user: UserRecord) -> Result<()> {
        let json = serde_json::to_string(&user)?;
        self.store.put(&self.storage_key, &json).await?;
        self.current = Some(user);
        self.publish();
        Ok(())
    }

    fn publish(&self) {
        // send_replace never fails, even with no receivers left
        self.snapshot.send_replace(self.current.clone());
    }
}

fn require_email(email: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(IdentityError::Auth("Email is required".into()));
    }
    Ok(())
}

async fn load_record(store: &dyn KeyValueStore, key: &str) -> Result<Option<UserRecord>> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };
    match serde_json::from_str::<UserRecord>(&raw) {
        Ok(user) => Ok(Some(user)),
        Err(e) => {
            warn!(key, error = %e, "Discarding unreadable persisted session");
            Ok(None)
        }
    }
}

// ─── Handle (client-facing API) ───

/// Thread-safe handle to the IdentityActor
#[derive(Clone)]
pub struct IdentityHandle {
    tx: mpsc::Sender<IdentityMsg>,
    snapshot: watch::Receiver<Option<UserRecord>>,
}

impl IdentityHandle {
    /// Sign in. Credentials are not checked; only a blank email is rejected.
    pub async fn sign_in(&self, email: impl Into<String>, _password: impl Into<String>) -> Result<UserRecord> {
        let email = email.into();
        self.request(|reply| IdentityMsg::SignIn { email, reply }).await?
    }

    /// Create an account, replacing any current session
    pub async fn sign_up(
        &self,
        email: impl Into<String>,
        _password: impl Into<String>,
        name: Option<&str>,
    ) -> Result<UserRecord> {
        let email = email.into();
        let name = name.map(str::to_string);
        self.request(|reply| IdentityMsg::SignUp { email, name, reply }).await?
    }

    /// Clear the session and its persisted copy. Idempotent.
    pub async fn sign_out(&self) -> Result<()> {
        self.request(|reply| IdentityMsg::SignOut { reply }).await?
    }

    /// Replace the current user's preferences; `Ok(None)` when signed out
    pub async fn update_preferences(&self, preferences: UserPreferences) -> Result<Option<UserRecord>> {
        self.request(|reply| IdentityMsg::UpdatePreferences { preferences, reply })
            .await?
    }

    /// Mark the current user subscribed. Irreversible.
    pub async fn upgrade_subscription(&self) -> Result<UserRecord> {
        self.request(|reply| IdentityMsg::UpgradeSubscription { reply }).await?
    }

    /// Latest committed record
    pub fn current_user(&self) -> Option<UserRecord> {
        self.snapshot.borrow().clone()
    }

    /// Access level of the latest committed record
    pub fn access_level(&self) -> AccessLevel {
        AccessLevel::of(self.snapshot.borrow().as_ref())
    }

    /// Gate the latest committed record against `required`
    pub fn evaluate(&self, required: AccessLevel) -> GateDecision {
        gate::evaluate(self.snapshot.borrow().as_ref(), required)
    }

    /// Receiver notified after every committed change
    pub fn watch(&self) -> watch::Receiver<Option<UserRecord>> {
        self.snapshot.clone()
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> IdentityMsg,
    ) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(build(reply))
            .await
            .map_err(|_| IdentityError::ActorUnavailable("IdentityActor".into()))?;
        rx.await
            .map_err(|_| IdentityError::ActorUnavailable("IdentityActor dropped".into()))
    }
}
