//! Identity module — the single current user record and its lifecycle
//!
//! Persisted through a [`crate::store::KeyValueStore`] so a restarted process
//! resumes the same session.

pub mod types;
pub mod actor;

pub use actor::{IdentityActor, IdentityHandle};
pub use types::{email_local_part, PersonalInfo, UserPreferences, UserRecord};
