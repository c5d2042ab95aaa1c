//! # Meal Plan Identity
//!
//! Single-session identity store and access gate for the Smart Meal Planner.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │            mealplan-identity              │
//! ├─────────────────────┬─────────────────────┤
//! │   IdentityActor     │     Access gate     │
//! │  (sign in/up/out,   │  (visitor <         │
//! │   preferences,      │   signed-up <       │
//! │   upgrade)          │   subscribed)       │
//! ├─────────────────────┼─────────────────────┤
//! │   KeyValueStore     │  Catalog (features, │
//! │  (file / memory)    │   plan durations)   │
//! └─────────────────────┴─────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mealplan_identity::{AccessLevel, IdentityActor, IdentityConfig, UserPreferences};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let handle = IdentityActor::spawn(IdentityConfig::new("/data/mealplan")).await?;
//!
//!     handle.sign_in("cook@example.com", "secret").await?;
//!     handle
//!         .update_preferences(UserPreferences::new().with_cuisines(["Thai"]))
//!         .await?;
//!
//!     if let Some(reason) = handle.evaluate(AccessLevel::Subscribed).deny_reason() {
//!         println!("locked: {reason:?}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Guarantees
//!
//! - **Read-after-write**: a mutation's result is persisted before its future resolves
//! - **Atomic records**: file writes replace the record by rename, never partially
//! - **Irreversible upgrade**: nothing in this crate clears `is_subscribed`
//! - **Railway Programming**: fallible operations return `Result<T, IdentityError>`

pub mod config;
pub mod error;
pub mod gate;
pub mod identity;
pub mod store;

#[cfg(feature = "catalog")]
pub mod catalog;

// Re-exports for convenience
pub use config::IdentityConfig;
pub use error::{IdentityError, Result};
pub use gate::{evaluate, AccessLevel, DenyReason, GateDecision};
pub use identity::{IdentityActor, IdentityHandle, PersonalInfo, UserPreferences, UserRecord};
pub use store::{FileStore, KeyValueStore, MemoryStore};

#[cfg(feature = "catalog")]
pub use catalog::{Feature, GatePrompt, PlanDuration};
