//! Access gate — maps the current user and a required level to a render decision
//!
//! Pure and synchronous: no I/O, no shared state. Safe to call from any number of
//! callers concurrently.
//!
//! ```rust
//! use mealplan_identity::gate::{evaluate, AccessLevel, DenyReason, GateDecision};
//!
//! assert_eq!(evaluate(None, AccessLevel::Visitor), GateDecision::Allow);
//! assert_eq!(
//!     evaluate(None, AccessLevel::Subscribed),
//!     GateDecision::Deny(DenyReason::NeedsSignUp),
//! );
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IdentityError;
use crate::identity::UserRecord;

/// User state tiers, ordered by privilege
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessLevel {
    Visitor,
    SignedUp,
    Subscribed,
}

impl AccessLevel {
    pub const ALL: [AccessLevel; 3] = [Self::Visitor, Self::SignedUp, Self::Subscribed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visitor => "visitor",
            Self::SignedUp => "signed-up",
            Self::Subscribed => "subscribed",
        }
    }

    /// Level derived from the current user, `Visitor` when signed out
    pub fn of(user: Option<&UserRecord>) -> Self {
        user.map_or(Self::Visitor, UserRecord::access_level)
    }

    /// Check if this level satisfies `required`
    pub fn satisfies(&self, required: AccessLevel) -> bool {
        *self >= required
    }
}

impl FromStr for AccessLevel {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "visitor" => Ok(Self::Visitor),
            "signed-up" | "signed_up" | "signedup" => Ok(Self::SignedUp),
            "subscribed" => Ok(Self::Subscribed),
            other => Err(IdentityError::InvalidAccessLevel(other.to_string())),
        }
    }
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why access was denied; each reason gets its own prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// Nobody is signed in
    NeedsSignUp,
    /// Signed in, not subscribed
    NeedsSubscription,
}

impl DenyReason {
    /// Level the user must reach to clear this reason
    pub fn unlocks(&self) -> AccessLevel {
        match self {
            Self::NeedsSignUp => AccessLevel::SignedUp,
            Self::NeedsSubscription => AccessLevel::Subscribed,
        }
    }
}

/// Outcome of a gate evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum GateDecision {
    Allow,
    Deny(DenyReason),
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Self::Allow => None,
            Self::Deny(reason) => Some(*reason),
        }
    }
}

/// Decide whether `current_user` may see content requiring `required`
pub fn evaluate(current_user: Option<&UserRecord>, required: AccessLevel) -> GateDecision {
    if AccessLevel::of(current_user).satisfies(required) {
        return GateDecision::Allow;
    }
    match current_user {
        None => GateDecision::Deny(DenyReason::NeedsSignUp),
        Some(_) => GateDecision::Deny(DenyReason::NeedsSubscription),
    }
}
