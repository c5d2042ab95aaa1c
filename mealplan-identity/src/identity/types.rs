//! Identity domain types — UserRecord, UserPreferences, PersonalInfo
//!
//! Serializable, cloneable, and cheap to pass around. The serde layout matches the
//! persisted local-storage record (`isSubscribed`, `createdAt`, ...).

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::gate::AccessLevel;

/// Meal-planning preferences collected during onboarding
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    #[serde(default)]
    pub cuisines: BTreeSet<String>,
    #[serde(default)]
    pub dietary_restrictions: BTreeSet<String>,
    #[serde(default)]
    pub goals: BTreeSet<String>,
    #[serde(default)]
    pub allergies: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_info: Option<PersonalInfo>,
}

impl UserPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cuisines<I, S>(mut self, cuisines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cuisines = cuisines.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_dietary_restrictions<I, S>(mut self, restrictions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dietary_restrictions = restrictions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_goals<I, S>(mut self, goals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.goals = goals.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_allergies<I, S>(mut self, allergies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allergies = allergies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_personal_info(mut self, info: PersonalInfo) -> Self {
        self.personal_info = Some(info);
        self
    }

    /// True when nothing has been selected
    pub fn is_empty(&self) -> bool {
        self.cuisines.is_empty()
            && self.dietary_restrictions.is_empty()
            && self.goals.is_empty()
            && self.allergies.is_empty()
            && self.personal_info.is_none()
    }
}

/// Optional body metrics from the onboarding flow
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Centimetres
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u16>,
    /// Kilograms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<String>,
}

/// The single live user record, as persisted under the storage key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub is_subscribed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<UserPreferences>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Record for a returning user; identifier derived from the email
    pub(crate) fn for_sign_in(email: &str) -> Self {
        let email = email.trim();
        Self {
            id: sign_in_id(email),
            email: email.to_string(),
            name: Some(email_local_part(email).to_string()),
            is_subscribed: false,
            preferences: None,
            created_at: Utc::now(),
        }
    }

    /// Record for a new account; fresh identifier, optional explicit name
    pub(crate) fn for_sign_up(email: &str, name: Option<&str>) -> Self {
        let email = email.trim();
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| email_local_part(email));
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: Some(name.to_string()),
            is_subscribed: false,
            preferences: None,
            created_at: Utc::now(),
        }
    }

    /// Display name, falling back to the email local-part
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| email_local_part(&self.email))
    }

    /// Access level this record grants
    pub fn access_level(&self) -> AccessLevel {
        if self.is_subscribed {
            AccessLevel::Subscribed
        } else {
            AccessLevel::SignedUp
        }
    }

    /// Same account: emails equal after trimming, ignoring case
    pub fn matches_email(&self, email: &str) -> bool {
        self.email.trim().to_lowercase() == email.trim().to_lowercase()
    }

    pub fn has_preferences(&self) -> bool {
        self.preferences.is_some()
    }
}

/// Text before the first `@`, or the whole string when there is none
pub fn email_local_part(email: &str) -> &str {
    match email.split_once('@') {
        Some((local, _)) => local,
        None => email,
    }
}

/// Deterministic identifier for sign-in: SHA-256 of the normalized email, truncated
pub(crate) fn sign_in_id(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    let digest = Sha256::digest(normalized.as_bytes());
    let hex = format!("{digest:x}");
    format!("usr_{}", &hex[..32])
}
