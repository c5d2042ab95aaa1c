//! Plan duration gating — one-week plans for everyone, longer plans for subscribers

use serde::{Deserialize, Serialize};

use crate::error::{IdentityError, Result};
use crate::gate::{self, AccessLevel, GateDecision};
use crate::identity::UserRecord;

/// Length of a generated meal plan, 1 to 4 weeks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PlanDuration(u8);

impl PlanDuration {
    pub const MIN_WEEKS: u8 = 1;
    pub const MAX_WEEKS: u8 = 4;

    pub const ONE_WEEK: PlanDuration = PlanDuration(1);

    pub fn new(weeks: u8) -> Result<Self> {
        if (Self::MIN_WEEKS..=Self::MAX_WEEKS).contains(&weeks) {
            Ok(Self(weeks))
        } else {
            Err(IdentityError::InvalidPlanDuration(weeks))
        }
    }

    pub fn weeks(&self) -> u8 {
        self.0
    }

    pub fn days(&self) -> u16 {
        u16::from(self.0) * 7
    }

    pub fn label(&self) -> &'static str {
        match self.0 {
            1 => "1 Week",
            2 => "2 Weeks",
            3 => "3 Weeks",
            _ => "4 Weeks",
        }
    }

    pub fn description(&self) -> &'static str {
        match self.0 {
            1 => "Perfect for trying out",
            2 => "Build healthy habits",
            3 => "Establish routines",
            _ => "Complete transformation",
        }
    }

    pub fn required_level(&self) -> AccessLevel {
        if self.0 == 1 {
            AccessLevel::Visitor
        } else {
            AccessLevel::Subscribed
        }
    }

    pub fn evaluate(&self, user: Option<&UserRecord>) -> GateDecision {
        gate::evaluate(user, self.required_level())
    }

    pub fn all() -> impl Iterator<Item = PlanDuration> {
        (Self::MIN_WEEKS..=Self::MAX_WEEKS).map(PlanDuration)
    }
}

impl Default for PlanDuration {
    fn default() -> Self {
        Self::ONE_WEEK
    }
}

impl TryFrom<u8> for PlanDuration {
    type Error = IdentityError;

    fn try_from(weeks: u8) -> Result<Self> {
        Self::new(weeks)
    }
}

impl From<PlanDuration> for u8 {
    fn from(duration: PlanDuration) -> Self {
        duration.0
    }
}

/// A selectable duration and whether the current user may pick it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationOption {
    pub duration: PlanDuration,
    pub available: bool,
}

/// All durations with availability for `user`
pub fn duration_options(user: Option<&UserRecord>) -> Vec<DurationOption> {
    PlanDuration::all()
        .map(|duration| DurationOption {
            duration,
            available: duration.evaluate(user).is_allowed(),
        })
        .collect()
}
