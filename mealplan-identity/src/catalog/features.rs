//! Gated product features and the prompts shown when access is denied

use serde::{Deserialize, Serialize};

use crate::gate::{self, AccessLevel, DenyReason, GateDecision};
use crate::identity::UserRecord;

/// Product features behind the access gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    // Open to everyone
    MealPlanPreview,
    // Account features
    SavedPlans,
    PlanHistory,
    Recommendations,
    // Premium features
    MultiWeekPlans,
    MealTweaks,
    GroceryList,
    NutritionTracking,
    MealFeedback,
    PrioritySupport,
    PdfExport,
    FamilyPlanning,
}

impl Feature {
    pub const ALL: [Feature; 12] = [
        Self::MealPlanPreview,
        Self::SavedPlans,
        Self::PlanHistory,
        Self::Recommendations,
        Self::MultiWeekPlans,
        Self::MealTweaks,
        Self::GroceryList,
        Self::NutritionTracking,
        Self::MealFeedback,
        Self::PrioritySupport,
        Self::PdfExport,
        Self::FamilyPlanning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MealPlanPreview => "meal_plan_preview",
            Self::SavedPlans => "saved_plans",
            Self::PlanHistory => "plan_history",
            Self::Recommendations => "recommendations",
            Self::MultiWeekPlans => "multi_week_plans",
            Self::MealTweaks => "meal_tweaks",
            Self::GroceryList => "grocery_list",
            Self::NutritionTracking => "nutrition_tracking",
            Self::MealFeedback => "meal_feedback",
            Self::PrioritySupport => "priority_support",
            Self::PdfExport => "pdf_export",
            Self::FamilyPlanning => "family_planning",
        }
    }

    /// Human-readable name, used in prompt descriptions
    pub fn label(&self) -> &'static str {
        match self {
            Self::MealPlanPreview => "Weekly meal plan preview",
            Self::SavedPlans => "Saved meal plans",
            Self::PlanHistory => "Meal plan history",
            Self::Recommendations => "Personalized recommendations",
            Self::MultiWeekPlans => "Multi-week meal plans (1-4 weeks)",
            Self::MealTweaks => "Tweak and customize meals",
            Self::GroceryList => "Smart grocery list integration",
            Self::NutritionTracking => "Advanced nutrition tracking",
            Self::MealFeedback => "Meal feedback and rating",
            Self::PrioritySupport => "Priority customer support",
            Self::PdfExport => "Export meal plans to PDF",
            Self::FamilyPlanning => "Family meal planning tools",
        }
    }

    pub fn required_level(&self) -> AccessLevel {
        match self {
            Self::MealPlanPreview => AccessLevel::Visitor,
            Self::SavedPlans | Self::PlanHistory | Self::Recommendations => AccessLevel::SignedUp,
            Self::MultiWeekPlans
            | Self::MealTweaks
            | Self::GroceryList
            | Self::NutritionTracking
            | Self::MealFeedback
            | Self::PrioritySupport
            | Self::PdfExport
            | Self::FamilyPlanning => AccessLevel::Subscribed,
        }
    }

    pub fn evaluate(&self, user: Option<&UserRecord>) -> GateDecision {
        gate::evaluate(user, self.required_level())
    }

    /// Features unlocked at exactly `level`
    pub fn unlocked_at(level: AccessLevel) -> impl Iterator<Item = Feature> {
        Self::ALL
            .into_iter()
            .filter(move |f| f.required_level() == level)
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content of the fallback shown instead of gated content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatePrompt {
    pub reason: DenyReason,
    pub title: String,
    pub description: String,
    pub benefits: Vec<String>,
    pub call_to_action: String,
}

impl DenyReason {
    /// Prompt for this reason, optionally naming the feature that was requested
    pub fn prompt(&self, feature: Option<&str>) -> GatePrompt {
        match self {
            Self::NeedsSignUp => GatePrompt {
                reason: *self,
                title: "Sign Up Required".into(),
                description: match feature {
                    Some(name) => format!("To use {name}, you need to create an account."),
                    None => "Please sign up to continue.".into(),
                },
                benefits: Feature::unlocked_at(AccessLevel::SignedUp)
                    .map(|f| f.label().to_string())
                    .collect(),
                call_to_action: "Sign Up Free".into(),
            },
            Self::NeedsSubscription => GatePrompt {
                reason: *self,
                title: "Premium Required".into(),
                description: match feature {
                    Some(name) => format!("{name} is available with a premium subscription."),
                    None => "Upgrade to access premium features.".into(),
                },
                benefits: Feature::unlocked_at(AccessLevel::Subscribed)
                    .map(|f| f.label().to_string())
                    .collect(),
                call_to_action: "Upgrade to Premium".into(),
            },
        }
    }
}

impl GateDecision {
    /// Prompt to render when denied, `None` when content may be shown
    pub fn prompt(&self, feature: Option<&str>) -> Option<GatePrompt> {
        self.deny_reason().map(|reason| reason.prompt(feature))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_levels() {
        assert_eq!(Feature::MealPlanPreview.required_level(), AccessLevel::Visitor);
        assert_eq!(Feature::SavedPlans.required_level(), AccessLevel::SignedUp);
        assert_eq!(Feature::MultiWeekPlans.required_level(), AccessLevel::Subscribed);
        assert_eq!(Feature::unlocked_at(AccessLevel::Subscribed).count(), 8);
    }

    #[test]
    fn test_feature_evaluation() {
        let user = UserRecord::for_sign_in("a@x.com");
        assert!(Feature::MealPlanPreview.evaluate(None).is_allowed());
        assert_eq!(
            Feature::PlanHistory.evaluate(None),
            GateDecision::Deny(DenyReason::NeedsSignUp)
        );
        assert!(Feature::PlanHistory.evaluate(Some(&user)).is_allowed());
        assert_eq!(
            Feature::GroceryList.evaluate(Some(&user)),
            GateDecision::Deny(DenyReason::NeedsSubscription)
        );
    }

    #[test]
    fn test_prompts() {
        let signup = DenyReason::NeedsSignUp.prompt(Some("meal planning"));
        assert_eq!(signup.title, "Sign Up Required");
        assert_eq!(
            signup.description,
            "To use meal planning, you need to create an account."
        );
        assert_eq!(signup.benefits.len(), 3);

        let premium = DenyReason::NeedsSubscription.prompt(None);
        assert_eq!(premium.description, "Upgrade to access premium features.");
        assert!(premium
            .benefits
            .contains(&"Multi-week meal plans (1-4 weeks)".to_string()));

        assert!(GateDecision::Allow.prompt(None).is_none());
    }

    #[test]
    fn test_feature_serialization() {
        let json = serde_json::to_string(&Feature::PdfExport).unwrap();
        assert_eq!(json, "\"pdf_export\"");
        for feature in Feature::ALL {
            assert_eq!(format!("\"{feature}\""), serde_json::to_string(&feature).unwrap());
        }
    }
}
