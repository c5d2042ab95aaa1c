//! Catalog module — what the product gates, and how denials are presented

pub mod features;
pub mod plan;

pub use features::{Feature, GatePrompt};
pub use plan::{duration_options, DurationOption, PlanDuration};
