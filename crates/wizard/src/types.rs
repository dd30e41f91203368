use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use door_core::types::UserDetails;

/// The four steps of the landing flow, in visit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Hero,
    UserDetails,
    Destinations,
    TripPlanner,
}

impl WizardStep {
    /// Ordinal position in the flow.
    pub fn index(&self) -> usize {
        match self {
            WizardStep::Hero => 0,
            WizardStep::UserDetails => 1,
            WizardStep::Destinations => 2,
            WizardStep::TripPlanner => 3,
        }
    }

    /// All steps in visit order.
    pub fn all() -> [WizardStep; 4] {
        [
            WizardStep::Hero,
            WizardStep::UserDetails,
            WizardStep::Destinations,
            WizardStep::TripPlanner,
        ]
    }

    /// The next step forward, if any. The last step has no successor — it
    /// stays rendered until the page is reloaded.
    pub fn next(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Hero => Some(WizardStep::UserDetails),
            WizardStep::UserDetails => Some(WizardStep::Destinations),
            WizardStep::Destinations => Some(WizardStep::TripPlanner),
            WizardStep::TripPlanner => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            WizardStep::Hero => "Hero",
            WizardStep::UserDetails => "User Details",
            WizardStep::Destinations => "Destinations",
            WizardStep::TripPlanner => "Trip Planner",
        }
    }
}

/// Record of one step entry, kept for funnel inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepVisit {
    pub step: WizardStep,
    pub entered_at: DateTime<Utc>,
}

/// A visitor's progress through the wizard. Transient, per-session state —
/// nothing outlives the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardSession {
    pub id: Uuid,
    pub step: WizardStep,
    /// Identity captured by the user-details step. Set once, immutable.
    pub user: Option<UserDetails>,
    pub entered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub step_history: Vec<StepVisit>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_order() {
        let steps = WizardStep::all();
        for (i, step) in steps.iter().enumerate() {
            assert_eq!(step.index(), i);
        }
        assert_eq!(WizardStep::Hero.next(), Some(WizardStep::UserDetails));
        assert_eq!(WizardStep::TripPlanner.next(), None);
    }

    #[test]
    fn test_step_serde() {
        let json = serde_json::to_string(&WizardStep::TripPlanner).unwrap();
        assert_eq!(json, "\"trip_planner\"");
        let parsed: WizardStep = serde_json::from_str("\"user_details\"").unwrap();
        assert_eq!(parsed, WizardStep::UserDetails);
    }
}
