use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Identity captured by the first wizard step and attached to every later
/// submission. Set once per session, immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserDetails {
    pub name: String,
    pub email: String,
}

/// Budget tier selected in the trip planner. Outbound payloads always carry
/// the human-readable description, never the raw keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetTier {
    Budget,
    MidRange,
    Luxury,
}

impl BudgetTier {
    /// Short display label shown on the tier selector.
    pub fn label(&self) -> &'static str {
        match self {
            BudgetTier::Budget => "₹ Budget",
            BudgetTier::MidRange => "₹₹ Mid-Range",
            BudgetTier::Luxury => "₹₹₹ Luxury",
        }
    }

    /// Per-day spend description carried in outbound payloads.
    pub fn description(&self) -> &'static str {
        match self {
            BudgetTier::Budget => "Under ₹8,000/day",
            BudgetTier::MidRange => "₹8,000–25,000/day",
            BudgetTier::Luxury => "₹25,000+/day",
        }
    }
}

impl Default for BudgetTier {
    fn default() -> Self {
        BudgetTier::MidRange
    }
}

/// How the traveller intends to get there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Flight,
    Train,
    Ship,
    Bus,
}

impl TransportMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            TransportMode::Flight => "Flight",
            TransportMode::Train => "Train",
            TransportMode::Ship => "Ship",
            TransportMode::Bus => "Bus",
        }
    }
}

/// Travel-style tags offered by the planner (multi-select).
pub const TRAVEL_STYLES: [&str; 8] = [
    "Adventure",
    "Relaxation",
    "Cultural",
    "Food & Dining",
    "Nightlife",
    "Nature & Wildlife",
    "Photography",
    "Shopping",
];

/// Fully assembled trip request as POSTed to the workflow webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TripRequest {
    pub destination: String,
    pub current_city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub duration_days: u16,
    /// Resolved tier description (e.g. "₹25,000+/day"), never the keyword.
    pub budget: String,
    pub travel_style: Vec<String>,
    pub group_size: String,
    pub transport_mode: TransportMode,
    pub name: String,
    pub email: String,
}

/// Funnel analytics event logged for every meaningful user action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunnelEvent {
    pub event_id: Uuid,
    pub event_type: EventType,
    pub session_id: String,
    pub user_email: Option<String>,
    pub detail: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    // Wizard events
    SessionStarted,
    StepEntered,
    StepBack,
    StepRejected,
    // Capture events
    UserDetailsSubmitted,
    DestinationSelected,
    TripSubmitted,
    // Delivery events
    WebhookDelivered,
    WebhookFailed,
    // Voice bridge events
    VoiceForwarded,
    VoiceDropped,
    VoiceExtracted,
}
