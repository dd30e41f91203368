//! Trip planner form — field state, date/duration derivation, mandatory
//! field validation, and submission of the assembled request to the
//! configurable workflow endpoint.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use door_core::event_bus::{make_event, EventSink};
use door_core::notify::{Notification, Notifier};
use door_core::types::{BudgetTier, EventType, TransportMode, TripRequest, UserDetails, TRAVEL_STYLES};
use door_outbound::{ReverseGeocoder, WebhookClient};

const DEFAULT_DURATION_DAYS: u16 = 7;
const MIN_DURATION_DAYS: u16 = 1;
const MAX_DURATION_DAYS: u16 = 14;

/// `|end - start|` in whole days, floored at one.
fn derive_duration(start: NaiveDate, end: NaiveDate) -> u16 {
    let days = end.signed_duration_since(start).num_days().abs();
    days.max(1).min(i64::from(u16::MAX)) as u16
}

/// Local state of the trip-planner form.
///
/// The date fields and the duration derive each other: whichever the user
/// touches last rewrites the two fields it does not own. These are one-way
/// recomputations, not a constraint solver — each setter only writes
/// forward, so no cycle detection is needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripPlannerForm {
    pub destination: String,
    pub current_city: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub duration_days: Option<u16>,
    pub budget: BudgetTier,
    pub travel_style: Vec<String>,
    pub group_size: String,
    pub transport_mode: Option<TransportMode>,
    #[serde(skip)]
    submitting: bool,
}

impl Default for TripPlannerForm {
    fn default() -> Self {
        Self {
            destination: String::new(),
            current_city: String::new(),
            start_date: None,
            end_date: None,
            duration_days: Some(DEFAULT_DURATION_DAYS),
            budget: BudgetTier::default(),
            travel_style: Vec::new(),
            group_size: "2".to_string(),
            transport_mode: None,
            submitting: false,
        }
    }
}

impl TripPlannerForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_destination(&mut self, destination: impl Into<String>) {
        self.destination = destination.into();
    }

    pub fn set_current_city(&mut self, city: impl Into<String>) {
        self.current_city = city.into();
    }

    pub fn set_group_size(&mut self, group_size: impl Into<String>) {
        self.group_size = group_size.into();
    }

    pub fn set_transport_mode(&mut self, mode: TransportMode) {
        self.transport_mode = Some(mode);
    }

    pub fn set_budget(&mut self, tier: BudgetTier) {
        self.budget = tier;
    }

    /// Adds or removes a travel-style tag. Unknown tags are ignored.
    pub fn toggle_travel_style(&mut self, style: &str) {
        if !TRAVEL_STYLES.contains(&style) {
            debug!(style, "unknown travel style ignored");
            return;
        }
        if let Some(pos) = self.travel_style.iter().position(|s| s == style) {
            self.travel_style.remove(pos);
        } else {
            self.travel_style.push(style.to_string());
        }
    }

    /// Sets the start date. With an end date present the duration is
    /// recomputed; with only a duration present the end date is.
    pub fn set_start_date(&mut self, date: NaiveDate) {
        self.start_date = Some(date);
        if let Some(end) = self.end_date {
            self.duration_days = Some(derive_duration(date, end));
        } else if let Some(days) = self.duration_days {
            self.end_date = Some(date + Duration::days(i64::from(days)));
        }
    }

    /// Sets the end date, recomputing the duration when a start is present.
    pub fn set_end_date(&mut self, date: NaiveDate) {
        self.end_date = Some(date);
        if let Some(start) = self.start_date {
            self.duration_days = Some(derive_duration(start, date));
        }
    }

    /// Sets the duration (clamped to the 1–14 day slider range),
    /// recomputing the end date when a start is present.
    pub fn set_duration(&mut self, days: u16) {
        let days = days.clamp(MIN_DURATION_DAYS, MAX_DURATION_DAYS);
        self.duration_days = Some(days);
        if let Some(start) = self.start_date {
            self.end_date = Some(start + Duration::days(i64::from(days)));
        }
    }

    /// Auto-fills the origin city from browser-granted coordinates. Runs
    /// only while the field is still empty; lookup failures leave it blank
    /// and are logged, never surfaced.
    pub async fn autofill_city(
        &mut self,
        geocoder: &ReverseGeocoder,
        latitude: f64,
        longitude: f64,
    ) {
        if !self.current_city.trim().is_empty() || !geocoder.enabled() {
            return;
        }
        match geocoder.city_for(latitude, longitude).await {
            Ok(city) => {
                debug!(city = %city, "origin city auto-filled");
                self.current_city = city;
            }
            Err(e) => {
                debug!(error = %e, "reverse geocode failed, leaving city blank");
            }
        }
    }

    /// Labels of mandatory fields that are still empty.
    pub fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.destination.trim().is_empty() {
            missing.push("Destination".to_string());
        }
        if self.current_city.trim().is_empty() {
            missing.push("Current City".to_string());
        }
        if self.group_size.trim().is_empty() {
            missing.push("Group Size".to_string());
        }
        if self.transport_mode.is_none() {
            missing.push("Transport Mode".to_string());
        }
        missing
    }

    /// Assembles the outbound request, resolving the budget tier to its
    /// display description and merging the session identity.
    pub fn assemble(&self, user: Option<&UserDetails>) -> Result<TripRequest, Vec<String>> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(missing);
        }

        let transport_mode = self.transport_mode.expect("checked by missing_fields");
        Ok(TripRequest {
            destination: self.destination.trim().to_string(),
            current_city: self.current_city.trim().to_string(),
            start_date: self.start_date,
            end_date: self.end_date,
            duration_days: self.duration_days.unwrap_or(DEFAULT_DURATION_DAYS),
            budget: self.budget.description().to_string(),
            travel_style: self.travel_style.clone(),
            group_size: self.group_size.trim().to_string(),
            transport_mode,
            name: user.map(|u| u.name.clone()).unwrap_or_default(),
            email: user.map(|u| u.email.clone()).unwrap_or_default(),
        })
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    fn begin_submit(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        self.submitting = true;
        true
    }

    fn finish_submit(&mut self) {
        self.submitting = false;
    }
}

/// Result of a trip submission. Notifications have already been surfaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TripOutcome {
    /// Webhook accepted the request. The form stays on screen.
    Accepted(Box<TripRequest>),
    /// Mandatory fields were missing; no network call was made.
    MissingFields(Vec<String>),
    /// Webhook rejected the call or the transport failed; resubmittable.
    Failed,
    /// A submission is already pending on this form.
    InFlight,
}

/// Runs the trip submission: validate, assemble, POST, notify.
pub struct TripService {
    client: Arc<WebhookClient>,
    notifier: Arc<dyn Notifier>,
    event_sink: Arc<dyn EventSink>,
    url: String,
}

impl TripService {
    pub fn new(client: Arc<WebhookClient>, notifier: Arc<dyn Notifier>, url: String) -> Self {
        Self {
            client,
            notifier,
            event_sink: door_core::event_bus::noop_sink(),
            url,
        }
    }

    /// Attach an event sink for emitting funnel events.
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = sink;
        self
    }

    pub async fn submit(
        &self,
        session_id: &str,
        form: &mut TripPlannerForm,
        user: Option<&UserDetails>,
    ) -> TripOutcome {
        if !form.begin_submit() {
            debug!(session_id, "trip submit ignored, already in flight");
            return TripOutcome::InFlight;
        }
        let outcome = self.submit_inner(session_id, form, user).await;
        form.finish_submit();
        outcome
    }

    async fn submit_inner(
        &self,
        session_id: &str,
        form: &TripPlannerForm,
        user: Option<&UserDetails>,
    ) -> TripOutcome {
        let request = match form.assemble(user) {
            Ok(request) => request,
            Err(missing) => {
                self.notifier.notify(Notification::destructive(
                    "Missing Information",
                    format!("Please fill in: {}", missing.join(", ")),
                ));
                return TripOutcome::MissingFields(missing);
            }
        };

        let payload = match serde_json::to_value(&request) {
            Ok(payload) => payload,
            Err(e) => {
                debug!(error = %e, "trip request serialization failed");
                return TripOutcome::Failed;
            }
        };

        self.event_sink.emit(make_event(
            EventType::TripSubmitted,
            session_id,
            Some(request.email.clone()),
            Some(request.destination.clone()),
        ));

        match self.client.dispatch(&self.url, payload).await {
            Ok(delivery) if delivery.success => {
                self.notifier.notify(Notification::success(
                    "Itinerary on its way!",
                    "Your personalized itinerary will be sent to your email shortly!",
                ));
                self.event_sink.emit(make_event(
                    EventType::WebhookDelivered,
                    session_id,
                    Some(request.email.clone()),
                    Some("trip_planner".into()),
                ));
                TripOutcome::Accepted(Box::new(request))
            }
            Ok(_) | Err(_) => {
                self.notifier.notify(Notification::destructive(
                    "Error",
                    "Our planner backend had a problem. Please try again.",
                ));
                self.event_sink.emit(make_event(
                    EventType::WebhookFailed,
                    session_id,
                    Some(request.email.clone()),
                    Some("trip_planner".into()),
                ));
                TripOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use door_core::notify::{capture_notifier, Severity};
    use door_outbound::CaptureTransport;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn filled_form() -> TripPlannerForm {
        let mut form = TripPlannerForm::new();
        form.set_destination("Paris, France");
        form.set_current_city("Chennai");
        form.set_transport_mode(TransportMode::Flight);
        form
    }

    fn user() -> UserDetails {
        UserDetails {
            name: "Asha".into(),
            email: "asha@example.com".into(),
        }
    }

    fn service_with(
        transport: Arc<CaptureTransport>,
        notifier: Arc<door_core::notify::CaptureNotifier>,
    ) -> TripService {
        let client = Arc::new(WebhookClient::new(transport));
        TripService::new(
            client,
            notifier as Arc<dyn Notifier>,
            "https://hooks.example.com/trip".into(),
        )
    }

    #[test]
    fn test_duration_derived_from_dates() {
        let mut form = TripPlannerForm::new();
        form.set_end_date(date(2024, 1, 8));
        form.set_start_date(date(2024, 1, 1));
        assert_eq!(form.duration_days, Some(7));
    }

    #[test]
    fn test_end_date_derived_from_duration() {
        let mut form = TripPlannerForm::new();
        form.duration_days = Some(5);
        form.set_start_date(date(2024, 1, 1));
        assert_eq!(form.end_date, Some(date(2024, 1, 6)));
    }

    #[test]
    fn test_end_date_change_recomputes_duration() {
        let mut form = TripPlannerForm::new();
        form.set_start_date(date(2024, 3, 10));
        form.set_end_date(date(2024, 3, 13));
        assert_eq!(form.duration_days, Some(3));
    }

    #[test]
    fn test_duration_change_recomputes_end_date() {
        let mut form = TripPlannerForm::new();
        form.set_start_date(date(2024, 3, 10));
        form.set_duration(4);
        assert_eq!(form.end_date, Some(date(2024, 3, 14)));
    }

    #[test]
    fn test_duration_floored_at_one() {
        let mut form = TripPlannerForm::new();
        form.set_start_date(date(2024, 5, 20));
        form.set_end_date(date(2024, 5, 20));
        assert_eq!(form.duration_days, Some(1));
    }

    #[test]
    fn test_duration_clamped_to_slider_range() {
        let mut form = TripPlannerForm::new();
        form.set_duration(30);
        assert_eq!(form.duration_days, Some(14));
        form.set_duration(0);
        assert_eq!(form.duration_days, Some(1));
    }

    #[test]
    fn test_missing_fields_labels() {
        let form = TripPlannerForm::new();
        let missing = form.missing_fields();
        assert_eq!(
            missing,
            vec!["Destination", "Current City", "Transport Mode"]
        );
    }

    #[test]
    fn test_travel_style_toggle() {
        let mut form = TripPlannerForm::new();
        form.toggle_travel_style("Adventure");
        form.toggle_travel_style("Photography");
        assert_eq!(form.travel_style, vec!["Adventure", "Photography"]);

        form.toggle_travel_style("Adventure");
        assert_eq!(form.travel_style, vec!["Photography"]);

        form.toggle_travel_style("Skydiving");
        assert_eq!(form.travel_style, vec!["Photography"]);
    }

    #[test]
    fn test_luxury_budget_serializes_as_description() {
        let mut form = filled_form();
        form.set_budget(BudgetTier::Luxury);
        let request = form.assemble(Some(&user())).unwrap();
        let payload = serde_json::to_value(&request).unwrap();
        assert_eq!(payload["budget"], "₹25,000+/day");
        assert_ne!(payload["budget"], "luxury");
    }

    #[tokio::test]
    async fn test_missing_destination_blocks_network_call() {
        let transport = Arc::new(CaptureTransport::new());
        let notifier = capture_notifier();
        let service = service_with(transport.clone(), notifier.clone());

        let mut form = filled_form();
        form.set_destination("");

        let outcome = service.submit("sess-1", &mut form, Some(&user())).await;
        match outcome {
            TripOutcome::MissingFields(missing) => {
                assert!(missing.contains(&"Destination".to_string()));
            }
            other => panic!("Expected MissingFields, got {:?}", other),
        }
        assert_eq!(transport.count(), 0);

        let notification = notifier.last().unwrap();
        assert_eq!(notification.severity, Severity::Destructive);
        assert!(notification.body.contains("Destination"));
    }

    #[tokio::test]
    async fn test_successful_submit_notifies_and_merges_identity() {
        let transport = Arc::new(CaptureTransport::new());
        let notifier = capture_notifier();
        let service = service_with(transport.clone(), notifier.clone());

        let mut form = filled_form();
        form.set_start_date(date(2024, 1, 1));
        form.set_end_date(date(2024, 1, 8));
        form.toggle_travel_style("Cultural");

        let outcome = service.submit("sess-1", &mut form, Some(&user())).await;
        assert!(matches!(outcome, TripOutcome::Accepted(_)));

        let (_, payload) = &transport.calls()[0];
        assert_eq!(payload["name"], "Asha");
        assert_eq!(payload["email"], "asha@example.com");
        assert_eq!(payload["duration_days"], 7);
        assert_eq!(payload["group_size"], "2");

        let notification = notifier.last().unwrap();
        assert_eq!(notification.severity, Severity::Success);
        assert!(notification.body.contains("email shortly"));
    }

    #[tokio::test]
    async fn test_successful_submit_leaves_wizard_state_alone() {
        use door_wizard::{WizardController, WizardStep};

        let controller = WizardController::new();
        let session_id = controller.start_session();
        controller.go_to(&session_id, WizardStep::UserDetails).unwrap();
        controller.set_user_details(&session_id, user()).unwrap();
        controller.select_destination(&session_id, 0).unwrap();

        let transport = Arc::new(CaptureTransport::new());
        let notifier = capture_notifier();
        let service = service_with(transport, notifier.clone());

        let mut form = filled_form();
        let outcome = service
            .submit(&session_id.to_string(), &mut form, Some(&user()))
            .await;
        assert!(matches!(outcome, TripOutcome::Accepted(_)));
        assert_eq!(notifier.last().unwrap().severity, Severity::Success);

        // The planner stays rendered; nothing else in the wizard moved.
        assert_eq!(
            controller.current_step(&session_id).unwrap(),
            WizardStep::TripPlanner
        );
        assert_eq!(
            controller.user_details(&session_id).unwrap().unwrap().name,
            "Asha"
        );
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_form() {
        let transport = Arc::new(CaptureTransport::with_status(500));
        let notifier = capture_notifier();
        let service = service_with(transport.clone(), notifier.clone());

        let mut form = filled_form();
        let outcome = service.submit("sess-1", &mut form, Some(&user())).await;
        assert_eq!(outcome, TripOutcome::Failed);
        assert!(!form.is_submitting());
        assert_eq!(form.destination, "Paris, France");

        let notification = notifier.last().unwrap();
        assert_eq!(notification.severity, Severity::Destructive);
    }
}
