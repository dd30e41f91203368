use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::Utc;
use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

use door_core::event_bus::{make_event, EventSink};
use door_core::types::{EventType, UserDetails};

use crate::gallery::{self, Destination};
use crate::state_machine::WizardStateMachine;
use crate::types::{StepVisit, WizardSession, WizardStep};

/// Owns all wizard sessions and their step state. Step views are rendered
/// from the session snapshot; components call back into the controller to
/// request transitions and never mutate session state directly.
#[derive(Clone)]
pub struct WizardController {
    sessions: Arc<DashMap<Uuid, WizardSession>>,
    event_sink: Arc<dyn EventSink>,
}

impl std::fmt::Debug for WizardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WizardController")
            .field("sessions", &self.sessions.len())
            .finish()
    }
}

impl WizardController {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            event_sink: door_core::event_bus::noop_sink(),
        }
    }

    /// Attach an event sink for emitting funnel events.
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = sink;
        self
    }

    /// Creates a new session positioned at the hero section.
    pub fn start_session(&self) -> Uuid {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let session = WizardSession {
            id,
            step: WizardStep::Hero,
            user: None,
            entered_at: now,
            updated_at: now,
            step_history: vec![StepVisit {
                step: WizardStep::Hero,
                entered_at: now,
            }],
        };

        info!(session_id = %id, "wizard session started");
        self.event_sink
            .emit(make_event(EventType::SessionStarted, id.to_string(), None, None));

        self.sessions.insert(id, session);
        id
    }

    /// Returns a snapshot of the session, if it exists.
    pub fn session(&self, id: &Uuid) -> Option<WizardSession> {
        self.sessions.get(id).map(|s| s.clone())
    }

    pub fn current_step(&self, id: &Uuid) -> Result<WizardStep> {
        self.sessions
            .get(id)
            .map(|s| s.step)
            .ok_or_else(|| anyhow!("Session {} not found", id))
    }

    /// Requests a step transition. Out-of-reach targets are ignored and the
    /// unchanged step is returned; an unknown session is an error.
    pub fn go_to(&self, id: &Uuid, target: WizardStep) -> Result<WizardStep> {
        let mut session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| anyhow!("Session {} not found", id))?;

        let machine = WizardStateMachine::default();
        let from = session.step;
        if !machine.can_transition(from, target) {
            self.event_sink.emit(make_event(
                EventType::StepRejected,
                id.to_string(),
                session.user.as_ref().map(|u| u.email.clone()),
                Some(format!("{:?} -> {:?}", from, target)),
            ));
            return Ok(from);
        }

        let now = Utc::now();
        session.step = target;
        session.updated_at = now;
        session.step_history.push(StepVisit {
            step: target,
            entered_at: now,
        });

        let event_type = if target.index() < from.index() {
            EventType::StepBack
        } else {
            EventType::StepEntered
        };
        info!(session_id = %id, from = ?from, to = ?target, "wizard step change");
        self.event_sink.emit(make_event(
            event_type,
            id.to_string(),
            session.user.as_ref().map(|u| u.email.clone()),
            Some(target.display_name().to_string()),
        ));

        Ok(target)
    }

    /// Stores the captured identity on the session and advances past the
    /// user-details step. Identity is set once; a second attempt fails.
    pub fn set_user_details(&self, id: &Uuid, details: UserDetails) -> Result<WizardStep> {
        {
            let mut session = self
                .sessions
                .get_mut(id)
                .ok_or_else(|| anyhow!("Session {} not found", id))?;

            if session.user.is_some() {
                return Err(anyhow!("Session {} already has user details", id));
            }

            info!(session_id = %id, name = %details.name, "user details captured");
            self.event_sink.emit(make_event(
                EventType::UserDetailsSubmitted,
                id.to_string(),
                Some(details.email.clone()),
                None,
            ));
            session.user = Some(details);
            session.updated_at = Utc::now();
        }
        self.go_to(id, WizardStep::Destinations)
    }

    pub fn user_details(&self, id: &Uuid) -> Result<Option<UserDetails>> {
        self.sessions
            .get(id)
            .map(|s| s.user.clone())
            .ok_or_else(|| anyhow!("Session {} not found", id))
    }

    /// Gallery click: emits an analytics event and advances to the planner.
    /// The chosen entry is not recorded on the session — browsing is purely
    /// inspirational and the planner asks for the destination again.
    pub fn select_destination(&self, id: &Uuid, index: usize) -> Result<Destination> {
        let destination = gallery::catalog()
            .get(index)
            .cloned()
            .ok_or_else(|| anyhow!("No destination at index {}", index))?;

        let email = self
            .sessions
            .get(id)
            .ok_or_else(|| anyhow!("Session {} not found", id))?
            .user
            .as_ref()
            .map(|u| u.email.clone());

        self.event_sink.emit(make_event(
            EventType::DestinationSelected,
            id.to_string(),
            email,
            Some(destination.name.clone()),
        ));
        self.go_to(id, WizardStep::TripPlanner)?;
        Ok(destination)
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use door_core::event_bus::capture_sink;

    fn test_details() -> UserDetails {
        UserDetails {
            name: "Asha".into(),
            email: "asha@example.com".into(),
        }
    }

    #[test]
    fn test_session_starts_at_hero() {
        let controller = WizardController::new();
        let id = controller.start_session();
        assert_eq!(controller.current_step(&id).unwrap(), WizardStep::Hero);
    }

    #[test]
    fn test_go_to_ignores_forward_jump() {
        let controller = WizardController::new();
        let id = controller.start_session();

        let step = controller.go_to(&id, WizardStep::TripPlanner).unwrap();
        assert_eq!(step, WizardStep::Hero);

        let step = controller.go_to(&id, WizardStep::UserDetails).unwrap();
        assert_eq!(step, WizardStep::UserDetails);
    }

    #[test]
    fn test_unknown_session_is_error() {
        let controller = WizardController::new();
        assert!(controller.go_to(&Uuid::new_v4(), WizardStep::Hero).is_err());
    }

    #[test]
    fn test_user_details_set_once() {
        let controller = WizardController::new();
        let id = controller.start_session();
        controller.go_to(&id, WizardStep::UserDetails).unwrap();

        let step = controller.set_user_details(&id, test_details()).unwrap();
        assert_eq!(step, WizardStep::Destinations);

        let again = controller.set_user_details(
            &id,
            UserDetails {
                name: "Other".into(),
                email: "other@example.com".into(),
            },
        );
        assert!(again.is_err());
        assert_eq!(
            controller.user_details(&id).unwrap().unwrap().name,
            "Asha"
        );
    }

    #[test]
    fn test_destination_click_advances() {
        let sink = capture_sink();
        let controller =
            WizardController::new().with_event_sink(sink.clone() as Arc<dyn EventSink>);
        let id = controller.start_session();
        controller.go_to(&id, WizardStep::UserDetails).unwrap();
        controller.set_user_details(&id, test_details()).unwrap();

        let destination = controller.select_destination(&id, 0).unwrap();
        assert_eq!(destination.name, "Burj Khalifa");
        assert_eq!(
            controller.current_step(&id).unwrap(),
            WizardStep::TripPlanner
        );
        assert_eq!(sink.count_type(EventType::DestinationSelected), 1);

        // The session records no selection.
        let session = controller.session(&id).unwrap();
        assert!(session.user.is_some());
    }

    #[test]
    fn test_back_navigation_records_event() {
        let sink = capture_sink();
        let controller =
            WizardController::new().with_event_sink(sink.clone() as Arc<dyn EventSink>);
        let id = controller.start_session();
        controller.go_to(&id, WizardStep::UserDetails).unwrap();
        controller.go_to(&id, WizardStep::Hero).unwrap();

        assert_eq!(sink.count_type(EventType::StepBack), 1);
    }
}
