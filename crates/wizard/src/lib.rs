//! Wizard orchestration — the step-gated flow guiding a visitor from the
//! hero section through identity capture and destination browsing to the
//! trip planner.

pub mod controller;
pub mod gallery;
pub mod state_machine;
pub mod types;

pub use controller::WizardController;
pub use state_machine::WizardStateMachine;
pub use types::{WizardSession, WizardStep};
