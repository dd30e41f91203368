use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::WizardStep;

/// Guards wizard navigation: forward movement is one step at a time, while
/// any previously visited step can be reached backwards. Invalid targets are
/// ignored rather than treated as errors — the back-navigation UI may offer
/// a stale target and the flow simply stays where it is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardStateMachine {
    state: WizardStep,
}

impl WizardStateMachine {
    /// Creates a new state machine positioned at the hero section.
    pub fn new() -> Self {
        Self {
            state: WizardStep::Hero,
        }
    }

    pub fn state(&self) -> WizardStep {
        self.state
    }

    /// Returns `true` if the given transition is allowed: a target whose
    /// index is at most one past the current index.
    pub fn can_transition(&self, from: WizardStep, to: WizardStep) -> bool {
        to.index() <= from.index() + 1
    }

    /// Attempts to move to `to`. Returns `true` if the transition was
    /// applied, `false` if the target was out of reach and ignored.
    pub fn transition(&mut self, to: WizardStep) -> bool {
        if self.can_transition(self.state, to) {
            self.state = to;
            true
        } else {
            debug!(from = ?self.state, to = ?to, "wizard transition ignored");
            false
        }
    }
}

impl Default for WizardStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
