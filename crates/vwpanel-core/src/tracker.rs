// ── Per-action in-flight tracking ──
//
// Each user-triggerable action (save, per-slot upload, per-slot delete)
// owns one tracker. Claiming it is atomic; the guard puts it back to
// `Idle` when dropped, whatever the outcome.

use strum::Display;
use tokio::sync::watch;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ActionState {
    #[default]
    Idle,
    InFlight,
}

/// `Idle → InFlight → Idle` state machine for one action.
#[derive(Debug)]
pub struct ActionTracker {
    name: String,
    state: watch::Sender<ActionState>,
}

impl ActionTracker {
    pub fn new(name: impl Into<String>) -> Self {
        let (state, _) = watch::channel(ActionState::Idle);
        Self {
            name: name.into(),
            state,
        }
    }

    /// Claim the action, or fail with [`CoreError::Busy`] if it is already
    /// in flight.
    pub fn try_begin(&self) -> Result<InFlightGuard<'_>, CoreError> {
        let claimed = self.state.send_if_modified(|state| {
            if *state == ActionState::Idle {
                *state = ActionState::InFlight;
                true
            } else {
                false
            }
        });

        if claimed {
            Ok(InFlightGuard { tracker: self })
        } else {
            Err(CoreError::Busy {
                action: self.name.clone(),
            })
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> ActionState {
        *self.state.borrow()
    }

    pub fn is_in_flight(&self) -> bool {
        self.state() == ActionState::InFlight
    }

    /// Subscribe to state changes (e.g. to disable one button).
    pub fn subscribe(&self) -> watch::Receiver<ActionState> {
        self.state.subscribe()
    }
}

/// Holds an action in flight until dropped.
#[derive(Debug)]
#[must_use = "the action returns to idle as soon as the guard is dropped"]
pub struct InFlightGuard<'a> {
    tracker: &'a ActionTracker,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.tracker.state.send_replace(ActionState::Idle);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn second_claim_is_busy() {
        let tracker = ActionTracker::new("Save");
        let guard = tracker.try_begin().unwrap();
        assert!(tracker.is_in_flight());

        let err = tracker.try_begin().unwrap_err();
        assert_eq!(err.to_string(), "Save already in progress");

        drop(guard);
        assert_eq!(tracker.state(), ActionState::Idle);
        assert!(tracker.try_begin().is_ok());
    }

    #[test]
    fn trackers_are_independent() {
        let cert = ActionTracker::new("cert upload");
        let key = ActionTracker::new("key upload");
        let _cert = cert.try_begin().unwrap();
        assert!(key.try_begin().is_ok());
    }

    #[test]
    fn subscribers_see_transitions() {
        let tracker = ActionTracker::new("Save");
        let mut rx = tracker.subscribe();
        {
            let _guard = tracker.try_begin().unwrap();
            assert!(rx.has_changed().unwrap());
            assert_eq!(*rx.borrow_and_update(), ActionState::InFlight);
        }
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), ActionState::Idle);
    }
}
