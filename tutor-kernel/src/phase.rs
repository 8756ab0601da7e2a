//! Submission phase state machine.

use thiserror::Error;
use tracing::debug;

/// Phases the form moves through around a single request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// A request is outstanding.
    Loading,
    /// The last request returned text.
    Success,
    /// The last request failed.
    Failure,
}

impl Phase {
    /// Applies `event`, returning the resulting phase.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError::InvalidTransition`] when `event` is not allowed from
    /// the current phase.
    pub fn transition(&mut self, event: PhaseEvent) -> PhaseResult<Self> {
        let next = match (*self, event) {
            (Self::Idle | Self::Success | Self::Failure, PhaseEvent::Submit) => Self::Loading,
            (Self::Loading, PhaseEvent::Succeed) => Self::Success,
            (Self::Loading, PhaseEvent::Fail) => Self::Failure,
            (Self::Loading, PhaseEvent::Abandon) => Self::Idle,
            (from, event) => return Err(PhaseError::InvalidTransition { from, event }),
        };

        debug!(from = ?*self, to = ?next, ?event, "form phase transition");
        *self = next;
        Ok(next)
    }
}

/// Events that move the form between phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    /// A validated formula was submitted.
    Submit,
    /// The request returned text.
    Succeed,
    /// The request failed.
    Fail,
    /// The in-flight request was dropped before it settled.
    Abandon,
}

/// Errors emitted by the phase machine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhaseError {
    /// Transition was not permitted from the current phase.
    #[error("invalid form transition from {from:?} via {event:?}")]
    InvalidTransition {
        /// Phase prior to the attempted transition.
        from: Phase,
        /// Event that triggered the failure.
        event: PhaseEvent,
    },
}

/// Result alias used for phase operations.
pub type PhaseResult<T> = Result<T, PhaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_then_succeed() {
        let mut phase = Phase::default();
        assert_eq!(phase, Phase::Idle);

        phase.transition(PhaseEvent::Submit).unwrap();
        assert_eq!(phase, Phase::Loading);
        phase.transition(PhaseEvent::Succeed).unwrap();
        assert_eq!(phase, Phase::Success);
    }

    #[test]
    fn terminal_phases_accept_resubmission() {
        for start in [Phase::Success, Phase::Failure] {
            let mut phase = start;
            assert_eq!(phase.transition(PhaseEvent::Submit), Ok(Phase::Loading));
        }
    }

    #[test]
    fn loading_rejects_second_submit() {
        let mut phase = Phase::Loading;
        let err = phase
            .transition(PhaseEvent::Submit)
            .expect_err("double submit");
        assert_eq!(
            err,
            PhaseError::InvalidTransition {
                from: Phase::Loading,
                event: PhaseEvent::Submit
            }
        );
        assert_eq!(phase, Phase::Loading);
    }

    #[test]
    fn completion_requires_loading() {
        let mut phase = Phase::Idle;
        assert!(phase.transition(PhaseEvent::Succeed).is_err());
        assert!(phase.transition(PhaseEvent::Fail).is_err());
        assert!(phase.transition(PhaseEvent::Abandon).is_err());
    }

    #[test]
    fn abandon_returns_to_idle() {
        let mut phase = Phase::Loading;
        phase.transition(PhaseEvent::Abandon).unwrap();
        assert_eq!(phase, Phase::Idle);
    }
}
