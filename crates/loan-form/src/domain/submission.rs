//! Submission phases and the transitions between them.
//!
//! The phase machine is pure: [`SubmissionPhase::advance`] looks up the
//! event in a fixed table and either returns the next phase or a
//! [`TransitionError`]. Side effects (validation, draft clearing, gateway
//! calls) belong to [`crate::domain::LoanFormSession`].

use thiserror::Error;

use super::ports::{LoanApplicationGatewayError, SubmissionAck};

/// Where the form is in its submission flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionPhase {
    /// Editing; submission is enabled.
    #[default]
    Idle,
    /// Validation is running.
    Validating,
    /// Validation failed; errors are being presented.
    Invalid,
    /// The gateway call is in flight; submission is disabled.
    Submitting,
    /// The gateway accepted the application.
    Success(SubmissionAck),
    /// The gateway call failed; the draft is retained.
    Failed(String),
}

/// Inputs that drive [`SubmissionPhase::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionEvent {
    /// The applicant pressed submit.
    SubmitRequested,
    /// Validation reported at least one error.
    ValidationFailed,
    /// Validation passed.
    ValidationPassed,
    /// Validation errors were handed back for correction.
    ErrorsPresented,
    /// The gateway acknowledged the application.
    RemoteSucceeded(SubmissionAck),
    /// The gateway call failed with the given reason.
    RemoteFailed(String),
    /// The applicant dismissed a success or failure notice.
    NoticeDismissed,
    /// The applicant reset the form.
    FormReset,
}

impl SubmissionEvent {
    /// Short identifier used in logs and errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SubmitRequested => "submit_requested",
            Self::ValidationFailed => "validation_failed",
            Self::ValidationPassed => "validation_passed",
            Self::ErrorsPresented => "errors_presented",
            Self::RemoteSucceeded(_) => "remote_succeeded",
            Self::RemoteFailed(_) => "remote_failed",
            Self::NoticeDismissed => "notice_dismissed",
            Self::FormReset => "form_reset",
        }
    }
}

/// An event that the current phase does not accept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot apply {event} while {phase}")]
pub struct TransitionError {
    /// Phase the machine was in.
    pub phase: &'static str,
    /// Event that was rejected.
    pub event: &'static str,
}

impl SubmissionPhase {
    /// Short identifier used in logs and errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Invalid => "invalid",
            Self::Submitting => "submitting",
            Self::Success(_) => "success",
            Self::Failed(_) => "failed",
        }
    }

    /// Whether a submission may start from this phase.
    ///
    /// A failed attempt may be retried without dismissing its notice first.
    #[must_use]
    pub const fn is_submit_enabled(&self) -> bool {
        matches!(self, Self::Idle | Self::Failed(_))
    }

    /// Compute the phase that follows `event`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] when `event` is not accepted in the
    /// current phase.
    ///
    /// # Examples
    /// ```
    /// use loan_form::domain::{SubmissionEvent, SubmissionPhase};
    ///
    /// let phase = SubmissionPhase::Idle
    ///     .advance(SubmissionEvent::SubmitRequested)
    ///     .expect("idle accepts submit");
    /// assert_eq!(phase, SubmissionPhase::Validating);
    /// assert!(phase.advance(SubmissionEvent::SubmitRequested).is_err());
    /// ```
    pub fn advance(&self, event: SubmissionEvent) -> Result<Self, TransitionError> {
        use SubmissionEvent as E;

        let next = match (self, event) {
            (Self::Idle | Self::Failed(_), E::SubmitRequested) => Self::Validating,
            (Self::Validating, E::ValidationFailed) => Self::Invalid,
            (Self::Validating, E::ValidationPassed) => Self::Submitting,
            (Self::Invalid, E::ErrorsPresented) => Self::Idle,
            (Self::Submitting, E::RemoteSucceeded(ack)) => Self::Success(ack),
            (Self::Submitting, E::RemoteFailed(reason)) => Self::Failed(reason),
            (Self::Invalid | Self::Success(_) | Self::Failed(_), E::NoticeDismissed) => Self::Idle,
            (
                Self::Idle | Self::Invalid | Self::Success(_) | Self::Failed(_),
                E::FormReset,
            ) => Self::Idle,
            (phase, rejected) => {
                return Err(TransitionError {
                    phase: phase.name(),
                    event: rejected.name(),
                });
            }
        };
        Ok(next)
    }
}

/// Why a submission attempt ended in [`SubmissionPhase::Failed`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// The gateway reported a failure.
    #[error(transparent)]
    Gateway(#[from] LoanApplicationGatewayError),
    /// The gateway did not answer in time.
    #[error("loan application service did not respond within {timeout_ms} ms")]
    TimedOut {
        /// Timeout that elapsed, in milliseconds.
        timeout_ms: u64,
    },
}
