//! Port for handing a validated loan application to the lender's backend.
//!
//! The form only ever talks to this trait; the bundled adapter simulates
//! network latency, and a real deployment plugs in an HTTP client.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::define_port_error;
use crate::domain::LoanApplication;

define_port_error! {
    /// Errors raised by loan application gateway adapters.
    pub enum LoanApplicationGatewayError {
        /// The backend could not be reached.
        Unavailable {
            /// Adapter-specific reason.
            message: String,
        } => "loan application service unavailable: {message}",
        /// The backend refused the application.
        Rejected {
            /// Reason returned by the backend.
            message: String,
        } => "loan application rejected: {message}",
    }
}

/// Acknowledgement returned once the backend has accepted an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionAck {
    /// Reference the applicant can quote when contacting the lender.
    pub reference: Uuid,
    /// When the backend received the application.
    pub received_at: DateTime<Utc>,
}

/// Port for submitting applications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoanApplicationGateway: Send + Sync {
    /// Submit one application. Implementations must not retry internally.
    ///
    /// # Errors
    ///
    /// Returns [`LoanApplicationGatewayError`] when the backend is unreachable
    /// or refuses the application.
    async fn submit(
        &self,
        application: &LoanApplication,
    ) -> Result<SubmissionAck, LoanApplicationGatewayError>;
}

/// Fixture gateway that accepts every application immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoanApplicationGateway;

#[async_trait]
impl LoanApplicationGateway for FixtureLoanApplicationGateway {
    async fn submit(
        &self,
        _application: &LoanApplication,
    ) -> Result<SubmissionAck, LoanApplicationGatewayError> {
        Ok(SubmissionAck {
            reference: Uuid::new_v4(),
            received_at: Utc::now(),
        })
    }
}
