//! The form session: sole owner of form state and its lifecycle.
//!
//! A UI shell creates one [`LoanFormSession`], calls [`LoanFormSession::on_init`]
//! when the form mounts, forwards every field edit, and drives submission
//! either in one step ([`LoanFormSession::submit`]) or split around its own
//! rendering ([`LoanFormSession::begin_submission`] then
//! [`LoanFormSession::complete_submission`]).

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::draft::DraftStore;
use super::ports::{DraftStorage, LoanApplicationGateway, SubmissionAck};
use super::submission::{SubmissionError, SubmissionEvent, SubmissionPhase, TransitionError};
use super::{
    FieldName, FieldUpdate, FormValues, LoanApplication, ValidationErrors, salary_warning,
};

/// Why a submission attempt did not reach the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitRejection {
    /// Submission is disabled in the current phase.
    #[error("submission is not available while {phase}")]
    Disabled {
        /// Phase the session was in.
        phase: &'static str,
    },
    /// At least one field failed validation.
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(ValidationErrors),
}

impl From<TransitionError> for SubmitRejection {
    fn from(error: TransitionError) -> Self {
        Self::Disabled { phase: error.phase }
    }
}

/// Result of a submission that reached the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The gateway accepted the application; the draft has been cleared.
    Accepted(SubmissionAck),
    /// The gateway call failed; the draft and values were kept.
    Failed(SubmissionError),
}

/// Owns the form values, validation errors, salary advisory, and
/// submission phase of one loan application form.
pub struct LoanFormSession<S, G> {
    drafts: DraftStore<S>,
    gateway: Arc<G>,
    submission_timeout: Duration,
    values: FormValues,
    errors: ValidationErrors,
    salary_warning: Option<&'static str>,
    phase: SubmissionPhase,
}

impl<S, G> LoanFormSession<S, G>
where
    S: DraftStorage,
    G: LoanApplicationGateway,
{
    /// Create a session with pristine values.
    ///
    /// Call [`Self::on_init`] before accepting input so a stored draft is
    /// restored.
    #[must_use]
    pub fn new(drafts: DraftStore<S>, gateway: Arc<G>, submission_timeout: Duration) -> Self {
        Self {
            drafts,
            gateway,
            submission_timeout,
            values: FormValues::default(),
            errors: ValidationErrors::default(),
            salary_warning: None,
            phase: SubmissionPhase::Idle,
        }
    }

    /// Restore the stored draft, if any, and derive the salary advisory.
    pub fn on_init(&mut self) {
        if let Some(values) = self.drafts.load() {
            self.values = values;
        }
        self.refresh_salary_warning();
        debug!(restored = !self.values.is_pristine(), "form session initialised");
    }

    /// Apply one field edit and persist the complete snapshot.
    pub fn on_field_changed(&mut self, update: FieldUpdate) {
        let field = update.field();
        self.values.apply(update);
        if field == FieldName::SalaryRange {
            self.refresh_salary_warning();
        }
        self.drafts.save(&self.values);
    }

    /// Best-effort flush of the current snapshot.
    ///
    /// Pristine values are not written, so a draft cleared by a successful
    /// submission or a reset is not re-created.
    pub fn on_unload(&self) {
        if self.values.is_pristine() {
            debug!("skipping draft flush for pristine form");
            return;
        }
        self.drafts.save(&self.values);
    }

    /// Flush the snapshot and end the session.
    pub fn on_dispose(self) {
        self.on_unload();
        debug!(phase = self.phase.name(), "form session disposed");
    }

    /// Validate the form and, when it passes, enter
    /// [`SubmissionPhase::Submitting`].
    ///
    /// On validation failure the errors are recorded, the phase returns to
    /// [`SubmissionPhase::Idle`], and the draft is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitRejection::Disabled`] outside `Idle` and `Failed`, and
    /// [`SubmitRejection::Invalid`] when validation fails.
    pub fn begin_submission(&mut self) -> Result<LoanApplication, SubmitRejection> {
        self.transition(SubmissionEvent::SubmitRequested)?;
        match LoanApplication::try_from_values(&self.values) {
            Ok(application) => {
                self.errors = ValidationErrors::default();
                self.transition(SubmissionEvent::ValidationPassed)?;
                debug!("form passed validation");
                Ok(application)
            }
            Err(errors) => {
                self.transition(SubmissionEvent::ValidationFailed)?;
                debug!(invalid_fields = errors.len(), "form failed validation");
                self.errors = errors.clone();
                self.transition(SubmissionEvent::ErrorsPresented)?;
                Err(SubmitRejection::Invalid(errors))
            }
        }
    }

    /// Record the result of the gateway call started by
    /// [`Self::begin_submission`].
    ///
    /// Success clears the draft and resets the form; failure keeps both.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] when no submission is in flight.
    pub fn complete_submission(
        &mut self,
        result: Result<SubmissionAck, SubmissionError>,
    ) -> Result<SubmitOutcome, TransitionError> {
        match result {
            Ok(ack) => {
                self.transition(SubmissionEvent::RemoteSucceeded(ack.clone()))?;
                self.drafts.clear();
                self.clear_form();
                info!(reference = %ack.reference, "loan application submitted");
                Ok(SubmitOutcome::Accepted(ack))
            }
            Err(error) => {
                self.transition(SubmissionEvent::RemoteFailed(error.to_string()))?;
                warn!(error = %error, "loan application submission failed");
                Ok(SubmitOutcome::Failed(error))
            }
        }
    }

    /// Validate, submit through the gateway within the configured timeout,
    /// and record the result.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitRejection`] when the submission never reached the
    /// gateway. Gateway failures are reported as [`SubmitOutcome::Failed`].
    pub async fn submit(&mut self) -> Result<SubmitOutcome, SubmitRejection> {
        let application = self.begin_submission()?;
        let gateway = Arc::clone(&self.gateway);
        let result = match tokio::time::timeout(
            self.submission_timeout,
            gateway.submit(&application),
        )
        .await
        {
            Ok(reply) => reply.map_err(SubmissionError::from),
            Err(_) => Err(SubmissionError::TimedOut {
                timeout_ms: u64::try_from(self.submission_timeout.as_millis())
                    .unwrap_or(u64::MAX),
            }),
        };
        Ok(self.complete_submission(result)?)
    }

    /// Dismiss the success, failure, or validation notice.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] when no notice is showing.
    pub fn dismiss_notice(&mut self) -> Result<(), TransitionError> {
        self.transition(SubmissionEvent::NoticeDismissed)
    }

    /// Discard the draft and restore pristine values.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] while a submission is in flight.
    pub fn reset(&mut self) -> Result<(), TransitionError> {
        self.transition(SubmissionEvent::FormReset)?;
        self.drafts.clear();
        self.clear_form();
        debug!("form reset");
        Ok(())
    }

    /// Current field values.
    #[must_use]
    pub const fn values(&self) -> &FormValues {
        &self.values
    }

    /// Errors from the most recent validation pass.
    #[must_use]
    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Advisory shown next to the salary field, if any.
    #[must_use]
    pub const fn salary_warning(&self) -> Option<&'static str> {
        self.salary_warning
    }

    /// Current submission phase.
    #[must_use]
    pub const fn phase(&self) -> &SubmissionPhase {
        &self.phase
    }

    /// Whether the submit control should be enabled.
    #[must_use]
    pub const fn submit_enabled(&self) -> bool {
        self.phase.is_submit_enabled()
    }

    fn transition(&mut self, event: SubmissionEvent) -> Result<(), TransitionError> {
        let next = self.phase.advance(event)?;
        debug!(from = self.phase.name(), to = next.name(), "submission phase changed");
        self.phase = next;
        Ok(())
    }

    fn refresh_salary_warning(&mut self) {
        self.salary_warning = salary_warning(&self.values.salary_range);
    }

    fn clear_form(&mut self) {
        self.values = FormValues::default();
        self.errors = ValidationErrors::default();
        self.salary_warning = None;
    }
}

#[cfg(test)]
mod tests {
    //! Lifecycle coverage using mocked ports.
    use super::*;
    use crate::domain::LOW_SALARY_WARNING;
    use crate::domain::draft::DraftRecord;
    use crate::domain::ports::{
        FixtureDraftStorage, FixtureLoanApplicationGateway, LoanApplicationGatewayError,
        MockDraftStorage, MockLoanApplicationGateway, StorageKey,
    };
    use async_trait::async_trait;
    use chrono::Utc;
    use mockable::DefaultClock;
    use rstest::rstest;
    use uuid::Uuid;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn drafts<S: DraftStorage>(storage: S) -> DraftStore<S> {
        DraftStore::new(
            Arc::new(storage),
            StorageKey::default(),
            Arc::new(DefaultClock),
        )
    }

    fn session<S, G>(storage: S, gateway: G) -> LoanFormSession<S, G>
    where
        S: DraftStorage,
        G: LoanApplicationGateway,
    {
        LoanFormSession::new(drafts(storage), Arc::new(gateway), TIMEOUT)
    }

    fn fill_valid<S, G>(session: &mut LoanFormSession<S, G>)
    where
        S: DraftStorage,
        G: LoanApplicationGateway,
    {
        session.on_field_changed(FieldUpdate::Name("Anna Svensson".to_owned()));
        session.on_field_changed(FieldUpdate::Phone("0701234567".to_owned()));
        session.on_field_changed(FieldUpdate::Age("34".to_owned()));
    }

    fn stored(values: FormValues) -> String {
        DraftRecord {
            saved_at: Utc::now(),
            values,
        }
        .encode()
        .expect("encode")
    }

    fn ack() -> SubmissionAck {
        SubmissionAck {
            reference: Uuid::new_v4(),
            received_at: Utc::now(),
        }
    }

    #[rstest]
    fn init_restores_draft_and_advisory() {
        let draft = FormValues {
            name: "Anna".to_owned(),
            salary_range: "under-20000".to_owned(),
            ..FormValues::default()
        };
        let encoded = stored(draft.clone());
        let mut storage = MockDraftStorage::new();
        storage
            .expect_read()
            .times(1)
            .return_once(move |_| Ok(Some(encoded)));

        let mut session = session(storage, FixtureLoanApplicationGateway);
        session.on_init();

        assert_eq!(session.values(), &draft);
        assert_eq!(session.salary_warning(), Some(LOW_SALARY_WARNING));
    }

    #[rstest]
    fn every_change_saves_the_full_snapshot() {
        let mut storage = MockDraftStorage::new();
        storage
            .expect_write()
            .withf(|_, contents| {
                DraftRecord::decode(contents)
                    .is_ok_and(|record| record.values.comments == "hello")
            })
            .times(1)
            .return_const(Ok(()));

        let mut session = session(storage, FixtureLoanApplicationGateway);
        session.on_field_changed(FieldUpdate::Comments("hello".to_owned()));
    }

    #[rstest]
    fn salary_advisory_follows_the_selection() {
        let mut session = session(FixtureDraftStorage, FixtureLoanApplicationGateway);
        session.on_field_changed(FieldUpdate::SalaryRange("under-20000".to_owned()));
        assert_eq!(session.salary_warning(), Some(LOW_SALARY_WARNING));
        session.on_field_changed(FieldUpdate::SalaryRange("over-50000".to_owned()));
        assert_eq!(session.salary_warning(), None);
    }

    #[rstest]
    #[tokio::test]
    async fn invalid_form_never_reaches_the_gateway() {
        let mut storage = MockDraftStorage::new();
        storage.expect_write().return_const(Ok(()));
        storage.expect_remove().never();
        let mut gateway = MockLoanApplicationGateway::new();
        gateway.expect_submit().never();

        let mut session = session(storage, gateway);
        session.on_field_changed(FieldUpdate::Phone("0701234567".to_owned()));
        let rejection = session.submit().await.expect_err("invalid form");

        let SubmitRejection::Invalid(errors) = rejection else {
            panic!("expected validation errors, got {rejection:?}");
        };
        assert!(errors.contains(FieldName::Name));
        assert_eq!(session.errors(), &errors);
        assert_eq!(session.phase(), &SubmissionPhase::Idle);
        assert_eq!(session.values().phone, "0701234567");
    }

    #[rstest]
    fn resubmitting_replaces_the_previous_errors() {
        let mut session = session(FixtureDraftStorage, FixtureLoanApplicationGateway);
        session.on_field_changed(FieldUpdate::Age("34".to_owned()));
        assert!(session.begin_submission().is_err());
        assert!(session.errors().contains(FieldName::Name));
        assert!(session.errors().contains(FieldName::Phone));

        session.on_field_changed(FieldUpdate::Name("Anna Svensson".to_owned()));
        assert!(session.begin_submission().is_err());

        assert!(!session.errors().contains(FieldName::Name));
        assert!(session.errors().contains(FieldName::Phone));
        assert_eq!(session.errors().len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn success_clears_draft_and_values() {
        let mut storage = MockDraftStorage::new();
        storage.expect_write().return_const(Ok(()));
        storage.expect_remove().times(1).return_const(Ok(()));
        let expected = ack();
        let mut gateway = MockLoanApplicationGateway::new();
        let reply = expected.clone();
        gateway
            .expect_submit()
            .withf(|application| application.name == "Anna Svensson" && application.age == 34)
            .times(1)
            .return_once(move |_| Ok(reply));

        let mut session = session(storage, gateway);
        fill_valid(&mut session);
        let outcome = session.submit().await.expect("reaches gateway");

        assert_eq!(outcome, SubmitOutcome::Accepted(expected.clone()));
        assert_eq!(session.phase(), &SubmissionPhase::Success(expected));
        assert!(session.values().is_pristine());
        assert!(session.errors().is_empty());
        assert!(!session.submit_enabled());

        session.dismiss_notice().expect("dismiss success");
        assert_eq!(session.phase(), &SubmissionPhase::Idle);
    }

    #[rstest]
    #[tokio::test]
    async fn gateway_failure_keeps_the_draft() {
        let mut storage = MockDraftStorage::new();
        storage.expect_write().return_const(Ok(()));
        storage.expect_remove().never();
        let mut gateway = MockLoanApplicationGateway::new();
        gateway
            .expect_submit()
            .times(1)
            .return_once(|_| Err(LoanApplicationGatewayError::unavailable("offline")));

        let mut session = session(storage, gateway);
        fill_valid(&mut session);
        let outcome = session.submit().await.expect("reaches gateway");

        assert!(matches!(
            outcome,
            SubmitOutcome::Failed(SubmissionError::Gateway(_))
        ));
        assert!(matches!(session.phase(), SubmissionPhase::Failed(_)));
        assert_eq!(session.values().name, "Anna Svensson");
        assert!(session.submit_enabled());
    }

    struct StalledGateway;

    #[async_trait]
    impl LoanApplicationGateway for StalledGateway {
        async fn submit(
            &self,
            _application: &LoanApplication,
        ) -> Result<SubmissionAck, LoanApplicationGatewayError> {
            std::future::pending().await
        }
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn stalled_gateway_times_out() {
        let mut session = session(FixtureDraftStorage, StalledGateway);
        fill_valid(&mut session);
        let outcome = session.submit().await.expect("reaches gateway");

        assert_eq!(
            outcome,
            SubmitOutcome::Failed(SubmissionError::TimedOut { timeout_ms: 5_000 })
        );
        assert!(matches!(session.phase(), SubmissionPhase::Failed(_)));
    }

    #[rstest]
    fn split_submission_disables_submit_while_in_flight() {
        let mut session = session(FixtureDraftStorage, FixtureLoanApplicationGateway);
        fill_valid(&mut session);
        session.begin_submission().expect("valid form");

        assert_eq!(session.phase(), &SubmissionPhase::Submitting);
        assert!(!session.submit_enabled());
        assert_eq!(
            session.begin_submission(),
            Err(SubmitRejection::Disabled {
                phase: "submitting"
            })
        );
        assert!(session.reset().is_err());

        session
            .complete_submission(Ok(ack()))
            .expect("submission in flight");
        assert!(session.values().is_pristine());
    }

    #[rstest]
    fn completing_without_submission_is_rejected() {
        let mut session = session(FixtureDraftStorage, FixtureLoanApplicationGateway);
        assert!(session.complete_submission(Ok(ack())).is_err());
    }

    #[rstest]
    fn unload_skips_pristine_values() {
        let mut storage = MockDraftStorage::new();
        storage.expect_write().never();

        let session = session(storage, FixtureLoanApplicationGateway);
        session.on_unload();
        session.on_dispose();
    }

    #[rstest]
    fn dispose_flushes_edited_values() {
        let mut storage = MockDraftStorage::new();
        storage.expect_write().times(2).return_const(Ok(()));

        let mut session = session(storage, FixtureLoanApplicationGateway);
        session.on_field_changed(FieldUpdate::Name("Anna".to_owned()));
        session.on_dispose();
    }

    #[rstest]
    fn reset_clears_draft_and_advisory() {
        let mut storage = MockDraftStorage::new();
        storage.expect_write().return_const(Ok(()));
        storage.expect_remove().times(1).return_const(Ok(()));

        let mut session = session(storage, FixtureLoanApplicationGateway);
        session.on_field_changed(FieldUpdate::SalaryRange("under-20000".to_owned()));
        session.reset().expect("reset from idle");

        assert!(session.values().is_pristine());
        assert_eq!(session.salary_warning(), None);
    }
}
