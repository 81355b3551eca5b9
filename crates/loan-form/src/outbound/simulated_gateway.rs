//! Gateway adapter that stands in for the lender's backend.
//!
//! It accepts every application after a fixed pause, which is enough to
//! exercise the `Submitting` phase end to end without a network.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use tracing::info;
use uuid::Uuid;

use crate::domain::LoanApplication;
use crate::domain::ports::{LoanApplicationGateway, LoanApplicationGatewayError, SubmissionAck};

/// Async sleeping abstraction so tests can skip the simulated latency.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspend execution for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Tokio-based sleeper implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Sleeper that returns at once.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateSleeper;

#[async_trait]
impl Sleeper for ImmediateSleeper {
    async fn sleep(&self, _duration: Duration) {}
}

/// Simulated [`LoanApplicationGateway`].
pub struct SimulatedLoanGateway<Z = TokioSleeper> {
    delay: Duration,
    sleeper: Z,
    clock: Arc<dyn Clock>,
}

impl SimulatedLoanGateway {
    /// Gateway that pauses for `delay` on the Tokio timer.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self::with_sleeper(delay, TokioSleeper, Arc::new(DefaultClock))
    }
}

impl<Z> SimulatedLoanGateway<Z>
where
    Z: Sleeper,
{
    /// Gateway using a custom sleeper and clock.
    #[must_use]
    pub const fn with_sleeper(delay: Duration, sleeper: Z, clock: Arc<dyn Clock>) -> Self {
        Self {
            delay,
            sleeper,
            clock,
        }
    }

    /// Configured latency.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl<Z> LoanApplicationGateway for SimulatedLoanGateway<Z>
where
    Z: Sleeper,
{
    async fn submit(
        &self,
        application: &LoanApplication,
    ) -> Result<SubmissionAck, LoanApplicationGatewayError> {
        self.sleeper.sleep(self.delay).await;
        let ack = SubmissionAck {
            reference: Uuid::new_v4(),
            received_at: self.clock.utc(),
        };
        info!(
            reference = %ack.reference,
            loan_amount = ?application.loan_amount,
            repayment_years = ?application.repayment_years,
            salary_range = ?application.salary_range,
            "simulated backend accepted loan application"
        );
        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FormValues;
    use chrono::{DateTime, Local, TimeZone, Utc};
    use rstest::rstest;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSleeper(Mutex<Vec<Duration>>);

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.0.lock().expect("sleeper lock").push(duration);
        }
    }

    struct FixtureClock;

    impl Clock for FixtureClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0)
                .single()
                .expect("valid fixture timestamp")
        }
    }

    fn application() -> LoanApplication {
        LoanApplication::try_from_values(&FormValues {
            name: "Anna Svensson".to_owned(),
            phone: "0701234567".to_owned(),
            age: "34".to_owned(),
            ..FormValues::default()
        })
        .expect("valid application")
    }

    #[rstest]
    #[tokio::test]
    async fn pauses_for_the_configured_delay_then_acknowledges() {
        let gateway = SimulatedLoanGateway::with_sleeper(
            Duration::from_millis(1_500),
            RecordingSleeper::default(),
            Arc::new(FixtureClock),
        );

        let ack = gateway.submit(&application()).await.expect("accepted");

        assert_eq!(ack.received_at, FixtureClock.utc());
        assert!(!ack.reference.is_nil());
        let slept = gateway.sleeper.0.lock().expect("sleeper lock").clone();
        assert_eq!(slept, vec![Duration::from_millis(1_500)]);
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn tokio_sleeper_honours_the_delay() {
        let gateway = SimulatedLoanGateway::new(Duration::from_secs(2));
        let started = tokio::time::Instant::now();

        gateway.submit(&application()).await.expect("accepted");

        assert!(started.elapsed() >= gateway.delay());
    }

    #[rstest]
    #[tokio::test]
    async fn each_submission_gets_a_fresh_reference() {
        let gateway = SimulatedLoanGateway::with_sleeper(
            Duration::ZERO,
            ImmediateSleeper,
            Arc::new(DefaultClock),
        );
        let first = gateway.submit(&application()).await.expect("accepted");
        let second = gateway.submit(&application()).await.expect("accepted");
        assert_ne!(first.reference, second.reference);
    }
}
