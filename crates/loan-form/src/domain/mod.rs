//! Loan form domain: values, rules, draft persistence, and submission.
//!
//! Purpose: keep every decision about the form (what is valid, what gets
//! stored, which phase follows which) independent of the UI shell and of the
//! adapters behind [`ports`].
//!
//! Public surface:
//! - `FormValues`, `FieldName`, `FieldUpdate`, `SalaryRange`: field state.
//! - `validate`, `ValidationErrors`, `Rule`: the validation table.
//! - `LoanApplication`: validated, typed application.
//! - `salary_warning`: the low-salary advisory.
//! - `DraftStore`, `DraftRecord`: versioned draft persistence.
//! - `SubmissionPhase`, `SubmissionEvent`: the submission phase machine.
//! - `LoanFormSession`: lifecycle owner tying the above together.

mod application;
mod draft;
mod form_session;
mod form_values;
pub mod ports;
mod salary_advisory;
mod submission;
mod validation;

pub use self::application::LoanApplication;
pub use self::draft::{
    DRAFT_FORMAT_VERSION, DraftDecodeError, DraftRecord, DraftStore, DraftStoreError,
};
pub use self::form_session::{LoanFormSession, SubmitOutcome, SubmitRejection};
pub use self::form_values::{
    FieldName, FieldUpdate, FieldUpdateError, FormValues, ParseFieldNameError,
    ParseSalaryRangeError, SalaryRange,
};
pub use self::salary_advisory::{LOW_SALARY_WARNING, salary_warning};
pub use self::submission::{SubmissionError, SubmissionEvent, SubmissionPhase, TransitionError};
pub use self::validation::{
    MAXIMUM_REPAYMENT_YEARS, MINIMUM_AGE, NumberWidth, RULES, Rule, ValidationErrors, validate,
};
