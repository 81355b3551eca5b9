//! Domain ports: the edges through which the form reaches storage and the
//! lender's backend.
//!
//! Each trait exposes a typed error so adapters map their failures into
//! predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod draft_storage;
mod loan_application_gateway;
mod storage_key;

#[cfg(test)]
pub use draft_storage::MockDraftStorage;
pub use draft_storage::{DraftStorage, DraftStorageError, FixtureDraftStorage};
#[cfg(test)]
pub use loan_application_gateway::MockLoanApplicationGateway;
pub use loan_application_gateway::{
    FixtureLoanApplicationGateway, LoanApplicationGateway, LoanApplicationGatewayError,
    SubmissionAck,
};
pub use storage_key::{DEFAULT_STORAGE_KEY, StorageKey, StorageKeyValidationError};
