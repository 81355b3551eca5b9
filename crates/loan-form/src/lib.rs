//! Core of a loan application form: validation, draft persistence, and the
//! submission flow.
//!
//! The crate is UI-agnostic. A shell (the bundled terminal shell, a browser
//! front end, or a test) owns a [`domain::LoanFormSession`], forwards field
//! edits and lifecycle events to it, and renders what it exposes. Storage and
//! the lender's backend sit behind the ports in [`domain::ports`], with
//! adapters in [`outbound`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use loan_form::domain::ports::{FixtureLoanApplicationGateway, StorageKey};
//! use loan_form::domain::{DraftStore, FieldUpdate, LoanFormSession};
//! use loan_form::outbound::MemoryDraftStorage;
//! use mockable::DefaultClock;
//!
//! let storage = Arc::new(MemoryDraftStorage::new());
//! let drafts = DraftStore::new(Arc::clone(&storage), StorageKey::default(), Arc::new(DefaultClock));
//! let mut session = LoanFormSession::new(
//!     drafts,
//!     Arc::new(FixtureLoanApplicationGateway),
//!     Duration::from_secs(10),
//! );
//!
//! session.on_init();
//! session.on_field_changed(FieldUpdate::SalaryRange("under-20000".to_owned()));
//!
//! assert!(session.salary_warning().is_some());
//! assert!(storage.contains(&StorageKey::default()).expect("lock"));
//! ```

pub mod domain;
pub mod outbound;
pub mod settings;
pub mod shell;

pub use settings::LoanFormSettings;
