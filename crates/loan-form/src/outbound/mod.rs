//! Outbound adapters implementing the domain ports.

mod file_storage;
mod memory_storage;
mod simulated_gateway;
#[cfg(feature = "web-storage")]
mod web_storage;

pub use file_storage::FileDraftStorage;
pub use memory_storage::MemoryDraftStorage;
pub use simulated_gateway::{ImmediateSleeper, SimulatedLoanGateway, Sleeper, TokioSleeper};
#[cfg(feature = "web-storage")]
pub use web_storage::WebDraftStorage;
