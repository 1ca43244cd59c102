// autogest-domain library entry point
pub mod error;
pub mod priority;
pub mod record;
pub mod request;
pub use error::DomainError;
pub use priority::Priority;
pub use record::{HistorySummary, NewRecord, Record, CREATED_AT_FORMAT};
pub use request::{SubmitRequest, DOCUMENT_TYPES, ESTIMATED_DAYS_RANGE, PRIOR_ERRORS_RANGE};
