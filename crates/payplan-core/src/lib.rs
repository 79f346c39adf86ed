pub mod calendar;
pub mod error;
pub mod projection;
pub mod schedule;
pub mod terms;
pub mod types;

#[cfg(feature = "timeline")]
pub mod timeline;

pub use error::PayplanError;
pub use projection::{project, ProjectionResult, ProjectionSummary};
pub use schedule::{Installment, InstallmentKind, Party};
pub use terms::{ContractTerms, ContractTermsBuilder, ContractTermsInput};
pub use types::*;

/// Standard result type for all payplan operations
pub type PayplanResult<T> = Result<T, PayplanError>;
