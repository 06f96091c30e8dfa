//! Domain layer with core business entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;
/// Serde utilities.
pub mod serde_utils;
/// Domain services.
pub mod services;

pub use entities::{Submission, SubmissionId};
pub use errors::{ContentError, ContentErrorKind};
pub use ports::{ChatPort, ContentPort, SettingsPort, WebPort};
