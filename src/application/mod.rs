//! Application layer with use cases, services and DTOs.

/// Shared application context.
pub mod context;
/// Data transfer objects.
pub mod dto;
/// Application services.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use context::{AppContext, RenderConfig};
pub use dto::RenderOutcome;
pub use use_cases::{HandleMessageUseCase, RenderSubmissionUseCase};
