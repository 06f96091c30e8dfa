//! Ember - a Discord bot that unfolds pasted Reddit links.
//!
//! Posts a summary card for every Reddit link it sees, uploads the post's media,
//! optionally appends the top of the comment thread and hides Discord's own preview.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing use cases and DTOs.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;
/// Presentation layer driving the bot from gateway events.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "ember";
