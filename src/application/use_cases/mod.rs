//! Application use cases.

mod handle_message_use_case;
mod render_submission_use_case;

pub use handle_message_use_case::{HandleMessageUseCase, MessageRoute};
pub use render_submission_use_case::{DEFAULT_CARD_COLOR, RenderSubmissionUseCase};
