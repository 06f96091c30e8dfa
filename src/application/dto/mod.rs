//! Data transfer objects for the application layer.

mod command;
mod outcome;
mod trigger;

pub use command::BotCommand;
pub use outcome::{AttachmentDispatch, PreviewAction, RenderOutcome, RenderReport, SummaryReport};
pub use trigger::SubmissionTrigger;
