//! Domain error types.

mod chat_error;
mod content_error;
mod store_error;
mod web_error;

pub use chat_error::ChatError;
pub use content_error::{ContentError, ContentErrorKind};
pub use store_error::StoreError;
pub use web_error::WebError;
