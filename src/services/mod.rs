//! Services: message admission, reply rendering, slash-command parsing.

mod reply;
mod util;

pub use reply::{prepare_message, reply_text, CONNECTION_ERROR_TEXT};
pub use util::parse_local_command;
