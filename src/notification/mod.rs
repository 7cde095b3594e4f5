//! Quiz result notifications.
//!
//! - `payload`: inbound body validation
//! - `format`: HTML message rendering
//! - `backend`: the messaging backend trait and wire types
//! - `telegram`: Telegram Bot API implementation
//! - `notifier`: the pipeline tying them together

mod backend;
mod format;
mod notifier;
mod payload;
mod telegram;

pub use backend::{DeliveryError, MessageBackend, OutboundMessage, ParseMode};
pub use format::{
    display_percent, escape_html, format_number, render_message, round_half_up, status_line,
    MESSAGE_TITLE, STATUS_PASSED, STATUS_RETRY,
};
pub use notifier::QuizNotifier;
pub use payload::{is_truthy, QuizResult};
pub use telegram::TelegramClient;
