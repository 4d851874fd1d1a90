//! Plain-text renderings of a settlement.
//!
//! - `chat` - Per-participant breakdown ready to paste into a group chat
//! - `summary` - One line per participant with owed, paid and net amounts
//!
//! Both return lines joined with `\n`; amounts go through
//! [`dutch_shared::format_amount`].

pub mod chat;
pub mod summary;

pub use chat::render_chat_block;
pub use summary::render_summary;
