//! Output templates, kept in `templates/` and embedded at compile time.
//!
//! Templates render with minijinja's default whitespace handling, so every
//! line break is explicit (`{{ "\n" }}`) and block tags strip the whitespace
//! around them. Column widths and truncation are computed in `render.rs`; the
//! templates only pick styles and lay out rows.

pub const LIST_TEMPLATE: &str = include_str!("templates/list.tmp");
pub const MESSAGES_TEMPLATE: &str = include_str!("templates/messages.tmp");
pub const CONFIG_TEMPLATE: &str = include_str!("templates/config.tmp");
