//! Named console styles for the `style` template filter.
//!
//! Templates refer to styles by name only; the names below are the whole
//! vocabulary. A name missing from the theme renders with outstanding's
//! `(!?)` marker, which the tests below rely on to catch template typos.

use console::Style;
use once_cell::sync::Lazy;
use outstanding::Theme;

pub mod names {
    pub const HEADER: &str = "header";
    pub const ID: &str = "id";
    pub const TITLE: &str = "title";
    pub const TEXT: &str = "text";
    pub const NUMBER: &str = "number";
    pub const DATE: &str = "date";
    pub const MUTED: &str = "muted";
    pub const KEY: &str = "key";
    pub const INFO: &str = "info";
    pub const SUCCESS: &str = "success";
    pub const WARNING: &str = "warning";
    pub const ERROR: &str = "error";
}

pub static BOOKSHELF_THEME: Lazy<Theme> = Lazy::new(|| {
    Theme::new()
        .add(names::HEADER, Style::new().bold().underlined())
        .add(names::ID, Style::new().dim())
        .add(names::TITLE, Style::new().bold())
        .add(names::TEXT, Style::new())
        .add(names::NUMBER, Style::new().cyan())
        .add(names::DATE, Style::new().color256(110))
        .add(names::MUTED, Style::new().color256(246).italic())
        .add(names::KEY, Style::new().cyan())
        .add(names::INFO, Style::new().dim())
        .add(names::SUCCESS, Style::new().green())
        .add(names::WARNING, Style::new().yellow())
        .add(names::ERROR, Style::new().red().bold())
});
