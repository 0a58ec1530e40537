//! # Rendering Module
//!
//! Turns `CmdResult` contents into terminal text through outstanding's
//! templates and the `style` filter backed by [`BOOKSHELF_THEME`].
//!
//! Layout (column widths, truncation, alignment) stays in Rust because CJK
//! titles are two cells wide per character and need `unicode-width`. The
//! templates only choose styles and join cells.

use super::styles::{names, BOOKSHELF_THEME};
use super::templates::{CONFIG_TEMPLATE, LIST_TEMPLATE, MESSAGES_TEMPLATE};
use bookshelf::commands::sort::SortState;
use bookshelf::commands::{CmdMessage, MessageLevel};
use bookshelf::dates;
use bookshelf::model::{BookField, BookRecord};
use console::Term;
use outstanding::{render_with_color, truncate_to_width, ThemeChoice};
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

const GAP: &str = "  ";

struct Column {
    label: &'static str,
    field: Option<BookField>,
    max_width: usize,
    align_right: bool,
    style: &'static str,
}

#[rustfmt::skip]
const COLUMNS: [Column; 9] = [
    Column { label: "ID", field: None, max_width: 8, align_right: true, style: names::ID },
    Column { label: "Title", field: Some(BookField::Title), max_width: 30, align_right: false, style: names::TITLE },
    Column { label: "Author", field: Some(BookField::Author), max_width: 16, align_right: false, style: names::TEXT },
    Column { label: "Publisher", field: Some(BookField::Publisher), max_width: 16, align_right: false, style: names::TEXT },
    Column { label: "Shelf", field: Some(BookField::Shelf), max_width: 8, align_right: false, style: names::TEXT },
    Column { label: "Published", field: Some(BookField::PublishedDate), max_width: 9, align_right: false, style: names::DATE },
    Column { label: "ISBN", field: Some(BookField::Isbn), max_width: 13, align_right: false, style: names::TEXT },
    Column { label: "Pages", field: Some(BookField::Pages), max_width: 7, align_right: true, style: names::NUMBER },
    Column { label: "Added", field: Some(BookField::AddedAt), max_width: 10, align_right: false, style: names::DATE },
];

#[derive(Serialize)]
struct Cell {
    text: String,
    style: &'static str,
}

#[derive(Serialize)]
struct ListData {
    empty: bool,
    empty_message: &'static str,
    header: Vec<Cell>,
    rows: Vec<Vec<Cell>>,
    footer: String,
    gap: &'static str,
}

#[derive(Serialize)]
struct MessageData {
    content: String,
    style: &'static str,
}

#[derive(Serialize)]
struct MessagesData {
    messages: Vec<MessageData>,
}

#[derive(Serialize)]
struct ConfigEntry {
    key: &'static str,
    value: String,
}

#[derive(Serialize)]
struct ConfigData {
    entries: Vec<ConfigEntry>,
}

fn render_template<T: Serialize>(template: &str, data: &T, use_color: bool) -> String {
    render_with_color(template, data, ThemeChoice::from(&*BOOKSHELF_THEME), use_color)
        .unwrap_or_else(|e| format!("Render error: {}\n", e))
}

fn stdout_supports_color() -> bool {
    Term::stdout().features().colors_supported()
}

/// Display text for one cell. Dates go through the display helpers; stored
/// values are never changed.
fn cell_text(book: &BookRecord, column: &Column) -> String {
    match column.field {
        None => book.id.to_string(),
        Some(BookField::Pages) => book.pages.map(|p| p.to_string()).unwrap_or_default(),
        Some(BookField::PublishedDate) => {
            let normalized = dates::normalize_month_format(&book.published_date);
            if normalized.is_empty() && book.published_year().is_some() {
                book.published_date.trim().to_string()
            } else {
                normalized
            }
        }
        Some(BookField::AddedAt) => dates::sanitize_date(&book.added_at).to_string(),
        Some(field) => book.text(field).unwrap_or_default().to_string(),
    }
}

fn header_text(column: &Column, sort: &SortState) -> String {
    match column.field {
        Some(field) => format!("{} {}", column.label, sort.indicator(field)),
        None => column.label.to_string(),
    }
}

/// Renders the book table for `books`, noting how many of `total` are shown.
pub fn render_book_table(books: &[BookRecord], sort: &SortState, total: usize) -> String {
    render_book_table_with_color(books, sort, total, stdout_supports_color())
}

pub fn render_book_table_with_color(
    books: &[BookRecord],
    sort: &SortState,
    total: usize,
    use_color: bool,
) -> String {
    let headers: Vec<String> = COLUMNS.iter().map(|c| header_text(c, sort)).collect();
    let texts: Vec<Vec<String>> = books
        .iter()
        .map(|book| {
            COLUMNS
                .iter()
                .map(|c| truncate_to_width(&cell_text(book, c), c.max_width))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = COLUMNS
        .iter()
        .enumerate()
        .map(|(i, _)| {
            texts
                .iter()
                .map(|row| row[i].width())
                .chain(std::iter::once(headers[i].width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let last = COLUMNS.len() - 1;
    let header = headers
        .iter()
        .enumerate()
        .map(|(i, text)| Cell {
            text: pad(text, widths[i], COLUMNS[i].align_right, i == last),
            style: names::HEADER,
        })
        .collect();

    let rows = texts
        .into_iter()
        .map(|row| {
            row.into_iter()
                .enumerate()
                .map(|(i, text)| Cell {
                    text: pad(&text, widths[i], COLUMNS[i].align_right, i == last),
                    style: COLUMNS[i].style,
                })
                .collect()
        })
        .collect();

    let data = ListData {
        empty: books.is_empty(),
        empty_message: "No books found.",
        header,
        rows,
        footer: format!("{} of {} books", books.len(), total),
        gap: GAP,
    };

    render_template(LIST_TEMPLATE, &data, use_color)
}

pub fn render_messages(messages: &[CmdMessage]) -> String {
    render_messages_with_color(messages, stdout_supports_color())
}

pub fn render_messages_with_color(messages: &[CmdMessage], use_color: bool) -> String {
    let data = MessagesData {
        messages: messages
            .iter()
            .map(|m| MessageData {
                content: m.content.clone(),
                style: match m.level {
                    MessageLevel::Info => names::INFO,
                    MessageLevel::Success => names::SUCCESS,
                    MessageLevel::Warning => names::WARNING,
                    MessageLevel::Error => names::ERROR,
                },
            })
            .collect(),
    };
    render_template(MESSAGES_TEMPLATE, &data, use_color)
}

pub fn print_messages(messages: &[CmdMessage]) {
    print!("{}", render_messages(messages));
}

pub fn render_config(entries: Vec<(&'static str, String)>) -> String {
    let data = ConfigData {
        entries: entries
            .into_iter()
            .map(|(key, value)| ConfigEntry { key, value })
            .collect(),
    };
    render_template(CONFIG_TEMPLATE, &data, stdout_supports_color())
}

fn pad(text: &str, width: usize, align_right: bool, is_last: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(text.width()));
    if align_right {
        format!("{}{}", fill, text)
    } else if is_last {
        text.to_string()
    } else {
        format!("{}{}", text, fill)
    }
}
