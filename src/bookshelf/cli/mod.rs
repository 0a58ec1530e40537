//! # CLI Behavior
//!
//! One client of the bookshelf library. The only place that knows about
//! terminal I/O, exit codes and output formatting.
//!
//! ## Naked Execution (`bookshelf`)
//!
//! Running `bookshelf` with no arguments is `bookshelf list`: load everything,
//! show everything.
//!
//! ## Filtering and Sorting
//!
//! Filter flags map one-to-one onto the filter criteria. `--sort FIELD` behaves
//! like clicking a column header, so it may be repeated: `--sort pages` sorts
//! ascending, `--sort pages --sort pages` descending.
//!
//! ## Editing
//!
//! `bookshelf edit` performs a whole edit session in one run: load, enter edit
//! mode, apply every `--set` then every `--delete`, save. A rejected save exits
//! non-zero with the server's message. When the load fails nothing is saved,
//! since saving an empty working copy would wipe the catalog.
//!
//! ## Module Structure
//!
//! - `commands`: Per-command handlers that call the API and print results
//! - `render`: Output formatting (tables, messages, config)
//! - `setup`: Argument parsing via clap, help text
//! - `styles`: Terminal styling
//! - `templates`: Output templates

mod commands;
mod render;
pub mod setup;
mod styles;
mod templates;

pub use commands::run;
