//! # Bookshelf Architecture
//!
//! Bookshelf is a **client library for a personal book catalog** kept on a small
//! JSON server. It loads the whole catalog, lets you narrow and order it locally,
//! edit or delete records in an explicit edit mode, save the result back, and
//! register new books by ISBN or by hand. The `bookshelf` binary is one client
//! of this library, not the library itself.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, renders tables and messages            │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Owns store, filter criteria, sort state, edit session    │
//! │  - Dispatches to commands, returns Result<CmdResult>        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Filter, sort, edit, save, load, register, config         │
//! │  - Pure logic over Rust types                               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Backend Layer (backend/)                                   │
//! │  - Backend trait                                            │
//! │  - HttpBackend (production), InMemoryBackend (testing)      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr, never exits the
//! process and never assumes a terminal. Diagnostics go through `tracing`; the
//! binary decides where they end up (see [`logging`]).
//!
//! ## Client-Side State
//!
//! The server is the source of truth. Between a load and a save the
//! [`store::RecordStore`] is the working copy; the visible list is always
//! recomputed from it as `sort(filter(store))` and never stored.
//!
//! ## Testing Strategy
//!
//! 1. **Commands**: unit tests next to each module, against fixtures from
//!    `backend::memory::fixtures`.
//! 2. **API**: dispatch and state-machine tests over `InMemoryBackend`.
//! 3. **Integration** (`tests/`): end-to-end sessions, `HttpBackend` against a
//!    local canned server, and the binary via `assert_cmd`.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: Business logic for each operation
//! - [`backend`]: Server boundary and implementations
//! - [`store`]: In-memory working copy of the catalog
//! - [`session`]: Viewing/Editing state machine
//! - [`model`]: `BookRecord`, `BookId`, `BookField`
//! - [`dates`]: Date display and parsing helpers
//! - [`config`]: Configuration management
//! - [`init`]: Context wiring for clients
//! - [`logging`]: Subscriber setup
//! - [`error`]: Error types

pub mod api;
pub mod backend;
pub mod commands;
pub mod config;
pub mod dates;
pub mod error;
pub mod init;
pub mod logging;
pub mod model;
pub mod session;
pub mod store;
