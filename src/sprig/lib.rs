//! # Sprig Architecture
//!
//! Sprig keeps track of house plants: when each one was last watered, what it
//! looks like, and where its status page lives so a printed label can point
//! at it. It is a **UI-agnostic library** that happens to ship a CLI client.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, renders output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Parses ids, supplies today's date and configuration      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Business logic: lock, load, mutate, save                 │
//! │  - Operates on Rust types, returns CmdResult                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/) + Image Assets (images.rs)          │
//! │  - StorageBackend trait: FsBackend, MemBackend              │
//! │  - Photos as plain files under the static root              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr, never exits the
//! process and never reads the clock on its own. The same core can sit behind
//! a web front end as easily as behind the CLI.
//!
//! ## Testing Strategy
//!
//! 1. **Commands**: thorough unit tests over [`store::InMemoryStore`].
//! 2. **API**: dispatch and id parsing.
//! 3. **CLI**: end-to-end runs of the binary in `tests/`.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`store`]: Storage abstraction, locking and corrupt-file policy
//! - [`model`]: `PlantId`, `PlantRecord`, `Collection`
//! - [`view`]: Derived display fields (days since watering)
//! - [`images`]: Upload validation, naming and cleanup
//! - [`optimizer`]: Optional remote image compression
//! - [`labels`]: Printable label sheets
//! - [`config`]: Configuration management
//! - [`error`]: Error types
//! - `cli`: Argument parsing and templated rendering for the binary (not part of the lib API)

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod images;
pub mod labels;
pub mod model;
pub mod optimizer;
pub mod store;
pub mod view;
