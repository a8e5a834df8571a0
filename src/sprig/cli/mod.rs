//! # CLI Behavior
//!
//! The CLI is the only place that knows about terminal I/O, exit codes and
//! output formatting. For the overall architecture, see the crate-level
//! documentation of the `sprig` library.
//!
//! ## Naked Execution
//!
//! `sprig` with no arguments is `sprig list`: checking which plants need water
//! is what the tool is run for most of the time.
//!
//! ## Ids
//!
//! Commands take plant ids as typed. An id that does not exist, or that is not
//! a number at all, is reported and changes nothing; the exit code stays 0.
//!
//! ## Output
//!
//! - Text (default): rendered through templates, colored when the terminal
//!   supports it and `--no-color` is not given.
//! - `--output json`: the command's structured result, for scripts.
//!
//! Diagnostics go to stderr through `tracing`, filtered by `SPRIG_LOG`
//! (`-v` forces debug).
//!
//! ## Module Structure
//!
//! - `commands`: Per-command handlers that call the API and print output
//! - `render`: Output formatting (layout, days-ago text, messages)
//! - `setup`: Argument parsing via clap
//! - `styles`: Terminal styling
//! - `templates`: Output templates

mod commands;
mod render;
pub mod setup;
mod styles;
mod templates;

pub use commands::run;
