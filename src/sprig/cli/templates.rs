//! Output templates.
//!
//! Templates live in stand-alone `.tmp` files so they are easy to edit and
//! diff, and are compiled in as string constants. They are minijinja
//! templates: layout math (widths, truncation, padding) is done in Rust
//! before rendering, the templates only pick styles and structure.
//!
//! Line breaks are explicit: loop and conditional tags use `-%}` so the only
//! newlines in the output are the ones written at the end of a content line.

pub const LIST_TEMPLATE: &str = include_str!("templates/list.tmp");
pub const PLANT_TEMPLATE: &str = include_str!("templates/plant.tmp");
pub const LABELS_TEMPLATE: &str = include_str!("templates/labels.tmp");
pub const KEY_VALUE_TEMPLATE: &str = include_str!("templates/key_value.tmp");
pub const MESSAGES_TEMPLATE: &str = include_str!("templates/messages.tmp");
