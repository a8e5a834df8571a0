//! Named styles for terminal output.
//!
//! Templates refer to styles by semantic name (`{{ name | style("plant-name") }}`)
//! and never by color, so the look can change here without touching a
//! template. Unknown names render with a `(!?)` marker to make template typos
//! visible.

use console::Style;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Style identifiers shared between templates and renderers.
pub mod names {
    pub const MUTED: &str = "muted";
    pub const TITLE: &str = "title";
    pub const ERROR: &str = "error";
    pub const WARNING: &str = "warning";
    pub const SUCCESS: &str = "success";
    pub const INFO: &str = "info";
    pub const PLANT_ID: &str = "plant-id";
    pub const PLANT_NAME: &str = "plant-name";
    pub const WATERED: &str = "watered";
    pub const NEVER_WATERED: &str = "never-watered";
    pub const URL: &str = "url";
    pub const KEY: &str = "key";
}

const MISSING_STYLE_INDICATOR: &str = "(!?)";

pub struct Theme {
    styles: HashMap<&'static str, Style>,
}

impl Theme {
    fn new() -> Self {
        Self {
            styles: HashMap::new(),
        }
    }

    fn add(mut self, name: &'static str, style: Style) -> Self {
        self.styles.insert(name, style);
        self
    }

    /// Apply a named style. With `use_color` off the text is returned as is.
    pub fn apply(&self, name: &str, text: &str, use_color: bool) -> String {
        match self.styles.get(name) {
            Some(style) if use_color => style.apply_to(text).force_styling(true).to_string(),
            Some(_) => text.to_string(),
            None => format!("{} {}", MISSING_STYLE_INDICATOR, text),
        }
    }
}

pub static SPRIG_THEME: Lazy<Theme> = Lazy::new(|| {
    let muted = Style::new().color256(246);
    Theme::new()
        .add(names::MUTED, muted.clone())
        .add(names::TITLE, Style::new().bold())
        .add(names::ERROR, Style::new().red().bold())
        .add(names::WARNING, Style::new().yellow())
        .add(names::SUCCESS, Style::new().green())
        .add(names::INFO, muted.clone())
        .add(names::PLANT_ID, Style::new().yellow())
        .add(names::PLANT_NAME, Style::new().bold())
        .add(names::WATERED, Style::new().cyan().italic())
        .add(names::NEVER_WATERED, muted.italic())
        .add(names::URL, Style::new().blue().underlined())
        .add(names::KEY, Style::new().cyan())
});
