//! # Rendering Module
//!
//! Turns a `CmdResult` into terminal text through the templates in
//! `templates/` and the named styles in `styles.rs`.
//!
//! Layout calculations (width, truncation, padding) stay in Rust because they
//! need Unicode-aware measuring. Templates handle presentation: which style
//! goes where and how sections are laid out.

use super::styles::{names, SPRIG_THEME};
use super::templates::{
    KEY_VALUE_TEMPLATE, LABELS_TEMPLATE, LIST_TEMPLATE, MESSAGES_TEMPLATE, PLANT_TEMPLATE,
};
use minijinja::{Environment, Value};
use serde::Serialize;
use sprig::api::{CmdMessage, MessageLevel, NamedPath, Setting};
use sprig::labels::LabelSheet;
use sprig::view::PlantView;
use std::time::Duration;
use timeago::TimeUnit;
use unicode_width::UnicodeWidthStr;

pub const LINE_WIDTH: usize = 80;
pub const WATERED_WIDTH: usize = 14;
const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

#[derive(Serialize)]
struct PlantLine {
    id: String,
    name: String,
    padding: String,
    watered: String,
    watered_style: &'static str,
}

#[derive(Serialize)]
struct ListData {
    plants: Vec<PlantLine>,
    empty: bool,
}

#[derive(Serialize)]
struct PlantDetail {
    id: String,
    name: String,
    last_watered: String,
    watered: String,
    watered_style: &'static str,
    image_path: String,
}

#[derive(Serialize)]
struct PlantData {
    plants: Vec<PlantDetail>,
}

#[derive(Serialize)]
struct LabelLine {
    position: String,
    id: String,
    name: String,
    padding: String,
    url: String,
}

#[derive(Serialize)]
struct LabelPageData {
    number: usize,
    labels: Vec<LabelLine>,
}

#[derive(Serialize)]
struct LabelsData {
    pages: Vec<LabelPageData>,
    page_count: usize,
    columns: usize,
    rows: usize,
}

#[derive(Serialize)]
struct KeyValueRow {
    key: String,
    padding: String,
    value: String,
}

#[derive(Serialize)]
struct KeyValueData {
    rows: Vec<KeyValueRow>,
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

/// Renders templates with the sprig theme, with or without ANSI styling.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    use_color: bool,
}

impl Renderer {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    /// Color unless disabled by flag or unsupported by the terminal.
    pub fn detect(no_color: bool) -> Self {
        Self::new(!no_color && console::colors_enabled())
    }

    fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<String, minijinja::Error> {
        let mut env = Environment::new();
        let use_color = self.use_color;
        env.add_filter("style", move |value: Value, name: String| -> String {
            SPRIG_THEME.apply(&name, &value.to_string(), use_color)
        });
        env.render_str(template, data)
    }

    pub fn plant_list(&self, plants: &[PlantView]) -> String {
        let id_width = plants
            .iter()
            .map(|p| p.id.to_string().len())
            .max()
            .unwrap_or(1);
        let available = LINE_WIDTH.saturating_sub(id_width + 2 + WATERED_WIDTH + 2);

        let lines = plants
            .iter()
            .map(|p| {
                let name = truncate_to_width(&p.name, available);
                let (watered, watered_style) = watered_text(p.watered_ago);
                PlantLine {
                    id: format!("{:>width$}", p.id.to_string(), width = id_width),
                    padding: " ".repeat(available.saturating_sub(name.width()) + 2),
                    name,
                    watered: format!("{:>width$}", watered, width = WATERED_WIDTH),
                    watered_style,
                }
            })
            .collect();

        let data = ListData {
            plants: lines,
            empty: plants.is_empty(),
        };
        self.render(LIST_TEMPLATE, &data)
            .unwrap_or_else(|e| format!("Render error: {}\n", e))
    }

    pub fn plant_details(&self, plants: &[PlantView]) -> String {
        let details = plants
            .iter()
            .map(|p| {
                let (watered, watered_style) = watered_text(p.watered_ago);
                let (last_watered, watered) = match &p.last_watered {
                    Some(date) if p.watered_ago.is_some() => (date.clone(), watered),
                    Some(date) => (date.clone(), String::new()),
                    None => (watered, String::new()),
                };
                PlantDetail {
                    id: p.id.to_string(),
                    name: p.name.clone(),
                    last_watered,
                    watered,
                    watered_style,
                    image_path: p.image_path.clone(),
                }
            })
            .collect();

        self.render(PLANT_TEMPLATE, &PlantData { plants: details })
            .unwrap_or_else(|e| format!("Render error: {}\n", e))
    }

    pub fn label_sheet(&self, sheet: &LabelSheet) -> String {
        let name_width = sheet
            .pages
            .iter()
            .flat_map(|p| p.rows.iter().flatten())
            .map(|l| l.name.width())
            .max()
            .unwrap_or(0)
            .min(LINE_WIDTH / 3);

        let pages = sheet
            .pages
            .iter()
            .map(|page| LabelPageData {
                number: page.number,
                labels: page
                    .rows
                    .iter()
                    .enumerate()
                    .flat_map(|(r, row)| {
                        row.iter().enumerate().map(move |(c, label)| {
                            let name = truncate_to_width(&label.name, name_width);
                            LabelLine {
                                position: format!("r{}c{}", r + 1, c + 1),
                                id: format!("#{}", label.id),
                                padding: " ".repeat(name_width.saturating_sub(name.width()) + 2),
                                name,
                                url: label.url.clone(),
                            }
                        })
                    })
                    .collect(),
            })
            .collect();

        let data = LabelsData {
            pages,
            page_count: sheet.pages.len(),
            columns: sheet.columns,
            rows: sheet.rows,
        };
        self.render(LABELS_TEMPLATE, &data)
            .unwrap_or_else(|e| format!("Render error: {}\n", e))
    }

    pub fn settings(&self, settings: &[Setting]) -> String {
        self.key_values(settings.iter().map(|s| (s.key.clone(), s.value.clone())))
    }

    pub fn paths(&self, paths: &[NamedPath]) -> String {
        self.key_values(
            paths
                .iter()
                .map(|p| (p.name.clone(), p.path.display().to_string())),
        )
    }

    fn key_values(&self, pairs: impl Iterator<Item = (String, String)>) -> String {
        let pairs: Vec<_> = pairs.collect();
        let key_width = pairs.iter().map(|(k, _)| k.width()).max().unwrap_or(0);
        let rows = pairs
            .into_iter()
            .map(|(key, value)| KeyValueRow {
                padding: " ".repeat(key_width - key.width()),
                key,
                value,
            })
            .collect();
        self.render(KEY_VALUE_TEMPLATE, &KeyValueData { rows })
            .unwrap_or_else(|e| format!("Render error: {}\n", e))
    }

    pub fn messages(&self, messages: &[CmdMessage]) -> String {
        if messages.is_empty() {
            return String::new();
        }

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

        self.render(MESSAGES_TEMPLATE, &data).unwrap_or_else(|_| {
            messages
                .iter()
                .map(|m| format!("{}\n", m.content))
                .collect()
        })
    }
}

/// Human text for "days since last watering" plus the style to show it in.
fn watered_text(days: Option<i64>) -> (String, &'static str) {
    match days {
        None => ("never".to_string(), names::NEVER_WATERED),
        Some(0) => ("today".to_string(), names::WATERED),
        Some(1) => ("yesterday".to_string(), names::WATERED),
        Some(n) if n < 0 => (format!("in {} days", -n), names::WARNING),
        Some(n) => {
            let mut formatter = timeago::Formatter::new();
            formatter.min_unit(TimeUnit::Days).max_unit(TimeUnit::Days);
            let elapsed = Duration::from_secs(n.unsigned_abs() * SECONDS_PER_DAY);
            (formatter.convert(elapsed), names::WATERED)
        }
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}
