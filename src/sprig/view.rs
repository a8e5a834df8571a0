//! Display-time fields computed from stored records.
//!
//! Nothing here is persisted. "Today" moves, so views are rebuilt on every
//! read instead of being cached alongside the data.

use crate::model::{Collection, PlantId, PlantRecord};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A plant record plus the values derived from it for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlantView {
    pub id: PlantId,
    pub name: String,
    pub last_watered: Option<String>,
    pub image_path: String,
    /// Whole days since `last_watered`. Negative for future dates, absent
    /// when the plant was never watered or the stored date is unreadable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watered_ago: Option<i64>,
}

impl PlantView {
    pub fn new(id: PlantId, record: &PlantRecord, today: NaiveDate) -> Self {
        Self {
            id,
            name: record.name.clone(),
            last_watered: record.last_watered.clone(),
            image_path: record.image_path.clone(),
            watered_ago: record
                .last_watered
                .as_deref()
                .and_then(|raw| days_since(id, raw, today)),
        }
    }
}

/// Annotate every record in `plants` with its derived fields, in id order.
pub fn annotate(plants: &Collection, today: NaiveDate) -> Vec<PlantView> {
    plants
        .iter()
        .map(|(id, record)| PlantView::new(*id, record, today))
        .collect()
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn days_since(id: PlantId, raw: &str, today: NaiveDate) -> Option<i64> {
    match parse_date(raw) {
        Some(date) => Some((today - date).num_days()),
        None => {
            warn!(plant = %id, last_watered = raw, "unreadable watering date");
            None
        }
    }
}
