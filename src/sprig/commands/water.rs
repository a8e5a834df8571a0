use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::PlantId;
use crate::store::{RecordStore, StorageBackend};
use crate::view::{format_date, PlantView};
use chrono::NaiveDate;
use tracing::info;

/// Record a watering on `when`, or on `today` when no date is given.
pub fn run<B: StorageBackend>(
    store: &RecordStore<B>,
    id: PlantId,
    when: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<CmdResult> {
    let _lock = store.lock()?;
    let mut plants = store.load()?;

    let Some(record) = plants.get_mut(&id) else {
        return Ok(CmdResult::unknown_plant(id));
    };

    let date = format_date(when.unwrap_or(today));
    record.last_watered = Some(date.clone());
    let view = PlantView::new(id, record, today);
    store.save(&plants)?;
    info!(plant = %id, date = %date, "plant watered");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Watered ({}): {} on {}",
        id, view.name, date
    )));
    result.affected_plants.push(view);
    Ok(result)
}
