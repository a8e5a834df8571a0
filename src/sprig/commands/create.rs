use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{next_id, PlantRecord};
use crate::store::{RecordStore, StorageBackend};
use crate::view::PlantView;
use chrono::NaiveDate;
use tracing::info;

pub fn run<B: StorageBackend>(
    store: &RecordStore<B>,
    name: Option<String>,
    today: NaiveDate,
) -> Result<CmdResult> {
    let _lock = store.lock()?;
    let mut plants = store.load()?;

    let id = next_id(&plants)?;
    let record = PlantRecord::new(id, name);
    plants.insert(id, record.clone());
    store.save(&plants)?;
    info!(plant = %id, name = %record.name, "plant created");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Plant created ({}): {}",
        id, record.name
    )));
    result.affected_plants.push(PlantView::new(id, &record, today));
    Ok(result)
}
