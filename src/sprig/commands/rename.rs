use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::PlantId;
use crate::store::{RecordStore, StorageBackend};
use crate::view::PlantView;
use chrono::NaiveDate;
use tracing::info;

pub fn run<B: StorageBackend>(
    store: &RecordStore<B>,
    id: PlantId,
    new_name: Option<&str>,
    today: NaiveDate,
) -> Result<CmdResult> {
    let Some(new_name) = new_name.map(str::trim).filter(|n| !n.is_empty()) else {
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::info("Name is empty, nothing changed"));
        return Ok(result);
    };

    let _lock = store.lock()?;
    let mut plants = store.load()?;

    let Some(record) = plants.get_mut(&id) else {
        return Ok(CmdResult::unknown_plant(id));
    };

    let old_name = std::mem::replace(&mut record.name, new_name.to_string());
    let view = PlantView::new(id, record, today);
    store.save(&plants)?;
    info!(plant = %id, from = %old_name, to = %new_name, "plant renamed");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Plant renamed ({}): {} -> {}",
        id, old_name, new_name
    )));
    result.affected_plants.push(view);
    Ok(result)
}
