use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::PlantId;
use crate::store::{RecordStore, StorageBackend};
use crate::view::PlantView;
use chrono::NaiveDate;

/// A single plant with its derived fields, as shown on its status page.
pub fn run<B: StorageBackend>(
    store: &RecordStore<B>,
    id: PlantId,
    today: NaiveDate,
) -> Result<CmdResult> {
    let plants = store.load()?;
    match plants.get(&id) {
        Some(record) => {
            Ok(CmdResult::default().with_listed_plants(vec![PlantView::new(id, record, today)]))
        }
        None => Ok(CmdResult::unknown_plant(id)),
    }
}
