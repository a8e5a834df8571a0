use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::{RecordStore, StorageBackend};
use crate::view::annotate;
use chrono::NaiveDate;

pub fn run<B: StorageBackend>(store: &RecordStore<B>, today: NaiveDate) -> Result<CmdResult> {
    let plants = store.load()?;
    Ok(CmdResult::default().with_listed_plants(annotate(&plants, today)))
}
