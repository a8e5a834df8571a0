use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::labels::build_sheet;
use crate::store::{RecordStore, StorageBackend};
use crate::view::annotate;
use chrono::NaiveDate;

/// Label sheets for every plant, linking to `base_url`.
pub fn run<B: StorageBackend>(
    store: &RecordStore<B>,
    base_url: &str,
    columns: usize,
    rows: usize,
    today: NaiveDate,
) -> Result<CmdResult> {
    let plants = store.load()?;
    let sheet = build_sheet(&annotate(&plants, today), base_url, columns, rows);

    let mut result = CmdResult::default();
    if sheet.pages.is_empty() {
        result.add_message(CmdMessage::info("No plants yet, nothing to label"));
    }
    Ok(result.with_labels(sheet))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create;
    use crate::store::InMemoryStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn one_label_per_plant() {
        let store = InMemoryStore::new();
        for _ in 0..4 {
            create::run(&store, None, today()).unwrap();
        }

        let result = run(&store, "http://192.168.1.20:5000", 3, 1, today()).unwrap();
        let sheet = result.labels.unwrap();
        assert_eq!(sheet.label_count(), 4);
        assert_eq!(sheet.pages.len(), 2);
        assert_eq!(
            sheet.pages[1].rows[0][0].url,
            "http://192.168.1.20:5000/plant/4"
        );
    }

    #[test]
    fn empty_store_gives_empty_sheet_and_info() {
        let store = InMemoryStore::new();
        let result = run(&store, "http://x", 3, 7, today()).unwrap();
        assert_eq!(result.labels.unwrap().label_count(), 0);
        assert_eq!(result.messages.len(), 1);
    }
}
