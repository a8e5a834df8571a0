//! Printable label sheets.
//!
//! Each plant gets a label pointing at its status page. Labels are laid out
//! on fixed-size pages (`columns` × `rows`) so a sheet can be printed on
//! standard sticker paper.

use crate::model::PlantId;
use crate::view::PlantView;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Label {
    pub id: PlantId,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelPage {
    pub number: usize,
    pub rows: Vec<Vec<Label>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LabelSheet {
    pub base_url: String,
    pub columns: usize,
    pub rows: usize,
    pub pages: Vec<LabelPage>,
}

impl LabelSheet {
    pub fn label_count(&self) -> usize {
        self.pages
            .iter()
            .flat_map(|p| p.rows.iter())
            .map(Vec::len)
            .sum()
    }
}

/// Status page URL for a plant.
pub fn label_url(base_url: &str, id: PlantId) -> String {
    format!("{}/plant/{}", base_url.trim_end_matches('/'), id)
}

/// Lay out one label per plant, in id order, `columns × rows` per page.
///
/// Zero `columns` or `rows` is treated as 1. The last page may be partial;
/// an empty plant list produces no pages.
pub fn build_sheet(plants: &[PlantView], base_url: &str, columns: usize, rows: usize) -> LabelSheet {
    let columns = columns.max(1);
    let rows = rows.max(1);

    let mut labels: Vec<Label> = plants
        .iter()
        .map(|p| Label {
            id: p.id,
            name: p.name.clone(),
            url: label_url(base_url, p.id),
        })
        .collect();
    labels.sort_by_key(|l| l.id);

    let pages = labels
        .chunks(columns.saturating_mul(rows))
        .enumerate()
        .map(|(i, page)| LabelPage {
            number: i + 1,
            rows: page.chunks(columns).map(<[Label]>::to_vec).collect(),
        })
        .collect();

    LabelSheet {
        base_url: base_url.trim_end_matches('/').to_string(),
        columns,
        rows,
        pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Collection, PlantRecord};
    use crate::view::annotate;
    use chrono::NaiveDate;

    fn views(count: u64) -> Vec<PlantView> {
        let plants: Collection = (1..=count)
            .map(|n| (PlantId::new(n), PlantRecord::new(PlantId::new(n), None)))
            .collect();
        annotate(&plants, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    }

    #[test]
    fn url_joins_without_double_slash() {
        assert_eq!(
            label_url("http://10.0.0.5:5000/", PlantId::new(4)),
            "http://10.0.0.5:5000/plant/4"
        );
        assert_eq!(
            label_url("http://plants.local", PlantId::new(12)),
            "http://plants.local/plant/12"
        );
    }

    #[test]
    fn empty_collection_has_no_pages() {
        let sheet = build_sheet(&[], "http://x", 3, 7);
        assert!(sheet.pages.is_empty());
        assert_eq!(sheet.label_count(), 0);
    }

    #[test]
    fn paginates_into_fixed_grid() {
        let sheet = build_sheet(&views(23), "http://x", 3, 7);
        assert_eq!(sheet.pages.len(), 2);

        let first = &sheet.pages[0];
        assert_eq!(first.number, 1);
        assert_eq!(first.rows.len(), 7);
        assert!(first.rows.iter().all(|r| r.len() == 3));

        let last = &sheet.pages[1];
        assert_eq!(last.rows.len(), 1);
        assert_eq!(last.rows[0].len(), 2);
        assert_eq!(last.rows[0][1].id, PlantId::new(23));

        assert_eq!(sheet.label_count(), 23);
    }

    #[test]
    fn labels_carry_name_and_url() {
        let sheet = build_sheet(&views(1), "http://x/", 2, 2);
        let label = &sheet.pages[0].rows[0][0];
        assert_eq!(label.name, "Plant 1");
        assert_eq!(label.url, "http://x/plant/1");
        assert_eq!(sheet.base_url, "http://x");
    }

    #[test]
    fn zero_dimensions_are_clamped() {
        let sheet = build_sheet(&views(2), "http://x", 0, 0);
        assert_eq!(sheet.pages.len(), 2);
    }

    #[test]
    fn huge_grid_fits_everything_on_one_page() {
        let sheet = build_sheet(&views(4), "http://x", usize::MAX, 2);
        assert_eq!(sheet.pages.len(), 1);
        assert_eq!(sheet.pages[0].rows.len(), 1);
        assert_eq!(sheet.label_count(), 4);

        assert!(build_sheet(&[], "http://x", usize::MAX, usize::MAX).pages.is_empty());
    }
}
