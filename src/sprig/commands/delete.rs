use crate::commands::{CmdMessage, CmdResult};
use crate::error::{ImageError, Result};
use crate::images::ImageAssets;
use crate::model::PlantId;
use crate::store::{RecordStore, StorageBackend};
use crate::view::PlantView;
use chrono::NaiveDate;
use tracing::{info, warn};

/// Remove plant `id` together with its photo.
///
/// The photo goes first. If it cannot be removed nothing is saved, so the
/// record keeps pointing at a file that still exists.
pub fn run<B: StorageBackend>(
    store: &RecordStore<B>,
    assets: &ImageAssets,
    id: PlantId,
    today: NaiveDate,
) -> Result<CmdResult> {
    let _lock = store.lock()?;
    let mut plants = store.load()?;

    let Some(record) = plants.remove(&id) else {
        return Ok(CmdResult::unknown_plant(id));
    };

    let mut result = CmdResult::default();
    match assets.delete(&record.image_path) {
        Ok(_) => {}
        Err(ImageError::UnsafePath(path)) => {
            warn!(plant = %id, path = %path, "not removing image outside the asset root");
            result.add_message(CmdMessage::warning(format!(
                "Left image {} in place: it is outside the image directory",
                path
            )));
        }
        Err(e) => return Err(e.into()),
    }

    store.save(&plants)?;
    info!(plant = %id, name = %record.name, "plant deleted");

    result.add_message(CmdMessage::success(format!(
        "Plant deleted ({}): {}",
        id, record.name
    )));
    result.affected_plants.push(PlantView::new(id, &record, today));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{create, set_image, MessageLevel};
    use crate::images::Upload;
    use crate::model::DEFAULT_PLANT_IMAGE;
    use crate::store::mem_backend::MemBackend;
    use crate::store::InMemoryStore;
    use std::fs;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn assets() -> (TempDir, ImageAssets) {
        let dir = TempDir::new().unwrap();
        let assets = ImageAssets::new(dir.path().join("static"));
        (dir, assets)
    }

    #[test]
    fn removes_record() {
        let (_dir, assets) = assets();
        let store = InMemoryStore::new();
        create::run(&store, Some("Fern".into()), today()).unwrap();

        let result = run(&store, &assets, PlantId::new(1), today()).unwrap();

        assert_eq!(result.affected_plants[0].name, "Fern");
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn removes_uploaded_image() {
        let (_dir, assets) = assets();
        let store = InMemoryStore::new();
        create::run(&store, Some("Fern".into()), today()).unwrap();
        let upload = Upload::new("fern.png", b"png".to_vec());
        set_image::run(&store, &assets, None, PlantId::new(1), Some(&upload), today()).unwrap();
        let path = store.load().unwrap()[&PlantId::new(1)].image_path.clone();

        run(&store, &assets, PlantId::new(1), today()).unwrap();

        assert!(!assets.absolute_path(&path).unwrap().exists());
    }

    #[test]
    fn default_image_is_never_removed() {
        let (_dir, assets) = assets();
        fs::create_dir_all(assets.static_root()).unwrap();
        let icon = assets.static_root().join(DEFAULT_PLANT_IMAGE);
        fs::write(&icon, b"icon").unwrap();

        let store = InMemoryStore::new();
        create::run(&store, None, today()).unwrap();
        run(&store, &assets, PlantId::new(1), today()).unwrap();

        assert!(icon.exists());
    }

    #[test]
    fn missing_image_file_is_not_an_error() {
        let (_dir, assets) = assets();
        let store = InMemoryStore::with_backend(MemBackend::with_document(
            r#"{"1": {"name": "Fern", "image_path": "plant_images/gone.png"}}"#,
        ));

        let result = run(&store, &assets, PlantId::new(1), today()).unwrap();
        assert_eq!(result.affected_plants.len(), 1);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn image_outside_asset_root_is_left_alone() {
        let (_dir, assets) = assets();
        let store = InMemoryStore::with_backend(MemBackend::with_document(
            r#"{"1": {"name": "Fern", "image_path": "../data/plants.json"}}"#,
        ));

        let result = run(&store, &assets, PlantId::new(1), today()).unwrap();

        assert!(store.load().unwrap().is_empty());
        assert!(result
            .messages
            .iter()
            .any(|m| m.level == MessageLevel::Warning));
    }

    #[test]
    fn unknown_id_is_a_strict_no_op() {
        let (_dir, assets) = assets();
        let store = InMemoryStore::new();
        create::run(&store, Some("Fern".into()), today()).unwrap();
        let writes = store.backend().write_count();

        let result = run(&store, &assets, PlantId::new(2), today()).unwrap();

        assert!(result.affected_plants.is_empty());
        assert_eq!(store.load().unwrap().len(), 1);
        assert_eq!(store.backend().write_count(), writes);
    }

    #[test]
    fn deleting_a_lower_id_keeps_numbering() {
        let (_dir, assets) = assets();
        let store = InMemoryStore::new();
        create::run(&store, None, today()).unwrap();
        create::run(&store, None, today()).unwrap();
        run(&store, &assets, PlantId::new(1), today()).unwrap();

        let result = create::run(&store, None, today()).unwrap();
        assert_eq!(result.affected_plants[0].id, PlantId::new(3));
    }
}
