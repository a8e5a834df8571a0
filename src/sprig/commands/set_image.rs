use crate::commands::{CmdMessage, CmdResult};
use crate::error::{ImageError, Result};
use crate::images::{ImageAssets, Upload};
use crate::model::PlantId;
use crate::optimizer::ImageOptimizer;
use crate::store::{RecordStore, StorageBackend};
use crate::view::PlantView;
use chrono::NaiveDate;
use tracing::{info, warn};

/// Attach `upload` as the photo of plant `id`, replacing any previous one.
///
/// A rejected file type leaves both the record and the image directory
/// untouched. Optimization and cleanup of the superseded photo are best
/// effort and only ever add warnings to the result.
pub fn run<B: StorageBackend>(
    store: &RecordStore<B>,
    assets: &ImageAssets,
    optimizer: Option<&dyn ImageOptimizer>,
    id: PlantId,
    upload: Option<&Upload>,
    today: NaiveDate,
) -> Result<CmdResult> {
    let Some(upload) = upload else {
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::info("No image provided, nothing changed"));
        return Ok(result);
    };

    let _lock = store.lock()?;
    let mut plants = store.load()?;

    let Some(record) = plants.get_mut(&id) else {
        return Ok(CmdResult::unknown_plant(id));
    };

    let mut result = CmdResult::default();

    let new_path = match assets.store(id, upload) {
        Ok(path) => path,
        Err(ImageError::DisallowedExtension(name)) => {
            warn!(plant = %id, file = %name, "rejected image upload");
            result.add_message(CmdMessage::warning(format!(
                "Rejected {:?}: only png, jpg, jpeg and gif images are allowed",
                name
            )));
            return Ok(result);
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(optimizer) = optimizer {
        let full_path = assets.absolute_path(&new_path)?;
        if let Err(e) = optimizer.optimize(&full_path) {
            warn!(plant = %id, error = %e, "image optimization failed, keeping original");
            result.add_message(CmdMessage::warning(format!(
                "Could not optimize image, kept the original: {}",
                e
            )));
        }
    }

    let had_photo = record.has_custom_image();
    let old_path = std::mem::replace(&mut record.image_path, new_path.clone());
    let view = PlantView::new(id, record, today);
    if let Err(e) = store.save(&plants) {
        if let Err(cleanup) = assets.delete(&new_path) {
            warn!(plant = %id, path = %new_path, error = %cleanup, "failed to remove unsaved image");
        }
        return Err(e);
    }
    info!(plant = %id, path = %new_path, "plant image updated");

    if had_photo && old_path != new_path {
        if let Err(e) = assets.delete(&old_path) {
            warn!(plant = %id, path = %old_path, error = %e, "failed to remove previous image");
            result.add_message(CmdMessage::warning(format!(
                "Could not remove previous image {}: {}",
                old_path, e
            )));
        }
    }

    result.add_message(CmdMessage::success(format!(
        "Image updated ({}): {}",
        id, view.name
    )));
    result.affected_plants.push(view);
    Ok(result)
}
