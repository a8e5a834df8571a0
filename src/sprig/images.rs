//! # Plant Photos
//!
//! Uploaded photos live as plain files under `<static_root>/plant_images/`.
//! Records store the path relative to the static root (`plant_images/x.png`),
//! or [`DEFAULT_PLANT_IMAGE`] when no photo was ever uploaded.
//!
//! Stored names embed the plant id, a short random token and the sanitized
//! original filename, so two uploads never overwrite each other.

use crate::error::ImageError;
use crate::model::{PlantId, DEFAULT_PLANT_IMAGE};
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

pub const IMAGES_DIR: &str = "plant_images";
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// A photo handed to sprig by a client.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Name as the client knows it. Only its extension and a sanitized copy
    /// are ever used.
    pub filename: String,
    pub data: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            data,
        }
    }

    /// Read a local file as an upload, keeping only its final path component.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let data = fs::read(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { filename, data })
    }
}

/// True iff `filename` has an extension from [`ALLOWED_EXTENSIONS`] (any case).
pub fn validate_extension(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

/// Reduce a client-supplied name to something safe to use as a file name.
///
/// Accented Latin-1 letters fold to their base letter (`ñ` -> `n`), any
/// other non-ASCII character is dropped. Path separators and whitespace runs
/// become `_`, and anything outside `[A-Za-z0-9_.-]` is removed. Leading and
/// trailing dots/underscores are trimmed so the result can never be `..` or
/// a hidden file.
pub fn secure_filename(name: &str) -> String {
    let spaced: String = name
        .chars()
        .filter_map(fold_to_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    cleaned.trim_matches(|c| c == '.' || c == '_').to_string()
}

fn fold_to_ascii(c: char) -> Option<char> {
    let folded = match c {
        c if c.is_ascii() => c,
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ñ' => 'N',
        'Ò'..='Ö' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' => 'Y',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        _ => return None,
    };
    Some(folded)
}

/// Owns the photo directory under the static asset root.
#[derive(Debug, Clone)]
pub struct ImageAssets {
    static_root: PathBuf,
}

impl ImageAssets {
    pub fn new(static_root: impl Into<PathBuf>) -> Self {
        Self {
            static_root: static_root.into(),
        }
    }

    pub fn static_root(&self) -> &Path {
        &self.static_root
    }

    pub fn images_dir(&self) -> PathBuf {
        self.static_root.join(IMAGES_DIR)
    }

    /// Validate and write an upload for `plant_id`.
    ///
    /// Returns the path relative to the static root, ready to be stored in
    /// the record's `image_path`. Nothing is written when the extension is
    /// not allowed.
    pub fn store(&self, plant_id: PlantId, upload: &Upload) -> Result<String, ImageError> {
        if !validate_extension(&upload.filename) {
            return Err(ImageError::DisallowedExtension(upload.filename.clone()));
        }

        let token = Uuid::new_v4().simple().to_string();
        let filename = secure_filename(&format!(
            "plant_{}_{}_{}",
            plant_id,
            &token[..8],
            upload.filename
        ));

        let dir = self.images_dir();
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        fs::write(dir.join(&filename), &upload.data)?;

        let relative = format!("{}/{}", IMAGES_DIR, filename);
        debug!(plant = %plant_id, path = %relative, bytes = upload.data.len(), "stored plant image");
        Ok(relative)
    }

    /// Remove a stored photo.
    ///
    /// The default image and empty paths are never touched. A file that is
    /// already gone is not an error. Returns whether a file was removed.
    pub fn delete(&self, relative_path: &str) -> Result<bool, ImageError> {
        if relative_path.is_empty() || relative_path == DEFAULT_PLANT_IMAGE {
            return Ok(false);
        }
        let full_path = self.absolute_path(relative_path)?;
        match fs::remove_file(&full_path) {
            Ok(()) => {
                debug!(path = %full_path.display(), "removed plant image");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ImageError::Io(e)),
        }
    }

    /// Resolve a stored relative path, refusing anything that would escape
    /// the static root.
    pub fn absolute_path(&self, relative_path: &str) -> Result<PathBuf, ImageError> {
        let path = Path::new(relative_path);
        let escapes = path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(ImageError::UnsafePath(relative_path.to_string()));
        }
        Ok(self.static_root.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn assets() -> (TempDir, ImageAssets) {
        let dir = TempDir::new().unwrap();
        let assets = ImageAssets::new(dir.path().join("static"));
        (dir, assets)
    }

    #[test]
    fn allowed_extensions_any_case() {
        assert!(validate_extension("fern.png"));
        assert!(validate_extension("fern.JPG"));
        assert!(validate_extension("fern.JpEg"));
        assert!(validate_extension("my.fern.gif"));
    }

    #[test]
    fn disallowed_extensions() {
        assert!(!validate_extension("fern"));
        assert!(!validate_extension("fern.bmp"));
        assert!(!validate_extension("fern.png.exe"));
        assert!(!validate_extension("png"));
        assert!(!validate_extension(""));
    }

    #[test]
    fn secure_filename_strips_paths_and_junk() {
        assert_eq!(secure_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("my fern photo.png"), "my_fern_photo.png");
        assert_eq!(secure_filename(r"C:\Users\me\fern.jpg"), "C_Users_me_fern.jpg");
        assert_eq!(secure_filename("fern<>|?*.png"), "fern.png");
        assert_eq!(secure_filename("..hidden"), "hidden");
        assert_eq!(secure_filename("helecho ñ.png"), "helecho_n.png");
        assert_eq!(secure_filename("Café Señor.JPG"), "Cafe_Senor.JPG");
        assert_eq!(secure_filename("植物.png"), "png");
    }

    #[test]
    fn store_writes_under_images_dir() {
        let (_dir, assets) = assets();
        let upload = Upload::new("my fern.png", b"png-bytes".to_vec());

        let relative = assets.store(PlantId::new(3), &upload).unwrap();
        assert!(relative.starts_with("plant_images/plant_3_"));
        assert!(relative.ends_with("_my_fern.png"));

        let on_disk = fs::read(assets.absolute_path(&relative).unwrap()).unwrap();
        assert_eq!(on_disk, b"png-bytes");
    }

    #[test]
    fn store_rejects_disallowed_extension_without_writing() {
        let (_dir, assets) = assets();
        let upload = Upload::new("notes.txt", b"hello".to_vec());

        let err = assets.store(PlantId::new(1), &upload).unwrap_err();
        assert!(matches!(err, ImageError::DisallowedExtension(_)));
        assert!(!assets.images_dir().exists());
    }

    #[test]
    fn same_upload_twice_gets_distinct_names() {
        let (_dir, assets) = assets();
        let upload = Upload::new("fern.png", b"a".to_vec());
        let first = assets.store(PlantId::new(1), &upload).unwrap();
        let second = assets.store(PlantId::new(1), &upload).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn delete_ignores_default_and_empty() {
        let (_dir, assets) = assets();
        assert!(!assets.delete(DEFAULT_PLANT_IMAGE).unwrap());
        assert!(!assets.delete("").unwrap());
    }

    #[test]
    fn delete_removes_file_and_tolerates_missing() {
        let (_dir, assets) = assets();
        let relative = assets
            .store(PlantId::new(1), &Upload::new("fern.gif", b"gif".to_vec()))
            .unwrap();

        assert!(assets.delete(&relative).unwrap());
        assert!(!assets.absolute_path(&relative).unwrap().exists());
        assert!(!assets.delete(&relative).unwrap());
    }

    #[test]
    fn paths_escaping_the_root_are_refused() {
        let (_dir, assets) = assets();
        assert!(matches!(
            assets.delete("../data/plants.json"),
            Err(ImageError::UnsafePath(_))
        ));
        assert!(matches!(
            assets.absolute_path("/etc/passwd"),
            Err(ImageError::UnsafePath(_))
        ));
    }

    #[test]
    fn upload_from_path_keeps_only_file_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cactus.jpeg");
        fs::write(&path, b"jpeg").unwrap();

        let upload = Upload::from_path(&path).unwrap();
        assert_eq!(upload.filename, "cactus.jpeg");
        assert_eq!(upload.data, b"jpeg");
    }
}
