//! Optional post-processing for uploaded photos.
//!
//! Phone photos are large; an external compression service shrinks and
//! resizes them after they are stored. The step is best effort: the caller
//! keeps the original file whenever optimization fails or times out.

use crate::config::OptimizerConfig;
use crate::error::{Result, SprigError};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

pub const TINIFY_SHRINK_URL: &str = "https://api.tinify.com/shrink";

/// Rewrites a stored image in place.
///
/// Implementations must leave the file at `path` untouched when they fail.
pub trait ImageOptimizer {
    fn optimize(&self, path: &Path) -> Result<()>;
}

/// Tinify (TinyPNG) compression plus a "fit" resize.
pub struct TinifyOptimizer {
    client: Client,
    api_key: String,
    shrink_url: String,
    max_width: u32,
    max_height: u32,
}

#[derive(Deserialize)]
struct ShrinkResponse {
    output: ShrinkOutput,
}

#[derive(Deserialize)]
struct ShrinkOutput {
    url: String,
}

#[derive(Serialize)]
struct ResizeRequest {
    resize: ResizeOptions,
}

#[derive(Serialize)]
struct ResizeOptions {
    method: &'static str,
    width: u32,
    height: u32,
}

impl TinifyOptimizer {
    pub fn new(api_key: impl Into<String>, config: &OptimizerConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| SprigError::Optimizer(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            shrink_url: TINIFY_SHRINK_URL.to_string(),
            max_width: config.max_width,
            max_height: config.max_height,
        })
    }

    /// Point the optimizer at a different endpoint (tests, proxies).
    pub fn with_shrink_url(mut self, url: impl Into<String>) -> Self {
        self.shrink_url = url.into();
        self
    }

    /// Optimizer from config, if a credential is available.
    pub fn from_config(config: &OptimizerConfig) -> Result<Option<Self>> {
        match config.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(Some(Self::new(key, config)?)),
            _ => Ok(None),
        }
    }

    fn shrink(&self, data: Vec<u8>) -> Result<String> {
        let response = self
            .client
            .post(&self.shrink_url)
            .basic_auth("api", Some(&self.api_key))
            .body(data)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| SprigError::Optimizer(format!("shrink request failed: {e}")))?;

        let body: ShrinkResponse = response
            .json()
            .map_err(|e| SprigError::Optimizer(format!("unexpected shrink response: {e}")))?;
        Ok(body.output.url)
    }

    fn resize(&self, output_url: &str) -> Result<Vec<u8>> {
        let request = ResizeRequest {
            resize: ResizeOptions {
                method: "fit",
                width: self.max_width,
                height: self.max_height,
            },
        };
        let response = self
            .client
            .post(output_url)
            .basic_auth("api", Some(&self.api_key))
            .json(&request)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| SprigError::Optimizer(format!("resize request failed: {e}")))?;

        let bytes = response
            .bytes()
            .map_err(|e| SprigError::Optimizer(format!("failed to read resized image: {e}")))?;
        Ok(bytes.to_vec())
    }
}

impl ImageOptimizer for TinifyOptimizer {
    fn optimize(&self, path: &Path) -> Result<()> {
        let original = fs::read(path)?;
        let original_len = original.len();

        let output_url = self.shrink(original)?;
        debug!(url = %output_url, "image compressed, requesting resize");
        let optimized = self.resize(&output_url)?;
        if optimized.is_empty() {
            return Err(SprigError::Optimizer("service returned an empty image".into()));
        }

        replace_file(path, &optimized)?;
        info!(
            path = %path.display(),
            before = original_len,
            after = optimized.len(),
            "optimized plant image"
        );
        Ok(())
    }
}

/// Atomically swap the contents of `path` for `data`.
fn replace_file(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let tmp = dir.join(format!(".img-{}.tmp", Uuid::new_v4()));
    fs::write(&tmp, data)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(SprigError::Io(e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config(key: Option<&str>) -> OptimizerConfig {
        OptimizerConfig {
            api_key: key.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn no_key_means_no_optimizer() {
        assert!(TinifyOptimizer::from_config(&config(None)).unwrap().is_none());
        assert!(TinifyOptimizer::from_config(&config(Some("  ")))
            .unwrap()
            .is_none());
    }

    #[test]
    fn key_enables_optimizer() {
        assert!(TinifyOptimizer::from_config(&config(Some("secret")))
            .unwrap()
            .is_some());
    }

    #[test]
    fn unreachable_service_leaves_file_intact() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fern.png");
        fs::write(&path, b"original").unwrap();

        let mut cfg = config(Some("secret"));
        cfg.timeout_secs = 1;
        // Port 9 (discard) on localhost is closed in test environments.
        let optimizer = TinifyOptimizer::new("secret", &cfg)
            .unwrap()
            .with_shrink_url("http://127.0.0.1:9/shrink");

        assert!(optimizer.optimize(&path).is_err());
        assert_eq!(fs::read(&path).unwrap(), b"original");
    }

    #[test]
    fn replace_file_swaps_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fern.png");
        fs::write(&path, b"old").unwrap();

        replace_file(&path, b"new").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new");

        let leftovers = fs::read_dir(dir.path())
            .unwrap()
            .filter(|e| {
                e.as_ref()
                    .unwrap()
                    .file_name()
                    .to_string_lossy()
                    .ends_with(".tmp")
            })
            .count();
        assert_eq!(leftovers, 0);
    }
}
