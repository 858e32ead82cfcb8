//! Output image persistence
//!
//! The service keeps exactly one processed image on disk, at a well-known
//! path inside the storage directory. Every successful removal overwrites
//! it; concurrent requests race and the last write wins.

use std::fs;
use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::error::{BgWebError, Result};

/// File name of the single persisted output image
pub const OUTPUT_FILE_NAME: &str = "output.png";

/// Store for the most recently processed image
#[derive(Debug, Clone)]
pub struct OutputStore {
    output_path: PathBuf,
}

impl OutputStore {
    /// Create the store, creating the storage directory if needed.
    ///
    /// # Errors
    /// Returns an error when the directory cannot be created.
    pub fn new<P: Into<PathBuf>>(storage_dir: P) -> Result<Self> {
        let dir = storage_dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| BgWebError::file_io_error("create storage directory", &dir, &e))?;
        Ok(Self {
            output_path: dir.join(OUTPUT_FILE_NAME),
        })
    }

    /// Path of the persisted output image
    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Encode `image` as PNG at the output path, replacing any prior file.
    ///
    /// # Errors
    /// Returns an error when encoding or writing fails. A failed write may
    /// leave the previous file in place; no cleanup is attempted.
    pub fn save(&self, image: &DynamicImage) -> Result<()> {
        image
            .save_with_format(&self.output_path, image::ImageFormat::Png)
            .map_err(|e| {
                BgWebError::processing(format!(
                    "Failed to encode PNG to '{}': {e}",
                    self.output_path.display()
                ))
            })
    }

    /// Read back the persisted output image.
    ///
    /// # Errors
    /// Returns an error when the file is missing or unreadable.
    pub fn read(&self) -> Result<Vec<u8>> {
        fs::read(&self.output_path)
            .map_err(|e| BgWebError::file_io_error("read output image", &self.output_path, &e))
    }
}

/// Decode raw bytes into a raster image, trying content-based detection
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes)
        .map_err(|e| BgWebError::processing(format!("Failed to decode image from bytes: {e}")))
}
