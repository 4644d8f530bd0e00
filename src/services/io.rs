//! Upload and download boundary service
//!
//! This module keeps file I/O out of the session and adapter logic.

use crate::{
    error::{BgRemovalError, Result},
    services::encoding::DataUrl,
    session::SourceImage,
};
use image::ImageFormat;
use std::path::{Path, PathBuf};

/// File name offered for the processed image
pub const DOWNLOAD_FILE_NAME: &str = "background-removed.png";

/// MIME type used when neither the extension nor the content identifies the file
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Service for the file boundaries of a session
pub struct ImageIOService;

impl ImageIOService {
    /// Load a user-selected file as a [`SourceImage`]
    ///
    /// No validation happens beyond MIME detection; the bytes are handed to the
    /// adapter unchanged.
    ///
    /// # Examples
    /// ```rust,no_run
    /// use gemini_bgremove::services::ImageIOService;
    ///
    /// let image = ImageIOService::load_source_image("input.jpg")?;
    /// assert_eq!(image.mime_type(), "image/jpeg");
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load_source_image<P: AsRef<Path>>(path: P) -> Result<SourceImage> {
        let path_ref = path.as_ref();

        if !path_ref.is_file() {
            return Err(BgRemovalError::file_io_error(
                "read image file",
                path_ref,
                &std::io::Error::new(std::io::ErrorKind::NotFound, "file does not exist"),
            ));
        }

        let bytes = std::fs::read(path_ref)
            .map_err(|e| BgRemovalError::file_io_error("read image file", path_ref, &e))?;
        let mime_type = Self::detect_mime_type(path_ref, &bytes);
        let file_name = path_ref
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());

        log::debug!(
            "Loaded {} ({} bytes, {})",
            path_ref.display(),
            bytes.len(),
            mime_type
        );

        Ok(SourceImage::new(bytes, mime_type).with_file_name(file_name))
    }

    /// Determine the MIME type the way a browser file picker would
    ///
    /// The extension wins; content sniffing is the fallback.
    #[must_use]
    pub fn detect_mime_type(path: &Path, bytes: &[u8]) -> String {
        if let Ok(format) = ImageFormat::from_path(path) {
            return format.to_mime_type().to_string();
        }

        match image::guess_format(bytes) {
            Ok(format) => {
                log::debug!(
                    "No usable extension on {}, sniffed {:?} from content",
                    path.display(),
                    format
                );
                format.to_mime_type().to_string()
            },
            Err(_) => FALLBACK_MIME_TYPE.to_string(),
        }
    }

    /// Write a result data URL as `background-removed.png` inside `dir`
    ///
    /// Returns the path of the written file.
    pub fn save_download<P: AsRef<Path>>(result: &DataUrl, dir: P) -> Result<PathBuf> {
        let dir_ref = dir.as_ref();
        std::fs::create_dir_all(dir_ref)
            .map_err(|e| BgRemovalError::file_io_error("create output directory", dir_ref, &e))?;

        let bytes = result.decode()?;
        let target = dir_ref.join(DOWNLOAD_FILE_NAME);
        std::fs::write(&target, &bytes)
            .map_err(|e| BgRemovalError::file_io_error("write download", &target, &e))?;

        log::debug!("Wrote {} bytes to {}", bytes.len(), target.display());
        Ok(target)
    }
}
