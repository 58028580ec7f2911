use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum ScreenshotError {
    #[error("could not create the screenshot directory at {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not write the screenshot to {path}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Encodes the RGBA frame as a timestamped PNG under `dir`, creating the
/// directory if needed. Returns the written path.
pub(crate) fn save_screenshot(
    dir: &Path,
    frame: &[u8],
    width: u32,
    height: u32,
) -> Result<PathBuf, ScreenshotError> {
    fs::create_dir_all(dir).map_err(|source| ScreenshotError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let stamp_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0);
    let path = dir.join(format!("flagrun-{stamp_ms}.png"));
    image::save_buffer(&path, frame, width, height, image::ColorType::Rgba8).map_err(
        |source| ScreenshotError::Encode {
            path: path.clone(),
            source,
        },
    )?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_a_decodable_png_with_frame_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let frame = vec![255u8; 4 * 3 * 4];

        let path = save_screenshot(dir.path(), &frame, 4, 3).unwrap();
        assert_eq!(image::image_dimensions(&path).unwrap(), (4, 3));
    }

    #[test]
    fn creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("captures").join("nested");
        let frame = vec![0u8; 2 * 2 * 4];

        let path = save_screenshot(&nested, &frame, 2, 2).unwrap();
        assert!(path.starts_with(&nested));
    }
}
