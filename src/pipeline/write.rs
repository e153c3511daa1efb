//! Image output: `DynamicImage` → PNG file on disk.
//!
//! The PNG is encoded in memory first, then written to a sibling temp file and
//! renamed over the target. A re-run therefore replaces existing pages whole;
//! an interrupted write never leaves a truncated `*_page_N.png` behind.

use crate::error::Pdf2PngError;
use image::DynamicImage;
use std::io::{self, Cursor};
use std::path::Path;
use tracing::debug;

/// Encode a rasterised page as PNG bytes.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    Ok(buf)
}

/// Write `img` to `path` as PNG, replacing any existing file.
pub fn write_png(img: &DynamicImage, path: &Path) -> Result<(), Pdf2PngError> {
    let bytes = encode_png(img).map_err(|source| Pdf2PngError::ImageEncodeFailed {
        path: path.to_path_buf(),
        source,
    })?;

    replace_file(path, &bytes, |tmp, bytes| std::fs::write(tmp, bytes))?;
    debug!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

/// Write `bytes` to a sibling `.png.tmp` with `write_tmp`, then rename it over
/// `path`. The temp file is removed if either step fails.
fn replace_file<F>(path: &Path, bytes: &[u8], write_tmp: F) -> Result<(), Pdf2PngError>
where
    F: FnOnce(&Path, &[u8]) -> io::Result<()>,
{
    let tmp_path = path.with_extension("png.tmp");
    let result = write_tmp(&tmp_path, bytes).and_then(|()| std::fs::rename(&tmp_path, path));

    result.map_err(|source| {
        if tmp_path.is_file() {
            let _ = std::fs::remove_file(&tmp_path);
        }
        Pdf2PngError::OutputWriteFailed {
            path: path.to_path_buf(),
            source,
        }
    })
}
