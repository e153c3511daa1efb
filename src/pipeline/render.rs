//! PDF rasterisation: render pages to `DynamicImage` via pdfium.
//!
//! The worker talks to the renderer through [`PdfRasterizer`] and
//! [`RasterDocument`] so it can be driven by something other than pdfium in
//! tests. [`PdfiumRasterizer`] is the production implementation.
//!
//! ## Why explicit target sizes?
//!
//! pdfium can scale by a factor, but the output size must be exactly
//! `round(points * dpi / 72)` on each axis. Computing that once in
//! [`PageSize::scaled`] and asking pdfium for those pixel dimensions keeps
//! every renderer on the same arithmetic.

use crate::engine;
use crate::error::Pdf2PngError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Page dimensions in PDF points (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width_pt: f32,
    pub height_pt: f32,
}

impl PageSize {
    pub fn new(width_pt: f32, height_pt: f32) -> Self {
        Self {
            width_pt,
            height_pt,
        }
    }

    /// Pixel dimensions at `scale` pixels per point, rounded, at least 1×1.
    pub fn scaled(&self, scale: f64) -> (u32, u32) {
        let px = |pt: f32| -> u32 {
            let v = (f64::from(pt) * scale).round();
            if v.is_finite() && v >= 1.0 {
                v.min(f64::from(i32::MAX)) as u32
            } else {
                1
            }
        };
        (px(self.width_pt), px(self.height_pt))
    }
}

/// Opens documents for rendering.
pub trait PdfRasterizer: Send + Sync {
    /// Open `path`, failing with a document error if it cannot be parsed.
    fn open<'a>(
        &'a self,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<Box<dyn RasterDocument + 'a>, Pdf2PngError>;
}

/// An open document.
pub trait RasterDocument {
    fn page_count(&self) -> usize;

    /// Render the 0-based page `index` at `scale` pixels per point.
    fn render_page(&self, index: usize, scale: f64) -> Result<DynamicImage, Pdf2PngError>;
}

/// [`PdfRasterizer`] backed by a bound pdfium library.
pub struct PdfiumRasterizer {
    pdfium: Pdfium,
}

// SAFETY: built with the `thread_safe` feature, every call into the pdfium
// bindings is serialised behind pdfium-render's global mutex. Documents opened
// through `open` borrow the rasterizer and never leave the calling thread.
unsafe impl Send for PdfiumRasterizer {}
unsafe impl Sync for PdfiumRasterizer {}

impl PdfiumRasterizer {
    /// Bind pdfium (see [`engine::bind_pdfium`] for the search order).
    pub fn bind(library: Option<&Path>) -> Result<Self, Pdf2PngError> {
        Ok(Self {
            pdfium: engine::bind_pdfium(library)?,
        })
    }
}

impl PdfRasterizer for PdfiumRasterizer {
    fn open<'a>(
        &'a self,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<Box<dyn RasterDocument + 'a>, Pdf2PngError> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, password)
            .map_err(|e| classify_load_error(path, password.is_some(), &e))?;

        info!(
            "PDF loaded: {} ({} pages)",
            path.display(),
            document.pages().len()
        );

        Ok(Box::new(PdfiumDocument {
            document,
            path: path.to_path_buf(),
        }))
    }
}

struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
    path: PathBuf,
}

impl RasterDocument for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn render_page(&self, index: usize, scale: f64) -> Result<DynamicImage, Pdf2PngError> {
        let failed = |detail: String| Pdf2PngError::RasterisationFailed {
            path: self.path.clone(),
            page: index + 1,
            detail,
        };

        let page = self
            .document
            .pages()
            .get(index as u16)
            .map_err(|e| failed(format!("{:?}", e)))?;

        let size = PageSize::new(page.width().value, page.height().value);
        let (width, height) = size.scaled(scale);

        let render_config = PdfRenderConfig::new().set_target_size(width as i32, height as i32);

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| failed(format!("{:?}", e)))?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} ({:.1}×{:.1} pt) → {}x{} px",
            index + 1,
            size.width_pt,
            size.height_pt,
            image.width(),
            image.height()
        );

        Ok(image)
    }
}

/// Map a pdfium load failure to the most specific document error.
fn classify_load_error(path: &Path, had_password: bool, e: &PdfiumError) -> Pdf2PngError {
    let err_str = format!("{:?}", e);
    if err_str.contains("Password") || err_str.contains("password") {
        if had_password {
            Pdf2PngError::WrongPassword {
                path: path.to_path_buf(),
            }
        } else {
            Pdf2PngError::PasswordRequired {
                path: path.to_path_buf(),
            }
        }
    } else {
        Pdf2PngError::CorruptPdf {
            path: path.to_path_buf(),
            detail: err_str,
        }
    }
}
