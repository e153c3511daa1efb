//! Pipeline stages for PDF-to-PNG conversion.
//!
//! Each submodule implements exactly one step of the per-file loop driven by
//! [`crate::worker`].
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ write
//! (checks)  (pdfium)   (png)
//! ```
//!
//! 1. [`input`] : verify the path names a readable PDF; expand directory
//!    selections into `*.pdf` files
//! 2. [`render`]: open the document and rasterise one page at a time through
//!    the [`render::PdfRasterizer`] seam
//! 3. [`write`] : PNG-encode and atomically replace the target file

pub mod input;
pub mod render;
pub mod write;
