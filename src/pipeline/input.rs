//! Input checks: make sure a path names a readable PDF before pdfium sees it.
//!
//! pdfium reports every failure to open as a generic load error. Checking
//! existence, read permission and the `%PDF-` header first lets the job
//! fail with an error that says which of those went wrong.

use crate::error::Pdf2PngError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// True if the path carries a `.pdf` extension (any case).
pub fn is_pdf_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Expand a user selection into the list of files to convert.
///
/// Files are kept as given, in order, whatever their extension. Directories
/// are replaced by the `*.pdf` files directly inside them, sorted by path.
pub fn expand_inputs<P: AsRef<Path>>(selection: &[P]) -> Result<Vec<PathBuf>, Pdf2PngError> {
    let mut inputs = Vec::new();
    for item in selection {
        let item = item.as_ref();
        if !item.is_dir() {
            inputs.push(item.to_path_buf());
            continue;
        }

        let entries = std::fs::read_dir(item).map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => Pdf2PngError::PermissionDenied {
                path: item.to_path_buf(),
            },
            _ => Pdf2PngError::FileNotFound {
                path: item.to_path_buf(),
            },
        })?;

        let mut pdfs: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && is_pdf_path(p))
            .collect();
        pdfs.sort();
        debug!("Expanded {} → {} PDFs", item.display(), pdfs.len());
        inputs.extend(pdfs);
    }
    Ok(inputs)
}

/// Bytes at the start of a file searched for the `%PDF-` header. PDF readers
/// tolerate leading junk (a BOM, a mail header) before it.
pub const HEADER_SEARCH_LEN: u64 = 1024;

const PDF_HEADER: &[u8] = b"%PDF-";

/// Offset of the `%PDF-` header within `head`, if present.
pub fn find_pdf_header(head: &[u8]) -> Option<usize> {
    head.windows(PDF_HEADER.len())
        .position(|w| w == PDF_HEADER)
}

/// Validate that `path` exists, is readable and carries a `%PDF-` header
/// within its first [`HEADER_SEARCH_LEN`] bytes.
pub fn check_local_pdf(path: &Path) -> Result<(), Pdf2PngError> {
    if !path.exists() {
        return Err(Pdf2PngError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let io_error = |e: std::io::Error| match e.kind() {
        std::io::ErrorKind::PermissionDenied => Pdf2PngError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => Pdf2PngError::FileNotFound {
            path: path.to_path_buf(),
        },
    };

    let file = std::fs::File::open(path).map_err(io_error)?;
    let mut head = Vec::with_capacity(HEADER_SEARCH_LEN as usize);
    file.take(HEADER_SEARCH_LEN)
        .read_to_end(&mut head)
        .map_err(io_error)?;

    match find_pdf_header(&head) {
        Some(offset) => {
            debug!(
                "Resolved local PDF: {} (header at byte {})",
                path.display(),
                offset
            );
            Ok(())
        }
        None => {
            let mut magic = [0u8; 4];
            let n = head.len().min(magic.len());
            magic[..n].copy_from_slice(&head[..n]);
            Err(Pdf2PngError::NotAPdf {
                path: path.to_path_buf(),
                magic,
            })
        }
    }
}
