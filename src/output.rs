//! Output layout and the summary returned by a successful job.
//!
//! ```text
//! output_dir/
//!  ├─ invoice/
//!  │   ├─ invoice_page_1.png
//!  │   └─ invoice_page_2.png
//!  └─ slides/
//!      └─ slides_page_1.png
//! ```

use crate::error::Pdf2PngError;
use serde::{Deserialize, Serialize};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// File name without its last extension: `name.pdf` → `name`,
/// `archive.v2.pdf` → `archive.v2`. Kept as an `OsString` so names that are
/// not valid UTF-8 reach the file system unchanged.
pub fn base_name(input: &Path) -> Result<OsString, Pdf2PngError> {
    input
        .file_stem()
        .filter(|s| !s.is_empty())
        .map(OsStr::to_os_string)
        .ok_or_else(|| Pdf2PngError::InvalidInput {
            path: input.to_path_buf(),
        })
}

/// `output_dir/base_name`
pub fn document_dir(output_dir: &Path, base_name: &OsStr) -> PathBuf {
    output_dir.join(base_name)
}

/// `{base_name}_page_{page}.png`, `page` being 1-based.
pub fn page_file_name(base_name: &OsStr, page: usize) -> OsString {
    let mut name = base_name.to_os_string();
    name.push(format!("_page_{page}.png"));
    name
}

/// Full path of the PNG for one page.
pub fn page_image_path(output_dir: &Path, base_name: &OsStr, page: usize) -> PathBuf {
    document_dir(output_dir, base_name).join(page_file_name(base_name, page))
}

/// What was written for one input PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentOutput {
    /// The input as given in the job.
    pub input: PathBuf,
    /// `output_dir/base_name`.
    pub output_dir: PathBuf,
    /// PNG paths in page order.
    pub pages: Vec<PathBuf>,
}

/// Summary of a job where every page of every input was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    /// One entry per input, in job order.
    pub documents: Vec<DocumentOutput>,
    pub total_pages: usize,
    pub duration_ms: u64,
}

impl JobSummary {
    pub fn total_documents(&self) -> usize {
        self.documents.len()
    }
}
