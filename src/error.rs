//! Error types for the pdf2png library.
//!
//! Two distinct error types reflect two distinct moments of failure:
//!
//! * [`ValidationError`]: the job was never started. Returned synchronously
//!   by [`crate::job::ConversionJob::new`] when the selection is empty, so the
//!   shell can show a warning without creating a worker.
//!
//! * [`Pdf2PngError`]: the job started and something aborted it (bad input,
//!   I/O failure, render failure). The worker stops at the first one; callers
//!   observe `success = false` and can fetch the detailed error from
//!   [`crate::convert::JobHandle::wait`].
//!
//! [`Pdf2PngError::kind`] collapses the variants into the coarse
//! [`ErrorKind`] categories, which is what most callers branch on.

use std::path::PathBuf;
use thiserror::Error;

/// Rejected selections. Surfaced as a blocking warning by the shell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No input files were selected.
    #[error("Please select PDF files first.")]
    NoInputFiles,

    /// One of the selected input paths is the empty string.
    #[error("Input #{index} is an empty path")]
    EmptyInputPath { index: usize },

    /// No output directory was selected.
    #[error("Please select an output folder.")]
    NoOutputDirectory,
}

/// Coarse classification of a [`Pdf2PngError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The job or config was rejected before any work started.
    Validation,
    /// An input could not be opened or parsed as a PDF.
    Document,
    /// Directory creation or image write failed.
    Io,
    /// Page rasterisation or PNG encoding failed.
    Render,
    /// Engine binding, concurrency guard, or an unexpected failure.
    Internal,
}

/// All errors returned by the pdf2png library once a job is under way.
#[derive(Debug, Error)]
pub enum Pdf2PngError {
    // ── Validation ────────────────────────────────────────────────────────
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The path has no file name to derive an output directory from.
    #[error("Cannot derive an output name from '{path}'")]
    InvalidInput { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    // ── Render errors ─────────────────────────────────────────────────────
    /// pdfium-render returned an error for a specific page.
    #[error("Rasterisation failed for page {page} of '{path}': {detail}")]
    RasterisationFailed {
        path: PathBuf,
        page: usize,
        detail: String,
    },

    /// The rendered bitmap could not be encoded as PNG.
    #[error("PNG encoding failed for '{path}': {source}")]
    ImageEncodeFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create a per-document output directory.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write an output image.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Engine errors ─────────────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium (or pass --pdfium-lib).\n\
  • Place libpdfium next to the pdf2png executable or in ./libs.\n\
  • Install pdfium system-wide. Pre-built libraries are available from\n\
    https://github.com/bblanchon/pdfium-binaries/releases\n"
    )]
    PdfiumBindingFailed(String),

    /// A job is already running on this converter.
    #[error("A conversion is already in progress; wait for it to finish before starting another")]
    JobInProgress,

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Pdf2PngError {
    /// The coarse category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::InvalidConfig(_) => ErrorKind::Validation,
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::InvalidInput { .. }
            | Self::NotAPdf { .. }
            | Self::CorruptPdf { .. }
            | Self::PasswordRequired { .. }
            | Self::WrongPassword { .. } => ErrorKind::Document,
            Self::OutputDirFailed { .. } | Self::OutputWriteFailed { .. } => ErrorKind::Io,
            Self::RasterisationFailed { .. } | Self::ImageEncodeFailed { .. } => ErrorKind::Render,
            Self::PdfiumBindingFailed(_) | Self::JobInProgress | Self::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }
}
