//! # pdf2png
//!
//! Rasterise every page of a batch of PDF files into PNG images.
//!
//! Each input `name.pdf` gets its own directory `output_dir/name/` holding
//! `name_page_1.png`, `name_page_2.png`, … rendered at 300 DPI by default.
//! The work runs on a background thread and reports progress per finished
//! file, then a single success/failure completion.
//!
//! ## Pipeline Overview
//!
//! ```text
//! ConversionJob (inputs + output dir, validated)
//!  │
//!  └─ per input, in order
//!      ├─ 1. Layout  derive base name, create output_dir/base_name
//!      ├─ 2. Input   check the file is a readable PDF
//!      ├─ 3. Render  rasterise each page via pdfium at dpi/72 scale
//!      ├─ 4. Write   PNG-encode, atomically replace base_name_page_N.png
//!      └─ 5. Notify  progress = floor(files_done * 100 / total)
//! completion(success)
//! ```
//!
//! The first error aborts the whole job. Output written before it stays on
//! disk; inputs after it are not touched.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2png::{ConversionConfig, ConversionEvent, ConversionJob, Converter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let job = ConversionJob::new(["slides.pdf", "invoice.pdf"], "out")?;
//!     let converter = Converter::with_pdfium(ConversionConfig::default())?;
//!
//!     let mut handle = converter.start(job)?;
//!     while let Some(event) = handle.next_event().await {
//!         if let ConversionEvent::Progress(pct) = event {
//!             eprintln!("{pct}%");
//!         }
//!     }
//!     let summary = handle.wait().await?;
//!     eprintln!("{} pages written", summary.total_pages);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2png` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2png = { version = "0.1", default-features = false }
//! ```
//!
//! ## PDFium
//!
//! The pdfium shared library is loaded at runtime; see [`engine`] for where
//! it is looked up.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod job;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod worker;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, DEFAULT_DPI};
pub use convert::{convert, convert_blocking, convert_sync, Converter, EventStream, JobHandle};
pub use error::{ErrorKind, Pdf2PngError, ValidationError};
pub use job::ConversionJob;
pub use output::{DocumentOutput, JobSummary};
pub use pipeline::input::expand_inputs;
pub use pipeline::render::{PageSize, PdfRasterizer, PdfiumRasterizer, RasterDocument};
pub use progress::{ConversionEvent, ConversionObserver, NoopObserver};
