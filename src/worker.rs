//! The conversion worker: the per-file, per-page loop.
//!
//! [`run_job`] is the whole algorithm. It stops at the first error and returns
//! it; nothing already written is rolled back, and files after the failing
//! one are never touched. [`execute`] wraps it with the job-level policy:
//! panics from the rendering library become errors, the failure is logged,
//! and the observer gets exactly one `on_complete`.

use crate::config::ConversionConfig;
use crate::error::Pdf2PngError;
use crate::job::ConversionJob;
use crate::output::{self, DocumentOutput, JobSummary};
use crate::pipeline::{input, render::PdfRasterizer, write};
use crate::progress::{percent_complete, ConversionObserver};
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Convert every page of every input, in order.
///
/// Emits `on_job_start`, then per file `on_file_start`, `on_page_written` per
/// page and `on_progress` when the file is done. Does **not** emit
/// `on_complete`; see [`execute`].
pub fn run_job(
    job: &ConversionJob,
    rasterizer: &dyn PdfRasterizer,
    config: &ConversionConfig,
    observer: &dyn ConversionObserver,
) -> Result<JobSummary, Pdf2PngError> {
    let started = Instant::now();
    let total = job.inputs().len();
    let scale = config.scale();
    info!(
        "Starting conversion of {} PDFs into {} at {} DPI",
        total,
        job.output_dir().display(),
        config.dpi
    );

    for (name, paths) in job.colliding_names() {
        warn!(
            "{} inputs share the output name '{}'; later pages overwrite earlier ones: {:?}",
            paths.len(),
            name.to_string_lossy(),
            paths
        );
    }

    observer.on_job_start(total);

    let mut documents = Vec::with_capacity(total);
    let mut total_pages = 0;

    for (i, pdf_path) in job.inputs().iter().enumerate() {
        let index = i + 1;
        let base = output::base_name(pdf_path)?;
        let doc_dir = output::document_dir(job.output_dir(), &base);

        std::fs::create_dir_all(&doc_dir).map_err(|source| Pdf2PngError::OutputDirFailed {
            path: doc_dir.clone(),
            source,
        })?;

        input::check_local_pdf(pdf_path)?;
        let document = rasterizer.open(pdf_path, config.password.as_deref())?;
        let page_count = document.page_count();
        info!(
            "[{}/{}] {} → {} ({} pages)",
            index,
            total,
            pdf_path.display(),
            doc_dir.display(),
            page_count
        );
        observer.on_file_start(index, total, pdf_path, page_count);

        let mut pages = Vec::with_capacity(page_count);
        for page_idx in 0..page_count {
            let page_num = page_idx + 1;
            let image = document.render_page(page_idx, scale)?;
            let image_path = output::page_image_path(job.output_dir(), &base, page_num);
            write::write_png(&image, &image_path)?;
            observer.on_page_written(index, page_num, page_count, &image_path);
            pages.push(image_path);
        }

        total_pages += page_count;
        documents.push(DocumentOutput {
            input: pdf_path.clone(),
            output_dir: doc_dir,
            pages,
        });

        let percent = percent_complete(index, total);
        debug!("Progress {}%", percent);
        observer.on_progress(percent);
    }

    let summary = JobSummary {
        documents,
        total_pages,
        duration_ms: started.elapsed().as_millis() as u64,
    };
    info!(
        "Conversion complete: {} PDFs, {} pages, {}ms",
        summary.total_documents(),
        summary.total_pages,
        summary.duration_ms
    );
    Ok(summary)
}

/// [`run_job`] with panics caught and the failure logged. Does not emit
/// `on_complete`; callers that must release state first emit it themselves.
pub(crate) fn run_guarded(
    job: &ConversionJob,
    rasterizer: &dyn PdfRasterizer,
    config: &ConversionConfig,
    observer: &dyn ConversionObserver,
) -> Result<JobSummary, Pdf2PngError> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        run_job(job, rasterizer, config, observer)
    }))
    .unwrap_or_else(|payload| {
        Err(Pdf2PngError::Internal(format!(
            "conversion worker panicked: {}",
            panic_message(payload.as_ref())
        )))
    });

    if let Err(ref e) = outcome {
        error!("Conversion error: {}", e);
    }
    outcome
}

/// Run a job to completion on the current thread, then emit exactly one
/// `on_complete(success)`.
pub fn execute(
    job: &ConversionJob,
    rasterizer: &dyn PdfRasterizer,
    config: &ConversionConfig,
    observer: &dyn ConversionObserver,
) -> Result<JobSummary, Pdf2PngError> {
    let outcome = run_guarded(job, rasterizer, config, observer);
    observer.on_complete(outcome.is_ok());
    outcome
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
