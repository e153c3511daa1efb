//! Conversion entry points.
//!
//! ## Background execution
//!
//! [`Converter::start`] runs the worker on tokio's blocking pool (pdfium is
//! CPU-bound and not async-safe) and hands back a [`JobHandle`]. The caller
//! keeps its own context free: it drains [`ConversionEvent`]s when convenient
//! (`next_event().await`, or `try_next_event()` from a UI tick) and collects
//! the detailed result with [`JobHandle::wait`].
//!
//! ## One job at a time
//!
//! A `Converter` refuses a second `start` while a job is running
//! ([`Pdf2PngError::JobInProgress`]). Two concurrent jobs would interleave
//! progress on the same display and race on overlapping output paths. The
//! flag is cleared before the `Completed` event is sent, so starting the next
//! job from a completion handler works.

use crate::config::ConversionConfig;
use crate::error::Pdf2PngError;
use crate::job::ConversionJob;
use crate::output::JobSummary;
use crate::pipeline::render::{PdfRasterizer, PdfiumRasterizer};
use crate::progress::{ChannelObserver, ConversionEvent, ConversionObserver};
use crate::worker;
use futures::Stream;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, info};

/// A boxed stream of worker events.
pub type EventStream = Pin<Box<dyn Stream<Item = ConversionEvent> + Send>>;

/// Starts conversion jobs on a background thread, one at a time.
///
/// Cloning is cheap; clones share the rasterizer and the busy flag.
#[derive(Clone)]
pub struct Converter {
    rasterizer: Arc<dyn PdfRasterizer>,
    config: ConversionConfig,
    busy: Arc<AtomicBool>,
}

impl Converter {
    pub fn new(rasterizer: Arc<dyn PdfRasterizer>, config: ConversionConfig) -> Self {
        Self {
            rasterizer,
            config,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Bind pdfium per `config.pdfium_library` and build a converter on it.
    pub fn with_pdfium(config: ConversionConfig) -> Result<Self, Pdf2PngError> {
        let rasterizer = PdfiumRasterizer::bind(config.pdfium_library.as_deref())?;
        Ok(Self::new(Arc::new(rasterizer), config))
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// True while a started job has not yet completed.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Start `job` on the blocking pool.
    ///
    /// # Errors
    /// * [`Pdf2PngError::JobInProgress`] if a job is already running.
    /// * [`Pdf2PngError::Internal`] if called outside a tokio runtime.
    pub fn start(&self, job: ConversionJob) -> Result<JobHandle, Pdf2PngError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            Pdf2PngError::Internal(format!("Converter::start needs a tokio runtime: {e}"))
        })?;

        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(Pdf2PngError::JobInProgress);
        }
        let guard = BusyGuard(Arc::clone(&self.busy));

        let (tx, rx) = mpsc::unbounded_channel();
        let rasterizer = Arc::clone(&self.rasterizer);
        let config = self.config.clone();
        info!("Starting job with {} PDFs", job.inputs().len());

        let task = runtime.spawn_blocking(move || {
            let observer = ChannelObserver::new(tx);
            let outcome = worker::run_guarded(&job, rasterizer.as_ref(), &config, &observer);
            drop(guard);
            observer.on_complete(outcome.is_ok());
            outcome
        });

        Ok(JobHandle { events: rx, task })
    }
}

/// Clears the busy flag when the worker finishes, including by unwinding.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// A running job: its notification channel and its final result.
pub struct JobHandle {
    events: mpsc::UnboundedReceiver<ConversionEvent>,
    task: JoinHandle<Result<JobSummary, Pdf2PngError>>,
}

impl JobHandle {
    /// Next notification, or `None` once the worker is done and every event
    /// has been received.
    pub async fn next_event(&mut self) -> Option<ConversionEvent> {
        self.events.recv().await
    }

    /// Non-blocking poll for the next notification.
    pub fn try_next_event(&mut self) -> Option<ConversionEvent> {
        self.events.try_recv().ok()
    }

    /// Split into an event stream and the task producing the result.
    pub fn into_stream(
        self,
    ) -> (
        EventStream,
        JoinHandle<Result<JobSummary, Pdf2PngError>>,
    ) {
        let stream: EventStream = Box::pin(UnboundedReceiverStream::new(self.events));
        (stream, self.task)
    }

    /// Wait for the worker and return its detailed result. Pending events
    /// are discarded.
    pub async fn wait(self) -> Result<JobSummary, Pdf2PngError> {
        self.task
            .await
            .map_err(|e| Pdf2PngError::Internal(format!("Conversion task failed: {}", e)))?
    }
}

/// Convert a job with pdfium and wait for the result.
///
/// ```rust,no_run
/// use pdf2png::{convert, ConversionConfig, ConversionJob};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let job = ConversionJob::new(["report.pdf"], "out")?;
/// let summary = convert(job, &ConversionConfig::default()).await?;
/// println!("{} pages written", summary.total_pages);
/// # Ok(())
/// # }
/// ```
pub async fn convert(
    job: ConversionJob,
    config: &ConversionConfig,
) -> Result<JobSummary, Pdf2PngError> {
    let converter = Converter::with_pdfium(config.clone())?;
    let handle = converter.start(job)?;
    handle.wait().await
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    job: ConversionJob,
    config: &ConversionConfig,
) -> Result<JobSummary, Pdf2PngError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Pdf2PngError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(job, config))
}

/// Run a job on the calling thread with a caller-supplied rasterizer.
///
/// The observer receives every notification, ending with exactly one
/// `on_complete`.
pub fn convert_blocking(
    job: &ConversionJob,
    rasterizer: &dyn PdfRasterizer,
    config: &ConversionConfig,
    observer: &dyn ConversionObserver,
) -> Result<JobSummary, Pdf2PngError> {
    debug!("Running job on the calling thread");
    worker::execute(job, rasterizer, config, observer)
}
