//! Observer trait for job progress and completion.
//!
//! The worker reports to a passive [`ConversionObserver`]. The synchronous
//! entry point [`crate::convert::convert_blocking`] calls the observer on the
//! caller's thread; [`crate::convert::Converter::start`] installs an observer
//! that forwards every notification as a [`ConversionEvent`] over a channel.
//!
//! # Contract
//!
//! For one job the observer sees `on_job_start` once, then per input file
//! `on_file_start`, `on_page_written` for each page and `on_progress` once the
//! whole file is done, and finally exactly one `on_complete`. A failing job
//! stops emitting at the point of failure and goes straight to
//! `on_complete(false)`.
//!
//! # Example
//!
//! ```rust
//! use pdf2png::ConversionObserver;
//! use std::sync::atomic::{AtomicU8, Ordering};
//!
//! struct LastPercent(AtomicU8);
//!
//! impl ConversionObserver for LastPercent {
//!     fn on_progress(&self, percent: u8) {
//!         self.0.store(percent, Ordering::SeqCst);
//!     }
//! }
//!
//! let obs = LastPercent(AtomicU8::new(0));
//! obs.on_progress(50);
//! assert_eq!(obs.0.load(Ordering::SeqCst), 50);
//! ```

use std::path::{Path, PathBuf};
use tokio::sync::mpsc::UnboundedSender;

/// Percentage of files done, truncated: `floor(done * 100 / total)`.
///
/// Returns 0 for an empty total and never exceeds 100.
pub fn percent_complete(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = done.min(total) * 100 / total;
    pct as u8
}

/// Receives job notifications from the worker.
///
/// Implementations must be `Send + Sync`: the worker runs on a blocking-pool
/// thread. All methods default to no-ops so callers only override what they
/// care about.
pub trait ConversionObserver: Send + Sync {
    /// Called once before the first input is touched.
    fn on_job_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called after an input was opened.
    ///
    /// # Arguments
    /// * `index`     : 1-based position of the file in the job
    /// * `total`     : number of files in the job
    /// * `page_count`: pages that will be rendered for this file
    fn on_file_start(&self, index: usize, total: usize, path: &Path, page_count: usize) {
        let _ = (index, total, path, page_count);
    }

    /// Called after each PNG is on disk.
    fn on_page_written(&self, file_index: usize, page: usize, page_count: usize, path: &Path) {
        let _ = (file_index, page, page_count, path);
    }

    /// Called after each whole input file, with the job-level percentage.
    fn on_progress(&self, percent: u8) {
        let _ = percent;
    }

    /// Called exactly once per job.
    fn on_complete(&self, success: bool) {
        let _ = success;
    }
}

/// An observer that ignores everything.
pub struct NoopObserver;

impl ConversionObserver for NoopObserver {}

/// Worker notifications in channel form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionEvent {
    Started {
        total_files: usize,
    },
    FileStarted {
        index: usize,
        total: usize,
        path: PathBuf,
        page_count: usize,
    },
    PageWritten {
        file_index: usize,
        page: usize,
        page_count: usize,
        path: PathBuf,
    },
    Progress(u8),
    Completed {
        success: bool,
    },
}

/// Forwards notifications into an unbounded channel. Sends after the
/// receiver is gone are dropped; the worker never blocks on the consumer.
pub(crate) struct ChannelObserver {
    tx: UnboundedSender<ConversionEvent>,
}

impl ChannelObserver {
    pub(crate) fn new(tx: UnboundedSender<ConversionEvent>) -> Self {
        Self { tx }
    }

    fn send(&self, event: ConversionEvent) {
        let _ = self.tx.send(event);
    }
}

impl ConversionObserver for ChannelObserver {
    fn on_job_start(&self, total_files: usize) {
        self.send(ConversionEvent::Started { total_files });
    }

    fn on_file_start(&self, index: usize, total: usize, path: &Path, page_count: usize) {
        self.send(ConversionEvent::FileStarted {
            index,
            total,
            path: path.to_path_buf(),
            page_count,
        });
    }

    fn on_page_written(&self, file_index: usize, page: usize, page_count: usize, path: &Path) {
        self.send(ConversionEvent::PageWritten {
            file_index,
            page,
            page_count,
            path: path.to_path_buf(),
        });
    }

    fn on_progress(&self, percent: u8) {
        self.send(ConversionEvent::Progress(percent));
    }

    fn on_complete(&self, success: bool) {
        self.send(ConversionEvent::Completed { success });
    }
}
