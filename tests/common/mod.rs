//! Shared fixtures: a rasterizer that needs no pdfium, and a recording observer.
#![allow(dead_code)]

use image::{DynamicImage, Rgba, RgbaImage};
use pdf2png::{ConversionEvent, ConversionObserver, PageSize, Pdf2PngError, PdfRasterizer, RasterDocument};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex};

/// 72 × 36 pt: renders to 300 × 150 px at the default 300 DPI.
pub const SMALL_PAGE: (f32, f32) = (72.0, 36.0);
pub const LETTER: (f32, f32) = (612.0, 792.0);
pub const A4: (f32, f32) = (595.276, 841.89);

/// Blocks `open` until released.
#[derive(Default)]
pub struct Gate {
    open: Mutex<bool>,
    cv: Condvar,
}

impl Gate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn wait(&self) {
        let mut open = self.open.lock().unwrap();
        while !*open {
            open = self.cv.wait(open).unwrap();
        }
    }

    pub fn release(&self) {
        *self.open.lock().unwrap() = true;
        self.cv.notify_all();
    }
}

/// Serves registered "PDFs" by path. Registered files exist on disk with a
/// `%PDF-` header so they pass the input checks; anything else fails to open.
/// With [`with_password`](Self::with_password) every open checks the password.
#[derive(Default)]
pub struct FakeRasterizer {
    docs: HashMap<PathBuf, Vec<PageSize>>,
    fail_on: Option<(PathBuf, usize)>,
    gate: Option<Arc<Gate>>,
    password: Option<String>,
    opened: Mutex<Vec<PathBuf>>,
}

impl FakeRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `dir/name` and register it with the given page sizes (points).
    pub fn add_pdf(
        &mut self,
        dir: &Path,
        name: impl AsRef<Path>,
        pages: &[(f32, f32)],
    ) -> PathBuf {
        self.add_pdf_bytes(dir, name, b"%PDF-1.4\n% fake\n", pages)
    }

    /// Like [`add_pdf`](Self::add_pdf) with explicit file contents.
    pub fn add_pdf_bytes(
        &mut self,
        dir: &Path,
        name: impl AsRef<Path>,
        bytes: &[u8],
        pages: &[(f32, f32)],
    ) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        self.docs.insert(
            path.clone(),
            pages.iter().map(|&(w, h)| PageSize::new(w, h)).collect(),
        );
        path
    }

    /// Fail rendering of 1-based `page` of `path`.
    pub fn fail_render(mut self, path: &Path, page: usize) -> Self {
        self.fail_on = Some((path.to_path_buf(), page));
        self
    }

    /// Every document needs `password` to open.
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    pub fn gated(mut self, gate: Arc<Gate>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Paths passed to `open`, in order.
    pub fn opened(&self) -> Vec<PathBuf> {
        self.opened.lock().unwrap().clone()
    }
}

struct FakeDocument<'a> {
    path: PathBuf,
    password: Option<&'a str>,
    pages: &'a [PageSize],
    fail_page: Option<usize>,
}

impl PdfRasterizer for FakeRasterizer {
    fn open<'a>(
        &'a self,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<Box<dyn RasterDocument + 'a>, Pdf2PngError> {
        if let Some(ref gate) = self.gate {
            gate.wait();
        }
        self.opened.lock().unwrap().push(path.to_path_buf());

        let pages = self.docs.get(path).ok_or_else(|| Pdf2PngError::CorruptPdf {
            path: path.to_path_buf(),
            detail: "not registered with the fake".into(),
        })?;
        match (self.password.as_deref(), password) {
            (Some(_), None) => {
                return Err(Pdf2PngError::PasswordRequired {
                    path: path.to_path_buf(),
                })
            }
            (Some(expected), Some(given)) if expected != given => {
                return Err(Pdf2PngError::WrongPassword {
                    path: path.to_path_buf(),
                })
            }
            _ => {}
        }

        let fail_page = self
            .fail_on
            .as_ref()
            .filter(|(p, _)| p == path)
            .map(|&(_, page)| page);

        Ok(Box::new(FakeDocument {
            path: path.to_path_buf(),
            password,
            pages,
            fail_page,
        }))
    }
}

impl RasterDocument for FakeDocument<'_> {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn render_page(&self, index: usize, scale: f64) -> Result<DynamicImage, Pdf2PngError> {
        if self.fail_page == Some(index + 1) {
            return Err(Pdf2PngError::RasterisationFailed {
                path: self.path.clone(),
                page: index + 1,
                detail: "injected failure".into(),
            });
        }
        let (w, h) = self.pages[index].scaled(scale);
        let shade = (index * 40 % 256) as u8;
        Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            w,
            h,
            Rgba([shade, shade, shade, 255]),
        )))
    }
}

/// Records every notification as a [`ConversionEvent`].
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ConversionEvent>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<ConversionEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn progress(&self) -> Vec<u8> {
        progress_of(&self.events())
    }

    pub fn completions(&self) -> Vec<bool> {
        completions_of(&self.events())
    }

    fn push(&self, e: ConversionEvent) {
        self.events.lock().unwrap().push(e);
    }
}

impl ConversionObserver for RecordingObserver {
    fn on_job_start(&self, total_files: usize) {
        self.push(ConversionEvent::Started { total_files });
    }

    fn on_file_start(&self, index: usize, total: usize, path: &Path, page_count: usize) {
        self.push(ConversionEvent::FileStarted {
            index,
            total,
            path: path.to_path_buf(),
            page_count,
        });
    }

    fn on_page_written(&self, file_index: usize, page: usize, page_count: usize, path: &Path) {
        self.push(ConversionEvent::PageWritten {
            file_index,
            page,
            page_count,
            path: path.to_path_buf(),
        });
    }

    fn on_progress(&self, percent: u8) {
        self.push(ConversionEvent::Progress(percent));
    }

    fn on_complete(&self, success: bool) {
        self.push(ConversionEvent::Completed { success });
    }
}

pub fn progress_of(events: &[ConversionEvent]) -> Vec<u8> {
    events
        .iter()
        .filter_map(|e| match e {
            ConversionEvent::Progress(p) => Some(*p),
            _ => None,
        })
        .collect()
}

pub fn completions_of(events: &[ConversionEvent]) -> Vec<bool> {
    events
        .iter()
        .filter_map(|e| match e {
            ConversionEvent::Completed { success } => Some(*success),
            _ => None,
        })
        .collect()
}

/// Sorted file names directly inside `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
