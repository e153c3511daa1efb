//! Configuration types for PDF-to-PNG conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The defaults reproduce the classic
//! 300 DPI rasterisation, so most callers never touch the builder.

use crate::error::Pdf2PngError;
use std::path::PathBuf;

/// PDF user space is defined at 72 units per inch.
pub const PDF_POINTS_PER_INCH: f64 = 72.0;

/// Default output resolution.
pub const DEFAULT_DPI: u32 = 300;

pub const MIN_DPI: u32 = 72;
pub const MAX_DPI: u32 = 1200;

/// Configuration for a PDF-to-PNG conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2png::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .dpi(150)
///     .build()
///     .unwrap();
/// assert_eq!(config.dpi, 150);
/// ```
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Rendering DPI. Range: 72–1200. Default: 300.
    ///
    /// Pages are rendered at `dpi / 72` times their size in points, on both
    /// axes. A US Letter page at 300 DPI becomes 2550 × 3300 px.
    pub dpi: u32,

    /// PDF user password for encrypted documents. Applied to every input.
    pub password: Option<String>,

    /// Explicit pdfium shared library (file) or the directory containing it.
    /// If None, see [`crate::engine::bind_pdfium`] for the search order.
    pub pdfium_library: Option<PathBuf>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            password: None,
            pdfium_library: None,
        }
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Scale factor from PDF points to output pixels.
    pub fn scale(&self) -> f64 {
        f64::from(self.dpi) / PDF_POINTS_PER_INCH
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(MIN_DPI, MAX_DPI);
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn pdfium_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_library = Some(path.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2PngError> {
        let c = &self.config;
        if c.dpi < MIN_DPI || c.dpi > MAX_DPI {
            return Err(Pdf2PngError::InvalidConfig(format!(
                "DPI must be {MIN_DPI}–{MAX_DPI}, got {}",
                c.dpi
            )));
        }
        if let Some(ref lib) = c.pdfium_library {
            if lib.as_os_str().is_empty() {
                return Err(Pdf2PngError::InvalidConfig(
                    "pdfium library path is empty".into(),
                ));
            }
        }
        Ok(self.config)
    }
}
