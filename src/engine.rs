//! Locate and bind the pdfium shared library.
//!
//! pdfium is loaded at runtime, not linked. [`bind_pdfium`] tries, in order:
//!
//! 1. the explicit path from [`crate::ConversionConfig::pdfium_library`]
//!    (a library file, or a directory containing one)
//! 2. `PDFIUM_LIB_PATH` (same rules)
//! 3. the executable's directory and its `libs/` sub-directory
//! 4. the current directory and `./libs`
//! 5. the system library search path
//!
//! An explicit path that fails to bind is an error; it never falls through to
//! the search, so a typo does not silently pick up another pdfium.

use crate::error::Pdf2PngError;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming a pdfium library file or its directory.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Candidate directories searched when nothing explicit is configured.
pub fn search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(exe) = std::env::current_exe() {
        if let Some(exe_dir) = exe.parent() {
            dirs.push(exe_dir.to_path_buf());
            dirs.push(exe_dir.join("libs"));
        }
    }

    dirs.push(PathBuf::from("./"));
    dirs.push(PathBuf::from("libs"));
    dirs
}

/// Resolve a user-supplied path to the library file pdfium should load.
///
/// Directories are completed with the platform library name
/// (`libpdfium.so`, `libpdfium.dylib`, `pdfium.dll`).
pub fn library_file(path: &Path) -> PathBuf {
    if path.is_dir() {
        Pdfium::pdfium_platform_library_name_at_path(path)
    } else {
        path.to_path_buf()
    }
}

/// Bind pdfium following the order described in the module docs.
pub fn bind_pdfium(explicit: Option<&Path>) -> Result<Pdfium, Pdf2PngError> {
    if let Some(path) = explicit {
        return bind_file(&library_file(path));
    }

    if let Ok(env_path) = std::env::var(PDFIUM_LIB_PATH_ENV) {
        if !env_path.is_empty() {
            return bind_file(&library_file(Path::new(&env_path)));
        }
    }

    for dir in search_dirs() {
        let lib_path = Pdfium::pdfium_platform_library_name_at_path(&dir);
        if !lib_path.exists() {
            continue;
        }
        debug!("Trying pdfium at {}", lib_path.display());
        if let Ok(bindings) = Pdfium::bind_to_library(&lib_path) {
            info!("Bound pdfium from {}", lib_path.display());
            return Ok(Pdfium::new(bindings));
        }
    }

    debug!("Trying system pdfium library");
    Pdfium::bind_to_system_library()
        .map(Pdfium::new)
        .map_err(|e| Pdf2PngError::PdfiumBindingFailed(format!("no pdfium found ({e})")))
}

fn bind_file(lib_path: &Path) -> Result<Pdfium, Pdf2PngError> {
    if !lib_path.exists() {
        return Err(Pdf2PngError::PdfiumBindingFailed(format!(
            "'{}' does not exist",
            lib_path.display()
        )));
    }
    let bindings = Pdfium::bind_to_library(lib_path).map_err(|e| {
        Pdf2PngError::PdfiumBindingFailed(format!("'{}': {e}", lib_path.display()))
    })?;
    info!("Bound pdfium from {}", lib_path.display());
    Ok(Pdfium::new(bindings))
}
