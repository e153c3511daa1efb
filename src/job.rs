//! The unit of work handed to the worker: which PDFs, and where to put them.

use crate::error::ValidationError;
use crate::output;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// One user-initiated batch: an ordered list of input PDFs and the directory
/// that will receive one sub-directory per input.
///
/// Construction validates the selection, so holding a `ConversionJob` means
/// the shell is allowed to start a worker.
///
/// ```rust
/// use pdf2png::{ConversionJob, ValidationError};
///
/// let job = ConversionJob::new(["a.pdf", "b.pdf"], "/tmp/out").unwrap();
/// assert_eq!(job.inputs().len(), 2);
///
/// let empty: [&str; 0] = [];
/// assert_eq!(
///     ConversionJob::new(empty, "/tmp/out").unwrap_err(),
///     ValidationError::NoInputFiles
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    inputs: Vec<PathBuf>,
    output_dir: PathBuf,
}

impl ConversionJob {
    /// Validate a selection. Inputs are checked before the output directory.
    pub fn new<I, P>(inputs: I, output_dir: impl Into<PathBuf>) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let inputs: Vec<PathBuf> = inputs.into_iter().map(Into::into).collect();
        if inputs.is_empty() {
            return Err(ValidationError::NoInputFiles);
        }
        if let Some(index) = inputs.iter().position(|p| p.as_os_str().is_empty()) {
            return Err(ValidationError::EmptyInputPath { index });
        }

        let output_dir = output_dir.into();
        if output_dir.as_os_str().is_empty() {
            return Err(ValidationError::NoOutputDirectory);
        }

        Ok(Self { inputs, output_dir })
    }

    pub fn inputs(&self) -> &[PathBuf] {
        &self.inputs
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Base names shared by more than one input, with the inputs that share
    /// them. Those inputs write into the same sub-directory and the later one
    /// overwrites the earlier one's pages.
    pub fn colliding_names(&self) -> BTreeMap<OsString, Vec<&Path>> {
        let mut by_name: BTreeMap<OsString, Vec<&Path>> = BTreeMap::new();
        for input in &self.inputs {
            if let Ok(name) = output::base_name(input) {
                by_name.entry(name).or_default().push(input.as_path());
            }
        }
        by_name.retain(|_, paths| paths.len() > 1);
        by_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_selection() {
        let none: Vec<PathBuf> = Vec::new();
        assert_eq!(
            ConversionJob::new(none, "/out").unwrap_err(),
            ValidationError::NoInputFiles
        );
    }

    #[test]
    fn rejects_empty_output_dir() {
        assert_eq!(
            ConversionJob::new(["a.pdf"], "").unwrap_err(),
            ValidationError::NoOutputDirectory
        );
    }

    #[test]
    fn inputs_are_checked_before_output_dir() {
        let none: Vec<PathBuf> = Vec::new();
        assert_eq!(
            ConversionJob::new(none, "").unwrap_err(),
            ValidationError::NoInputFiles
        );
    }

    #[test]
    fn rejects_empty_input_entry() {
        assert_eq!(
            ConversionJob::new(["a.pdf", "", "c.pdf"], "/out").unwrap_err(),
            ValidationError::EmptyInputPath { index: 1 }
        );
    }

    #[test]
    fn keeps_input_order() {
        let job = ConversionJob::new(["z.pdf", "a.pdf", "m.pdf"], "/out").unwrap();
        let names: Vec<_> = job
            .inputs()
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["z.pdf", "a.pdf", "m.pdf"]);
        assert_eq!(job.output_dir(), Path::new("/out"));
    }

    #[test]
    fn detects_base_name_collisions() {
        let job =
            ConversionJob::new(["/a/report.pdf", "/b/report.pdf", "/c/other.pdf"], "/out").unwrap();
        let collisions = job.colliding_names();
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[std::ffi::OsStr::new("report")].len(), 2);
    }
}
