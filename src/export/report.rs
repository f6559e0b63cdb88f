//! Export report types for per-image and batch outcomes.
//!
//! Every image gets its own [`ExportResult`]; a [`BatchExportResult`]
//! aggregates them and carries the summary shown to the user.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Outcome of exporting one image's annotations.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExportResult {
    pub success: bool,
    /// Human-readable summary of what happened.
    pub message: String,
    /// Sidecar path that was written, if any.
    pub file_path: Option<PathBuf>,
    /// Number of rectangles written to the sidecar.
    pub rectangles_processed: usize,
    /// Problems encountered; non-empty on failure, and may also list
    /// rectangles skipped during a successful export.
    pub errors: Vec<String>,
}

impl ExportResult {
    /// A successful export of `written` rectangles to `file_path`.
    pub fn written(file_path: PathBuf, written: usize, errors: Vec<String>) -> Self {
        Self {
            success: true,
            message: "YOLO annotations exported successfully".to_string(),
            file_path: Some(file_path),
            rectangles_processed: written,
            errors,
        }
    }

    /// A failed export; nothing was written.
    pub fn failed(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            file_path: None,
            rectangles_processed: 0,
            errors: vec![error.into()],
        }
    }
}

impl fmt::Display for ExportResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file_path, self.success) {
            (Some(path), true) => write!(
                f,
                "{} ({} box(es) -> {})",
                self.message,
                self.rectangles_processed,
                path.display()
            ),
            _ => write!(f, "{}", self.message),
        }
    }
}

/// Coarse outcome of a batch, used to pick the user notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOutcome {
    /// Nothing was exported because no image had annotations.
    Empty,
    AllSucceeded,
    PartialFailure,
    TotalFailure,
}

/// Aggregate over a batch of per-image exports.
///
/// `results` is in the same order as the requests that produced it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BatchExportResult {
    pub total_images: usize,
    pub successful_exports: usize,
    pub failed_exports: usize,
    pub results: Vec<ExportResult>,
    pub summary: String,
}

impl BatchExportResult {
    /// Aggregates ordered per-image results.
    pub fn from_results(results: Vec<ExportResult>) -> Self {
        let total_images = results.len();
        let successful_exports = results.iter().filter(|r| r.success).count();
        let failed_exports = total_images - successful_exports;

        let summary = if total_images == 0 {
            "No annotations to export".to_string()
        } else if failed_exports == 0 {
            format!(
                "Successfully exported {} YOLO annotation files",
                successful_exports
            )
        } else if successful_exports > 0 {
            format!(
                "Exported {}/{} YOLO annotation files ({} failed)",
                successful_exports, total_images, failed_exports
            )
        } else {
            let errors: Vec<&str> = results.iter().map(|r| r.message.as_str()).collect();
            format!(
                "Failed to export any YOLO annotations. Errors: {}",
                errors.join(", ")
            )
        };

        Self {
            total_images,
            successful_exports,
            failed_exports,
            results,
            summary,
        }
    }

    pub fn outcome(&self) -> BatchOutcome {
        if self.total_images == 0 {
            BatchOutcome::Empty
        } else if self.failed_exports == 0 {
            BatchOutcome::AllSucceeded
        } else if self.successful_exports > 0 {
            BatchOutcome::PartialFailure
        } else {
            BatchOutcome::TotalFailure
        }
    }

    /// Returns true if every requested image was written.
    pub fn is_ok(&self) -> bool {
        self.failed_exports == 0
    }

    /// Iterate over failed results.
    pub fn failures(&self) -> impl Iterator<Item = &ExportResult> {
        self.results.iter().filter(|r| !r.success)
    }
}

impl fmt::Display for BatchExportResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary)?;

        if self.failed_exports > 0 {
            writeln!(f)?;
            writeln!(f, "Failures ({}):", self.failed_exports)?;
            for result in self.failures() {
                writeln!(f, "  - {}", result.message)?;
            }
        }

        Ok(())
    }
}
