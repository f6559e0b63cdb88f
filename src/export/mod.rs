//! Single-image and batch export of YOLO sidecar files.
//!
//! Every image is exported independently: one image's failure (say, an
//! unwritable directory) is recorded in its own [`ExportResult`] and never
//! stops the others. There is no cross-image transaction.

mod report;

pub use report::{BatchExportResult, BatchOutcome, ExportResult};

use std::path::PathBuf;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::annotation::io_yolo::{self, DEFAULT_PRECISION};
use crate::annotation::Rectangle;
use crate::storage::AnnotationStorage;

/// Everything needed to export one image's annotations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub image_path: PathBuf,
    pub rectangles: Vec<Rectangle>,
    pub image_width: u32,
    pub image_height: u32,
}

impl ExportRequest {
    pub fn new(
        image_path: impl Into<PathBuf>,
        rectangles: Vec<Rectangle>,
        image_width: u32,
        image_height: u32,
    ) -> Self {
        Self {
            image_path: image_path.into(),
            rectangles,
            image_width,
            image_height,
        }
    }
}

/// Options for export behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Decimal places per normalized field.
    pub precision: usize,
    /// Write sidecars from a thread pool instead of one by one.
    pub parallel: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            parallel: true,
        }
    }
}

/// Exports one image's rectangles to its sidecar file.
pub fn export_image(
    storage: &dyn AnnotationStorage,
    request: &ExportRequest,
    opts: &ExportOptions,
) -> ExportResult {
    let image = request.image_path.display();

    let label_path = match io_yolo::sidecar_path(&request.image_path) {
        Ok(path) => path,
        Err(err) => {
            warn!(image = %image, "unsupported image format");
            return ExportResult::failed("Unsupported image format", err.to_string());
        }
    };

    let encoded = match io_yolo::encode_labels(
        &request.rectangles,
        request.image_width,
        request.image_height,
        opts.precision,
    ) {
        Ok(encoded) => encoded,
        Err(err) => {
            warn!(image = %image, %err, "cannot encode annotations");
            return ExportResult::failed(format!("Failed to encode annotations: {err}"), err.to_string());
        }
    };

    let skipped: Vec<String> = encoded
        .skipped
        .iter()
        .map(|id| format!("rectangle {id} has non-finite geometry; skipped"))
        .collect();

    match storage.write_text(&label_path, &encoded.text) {
        Ok(()) => {
            debug!(
                path = %label_path.display(),
                written = encoded.written,
                skipped = skipped.len(),
                "exported annotations"
            );
            ExportResult::written(label_path, encoded.written, skipped)
        }
        Err(err) => {
            warn!(path = %label_path.display(), %err, "failed to write annotations");
            ExportResult::failed(format!("Failed to write file: {err}"), err.to_string())
        }
    }
}

/// Exports every request and aggregates the outcomes.
///
/// With `opts.parallel` the requests fan out over the rayon thread pool;
/// either way the call returns only after every export has finished, and
/// `results[i]` always belongs to `requests[i]`.
pub fn export_batch(
    storage: &dyn AnnotationStorage,
    requests: &[ExportRequest],
    opts: &ExportOptions,
) -> BatchExportResult {
    let results: Vec<ExportResult> = if opts.parallel {
        requests
            .par_iter()
            .map(|request| export_image(storage, request, opts))
            .collect()
    } else {
        requests
            .iter()
            .map(|request| export_image(storage, request, opts))
            .collect()
    };

    let batch = BatchExportResult::from_results(results);
    info!(
        total = batch.total_images,
        successful = batch.successful_exports,
        failed = batch.failed_exports,
        "{}",
        batch.summary
    );
    batch
}
