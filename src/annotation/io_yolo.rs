//! YOLO sidecar reader and writer.
//!
//! Each image has at most one annotation file next to it, sharing its
//! directory and base name with a `.txt` extension. Every non-blank line is
//! one box:
//!
//! ```text
//! class_id x_center y_center width height
//! ```
//!
//! with the four geometric fields normalized by the image width/height.
//! Reading is best-effort: malformed lines are skipped and a missing file
//! means "no annotations yet".

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::ids::{ClassId, RectId};
use super::model::Rectangle;
use crate::error::BoxlabelError;
use crate::geometry::Rect;
use crate::storage::AnnotationStorage;

/// Image extensions that have a sidecar, compared case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];
const LABEL_EXTENSION: &str = "txt";

/// Decimal places written for each normalized field.
pub const DEFAULT_PRECISION: usize = 6;

/// Splits a file name ending in `.<image extension>` and returns the part
/// before the final dot. A bare `.png` has an empty stem.
fn image_stem(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    let (stem, ext) = name.rsplit_once('.')?;

    IMAGE_EXTENSIONS
        .iter()
        .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        .then_some(stem)
}

/// Returns true if the file name ends in one of [`IMAGE_EXTENSIONS`].
pub fn is_supported_image(path: &Path) -> bool {
    image_stem(path).is_some()
}

/// Derives the sidecar annotation path for an image.
///
/// Only the trailing image extension changes; directory and stem are kept
/// as-is, so `/a/b/img.JPEG` maps to `/a/b/img.txt` and `/a/b/.png` to
/// `/a/b/.txt`.
pub fn sidecar_path(image_path: &Path) -> Result<PathBuf, BoxlabelError> {
    let Some(stem) = image_stem(image_path) else {
        return Err(BoxlabelError::UnsupportedImageExtension {
            path: image_path.to_path_buf(),
        });
    };
    Ok(image_path.with_file_name(format!("{stem}.{LABEL_EXTENSION}")))
}

/// Encoded YOLO text plus bookkeeping about what was written.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EncodedLabels {
    /// The file contents: one line per written box, no trailing newline.
    pub text: String,
    /// Number of boxes written.
    pub written: usize,
    /// Boxes left out because their geometry was not finite.
    pub skipped: Vec<RectId>,
}

/// Encodes rectangles as YOLO text with the default precision.
pub fn encode(
    rectangles: &[Rectangle],
    image_width: u32,
    image_height: u32,
) -> Result<String, BoxlabelError> {
    encode_labels(rectangles, image_width, image_height, DEFAULT_PRECISION)
        .map(|encoded| encoded.text)
}

/// Encodes rectangles as YOLO text, reporting any boxes that were skipped.
///
/// Each rectangle keeps its own class id. Boxes with NaN or infinite
/// geometry cannot be normalized and are left out of the text.
pub fn encode_labels(
    rectangles: &[Rectangle],
    image_width: u32,
    image_height: u32,
    precision: usize,
) -> Result<EncodedLabels, BoxlabelError> {
    if image_width == 0 || image_height == 0 {
        return Err(BoxlabelError::InvalidImageDimensions {
            width: image_width,
            height: image_height,
        });
    }

    let width = image_width as f64;
    let height = image_height as f64;
    let mut lines = Vec::with_capacity(rectangles.len());
    let mut skipped = Vec::new();

    for rect in rectangles {
        if !rect.bbox.is_finite() {
            skipped.push(rect.id.clone());
            continue;
        }

        let center = rect.bbox.center();
        lines.push(format!(
            "{} {:.p$} {:.p$} {:.p$} {:.p$}",
            rect.class_id,
            center.x / width,
            center.y / height,
            rect.bbox.width / width,
            rect.bbox.height / height,
            p = precision,
        ));
    }

    Ok(EncodedLabels {
        written: lines.len(),
        text: lines.join("\n"),
        skipped,
    })
}

/// A line that [`decode_labels`] could not turn into a box.
#[derive(Clone, Debug, PartialEq)]
pub struct SkippedLine {
    /// 1-based line number.
    pub line: usize,
    pub reason: String,
}

/// Decoded boxes plus the lines that were skipped.
#[derive(Clone, Debug, Default)]
pub struct DecodedLabels {
    pub rectangles: Vec<Rectangle>,
    pub skipped: Vec<SkippedLine>,
}

/// Decodes YOLO text into image-space rectangles, skipping bad lines.
pub fn decode(text: &str, image_width: u32, image_height: u32) -> Vec<Rectangle> {
    decode_labels(text, image_width, image_height).rectangles
}

/// Decodes YOLO text, reporting every skipped line.
///
/// Blank lines are ignored silently. Lines that do not have exactly five
/// fields, or whose fields do not parse, are recorded in
/// [`DecodedLabels::skipped`]. Every decoded box gets a fresh id.
pub fn decode_labels(text: &str, image_width: u32, image_height: u32) -> DecodedLabels {
    let width = image_width as f64;
    let height = image_height as f64;
    let mut decoded = DecodedLabels::default();

    for (line_idx, line) in text.lines().enumerate() {
        let line_num = line_idx + 1;
        let row = match parse_label_line(line) {
            Ok(Some(row)) => row,
            Ok(None) => continue,
            Err(reason) => {
                decoded.skipped.push(SkippedLine {
                    line: line_num,
                    reason,
                });
                continue;
            }
        };

        let bbox = Rect::from_xywh(
            (row.cx - row.w / 2.0) * width,
            (row.cy - row.h / 2.0) * height,
            row.w * width,
            row.h * height,
        );
        decoded.rectangles.push(Rectangle::new(bbox, row.class_id));
    }

    decoded
}

/// Loads the sidecar annotations for one image.
///
/// A missing or unreadable sidecar, or an image with an unsupported
/// extension, yields an empty list: absent annotations are the normal state
/// of a freshly loaded image.
pub fn read_annotations(
    storage: &dyn AnnotationStorage,
    image_path: &Path,
    image_width: u32,
    image_height: u32,
) -> Vec<Rectangle> {
    let label_path = match sidecar_path(image_path) {
        Ok(path) => path,
        Err(err) => {
            debug!(image = %image_path.display(), %err, "no sidecar for image");
            return Vec::new();
        }
    };

    let text = match storage.read_text(&label_path) {
        Ok(Some(text)) => text,
        Ok(None) => {
            debug!(path = %label_path.display(), "annotation file does not exist");
            return Vec::new();
        }
        Err(err) => {
            warn!(path = %label_path.display(), %err, "failed to read annotation file");
            return Vec::new();
        }
    };

    let decoded = decode_labels(&text, image_width, image_height);
    for skipped in &decoded.skipped {
        warn!(
            path = %label_path.display(),
            line = skipped.line,
            reason = %skipped.reason,
            "skipping YOLO line"
        );
    }
    debug!(
        path = %label_path.display(),
        count = decoded.rectangles.len(),
        "read annotations"
    );
    decoded.rectangles
}

#[derive(Debug, PartialEq)]
struct YoloLabelRow {
    class_id: ClassId,
    cx: f64,
    cy: f64,
    w: f64,
    h: f64,
}

fn parse_label_line(line: &str) -> Result<Option<YoloLabelRow>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    // Take at most 6 tokens so pathological inputs do not allocate unbounded memory.
    let tokens: Vec<&str> = trimmed.split_whitespace().take(6).collect();
    if tokens.len() != 5 {
        let found = if tokens.len() > 5 {
            "more than 5".to_string()
        } else {
            tokens.len().to_string()
        };
        return Err(format!("expected 5 fields, found {found}"));
    }

    let class_id = parse_class_id(tokens[0])?;
    let cx = parse_f64_token(tokens[1], "x_center")?;
    let cy = parse_f64_token(tokens[2], "y_center")?;
    let w = parse_f64_token(tokens[3], "width")?;
    let h = parse_f64_token(tokens[4], "height")?;

    Ok(Some(YoloLabelRow {
        class_id,
        cx,
        cy,
        w,
        h,
    }))
}

/// Accepts `3` as well as integral float spellings such as `3.0`.
fn parse_class_id(raw: &str) -> Result<ClassId, String> {
    if let Ok(id) = raw.parse::<u32>() {
        return Ok(ClassId(id));
    }

    match raw.parse::<f64>() {
        Ok(value) if value.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&value) => {
            Ok(ClassId(value as u32))
        }
        _ => Err(format!(
            "invalid class_id '{raw}'; expected non-negative integer"
        )),
    }
}

fn parse_f64_token(raw: &str, field_name: &str) -> Result<f64, String> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(format!(
            "invalid {field_name} '{raw}'; expected floating-point number"
        )),
    }
}

/// Fuzz-only entrypoint for YOLO text decoding.
#[cfg(feature = "fuzzing")]
pub fn fuzz_decode(input: &str) {
    let _ = decode_labels(input, 640, 480);
}
