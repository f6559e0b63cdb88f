//! Annotation model: rectangles, their presentation, and loaded images.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::ids::{ClassId, RectId};
use crate::geometry::{ImageSpace, Rect};

/// A bounding box placed on one image.
///
/// The box is always held in image space; display-space values only exist
/// transiently on the rendering surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    /// Opaque identifier used for selection, update, and delete.
    #[serde(default = "RectId::generate")]
    pub id: RectId,

    /// Top-left origin and size in image pixels.
    pub bbox: Rect<ImageSpace>,

    /// Class index; defaults to 0 when unset.
    #[serde(default)]
    pub class_id: ClassId,

    /// Cosmetic attributes kept for round-trip fidelity within a session.
    #[serde(default)]
    pub style: RectStyle,
}

impl Rectangle {
    /// Creates a rectangle with a freshly generated id and default styling.
    pub fn new(bbox: Rect<ImageSpace>, class_id: impl Into<ClassId>) -> Self {
        Self {
            id: RectId::generate(),
            bbox,
            class_id: class_id.into(),
            style: RectStyle::default(),
        }
    }

    /// Creates a rectangle with an explicit id.
    pub fn with_id(
        id: impl Into<RectId>,
        bbox: Rect<ImageSpace>,
        class_id: impl Into<ClassId>,
    ) -> Self {
        Self {
            id: id.into(),
            bbox,
            class_id: class_id.into(),
            style: RectStyle::default(),
        }
    }
}

/// Presentation attributes of a rectangle on the drawing surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RectStyle {
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
    pub draggable: bool,
}

impl Default for RectStyle {
    fn default() -> Self {
        Self {
            fill: "rgba(0, 123, 255, 0.2)".to_string(),
            stroke: "#007bff".to_string(),
            stroke_width: 2.0,
            draggable: true,
        }
    }
}

/// One loaded image, identified by its path.
///
/// Decoded pixel data belongs to the rendering layer and is not held here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    /// Path of the image file; doubles as the store key.
    pub path: PathBuf,

    /// Width of the image in pixels.
    pub width: u32,

    /// Height of the image in pixels.
    pub height: u32,
}

impl ImageEntry {
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
        }
    }

    /// Returns the file name for display, falling back to the full path.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rectangles_get_distinct_ids() {
        let bbox = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        let a = Rectangle::new(bbox, 0u32);
        let b = Rectangle::new(bbox, 0u32);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn deserialize_fills_defaults() {
        let json = r#"{"bbox": {"x": 1.0, "y": 2.0, "width": 3.0, "height": 4.0}}"#;
        let rect: Rectangle = serde_json::from_str(json).expect("parse rectangle");
        assert_eq!(rect.class_id, ClassId(0));
        assert_eq!(rect.style, RectStyle::default());
        assert!(rect.id.as_str().starts_with("rect_"));
    }

    #[test]
    fn image_entry_name_uses_file_name() {
        let entry = ImageEntry::new("/data/set/cat.png", 10, 10);
        assert_eq!(entry.name(), "cat.png");
    }
}
