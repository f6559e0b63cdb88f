//! Per-image annotation store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::ids::RectId;
use super::model::Rectangle;

/// Current rectangles of every loaded image, keyed by image path.
///
/// An image without rectangles is simply absent: no operation leaves an
/// empty sequence behind, so "absent" and "empty" can never be told apart.
/// Rectangles keep their insertion order within an image.
#[derive(Clone, Debug, Default)]
pub struct AnnotationStore {
    entries: BTreeMap<PathBuf, Vec<Rectangle>>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the rectangles recorded for `image`, or an empty slice.
    pub fn get(&self, image: &Path) -> &[Rectangle] {
        self.entries.get(image).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replaces the full rectangle sequence of `image`.
    pub fn set(&mut self, image: impl Into<PathBuf>, rectangles: Vec<Rectangle>) {
        let image = image.into();
        if rectangles.is_empty() {
            self.entries.remove(&image);
        } else {
            self.entries.insert(image, rectangles);
        }
    }

    /// Applies `edit` to a copy of the image's rectangles and stores the
    /// result. Returns whatever `edit` returns.
    pub fn update<R>(&mut self, image: &Path, edit: impl FnOnce(&mut Vec<Rectangle>) -> R) -> R {
        let mut rectangles = self.entries.remove(image).unwrap_or_default();
        let result = edit(&mut rectangles);
        self.set(image, rectangles);
        result
    }

    /// Removes every rectangle of one image.
    pub fn clear(&mut self, image: &Path) {
        self.entries.remove(image);
    }

    /// Removes every rectangle of every image.
    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    /// Replaces the entire store, dropping entries with no rectangles.
    pub fn load_bulk(&mut self, entries: impl IntoIterator<Item = (PathBuf, Vec<Rectangle>)>) {
        self.entries = entries
            .into_iter()
            .filter(|(_, rectangles)| !rectangles.is_empty())
            .collect();
    }

    /// Finds a rectangle by id within one image.
    pub fn find(&self, image: &Path, id: &RectId) -> Option<&Rectangle> {
        self.get(image).iter().find(|rect| &rect.id == id)
    }

    /// Iterates over images that have at least one rectangle, ordered by path.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &[Rectangle])> {
        self.entries
            .iter()
            .map(|(path, rects)| (path.as_path(), rects.as_slice()))
    }

    /// Number of images with at least one rectangle.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total rectangles across all images.
    pub fn rectangle_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}
