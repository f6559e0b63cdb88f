//! Coordinate space marker types.
//!
//! These are zero-sized types (ZSTs) used as type parameters to distinguish
//! the drawing surface's coordinates from the source image's coordinates at
//! compile time.

use std::fmt;

/// Marker type for display-space coordinates.
///
/// Display coordinates are pixels on the interactive rendering surface,
/// which is usually scaled relative to the source image.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplaySpace {}

/// Marker type for image-space coordinates.
///
/// Image coordinates are pixels native to the original image file, with
/// (0, 0) at the top-left corner. Annotations are always stored in this
/// space.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSpace {}

impl fmt::Debug for DisplaySpace {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl fmt::Debug for ImageSpace {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}
