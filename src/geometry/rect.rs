//! Axis-aligned rectangles in top-left XYWH form.

use serde::{Deserialize, Serialize};

use super::point::Point;

/// An axis-aligned rectangle stored as top-left origin plus size.
///
/// The `TSpace` parameter should be either [`DisplaySpace`](super::DisplaySpace)
/// or [`ImageSpace`](super::ImageSpace). Conversions between the two go
/// through [`ScaleTransform`](super::ScaleTransform).
///
/// Note: [`Rect::from_xywh`] does NOT reject negative sizes, so a raw drag
/// delta can be represented before it is normalized with
/// [`Rect::from_corners`] or [`Rect::normalized`].
pub struct Rect<TSpace> {
    pub origin: Point<TSpace>,
    pub width: f64,
    pub height: f64,
}

impl<TSpace> Rect<TSpace> {
    /// Creates a rectangle from an origin point and a size.
    #[inline]
    pub fn new(origin: Point<TSpace>, width: f64, height: f64) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Creates a rectangle from explicit top-left coordinates and size.
    #[inline]
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(Point::new(x, y), width, height)
    }

    /// Creates a rectangle spanning two arbitrary corner points.
    ///
    /// The corners may be given in any order: the origin becomes the
    /// per-axis minimum and the size the absolute per-axis delta. This is
    /// how a drag gesture that ends left of or above its start point is
    /// turned into a well-formed box.
    pub fn from_corners(a: Point<TSpace>, b: Point<TSpace>) -> Self {
        Self::from_xywh(
            a.x.min(b.x),
            a.y.min(b.y),
            (b.x - a.x).abs(),
            (b.y - a.y).abs(),
        )
    }

    /// Returns the left edge.
    #[inline]
    pub fn x(&self) -> f64 {
        self.origin.x
    }

    /// Returns the top edge.
    #[inline]
    pub fn y(&self) -> f64 {
        self.origin.y
    }

    /// Returns the right edge.
    #[inline]
    pub fn max_x(&self) -> f64 {
        self.origin.x + self.width
    }

    /// Returns the bottom edge.
    #[inline]
    pub fn max_y(&self) -> f64 {
        self.origin.y + self.height
    }

    /// Returns the center point.
    #[inline]
    pub fn center(&self) -> Point<TSpace> {
        Point::new(
            self.origin.x + self.width / 2.0,
            self.origin.y + self.height / 2.0,
        )
    }

    /// Returns true if the origin and size are all finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.origin.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Returns a copy with non-negative width and height, covering the
    /// same area.
    pub fn normalized(&self) -> Self {
        let far = Point::new(self.max_x(), self.max_y());
        Self::from_corners(self.origin, far)
    }

    /// Returns true if both sides are strictly larger than `min_size`.
    ///
    /// Sizes are compared by absolute value so an un-normalized drag
    /// rectangle can be checked directly.
    #[inline]
    pub fn exceeds(&self, min_size: f64) -> bool {
        self.width.abs() > min_size && self.height.abs() > min_size
    }

    /// Returns a copy moved so its top-left corner is at `origin`.
    #[inline]
    pub fn with_origin(&self, origin: Point<TSpace>) -> Self {
        Self::new(origin, self.width, self.height)
    }
}

impl<TSpace> Clone for Rect<TSpace> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<TSpace> Copy for Rect<TSpace> {}

impl<TSpace> PartialEq for Rect<TSpace> {
    fn eq(&self, other: &Self) -> bool {
        self.origin == other.origin && self.width == other.width && self.height == other.height
    }
}

impl<TSpace> std::fmt::Debug for Rect<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rect")
            .field("x", &self.origin.x)
            .field("y", &self.origin.y)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl<TSpace> Default for Rect<TSpace> {
    fn default() -> Self {
        Self::from_xywh(0.0, 0.0, 0.0, 0.0)
    }
}

// Custom serde implementation to avoid TSpace: Serialize/Deserialize bounds
impl<TSpace> Serialize for Rect<TSpace> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("Rect", 4)?;
        state.serialize_field("x", &self.origin.x)?;
        state.serialize_field("y", &self.origin.y)?;
        state.serialize_field("width", &self.width)?;
        state.serialize_field("height", &self.height)?;
        state.end()
    }
}

impl<'de, TSpace> Deserialize<'de> for Rect<TSpace> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct RectData {
            x: f64,
            y: f64,
            width: f64,
            height: f64,
        }
        let data = RectData::deserialize(deserializer)?;
        Ok(Rect::from_xywh(data.x, data.y, data.width, data.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{DisplaySpace, ImageSpace};

    #[test]
    fn test_rect_edges_and_center() {
        let rect: Rect<ImageSpace> = Rect::from_xywh(10.0, 20.0, 90.0, 60.0);
        assert_eq!(rect.x(), 10.0);
        assert_eq!(rect.y(), 20.0);
        assert_eq!(rect.max_x(), 100.0);
        assert_eq!(rect.max_y(), 80.0);
        assert_eq!(rect.center(), Point::new(55.0, 50.0));
    }

    #[test]
    fn test_from_corners_handles_reverse_drag() {
        let rect: Rect<DisplaySpace> =
            Rect::from_corners(Point::new(100.0, 100.0), Point::new(40.0, 30.0));
        assert_eq!(rect, Rect::from_xywh(40.0, 30.0, 60.0, 70.0));
    }

    #[test]
    fn test_normalized_flips_negative_sizes() {
        let raw: Rect<DisplaySpace> = Rect::from_xywh(100.0, 100.0, -60.0, -70.0);
        assert_eq!(raw.normalized(), Rect::from_xywh(40.0, 30.0, 60.0, 70.0));

        let already: Rect<DisplaySpace> = Rect::from_xywh(1.0, 2.0, 3.0, 4.0);
        assert_eq!(already.normalized(), already);
    }

    #[test]
    fn test_normalized_works_for_any_space() {
        struct Opaque;

        let raw: Rect<Opaque> = Rect::from_xywh(10.0, 10.0, -4.0, 6.0);
        let normalized = raw.normalized();
        assert_eq!(normalized, Rect::from_xywh(6.0, 10.0, 4.0, 6.0));
        assert_eq!(raw.with_origin(Point::new(0.0, 0.0)).width, -4.0);
    }

    #[test]
    fn test_exceeds_uses_absolute_size() {
        let rect: Rect<DisplaySpace> = Rect::from_xywh(0.0, 0.0, -6.0, 10.0);
        assert!(rect.exceeds(5.0));

        let thin: Rect<DisplaySpace> = Rect::from_xywh(0.0, 0.0, 3.0, 10.0);
        assert!(!thin.exceeds(5.0));

        let exact: Rect<DisplaySpace> = Rect::from_xywh(0.0, 0.0, 5.0, 5.0);
        assert!(!exact.exceeds(5.0));
    }

    #[test]
    fn test_rect_serde_shape() {
        let rect: Rect<ImageSpace> = Rect::from_xywh(1.5, 2.0, 3.0, 4.25);
        let json = serde_json::to_string(&rect).expect("serialize rect");
        assert_eq!(json, r#"{"x":1.5,"y":2.0,"width":3.0,"height":4.25}"#);

        let back: Rect<ImageSpace> = serde_json::from_str(&json).expect("deserialize rect");
        assert_eq!(back, rect);
    }
}
