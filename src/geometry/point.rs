//! Typed points using PhantomData for compile-time safety.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// A 2D point with a type-level marker for the coordinate space.
///
/// The `TSpace` parameter should be either [`DisplaySpace`](super::DisplaySpace)
/// or [`ImageSpace`](super::ImageSpace), so a point reported by the drawing
/// surface cannot be stored as an image coordinate without going through a
/// [`ScaleTransform`](super::ScaleTransform).
pub struct Point<TSpace> {
    pub x: f64,
    pub y: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> Point<TSpace> {
    /// Creates a new point with the given x and y values.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            _space: PhantomData,
        }
    }

    /// Returns true if both coordinates are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

// Manual impls so copying and comparing never require bounds on TSpace.
impl<TSpace> Clone for Point<TSpace> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<TSpace> Copy for Point<TSpace> {}

impl<TSpace> PartialEq for Point<TSpace> {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl<TSpace> std::fmt::Debug for Point<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Point")
            .field("x", &self.x)
            .field("y", &self.y)
            .finish()
    }
}

impl<TSpace> Default for Point<TSpace> {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

// Custom serde implementation to avoid TSpace: Serialize/Deserialize bounds
impl<TSpace> Serialize for Point<TSpace> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("Point", 2)?;
        state.serialize_field("x", &self.x)?;
        state.serialize_field("y", &self.y)?;
        state.end()
    }
}

impl<'de, TSpace> Deserialize<'de> for Point<TSpace> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct PointData {
            x: f64,
            y: f64,
        }
        let data = PointData::deserialize(deserializer)?;
        Ok(Point::new(data.x, data.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{DisplaySpace, ImageSpace};

    #[test]
    fn test_point_creation() {
        let point: Point<ImageSpace> = Point::new(10.0, 20.0);
        assert_eq!(point.x, 10.0);
        assert_eq!(point.y, 20.0);
    }

    #[test]
    fn test_point_is_finite() {
        let finite: Point<DisplaySpace> = Point::new(10.0, 20.0);
        assert!(finite.is_finite());

        let nan: Point<DisplaySpace> = Point::new(f64::NAN, 20.0);
        assert!(!nan.is_finite());

        let inf: Point<DisplaySpace> = Point::new(10.0, f64::INFINITY);
        assert!(!inf.is_finite());
    }

    #[test]
    fn test_point_copies_without_space_bounds() {
        struct Opaque;

        let point: Point<Opaque> = Point::new(1.0, 2.0);
        let copied = point;
        assert_eq!(point, copied);
        assert_eq!(format!("{:?}", point.clone()), "Point { x: 1.0, y: 2.0 }");
    }
}
