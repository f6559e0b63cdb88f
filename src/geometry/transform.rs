//! Display-space to image-space scaling.

use serde::{Deserialize, Serialize};

use super::point::Point;
use super::rect::Rect;
use super::space::{DisplaySpace, ImageSpace};
use crate::error::BoxlabelError;

/// Smallest side length, in display units, a drawn or resized box may have.
pub const MIN_BOX_SIZE: f64 = 5.0;

/// Size of the rendering surface in display pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplaySize {
    pub width: f64,
    pub height: f64,
}

impl DisplaySize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Computes the surface size that fits an image inside `max` while keeping
/// the image's aspect ratio.
///
/// The width is tried first; if the resulting height overflows, the height
/// is pinned to the maximum and the width derived from it instead. Images
/// smaller than `max` are scaled up to fill it.
pub fn fit_display_size(
    image_width: u32,
    image_height: u32,
    max: DisplaySize,
) -> Result<DisplaySize, BoxlabelError> {
    if image_width == 0 || image_height == 0 {
        return Err(BoxlabelError::InvalidImageDimensions {
            width: image_width,
            height: image_height,
        });
    }
    check_display_size(max)?;

    let aspect = image_width as f64 / image_height as f64;
    let mut width = max.width;
    let mut height = max.width / aspect;

    if height > max.height {
        height = max.height;
        width = max.height * aspect;
    }

    Ok(DisplaySize::new(width, height))
}

fn check_display_size(size: DisplaySize) -> Result<(), BoxlabelError> {
    let valid = size.width.is_finite()
        && size.height.is_finite()
        && size.width > 0.0
        && size.height > 0.0;
    if valid {
        Ok(())
    } else {
        Err(BoxlabelError::InvalidDisplaySize {
            width: size.width,
            height: size.height,
        })
    }
}

/// Independent per-axis scale factors between the drawing surface and the
/// source image.
///
/// `scale_x = image_width / display_width` and
/// `scale_y = image_height / display_height`. The two axes are never forced
/// to agree, so a surface whose aspect ratio differs from the image's will
/// stretch boxes rather than letterbox them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleTransform {
    scale_x: f64,
    scale_y: f64,
}

impl ScaleTransform {
    /// Builds the transform for an image shown on a surface of `display` size.
    pub fn new(
        image_width: u32,
        image_height: u32,
        display: DisplaySize,
    ) -> Result<Self, BoxlabelError> {
        if image_width == 0 || image_height == 0 {
            return Err(BoxlabelError::InvalidImageDimensions {
                width: image_width,
                height: image_height,
            });
        }
        check_display_size(display)?;

        Ok(Self {
            scale_x: image_width as f64 / display.width,
            scale_y: image_height as f64 / display.height,
        })
    }

    /// A transform where both spaces coincide.
    pub fn identity() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    #[inline]
    pub fn scale_x(&self) -> f64 {
        self.scale_x
    }

    #[inline]
    pub fn scale_y(&self) -> f64 {
        self.scale_y
    }

    /// Maps a surface point into image pixels.
    #[inline]
    pub fn to_image_space(&self, point: Point<DisplaySpace>) -> Point<ImageSpace> {
        Point::new(point.x * self.scale_x, point.y * self.scale_y)
    }

    /// Maps an image pixel position onto the surface.
    #[inline]
    pub fn to_display_space(&self, point: Point<ImageSpace>) -> Point<DisplaySpace> {
        Point::new(point.x / self.scale_x, point.y / self.scale_y)
    }

    /// Scales a display-space size into image pixels, axis by axis.
    #[inline]
    pub fn size_to_image_space(&self, width: f64, height: f64) -> (f64, f64) {
        (width * self.scale_x, height * self.scale_y)
    }

    pub fn rect_to_image_space(&self, rect: Rect<DisplaySpace>) -> Rect<ImageSpace> {
        let (width, height) = self.size_to_image_space(rect.width, rect.height);
        Rect::new(self.to_image_space(rect.origin), width, height)
    }

    pub fn rect_to_display_space(&self, rect: Rect<ImageSpace>) -> Rect<DisplaySpace> {
        Rect::new(
            self.to_display_space(rect.origin),
            rect.width / self.scale_x,
            rect.height / self.scale_y,
        )
    }
}

impl Default for ScaleTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Turns a finished draw gesture into a display-space box.
///
/// Returns `None` when either side of the dragged area is not strictly
/// larger than `min_size`; such gestures are treated as stray clicks.
pub fn drawn_rect(
    start: Point<DisplaySpace>,
    end: Point<DisplaySpace>,
    min_size: f64,
) -> Option<Rect<DisplaySpace>> {
    let rect = Rect::from_corners(start, end);
    if !rect.is_finite() || !rect.exceeds(min_size) {
        return None;
    }
    Some(rect)
}

/// Clamps a resized box's sides up to `min_size`.
///
/// Non-finite or negative sizes collapse to the minimum instead of being
/// rejected, so a wild resize never destroys the box.
pub fn clamp_size(width: f64, height: f64, min_size: f64) -> (f64, f64) {
    let clamp = |side: f64| {
        if side.is_finite() {
            side.max(min_size)
        } else {
            min_size
        }
    };
    (clamp(width), clamp(height))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform_2x() -> ScaleTransform {
        ScaleTransform::new(800, 600, DisplaySize::new(400.0, 300.0)).expect("valid transform")
    }

    #[test]
    fn scale_factors_follow_image_over_display() {
        let t = transform_2x();
        assert_eq!(t.scale_x(), 2.0);
        assert_eq!(t.scale_y(), 2.0);
    }

    #[test]
    fn rect_roundtrips_exactly_through_both_spaces() {
        let t = transform_2x();
        let display: Rect<DisplaySpace> = Rect::from_xywh(10.0, 10.0, 50.0, 50.0);

        let image = t.rect_to_image_space(display);
        assert_eq!(image, Rect::from_xywh(20.0, 20.0, 100.0, 100.0));
        assert_eq!(t.rect_to_display_space(image), display);
    }

    #[test]
    fn axes_scale_independently() {
        let t = ScaleTransform::new(1000, 300, DisplaySize::new(500.0, 300.0))
            .expect("valid transform");
        let image = t.rect_to_image_space(Rect::from_xywh(10.0, 10.0, 20.0, 20.0));
        assert_eq!(image, Rect::from_xywh(20.0, 10.0, 40.0, 20.0));
    }

    #[test]
    fn zero_sized_inputs_are_rejected() {
        assert!(matches!(
            ScaleTransform::new(0, 10, DisplaySize::new(10.0, 10.0)),
            Err(BoxlabelError::InvalidImageDimensions { .. })
        ));
        assert!(matches!(
            ScaleTransform::new(10, 10, DisplaySize::new(0.0, 10.0)),
            Err(BoxlabelError::InvalidDisplaySize { .. })
        ));
    }

    #[test]
    fn fit_prefers_full_width_for_landscape_images() {
        let size = fit_display_size(1600, 900, DisplaySize::new(800.0, 600.0)).expect("fit");
        assert_eq!(size, DisplaySize::new(800.0, 450.0));
    }

    #[test]
    fn fit_pins_height_for_portrait_images() {
        let size = fit_display_size(600, 1200, DisplaySize::new(800.0, 600.0)).expect("fit");
        assert_eq!(size, DisplaySize::new(300.0, 600.0));
    }

    #[test]
    fn drawn_rect_normalizes_reverse_drag() {
        let rect = drawn_rect(
            Point::new(100.0, 100.0),
            Point::new(40.0, 30.0),
            MIN_BOX_SIZE,
        )
        .expect("large enough");
        assert_eq!(rect, Rect::from_xywh(40.0, 30.0, 60.0, 70.0));
    }

    #[test]
    fn drawn_rect_discards_small_gestures() {
        let rect = drawn_rect(Point::new(0.0, 0.0), Point::new(3.0, 10.0), MIN_BOX_SIZE);
        assert!(rect.is_none());

        let rect = drawn_rect(Point::new(0.0, 0.0), Point::new(5.0, 5.0), MIN_BOX_SIZE);
        assert!(rect.is_none());
    }

    #[test]
    fn clamp_size_raises_to_minimum() {
        assert_eq!(clamp_size(2.0, 30.0, MIN_BOX_SIZE), (5.0, 30.0));
        assert_eq!(clamp_size(-4.0, f64::NAN, MIN_BOX_SIZE), (5.0, 5.0));
        assert_eq!(clamp_size(12.0, 8.0, MIN_BOX_SIZE), (12.0, 8.0));
    }
}
