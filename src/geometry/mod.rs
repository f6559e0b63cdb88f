//! Geometry shared between the drawing surface and the annotation store.
//!
//! Two coordinate spaces are in play while annotating:
//!
//! - **display space**: pixels on the rendering surface, which is sized to
//!   fit the window and is usually scaled relative to the image;
//! - **image space**: pixels of the original image file.
//!
//! Points and rectangles carry their space as a type parameter, so a
//! surface coordinate cannot be stored as an annotation without passing
//! through a [`ScaleTransform`].
//!
//! # Example
//!
//! ```
//! use boxlabel::geometry::{DisplaySize, DisplaySpace, Rect, ScaleTransform};
//!
//! let transform = ScaleTransform::new(800, 600, DisplaySize::new(400.0, 300.0)).unwrap();
//! let drawn: Rect<DisplaySpace> = Rect::from_xywh(10.0, 10.0, 50.0, 50.0);
//! let stored = transform.rect_to_image_space(drawn);
//!
//! assert_eq!(stored.width, 100.0);
//! assert_eq!(transform.rect_to_display_space(stored), drawn);
//! ```

mod point;
mod rect;
mod space;
mod transform;

pub use point::Point;
pub use rect::Rect;
pub use space::{DisplaySpace, ImageSpace};
pub use transform::{
    clamp_size, drawn_rect, fit_display_size, DisplaySize, ScaleTransform, MIN_BOX_SIZE,
};
