//! Annotation data and its persistence.
//!
//! - [`Rectangle`]: one image-space box with a class and cosmetic style.
//! - [`AnnotationStore`]: current rectangles of every loaded image.
//! - [`ClassRegistry`]: class names and the class selected for new boxes.
//! - [`io_yolo`]: the YOLO sidecar codec.
//!
//! # Example
//!
//! ```
//! use boxlabel::annotation::{io_yolo, Rectangle};
//! use boxlabel::geometry::Rect;
//!
//! let boxes = vec![Rectangle::new(Rect::from_xywh(100.0, 50.0, 200.0, 100.0), 1u32)];
//! let text = io_yolo::encode(&boxes, 400, 200).unwrap();
//! assert_eq!(text, "1 0.500000 0.500000 0.500000 0.500000");
//!
//! let decoded = io_yolo::decode(&text, 400, 200);
//! assert_eq!(decoded[0].class_id, boxes[0].class_id);
//! ```

mod classes;
mod ids;
pub mod io_yolo;
mod model;
mod store;

pub use classes::{read_classes_txt, read_data_yaml_names, ClassRegistry};
pub use ids::{ClassId, RectId};
pub use model::{ImageEntry, RectStyle, Rectangle};
pub use store::AnnotationStore;
