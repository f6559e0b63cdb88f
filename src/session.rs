//! Annotation session: the state behind one interactive annotator window.
//!
//! A [`Session`] owns the loaded images, the [`AnnotationStore`], the
//! [`ClassRegistry`], the selected image, and the active
//! [`ScaleTransform`]. The rendering layer drives it with [`CanvasEvent`]s
//! in display space and reads back [`DisplayRectangle`]s to draw.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::annotation::io_yolo::{self, DEFAULT_PRECISION};
use crate::annotation::{AnnotationStore, ClassId, ClassRegistry, ImageEntry, RectId, Rectangle};
use crate::error::BoxlabelError;
use crate::export::{self, BatchExportResult, ExportOptions, ExportRequest, ExportResult};
use crate::geometry::{
    clamp_size, drawn_rect, fit_display_size, DisplaySize, DisplaySpace, ImageSpace, Point, Rect,
    ScaleTransform, MIN_BOX_SIZE,
};
use crate::storage::AnnotationStorage;

/// Tunables for a session.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Minimum box side, in display units, for drawing and resizing.
    pub min_box_size: f64,
    /// Largest surface the image is fitted into.
    pub max_display_width: f64,
    pub max_display_height: f64,
    /// Decimal places per normalized field in exported sidecars.
    pub precision: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_box_size: MIN_BOX_SIZE,
            max_display_width: 800.0,
            max_display_height: 600.0,
            precision: DEFAULT_PRECISION,
        }
    }
}

impl SessionConfig {
    pub fn max_display(&self) -> DisplaySize {
        DisplaySize::new(self.max_display_width, self.max_display_height)
    }
}

/// An edit reported by the rendering surface.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasEvent {
    /// A draw gesture ended; corners may be in any order.
    Drawn {
        start: Point<DisplaySpace>,
        end: Point<DisplaySpace>,
    },
    /// A box was dragged; the surface reports the new origin already
    /// resolved to image space.
    Moved { id: RectId, to: Point<ImageSpace> },
    /// A box was dragged, reported as a surface position.
    MovedOnSurface {
        id: RectId,
        to: Point<DisplaySpace>,
    },
    /// A box's handles were pulled to a new surface size.
    Resized {
        id: RectId,
        width: f64,
        height: f64,
    },
    Deleted { id: RectId },
    ClassChanged { id: RectId, class_id: ClassId },
}

/// What applying a [`CanvasEvent`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventOutcome {
    Created(RectId),
    /// The gesture was too small to be a box.
    Ignored,
    Updated(RectId),
    Removed(RectId),
}

/// A rectangle as the rendering surface should draw it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DisplayRectangle {
    pub id: RectId,
    pub rect: Rect<DisplaySpace>,
    pub class_id: ClassId,
    pub label: String,
}

/// State of one annotation session.
#[derive(Debug, Default)]
pub struct Session {
    config: SessionConfig,
    images: Vec<ImageEntry>,
    store: AnnotationStore,
    classes: ClassRegistry,
    selected: Option<usize>,
    display: Option<DisplaySize>,
    transform: ScaleTransform,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    pub fn images(&self) -> &[ImageEntry] {
        &self.images
    }

    /// Replaces the class names; the selected class resets to 0.
    pub fn load_classes<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes.load(names);
    }

    /// Selects the class new boxes are tagged with.
    pub fn select_class(&mut self, class_id: ClassId) -> bool {
        self.classes.select(class_id)
    }

    /// Display label for a class id.
    pub fn label_for(&self, class_id: ClassId) -> String {
        self.classes.name_for(class_id)
    }

    /// Replaces the loaded images and pre-populates the store from their
    /// sidecar files. The first image becomes selected.
    ///
    /// Images with a zero width or height cannot be displayed or exported;
    /// they are skipped with a warning instead of failing the whole load.
    pub fn load_images(
        &mut self,
        images: Vec<ImageEntry>,
        storage: &dyn AnnotationStorage,
    ) -> Result<(), BoxlabelError> {
        let (images, unusable): (Vec<ImageEntry>, Vec<ImageEntry>) = images
            .into_iter()
            .partition(|image| image.width > 0 && image.height > 0);
        for image in &unusable {
            warn!(
                image = %image.path.display(),
                width = image.width,
                height = image.height,
                "skipping image with a zero dimension"
            );
        }

        let entries: Vec<(PathBuf, Vec<Rectangle>)> = images
            .iter()
            .map(|image| {
                let rectangles =
                    io_yolo::read_annotations(storage, &image.path, image.width, image.height);
                (image.path.clone(), rectangles)
            })
            .collect();

        self.store.load_bulk(entries);
        self.images = images;
        self.selected = None;
        self.display = None;
        self.transform = ScaleTransform::identity();
        info!(
            images = self.images.len(),
            annotated = self.store.len(),
            rectangles = self.store.rectangle_count(),
            "loaded images"
        );

        if let Some(first) = self.images.first() {
            let path = first.path.clone();
            self.select_image(&path)?;
        }
        Ok(())
    }

    /// Makes `path` the displayed image and fits the surface to it.
    pub fn select_image(&mut self, path: &Path) -> Result<(), BoxlabelError> {
        let index = self
            .images
            .iter()
            .position(|image| image.path == path)
            .ok_or_else(|| BoxlabelError::UnknownImage {
                path: path.to_path_buf(),
            })?;

        let image = &self.images[index];
        let fitted = fit_display_size(image.width, image.height, self.config.max_display())?;
        self.transform = ScaleTransform::new(image.width, image.height, fitted)?;
        self.display = Some(fitted);
        self.selected = Some(index);
        debug!(
            image = %path.display(),
            width = fitted.width,
            height = fitted.height,
            "selected image"
        );
        Ok(())
    }

    /// Recomputes the scale factors after the surface was resized.
    pub fn resize_display(&mut self, display: DisplaySize) -> Result<(), BoxlabelError> {
        let (width, height) = self
            .selected_image()
            .map(|image| (image.width, image.height))
            .ok_or(BoxlabelError::NoImageSelected)?;
        self.transform = ScaleTransform::new(width, height, display)?;
        self.display = Some(display);
        Ok(())
    }

    pub fn selected_image(&self) -> Option<&ImageEntry> {
        self.selected.map(|index| &self.images[index])
    }

    /// Surface size of the selected image.
    pub fn display_size(&self) -> Option<DisplaySize> {
        self.display
    }

    /// Active display-to-image scale factors.
    pub fn transform(&self) -> ScaleTransform {
        self.transform
    }

    /// Image-space rectangles of the selected image.
    pub fn current_rectangles(&self) -> &[Rectangle] {
        match self.selected_image() {
            Some(image) => self.store.get(&image.path),
            None => &[],
        }
    }

    /// Rectangles of the selected image, converted for drawing and labeled.
    pub fn display_rectangles(&self) -> Vec<DisplayRectangle> {
        self.current_rectangles()
            .iter()
            .map(|rect| DisplayRectangle {
                id: rect.id.clone(),
                rect: self.transform.rect_to_display_space(rect.bbox),
                class_id: rect.class_id,
                label: self.classes.name_for(rect.class_id),
            })
            .collect()
    }

    /// Applies one edit from the rendering surface to the selected image.
    pub fn apply(&mut self, event: CanvasEvent) -> Result<EventOutcome, BoxlabelError> {
        let image = self
            .selected_image()
            .map(|image| image.path.clone())
            .ok_or(BoxlabelError::NoImageSelected)?;
        let transform = self.transform;
        let min_size = self.config.min_box_size;

        match event {
            CanvasEvent::Drawn { start, end } => {
                let Some(rect) = drawn_rect(start, end, min_size) else {
                    debug!(?start, ?end, "ignoring draw gesture below minimum size");
                    return Ok(EventOutcome::Ignored);
                };
                let rectangle =
                    Rectangle::new(transform.rect_to_image_space(rect), self.classes.selected());
                let id = rectangle.id.clone();
                self.store.update(&image, |rects| rects.push(rectangle));
                Ok(EventOutcome::Created(id))
            }
            CanvasEvent::Moved { id, to } => {
                self.edit(&image, id, |rect| rect.bbox = rect.bbox.with_origin(to))
            }
            CanvasEvent::MovedOnSurface { id, to } => {
                let to = transform.to_image_space(to);
                self.edit(&image, id, |rect| rect.bbox = rect.bbox.with_origin(to))
            }
            CanvasEvent::Resized { id, width, height } => {
                let (width, height) = clamp_size(width, height, min_size);
                let (width, height) = transform.size_to_image_space(width, height);
                self.edit(&image, id, |rect| {
                    rect.bbox = Rect::new(rect.bbox.origin, width, height)
                })
            }
            CanvasEvent::ClassChanged { id, class_id } => {
                self.edit(&image, id, |rect| rect.class_id = class_id)
            }
            CanvasEvent::Deleted { id } => {
                let removed = self.store.update(&image, |rects| {
                    let before = rects.len();
                    rects.retain(|rect| rect.id != id);
                    rects.len() != before
                });
                if removed {
                    Ok(EventOutcome::Removed(id))
                } else {
                    Err(BoxlabelError::UnknownRectangle { id: id.to_string() })
                }
            }
        }
    }

    fn edit(
        &mut self,
        image: &Path,
        id: RectId,
        change: impl FnOnce(&mut Rectangle),
    ) -> Result<EventOutcome, BoxlabelError> {
        let found = self.store.update(image, |rects| {
            match rects.iter_mut().find(|rect| rect.id == id) {
                Some(rect) => {
                    change(rect);
                    true
                }
                None => false,
            }
        });
        if found {
            Ok(EventOutcome::Updated(id))
        } else {
            Err(BoxlabelError::UnknownRectangle { id: id.to_string() })
        }
    }

    /// Removes every rectangle of the selected image.
    pub fn clear_current(&mut self) -> Result<(), BoxlabelError> {
        let image = self
            .selected_image()
            .map(|image| image.path.clone())
            .ok_or(BoxlabelError::NoImageSelected)?;
        self.store.clear(&image);
        Ok(())
    }

    /// Removes every rectangle of every image.
    pub fn clear_all(&mut self) {
        self.store.clear_all();
    }

    /// Export requests for every loaded image with at least one rectangle,
    /// in image load order.
    pub fn export_requests(&self) -> Vec<ExportRequest> {
        self.images
            .iter()
            .filter_map(|image| {
                let rectangles = self.store.get(&image.path);
                if rectangles.is_empty() {
                    return None;
                }
                Some(ExportRequest::new(
                    image.path.clone(),
                    rectangles.to_vec(),
                    image.width,
                    image.height,
                ))
            })
            .collect()
    }

    fn export_options(&self) -> ExportOptions {
        ExportOptions {
            precision: self.config.precision,
            ..Default::default()
        }
    }

    /// Exports the selected image's sidecar.
    pub fn export_current(
        &self,
        storage: &dyn AnnotationStorage,
    ) -> Result<ExportResult, BoxlabelError> {
        let image = self.selected_image().ok_or(BoxlabelError::NoImageSelected)?;
        let request = ExportRequest::new(
            image.path.clone(),
            self.store.get(&image.path).to_vec(),
            image.width,
            image.height,
        );
        Ok(export::export_image(storage, &request, &self.export_options()))
    }

    /// Exports every annotated image. Images without rectangles are skipped
    /// and do not appear in the result.
    pub fn export_all(&self, storage: &dyn AnnotationStorage) -> BatchExportResult {
        export::export_batch(storage, &self.export_requests(), &self.export_options())
    }
}
