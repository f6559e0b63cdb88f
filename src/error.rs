use std::path::PathBuf;
use thiserror::Error;

/// The main error type for boxlabel operations.
#[derive(Debug, Error)]
pub enum BoxlabelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read {path}: {source}")]
    ReadText {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteText {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported image format: {path} (expected .jpg, .jpeg or .png)")]
    UnsupportedImageExtension { path: PathBuf },

    #[error("Invalid image dimensions {width}x{height} (must be positive)")]
    InvalidImageDimensions { width: u32, height: u32 },

    #[error("Invalid display size {width}x{height} (must be positive and finite)")]
    InvalidDisplaySize { width: f64, height: f64 },

    #[error("Failed to read image dimensions from {path}: {source}")]
    ImageDimensionRead {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Image {path} is too large ({width}x{height})")]
    ImageTooLarge {
        path: PathBuf,
        width: usize,
        height: usize,
    },

    #[error("Invalid classes file {path}: {message}")]
    ClassesTxtInvalid { path: PathBuf, message: String },

    #[error("Failed to parse data.yaml at {path}: {source}")]
    DataYamlParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to traverse directory {path}: {source}")]
    DirectoryTraversal {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to parse export requests from {path}: {source}")]
    ExportRequestsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize report: {0}")]
    ReportSerialize(#[source] serde_json::Error),

    #[error("Unknown image: {path}")]
    UnknownImage { path: PathBuf },

    #[error("Unknown rectangle: {id}")]
    UnknownRectangle { id: String },

    #[error("No image is selected")]
    NoImageSelected,

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Export failed for {failed} of {total} image(s)")]
    ExportFailed { failed: usize, total: usize },
}
