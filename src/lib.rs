//! Boxlabel: bounding-box annotation core with YOLO sidecar files.
//!
//! Boxlabel holds the state behind an interactive box-drawing annotator:
//! it maps boxes between the drawing surface and the source image, keeps
//! each image's boxes in memory, and reads/writes them as YOLO text files
//! that sit next to the images. Windowing, rendering, and file dialogs are
//! left to the host application.
//!
//! # Modules
//!
//! - [`geometry`]: Display/image coordinate spaces and scaling between them
//! - [`annotation`]: Rectangles, the per-image store, class registry, YOLO codec
//! - [`export`]: Single-image and batch sidecar export with per-image reports
//! - [`session`]: The session object a rendering surface drives with events
//! - [`storage`]: Text storage abstraction used for sidecar I/O
//! - [`error`]: Error types for boxlabel operations

pub mod annotation;
pub mod error;
pub mod export;
pub mod geometry;
pub mod logging;
pub mod session;
pub mod storage;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::warn;
use walkdir::WalkDir;

pub use error::BoxlabelError;

use annotation::{io_yolo, ClassId, ClassRegistry, ImageEntry};
use export::{ExportOptions, ExportRequest};
use geometry::{ImageSpace, Rect};
use session::{Session, SessionConfig};
use storage::FsStorage;

/// The boxlabel CLI application.
#[derive(Parser)]
#[command(name = "boxlabel")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Log debug details to stderr (RUST_LOG overrides).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Show the boxes stored in an image's YOLO sidecar file.
    Show(ShowArgs),
    /// Find images under a directory and summarize their annotations.
    Scan(ScanArgs),
    /// Write YOLO sidecar files from a JSON list of export requests.
    Export(ExportArgs),
}

/// Arguments for the show subcommand.
#[derive(clap::Args)]
struct ShowArgs {
    /// Image whose sidecar should be read (.jpg, .jpeg or .png).
    image: PathBuf,

    /// Class names file (classes.txt or data.yaml).
    #[arg(long)]
    classes: Option<PathBuf>,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the scan subcommand.
#[derive(clap::Args)]
struct ScanArgs {
    /// Directory to search for images.
    dir: PathBuf,

    /// Class names file (classes.txt or data.yaml).
    #[arg(long)]
    classes: Option<PathBuf>,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the export subcommand.
#[derive(clap::Args)]
struct ExportArgs {
    /// JSON file holding an array of export requests.
    requests: PathBuf,

    /// Decimal places written per normalized field.
    #[arg(long, default_value_t = io_yolo::DEFAULT_PRECISION)]
    precision: usize,

    /// Write sidecars one at a time instead of in parallel.
    #[arg(long)]
    sequential: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Run the boxlabel CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), BoxlabelError> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Some(Commands::Show(args)) => run_show(args),
        Some(Commands::Scan(args)) => run_scan(args),
        Some(Commands::Export(args)) => run_export(args),
        None => {
            println!("boxlabel {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Bounding-box annotation with YOLO sidecar files.");
            println!();
            println!("Run 'boxlabel --help' for usage information.");
            Ok(())
        }
    }
}

fn check_output_format(output: &str) -> Result<(), BoxlabelError> {
    match output {
        "text" | "json" => Ok(()),
        other => Err(BoxlabelError::UnsupportedFormat(format!(
            "'{}' (supported: text, json)",
            other
        ))),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), BoxlabelError> {
    let json = serde_json::to_string_pretty(value).map_err(BoxlabelError::ReportSerialize)?;
    println!("{}", json);
    Ok(())
}

fn load_registry(classes: Option<&Path>) -> Result<ClassRegistry, BoxlabelError> {
    match classes {
        Some(path) => ClassRegistry::from_file(path),
        None => Ok(ClassRegistry::new()),
    }
}

fn read_image_dimensions(path: &Path) -> Result<(u32, u32), BoxlabelError> {
    let size = imagesize::size(path).map_err(|source| BoxlabelError::ImageDimensionRead {
        path: path.to_path_buf(),
        source,
    })?;

    let too_large = || BoxlabelError::ImageTooLarge {
        path: path.to_path_buf(),
        width: size.width,
        height: size.height,
    };
    let width: u32 = size.width.try_into().map_err(|_| too_large())?;
    let height: u32 = size.height.try_into().map_err(|_| too_large())?;

    Ok((width, height))
}

#[derive(Serialize)]
struct ShownBox {
    class_id: ClassId,
    label: String,
    bbox: Rect<ImageSpace>,
}

#[derive(Serialize)]
struct ShowReport {
    image: PathBuf,
    sidecar: PathBuf,
    width: u32,
    height: u32,
    boxes: Vec<ShownBox>,
}

/// Execute the show subcommand.
fn run_show(args: ShowArgs) -> Result<(), BoxlabelError> {
    check_output_format(&args.output)?;
    let registry = load_registry(args.classes.as_deref())?;
    let sidecar = io_yolo::sidecar_path(&args.image)?;
    let (width, height) = read_image_dimensions(&args.image)?;

    let boxes: Vec<ShownBox> = io_yolo::read_annotations(&FsStorage, &args.image, width, height)
        .into_iter()
        .map(|rect| ShownBox {
            class_id: rect.class_id,
            label: registry.name_for(rect.class_id),
            bbox: rect.bbox,
        })
        .collect();

    let report = ShowReport {
        image: args.image,
        sidecar,
        width,
        height,
        boxes,
    };

    if args.output == "json" {
        return print_json(&report);
    }

    println!(
        "{} ({}x{}): {} box(es)",
        report.image.display(),
        report.width,
        report.height,
        report.boxes.len()
    );
    for shown in &report.boxes {
        println!(
            "  {:<12} x={:.1} y={:.1} w={:.1} h={:.1}",
            shown.label,
            shown.bbox.x(),
            shown.bbox.y(),
            shown.bbox.width,
            shown.bbox.height
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct ScanEntry {
    image: PathBuf,
    width: u32,
    height: u32,
    boxes: usize,
}

#[derive(Serialize)]
struct ScanReport {
    images: Vec<ScanEntry>,
    annotated_images: usize,
    total_boxes: usize,
    per_class: Vec<(String, usize)>,
}

/// Execute the scan subcommand.
fn run_scan(args: ScanArgs) -> Result<(), BoxlabelError> {
    check_output_format(&args.output)?;
    let registry = load_registry(args.classes.as_deref())?;

    let mut entries = Vec::new();
    for path in collect_images(&args.dir)? {
        match read_image_dimensions(&path) {
            Ok((width, height)) => entries.push(ImageEntry::new(path, width, height)),
            Err(err) => warn!(image = %path.display(), %err, "skipping unreadable image"),
        }
    }

    let mut session = Session::new(SessionConfig::default());
    session.load_classes(registry.names().iter().cloned());
    session.load_images(entries, &FsStorage)?;

    let store = session.store();
    let images: Vec<ScanEntry> = session
        .images()
        .iter()
        .map(|image| ScanEntry {
            image: image.path.clone(),
            width: image.width,
            height: image.height,
            boxes: store.get(&image.path).len(),
        })
        .collect();

    let mut per_class: std::collections::BTreeMap<ClassId, usize> = Default::default();
    for (_, rects) in store.iter() {
        for rect in rects {
            *per_class.entry(rect.class_id).or_default() += 1;
        }
    }

    let report = ScanReport {
        images,
        annotated_images: store.len(),
        total_boxes: store.rectangle_count(),
        per_class: per_class
            .into_iter()
            .map(|(class_id, count)| (session.label_for(class_id), count))
            .collect(),
    };

    if args.output == "json" {
        return print_json(&report);
    }

    for entry in &report.images {
        println!(
            "  {:>4}  {} ({}x{})",
            entry.boxes,
            entry.image.display(),
            entry.width,
            entry.height
        );
    }
    println!(
        "{} image(s), {} annotated, {} box(es)",
        report.images.len(),
        report.annotated_images,
        report.total_boxes
    );
    for (label, count) in &report.per_class {
        println!("  {}: {}", label, count);
    }
    Ok(())
}

/// Finds supported images under `dir`, sorted by path.
fn collect_images(dir: &Path) -> Result<Vec<PathBuf>, BoxlabelError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|source| BoxlabelError::DirectoryTraversal {
            path: dir.to_path_buf(),
            source,
        })?;

        if entry.file_type().is_file() && io_yolo::is_supported_image(entry.path()) {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

/// Execute the export subcommand.
fn run_export(args: ExportArgs) -> Result<(), BoxlabelError> {
    check_output_format(&args.output)?;
    let data = fs::read_to_string(&args.requests).map_err(|source| BoxlabelError::ReadText {
        path: args.requests.clone(),
        source,
    })?;
    let requests: Vec<ExportRequest> =
        serde_json::from_str(&data).map_err(|source| BoxlabelError::ExportRequestsParse {
            path: args.requests.clone(),
            source,
        })?;

    // Images without boxes are not exported at all.
    let requests: Vec<ExportRequest> = requests
        .into_iter()
        .filter(|request| !request.rectangles.is_empty())
        .collect();

    let opts = ExportOptions {
        precision: args.precision,
        parallel: !args.sequential,
    };
    let batch = export::export_batch(&FsStorage, &requests, &opts);

    if args.output == "json" {
        print_json(&batch)?;
    } else {
        print!("{}", batch);
    }

    if batch.is_ok() {
        Ok(())
    } else {
        Err(BoxlabelError::ExportFailed {
            failed: batch.failed_exports,
            total: batch.total_images,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn collect_images_keeps_walkdir_error_as_source() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let missing = temp.path().join("not-there");

        let err = collect_images(&missing).unwrap_err();
        assert!(matches!(err, BoxlabelError::DirectoryTraversal { .. }));
        let source = err.source().expect("walkdir error is kept");
        assert!(source.downcast_ref::<walkdir::Error>().is_some());
    }

    #[test]
    fn collect_images_sorts_and_filters() {
        let temp = tempfile::tempdir().expect("create temp dir");
        for name in ["b.PNG", "a.jpg", "notes.txt", ".jpeg"] {
            fs::write(temp.path().join(name), b"").expect("write file");
        }

        let found = collect_images(temp.path()).expect("collect");
        let names: Vec<String> = found
            .iter()
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![".jpeg", "a.jpg", "b.PNG"]);
    }
}
