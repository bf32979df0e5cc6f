use log::{debug, info, warn};
use std::path::Path;

use crate::coco::{CocoFile, CocoWriter};
use crate::error::ConvertError;
use crate::types::{AnnotationSource, ProcessingStats};
use crate::utils::{
    create_progress_bar, locate_image, read_annotation_source, write_coco_file, ImageCrateReader,
    ImageSizeReader,
};

/// Counts reported after a conversion run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionSummary {
    pub images: usize,
    pub annotations: usize,
    pub skipped_missing: usize,
}

/// Convert an annotation file to a COCO JSON file.
///
/// Images listed in the annotation file but absent from `images_dir` are
/// skipped with a warning. Any other failure aborts before `output_file` is
/// touched.
pub fn convert_to_coco(
    images_dir: &Path,
    annotations_file: &Path,
    output_file: &Path,
) -> Result<ConversionSummary, ConvertError> {
    info!("Reading annotations from {}", annotations_file.display());
    let source = read_annotation_source(annotations_file)?;
    if source.is_empty() {
        warn!("{} lists no images", annotations_file.display());
    } else {
        info!(
            "Found {} images with {} markers",
            source.len(),
            source.marker_count()
        );
    }

    let mut stats = ProcessingStats::new();
    let coco = build_coco_file(images_dir, &source, &ImageCrateReader, &mut stats)?;

    write_coco_file(output_file, &coco)?;

    stats.print_summary();
    info!(
        "Conversion complete. Created {} image entries and {} annotation entries.",
        coco.images.len(),
        coco.annotations.len()
    );
    info!("COCO format JSON saved to {}", output_file.display());

    Ok(ConversionSummary {
        images: coco.images.len(),
        annotations: coco.annotations.len(),
        skipped_missing: stats.skipped_missing_image,
    })
}

/// Build the COCO document for every image of `source` found in `images_dir`
pub fn build_coco_file<R: ImageSizeReader>(
    images_dir: &Path,
    source: &AnnotationSource,
    size_reader: &R,
    stats: &mut ProcessingStats,
) -> Result<CocoFile, ConvertError> {
    let mut writer = CocoWriter::new();
    let pb = create_progress_bar(source.len() as u64, "Images");

    for (file_name, markers) in source.iter() {
        stats.increment_total();
        pb.inc(1);

        let image_path = match locate_image(images_dir, file_name) {
            Ok(path) => path,
            Err(e @ ConvertError::MissingImage { .. }) => {
                warn!("{}", e);
                stats.increment_skipped_missing_image();
                continue;
            }
            Err(e) => {
                pb.abandon();
                return Err(e);
            }
        };

        let (width, height) = match size_reader.read_size(&image_path) {
            Ok(size) => size,
            Err(e) => {
                pb.abandon();
                return Err(e);
            }
        };

        let image_id = writer.add_image(file_name.to_string(), width, height);
        for marker in markers {
            writer.add_marker(image_id, marker);
        }
        debug!(
            "{} -> image {} ({}x{}, {} markers)",
            file_name,
            image_id,
            width,
            height,
            markers.len()
        );
        stats.increment_converted(markers.len());
    }

    pb.finish_with_message("Images processed");
    Ok(writer.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MarkerRecord;
    use std::collections::HashMap;
    use std::fs;
    use std::path::PathBuf;

    /// Serves sizes from a table instead of decoding files
    struct FixedSizes(HashMap<PathBuf, (u32, u32)>);

    impl ImageSizeReader for FixedSizes {
        fn read_size(&self, path: &Path) -> Result<(u32, u32), ConvertError> {
            Ok(self.0.get(path).copied().unwrap_or((1, 1)))
        }
    }

    fn marker(cx: f64, cy: f64, r: f64) -> MarkerRecord {
        MarkerRecord { cx, cy, r }
    }

    #[test]
    fn test_build_coco_file_skips_missing_images() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("a.jpg"), b"dummy").unwrap();
        fs::write(temp_dir.path().join("c.jpg"), b"dummy").unwrap();

        let source: AnnotationSource = vec![
            ("a.jpg".to_string(), vec![marker(100.0, 50.0, 10.0)]),
            ("b.jpg".to_string(), vec![marker(1.0, 1.0, 1.0)]),
            (
                "c.jpg".to_string(),
                vec![marker(10.0, 10.0, 2.0), marker(30.0, 20.0, 4.0)],
            ),
        ]
        .into_iter()
        .collect();
        let sizes = FixedSizes(HashMap::from([
            (temp_dir.path().join("a.jpg"), (640, 480)),
            (temp_dir.path().join("c.jpg"), (320, 240)),
        ]));

        let mut stats = ProcessingStats::new();
        let coco = build_coco_file(temp_dir.path(), &source, &sizes, &mut stats).unwrap();

        assert_eq!(coco.images.len(), 2);
        assert_eq!(coco.images[0].id, 1);
        assert_eq!(coco.images[0].file_name, "a.jpg");
        assert_eq!((coco.images[0].width, coco.images[0].height), (640, 480));
        assert_eq!(coco.images[1].id, 2);
        assert_eq!(coco.images[1].file_name, "c.jpg");

        let ids: Vec<(u32, u32)> = coco.annotations.iter().map(|a| (a.id, a.image_id)).collect();
        assert_eq!(ids, vec![(1, 1), (2, 2), (3, 2)]);
        assert_eq!(coco.annotations[0].bbox, [90.0, 40.0, 20.0, 20.0]);
        assert_eq!(coco.annotations[2].bbox, [26.0, 16.0, 8.0, 8.0]);
        assert_eq!(coco.annotations[2].area, 64.0);

        assert_eq!(stats.total_pairs_visited, 3);
        assert_eq!(stats.images_converted, 2);
        assert_eq!(stats.skipped_missing_image, 1);
        assert_eq!(stats.markers_converted, 3);
    }

    #[test]
    fn test_build_coco_file_keeps_images_without_markers() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("empty.jpg"), b"dummy").unwrap();

        let source: AnnotationSource = vec![("empty.jpg".to_string(), Vec::new())]
            .into_iter()
            .collect();

        let mut stats = ProcessingStats::new();
        let coco = build_coco_file(
            temp_dir.path(),
            &source,
            &FixedSizes(HashMap::new()),
            &mut stats,
        )
        .unwrap();

        assert_eq!(coco.images.len(), 1);
        assert!(coco.annotations.is_empty());
    }

    #[test]
    fn test_build_coco_file_fails_on_unreadable_image() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("a.png"), b"not an image").unwrap();

        let source: AnnotationSource = vec![("a.png".to_string(), vec![marker(1.0, 1.0, 1.0)])]
            .into_iter()
            .collect();

        let mut stats = ProcessingStats::new();
        let err = build_coco_file(temp_dir.path(), &source, &ImageCrateReader, &mut stats)
            .unwrap_err();
        assert!(matches!(err, ConvertError::UnreadableImage { .. }));
    }
}
