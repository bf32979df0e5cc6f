use serde::Deserialize;
use serde_json::{Map, Value};

// A circular apple marker, in pixels
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct MarkerRecord {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

/// The parsed annotation file: image file names mapped to their markers,
/// kept in the order the keys appear in the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationSource {
    entries: Vec<(String, Vec<MarkerRecord>)>,
}

impl AnnotationSource {
    /// Build from a JSON object, failing with a message when the shape is wrong
    pub fn from_json_object(object: Map<String, Value>) -> Result<Self, String> {
        let mut entries = Vec::with_capacity(object.len());
        for (file_name, markers) in object {
            let markers: Vec<MarkerRecord> = serde_json::from_value(markers)
                .map_err(|e| format!("invalid markers for {:?}: {}", file_name, e))?;
            entries.push((file_name, markers));
        }
        Ok(Self { entries })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[MarkerRecord])> {
        self.entries
            .iter()
            .map(|(file_name, markers)| (file_name.as_str(), markers.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn marker_count(&self) -> usize {
        self.entries.iter().map(|(_, markers)| markers.len()).sum()
    }
}

impl FromIterator<(String, Vec<MarkerRecord>)> for AnnotationSource {
    fn from_iter<I: IntoIterator<Item = (String, Vec<MarkerRecord>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

// Struct to hold processing statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    pub total_pairs_visited: usize,
    pub images_converted: usize,
    pub skipped_missing_image: usize,
    pub markers_converted: usize,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_total(&mut self) {
        self.total_pairs_visited += 1;
    }

    pub fn increment_converted(&mut self, markers: usize) {
        self.images_converted += 1;
        self.markers_converted += markers;
    }

    pub fn increment_skipped_missing_image(&mut self) {
        self.skipped_missing_image += 1;
    }

    pub fn print_summary(&self) {
        log::info!("=== Processing Summary ===");
        log::info!("Total images listed: {}", self.total_pairs_visited);
        log::info!("Images converted: {}", self.images_converted);
        log::info!("Markers converted: {}", self.markers_converted);
        log::info!(
            "Skipped (missing image file): {}",
            self.skipped_missing_image
        );

        if self.skipped_missing_image > 0 {
            log::warn!(
                "{} of {} listed images were not found on disk",
                self.skipped_missing_image,
                self.total_pairs_visited
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_object_keeps_key_order() {
        let value = json!({
            "z.jpg": [{"cx": 1, "cy": 2, "r": 3}],
            "a.jpg": [],
            "m.jpg": [{"cx": 4.5, "cy": 5.5, "r": 6.5}, {"cx": 0, "cy": 0, "r": 1}],
        });
        let Value::Object(object) = value else {
            unreachable!()
        };

        let source = AnnotationSource::from_json_object(object).unwrap();
        let names: Vec<&str> = source.iter().map(|(name, _)| name).collect();

        assert_eq!(names, vec!["z.jpg", "a.jpg", "m.jpg"]);
        assert_eq!(source.len(), 3);
        assert_eq!(source.marker_count(), 3);
    }

    #[test]
    fn from_json_object_rejects_bad_markers() {
        let value = json!({ "a.jpg": [{"cx": 1, "cy": 2}] });
        let Value::Object(object) = value else {
            unreachable!()
        };

        let err = AnnotationSource::from_json_object(object).unwrap_err();
        assert!(err.contains("a.jpg"));
    }

    #[test]
    fn stats_track_conversions_and_skips() {
        let mut stats = ProcessingStats::new();
        stats.increment_total();
        stats.increment_converted(4);
        stats.increment_total();
        stats.increment_skipped_missing_image();

        assert_eq!(stats.total_pairs_visited, 2);
        assert_eq!(stats.images_converted, 1);
        assert_eq!(stats.markers_converted, 4);
        assert_eq!(stats.skipped_missing_image, 1);
    }
}
