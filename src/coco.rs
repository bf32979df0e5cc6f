//! COCO format data structures and utilities
//!
//! This module describes the single-category COCO object-detection document
//! produced for the Embrapa ADD 256 dataset, and the writer that assigns
//! image and annotation ids while the document is accumulated.

use serde::{Deserialize, Serialize, Serializer};

use crate::types::MarkerRecord;

/// Capture date recorded for every image of the dataset
pub const DATE_CAPTURED: &str = "2018-12-13";

/// The only category in the dataset
pub const APPLE_CATEGORY_ID: u32 = 1;

/// COCO dataset information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub description: String,
    pub version: String,
    pub year: u32,
    pub contributor: String,
    pub date_created: String,
    pub url: String,
}

impl Default for Info {
    fn default() -> Self {
        Self {
            description: "Embrapa Apples by Drones Detection Dataset (Embrapa ADD 256)".to_string(),
            version: "1.0".to_string(),
            year: 2021,
            contributor: "Embrapa Agricultural Informatics".to_string(),
            date_created: "2021/10".to_string(),
            url: "https://github.com/thsant/add256".to_string(),
        }
    }
}

/// COCO license information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub id: u32,
    pub name: String,
    pub url: String,
}

impl Default for License {
    fn default() -> Self {
        Self {
            id: 1,
            name: "CC BY-NC 4.0".to_string(),
            url: "https://creativecommons.org/licenses/by-nc/4.0/".to_string(),
        }
    }
}

/// COCO category information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
    pub supercategory: String,
}

impl Category {
    pub fn apple() -> Self {
        Self {
            id: APPLE_CATEGORY_ID,
            name: "apple".to_string(),
            supercategory: "fruit".to_string(),
        }
    }
}

/// COCO image information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: u32,
    pub license: u32,
    pub file_name: String,
    pub height: u32,
    pub width: u32,
    pub date_captured: String,
}

impl Image {
    pub fn new(id: u32, file_name: String, width: u32, height: u32) -> Self {
        Self {
            id,
            license: 1,
            file_name,
            height,
            width,
            date_captured: DATE_CAPTURED.to_string(),
        }
    }
}

/// COCO annotation information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: u32,
    pub image_id: u32,
    pub category_id: u32,
    #[serde(serialize_with = "serialize_bbox")]
    pub bbox: [f64; 4], // [x, y, width, height]
    #[serde(serialize_with = "serialize_coordinate")]
    pub area: f64,
    pub segmentation: Vec<Vec<f64>>,
    pub iscrowd: u32,
}

impl Annotation {
    /// Box a circular marker as a non-crowd apple annotation
    pub fn from_marker(id: u32, image_id: u32, marker: &MarkerRecord) -> Self {
        let bbox = circle_to_bbox(marker.cx, marker.cy, marker.r);
        Self {
            id,
            image_id,
            category_id: APPLE_CATEGORY_ID,
            bbox,
            area: bbox_area(&bbox),
            segmentation: Vec::new(),
            iscrowd: 0,
        }
    }
}

/// Complete COCO dataset structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoFile {
    pub info: Info,
    pub licenses: Vec<License>,
    pub images: Vec<Image>,
    pub annotations: Vec<Annotation>,
    pub categories: Vec<Category>,
}

impl Default for CocoFile {
    fn default() -> Self {
        Self {
            info: Info::default(),
            licenses: vec![License::default()],
            images: Vec::new(),
            annotations: Vec::new(),
            categories: vec![Category::apple()],
        }
    }
}

/// Writer for COCO format datasets
///
/// Image ids follow the number of images already added and annotation ids run
/// across the whole document, both starting at 1.
pub struct CocoWriter {
    next_image_id: u32,
    next_annotation_id: u32,
    images: Vec<Image>,
    annotations: Vec<Annotation>,
}

impl Default for CocoWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl CocoWriter {
    pub fn new() -> Self {
        Self {
            next_image_id: 1,
            next_annotation_id: 1,
            images: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Add an image to the COCO dataset
    pub fn add_image(&mut self, file_name: String, width: u32, height: u32) -> u32 {
        let image_id = self.next_image_id;
        self.next_image_id += 1;
        self.images.push(Image::new(image_id, file_name, width, height));
        image_id
    }

    /// Add a marker of an already added image as an annotation
    pub fn add_marker(&mut self, image_id: u32, marker: &MarkerRecord) -> u32 {
        debug_assert!(image_id < self.next_image_id, "unknown image id {image_id}");
        let annotation_id = self.next_annotation_id;
        self.next_annotation_id += 1;
        self.annotations
            .push(Annotation::from_marker(annotation_id, image_id, marker));
        annotation_id
    }

    /// Build the complete COCO dataset structure
    pub fn build(self) -> CocoFile {
        CocoFile {
            images: self.images,
            annotations: self.annotations,
            ..CocoFile::default()
        }
    }
}

// Largest magnitude below which every whole f64 is an exact integer
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Write whole-valued coordinates as JSON integers, so pixel markers given as
/// integers come out as `[90, 40, 20, 20]` rather than `[90.0, ...]`
fn serialize_coordinate<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

fn serialize_bbox<S: Serializer>(bbox: &[f64; 4], serializer: S) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeTuple;

    let mut tuple = serializer.serialize_tuple(bbox.len())?;
    for value in bbox {
        tuple.serialize_element(&Coordinate(*value))?;
    }
    tuple.end()
}

struct Coordinate(f64);

impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_coordinate(&self.0, serializer)
    }
}

/// Bounding square of a circle as [x, y, width, height]
///
/// The radius is taken as-is, so a negative radius gives a negative size.
pub fn circle_to_bbox(cx: f64, cy: f64, radius: f64) -> [f64; 4] {
    let side = 2.0 * radius;
    [cx - radius, cy - radius, side, side]
}

/// Area of an [x, y, width, height] box
pub fn bbox_area(bbox: &[f64; 4]) -> f64 {
    bbox[2] * bbox[3]
}
