//! Recognized text items.

use serde::{Deserialize, Serialize};

use super::geometry::{centroid, BoundingBox, Point};

/// One OCR detection.
///
/// Produced fresh per recognition call and never mutated afterwards. The
/// JSON shape is shared by the local engine, the HTTP service and the CLI:
///
/// ```json
/// {"text": "Login", "box": [[10,10],[60,10],[60,30],[10,30]],
///  "bbox": [10,10,60,30], "center": [35,20], "score": 0.98}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedItem {
    pub text: String,
    /// Detection quadrilateral, clockwise from top-left.
    #[serde(rename = "box")]
    pub polygon: Vec<Point>,
    pub bbox: BoundingBox,
    pub center: Point,
    pub score: f32,
}

impl RecognizedItem {
    /// Build an item from its polygon, deriving `bbox` and `center`.
    pub fn from_polygon(text: impl Into<String>, polygon: Vec<Point>, score: f32) -> Self {
        let bbox = BoundingBox::enclosing(&polygon).unwrap_or_default();
        let center = centroid(&polygon);
        Self {
            text: text.into(),
            polygon,
            bbox,
            center,
            score,
        }
    }

    /// Build an item from an axis-aligned box.
    pub fn from_bbox(text: impl Into<String>, bbox: BoundingBox, score: f32) -> Self {
        Self::from_polygon(text, bbox.corners().to_vec(), score)
    }
}

/// Ordered list of recognized items, in backend-reported order.
pub type RecognitionResult = Vec<RecognizedItem>;

/// Sort items into reading order: top-to-bottom, then left-to-right by center.
pub fn sort_reading_order(items: &mut [RecognizedItem]) {
    items.sort_by_key(|item| (item.center.y, item.center.x));
}

#[cfg(test)]
#[path = "item_tests.rs"]
mod tests;
