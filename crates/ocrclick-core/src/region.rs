//! Region bands.
//!
//! `top`/`left` keep the first 40% of the axis and `bottom`/`right` the last
//! 40%, so an item between 0.4 and 0.6 fails both opposing bands. `center`
//! is an open 30%..70% window on both axes.

use serde::{Deserialize, Serialize};

use ocrclick_protocols::{Point, Region};

/// Upper bound (inclusive) of the `top` and `left` bands.
pub const NEAR_EDGE_BAND: f64 = 0.4;
/// Lower bound (inclusive) of the `bottom` and `right` bands.
pub const FAR_EDGE_BAND: f64 = 0.6;
/// Lower bound (exclusive) of the `center` band.
pub const CENTER_BAND_MIN: f64 = 0.3;
/// Upper bound (exclusive) of the `center` band.
pub const CENTER_BAND_MAX: f64 = 0.7;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl From<(u32, u32)> for ImageSize {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Whether `center` lies inside `region` of an image of `size`.
pub fn in_region(center: Point, region: Region, size: ImageSize) -> bool {
    let cx = f64::from(center.x);
    let cy = f64::from(center.y);
    let w = f64::from(size.width);
    let h = f64::from(size.height);

    match region {
        Region::Top => cy <= h * NEAR_EDGE_BAND,
        Region::Bottom => cy >= h * FAR_EDGE_BAND,
        Region::Left => cx <= w * NEAR_EDGE_BAND,
        Region::Right => cx >= w * FAR_EDGE_BAND,
        Region::Center => {
            w * CENTER_BAND_MIN < cx
                && cx < w * CENTER_BAND_MAX
                && h * CENTER_BAND_MIN < cy
                && cy < h * CENTER_BAND_MAX
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: ImageSize = ImageSize {
        width: 1000,
        height: 800,
    };

    fn passing(center: Point) -> Vec<Region> {
        [
            Region::Top,
            Region::Bottom,
            Region::Left,
            Region::Right,
            Region::Center,
        ]
        .into_iter()
        .filter(|r| in_region(center, *r, SIZE))
        .collect()
    }

    #[test]
    fn test_top_left_corner() {
        assert_eq!(passing(Point::new(100, 80)), vec![Region::Top, Region::Left]);
    }

    #[test]
    fn test_bottom_right_corner() {
        assert_eq!(passing(Point::new(900, 720)), vec![Region::Bottom, Region::Right]);
    }

    #[test]
    fn test_middle_passes_center_only() {
        assert_eq!(passing(Point::new(500, 400)), vec![Region::Center]);
    }

    #[test]
    fn test_band_edges_are_inclusive() {
        assert!(in_region(Point::new(0, 320), Region::Top, SIZE));
        assert!(in_region(Point::new(0, 480), Region::Bottom, SIZE));
        assert!(in_region(Point::new(400, 0), Region::Left, SIZE));
        assert!(in_region(Point::new(600, 0), Region::Right, SIZE));
    }

    #[test]
    fn test_center_edges_are_exclusive() {
        assert!(!in_region(Point::new(300, 400), Region::Center, SIZE));
        assert!(!in_region(Point::new(700, 400), Region::Center, SIZE));
        assert!(!in_region(Point::new(500, 240), Region::Center, SIZE));
        assert!(in_region(Point::new(301, 241), Region::Center, SIZE));
    }

    // Items between 0.4 and 0.6 fail both opposing bands. Kept as-is.
    #[test]
    fn test_dead_zone_between_opposing_bands() {
        let middle_row = Point::new(50, 400);
        assert!(!in_region(middle_row, Region::Top, SIZE));
        assert!(!in_region(middle_row, Region::Bottom, SIZE));

        let middle_column = Point::new(500, 50);
        assert!(!in_region(middle_column, Region::Left, SIZE));
        assert!(!in_region(middle_column, Region::Right, SIZE));
    }
}
