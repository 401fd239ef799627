//! # ocrclick Core
//!
//! Backend-independent algorithms over recognized text items:
//!
//! - [`find_item`] resolves one best match for a target string under
//!   exactness, region and proximity constraints.
//! - [`build_text`] clusters scattered fragments into reading-order lines
//!   and joins them into a single text blob.
//!
//! Both operate on plain item slices, so results are identical whether the
//! items came from the local engine or the remote service.

mod lines;
mod region;
mod resolver;

pub use lines::{build_text, cluster_lines, line_threshold};
pub use region::{in_region, ImageSize, CENTER_BAND_MAX, CENTER_BAND_MIN, FAR_EDGE_BAND, NEAR_EDGE_BAND};
pub use resolver::{find_anchor, find_item, matches_text, select_candidates};
