//! Match resolution.
//!
//! Filters are applied in a fixed order: text, then region, then proximity
//! ranking. Filters only narrow or reorder the candidate set; an empty set
//! is reported as `None`, never approximated.

use tracing::{debug, trace};

use ocrclick_protocols::{MatchQuery, Point, RecognizedItem};

use crate::region::{in_region, ImageSize};

/// Text filter: byte-exact equality, or case-insensitive containment.
pub fn matches_text(text: &str, target: &str, exact: bool) -> bool {
    if exact {
        text == target
    } else {
        text.to_lowercase().contains(&target.to_lowercase())
    }
}

/// Center of the first item (in the given order) whose text contains `near`,
/// case-insensitively.
pub fn find_anchor(items: &[RecognizedItem], near: &str) -> Option<Point> {
    items
        .iter()
        .find(|item| matches_text(&item.text, near, false))
        .map(|item| item.center)
}

/// Items surviving the text and region filters, in their original order.
///
/// The region filter is skipped when `image_size` is unknown.
pub fn select_candidates<'a>(
    items: &'a [RecognizedItem],
    query: &MatchQuery,
    image_size: Option<ImageSize>,
) -> Vec<&'a RecognizedItem> {
    items
        .iter()
        .filter(|item| matches_text(&item.text, &query.target, query.exact))
        .filter(|item| match (query.region, image_size) {
            (Some(region), Some(size)) => in_region(item.center, region, size),
            _ => true,
        })
        .collect()
}

/// Resolve the single best item for `query`.
///
/// Without an anchor the first candidate in input order wins. With an anchor
/// (see [`find_anchor`]) candidates are ranked by squared distance to it; the
/// sort is stable, so equidistant candidates keep their input order.
pub fn find_item<'a>(
    items: &'a [RecognizedItem],
    query: &MatchQuery,
    image_size: Option<ImageSize>,
) -> Option<&'a RecognizedItem> {
    let anchor = query.near.as_deref().and_then(|near| find_anchor(items, near));
    if query.near.is_some() && anchor.is_none() {
        debug!("No item matches near hint {:?}, skipping proximity ranking", query.near);
    }

    let mut candidates = select_candidates(items, query, image_size);
    trace!(
        "{} candidates for {:?} (exact={}, region={:?})",
        candidates.len(),
        query.target,
        query.exact,
        query.region
    );

    if let Some(anchor) = anchor {
        if candidates.len() > 1 {
            candidates.sort_by_key(|item| item.center.distance_squared(&anchor));
        }
    }

    candidates.into_iter().next()
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
