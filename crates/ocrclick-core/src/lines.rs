//! Text line reconstruction.
//!
//! Greedy single-pass clustering over y-sorted items: an item joins the
//! current line while its center is within the threshold of the line's
//! running mean center. The thresholds are fixed; consumers depend on the
//! exact spacing they produce.

use ocrclick_protocols::RecognizedItem;

/// Line threshold as a fraction of the median item height.
const LINE_HEIGHT_FACTOR: f64 = 0.6;
/// Average block width above which the relative gap rule applies.
const WIDE_BLOCK_WIDTH: f64 = 100.0;
/// Relative gap (gap / average width) that marks a word boundary for wide blocks.
const RELATIVE_GAP_RATIO: f64 = 0.2;
/// Absolute gap in pixels that marks a word boundary for narrow blocks.
const ABSOLUTE_GAP_PX: i32 = 30;

/// Join items into newline-separated lines in reading order.
pub fn build_text(items: &[RecognizedItem]) -> String {
    if items.is_empty() {
        return String::new();
    }

    let threshold = line_threshold(items);
    cluster_lines(items, threshold)
        .into_iter()
        .map(join_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Median item height (upper median) times the line factor.
pub fn line_threshold(items: &[RecognizedItem]) -> f64 {
    let mut heights: Vec<i32> = items.iter().map(|item| item.bbox.height()).collect();
    if heights.is_empty() {
        return 0.0;
    }
    heights.sort_unstable();
    f64::from(heights[heights.len() / 2]) * LINE_HEIGHT_FACTOR
}

/// Group items into lines, top to bottom. Items within a line keep y order.
pub fn cluster_lines(items: &[RecognizedItem], threshold: f64) -> Vec<Vec<&RecognizedItem>> {
    let mut sorted: Vec<&RecognizedItem> = items.iter().collect();
    sorted.sort_by_key(|item| item.center.y);

    let mut lines = Vec::new();
    let mut current: Vec<&RecognizedItem> = Vec::new();
    let mut current_y = 0.0_f64;

    for item in sorted {
        let cy = f64::from(item.center.y);
        if current.is_empty() {
            current.push(item);
            current_y = cy;
        } else if (cy - current_y).abs() <= threshold {
            current.push(item);
            let sum: f64 = current.iter().map(|it| f64::from(it.center.y)).sum();
            current_y = sum / current.len() as f64;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push(item);
            current_y = cy;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn join_line(mut line: Vec<&RecognizedItem>) -> String {
    line.sort_by_key(|item| item.bbox.x1);

    let mut out = String::new();
    let mut prev: Option<&RecognizedItem> = None;
    for item in line {
        if let Some(prev) = prev {
            if is_word_gap(prev, item) {
                out.push(' ');
            }
        }
        out.push_str(&item.text);
        prev = Some(item);
    }
    out
}

fn is_word_gap(prev: &RecognizedItem, curr: &RecognizedItem) -> bool {
    let gap = curr.bbox.x1 - prev.bbox.x2;
    let avg_width = f64::from(prev.bbox.width() + curr.bbox.width()) / 2.0;

    if avg_width > WIDE_BLOCK_WIDTH {
        f64::from(gap) / avg_width > RELATIVE_GAP_RATIO
    } else {
        gap > ABSOLUTE_GAP_PX
    }
}

#[cfg(test)]
#[path = "lines_tests.rs"]
mod tests;
