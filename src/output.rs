//! Rendering of command results for stdout and stderr.

use ocrclick_protocols::RecognizedItem;
use ocrclick_workflow::ClickOutcome;
use serde_json::{json, Map, Value};

/// How whole-page scans are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanFormat {
    /// Reconstructed text lines.
    Text,
    /// One `(x1,y1) (x2,y2) | text` line per item.
    Positions,
    Json,
}

impl ScanFormat {
    pub fn from_flags(json: bool, with_position: bool) -> Self {
        if json {
            Self::Json
        } else if with_position {
            Self::Positions
        } else {
            Self::Text
        }
    }
}

pub(crate) fn render_scan(items: &[RecognizedItem], format: ScanFormat) -> String {
    match format {
        ScanFormat::Text => ocrclick_core::build_text(items),
        ScanFormat::Positions => items.iter().map(position_line).collect::<Vec<_>>().join("\n"),
        ScanFormat::Json => {
            serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string())
        }
    }
}

fn position_line(item: &RecognizedItem) -> String {
    let b = &item.bbox;
    format!("({},{}) ({},{}) | {}", b.x1, b.y1, b.x2, b.y2, item.text)
}

/// Stdout line for a targeted command.
pub(crate) fn render_outcome(outcome: &ClickOutcome, json: bool) -> String {
    if json {
        return outcome_json(outcome).to_string();
    }
    match outcome {
        ClickOutcome::Found { item } => format!("found:{},{}", item.center.x, item.center.y),
        ClickOutcome::Clicked { at, .. } | ClickOutcome::Verified { at, .. } => {
            format!("clicked:{},{}", at.x, at.y)
        }
        ClickOutcome::NotFound { target, .. } => format!("not_found:{}", target),
        ClickOutcome::ExpectationFailed { .. } | ClickOutcome::StillPresent { .. } => {
            format!("verify_failed:{}", outcome.error().unwrap_or_default())
        }
    }
}

fn outcome_json(outcome: &ClickOutcome) -> Value {
    let mut obj = Map::new();
    obj.insert("ok".into(), json!(outcome.is_success()));
    match outcome.clicked_at() {
        Some(at) => {
            obj.insert("clicked".into(), json!(at));
        }
        None => {
            if let Some(item) = outcome.item() {
                obj.insert("center".into(), json!(item.center));
            }
        }
    }
    if let Some(item) = outcome.item() {
        obj.insert("text".into(), json!(item.text));
    }
    if let Some(error) = outcome.error() {
        obj.insert("error".into(), json!(error));
    }
    Value::Object(obj)
}

/// Stderr lines accompanying a failed outcome.
pub(crate) fn diagnostics(outcome: &ClickOutcome, quiet: bool) -> Vec<String> {
    let mut lines = Vec::new();
    if outcome.is_success() {
        return lines;
    }
    if !quiet && !outcome.visible().is_empty() {
        lines.push("Visible texts:".to_string());
        lines.extend(outcome.visible().iter().map(|text| format!("  {}", text)));
    }
    if let Some(path) = outcome.artifact() {
        lines.push(format!("Screenshot saved: {}", path.display()));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocrclick_protocols::{BoundingBox, Point};
    use std::path::PathBuf;

    fn item(text: &str, x1: i32, y1: i32, x2: i32, y2: i32) -> RecognizedItem {
        RecognizedItem::from_bbox(text, BoundingBox::new(x1, y1, x2, y2), 0.95)
    }

    #[test]
    fn test_scan_formats() {
        let items = vec![item("Login", 10, 10, 60, 30), item("Help", 100, 10, 140, 30)];

        assert_eq!(render_scan(&items, ScanFormat::Text), "Login Help");
        assert_eq!(
            render_scan(&items, ScanFormat::Positions),
            "(10,10) (60,30) | Login\n(100,10) (140,30) | Help"
        );

        let parsed: Value =
            serde_json::from_str(&render_scan(&items, ScanFormat::Json)).unwrap();
        assert_eq!(parsed[0]["text"], "Login");
        assert_eq!(parsed[1]["center"], json!([120, 20]));
    }

    #[test]
    fn test_scan_format_flags() {
        assert_eq!(ScanFormat::from_flags(false, false), ScanFormat::Text);
        assert_eq!(ScanFormat::from_flags(false, true), ScanFormat::Positions);
        assert_eq!(ScanFormat::from_flags(true, true), ScanFormat::Json);
    }

    #[test]
    fn test_plain_outcomes() {
        let login = item("Login", 10, 10, 60, 30);
        let at = Point::new(17, 10);

        assert_eq!(
            render_outcome(&ClickOutcome::Found { item: login.clone() }, false),
            "found:35,20"
        );
        assert_eq!(
            render_outcome(&ClickOutcome::Clicked { item: login.clone(), at }, false),
            "clicked:17,10"
        );
        assert_eq!(
            render_outcome(&ClickOutcome::Verified { item: login.clone(), at }, false),
            "clicked:17,10"
        );
        assert_eq!(
            render_outcome(
                &ClickOutcome::NotFound {
                    target: "Logout".into(),
                    visible: vec![],
                    artifact: None,
                },
                false
            ),
            "not_found:Logout"
        );
        assert_eq!(
            render_outcome(
                &ClickOutcome::ExpectationFailed {
                    item: login,
                    at,
                    expected: "Welcome".into(),
                    visible: vec![],
                    artifact: None,
                },
                false
            ),
            "verify_failed:expected text not found: Welcome"
        );
    }

    #[test]
    fn test_json_outcomes() {
        let login = item("Login", 10, 10, 60, 30);

        let found: Value =
            serde_json::from_str(&render_outcome(&ClickOutcome::Found { item: login.clone() }, true))
                .unwrap();
        assert_eq!(found, json!({"ok": true, "center": [35, 20], "text": "Login"}));

        let clicked: Value = serde_json::from_str(&render_outcome(
            &ClickOutcome::Verified {
                item: login.clone(),
                at: Point::new(35, 20),
            },
            true,
        ))
        .unwrap();
        assert_eq!(clicked, json!({"ok": true, "clicked": [35, 20], "text": "Login"}));

        let missing: Value = serde_json::from_str(&render_outcome(
            &ClickOutcome::NotFound {
                target: "Logout".into(),
                visible: vec!["Login".into()],
                artifact: None,
            },
            true,
        ))
        .unwrap();
        assert_eq!(missing, json!({"ok": false, "error": "not_found"}));

        let still: Value = serde_json::from_str(&render_outcome(
            &ClickOutcome::StillPresent {
                item: login,
                at: Point::new(35, 20),
                unexpected: "Login".into(),
                visible: vec![],
                artifact: None,
            },
            true,
        ))
        .unwrap();
        assert_eq!(still["ok"], false);
        assert_eq!(still["clicked"], json!([35, 20]));
        assert_eq!(still["error"], "text still present: Login");
    }

    #[test]
    fn test_diagnostics() {
        let outcome = ClickOutcome::NotFound {
            target: "Logout".into(),
            visible: vec!["Login".into(), "Help".into()],
            artifact: Some(PathBuf::from("/tmp/debug/x.png")),
        };

        assert_eq!(
            diagnostics(&outcome, false),
            vec![
                "Visible texts:",
                "  Login",
                "  Help",
                "Screenshot saved: /tmp/debug/x.png"
            ]
        );
        assert_eq!(
            diagnostics(&outcome, true),
            vec!["Screenshot saved: /tmp/debug/x.png"]
        );

        let ok = ClickOutcome::Found {
            item: item("Login", 10, 10, 60, 30),
        };
        assert!(diagnostics(&ok, false).is_empty());
    }
}
