use super::*;

const HEADER: &str =
    "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

fn tsv(rows: &[&str]) -> String {
    let mut out = String::from(HEADER);
    for row in rows {
        out.push('\n');
        out.push_str(row);
    }
    out
}

#[test]
fn test_parse_empty() {
    assert!(parse_tsv("").is_empty());
    assert!(parse_tsv(HEADER).is_empty());
}

#[test]
fn test_parse_groups_words_into_lines() {
    let out = tsv(&[
        "1\t1\t0\t0\t0\t0\t0\t0\t800\t600\t-1\t",
        "4\t1\t1\t1\t1\t0\t10\t10\t120\t20\t-1\t",
        "5\t1\t1\t1\t1\t1\t10\t10\t50\t20\t90\tSign",
        "5\t1\t1\t1\t1\t2\t70\t12\t60\t18\t80\tin",
        "5\t1\t1\t1\t2\t1\t10\t50\t40\t20\t95.5\tHelp",
    ]);
    let items = parse_tsv(&out);
    assert_eq!(items.len(), 2);

    assert_eq!(items[0].text, "Sign in");
    assert_eq!(items[0].bbox, BoundingBox::new(10, 10, 130, 30));
    assert_eq!(items[0].center.x, 70);
    assert_eq!(items[0].center.y, 20);
    assert!((items[0].score - 0.85).abs() < 1e-6);
    assert_eq!(items[0].polygon.len(), 4);

    assert_eq!(items[1].text, "Help");
    assert!((items[1].score - 0.955).abs() < 1e-6);
}

#[test]
fn test_parse_skips_blank_and_negative_conf_words() {
    let out = tsv(&[
        "5\t1\t1\t1\t1\t1\t10\t10\t50\t20\t-1\tghost",
        "5\t1\t1\t1\t1\t2\t70\t10\t50\t20\t88\t   ",
        "5\t1\t1\t1\t1\t3\t130\t10\t50\t20\t77\tOK",
    ]);
    let items = parse_tsv(&out);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].text, "OK");
    assert_eq!(items[0].bbox, BoundingBox::new(130, 10, 180, 30));
}

#[test]
fn test_parse_skips_malformed_rows() {
    let out = tsv(&[
        "5\t1\t1\t1\t1\t1\t10\t10",
        "5\t1\t1\t1\t1\t1\tx\t10\t50\t20\t90\tBad",
        "5\t1\t1\t1\t1\t1\t10\t10\t50\t20\tnan?\tBad",
        "5\t1\t2\t1\t1\t1\t10\t40\t50\t20\t90\tGood",
    ]);
    let items = parse_tsv(&out);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].text, "Good");
}

#[test]
fn test_parse_keeps_engine_order() {
    let out = tsv(&[
        "5\t1\t1\t1\t1\t1\t10\t300\t50\t20\t90\tLower",
        "5\t1\t2\t1\t1\t1\t10\t10\t50\t20\t90\tUpper",
    ]);
    let texts: Vec<_> = parse_tsv(&out).into_iter().map(|i| i.text).collect();
    assert_eq!(texts, vec!["Lower", "Upper"]);
}

#[test]
fn test_parse_clamps_score() {
    let out = tsv(&["5\t1\t1\t1\t1\t1\t10\t10\t50\t20\t150\tLoud"]);
    assert_eq!(parse_tsv(&out)[0].score, 1.0);
}

#[tokio::test]
async fn test_load_missing_binary() {
    let config = LocalEngineConfig {
        binary: "/nonexistent/ocrclick-tesseract".to_string(),
        ..Default::default()
    };
    let err = LocalEngine::load(&config).await.unwrap_err();
    assert!(matches!(err, RecognitionError::BackendUnavailable(_)));
}

#[cfg(unix)]
#[tokio::test]
async fn test_fake_engine_end_to_end() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("fake-tesseract");
    let body = format!(
        "#!/bin/sh\nif [ \"$1\" = \"--version\" ]; then echo 'tesseract 5.3.0'; exit 0; fi\ncat <<'TSV'\n{}\nTSV\n",
        tsv(&["5\t1\t1\t1\t1\t1\t10\t10\t50\t20\t90\tLogin"])
    );
    std::fs::write(&script, body).unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let image = dir.path().join("page.png");
    std::fs::write(&image, b"not really a png").unwrap();

    let config = LocalEngineConfig {
        binary: script.to_string_lossy().into_owned(),
        ..Default::default()
    };
    let engine = LocalEngine::load(&config).await.unwrap();
    assert_eq!(engine.version(), "tesseract 5.3.0");

    let items = engine.recognize(&image).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].text, "Login");

    let missing = engine.recognize(&dir.path().join("missing.png")).await;
    assert!(matches!(missing, Err(RecognitionError::InvalidImage(_))));
}
