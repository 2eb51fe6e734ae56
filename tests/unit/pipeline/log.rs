use super::*;

#[test]
fn stage_markers_bracket_entries() {
    let mut log = RunLog::new();
    let t = log.begin(Stage::Validate);
    assert_eq!(t.stage(), Stage::Validate);
    log.push("checked shape");
    log.end(t);

    let texts: Vec<&str> = log.lines().iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts.len(), 3);
    assert!(texts[0].starts_with("[Start Validate] "));
    assert_eq!(texts[1], "checked shape");
    assert!(texts[2].starts_with("[End Validate] "));
    assert!(texts[2].ends_with('s'));
}

#[test]
fn lines_are_time_ordered() {
    let mut log = RunLog::new();
    for i in 0..5 {
        log.push(format!("line {i}"));
    }
    let lines = log.lines();
    assert!(lines.windows(2).all(|w| w[0].at <= w[1].at));
}

#[test]
fn render_keeps_order_and_prefixes_time() {
    let mut log = RunLog::new();
    log.push("first");
    log.push("second");
    let text = log.render();
    let first = text.find("] first").unwrap();
    let second = text.find("] second").unwrap();
    assert!(first < second);
    assert!(text.starts_with('['));
    assert!(log.contains("second"));
    assert!(!log.contains("third"));
}

#[test]
fn stage_names_match_display() {
    for stage in [
        Stage::Validate,
        Stage::PreparePassthroughFrames,
        Stage::PrepareFrames,
        Stage::Encode,
        Stage::Finalize,
    ] {
        assert_eq!(stage.to_string(), stage.name());
    }
}
