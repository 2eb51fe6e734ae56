use super::*;

#[test]
fn empty_object_uses_defaults() {
    let cfg: HostConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg, HostConfig::default());
    assert_eq!(cfg.ffmpeg_bin, "ffmpeg");
    assert_eq!(cfg.frame_layout, FrameLayout::Auto);
    assert_eq!(cfg.font_dir, None);
    assert_eq!(cfg.default_font, None);
}

#[test]
fn font_settings_parse() {
    let cfg: HostConfig =
        serde_json::from_str(r#"{"font_dir": "/srv/fonts", "default_font": "/srv/fonts/Sans.ttf"}"#)
            .unwrap();
    assert_eq!(cfg.font_dir, Some(PathBuf::from("/srv/fonts")));
    assert_eq!(
        cfg,
        HostConfig::default()
            .with_font_dir("/srv/fonts")
            .with_default_font("/srv/fonts/Sans.ttf")
    );
}

#[test]
fn layout_parses_snake_case() {
    let cfg: HostConfig =
        serde_json::from_str(r#"{"frame_layout": "channels_first", "output_dir": "/tmp/out"}"#)
            .unwrap();
    assert_eq!(cfg.frame_layout, FrameLayout::ChannelsFirst);
    assert_eq!(cfg.output_dir, PathBuf::from("/tmp/out"));
}

#[test]
fn from_path_reads_file_and_reports_bad_json() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.json");
    std::fs::write(&good, r#"{"ffmpeg_bin": "/opt/ffmpeg/bin/ffmpeg"}"#).unwrap();
    let cfg = HostConfig::from_path(&good).unwrap();
    assert_eq!(cfg.ffmpeg_bin, "/opt/ffmpeg/bin/ffmpeg");

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "{").unwrap();
    let err = HostConfig::from_path(&bad).unwrap_err();
    assert!(err.to_string().contains("bad.json"));

    assert!(HostConfig::from_path(&dir.path().join("missing.json")).is_err());
}
