use ndarray::Array4;

use super::*;

/// A TrueType font from the machine, if one is installed in a common location.
fn system_font() -> Option<PathBuf> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/Library/Fonts/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .find(|p| p.is_file())
}

fn transparent(h: usize, w: usize) -> ImageBatch {
    ImageBatch::from_nhwc(Array4::zeros((2, h, w, 4)))
}

fn params(text: &str) -> DrawTextParams<'_> {
    DrawTextParams {
        text,
        x: 4,
        y: 4,
        size: 16.0,
        color: [255, 255, 255],
        h_align: HAlign::Left,
        v_align: VAlign::Top,
        debug: false,
    }
}

#[test]
fn alignment_names_parse() {
    assert_eq!(HAlign::parse("center").unwrap(), HAlign::Center);
    assert_eq!(VAlign::parse("bottom").unwrap(), VAlign::Bottom);
    assert!(HAlign::parse("middle").is_err());
    assert!(VAlign::parse("Left").is_err());
}

#[test]
fn origin_follows_alignment() {
    let size = (41.0, 15.0);
    assert_eq!(
        aligned_origin((100, 50), size, HAlign::Left, VAlign::Top),
        (100.0, 50.0)
    );
    assert_eq!(
        aligned_origin((100, 50), size, HAlign::Center, VAlign::Center),
        (80.0, 43.0)
    );
    assert_eq!(
        aligned_origin((100, 50), size, HAlign::Right, VAlign::Bottom),
        (59.0, 35.0)
    );
}

#[test]
fn default_font_requires_host_setting() {
    let err = resolve_font(&HostConfig::default(), DEFAULT_FONT_NAME).unwrap_err();
    assert!(err.to_string().contains("no default font"));
}

#[test]
fn relative_names_resolve_inside_font_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Mono.ttf"), b"stub").unwrap();
    let host = HostConfig::default().with_font_dir(dir.path());

    assert_eq!(
        resolve_font(&host, "Mono.ttf").unwrap(),
        dir.path().join("Mono.ttf")
    );
    let missing = resolve_font(&host, "Nope.ttf").unwrap_err();
    assert!(missing.to_string().contains("font file not found"));

    let absolute = dir.path().join("Mono.ttf");
    let elsewhere = HostConfig::default().with_font_dir("/does/not/matter");
    assert_eq!(
        resolve_font(&elsewhere, absolute.to_str().unwrap()).unwrap(),
        absolute
    );
}

#[test]
fn garbage_font_bytes_are_rejected() {
    let err = TextFace::from_bytes(b"not a font".to_vec()).unwrap_err();
    assert!(matches!(err, NodeError::Validation(_)));
}

#[test]
fn node_reports_missing_font_file() {
    let inputs = Inputs::new()
        .with("image", transparent(8, 8))
        .with("text_content", "hi")
        .with("text_pos_x", 0i64)
        .with("text_pos_y", 0i64)
        .with("text_size", 12i64)
        .with("text_color", "#ffffff")
        .with("font_name", Value::Font("missing.ttf".into()))
        .with("text_align_horizontal", "left")
        .with("text_align_vertical", "top")
        .with("debug", false);
    let err = DrawText.execute(&HostConfig::default(), &inputs).unwrap_err();
    assert!(err.to_string().contains("missing.ttf"));
}

#[test]
fn schema_offers_alignment_combos() {
    let types = DrawText.schema().input_types();
    assert_eq!(
        types["required"]["text_align_horizontal"],
        serde_json::json!([["left", "center", "right"], {"default": "left"}])
    );
    assert_eq!(types["required"]["font_name"], serde_json::json!(["FONT"]));
}

#[test]
fn text_is_drawn_onto_every_frame_as_rgba() {
    let Some(font) = system_font() else {
        eprintln!("no system font found; skipping");
        return;
    };
    let face = TextFace::open(&font).unwrap();
    let out = DrawText::apply(
        &transparent(32, 96),
        FrameLayout::ChannelsLast,
        &face,
        &params("Hello"),
    )
    .unwrap();
    assert_eq!(out.shape(), &[2, 32, 96, 4]);

    let px = out.to_f32();
    for frame in 0..2 {
        let inked = px
            .index_axis(ndarray::Axis(0), frame)
            .lanes(ndarray::Axis(2))
            .into_iter()
            .filter(|p| p[3] > 0.5 && p[0] > 0.5)
            .count();
        assert!(inked > 10, "frame {frame} has {inked} inked pixels");
    }
    // Nothing lands left of or above the anchor.
    assert!(px.slice(ndarray::s![.., ..3, .., 3]).iter().all(|&a| a == 0.0));
    assert!(px.slice(ndarray::s![.., .., ..3, 3]).iter().all(|&a| a == 0.0));

    let rgb = ImageBatch::from_nhwc(Array4::zeros((1, 32, 96, 3)));
    let out = DrawText::apply(&rgb, FrameLayout::ChannelsLast, &face, &params("Hello")).unwrap();
    assert_eq!(out.shape(), &[1, 32, 96, 4]);
    assert!(out.to_f32().slice(ndarray::s![.., .., .., 3]).iter().all(|&a| a == 1.0));
}

#[test]
fn right_aligned_text_at_left_edge_is_clipped_away() {
    let Some(font) = system_font() else {
        eprintln!("no system font found; skipping");
        return;
    };
    let face = TextFace::open(&font).unwrap();
    // The trailing space keeps the last glyph's ink clear of column 0.
    let mut p = params("Hello ");
    p.x = 0;
    p.h_align = HAlign::Right;
    let out = DrawText::apply(&transparent(32, 96), FrameLayout::ChannelsLast, &face, &p)
        .unwrap();
    assert!(out.to_f32().iter().all(|&v| v == 0.0));
}

#[test]
fn layout_grows_with_text_and_lines() {
    let Some(font) = system_font() else {
        eprintln!("no system font found; skipping");
        return;
    };
    let face = TextFace::open(&font).unwrap();
    let short = face.layout("ab", 20.0);
    let long = face.layout("abcdef", 20.0);
    let two_lines = face.layout("ab\nab", 20.0);
    assert!(long.width > short.width);
    assert!(two_lines.height > short.height);
    assert_eq!(two_lines.glyph_count(), 4);
    assert_eq!(face.layout("", 20.0).size(), (0.0, 0.0));
}
