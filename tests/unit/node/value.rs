use super::*;

#[test]
fn hex_colors_parse_with_or_without_hash() {
    assert_eq!(parse_hex_color("#ff8000").unwrap(), [255, 128, 0]);
    assert_eq!(parse_hex_color("00FF7f").unwrap(), [0, 255, 127]);
    assert_eq!(parse_hex_color("  #000000 ").unwrap(), [0, 0, 0]);
}

#[test]
fn malformed_hex_colors_are_validation_errors() {
    for bad in ["", "#fff", "#gg0000", "#+f0000", "#ff00001", "#ÿÿÿ"] {
        let err = parse_hex_color(bad).unwrap_err();
        assert!(matches!(err, NodeError::Validation(_)), "{bad:?}");
    }
}

#[test]
fn typed_getters_report_missing_and_mismatched_inputs() {
    let inputs = Inputs::new().with("n", 3i64).with("s", "text");
    assert_eq!(inputs.int("n").unwrap(), 3);
    assert_eq!(inputs.str("s").unwrap(), "text");

    let missing = inputs.int("absent").unwrap_err();
    assert!(missing.to_string().contains("missing input 'absent'"));

    let wrong = inputs.bool("s").unwrap_err();
    assert!(wrong.to_string().contains("expects BOOLEAN, got STRING"));
}

#[test]
fn borrowed_getters_point_into_inputs() {
    let batch = ImageBatch::from_u8(&[1, 2, 2, 3], vec![7; 12]).unwrap();
    let inputs = Inputs::new().with("s", "text").with("img", batch);
    let (s, img) = (inputs.str("s").unwrap(), inputs.image("img").unwrap());
    assert!(std::ptr::eq(s, inputs.get("s").unwrap().as_str().unwrap()));
    assert_eq!(img.shape(), &[1, 2, 2, 3]);
    assert!(std::ptr::eq(img, inputs.optional_image("img").unwrap().unwrap()));
}

#[test]
fn font_getter_accepts_socket_or_text() {
    let inputs = Inputs::new()
        .with("a", Value::Font("Mono.ttf".into()))
        .with("b", "default")
        .with("c", 1i64);
    assert_eq!(inputs.font("a").unwrap(), "Mono.ttf");
    assert_eq!(inputs.font("b").unwrap(), "default");
    assert!(inputs.font("c").unwrap_err().to_string().contains("expects FONT"));
    assert!(inputs.str("a").is_err());
}

#[test]
fn float_getter_widens_integers() {
    let inputs = Inputs::new().with("f", 2i64);
    assert_eq!(inputs.float("f").unwrap(), 2.0);
}

#[test]
fn color_getter_accepts_socket_or_hex_text() {
    let inputs = Inputs::new()
        .with("a", [1u8, 2, 3])
        .with("b", "#0a0b0c")
        .with("c", 5i64);
    assert_eq!(inputs.color("a").unwrap(), [1, 2, 3]);
    assert_eq!(inputs.color("b").unwrap(), [10, 11, 12]);
    assert!(inputs.color("c").is_err());
}

#[test]
fn optional_image_distinguishes_absent_from_wrong_type() {
    let inputs = Inputs::new().with("x", 1i64);
    assert!(inputs.optional_image("pass_through").unwrap().is_none());
    assert!(inputs.optional_image("x").is_err());
}

#[test]
fn ui_outputs_have_no_socket_values() {
    let out = NodeOutput::Ui {
        ui: None,
        log: String::new(),
    };
    assert!(out.values().is_empty());
    let out = NodeOutput::Values(vec![Value::Bool(true)]);
    assert_eq!(out.values(), &[Value::Bool(true)]);
}
