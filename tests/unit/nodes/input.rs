use super::*;

fn host() -> HostConfig {
    HostConfig::default()
}

#[test]
fn string_and_json_inputs_echo_text() {
    let out = InputString
        .execute(&host(), &Inputs::new().with("string", "hello"))
        .unwrap();
    assert_eq!(out.values(), &[Value::from("hello")]);

    let text = "{\n  \"a\": 1\n}";
    let out = InputJson
        .execute(&host(), &Inputs::new().with("string", text))
        .unwrap();
    assert_eq!(out.values(), &[Value::from(text)]);
    assert!(InputJson.schema().input("string").unwrap().multiline);
}

#[test]
fn int_input_enforces_32_bit_range() {
    let ok = InputInt
        .execute(&host(), &Inputs::new().with("integer", -2_147_483_648i64))
        .unwrap();
    assert_eq!(ok.values(), &[Value::Int(-2_147_483_648)]);
    assert!(
        InputInt
            .execute(&host(), &Inputs::new().with("integer", 1i64 << 40))
            .is_err()
    );
}

#[test]
fn float_input_enforces_limits() {
    let ok = InputFloat
        .execute(&host(), &Inputs::new().with("float_value", 0.5))
        .unwrap();
    assert_eq!(ok.values(), &[Value::Float(0.5)]);
    assert!(
        InputFloat
            .execute(&host(), &Inputs::new().with("float_value", 2e6))
            .is_err()
    );
}

#[test]
fn color_input_emits_rgb_and_opaque_swatch() {
    let out = InputColor
        .execute(&host(), &Inputs::new().with("color_field", "#336699"))
        .unwrap();
    let [Value::Color(rgb), Value::Image(img)] = out.values() else {
        panic!("unexpected outputs: {out:?}");
    };
    assert_eq!(*rgb, [0x33, 0x66, 0x99]);
    assert_eq!(img.shape(), &[1, COLOR_BLOCK_SIZE, COLOR_BLOCK_SIZE, 4]);

    let px = img.to_f32();
    assert_eq!(px[[0, 10, 20, 0]], 0x33 as f32 / 255.0);
    assert_eq!(px[[0, 10, 20, 2]], 0x99 as f32 / 255.0);
    assert_eq!(px[[0, 49, 49, 3]], 1.0);
}

#[test]
fn bad_color_text_is_rejected() {
    let err = InputColor
        .execute(&host(), &Inputs::new().with("color_field", "blue"))
        .unwrap_err();
    assert!(matches!(err, NodeError::Validation(_)));
}

#[test]
fn font_input_passes_the_name_through() {
    let out = InputFont
        .execute(&host(), &Inputs::new().with("font_name", " Mono.ttf "))
        .unwrap();
    assert_eq!(out.values(), &[Value::Font("Mono.ttf".into())]);
    assert_eq!(InputFont.schema().outputs[0].kind, ValueKind::Font);
    assert!(
        InputFont
            .execute(&host(), &Inputs::new().with("font_name", "  "))
            .is_err()
    );
}
