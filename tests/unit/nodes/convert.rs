use super::*;

fn run(node: &dyn Node, inputs: Inputs) -> Vec<Value> {
    node.execute(&HostConfig::default(), &inputs)
        .unwrap()
        .values()
        .to_vec()
}

#[test]
fn float_repr_matches_python_spelling() {
    assert_eq!(float_repr(1.0), "1.0");
    assert_eq!(float_repr(-2.5), "-2.5");
    assert_eq!(float_repr(0.1), "0.1");
    assert_eq!(float_repr(1e-5), "1e-05");
    assert_eq!(float_repr(1.5e-7), "1.5e-07");
    assert_eq!(float_repr(1e16), "1e+16");
    assert_eq!(float_repr(f64::INFINITY), "inf");
    assert_eq!(float_repr(f64::NAN), "nan");
}

#[test]
fn int_converts_to_string_and_float() {
    let out = run(&ConvInt, Inputs::new().with("integer", -12i64));
    assert_eq!(out, vec![Value::from("-12"), Value::Float(-12.0)]);
}

#[test]
fn float_truncates_and_rounds_half_to_even() {
    let cases = [
        (2.5, "2.5", 2, 2),
        (3.5, "3.5", 3, 4),
        (-2.7, "-2.7", -2, -3),
        (0.0, "0.0", 0, 0),
    ];
    for (input, s, base, round) in cases {
        let out = run(&ConvFloat, Inputs::new().with("float", input));
        assert_eq!(
            out,
            vec![Value::from(s), Value::Int(base), Value::Int(round)],
            "{input}"
        );
    }
}

#[test]
fn string_parses_or_falls_back_to_zero() {
    let cases = [
        ("3.75", 3.75, 3),
        ("  -8 ", -8.0, -8),
        ("1e3", 1000.0, 1000),
        ("abc", 0.0, 0),
        ("", 0.0, 0),
    ];
    for (input, f, i) in cases {
        let out = run(&ConvString, Inputs::new().with("string", input));
        assert_eq!(out, vec![Value::Float(f), Value::Int(i)], "{input:?}");
    }
}

#[test]
fn non_finite_strings_keep_float_but_zero_int() {
    let out = run(&ConvString, Inputs::new().with("string", "inf"));
    assert_eq!(out, vec![Value::Float(f64::INFINITY), Value::Int(0)]);
}
