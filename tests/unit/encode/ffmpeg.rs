use super::*;

fn job(bin: &str) -> EncodeJob {
    EncodeJob {
        ffmpeg_bin: bin.to_string(),
        frames_dir: PathBuf::from("out/clip/frames"),
        pattern: "frame_%02d.png".to_string(),
        framerate: 25,
        bitrate_mb: 10.0,
        width: 64,
        height: 48,
        out_path: PathBuf::from("out/clip/clip.webm"),
    }
}

#[test]
fn args_have_fixed_shape() {
    let args: Vec<String> = job("ffmpeg")
        .args()
        .into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    let input = PathBuf::from("out/clip/frames")
        .join("frame_%02d.png")
        .to_string_lossy()
        .into_owned();
    let output = PathBuf::from("out/clip/clip.webm")
        .to_string_lossy()
        .into_owned();
    assert_eq!(
        args,
        vec![
            "-y",
            "-framerate",
            "25",
            "-pattern_type",
            "sequence",
            "-start_number",
            "0",
            "-i",
            input.as_str(),
            "-s",
            "64x48",
            "-c:v",
            "libvpx",
            "-b:v",
            "10M",
            "-c:a",
            "libopus",
            "-auto-alt-ref",
            "0",
            output.as_str(),
        ]
    );
}

#[test]
fn fractional_bitrate_keeps_decimals() {
    let mut j = job("ffmpeg");
    j.bitrate_mb = 2.5;
    assert!(j.command_line().contains("-b:v 2.5M"));
    assert!(j.command_line().starts_with("ffmpeg -y -framerate 25"));
}

#[test]
fn validation_enforces_ranges() {
    assert!(job("ffmpeg").validate().is_ok());

    let mut j = job("ffmpeg");
    j.framerate = 4;
    assert!(matches!(j.validate(), Err(NodeError::Validation(_))));
    j.framerate = 61;
    assert!(j.validate().is_err());

    let mut j = job("ffmpeg");
    j.bitrate_mb = 0.5;
    assert!(j.validate().is_err());
    j.bitrate_mb = f64::NAN;
    assert!(j.validate().is_err());

    let mut j = job("ffmpeg");
    j.width = 0;
    assert!(j.validate().is_err());
}

#[cfg(unix)]
#[test]
fn zero_exit_is_success() {
    let outcome = encode(job("true")).unwrap();
    assert_eq!(outcome.exit_code, Some(0));
    assert!(outcome.success());
}

#[cfg(unix)]
#[test]
fn nonzero_exit_is_reported_not_raised() {
    let outcome = encode(job("false")).unwrap();
    assert_eq!(outcome.exit_code, Some(1));
    assert!(!outcome.success());
}

#[test]
fn missing_binary_is_an_encode_error() {
    let err = encode(job("smn-nodes-no-such-encoder")).unwrap_err();
    assert!(matches!(err, NodeError::Encode(_)));
    assert!(!is_ffmpeg_on_path("smn-nodes-no-such-encoder"));
}

#[test]
fn ensure_parent_dir_creates_missing_parents() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("a").join("b").join("clip.webm");
    ensure_parent_dir(&out).unwrap();
    assert!(dir.path().join("a").join("b").is_dir());
}
