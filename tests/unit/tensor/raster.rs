use ndarray::{Array3, ArrayD, IxDyn};

use super::*;

#[test]
fn to_raster_clamps_and_scales() {
    let frame = ArrayD::from_shape_vec(IxDyn(&[1, 2, 2]), vec![-1.0, 0.0, 0.5, 2.0]).unwrap();
    let r = to_raster(frame.view()).unwrap();
    assert_eq!(r.shape(), &[1, 2, 2]);
    assert_eq!(r.iter().copied().collect::<Vec<_>>(), vec![0, 0, 127, 255]);
}

#[test]
fn to_raster_rejects_non_rank3() {
    let frame = ArrayD::<f32>::zeros(IxDyn(&[4, 4]));
    assert!(matches!(
        to_raster(frame.view()),
        Err(NodeError::Shape(_))
    ));
    let frame = ArrayD::<f32>::zeros(IxDyn(&[1, 4, 4, 3]));
    assert!(to_raster(frame.view()).is_err());
}

#[test]
fn from_raster_inverts_byte_scaling() {
    let raster = Array3::from_shape_vec((1, 1, 2), vec![0u8, 255]).unwrap();
    let f = from_raster(raster.view());
    assert_eq!(f.iter().copied().collect::<Vec<_>>(), vec![0.0, 1.0]);
}

#[test]
fn pad_adds_opaque_alpha_to_rgb() {
    let rgb = Array3::from_shape_vec((1, 2, 3), vec![1u8, 2, 3, 4, 5, 6]).unwrap();
    let rgba = pad_to_four_channels(rgb).unwrap();
    assert_eq!(rgba.dim(), (1, 2, 4));
    assert_eq!(raster_bytes(rgba.view()), vec![1, 2, 3, 255, 4, 5, 6, 255]);
}

#[test]
fn pad_is_idempotent() {
    let rgba = Array3::from_shape_vec((1, 1, 4), vec![9u8, 8, 7, 6]).unwrap();
    assert_eq!(pad_to_four_channels(rgba.clone()).unwrap(), rgba);

    let rgb = Array3::from_shape_vec((2, 1, 3), vec![1u8, 2, 3, 4, 5, 6]).unwrap();
    let once = pad_to_four_channels(rgb).unwrap();
    let twice = pad_to_four_channels(once.clone()).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn pad_rejects_other_channel_counts() {
    for c in [1usize, 2, 5] {
        let r = Array3::<u8>::zeros((2, 2, c));
        assert!(matches!(pad_to_four_channels(r), Err(NodeError::Shape(_))));
    }
}

#[test]
fn raster_bytes_follow_logical_order_after_permute() {
    let planes = Array3::from_shape_vec((2, 1, 2), vec![1u8, 2, 3, 4]).unwrap();
    let hwc = planes.view().permuted_axes([1, 2, 0]);
    assert_eq!(raster_bytes(hwc), vec![1, 3, 2, 4]);
}
