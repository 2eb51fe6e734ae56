use ndarray::{Array3, ArrayView3, ArrayViewD, Axis, Ix3, concatenate};

use crate::foundation::error::{NodeError, NodeResult};
use crate::foundation::math::unit_to_u8;

/// View a single frame as `(a, b, c)`, rejecting any other rank.
pub fn as_frame<'a, T>(frame: ArrayViewD<'a, T>) -> NodeResult<ArrayView3<'a, T>> {
    let shape = frame.shape().to_vec();
    frame
        .into_dimensionality::<Ix3>()
        .map_err(|_| NodeError::shape(format!("frame must have rank 3, got shape {shape:?}")))
}

/// Normalized float frame to a byte raster.
///
/// Samples are clamped to `[0, 1]` and scaled to `[0, 255]`. The axis order is preserved.
pub fn to_raster(frame: ArrayViewD<'_, f32>) -> NodeResult<Array3<u8>> {
    Ok(as_frame(frame)?.mapv(unit_to_u8))
}

/// Byte raster back to a normalized float frame.
pub fn from_raster(raster: ArrayView3<'_, u8>) -> Array3<f32> {
    raster.mapv(|v| f32::from(v) / 255.0)
}

/// Append an opaque alpha channel to a channels-last RGB raster.
///
/// RGBA input passes through untouched; any other channel count is rejected.
pub fn pad_to_four_channels(raster: Array3<u8>) -> NodeResult<Array3<u8>> {
    let (h, w, c) = raster.dim();
    match c {
        4 => Ok(raster),
        3 => {
            let alpha = Array3::<u8>::from_elem((h, w, 1), u8::MAX);
            concatenate(Axis(2), &[raster.view(), alpha.view()])
                .map_err(|e| NodeError::shape(format!("alpha padding failed: {e}")))
        }
        other => Err(NodeError::shape(format!(
            "cannot pad a {other}-channel raster to 4 channels (expected 3 or 4)"
        ))),
    }
}

/// Contiguous row-major bytes of a raster regardless of its memory order.
pub(crate) fn raster_bytes(raster: ArrayView3<'_, u8>) -> Vec<u8> {
    raster.iter().copied().collect()
}

#[cfg(test)]
#[path = "../../tests/unit/tensor/raster.rs"]
mod tests;
