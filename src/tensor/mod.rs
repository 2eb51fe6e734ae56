//! Image batches and the float/byte raster bridge.

pub mod batch;
pub mod raster;
