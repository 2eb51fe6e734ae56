use ndarray::{Array4, ArrayD, Ix4, IxDyn};
use serde::{Deserialize, Serialize};

use crate::foundation::error::{NodeError, NodeResult};

/// How the channel axis of a batch is located.
///
/// `Auto` guesses from axis sizes and is unreliable when height or width is itself 1..=4; pass an
/// explicit variant when the producer's layout is known.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameLayout {
    #[default]
    Auto,
    /// `(count, height, width, channels)`
    ChannelsLast,
    /// `(count, channels, height, width)`
    ChannelsFirst,
}

/// A layout with the guesswork removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelOrder {
    Last,
    First,
}

impl FrameLayout {
    pub fn resolve(self, shape: &[usize]) -> ChannelOrder {
        match self {
            Self::ChannelsLast => ChannelOrder::Last,
            Self::ChannelsFirst => ChannelOrder::First,
            Self::Auto => {
                let is_channel_axis = |n: usize| (1..=4).contains(&n);
                if shape.last().copied().is_some_and(is_channel_axis) {
                    ChannelOrder::Last
                } else if shape.len() >= 2 && is_channel_axis(shape[1]) {
                    ChannelOrder::First
                } else {
                    ChannelOrder::Last
                }
            }
        }
    }
}

/// Frame geometry of a 4-D batch once its channel axis is known.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameDims {
    pub count: usize,
    pub height: usize,
    pub width: usize,
    pub channels: usize,
}

/// An image batch in one of the two sample types the host produces.
///
/// The host's native representation is normalized `f32`; byte batches come from decoders and
/// other producers. Storage is dynamic-rank so malformed inputs can be reported instead of
/// rejected at construction.
#[derive(Clone, Debug, PartialEq)]
pub enum ImageBatch {
    F32(ArrayD<f32>),
    U8(ArrayD<u8>),
}

impl ImageBatch {
    pub fn from_f32(shape: &[usize], data: Vec<f32>) -> NodeResult<Self> {
        ArrayD::from_shape_vec(IxDyn(shape), data)
            .map(Self::F32)
            .map_err(|e| NodeError::shape(format!("batch data does not match {shape:?}: {e}")))
    }

    pub fn from_u8(shape: &[usize], data: Vec<u8>) -> NodeResult<Self> {
        ArrayD::from_shape_vec(IxDyn(shape), data)
            .map(Self::U8)
            .map_err(|e| NodeError::shape(format!("batch data does not match {shape:?}: {e}")))
    }

    /// Wrap a channels-last float batch.
    pub fn from_nhwc(batch: Array4<f32>) -> Self {
        Self::F32(batch.into_dyn())
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            Self::F32(a) => a.shape(),
            Self::U8(a) => a.shape(),
        }
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Number of frames (size of the leading axis).
    pub fn len(&self) -> usize {
        self.shape().first().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Self::F32(_))
    }

    pub fn dtype_name(&self) -> &'static str {
        match self {
            Self::F32(_) => "f32",
            Self::U8(_) => "u8",
        }
    }

    /// Geometry for a 4-D batch; `None` for any other rank.
    pub fn dims(&self, order: ChannelOrder) -> Option<FrameDims> {
        let &[count, a, b, c] = self.shape() else {
            return None;
        };
        Some(match order {
            ChannelOrder::Last => FrameDims {
                count,
                height: a,
                width: b,
                channels: c,
            },
            ChannelOrder::First => FrameDims {
                count,
                height: b,
                width: c,
                channels: a,
            },
        })
    }

    /// Normalized float samples, converting bytes by `/ 255`.
    pub fn to_f32(&self) -> ArrayD<f32> {
        match self {
            Self::F32(a) => a.clone(),
            Self::U8(a) => a.mapv(|v| f32::from(v) / 255.0),
        }
    }

    /// Float batch in `(count, height, width, channels)` order.
    pub fn to_nhwc_f32(&self, layout: FrameLayout) -> NodeResult<Array4<f32>> {
        let order = layout.resolve(self.shape());
        let batch = self
            .to_f32()
            .into_dimensionality::<Ix4>()
            .map_err(|_| {
                NodeError::shape(format!("expected a 4-D batch, got {:?}", self.shape()))
            })?;
        Ok(match order {
            ChannelOrder::Last => batch,
            ChannelOrder::First => batch
                .permuted_axes([0, 2, 3, 1])
                .as_standard_layout()
                .into_owned(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tensor/batch.rs"]
mod tests;
