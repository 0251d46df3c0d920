//! Detector input frames and output records.

use crate::class::ObjectClass;
use crate::error::{DetectError, DetectResult};

/// An interleaved 8-bit image handed to a detector.  Owns its pixel buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width:    u32,
    pub height:   u32,
    pub channels: u8,
    data:         Vec<u8>,
}

impl Frame {
    /// Wrap a pixel buffer, checking it holds exactly
    /// `width * height * channels` bytes.
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> DetectResult<Self> {
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(DetectError::FrameSize { expected, got: data.len() });
        }
        Ok(Self { width, height, channels, data })
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// One detection: an axis-aligned box in pixel coordinates, its class and
/// confidence.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetectedObject<C> {
    /// Top-left corner `[x, y]`.
    pub min:         [f64; 2],
    /// Bottom-right corner `[x, y]`.
    pub max:         [f64; 2],
    pub width:       f64,
    pub height:      f64,
    pub center:      [f64; 2],
    pub class_id:    u32,
    pub class:       C,
    pub class_label: String,
    /// Confidence in `[0, 1]`.
    pub score:       f64,
}

impl<C: ObjectClass> DetectedObject<C> {
    /// Build a record from box corners; derived fields are filled in.
    /// Corners may be given in either order.
    pub fn from_corners(a: [f64; 2], b: [f64; 2], class: C, score: f64) -> Self {
        let min = [a[0].min(b[0]), a[1].min(b[1])];
        let max = [a[0].max(b[0]), a[1].max(b[1])];
        let width = max[0] - min[0];
        let height = max[1] - min[1];
        Self {
            min,
            max,
            width,
            height,
            center: [min[0] + width * 0.5, min[1] + height * 0.5],
            class_id: class.id(),
            class,
            class_label: class.label().to_owned(),
            score,
        }
    }

    /// `true` if the pixel `[x, y]` is inside the box (edges included).
    pub fn contains(&self, p: [f64; 2]) -> bool {
        (self.min[0]..=self.max[0]).contains(&p[0]) && (self.min[1]..=self.max[1]).contains(&p[1])
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}
