//! The `Detector` trait, where an inference backend plugs in.

use std::marker::PhantomData;

use tracing::debug;

use crate::class::ObjectClass;
use crate::error::DetectResult;
use crate::object::{DetectedObject, Frame};
use crate::params::DetectorParams;

/// Pluggable object detector.
///
/// Implementations wrap an inference engine; this workspace only consumes
/// their output.  `detect` takes `&mut self` because backends keep scratch
/// buffers between frames.
pub trait Detector<C: ObjectClass>: Send {
    /// Run detection on one frame.  Results are unfiltered; apply
    /// [`filter_by_score`] with the configured threshold.
    fn detect(&mut self, frame: &Frame) -> DetectResult<Vec<DetectedObject<C>>>;

    /// The parameters the detector was initialised with.
    fn params(&self) -> &DetectorParams;

    /// `detect` followed by [`filter_by_score`] at `params().detect_threshold`.
    fn detect_filtered(&mut self, frame: &Frame) -> DetectResult<Vec<DetectedObject<C>>> {
        let threshold = self.params().detect_threshold;
        Ok(filter_by_score(self.detect(frame)?, threshold))
    }
}

/// Keep detections scoring at least `threshold`, highest score first.
pub fn filter_by_score<C>(mut objects: Vec<DetectedObject<C>>, threshold: f64) -> Vec<DetectedObject<C>> {
    let before = objects.len();
    objects.retain(|o| o.score >= threshold);
    objects.sort_by(|a, b| b.score.total_cmp(&a.score));
    debug!(before, after = objects.len(), threshold, "filtered detections");
    objects
}

/// A [`Detector`] that never reports anything.
///
/// Useful as a placeholder in tests or when running the planner on map data
/// alone.
pub struct NoopDetector<C> {
    params:  DetectorParams,
    _class:  PhantomData<fn() -> C>,
}

impl<C: ObjectClass> NoopDetector<C> {
    /// Validates `params` the way a real backend would at start-up.
    pub fn new(params: DetectorParams) -> DetectResult<Self> {
        params.validate()?;
        Ok(Self { params, _class: PhantomData })
    }
}

impl<C: ObjectClass> Detector<C> for NoopDetector<C> {
    fn detect(&mut self, _frame: &Frame) -> DetectResult<Vec<DetectedObject<C>>> {
        Ok(vec![])
    }

    fn params(&self) -> &DetectorParams {
        &self.params
    }
}
