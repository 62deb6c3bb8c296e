//! The boundary with the vision library that owns the numeric algorithms.
//!
//! This crate only selects and parameterizes algorithms. Whatever implements
//! [`VisionLibrary`] constructs them, and the constructed objects do the actual
//! detection and description.

use crate::algorithms::{AcceleratedAlgorithm, DetectorAlgorithm, ExtractorAlgorithm};
use cv_core::nalgebra::Point2;
use cv_core::ImagePoint;
use image::DynamicImage;
use ndarray::Array2;
use thiserror::Error;

/// A point of interest in an image.
/// This pretty much follows from OpenCV conventions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyPoint {
    /// Horizontal then vertical pixel coordinate, origin at the top left.
    pub point: (f32, f32),
    /// The magnitude of response from the detector.
    pub response: f32,
    /// The diameter of the meaningful keypoint neighborhood.
    pub size: f32,
    /// The pyramid octave in which the keypoint was detected.
    pub octave: i32,
    pub class_id: i32,
    /// The orientation angle in degrees, or -1 when not computed.
    pub angle: f32,
}

impl ImagePoint for KeyPoint {
    fn image_point(&self) -> Point2<f64> {
        Point2::new(self.point.0 as f64, self.point.1 as f64)
    }
}

/// One descriptor per row.
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptors {
    /// Produced by Brief, ORB, BRISK and FREAK.
    Binary(Array2<u8>),
    /// Produced by SIFT and SURF.
    Float(Array2<f32>),
}

impl Descriptors {
    pub fn empty() -> Self {
        Self::Binary(Array2::zeros((0, 0)))
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Binary(rows) => rows.nrows(),
            Self::Float(rows) => rows.nrows(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Descriptors {
    fn default() -> Self {
        Self::empty()
    }
}

/// A general-purpose keypoint detector.
pub trait Detector {
    fn detect(&self, image: &DynamicImage) -> Vec<KeyPoint>;
}

/// A general-purpose descriptor extractor.
///
/// Keypoints for which no descriptor can be computed are removed from `keypoints`.
pub trait Extractor {
    fn compute(&self, image: &DynamicImage, keypoints: &mut Vec<KeyPoint>) -> Descriptors;
}

/// An error raised by the accelerated device while processing one image.
#[derive(Debug, Error)]
pub enum AcceleratorError {
    #[error("{0}")]
    Routine(String),
    #[error("{0} has no descriptor stage")]
    Unsupported(&'static str),
}

/// An algorithm running on an accelerated device.
///
/// Unlike the general-purpose traits, every call may fail on a given image.
pub trait AcceleratedFeature2d {
    fn detect_keypoints(&self, image: &DynamicImage) -> Result<Vec<KeyPoint>, AcceleratorError>;

    fn compute_descriptors(
        &self,
        image: &DynamicImage,
        keypoints: &mut Vec<KeyPoint>,
    ) -> Result<Descriptors, AcceleratorError>;
}

/// Constructs algorithm objects from fully resolved parameters.
pub trait VisionLibrary {
    fn detector(&self, algorithm: &DetectorAlgorithm) -> Box<dyn Detector>;

    fn extractor(&self, algorithm: &ExtractorAlgorithm) -> Box<dyn Extractor>;

    fn accelerated(&self, algorithm: &AcceleratedAlgorithm) -> Box<dyn AcceleratedFeature2d>;
}

/// Reports how many accelerated devices are usable right now.
///
/// Queried every time a factory considers an accelerated variant, so
/// implementations must be cheap and free of side effects.
pub trait HardwareCapability {
    fn accelerated_device_count(&self) -> usize;
}

/// A machine without any accelerated device.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAccelerator;

impl HardwareCapability for NoAccelerator {
    fn accelerated_device_count(&self) -> usize {
        0
    }
}

impl<F> HardwareCapability for F
where
    F: Fn() -> usize,
{
    fn accelerated_device_count(&self) -> usize {
        self()
    }
}
