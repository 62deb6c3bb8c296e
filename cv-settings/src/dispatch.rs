//! Handles hiding whether a pipeline stage runs on the general-purpose or the
//! accelerated back-end.
//!
//! Each handle is a sum type, so it is always backed by exactly one
//! implementation. Callers use [`KeypointDetector::detect`] and
//! [`DescriptorExtractor::compute`] without ever branching on the back-end.

use crate::algorithms::AcceleratedAlgorithm;
use crate::library::{
    AcceleratedFeature2d, AcceleratorError, Descriptors, Detector, Extractor, KeyPoint,
};
use image::{DynamicImage, GenericImageView};
use log::*;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Exactly one of a general-purpose or an accelerated value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Backend<G, A> {
    General(G),
    Accelerated(A),
}

impl<G, A> Backend<G, A> {
    pub fn is_accelerated(&self) -> bool {
        matches!(self, Self::Accelerated(_))
    }
}

/// An accelerated call that failed on one image, with enough context to diagnose it.
#[derive(Debug, Error)]
#[error("accelerated {algorithm} failed on a {width}x{height} image ({hint}): {source}")]
pub struct AcceleratedFailure {
    pub algorithm: &'static str,
    pub width: u32,
    pub height: u32,
    pub hint: String,
    #[source]
    pub source: AcceleratorError,
}

/// An accelerated implementation together with the parameters it was built from.
pub struct Accelerated {
    algorithm: AcceleratedAlgorithm,
    implementation: Box<dyn AcceleratedFeature2d>,
}

impl Accelerated {
    pub fn new(
        algorithm: AcceleratedAlgorithm,
        implementation: Box<dyn AcceleratedFeature2d>,
    ) -> Self {
        Self {
            algorithm,
            implementation,
        }
    }

    pub fn algorithm(&self) -> &AcceleratedAlgorithm {
        &self.algorithm
    }

    fn failure(&self, image: &DynamicImage, source: AcceleratorError) -> AcceleratedFailure {
        let (width, height) = image.dimensions();
        AcceleratedFailure {
            algorithm: self.algorithm.name(),
            width,
            height,
            hint: self.algorithm.failure_hint(),
            source,
        }
    }

    fn detect(&self, image: &DynamicImage) -> Result<Vec<KeyPoint>, AcceleratedFailure> {
        self.implementation
            .detect_keypoints(image)
            .map_err(|e| self.failure(image, e))
    }

    /// The accelerated FAST only detects. [`create_descriptor_extractor`] never
    /// selects it, so this check only fires for a hand-built [`Backend`], which
    /// then fails with [`AcceleratorError::Unsupported`].
    ///
    /// [`create_descriptor_extractor`]: crate::create_descriptor_extractor
    fn compute(
        &self,
        image: &DynamicImage,
        keypoints: &mut Vec<KeyPoint>,
    ) -> Result<Descriptors, AcceleratedFailure> {
        if let AcceleratedAlgorithm::Fast(_) = self.algorithm {
            return Err(self.failure(image, AcceleratorError::Unsupported("FAST")));
        }
        self.implementation
            .compute_descriptors(image, keypoints)
            .map_err(|e| self.failure(image, e))
    }
}

/// The keypoint detection stage.
pub type KeypointDetector = Backend<Box<dyn Detector>, Accelerated>;

/// The descriptor extraction stage.
pub type DescriptorExtractor = Backend<Box<dyn Extractor>, Accelerated>;

impl Backend<Box<dyn Detector>, Accelerated> {
    /// Detects keypoints, reporting accelerated failures to the caller.
    pub fn try_detect(&self, image: &DynamicImage) -> Result<Vec<KeyPoint>, AcceleratedFailure> {
        match self {
            Self::General(detector) => Ok(detector.detect(image)),
            Self::Accelerated(accelerated) => accelerated.detect(image),
        }
    }

    /// Detects keypoints. An accelerated failure is logged and yields no keypoints.
    pub fn detect(&self, image: &DynamicImage) -> Vec<KeyPoint> {
        self.try_detect(image).unwrap_or_else(|e| {
            error!("{}", e);
            Vec::new()
        })
    }
}

impl Backend<Box<dyn Extractor>, Accelerated> {
    /// Computes descriptors, reporting accelerated failures to the caller.
    pub fn try_compute(
        &self,
        image: &DynamicImage,
        keypoints: &mut Vec<KeyPoint>,
    ) -> Result<Descriptors, AcceleratedFailure> {
        match self {
            Self::General(extractor) => Ok(extractor.compute(image, keypoints)),
            Self::Accelerated(accelerated) => accelerated.compute(image, keypoints),
        }
    }

    /// Computes descriptors. An accelerated failure is logged and yields no descriptors.
    pub fn compute(&self, image: &DynamicImage, keypoints: &mut Vec<KeyPoint>) -> Descriptors {
        self.try_compute(image, keypoints).unwrap_or_else(|e| {
            error!("{}", e);
            Descriptors::empty()
        })
    }
}
