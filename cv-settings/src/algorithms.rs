//! Typed parameters of every detector and descriptor the settings can select.
//!
//! Each parameter struct mirrors the constructor of the corresponding algorithm
//! in the vision library. `Default` gives the library defaults, which are also
//! the catalog defaults, and `from_store` reads the struct's own keys.

use crate::catalog::keys;
use crate::store::ParameterStore;
use crate::Result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

strategies! {
    /// The keypoint detectors selectable by [`keys::DETECTOR`].
    pub enum DetectorType {
        Dense => "Dense",
        Fast => "Fast",
        Gftt => "GFTT",
        Mser => "MSER",
        Orb => "ORB",
        Sift => "SIFT",
        Star => "Star",
        Surf => "SURF",
        Brisk => "BRISK",
    }
}

strategies! {
    /// The descriptor extractors selectable by [`keys::DESCRIPTOR`].
    pub enum DescriptorType {
        Brief => "Brief",
        Orb => "ORB",
        Sift => "SIFT",
        Surf => "SURF",
        Brisk => "BRISK",
        Freak => "FREAK",
    }
}

/// Keypoints sampled on a regular grid over several scales.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DenseParams {
    pub init_feature_scale: f64,
    pub feature_scale_levels: i32,
    pub feature_scale_mul: f64,
    pub init_xy_step: i32,
    pub init_img_bound: i32,
    pub vary_xy_step_with_scale: bool,
    pub vary_img_bound_with_scale: bool,
}

impl Default for DenseParams {
    fn default() -> Self {
        Self {
            init_feature_scale: 1.0,
            feature_scale_levels: 1,
            feature_scale_mul: 0.1,
            init_xy_step: 6,
            init_img_bound: 0,
            vary_xy_step_with_scale: true,
            vary_img_bound_with_scale: false,
        }
    }
}

impl DenseParams {
    pub fn from_store(store: &ParameterStore) -> Result<Self> {
        Ok(Self {
            init_feature_scale: store.float(keys::DENSE_INIT_FEATURE_SCALE)?,
            feature_scale_levels: store.int(keys::DENSE_FEATURE_SCALE_LEVELS)?,
            feature_scale_mul: store.float(keys::DENSE_FEATURE_SCALE_MUL)?,
            init_xy_step: store.int(keys::DENSE_INIT_XY_STEP)?,
            init_img_bound: store.int(keys::DENSE_INIT_IMG_BOUND)?,
            vary_xy_step_with_scale: store.boolean(keys::DENSE_VARY_XY_STEP_WITH_SCALE)?,
            vary_img_bound_with_scale: store.boolean(keys::DENSE_VARY_IMG_BOUND_WITH_SCALE)?,
        })
    }
}

/// FAST corner detection.
///
/// `keypoints_ratio` only matters to the accelerated variant, which bounds the
/// number of keypoints it allocates per pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FastParams {
    pub threshold: i32,
    pub nonmax_suppression: bool,
    pub keypoints_ratio: f64,
}

impl Default for FastParams {
    fn default() -> Self {
        Self {
            threshold: 10,
            nonmax_suppression: true,
            keypoints_ratio: 0.05,
        }
    }
}

impl FastParams {
    pub fn from_store(store: &ParameterStore) -> Result<Self> {
        Ok(Self {
            threshold: store.int(keys::FAST_THRESHOLD)?,
            nonmax_suppression: store.boolean(keys::FAST_NONMAX_SUPPRESSION)?,
            keypoints_ratio: store.float(keys::FAST_KEYPOINTS_RATIO)?,
        })
    }
}

/// Good features to track (Shi-Tomasi or Harris corners).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GfttParams {
    pub max_corners: i32,
    pub quality_level: f64,
    pub min_distance: f64,
    pub block_size: i32,
    pub use_harris_detector: bool,
    pub k: f64,
}

impl Default for GfttParams {
    fn default() -> Self {
        Self {
            max_corners: 1000,
            quality_level: 0.01,
            min_distance: 1.0,
            block_size: 3,
            use_harris_detector: false,
            k: 0.04,
        }
    }
}

impl GfttParams {
    pub fn from_store(store: &ParameterStore) -> Result<Self> {
        Ok(Self {
            max_corners: store.int(keys::GFTT_MAX_CORNERS)?,
            quality_level: store.float(keys::GFTT_QUALITY_LEVEL)?,
            min_distance: store.float(keys::GFTT_MIN_DISTANCE)?,
            block_size: store.int(keys::GFTT_BLOCK_SIZE)?,
            use_harris_detector: store.boolean(keys::GFTT_USE_HARRIS_DETECTOR)?,
            k: store.float(keys::GFTT_K)?,
        })
    }
}

/// Maximally stable extremal regions.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MserParams {
    pub delta: i32,
    pub min_area: i32,
    pub max_area: i32,
    pub max_variation: f64,
    pub min_diversity: f64,
    pub max_evolution: i32,
    pub area_threshold: f64,
    pub min_margin: f64,
    pub edge_blur_size: i32,
}

impl Default for MserParams {
    fn default() -> Self {
        Self {
            delta: 5,
            min_area: 60,
            max_area: 14400,
            max_variation: 0.25,
            min_diversity: 0.2,
            max_evolution: 200,
            area_threshold: 1.01,
            min_margin: 0.003,
            edge_blur_size: 5,
        }
    }
}

impl MserParams {
    pub fn from_store(store: &ParameterStore) -> Result<Self> {
        Ok(Self {
            delta: store.int(keys::MSER_DELTA)?,
            min_area: store.int(keys::MSER_MIN_AREA)?,
            max_area: store.int(keys::MSER_MAX_AREA)?,
            max_variation: store.float(keys::MSER_MAX_VARIATION)?,
            min_diversity: store.float(keys::MSER_MIN_DIVERSITY)?,
            max_evolution: store.int(keys::MSER_MAX_EVOLUTION)?,
            area_threshold: store.float(keys::MSER_AREA_THRESHOLD)?,
            min_margin: store.float(keys::MSER_MIN_MARGIN)?,
            edge_blur_size: store.int(keys::MSER_EDGE_BLUR_SIZE)?,
        })
    }
}

/// Oriented FAST and rotated BRIEF.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrbParams {
    pub n_features: i32,
    pub scale_factor: f64,
    pub n_levels: i32,
    pub edge_threshold: i32,
    pub first_level: i32,
    pub wta_k: i32,
    /// 0 ranks with the Harris score, 1 with the FAST score.
    pub score_type: i32,
    pub patch_size: i32,
}

impl Default for OrbParams {
    fn default() -> Self {
        Self {
            n_features: 500,
            scale_factor: 1.2,
            n_levels: 8,
            edge_threshold: 31,
            first_level: 0,
            wta_k: 2,
            score_type: 0,
            patch_size: 31,
        }
    }
}

impl OrbParams {
    pub fn from_store(store: &ParameterStore) -> Result<Self> {
        Ok(Self {
            n_features: store.int(keys::ORB_N_FEATURES)?,
            scale_factor: store.float(keys::ORB_SCALE_FACTOR)?,
            n_levels: store.int(keys::ORB_N_LEVELS)?,
            edge_threshold: store.int(keys::ORB_EDGE_THRESHOLD)?,
            first_level: store.int(keys::ORB_FIRST_LEVEL)?,
            wta_k: store.int(keys::ORB_WTA_K)?,
            score_type: store.int(keys::ORB_SCORE_TYPE)?,
            patch_size: store.int(keys::ORB_PATCH_SIZE)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SiftParams {
    pub n_features: i32,
    pub n_octave_layers: i32,
    pub contrast_threshold: f64,
    pub edge_threshold: f64,
    pub sigma: f64,
}

impl Default for SiftParams {
    fn default() -> Self {
        Self {
            n_features: 0,
            n_octave_layers: 3,
            contrast_threshold: 0.04,
            edge_threshold: 10.0,
            sigma: 1.6,
        }
    }
}

impl SiftParams {
    pub fn from_store(store: &ParameterStore) -> Result<Self> {
        Ok(Self {
            n_features: store.int(keys::SIFT_N_FEATURES)?,
            n_octave_layers: store.int(keys::SIFT_N_OCTAVE_LAYERS)?,
            contrast_threshold: store.float(keys::SIFT_CONTRAST_THRESHOLD)?,
            edge_threshold: store.float(keys::SIFT_EDGE_THRESHOLD)?,
            sigma: store.float(keys::SIFT_SIGMA)?,
        })
    }
}

/// The CenSurE based Star detector.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StarParams {
    pub max_size: i32,
    pub response_threshold: i32,
    pub line_threshold_projected: i32,
    pub line_threshold_binarized: i32,
    pub suppress_nonmax_size: i32,
}

impl Default for StarParams {
    fn default() -> Self {
        Self {
            max_size: 45,
            response_threshold: 30,
            line_threshold_projected: 10,
            line_threshold_binarized: 8,
            suppress_nonmax_size: 5,
        }
    }
}

impl StarParams {
    pub fn from_store(store: &ParameterStore) -> Result<Self> {
        Ok(Self {
            max_size: store.int(keys::STAR_MAX_SIZE)?,
            response_threshold: store.int(keys::STAR_RESPONSE_THRESHOLD)?,
            line_threshold_projected: store.int(keys::STAR_LINE_THRESHOLD_PROJECTED)?,
            line_threshold_binarized: store.int(keys::STAR_LINE_THRESHOLD_BINARIZED)?,
            suppress_nonmax_size: store.int(keys::STAR_SUPPRESS_NONMAX_SIZE)?,
        })
    }
}

/// Speeded up robust features.
///
/// `keypoints_ratio` only matters to the accelerated variant.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SurfParams {
    pub hessian_threshold: f64,
    pub n_octaves: i32,
    pub n_octave_layers: i32,
    pub extended: bool,
    pub upright: bool,
    pub keypoints_ratio: f64,
}

impl Default for SurfParams {
    fn default() -> Self {
        Self {
            hessian_threshold: 600.0,
            n_octaves: 4,
            n_octave_layers: 2,
            extended: true,
            upright: false,
            keypoints_ratio: 0.01,
        }
    }
}

impl SurfParams {
    pub fn from_store(store: &ParameterStore) -> Result<Self> {
        Ok(Self {
            hessian_threshold: store.float(keys::SURF_HESSIAN_THRESHOLD)?,
            n_octaves: store.int(keys::SURF_N_OCTAVES)?,
            n_octave_layers: store.int(keys::SURF_N_OCTAVE_LAYERS)?,
            extended: store.boolean(keys::SURF_EXTENDED)?,
            upright: store.boolean(keys::SURF_UPRIGHT)?,
            keypoints_ratio: store.float(keys::SURF_KEYPOINTS_RATIO)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BriskParams {
    pub thresh: i32,
    pub octaves: i32,
    pub pattern_scale: f64,
}

impl Default for BriskParams {
    fn default() -> Self {
        Self {
            thresh: 30,
            octaves: 3,
            pattern_scale: 1.0,
        }
    }
}

impl BriskParams {
    pub fn from_store(store: &ParameterStore) -> Result<Self> {
        Ok(Self {
            thresh: store.int(keys::BRISK_THRESH)?,
            octaves: store.int(keys::BRISK_OCTAVES)?,
            pattern_scale: store.float(keys::BRISK_PATTERN_SCALE)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BriefParams {
    /// Descriptor length in bytes: 16, 32 or 64.
    pub bytes: i32,
}

impl Default for BriefParams {
    fn default() -> Self {
        Self { bytes: 32 }
    }
}

impl BriefParams {
    pub fn from_store(store: &ParameterStore) -> Result<Self> {
        Ok(Self {
            bytes: store.int(keys::BRIEF_BYTES)?,
        })
    }
}

/// Fast retina keypoint descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FreakParams {
    pub orientation_normalized: bool,
    pub scale_normalized: bool,
    pub pattern_scale: f64,
    pub n_octaves: i32,
}

impl Default for FreakParams {
    fn default() -> Self {
        Self {
            orientation_normalized: true,
            scale_normalized: true,
            pattern_scale: 22.0,
            n_octaves: 4,
        }
    }
}

impl FreakParams {
    pub fn from_store(store: &ParameterStore) -> Result<Self> {
        Ok(Self {
            orientation_normalized: store.boolean(keys::FREAK_ORIENTATION_NORMALIZED)?,
            scale_normalized: store.boolean(keys::FREAK_SCALE_NORMALIZED)?,
            pattern_scale: store.float(keys::FREAK_PATTERN_SCALE)?,
            n_octaves: store.int(keys::FREAK_N_OCTAVES)?,
        })
    }
}

/// A fully parameterized general-purpose keypoint detector.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DetectorAlgorithm {
    Dense(DenseParams),
    Fast(FastParams),
    Gftt(GfttParams),
    Mser(MserParams),
    Orb(OrbParams),
    Sift(SiftParams),
    Star(StarParams),
    Surf(SurfParams),
    Brisk(BriskParams),
}

impl DetectorAlgorithm {
    pub fn detector_type(&self) -> DetectorType {
        match self {
            Self::Dense(_) => DetectorType::Dense,
            Self::Fast(_) => DetectorType::Fast,
            Self::Gftt(_) => DetectorType::Gftt,
            Self::Mser(_) => DetectorType::Mser,
            Self::Orb(_) => DetectorType::Orb,
            Self::Sift(_) => DetectorType::Sift,
            Self::Star(_) => DetectorType::Star,
            Self::Surf(_) => DetectorType::Surf,
            Self::Brisk(_) => DetectorType::Brisk,
        }
    }
}

/// A fully parameterized general-purpose descriptor extractor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExtractorAlgorithm {
    Brief(BriefParams),
    Orb(OrbParams),
    Sift(SiftParams),
    Surf(SurfParams),
    Brisk(BriskParams),
    Freak(FreakParams),
}

impl ExtractorAlgorithm {
    pub fn descriptor_type(&self) -> DescriptorType {
        match self {
            Self::Brief(_) => DescriptorType::Brief,
            Self::Orb(_) => DescriptorType::Orb,
            Self::Sift(_) => DescriptorType::Sift,
            Self::Surf(_) => DescriptorType::Surf,
            Self::Brisk(_) => DescriptorType::Brisk,
            Self::Freak(_) => DescriptorType::Freak,
        }
    }
}

/// A fully parameterized algorithm running on an accelerated device.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AcceleratedAlgorithm {
    /// Detection only. Asking it for descriptors fails.
    Fast(FastParams),
    /// The accelerated ORB runs its own FAST stage, configured from the FAST keys.
    Orb { orb: OrbParams, fast: FastParams },
    Surf(SurfParams),
}

impl AcceleratedAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fast(_) => "FAST",
            Self::Orb { .. } => "ORB",
            Self::Surf(_) => "SURF",
        }
    }

    /// The configured parameter most likely responsible when the device rejects an image.
    pub fn failure_hint(&self) -> String {
        match self {
            Self::Fast(fast) => format!(
                "threshold={} keypoints_ratio={}",
                fast.threshold, fast.keypoints_ratio
            ),
            Self::Orb { orb, .. } => format!(
                "the image may be too small for n_levels={} and edge_threshold={}",
                orb.n_levels, orb.edge_threshold
            ),
            Self::Surf(surf) => format!(
                "n_octaves={} may be too high for the image size, keypoints_ratio={}",
                surf.n_octaves, surf.keypoints_ratio
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_catalog() {
        let store = ParameterStore::default();
        assert_eq!(DenseParams::from_store(&store).unwrap(), DenseParams::default());
        assert_eq!(FastParams::from_store(&store).unwrap(), FastParams::default());
        assert_eq!(GfttParams::from_store(&store).unwrap(), GfttParams::default());
        assert_eq!(MserParams::from_store(&store).unwrap(), MserParams::default());
        assert_eq!(OrbParams::from_store(&store).unwrap(), OrbParams::default());
        assert_eq!(SiftParams::from_store(&store).unwrap(), SiftParams::default());
        assert_eq!(StarParams::from_store(&store).unwrap(), StarParams::default());
        assert_eq!(SurfParams::from_store(&store).unwrap(), SurfParams::default());
        assert_eq!(BriskParams::from_store(&store).unwrap(), BriskParams::default());
        assert_eq!(BriefParams::from_store(&store).unwrap(), BriefParams::default());
        assert_eq!(FreakParams::from_store(&store).unwrap(), FreakParams::default());
    }

    #[test]
    fn params_follow_the_store() {
        let mut store = ParameterStore::default();
        store.set(keys::SURF_N_OCTAVES, 6).unwrap();
        store.set(keys::SURF_UPRIGHT, true).unwrap();
        let surf = SurfParams::from_store(&store).unwrap();
        assert_eq!(surf.n_octaves, 6);
        assert!(surf.upright);
    }
}
