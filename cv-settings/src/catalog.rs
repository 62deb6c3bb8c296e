//! The static catalog of every known parameter.
//!
//! Keys follow a `Group/name` layout. The group becomes the INI section when the
//! store is saved. Names prefixed with a digit are ordered that way on purpose so
//! that user interfaces listing them alphabetically show them first.

use core::fmt;

/// The declared type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterType {
    Int,
    Float,
    Bool,
    String,
    /// A strategy code, see [`crate::strategy`].
    StringList,
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::String => "string",
            Self::StringList => "string-list",
        })
    }
}

/// A compile-time default value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Int(i32),
    Float(f64),
    Bool(bool),
    String(&'static str),
    StringList(&'static str),
}

impl DefaultValue {
    pub fn parameter_type(&self) -> ParameterType {
        match self {
            Self::Int(_) => ParameterType::Int,
            Self::Float(_) => ParameterType::Float,
            Self::Bool(_) => ParameterType::Bool,
            Self::String(_) => ParameterType::String,
            Self::StringList(_) => ParameterType::StringList,
        }
    }
}

/// One entry of a parameter catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSpec {
    pub key: &'static str,
    pub default: DefaultValue,
    pub description: &'static str,
}

macro_rules! catalog {
    ($($group:literal { $($name:ident: $key:literal = $kind:ident($default:expr), $description:literal;)+ })+) => {
        /// The key of every parameter in [`CATALOG`].
        pub mod keys {
            $($(pub const $name: &str = concat!($group, "/", $key);)+)+
        }

        /// Every parameter known to the default [`crate::ParameterStore`].
        pub static CATALOG: &[ParameterSpec] = &[
            $($(ParameterSpec {
                key: keys::$name,
                default: DefaultValue::$kind($default),
                description: $description,
            },)+)+
        ];
    };
}

catalog! {
    "Camera" {
        CAMERA_DEVICE_ID: "1deviceId" = Int(0), "Device ID of the camera.";
        CAMERA_IMAGE_WIDTH: "2imageWidth" = Int(640), "Image width (0 means the camera's default width).";
        CAMERA_IMAGE_HEIGHT: "3imageHeight" = Int(480), "Image height (0 means the camera's default height).";
        CAMERA_IMAGE_RATE: "4imageRate" = Float(2.0), "Image rate in Hz (0 means as fast as possible).";
        CAMERA_MEDIA_PATH: "5mediaPath" = String(""), "Video file or directory of images. If set, the camera is not used.";
    }
    "Feature2D" {
        DETECTOR: "1Detector" = StringList("7:Dense;Fast;GFTT;MSER;ORB;SIFT;Star;SURF;BRISK"), "Keypoint detector.";
        DESCRIPTOR: "2Descriptor" = StringList("3:Brief;ORB;SIFT;SURF;BRISK;FREAK"), "Keypoint descriptor.";
        MAX_FEATURES: "3MaxFeatures" = Int(0), "Maximum features per image, keeping the strongest responses. 0 keeps all features.";

        BRIEF_BYTES: "Brief_bytes" = Int(32), "Length of the descriptor in bytes (16, 32 or 64).";

        DENSE_INIT_FEATURE_SCALE: "Dense_initFeatureScale" = Float(1.0), "Size of the first scale level.";
        DENSE_FEATURE_SCALE_LEVELS: "Dense_featureScaleLevels" = Int(1), "Number of scale levels.";
        DENSE_FEATURE_SCALE_MUL: "Dense_featureScaleMul" = Float(0.1), "Scale multiplier between levels.";
        DENSE_INIT_XY_STEP: "Dense_initXyStep" = Int(6), "Grid step in pixels on the first level.";
        DENSE_INIT_IMG_BOUND: "Dense_initImgBound" = Int(0), "Border in pixels left without features on the first level.";
        DENSE_VARY_XY_STEP_WITH_SCALE: "Dense_varyXyStepWithScale" = Bool(true), "Multiply the grid step by the scale multiplier on every level.";
        DENSE_VARY_IMG_BOUND_WITH_SCALE: "Dense_varyImgBoundWithScale" = Bool(false), "Multiply the border by the scale multiplier on every level.";

        FAST_THRESHOLD: "Fast_threshold" = Int(10), "Threshold on the difference between the central pixel and the pixels of the surrounding circle.";
        FAST_NONMAX_SUPPRESSION: "Fast_nonmaxSuppression" = Bool(true), "Apply non-maximum suppression to detected corners.";
        FAST_GPU: "Fast_gpu" = Bool(false), "Use the accelerated FAST variant when an accelerated device is available.";
        FAST_KEYPOINTS_RATIO: "Fast_keypointsRatio" = Float(0.05), "Upper bound of keypoints per pixel, used by the accelerated FAST variant.";

        GFTT_MAX_CORNERS: "GFTT_maxCorners" = Int(1000), "Maximum number of corners returned.";
        GFTT_QUALITY_LEVEL: "GFTT_qualityLevel" = Float(0.01), "Minimal accepted quality relative to the best corner.";
        GFTT_MIN_DISTANCE: "GFTT_minDistance" = Float(1.0), "Minimum euclidean distance between returned corners.";
        GFTT_BLOCK_SIZE: "GFTT_blockSize" = Int(3), "Size of the averaging block for the covariation matrix.";
        GFTT_USE_HARRIS_DETECTOR: "GFTT_useHarrisDetector" = Bool(false), "Use the Harris detector instead of the minimal eigenvalue.";
        GFTT_K: "GFTT_k" = Float(0.04), "Free parameter of the Harris detector.";

        MSER_DELTA: "MSER_delta" = Int(5), "Intensity step compared between regions.";
        MSER_MIN_AREA: "MSER_minArea" = Int(60), "Prune regions smaller than this area.";
        MSER_MAX_AREA: "MSER_maxArea" = Int(14400), "Prune regions bigger than this area.";
        MSER_MAX_VARIATION: "MSER_maxVariation" = Float(0.25), "Prune regions with a larger area variation.";
        MSER_MIN_DIVERSITY: "MSER_minDiversity" = Float(0.2), "Trace back to cut off MSER with a smaller diversity.";
        MSER_MAX_EVOLUTION: "MSER_maxEvolution" = Int(200), "Evolution steps for color images.";
        MSER_AREA_THRESHOLD: "MSER_areaThreshold" = Float(1.01), "Area threshold that causes re-initialization for color images.";
        MSER_MIN_MARGIN: "MSER_minMargin" = Float(0.003), "Ignore regions with a smaller margin.";
        MSER_EDGE_BLUR_SIZE: "MSER_edgeBlurSize" = Int(5), "Aperture size of the edge blur.";

        ORB_N_FEATURES: "ORB_nFeatures" = Int(500), "Maximum number of features to retain.";
        ORB_SCALE_FACTOR: "ORB_scaleFactor" = Float(1.2), "Pyramid decimation ratio, greater than 1.";
        ORB_N_LEVELS: "ORB_nLevels" = Int(8), "Number of pyramid levels.";
        ORB_EDGE_THRESHOLD: "ORB_edgeThreshold" = Int(31), "Border where features are not detected; should roughly match the patch size.";
        ORB_FIRST_LEVEL: "ORB_firstLevel" = Int(0), "Pyramid level holding the source image.";
        ORB_WTA_K: "ORB_WTA_K" = Int(2), "Number of points producing each element of the oriented BRIEF descriptor.";
        ORB_SCORE_TYPE: "ORB_scoreType" = Int(0), "0 ranks features with the Harris score, 1 with the FAST score.";
        ORB_PATCH_SIZE: "ORB_patchSize" = Int(31), "Size of the patch used by the oriented BRIEF descriptor.";
        ORB_GPU: "ORB_gpu" = Bool(false), "Use the accelerated ORB variant when an accelerated device is available.";

        FREAK_ORIENTATION_NORMALIZED: "FREAK_orientationNormalized" = Bool(true), "Enable orientation normalization.";
        FREAK_SCALE_NORMALIZED: "FREAK_scaleNormalized" = Bool(true), "Enable scale normalization.";
        FREAK_PATTERN_SCALE: "FREAK_patternScale" = Float(22.0), "Scaling of the description pattern.";
        FREAK_N_OCTAVES: "FREAK_nOctaves" = Int(4), "Number of octaves covered by the detected keypoints.";

        SIFT_N_FEATURES: "SIFT_nfeatures" = Int(0), "Number of best features to retain (0 keeps all).";
        SIFT_N_OCTAVE_LAYERS: "SIFT_nOctaveLayers" = Int(3), "Number of layers in each octave.";
        SIFT_CONTRAST_THRESHOLD: "SIFT_contrastThreshold" = Float(0.04), "Filters out weak features in low-contrast regions.";
        SIFT_EDGE_THRESHOLD: "SIFT_edgeThreshold" = Float(10.0), "Filters out edge-like features.";
        SIFT_SIGMA: "SIFT_sigma" = Float(1.6), "Sigma of the Gaussian applied to the input image at octave 0.";

        STAR_MAX_SIZE: "Star_maxSize" = Int(45), "Maximum size of the features.";
        STAR_RESPONSE_THRESHOLD: "Star_responseThreshold" = Int(30), "Threshold on the approximated Laplacian.";
        STAR_LINE_THRESHOLD_PROJECTED: "Star_lineThresholdProjected" = Int(10), "Rejects features lying on edges (projected).";
        STAR_LINE_THRESHOLD_BINARIZED: "Star_lineThresholdBinarized" = Int(8), "Rejects features lying on edges (binarized).";
        STAR_SUPPRESS_NONMAX_SIZE: "Star_suppressNonmaxSize" = Int(5), "Neighborhood size for non-maximum suppression.";

        SURF_HESSIAN_THRESHOLD: "SURF_hessianThreshold" = Float(600.0), "Threshold for the hessian keypoint detector.";
        SURF_N_OCTAVES: "SURF_nOctaves" = Int(4), "Number of pyramid octaves.";
        SURF_N_OCTAVE_LAYERS: "SURF_nOctaveLayers" = Int(2), "Number of octave layers within each octave.";
        SURF_EXTENDED: "SURF_extended" = Bool(true), "Compute the extended 128-element descriptor instead of the 64-element one.";
        SURF_UPRIGHT: "SURF_upright" = Bool(false), "Skip orientation computation.";
        SURF_GPU: "SURF_gpu" = Bool(false), "Use the accelerated SURF variant when an accelerated device is available.";
        SURF_KEYPOINTS_RATIO: "SURF_keypointsRatio" = Float(0.01), "Upper bound of keypoints per pixel, used by the accelerated SURF variant.";

        BRISK_THRESH: "BRISK_thresh" = Int(30), "FAST/AGAST detection threshold score.";
        BRISK_OCTAVES: "BRISK_octaves" = Int(3), "Detection octaves, 0 for a single scale.";
        BRISK_PATTERN_SCALE: "BRISK_patternScale" = Float(1.0), "Scale applied to the keypoint neighborhood sampling pattern.";
    }
    "NearestNeighbor" {
        NN_STRATEGY: "1Strategy" = StringList("1:Linear;KDTree;KMeans;Composite;Autotuned;Lsh"), "Nearest neighbor index.";
        NN_DISTANCE_TYPE: "2Distance_type" = StringList("0:EUCLIDEAN_L2;MANHATTAN_L1;MINKOWSKI;MAX;HIST_INTERSECT;HELLINGER;CHI_SQUARE_CS;KULLBACK_LEIBLER_KL;HAMMING"), "Distance metric.";
        NN_NNDR_RATIO_USED: "3nndrRatioUsed" = Bool(true), "Accept the best match only when it passes the nearest neighbor distance ratio.";
        NN_NNDR_RATIO: "4nndrRatio" = Float(0.8), "Nearest neighbor distance ratio.";
        NN_MIN_DISTANCE_USED: "5minDistanceUsed" = Bool(false), "Accept a match only below a minimum distance.";
        NN_MIN_DISTANCE: "6minDistance" = Float(1.6), "Minimum distance, depends on the descriptor used.";
        NN_SEARCH_CHECKS: "7search_checks" = Int(32), "Number of times the trees of the index are recursively traversed.";
        NN_SEARCH_EPS: "8search_eps" = Float(0.0), "Search epsilon.";
        NN_SEARCH_SORTED: "9search_sorted" = Bool(true), "Sort search results by distance.";

        KDTREE_TREES: "KDTree_trees" = Int(4), "Number of parallel kd-trees.";

        COMPOSITE_TREES: "Composite_trees" = Int(4), "Number of parallel kd-trees.";
        COMPOSITE_BRANCHING: "Composite_branching" = Int(32), "Branching factor of the hierarchical k-means tree.";
        COMPOSITE_ITERATIONS: "Composite_iterations" = Int(11), "Maximum k-means iterations (-1 iterates until convergence).";
        COMPOSITE_CENTERS_INIT: "Composite_centers_init" = StringList("0:RANDOM;GONZALES;KMEANSPP"), "Initial cluster centers selection.";
        COMPOSITE_CB_INDEX: "Composite_cb_index" = Float(0.2), "Cluster boundary index used when searching the k-means tree.";

        AUTOTUNED_TARGET_PRECISION: "Autotuned_target_precision" = Float(0.8), "Fraction of exact nearest neighbors the search must return.";
        AUTOTUNED_BUILD_WEIGHT: "Autotuned_build_weight" = Float(0.01), "Importance of build time relative to search time.";
        AUTOTUNED_MEMORY_WEIGHT: "Autotuned_memory_weight" = Float(0.0), "Importance of memory relative to time.";
        AUTOTUNED_SAMPLE_FRACTION: "Autotuned_sample_fraction" = Float(0.1), "Fraction of the dataset used for tuning.";

        KMEANS_BRANCHING: "KMeans_branching" = Int(32), "Branching factor of the hierarchical k-means tree.";
        KMEANS_ITERATIONS: "KMeans_iterations" = Int(11), "Maximum k-means iterations (-1 iterates until convergence).";
        KMEANS_CENTERS_INIT: "KMeans_centers_init" = StringList("0:RANDOM;GONZALES;KMEANSPP"), "Initial cluster centers selection.";
        KMEANS_CB_INDEX: "KMeans_cb_index" = Float(0.2), "Cluster boundary index used when searching the k-means tree.";

        LSH_TABLE_NUMBER: "Lsh_table_number" = Int(12), "Number of hash tables.";
        LSH_KEY_SIZE: "Lsh_key_size" = Int(20), "Size of the hash key in bits.";
        LSH_MULTI_PROBE_LEVEL: "Lsh_multi_probe_level" = Int(2), "Number of bits to shift to check for neighboring buckets (0 is regular LSH).";
    }
    "General" {
        AUTO_START_CAMERA: "autoStartCamera" = Bool(false), "Start the camera when the application opens.";
        AUTO_UPDATE_OBJECTS: "autoUpdateObjects" = Bool(true), "Recompute object features when a parameter changes.";
        NEXT_OBJECT_ID: "nextObjID" = Int(1), "Identifier given to the next added object.";
        IMAGE_FORMATS: "imageFormats" = String("*.png *.jpg *.bmp *.tiff *.ppm"), "Image file patterns accepted as input.";
        VIDEO_FORMATS: "videoFormats" = String("*.avi *.m4v *.mp4"), "Video file patterns accepted as input.";
        MIRROR_VIEW: "mirrorView" = Bool(true), "Flip the camera image horizontally.";
        INVERTED_SEARCH: "invertedSearch" = Bool(false), "Index the scene descriptors and search the object descriptors in them.";
        CONTROLS_SHOWN: "controlsShown" = Bool(false), "Show the playback controls.";
        THREADS: "threads" = Int(1), "Number of objects processed in parallel (0 uses every core).";
    }
    "Homography" {
        HOMOGRAPHY_COMPUTED: "homographyComputed" = Bool(true), "Compute a homography to localize detected objects.";
        HOMOGRAPHY_METHOD: "method" = StringList("1:LMEDS;RANSAC"), "Robust method used to compute the homography.";
        HOMOGRAPHY_RANSAC_REPROJ_THR: "ransacReprojThr" = Float(1.0), "Maximum reprojection error to treat a point pair as an inlier (RANSAC only).";
        HOMOGRAPHY_MINIMUM_INLIERS: "minimumInliers" = Int(10), "Minimum inliers to accept the homography.";
        HOMOGRAPHY_IGNORE_WHEN_ALL_INLIERS: "ignoreWhenAllInliers" = Bool(false), "Reject the homography when every match is an inlier.";
    }
}
