//! Nearest-neighbor index, distance, search and homography settings.
//!
//! Unlike the detector and descriptor factories, nothing here fails: a strategy
//! code that does not decode falls back to a fixed default so that matching can
//! always proceed.

use crate::catalog::keys;
use crate::store::ParameterStore;
use crate::strategy::{self, Strategy};
use crate::Result;
use log::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

strategies! {
    /// The index structures selectable by [`keys::NN_STRATEGY`].
    pub enum NearestNeighborType {
        Linear => "Linear",
        KdTree => "KDTree",
        KMeans => "KMeans",
        Composite => "Composite",
        Autotuned => "Autotuned",
        Lsh => "Lsh",
    }
}

strategies! {
    /// How the k-means based indexes pick their initial cluster centers.
    pub enum CentersInit {
        Random => "RANDOM",
        Gonzales => "GONZALES",
        KMeansPP => "KMEANSPP",
    }
}

strategies! {
    /// The distance metrics selectable by [`keys::NN_DISTANCE_TYPE`].
    pub enum DistanceKind {
        EuclideanL2 => "EUCLIDEAN_L2",
        ManhattanL1 => "MANHATTAN_L1",
        Minkowski => "MINKOWSKI",
        Max => "MAX",
        HistIntersect => "HIST_INTERSECT",
        Hellinger => "HELLINGER",
        ChiSquare => "CHI_SQUARE_CS",
        KullbackLeibler => "KULLBACK_LEIBLER_KL",
        Hamming => "HAMMING",
    }
}

strategies! {
    /// Robust estimation methods for the object homography.
    pub enum HomographyMethod {
        Lmeds => "LMEDS",
        Ransac => "RANSAC",
    }
}

impl DistanceKind {
    /// The value of this metric in FLANN's distance enumeration, which starts at 1.
    pub fn flann_value(self) -> i32 {
        self.index() as i32 + 1
    }
}

impl Default for CentersInit {
    fn default() -> Self {
        Self::Random
    }
}

impl Default for DistanceKind {
    fn default() -> Self {
        Self::EuclideanL2
    }
}

impl Default for HomographyMethod {
    fn default() -> Self {
        Self::Ransac
    }
}

/// Parameters of the nearest-neighbor index to build over descriptors.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IndexParams {
    Linear,
    KdTree {
        trees: i32,
    },
    KMeans {
        branching: i32,
        iterations: i32,
        centers_init: CentersInit,
        cb_index: f64,
    },
    Composite {
        trees: i32,
        branching: i32,
        iterations: i32,
        centers_init: CentersInit,
        cb_index: f64,
    },
    Autotuned {
        target_precision: f64,
        build_weight: f64,
        memory_weight: f64,
        sample_fraction: f64,
    },
    Lsh {
        table_number: i32,
        key_size: i32,
        multi_probe_level: i32,
    },
}

impl IndexParams {
    /// The index used when the configured one cannot be built.
    pub const FALLBACK: Self = Self::KdTree { trees: 4 };

    pub fn nearest_neighbor_type(&self) -> NearestNeighborType {
        match self {
            Self::Linear => NearestNeighborType::Linear,
            Self::KdTree { .. } => NearestNeighborType::KdTree,
            Self::KMeans { .. } => NearestNeighborType::KMeans,
            Self::Composite { .. } => NearestNeighborType::Composite,
            Self::Autotuned { .. } => NearestNeighborType::Autotuned,
            Self::Lsh { .. } => NearestNeighborType::Lsh,
        }
    }

    fn from_store(store: &ParameterStore, kind: NearestNeighborType) -> Result<Self> {
        Ok(match kind {
            NearestNeighborType::Linear => Self::Linear,
            NearestNeighborType::KdTree => Self::KdTree {
                trees: store.int(keys::KDTREE_TREES)?,
            },
            NearestNeighborType::KMeans => Self::KMeans {
                branching: store.int(keys::KMEANS_BRANCHING)?,
                iterations: store.int(keys::KMEANS_ITERATIONS)?,
                centers_init: centers_init(store, keys::KMEANS_CENTERS_INIT),
                cb_index: store.float(keys::KMEANS_CB_INDEX)?,
            },
            NearestNeighborType::Composite => Self::Composite {
                trees: store.int(keys::COMPOSITE_TREES)?,
                branching: store.int(keys::COMPOSITE_BRANCHING)?,
                iterations: store.int(keys::COMPOSITE_ITERATIONS)?,
                centers_init: centers_init(store, keys::COMPOSITE_CENTERS_INIT),
                cb_index: store.float(keys::COMPOSITE_CB_INDEX)?,
            },
            NearestNeighborType::Autotuned => Self::Autotuned {
                target_precision: store.float(keys::AUTOTUNED_TARGET_PRECISION)?,
                build_weight: store.float(keys::AUTOTUNED_BUILD_WEIGHT)?,
                memory_weight: store.float(keys::AUTOTUNED_MEMORY_WEIGHT)?,
                sample_fraction: store.float(keys::AUTOTUNED_SAMPLE_FRACTION)?,
            },
            NearestNeighborType::Lsh => Self::Lsh {
                table_number: store.int(keys::LSH_TABLE_NUMBER)?,
                key_size: store.int(keys::LSH_KEY_SIZE)?,
                multi_probe_level: store.int(keys::LSH_MULTI_PROBE_LEVEL)?,
            },
        })
    }
}

impl Default for IndexParams {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Parameters of a single nearest-neighbor query.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchParams {
    pub checks: i32,
    pub eps: f64,
    pub sorted: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            checks: 32,
            eps: 0.0,
            sorted: true,
        }
    }
}

/// Decodes a nested `centers_init` code, defaulting to random centers.
fn centers_init(store: &ParameterStore, key: &str) -> CentersInit {
    store
        .text(key)
        .ok()
        .and_then(strategy::select)
        .unwrap_or_default()
}

/// Builds the index parameters selected by [`keys::NN_STRATEGY`].
///
/// Falls back to [`IndexParams::FALLBACK`] with an error log when the strategy
/// cannot be decoded or its parameters cannot be read.
pub fn create_index_params(store: &ParameterStore) -> IndexParams {
    let selected = store
        .text(keys::NN_STRATEGY)
        .ok()
        .and_then(strategy::select::<NearestNeighborType>);
    match selected.map(|kind| IndexParams::from_store(store, kind)) {
        Some(Ok(params)) => {
            debug!("nearest neighbor index: {:?}", params);
            params
        }
        Some(Err(e)) => {
            error!("Unable to read nearest neighbor parameters ({}), using the default KDTree", e);
            IndexParams::FALLBACK
        }
        None => {
            error!("Nearest neighbor strategy not found, using the default KDTree");
            IndexParams::FALLBACK
        }
    }
}

/// The distance metric selected by [`keys::NN_DISTANCE_TYPE`], L2 when undecodable.
pub fn distance_type(store: &ParameterStore) -> DistanceKind {
    let distance = store
        .text(keys::NN_DISTANCE_TYPE)
        .ok()
        .and_then(strategy::select)
        .unwrap_or_default();
    debug!("nearest neighbor distance: {}", distance);
    distance
}

pub fn search_params(store: &ParameterStore) -> Result<SearchParams> {
    Ok(SearchParams {
        checks: store.int(keys::NN_SEARCH_CHECKS)?,
        eps: store.float(keys::NN_SEARCH_EPS)?,
        sorted: store.boolean(keys::NN_SEARCH_SORTED)?,
    })
}

/// The homography method selected by [`keys::HOMOGRAPHY_METHOD`].
///
/// Only a code that decodes to LMEDS selects it. Every other outcome, decoding
/// failures included, yields RANSAC.
pub fn homography_method(store: &ParameterStore) -> HomographyMethod {
    let method = match store
        .text(keys::HOMOGRAPHY_METHOD)
        .ok()
        .and_then(strategy::select)
    {
        Some(HomographyMethod::Lmeds) => HomographyMethod::Lmeds,
        _ => HomographyMethod::Ransac,
    };
    debug!("homography method: {}", method);
    method
}

/// The name of the selected index type, without validating the code.
pub fn current_nearest_neighbor_type(store: &ParameterStore) -> Option<&str> {
    store
        .text(keys::NN_STRATEGY)
        .ok()
        .and_then(strategy::selected_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DefaultValue, ParameterSpec};

    /// A catalog whose lists disagree with the alternatives this module expects,
    /// as happens when a settings file outlives a change of the catalog.
    static REORDERED: &[ParameterSpec] = &[
        ParameterSpec {
            key: keys::NN_STRATEGY,
            default: DefaultValue::StringList("0:KDTree;Linear;KMeans;Composite;Autotuned;Lsh"),
            description: "",
        },
        ParameterSpec {
            key: keys::NN_DISTANCE_TYPE,
            default: DefaultValue::StringList("1:EUCLIDEAN_L2;HAMMING"),
            description: "",
        },
        ParameterSpec {
            key: keys::HOMOGRAPHY_METHOD,
            default: DefaultValue::StringList("0:RANSAC;LMEDS"),
            description: "",
        },
    ];

    fn store_with(key: &str, code: &str) -> ParameterStore {
        let mut store = ParameterStore::default();
        store.set(key, code).unwrap();
        store
    }

    #[test]
    fn default_index_is_a_kd_tree() {
        let store = ParameterStore::default();
        assert_eq!(create_index_params(&store), IndexParams::KdTree { trees: 4 });
        assert_eq!(current_nearest_neighbor_type(&store), Some("KDTree"));
    }

    #[test]
    fn lsh_reads_its_parameters() {
        let mut store = store_with(keys::NN_STRATEGY, &NearestNeighborType::Lsh.code());
        store.set(keys::LSH_KEY_SIZE, 16).unwrap();
        assert_eq!(
            create_index_params(&store),
            IndexParams::Lsh {
                table_number: 12,
                key_size: 16,
                multi_probe_level: 2,
            }
        );
    }

    #[test]
    fn autotuned_reads_its_parameters() {
        let store = store_with(keys::NN_STRATEGY, &NearestNeighborType::Autotuned.code());
        let params = create_index_params(&store);
        assert_eq!(params.nearest_neighbor_type(), NearestNeighborType::Autotuned);
        assert_eq!(
            params,
            IndexParams::Autotuned {
                target_precision: 0.8,
                build_weight: 0.01,
                memory_weight: 0.0,
                sample_fraction: 0.1,
            }
        );
    }

    #[test]
    fn kmeans_decodes_its_nested_code() {
        let mut store = store_with(keys::NN_STRATEGY, &NearestNeighborType::KMeans.code());
        store
            .set(keys::KMEANS_CENTERS_INIT, "2:RANDOM;GONZALES;KMEANSPP")
            .unwrap();
        match create_index_params(&store) {
            IndexParams::KMeans { centers_init, .. } => {
                assert_eq!(centers_init, CentersInit::KMeansPP)
            }
            other => panic!("unexpected index {:?}", other),
        }
    }

    #[test]
    fn composite_nested_failure_defaults_to_random() {
        let mut store = store_with(keys::NN_STRATEGY, &NearestNeighborType::Composite.code());
        store
            .set(keys::COMPOSITE_CENTERS_INIT, "7:RANDOM;GONZALES;KMEANSPP")
            .unwrap();
        assert_eq!(
            create_index_params(&store),
            IndexParams::Composite {
                trees: 4,
                branching: 32,
                iterations: 11,
                centers_init: CentersInit::Random,
                cb_index: 0.2,
            }
        );
    }

    #[test]
    fn undecodable_index_falls_back() {
        for code in [
            "9:Linear;KDTree;KMeans;Composite;Autotuned;Lsh",
            "zero:Linear;KDTree;KMeans;Composite;Autotuned;Lsh",
        ] {
            let mut store = store_with(keys::NN_STRATEGY, code);
            store.set(keys::KDTREE_TREES, 8).unwrap();
            assert_eq!(create_index_params(&store), IndexParams::FALLBACK);
        }
    }

    #[test]
    fn index_from_a_changed_catalog_falls_back() {
        let store = ParameterStore::new(REORDERED);
        assert_eq!(create_index_params(&store), IndexParams::FALLBACK);
        assert_eq!(current_nearest_neighbor_type(&store), Some("KDTree"));
    }

    #[test]
    fn missing_parameters_fall_back() {
        let mut store = ParameterStore::new(REORDERED);
        store
            .set(keys::NN_STRATEGY, "2:KDTree;Linear;KMeans;Composite;Autotuned;Lsh")
            .unwrap();
        assert_eq!(create_index_params(&store), IndexParams::FALLBACK);
    }

    #[test]
    fn distance_types() {
        for (index, expected, flann) in [
            (0, DistanceKind::EuclideanL2, 1),
            (1, DistanceKind::ManhattanL1, 2),
            (8, DistanceKind::Hamming, 9),
            (9, DistanceKind::EuclideanL2, 1),
        ] {
            let store = store_with(
                keys::NN_DISTANCE_TYPE,
                &strategy::encode(index, DistanceKind::NAMES),
            );
            let distance = distance_type(&store);
            assert_eq!(distance, expected);
            assert_eq!(distance.flann_value(), flann);
        }
    }

    #[test]
    fn distance_from_a_changed_catalog_is_l2() {
        assert_eq!(distance_type(&ParameterStore::new(REORDERED)), DistanceKind::EuclideanL2);
    }

    #[test]
    fn search_params_follow_the_store() {
        let mut store = ParameterStore::default();
        assert_eq!(search_params(&store).unwrap(), SearchParams::default());
        store.set(keys::NN_SEARCH_CHECKS, 64).unwrap();
        store.set(keys::NN_SEARCH_SORTED, false).unwrap();
        let params = search_params(&store).unwrap();
        assert_eq!((params.checks, params.sorted), (64, false));
        assert!(search_params(&ParameterStore::new(REORDERED)).is_err());
    }

    #[test]
    fn homography_methods() {
        for (code, expected) in [
            ("0:LMEDS;RANSAC", HomographyMethod::Lmeds),
            ("1:LMEDS;RANSAC", HomographyMethod::Ransac),
            ("2:LMEDS;RANSAC", HomographyMethod::Ransac),
            ("-1:LMEDS;RANSAC", HomographyMethod::Ransac),
        ] {
            assert_eq!(homography_method(&store_with(keys::HOMOGRAPHY_METHOD, code)), expected);
        }
    }

    #[test]
    fn homography_from_a_changed_catalog_is_ransac() {
        // Index 0 names RANSAC here, so decoding fails and RANSAC is used anyway.
        let store = ParameterStore::new(REORDERED);
        assert_eq!(homography_method(&store), HomographyMethod::Ransac);
        assert_eq!(strategy::select::<HomographyMethod>("0:RANSAC;LMEDS"), None);
    }
}
