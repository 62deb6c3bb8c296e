use cv_settings::{
    create_descriptor_extractor, create_index_params, create_keypoint_detector, keys,
    AcceleratedAlgorithm, AcceleratedFeature2d, AcceleratorError, Backend, DescriptorType,
    Descriptors, Detector, DetectorAlgorithm, Extractor, ExtractorAlgorithm, IndexParams, KeyPoint,
    NoAccelerator, OrbParams, ParameterStore, Strategy, SurfParams, VisionLibrary,
};
use image::DynamicImage;
use ndarray::Array2;
use std::cell::RefCell;

/// Records what the factories asked for and builds trivial algorithms.
#[derive(Default)]
struct RecordingLibrary {
    built: RefCell<Vec<String>>,
}

struct Center;

impl Detector for Center {
    fn detect(&self, image: &DynamicImage) -> Vec<KeyPoint> {
        vec![KeyPoint {
            point: (image.width() as f32 / 2.0, image.height() as f32 / 2.0),
            response: 1.0,
            size: 31.0,
            octave: 0,
            class_id: -1,
            angle: 0.0,
        }]
    }
}

struct ZeroDescriptors(usize);

impl Extractor for ZeroDescriptors {
    fn compute(&self, _: &DynamicImage, keypoints: &mut Vec<KeyPoint>) -> Descriptors {
        Descriptors::Binary(Array2::zeros((keypoints.len(), self.0)))
    }
}

/// Accelerated device that rejects every image.
struct OutOfMemory;

impl AcceleratedFeature2d for OutOfMemory {
    fn detect_keypoints(&self, _: &DynamicImage) -> Result<Vec<KeyPoint>, AcceleratorError> {
        Err(AcceleratorError::Routine("out of device memory".to_owned()))
    }

    fn compute_descriptors(
        &self,
        _: &DynamicImage,
        _: &mut Vec<KeyPoint>,
    ) -> Result<Descriptors, AcceleratorError> {
        Err(AcceleratorError::Routine("out of device memory".to_owned()))
    }
}

impl VisionLibrary for RecordingLibrary {
    fn detector(&self, algorithm: &DetectorAlgorithm) -> Box<dyn Detector> {
        self.built.borrow_mut().push(format!("{:?}", algorithm));
        Box::new(Center)
    }

    fn extractor(&self, algorithm: &ExtractorAlgorithm) -> Box<dyn Extractor> {
        self.built.borrow_mut().push(format!("{:?}", algorithm));
        Box::new(ZeroDescriptors(32))
    }

    fn accelerated(&self, algorithm: &AcceleratedAlgorithm) -> Box<dyn AcceleratedFeature2d> {
        self.built
            .borrow_mut()
            .push(format!("accelerated {:?}", algorithm));
        Box::new(OutOfMemory)
    }
}

fn init_logging() {
    let _ = pretty_env_logger::try_init_timed();
}

#[test]
fn orb_without_devices_uses_the_general_implementation() {
    init_logging();
    let mut store = ParameterStore::default();
    store
        .set(keys::DETECTOR, "4:Dense;Fast;GFTT;MSER;ORB;SIFT;Star;SURF;BRISK")
        .unwrap();
    store.set(keys::ORB_GPU, true).unwrap();
    store.set(keys::ORB_N_FEATURES, 800).unwrap();
    store.set(keys::ORB_SCALE_FACTOR, 1.5).unwrap();

    let library = RecordingLibrary::default();
    let detector = create_keypoint_detector(&store, &library, &NoAccelerator).unwrap();

    assert!(!detector.is_accelerated());
    let expected = DetectorAlgorithm::Orb(OrbParams {
        n_features: 800,
        scale_factor: 1.5,
        ..OrbParams::default()
    });
    assert_eq!(*library.built.borrow(), vec![format!("{:?}", expected)]);
    let keypoints = detector.detect(&DynamicImage::new_rgb8(320, 240));
    assert_eq!(keypoints.len(), 1);
}

#[test]
fn accelerated_surf_failures_degrade_to_empty_results() {
    init_logging();
    let mut store = ParameterStore::default();
    store.set(keys::SURF_GPU, true).unwrap();
    let library = RecordingLibrary::default();
    let devices = || 2usize;

    let detector = create_keypoint_detector(&store, &library, &devices).unwrap();
    let extractor = create_descriptor_extractor(&store, &library, &devices).unwrap();
    assert!(detector.is_accelerated());
    assert!(extractor.is_accelerated());
    assert_eq!(
        *library.built.borrow(),
        vec![format!("accelerated {:?}", AcceleratedAlgorithm::Surf(SurfParams::default())); 2]
    );

    let image = DynamicImage::new_luma8(16, 16);
    assert!(detector.detect(&image).is_empty());
    let failure = detector.try_detect(&image).unwrap_err();
    assert_eq!((failure.width, failure.height), (16, 16));
    let mut keypoints = Vec::new();
    assert!(extractor.compute(&image, &mut keypoints).is_empty());
}

#[test]
fn general_extractor_describes_every_keypoint() {
    let mut store = ParameterStore::default();
    store.set(keys::DESCRIPTOR, DescriptorType::Brisk.code()).unwrap();
    let library = RecordingLibrary::default();
    let extractor = create_descriptor_extractor(&store, &library, &|| 1usize).unwrap();
    let image = DynamicImage::new_luma8(64, 64);
    let mut keypoints = Center.detect(&image);
    let descriptors = extractor.compute(&image, &mut keypoints);
    assert!(matches!(&extractor, Backend::General(_)));
    assert_eq!(descriptors.len(), keypoints.len());
}

#[test]
fn unselectable_detector_builds_nothing() {
    let mut store = ParameterStore::default();
    store
        .set(keys::DETECTOR, "9:Dense;Fast;GFTT;MSER;ORB;SIFT;Star;SURF;BRISK")
        .unwrap();
    let library = RecordingLibrary::default();
    assert!(create_keypoint_detector(&store, &library, &NoAccelerator).is_err());
    assert!(library.built.borrow().is_empty());
}

#[test]
fn lsh_index_reads_the_store() {
    let mut store = ParameterStore::default();
    store
        .set(keys::NN_STRATEGY, "5:Linear;KDTree;KMeans;Composite;Autotuned;Lsh")
        .unwrap();
    store.set(keys::LSH_TABLE_NUMBER, 6).unwrap();
    assert_eq!(
        create_index_params(&store),
        IndexParams::Lsh {
            table_number: 6,
            key_size: 20,
            multi_probe_level: 2,
        }
    );
}
