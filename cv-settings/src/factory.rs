//! Turns the detector and descriptor strategy codes into ready-to-use handles.
//!
//! Construction happens in two steps. `select_*` decodes the strategy code, reads
//! the parameters of the selected algorithm and decides on the back-end, without
//! building anything. `create_*` then asks a [`VisionLibrary`] to build the
//! selected algorithm and wraps it in a dispatch handle.

use crate::algorithms::{
    AcceleratedAlgorithm, BriefParams, BriskParams, DenseParams, DescriptorType, DetectorAlgorithm,
    DetectorType, ExtractorAlgorithm, FastParams, FreakParams, GfttParams, MserParams, OrbParams,
    SiftParams, StarParams, SurfParams,
};
use crate::catalog::keys;
use crate::dispatch::{Accelerated, Backend, DescriptorExtractor, KeypointDetector};
use crate::library::{HardwareCapability, VisionLibrary};
use crate::store::ParameterStore;
use crate::strategy::{self, Strategy};
use crate::{Error, Result};
use log::*;

/// The outcome of selecting a detector: its parameters and the back-end to run it on.
pub type DetectorSelection = Backend<DetectorAlgorithm, AcceleratedAlgorithm>;

/// The outcome of selecting a descriptor extractor.
pub type ExtractorSelection = Backend<ExtractorAlgorithm, AcceleratedAlgorithm>;

/// Whether the accelerated variant guarded by `gpu_key` should be used.
///
/// The device count is only queried when the flag is set.
fn use_accelerated(
    store: &ParameterStore,
    gpu_key: &str,
    hardware: &dyn HardwareCapability,
) -> Result<bool> {
    Ok(store.boolean(gpu_key)? && hardware.accelerated_device_count() > 0)
}

fn decode_selected<S: Strategy>(
    store: &ParameterStore,
    key: &str,
    stage: &'static str,
) -> Result<S> {
    let code = store.text(key)?;
    strategy::select(code).ok_or_else(|| Error::NoStrategySelected {
        stage,
        code: code.to_owned(),
    })
}

/// Selects the keypoint detector configured in `store`.
///
/// FAST, ORB and SURF run on the accelerated device when their own flag is set
/// and `hardware` reports at least one device. Everything else runs on the
/// general-purpose back-end.
pub fn select_detector(
    store: &ParameterStore,
    hardware: &dyn HardwareCapability,
) -> Result<DetectorSelection> {
    let detector_type = decode_selected::<DetectorType>(store, keys::DETECTOR, "detector")?;
    let selection = match detector_type {
        DetectorType::Dense => {
            Backend::General(DetectorAlgorithm::Dense(DenseParams::from_store(store)?))
        }
        DetectorType::Fast => {
            let fast = FastParams::from_store(store)?;
            if use_accelerated(store, keys::FAST_GPU, hardware)? {
                Backend::Accelerated(AcceleratedAlgorithm::Fast(fast))
            } else {
                Backend::General(DetectorAlgorithm::Fast(fast))
            }
        }
        DetectorType::Gftt => {
            Backend::General(DetectorAlgorithm::Gftt(GfttParams::from_store(store)?))
        }
        DetectorType::Mser => {
            Backend::General(DetectorAlgorithm::Mser(MserParams::from_store(store)?))
        }
        DetectorType::Orb => {
            let orb = OrbParams::from_store(store)?;
            if use_accelerated(store, keys::ORB_GPU, hardware)? {
                let fast = FastParams::from_store(store)?;
                Backend::Accelerated(AcceleratedAlgorithm::Orb { orb, fast })
            } else {
                Backend::General(DetectorAlgorithm::Orb(orb))
            }
        }
        DetectorType::Sift => {
            Backend::General(DetectorAlgorithm::Sift(SiftParams::from_store(store)?))
        }
        DetectorType::Star => {
            Backend::General(DetectorAlgorithm::Star(StarParams::from_store(store)?))
        }
        DetectorType::Surf => {
            let surf = SurfParams::from_store(store)?;
            if use_accelerated(store, keys::SURF_GPU, hardware)? {
                Backend::Accelerated(AcceleratedAlgorithm::Surf(surf))
            } else {
                Backend::General(DetectorAlgorithm::Surf(surf))
            }
        }
        DetectorType::Brisk => {
            Backend::General(DetectorAlgorithm::Brisk(BriskParams::from_store(store)?))
        }
    };
    debug!("selected detector {}: {:?}", detector_type, selection);
    Ok(selection)
}

/// Selects the descriptor extractor configured in `store`.
///
/// Only ORB and SURF have an accelerated variant.
pub fn select_extractor(
    store: &ParameterStore,
    hardware: &dyn HardwareCapability,
) -> Result<ExtractorSelection> {
    let descriptor_type = decode_selected::<DescriptorType>(store, keys::DESCRIPTOR, "descriptor")?;
    let selection = match descriptor_type {
        DescriptorType::Brief => {
            Backend::General(ExtractorAlgorithm::Brief(BriefParams::from_store(store)?))
        }
        DescriptorType::Orb => {
            let orb = OrbParams::from_store(store)?;
            if use_accelerated(store, keys::ORB_GPU, hardware)? {
                let fast = FastParams::from_store(store)?;
                Backend::Accelerated(AcceleratedAlgorithm::Orb { orb, fast })
            } else {
                Backend::General(ExtractorAlgorithm::Orb(orb))
            }
        }
        DescriptorType::Sift => {
            Backend::General(ExtractorAlgorithm::Sift(SiftParams::from_store(store)?))
        }
        DescriptorType::Surf => {
            let surf = SurfParams::from_store(store)?;
            if use_accelerated(store, keys::SURF_GPU, hardware)? {
                Backend::Accelerated(AcceleratedAlgorithm::Surf(surf))
            } else {
                Backend::General(ExtractorAlgorithm::Surf(surf))
            }
        }
        DescriptorType::Brisk => {
            Backend::General(ExtractorAlgorithm::Brisk(BriskParams::from_store(store)?))
        }
        DescriptorType::Freak => {
            Backend::General(ExtractorAlgorithm::Freak(FreakParams::from_store(store)?))
        }
    };
    debug!("selected descriptor {}: {:?}", descriptor_type, selection);
    Ok(selection)
}

/// Builds the keypoint detector configured in `store`.
pub fn create_keypoint_detector(
    store: &ParameterStore,
    library: &dyn VisionLibrary,
    hardware: &dyn HardwareCapability,
) -> Result<KeypointDetector> {
    Ok(match select_detector(store, hardware)? {
        Backend::General(algorithm) => Backend::General(library.detector(&algorithm)),
        Backend::Accelerated(algorithm) => {
            let implementation = library.accelerated(&algorithm);
            Backend::Accelerated(Accelerated::new(algorithm, implementation))
        }
    })
}

/// Builds the descriptor extractor configured in `store`.
pub fn create_descriptor_extractor(
    store: &ParameterStore,
    library: &dyn VisionLibrary,
    hardware: &dyn HardwareCapability,
) -> Result<DescriptorExtractor> {
    Ok(match select_extractor(store, hardware)? {
        Backend::General(algorithm) => Backend::General(library.extractor(&algorithm)),
        Backend::Accelerated(algorithm) => {
            let implementation = library.accelerated(&algorithm);
            Backend::Accelerated(Accelerated::new(algorithm, implementation))
        }
    })
}

/// The name of the selected detector, without validating the code.
pub fn current_detector_type(store: &ParameterStore) -> Option<&str> {
    store.text(keys::DETECTOR).ok().and_then(strategy::selected_name)
}

/// The name of the selected descriptor, without validating the code.
pub fn current_descriptor_type(store: &ParameterStore) -> Option<&str> {
    store.text(keys::DESCRIPTOR).ok().and_then(strategy::selected_name)
}
