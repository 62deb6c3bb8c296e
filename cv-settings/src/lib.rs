//! Configuration-driven construction of a keypoint matching pipeline.
//!
//! A [`ParameterStore`] holds every tunable of the pipeline. Strategy codes in
//! the store select the keypoint detector, the descriptor extractor and the
//! nearest-neighbor index, and the factories in this crate turn those choices
//! into ready-to-use objects:
//!
//! ```no_run
//! use cv_settings::{create_keypoint_detector, ini_default_path, NoAccelerator, ParameterStore};
//! # fn run(library: &dyn cv_settings::VisionLibrary, image: &image::DynamicImage) -> cv_settings::Result<()> {
//! let mut store = ParameterStore::default();
//! store.load(ini_default_path())?;
//! let detector = create_keypoint_detector(&store, library, &NoAccelerator)?;
//! let keypoints = detector.detect(image);
//! # Ok(())
//! # }
//! ```
//!
//! The numeric algorithms are not part of this crate. They are built by a
//! [`VisionLibrary`], and whether an algorithm runs on an accelerated device is
//! decided from a [`HardwareCapability`] query.

#[macro_use]
mod strategy;

mod algorithms;
mod catalog;
mod dispatch;
mod error;
mod factory;
mod library;
mod nearest_neighbor;
mod settings_file;
mod store;
mod value;

pub use algorithms::*;
pub use catalog::{keys, DefaultValue, ParameterSpec, ParameterType, CATALOG};
pub use dispatch::{Accelerated, AcceleratedFailure, Backend, DescriptorExtractor, KeypointDetector};
pub use error::{Error, Result};
pub use factory::*;
pub use library::*;
pub use nearest_neighbor::*;
pub use settings_file::{
    ini_default_path, working_directory, WindowLayout, WINDOW_GEOMETRY, WINDOW_STATE,
};
pub use store::ParameterStore;
pub use strategy::{alternatives, decode, encode, select, selected_name, Strategy};
pub use value::{format_float, Value, FLOAT_SIGNIFICANT_DIGITS};
