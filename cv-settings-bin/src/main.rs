use cv_settings::{
    create_index_params, current_descriptor_type, current_detector_type,
    current_nearest_neighbor_type, distance_type, homography_method, ini_default_path,
    search_params, select_detector, select_extractor, ParameterStore,
};
use log::*;
use serde_json::json;
use std::error::Error;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "cv-settings",
    about = "A tool to inspect and edit the settings of the keypoint matching pipeline"
)]
struct Opt {
    /// The settings file to read.
    ///
    /// Defaults to the per-user settings file. A missing file is not an error.
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,
    /// Overrides a parameter, as `Group/name=value`. May be repeated.
    #[structopt(short = "s", long = "set", parse(try_from_str = parse_assignment))]
    assignments: Vec<(String, String)>,
    /// Writes the resulting settings back to the settings file.
    #[structopt(long)]
    save: bool,
    /// Lists every parameter with its current value and description.
    #[structopt(short, long)]
    list: bool,
    /// The number of accelerated devices to assume when selecting algorithms.
    #[structopt(short, long, default_value = "0")]
    devices: usize,
}

fn parse_assignment(text: &str) -> Result<(String, String), String> {
    text.split_once('=')
        .map(|(key, value)| (key.trim().to_owned(), value.to_owned()))
        .ok_or_else(|| format!("expected `key=value`, found \"{}\"", text))
}

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init_timed();
    let opt = Opt::from_args();
    let path = opt.config.clone().unwrap_or_else(ini_default_path);

    let mut store = ParameterStore::default();
    let layout = store.load(&path)?;
    for (key, value) in &opt.assignments {
        store.set_text(key, value)?;
    }
    if opt.save {
        store.save(&path, &layout)?;
    }

    if opt.list {
        for (key, value) in store.iter() {
            println!(
                "{} ({}) = {}\n    {}",
                key,
                value.parameter_type(),
                value.to_text(),
                store.description(key)?
            );
        }
        return Ok(());
    }

    let devices = opt.devices;
    let hardware = move || devices;
    let detector = select_detector(&store, &hardware)
        .map_err(|e| error!("{}", e))
        .ok();
    let extractor = select_extractor(&store, &hardware)
        .map_err(|e| error!("{}", e))
        .ok();
    let summary = json!({
        "settings": path,
        "detector": {
            "name": current_detector_type(&store),
            "selection": detector,
        },
        "descriptor": {
            "name": current_descriptor_type(&store),
            "selection": extractor,
        },
        "nearest_neighbor": {
            "name": current_nearest_neighbor_type(&store),
            "index": create_index_params(&store),
            "distance": distance_type(&store),
            "search": search_params(&store)?,
        },
        "homography": homography_method(&store),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
