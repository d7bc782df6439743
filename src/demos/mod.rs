pub mod headless;
pub mod orbit;
pub mod spiral;
pub mod waypoints;
pub mod windowed;

use std::path::PathBuf;

pub use crate::args::Demos;
use crate::config::DemoConfig;

pub fn preset(demo: Demos) -> DemoConfig {
    match demo {
        Demos::Orbit => orbit::config(),
        Demos::Spiral => spiral::config(),
        Demos::Waypoints => waypoints::config(),
    }
}

/// The models shipped with the crate.
fn default_asset_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets")
}
