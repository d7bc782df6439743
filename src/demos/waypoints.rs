use std::path::PathBuf;

use crate::camera::LookMode;
use crate::config::{
    CameraConfig, DemoConfig, FollowerConfig, ModelConfig, PageConfig, PathConfig, PathOffset,
    Placement,
};
use crate::path::{CurveType, Representation, Shape};
use crate::progress::ProgressSource;

pub const CYCLE_MS: u64 = 12_000;

/// A closed loop through five waypoints, flown on a clock instead of the scroll bar.
pub fn config() -> DemoConfig {
    DemoConfig {
        title: "rocketpath: waypoints".to_string(),
        background: 0xFEFEFE,
        asset_root: super::default_asset_root(),
        grid: None,
        planet: None,
        rocket: ModelConfig {
            asset: PathBuf::from("models/rocket.obj"),
            scale: 0.5,
            placement: Placement::Origin,
        },
        path: PathConfig {
            shape: Shape::Waypoints {
                points: vec![
                    [-10.0, 0.0, 10.0],
                    [-5.0, 5.0, 5.0],
                    [0.0, 0.0, 0.0],
                    [5.0, -5.0, 5.0],
                    [10.0, 0.0, 10.0],
                ],
            },
            representation: Representation::Spline {
                closed: true,
                curve_type: CurveType::Centripetal,
            },
            offset: PathOffset::Fixed,
            rotation_degrees: [0.0, 0.0, 0.0],
            color: 0xFF0000,
            display_divisions: 50,
        },
        follower: FollowerConfig::default(),
        progress: ProgressSource::Time { cycle_ms: CYCLE_MS },
        page: PageConfig::default(),
        camera: CameraConfig {
            position: [6.0, 4.0, 20.0],
            look: LookMode::Target([0.0, 0.0, 0.0]),
            fovy_degrees: 45.0,
            znear: 0.1,
            zfar: 1000.0,
            nudge_step: 1.0,
            zoom_speed: None,
        },
    }
}
