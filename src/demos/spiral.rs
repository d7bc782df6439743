use std::path::PathBuf;

use crate::camera::LookMode;
use crate::config::{
    CameraConfig, DemoConfig, FollowerConfig, ModelConfig, PageConfig, PathConfig, PathOffset,
    Placement,
};
use crate::path::{CurveType, Representation, RisingSpiral, Shape};
use crate::progress::ProgressSource;

/// One turn of a slowly rising spiral around the planet, followed smoothly along a spline.
pub fn config() -> DemoConfig {
    DemoConfig {
        title: "rocketpath: spiral".to_string(),
        background: 0x000000,
        asset_root: super::default_asset_root(),
        grid: None,
        planet: Some(ModelConfig {
            asset: PathBuf::from("models/planet.obj"),
            scale: 5.0,
            placement: Placement::Fixed {
                position: [0.0, -5.0, 0.0],
            },
        }),
        rocket: ModelConfig {
            asset: PathBuf::from("models/rocket.obj"),
            scale: 2.0,
            // Only seen before the first frame moves it onto the path.
            placement: Placement::Fixed {
                position: [0.0, -5.0, 10.0],
            },
        },
        path: PathConfig {
            shape: Shape::RisingSpiral(RisingSpiral {
                radius: 10.0,
                num_points: 200,
                height_increment: 0.05,
            }),
            representation: Representation::Spline {
                closed: false,
                curve_type: CurveType::Centripetal,
            },
            offset: PathOffset::Fixed,
            rotation_degrees: [0.0, 0.0, 0.0],
            color: 0xFF0000,
            display_divisions: 50,
        },
        follower: FollowerConfig::default(),
        progress: ProgressSource::Scroll,
        page: PageConfig::default(),
        camera: CameraConfig {
            position: [0.0, 10.0, 35.0],
            look: LookMode::Target([0.0, 0.0, 0.0]),
            fovy_degrees: 75.0,
            znear: 0.1,
            zfar: 1000.0,
            nudge_step: 1.0,
            zoom_speed: None,
        },
    }
}
