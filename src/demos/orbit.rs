use std::path::PathBuf;

use crate::camera::LookMode;
use crate::config::{
    CameraConfig, DemoConfig, FollowerConfig, GridConfig, ModelConfig, PageConfig, PathConfig,
    PathOffset, Placement,
};
use crate::path::{Plane, Representation, Shape, StretchedCircle};
use crate::progress::ProgressSource;

/// The rocket loops around a tall stretched circle in front of the planet,
/// stepping through the points as the page scrolls.
pub fn config() -> DemoConfig {
    DemoConfig {
        title: "rocketpath: orbit".to_string(),
        background: 0x87CEEB,
        asset_root: super::default_asset_root(),
        grid: Some(GridConfig {
            size: 200.0,
            divisions: 50,
            ..Default::default()
        }),
        planet: Some(ModelConfig {
            asset: PathBuf::from("models/planet.obj"),
            scale: 5.0,
            placement: Placement::BelowGround { gap: 1.0 },
        }),
        rocket: ModelConfig {
            asset: PathBuf::from("models/rocket.obj"),
            scale: 3.0,
            placement: Placement::Origin,
        },
        path: PathConfig {
            shape: Shape::StretchedCircle(StretchedCircle {
                radius: 30.0,
                num_points: 100,
                plane: Plane::Xy,
                stretch: [1.5, 4.0],
                offset: 0.0,
                held: 0.0,
            }),
            representation: Representation::Polyline,
            offset: PathOffset::HalfRocketHeight,
            rotation_degrees: [0.0, 0.0, 0.0],
            color: 0xFF0000,
            display_divisions: 100,
        },
        follower: FollowerConfig::default(),
        progress: ProgressSource::Scroll,
        page: PageConfig::default(),
        camera: CameraConfig {
            position: [0.0, -1.0, 35.0],
            look: LookMode::Forward,
            fovy_degrees: 75.0,
            znear: 0.1,
            zfar: 1000.0,
            nudge_step: 1.0,
            zoom_speed: None,
        },
    }
}
