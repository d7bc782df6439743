use std::path::{Path, PathBuf};

use cgmath::{Deg, Euler, Quaternion};
use serde::{Deserialize, Serialize};
use toml::Value;

use crate::camera::LookMode;
use crate::errors::ConfigError;
use crate::follower::DAMPING_DEFAULT;
use crate::path::{Representation, Shape};
use crate::progress::ProgressSource;

/// Everything a demo needs to build its scene. Each demo has a preset, and a
/// TOML file can override any part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    pub title: String,
    /// Background colour as 0xRRGGBB.
    pub background: u32,
    /// Model paths are relative to this directory unless absolute.
    pub asset_root: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planet: Option<ModelConfig>,
    pub rocket: ModelConfig,
    pub path: PathConfig,
    pub follower: FollowerConfig,
    pub progress: ProgressSource,
    pub page: PageConfig,
    pub camera: CameraConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub size: f32,
    pub divisions: u32,
    pub center_color: u32,
    pub color: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            size: 10.0,
            divisions: 10,
            center_color: 0x444444,
            color: 0x888888,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub asset: PathBuf,
    /// Uniform scale applied when the model arrives.
    pub scale: f32,
    pub placement: Placement,
}

/// Where a model is put once it has loaded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Origin,
    Fixed { position: [f32; 3] },
    /// Centred on the y axis with its top `gap` below the ground plane.
    BelowGround { gap: f32 },
}

/// Where the vertical offset of a stretched circle comes from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathOffset {
    /// Use the offset written in the shape.
    Fixed,
    /// Half the rocket's scaled height. The path waits for the rocket to load.
    HalfRocketHeight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathConfig {
    pub shape: Shape,
    pub representation: Representation,
    pub offset: PathOffset,
    /// Euler angles applied to every point when the path is built.
    pub rotation_degrees: [f32; 3],
    pub color: u32,
    /// Samples used to draw a spline.
    pub display_divisions: usize,
}

impl PathConfig {
    pub fn orientation(&self) -> Quaternion<f32> {
        let [x, y, z] = self.rotation_degrees;
        Quaternion::from(Euler::new(Deg(x), Deg(y), Deg(z)))
    }

    pub fn depends_on_rocket(&self) -> bool {
        self.offset == PathOffset::HalfRocketHeight
    }

    /// The shape to generate, given the rocket's scaled height if it is known.
    /// Only stretched circles take an offset; other shapes are returned unchanged.
    pub fn resolved_shape(&self, rocket_height: Option<f32>) -> Shape {
        match (&self.shape, self.offset, rocket_height) {
            (Shape::StretchedCircle(circle), PathOffset::HalfRocketHeight, Some(height)) => {
                let mut circle = circle.clone();
                circle.offset = height / 2.0;
                Shape::StretchedCircle(circle)
            }
            (shape, _, _) => shape.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FollowerConfig {
    /// Fraction of the remaining distance covered per frame on a polyline.
    pub damping: f32,
}

impl Default for FollowerConfig {
    fn default() -> Self {
        FollowerConfig {
            damping: DAMPING_DEFAULT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    /// Document height in viewport heights.
    pub screens: f32,
    /// Used until the host reports a real size.
    pub viewport_height: f32,
    /// Pixels scrolled per mouse wheel line.
    pub wheel_step: f32,
}

impl Default for PageConfig {
    fn default() -> Self {
        PageConfig {
            screens: 5.0,
            viewport_height: 720.0,
            wheel_step: 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub look: LookMode,
    pub fovy_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
    /// Distance moved per key press.
    pub nudge_step: f32,
    /// Zoom out with the scroll offset when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom_speed: Option<f32>,
}

impl DemoConfig {
    pub fn asset_path(&self, model: &ModelConfig) -> PathBuf {
        // join keeps absolute paths as they are.
        self.asset_root.join(&model.asset)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.follower.damping) {
            return Err(ConfigError::Invalid(format!(
                "follower.damping must be in [0, 1], got {}",
                self.follower.damping
            )));
        }
        for (name, model) in [("rocket", Some(&self.rocket)), ("planet", self.planet.as_ref())] {
            if let Some(model) = model {
                if !(model.scale.is_finite() && model.scale > 0.0) {
                    return Err(ConfigError::Invalid(format!(
                        "{}.scale must be positive, got {}",
                        name, model.scale
                    )));
                }
            }
        }
        if !(self.page.screens >= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "page.screens must be at least 1, got {}",
                self.page.screens
            )));
        }
        let camera = &self.camera;
        if !(camera.fovy_degrees > 0.0 && camera.fovy_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "camera.fovy_degrees must be in (0, 180), got {}",
                camera.fovy_degrees
            )));
        }
        if !(camera.znear > 0.0 && camera.zfar > camera.znear) {
            return Err(ConfigError::Invalid(format!(
                "camera clip planes must satisfy 0 < znear < zfar, got {} and {}",
                camera.znear, camera.zfar
            )));
        }
        if self.path.display_divisions == 0 {
            return Err(ConfigError::Invalid(
                "path.display_divisions must be at least 1".to_string(),
            ));
        }
        if self.path.depends_on_rocket() && !matches!(self.path.shape, Shape::StretchedCircle(_)) {
            log::warn!("path.offset only applies to stretched circles and will be ignored");
        }
        if let ProgressSource::Time { cycle_ms: 0 } = self.progress {
            log::warn!("progress cycle is 0 ms, the rocket will not move");
        }
        Ok(())
    }
}

/// Reads a TOML file and merges it over the preset. Keys missing from the
/// file keep their preset values.
pub fn load_overlay(path: &Path, preset: DemoConfig) -> Result<DemoConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = apply_overlay(preset, &text)?;
    log::info!("applied config overlay from {}", path.display());
    Ok(config)
}

pub fn apply_overlay(preset: DemoConfig, overlay: &str) -> Result<DemoConfig, ConfigError> {
    let overlay: Value = toml::from_str(overlay)?;
    let mut merged = Value::try_from(&preset)?;
    merge(&mut merged, overlay);
    Ok(merged.try_into()?)
}

/// Recursively merges tables. Anything that isn't a table on both sides is replaced.
fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base), Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) if !switches_variant(existing, &value) => merge(existing, value),
                    _ => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Enum variants serialize as single key tables. A different key means a
/// different variant, whose fields must not be mixed with the old ones.
fn switches_variant(existing: &Value, replacement: &Value) -> bool {
    match (existing, replacement) {
        (Value::Table(existing), Value::Table(replacement)) => {
            existing.len() == 1
                && !replacement.is_empty()
                && replacement.keys().all(|key| !existing.contains_key(key))
        }
        _ => false,
    }
}
