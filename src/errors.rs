use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathError {
    /// Circle and spiral generators need at least one segment.
    #[error("a generated path needs at least 1 segment, got num_points = {0}")]
    NoSegments(u32),

    #[error("a path needs at least {required} points, got {found}")]
    TooFewPoints { required: usize, found: usize },

    #[error("path point {index} is not finite: {point:?}")]
    NonFinitePoint { index: usize, point: [f32; 3] },
}

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("failed to start a loader thread for {}: {source}", .path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to import glTF: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("failed to load obj: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("unsupported model format for {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("model {} contains no vertex positions", .0.display())]
    Empty(PathBuf),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
