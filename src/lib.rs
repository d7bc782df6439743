pub mod args;
pub mod assets;
pub mod bounding_box;
pub mod camera;
pub mod config;
pub mod context;
pub mod demos;
pub mod errors;
pub mod follower;
pub mod graphics;
pub mod gui;
pub mod path;
pub mod progress;
pub mod scene;
