pub mod camera;
pub mod gpu_interface;
pub mod lines;
pub mod rendering;
