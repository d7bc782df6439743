pub mod generator;
pub mod polyline;
pub mod spline;

use cgmath::Vector3;

pub use generator::{generate, Plane, Representation, RisingSpiral, Shape, StretchedCircle};
pub use polyline::Polyline;
pub use spline::{CatmullRomCurve, CurveType};

use crate::errors::PathError;

/// The route a moving object travels. Built once, never mutated.
#[derive(Debug, Clone)]
pub enum Path {
    Polyline(Polyline),
    Spline(CatmullRomCurve),
}

impl Path {
    /// Points for drawing the path. Polylines are drawn as they are, splines
    /// are sampled with the given number of divisions.
    pub fn display_points(&self, spline_divisions: usize) -> Vec<Vector3<f32>> {
        match self {
            Path::Polyline(line) => line.points().to_vec(),
            Path::Spline(curve) => curve.sample(spline_divisions),
        }
    }
}

fn check_finite(points: &[Vector3<f32>]) -> Result<(), PathError> {
    match points
        .iter()
        .position(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
    {
        Some(index) => Err(PathError::NonFinitePoint {
            index,
            point: points[index].into(),
        }),
        None => Ok(()),
    }
}
