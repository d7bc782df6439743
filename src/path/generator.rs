use std::f32::consts::PI;

use cgmath::{Quaternion, Rotation, Vector3};
use serde::{Deserialize, Serialize};

use super::{CatmullRomCurve, CurveType, Path, Polyline};
use crate::errors::PathError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plane {
    /// x and y vary, z is held.
    Xy,
    /// x and z vary, y is held.
    Xz,
}

/// A circle through the plane origin, stretched independently along its two axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StretchedCircle {
    pub radius: f32,
    pub num_points: u32,
    pub plane: Plane,
    /// Stretch along the first and second in-plane axis.
    pub stretch: [f32; 2],
    /// Added to the second in-plane axis, e.g. to lift a model off the ground.
    pub offset: f32,
    /// Value of the coordinate that is not in the plane.
    pub held: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RisingSpiral {
    pub radius: f32,
    pub num_points: u32,
    pub height_increment: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    StretchedCircle(StretchedCircle),
    RisingSpiral(RisingSpiral),
    Waypoints { points: Vec<[f32; 3]> },
}

/// How the generated points are turned into a path. This also picks the way
/// the path is followed: polylines are followed with damping, splines are not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Representation {
    Polyline,
    Spline {
        closed: bool,
        #[serde(default)]
        curve_type: CurveType,
    },
}

/// Angle of point i out of num_points around a full turn.
fn angle(i: u32, num_points: u32) -> f32 {
    (i as f32 / num_points as f32) * PI * 2.0
}

/// Returns num_points + 1 points. The first and last coincide, closing the loop.
pub fn stretched_circle(circle: &StretchedCircle) -> Result<Vec<Vector3<f32>>, PathError> {
    if circle.num_points == 0 {
        return Err(PathError::NoSegments(circle.num_points));
    }

    let [first_stretch, second_stretch] = circle.stretch;
    let points = (0..=circle.num_points)
        .map(|i| {
            let angle = angle(i, circle.num_points);
            let first = -circle.radius * (f32::cos(angle) - 1.0) * first_stretch;
            let second = circle.radius * f32::sin(angle) * second_stretch + circle.offset;
            match circle.plane {
                Plane::Xy => Vector3::new(first, second, circle.held),
                Plane::Xz => Vector3::new(first, circle.held, second),
            }
        })
        .collect();
    Ok(points)
}

/// Returns num_points + 1 points on one turn of a spiral rising along y.
pub fn rising_spiral(spiral: &RisingSpiral) -> Result<Vec<Vector3<f32>>, PathError> {
    if spiral.num_points == 0 {
        return Err(PathError::NoSegments(spiral.num_points));
    }

    let points = (0..=spiral.num_points)
        .map(|i| {
            let angle = angle(i, spiral.num_points);
            Vector3::new(
                spiral.radius * f32::cos(angle),
                spiral.height_increment * i as f32,
                spiral.radius * f32::sin(angle),
            )
        })
        .collect();
    Ok(points)
}

/// The raw points of a shape, before any orientation is applied.
pub fn shape_points(shape: &Shape) -> Result<Vec<Vector3<f32>>, PathError> {
    match shape {
        Shape::StretchedCircle(circle) => stretched_circle(circle),
        Shape::RisingSpiral(spiral) => rising_spiral(spiral),
        Shape::Waypoints { points } => Ok(points.iter().map(|&p| Vector3::from(p)).collect()),
    }
}

/// Builds the path once. The orientation is applied to every point here so that
/// nothing downstream has to transform the path per frame.
pub fn generate(
    shape: &Shape,
    representation: Representation,
    orientation: Quaternion<f32>,
) -> Result<Path, PathError> {
    let mut points = shape_points(shape)?;
    if orientation != Quaternion::new(1.0, 0.0, 0.0, 0.0) {
        for point in points.iter_mut() {
            *point = orientation.rotate_vector(*point);
        }
    }

    match representation {
        Representation::Polyline => Ok(Path::Polyline(Polyline::new(points)?)),
        Representation::Spline { closed, curve_type } => Ok(Path::Spline(CatmullRomCurve::new(
            points, closed, curve_type,
        )?)),
    }
}
