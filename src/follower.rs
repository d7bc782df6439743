use cgmath::{InnerSpace, Vector3, VectorSpace};

use crate::path::{CatmullRomCurve, Path, Polyline};
use crate::scene::Node;

/// Directions shorter than this are treated as "not moving" and never normalized.
const MIN_DIRECTION_MAGNITUDE2: f32 = 1e-12;

pub const DAMPING_DEFAULT: f32 = 0.1;

/// Where a moving object should be this frame, and what it should face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vector3<f32>,
    /// None when the direction of travel is degenerate; keep the previous orientation.
    pub look_target: Option<Vector3<f32>>,
}

impl Pose {
    pub fn apply_to(&self, node: &mut Node) {
        node.position = self.position;
        if let Some(target) = self.look_target {
            node.look_at(target);
        }
    }
}

/// Moves an object along a path from a progress value.
///
/// Polylines are followed by index with lerp smoothing: each frame the object
/// covers `damping` of the remaining distance to the indexed point. This is a
/// per-frame low pass filter, so the lag depends on the frame rate.
/// Splines are followed exactly, with no smoothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Follower {
    damping: f32,
}

impl Default for Follower {
    fn default() -> Self {
        Follower::new(DAMPING_DEFAULT)
    }
}

impl Follower {
    pub fn new(damping: f32) -> Follower {
        Follower {
            damping: damping.clamp(0.0, 1.0),
        }
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    pub fn set_damping(&mut self, damping: f32) {
        self.damping = damping.clamp(0.0, 1.0);
    }

    /// `current` is the object's position last frame, used for smoothing.
    pub fn advance(&self, path: &Path, progress: f32, current: Vector3<f32>) -> Pose {
        let progress = if progress.is_finite() { progress } else { 0.0 };
        match path {
            Path::Polyline(line) => self.follow_polyline(line, progress, current),
            Path::Spline(curve) => follow_spline(curve, progress),
        }
    }

    fn follow_polyline(&self, line: &Polyline, progress: f32, current: Vector3<f32>) -> Pose {
        let points = line.points();
        let num_points = line.num_segments();

        // Negative progress saturates to 0 in the cast.
        let index = ((progress * num_points as f32).floor() as usize).min(num_points);
        let next_index = (index + 1).min(num_points - 1);

        let target = points[index];
        let direction = points[next_index] - target;

        Pose {
            position: current.lerp(target, self.damping),
            look_target: look_target(target, direction),
        }
    }
}

fn follow_spline(curve: &CatmullRomCurve, progress: f32) -> Pose {
    let position = curve.point_at(progress);
    Pose {
        position,
        look_target: look_target(position, curve.tangent_at(progress)),
    }
}

fn look_target(from: Vector3<f32>, direction: Vector3<f32>) -> Option<Vector3<f32>> {
    if direction.magnitude2() < MIN_DIRECTION_MAGNITUDE2 {
        return None;
    }
    Some(from + direction.normalize())
}

#[cfg(test)]
mod tests {
    use cgmath::{assert_abs_diff_eq, assert_relative_eq, InnerSpace, Vector3, Zero};

    use super::{Follower, Pose};
    use crate::path::{CatmullRomCurve, CurveType, Path, Polyline};
    use crate::scene::Node;

    fn line(points: Vec<[f32; 3]>) -> Path {
        Path::Polyline(Polyline::new(points.into_iter().map(Vector3::from).collect()).unwrap())
    }

    #[test]
    fn polyline_damps_toward_target() {
        let path = line(vec![[0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [20.0, 0.0, 0.0]]);
        let follower = Follower::new(0.1);

        // progress 0.5 of 2 segments is index 1.
        let pose = follower.advance(&path, 0.5, Vector3::zero());
        assert_relative_eq!(Vector3::new(1.0, 0.0, 0.0), pose.position);
        // next index is min(2, num_points - 1) = 1, the same point.
        assert_eq!(None, pose.look_target);

        let pose = follower.advance(&path, 0.0, Vector3::new(10.0, 0.0, 0.0));
        assert_relative_eq!(Vector3::new(9.0, 0.0, 0.0), pose.position);
        assert_relative_eq!(Vector3::new(1.0, 0.0, 0.0), pose.look_target.unwrap());
    }

    #[test]
    fn polyline_converges_over_frames() {
        let path = line(vec![[0.0, 0.0, 0.0], [0.0, 4.0, 0.0]]);
        let follower = Follower::new(0.1);
        let mut position = Vector3::new(0.0, 0.0, 0.0);
        for _ in 0..200 {
            position = follower.advance(&path, 1.0, position).position;
        }
        assert_abs_diff_eq!(Vector3::new(0.0, 4.0, 0.0), position, epsilon = 1e-3);
    }

    #[test]
    fn polyline_index_is_clamped() {
        let path = line(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [3.0, 0.0, 0.0]]);
        let follower = Follower::new(1.0);
        assert_relative_eq!(
            Vector3::new(3.0, 0.0, 0.0),
            follower.advance(&path, 5.0, Vector3::zero()).position
        );
        assert_relative_eq!(
            Vector3::new(0.0, 0.0, 0.0),
            follower.advance(&path, -2.0, Vector3::zero()).position
        );
        assert_relative_eq!(
            Vector3::new(0.0, 0.0, 0.0),
            follower.advance(&path, f32::NAN, Vector3::zero()).position
        );
    }

    #[test]
    fn coincident_points_keep_orientation() {
        let path = line(vec![[1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 1.0]]);
        let pose = Follower::default().advance(&path, 0.2, Vector3::zero());
        assert!(pose.look_target.is_none());
        assert!(pose.position.x.is_finite());

        let mut node = Node::default();
        node.look_at(Vector3::new(0.0, 0.0, 5.0));
        let rotation = node.rotation;
        pose.apply_to(&mut node);
        assert_eq!(rotation, node.rotation);
        assert_eq!(pose.position, node.position);
    }

    #[test]
    fn spline_is_placed_directly() {
        let curve = CatmullRomCurve::new(
            vec![
                Vector3::new(-10.0, 0.0, 10.0),
                Vector3::new(-5.0, 5.0, 5.0),
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(5.0, -5.0, 5.0),
            ],
            false,
            CurveType::Centripetal,
        )
        .unwrap();
        let expected = curve.point_at(0.3);
        let path = Path::Spline(curve);

        // Current position does not matter, there is no smoothing.
        let pose = Follower::new(0.1).advance(&path, 0.3, Vector3::new(100.0, 0.0, 0.0));
        assert_relative_eq!(expected, pose.position);
        let look = pose.look_target.unwrap();
        assert_relative_eq!(1.0, (look - pose.position).magnitude(), epsilon = 1e-5);
    }

    #[test]
    fn apply_faces_look_target() {
        let pose = Pose {
            position: Vector3::new(1.0, 2.0, 3.0),
            look_target: Some(Vector3::new(2.0, 2.0, 3.0)),
        };
        let mut node = Node::default();
        pose.apply_to(&mut node);
        assert_abs_diff_eq!(Vector3::new(1.0, 0.0, 0.0), node.forward(), epsilon = 1e-5);
    }

    #[test]
    fn damping_is_clamped() {
        assert_eq!(1.0, Follower::new(3.0).damping());
        assert_eq!(0.0, Follower::new(-1.0).damping());
    }
}
