use cgmath::Vector3;

use crate::errors::PathError;

/// Points sampled directly from a parametric formula, followed index by index.
#[derive(Debug, Clone)]
pub struct Polyline {
    points: Vec<Vector3<f32>>,
}

impl Polyline {
    pub fn new(points: Vec<Vector3<f32>>) -> Result<Polyline, PathError> {
        if points.len() < 2 {
            return Err(PathError::TooFewPoints {
                required: 2,
                found: points.len(),
            });
        }
        super::check_finite(&points)?;
        Ok(Polyline { points })
    }

    pub fn points(&self) -> &[Vector3<f32>] {
        &self.points
    }

    /// The generator's segment count, one less than the number of points.
    pub fn num_segments(&self) -> usize {
        self.points.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Vector3;

    use super::Polyline;

    #[test]
    fn needs_two_points() {
        assert!(Polyline::new(vec![]).is_err());
        assert!(Polyline::new(vec![Vector3::new(0.0, 0.0, 0.0)]).is_err());
        let line = Polyline::new(vec![Vector3::new(0.0, 0.0, 0.0); 2]).unwrap();
        assert_eq!(1, line.num_segments());
    }

    #[test]
    fn rejects_nan() {
        assert!(Polyline::new(vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(f32::NAN, 0.0, 0.0)
        ])
        .is_err());
    }
}
