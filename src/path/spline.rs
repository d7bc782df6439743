use cgmath::{InnerSpace, Vector3, Zero};
use serde::{Deserialize, Serialize};

use crate::errors::PathError;

/// Number of chords used to approximate the curve length for arc length parameterization.
const ARC_LENGTH_DIVISIONS: usize = 200;

/// Below this, a chord between control points is treated as zero length.
const MIN_CHORD: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveType {
    /// Knot spacing by the square root of the chord length. Avoids cusps and self intersections.
    Centripetal,
    /// Knot spacing by the chord length.
    Chordal,
    /// Uniform knot spacing. Tension 0.5 is the classic Catmull-Rom spline.
    Uniform { tension: f32 },
}

impl Default for CurveType {
    fn default() -> Self {
        CurveType::Centripetal
    }
}

/// Cubic polynomial c0 + c1*t + c2*t^2 + c3*t^3 for one span of the spline.
struct CubicPoly {
    c0: Vector3<f32>,
    c1: Vector3<f32>,
    c2: Vector3<f32>,
    c3: Vector3<f32>,
}

impl CubicPoly {
    /// Hermite form from the two end points and their tangents.
    fn hermite(
        x0: Vector3<f32>,
        x1: Vector3<f32>,
        t0: Vector3<f32>,
        t1: Vector3<f32>,
    ) -> CubicPoly {
        CubicPoly {
            c0: x0,
            c1: t0,
            c2: -3.0 * x0 + 3.0 * x1 - 2.0 * t0 - t1,
            c3: 2.0 * x0 - 2.0 * x1 + t0 + t1,
        }
    }

    fn uniform(
        p0: Vector3<f32>,
        p1: Vector3<f32>,
        p2: Vector3<f32>,
        p3: Vector3<f32>,
        tension: f32,
    ) -> CubicPoly {
        CubicPoly::hermite(p1, p2, tension * (p2 - p0), tension * (p3 - p1))
    }

    /// Catmull-Rom with non uniform knot intervals dt0, dt1, dt2 between p0..p3.
    fn non_uniform(
        p0: Vector3<f32>,
        p1: Vector3<f32>,
        p2: Vector3<f32>,
        p3: Vector3<f32>,
        dt0: f32,
        dt1: f32,
        dt2: f32,
    ) -> CubicPoly {
        let t1 = (p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1;
        let t2 = (p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2;
        // Rescale the tangents for parameter t in [0, 1] over the span.
        CubicPoly::hermite(p1, p2, t1 * dt1, t2 * dt1)
    }

    fn point(&self, t: f32) -> Vector3<f32> {
        let t2 = t * t;
        let t3 = t2 * t;
        self.c0 + self.c1 * t + self.c2 * t2 + self.c3 * t3
    }

    fn derivative(&self, t: f32) -> Vector3<f32> {
        self.c1 + self.c2 * (2.0 * t) + self.c3 * (3.0 * t * t)
    }
}

/// A smooth curve interpolating its control points. Immutable once built.
#[derive(Debug, Clone)]
pub struct CatmullRomCurve {
    points: Vec<Vector3<f32>>,
    closed: bool,
    curve_type: CurveType,
    /// Cumulative chord lengths at t = i / ARC_LENGTH_DIVISIONS.
    arc_lengths: Vec<f32>,
}

impl CatmullRomCurve {
    pub fn new(
        points: Vec<Vector3<f32>>,
        closed: bool,
        curve_type: CurveType,
    ) -> Result<CatmullRomCurve, PathError> {
        if points.len() < 2 {
            return Err(PathError::TooFewPoints {
                required: 2,
                found: points.len(),
            });
        }
        super::check_finite(&points)?;

        let mut curve = CatmullRomCurve {
            points,
            closed,
            curve_type,
            arc_lengths: Vec::new(),
        };
        curve.arc_lengths = curve.compute_arc_lengths();
        Ok(curve)
    }

    pub fn control_points(&self) -> &[Vector3<f32>] {
        &self.points
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn length(&self) -> f32 {
        self.arc_lengths.last().copied().unwrap_or(0.0)
    }

    /// Position by curve parameter t in [0, 1]. Spans are equally sized in t,
    /// so speed along the curve varies with the control point spacing.
    pub fn point(&self, t: f32) -> Vector3<f32> {
        let (span, weight) = self.span_at(t);
        self.span_poly(span).point(weight)
    }

    /// Derivative with respect to t, not normalized.
    pub fn derivative(&self, t: f32) -> Vector3<f32> {
        let (span, weight) = self.span_at(t);
        self.span_poly(span).derivative(weight) * self.num_spans() as f32
    }

    /// Position at fraction u in [0, 1] of the curve length.
    pub fn point_at(&self, u: f32) -> Vector3<f32> {
        self.point(self.u_to_t(u))
    }

    /// Unit direction of travel at fraction u of the curve length.
    /// Zero where the curve is stationary, e.g. along coincident control points.
    pub fn tangent_at(&self, u: f32) -> Vector3<f32> {
        let derivative = self.derivative(self.u_to_t(u));
        if derivative.magnitude2() > f32::EPSILON {
            derivative.normalize()
        } else {
            Vector3::zero()
        }
    }

    /// n + 1 points evenly spaced in t, for drawing.
    pub fn sample(&self, divisions: usize) -> Vec<Vector3<f32>> {
        if divisions == 0 {
            return vec![self.point(0.0)];
        }
        (0..=divisions)
            .map(|i| self.point(i as f32 / divisions as f32))
            .collect()
    }

    fn num_spans(&self) -> usize {
        if self.closed {
            self.points.len()
        } else {
            self.points.len() - 1
        }
    }

    /// The span index containing t, and the local parameter within it.
    fn span_at(&self, t: f32) -> (usize, f32) {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let scaled = self.num_spans() as f32 * t;
        let span = (scaled.floor() as usize).min(self.num_spans() - 1);
        (span, scaled - span as f32)
    }

    fn span_poly(&self, span: usize) -> CubicPoly {
        let n = self.points.len();
        let p1 = self.points[span % n];
        let p2 = self.points[(span + 1) % n];
        // Open curves extrapolate a phantom point beyond each end.
        let p0 = if self.closed || span > 0 {
            self.points[(span + n - 1) % n]
        } else {
            2.0 * self.points[0] - self.points[1]
        };
        let p3 = if self.closed || span + 2 < n {
            self.points[(span + 2) % n]
        } else {
            2.0 * self.points[n - 1] - self.points[n - 2]
        };

        match self.curve_type {
            CurveType::Uniform { tension } => CubicPoly::uniform(p0, p1, p2, p3, tension),
            CurveType::Centripetal | CurveType::Chordal => {
                let power = if self.curve_type == CurveType::Chordal {
                    0.5
                } else {
                    0.25
                };
                let mut dt0 = (p1 - p0).magnitude2().powf(power);
                let mut dt1 = (p2 - p1).magnitude2().powf(power);
                let mut dt2 = (p3 - p2).magnitude2().powf(power);

                // Coincident points would divide by zero.
                if dt1 < MIN_CHORD {
                    dt1 = 1.0;
                }
                if dt0 < MIN_CHORD {
                    dt0 = dt1;
                }
                if dt2 < MIN_CHORD {
                    dt2 = dt1;
                }
                CubicPoly::non_uniform(p0, p1, p2, p3, dt0, dt1, dt2)
            }
        }
    }

    fn compute_arc_lengths(&self) -> Vec<f32> {
        let mut lengths = Vec::with_capacity(ARC_LENGTH_DIVISIONS + 1);
        let mut total = 0.0;
        let mut last = self.point(0.0);
        lengths.push(0.0);
        for i in 1..=ARC_LENGTH_DIVISIONS {
            let current = self.point(i as f32 / ARC_LENGTH_DIVISIONS as f32);
            total += (current - last).magnitude();
            lengths.push(total);
            last = current;
        }
        lengths
    }

    /// Maps a fraction of the curve length to the curve parameter t.
    fn u_to_t(&self, u: f32) -> f32 {
        let u = if u.is_finite() { u.clamp(0.0, 1.0) } else { 0.0 };
        let total = self.length();
        if total <= 0.0 {
            return u;
        }
        let target = u * total;

        // Last sample whose cumulative length is <= target.
        let i = self
            .arc_lengths
            .partition_point(|&length| length <= target)
            .saturating_sub(1)
            .min(ARC_LENGTH_DIVISIONS - 1);

        let before = self.arc_lengths[i];
        let after = self.arc_lengths[i + 1];
        let segment = after - before;
        let fraction = if segment > 0.0 {
            (target - before) / segment
        } else {
            0.0
        };
        (i as f32 + fraction) / ARC_LENGTH_DIVISIONS as f32
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{assert_abs_diff_eq, assert_relative_eq, InnerSpace, Vector3};

    use super::{CatmullRomCurve, CurveType};

    fn waypoints() -> Vec<Vector3<f32>> {
        vec![
            Vector3::new(-10.0, 0.0, 10.0),
            Vector3::new(-5.0, 5.0, 5.0),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(5.0, -5.0, 5.0),
            Vector3::new(10.0, 0.0, 10.0),
        ]
    }

    #[test]
    fn too_few_points() {
        let single = vec![Vector3::new(0.0, 0.0, 0.0)];
        assert!(CatmullRomCurve::new(single, false, CurveType::default()).is_err());
    }

    #[test]
    fn open_curve_starts_and_ends_at_control_points() {
        let curve = CatmullRomCurve::new(waypoints(), false, CurveType::Centripetal).unwrap();
        assert_relative_eq!(waypoints()[0], curve.point_at(0.0));
        assert_abs_diff_eq!(waypoints()[4], curve.point_at(1.0), epsilon = 1e-4);
    }

    #[test]
    fn passes_through_every_control_point() {
        let points = waypoints();
        let curve = CatmullRomCurve::new(points.clone(), false, CurveType::Centripetal).unwrap();
        for (i, point) in points.iter().enumerate() {
            let t = i as f32 / (points.len() - 1) as f32;
            assert_abs_diff_eq!(*point, curve.point(t), epsilon = 1e-4);
        }
    }

    #[test]
    fn closed_curve_is_continuous() {
        let curve = CatmullRomCurve::new(waypoints(), true, CurveType::Centripetal).unwrap();
        assert_abs_diff_eq!(curve.point_at(0.0), curve.point_at(1.0), epsilon = 1e-4);
        assert_abs_diff_eq!(curve.tangent_at(0.0), curve.tangent_at(1.0), epsilon = 1e-3);
    }

    #[test]
    fn tangent_is_unit_in_the_interior() {
        for curve_type in [
            CurveType::Centripetal,
            CurveType::Chordal,
            CurveType::Uniform { tension: 0.5 },
        ] {
            let curve = CatmullRomCurve::new(waypoints(), false, curve_type).unwrap();
            for i in 1..100 {
                let tangent = curve.tangent_at(i as f32 / 100.0);
                assert_relative_eq!(1.0, tangent.magnitude(), epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn point_at_is_spaced_by_length() {
        // Second span is 9 times longer than the first.
        let curve = CatmullRomCurve::new(
            vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(10.0, 0.0, 0.0),
            ],
            false,
            CurveType::Centripetal,
        )
        .unwrap();
        assert_abs_diff_eq!(10.0, curve.length(), epsilon = 1e-2);
        assert_abs_diff_eq!(5.0, curve.point_at(0.5).x, epsilon = 5e-2);
    }

    #[test]
    fn sample_count_and_ends() {
        let curve = CatmullRomCurve::new(waypoints(), false, CurveType::Centripetal).unwrap();
        let samples = curve.sample(50);
        assert_eq!(51, samples.len());
        assert_relative_eq!(waypoints()[0], samples[0]);

        let start = curve.sample(0);
        assert_eq!(1, start.len());
        assert_relative_eq!(waypoints()[0], start[0]);
    }

    #[test]
    fn out_of_range_parameters_clamp() {
        let curve = CatmullRomCurve::new(waypoints(), false, CurveType::Centripetal).unwrap();
        assert_relative_eq!(curve.point_at(0.0), curve.point_at(-3.0));
        assert_relative_eq!(curve.point_at(1.0), curve.point_at(7.0));
        assert_relative_eq!(curve.point_at(0.0), curve.point_at(f32::NAN));
    }

    #[test]
    fn coincident_points_do_not_produce_nan() {
        let curve = CatmullRomCurve::new(
            vec![Vector3::new(1.0, 1.0, 1.0), Vector3::new(1.0, 1.0, 1.0)],
            false,
            CurveType::Centripetal,
        )
        .unwrap();
        let point = curve.point_at(0.5);
        let tangent = curve.tangent_at(0.5);
        assert!(point.x.is_finite() && point.y.is_finite() && point.z.is_finite());
        assert_eq!(Vector3::new(0.0, 0.0, 0.0), tangent);
    }
}
