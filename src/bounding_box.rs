use std::ops::Range;

use cgmath::{Matrix4, Vector3};

/// Axis aligned box, stored as the covered range along each axis.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    pub x_range: Range<f32>,
    pub y_range: Range<f32>,
    pub z_range: Range<f32>,
}

impl BoundingBox {
    /// The smallest box containing all the points, or None if there are no points.
    pub fn from_points<I>(points: I) -> Option<BoundingBox>
    where
        I: IntoIterator<Item = Vector3<f32>>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = BoundingBox {
            x_range: first.x..first.x,
            y_range: first.y..first.y,
            z_range: first.z..first.z,
        };
        for point in points {
            bounds.extend(point);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, point: Vector3<f32>) {
        self.x_range = self.x_range.start.min(point.x)..self.x_range.end.max(point.x);
        self.y_range = self.y_range.start.min(point.y)..self.y_range.end.max(point.y);
        self.z_range = self.z_range.start.min(point.z)..self.z_range.end.max(point.z);
    }

    pub fn min(&self) -> Vector3<f32> {
        Vector3::new(self.x_range.start, self.y_range.start, self.z_range.start)
    }

    pub fn max(&self) -> Vector3<f32> {
        Vector3::new(self.x_range.end, self.y_range.end, self.z_range.end)
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max() - self.min()
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min() + self.max()) * 0.5
    }

    /// The 8 corners, bottom face (-y) first, each face wound counter-clockwise seen from +y.
    pub fn corners(&self) -> [Vector3<f32>; 8] {
        let (min, max) = (self.min(), self.max());
        [
            Vector3::new(min.x, min.y, min.z),
            Vector3::new(max.x, min.y, min.z),
            Vector3::new(max.x, min.y, max.z),
            Vector3::new(min.x, min.y, max.z),
            Vector3::new(min.x, max.y, min.z),
            Vector3::new(max.x, max.y, min.z),
            Vector3::new(max.x, max.y, max.z),
            Vector3::new(min.x, max.y, max.z),
        ]
    }

    /// Box around this box after the transform is applied to it.
    /// Rotations grow the box; it is not the tightest fit of the underlying geometry.
    pub fn transformed(&self, transform: &Matrix4<f32>) -> BoundingBox {
        let corners = self
            .corners()
            .map(|corner| (transform * corner.extend(1.0)).truncate());
        // Never empty, we always have 8 corners.
        BoundingBox::from_points(corners).unwrap_or_else(|| self.clone())
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{assert_relative_eq, Matrix4, Vector3};

    use super::BoundingBox;

    #[test]
    fn from_points_empty() {
        assert!(BoundingBox::from_points(Vec::<Vector3<f32>>::new()).is_none());
    }

    #[test]
    fn from_points_size() {
        let bounds = BoundingBox::from_points(vec![
            Vector3::new(-1.0, 0.0, 2.0),
            Vector3::new(3.0, -2.0, 0.5),
            Vector3::new(0.0, 4.0, 1.0),
        ])
        .unwrap();
        assert_eq!(Vector3::new(4.0, 6.0, 1.5), bounds.size());
        assert_eq!(Vector3::new(1.0, 1.0, 1.25), bounds.center());
    }

    #[test]
    fn transformed_by_scale() {
        let bounds = BoundingBox::from_points(vec![
            Vector3::new(-1.0, -1.0, -1.0),
            Vector3::new(1.0, 1.0, 1.0),
        ])
        .unwrap();
        let scaled = bounds.transformed(&Matrix4::from_nonuniform_scale(5.0, 2.0, 1.0));
        assert_relative_eq!(Vector3::new(10.0, 4.0, 2.0), scaled.size());
    }
}
