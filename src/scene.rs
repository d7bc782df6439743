use cgmath::{InnerSpace, Matrix3, Matrix4, Quaternion, Rotation, Vector3, Zero};

use crate::bounding_box::BoundingBox;

/// Below this, a look direction is too short to orient a node with.
const MIN_LOOK_DISTANCE2: f32 = 1e-12;

/// Converts a 0xRRGGBB colour to linear-ish floats in [0, 1].
pub fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
    ]
}

/// A transform in the scene graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Node {
    fn default() -> Self {
        Node {
            position: Vector3::zero(),
            rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Node {
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// The node's local +z axis in world space. Models face +z.
    pub fn forward(&self) -> Vector3<f32> {
        self.rotation.rotate_vector(Vector3::unit_z())
    }

    /// Rotates the node so that its +z axis points at the target, keeping +y up where possible.
    /// Does nothing if the target is on top of the node.
    pub fn look_at(&mut self, target: Vector3<f32>) {
        let to_target = target - self.position;
        if to_target.magnitude2() < MIN_LOOK_DISTANCE2 {
            return;
        }
        let z = to_target.normalize();

        // Looking straight up or down, y can't be the up vector.
        let up = if z.cross(Vector3::unit_y()).magnitude2() < MIN_LOOK_DISTANCE2 {
            Vector3::unit_z()
        } else {
            Vector3::unit_y()
        };
        let x = up.cross(z).normalize();
        let y = z.cross(x);
        self.rotation = Quaternion::from(Matrix3::from_cols(x, y, z));
    }
}

/// A loaded model placed in the scene.
#[derive(Debug, Clone)]
pub struct Model {
    pub name: String,
    pub node: Node,
    /// Bounds of the geometry in the model's own space.
    pub local_bounds: BoundingBox,
}

impl Model {
    pub fn world_bounds(&self) -> BoundingBox {
        self.local_bounds.transformed(&self.node.matrix())
    }

    /// Size after scale and rotation.
    pub fn size(&self) -> Vector3<f32> {
        self.world_bounds().size()
    }
}

/// A square grid on the ground plane, centred on the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub size: f32,
    pub divisions: u32,
    pub center_color: [f32; 3],
    pub color: [f32; 3],
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathLine {
    pub points: Vec<Vector3<f32>>,
    pub color: [f32; 3],
}

/// Everything that gets drawn. Models are None until their asset has loaded,
/// and stay None if loading failed.
#[derive(Debug, Clone)]
pub struct Scene {
    pub background: [f32; 3],
    pub grid: Option<Grid>,
    pub path_line: Option<PathLine>,
    pub planet: Option<Model>,
    pub rocket: Option<Model>,
}

impl Scene {
    pub fn new(background: [f32; 3]) -> Scene {
        Scene {
            background,
            grid: None,
            path_line: None,
            planet: None,
            rocket: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{assert_abs_diff_eq, InnerSpace, Vector3};

    use super::{rgb, Model, Node};
    use crate::bounding_box::BoundingBox;

    #[test]
    fn hex_colors() {
        assert_eq!([1.0, 0.0, 0.0], rgb(0xFF0000));
        let sky = rgb(0x87CEEB);
        assert_abs_diff_eq!(135.0 / 255.0, sky[0]);
        assert_abs_diff_eq!(206.0 / 255.0, sky[1]);
        assert_abs_diff_eq!(235.0 / 255.0, sky[2]);
    }

    #[test]
    fn look_at_faces_target() {
        let mut node = Node::default();
        node.position = Vector3::new(1.0, 1.0, 1.0);
        for target in [
            Vector3::new(5.0, 1.0, 1.0),
            Vector3::new(1.0, 1.0, -3.0),
            Vector3::new(2.0, 3.0, 4.0),
            // Straight up, where +y can't be used as the up vector.
            Vector3::new(1.0, 9.0, 1.0),
        ] {
            node.look_at(target);
            let expected = (target - node.position) / (target - node.position).magnitude();
            assert_abs_diff_eq!(expected, node.forward(), epsilon = 1e-5);
        }
    }

    #[test]
    fn look_at_self_keeps_rotation() {
        let mut node = Node::default();
        node.look_at(Vector3::new(0.0, 0.0, -1.0));
        let rotation = node.rotation;
        node.look_at(node.position);
        assert_eq!(rotation, node.rotation);
    }

    #[test]
    fn model_size_includes_scale() {
        let mut node = Node::default();
        node.scale = Vector3::new(5.0, 5.0, 5.0);
        node.position = Vector3::new(0.0, -6.0, 0.0);
        let model = Model {
            name: "planet".to_string(),
            node,
            local_bounds: BoundingBox::from_points(vec![
                Vector3::new(-1.0, -1.0, -1.0),
                Vector3::new(1.0, 1.0, 1.0),
            ])
            .unwrap(),
        };
        assert_abs_diff_eq!(Vector3::new(10.0, 10.0, 10.0), model.size(), epsilon = 1e-5);
        assert_abs_diff_eq!(-11.0, model.world_bounds().y_range.start, epsilon = 1e-5);
    }
}
