use cgmath::Vector3;
use itertools::Itertools;

use crate::bounding_box::BoundingBox;
use crate::scene::{Grid, Model, PathLine, Scene};

const PLANET_COLOR: [f32; 3] = [0.2, 0.4, 0.9];
const ROCKET_COLOR: [f32; 3] = [0.9, 0.9, 0.9];
const HEADING_COLOR: [f32; 3] = [1.0, 0.6, 0.0];

/// One end of a line segment. Segments are drawn as a line list, two vertices each.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl LineVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn new(position: Vector3<f32>, color: [f32; 3]) -> LineVertex {
        LineVertex {
            position: position.into(),
            color,
        }
    }

    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

fn segment(vertices: &mut Vec<LineVertex>, from: Vector3<f32>, to: Vector3<f32>, color: [f32; 3]) {
    vertices.push(LineVertex::new(from, color));
    vertices.push(LineVertex::new(to, color));
}

/// Lines on the y = 0 plane, like a grid helper: the two centre lines get their own colour.
pub fn grid_lines(grid: &Grid) -> Vec<LineVertex> {
    let mut vertices = Vec::new();
    if grid.divisions == 0 {
        return vertices;
    }
    let half = grid.size / 2.0;
    let step = grid.size / grid.divisions as f32;
    let center = grid.divisions / 2;
    for i in 0..=grid.divisions {
        let k = -half + i as f32 * step;
        let color = if i == center && grid.divisions % 2 == 0 {
            grid.center_color
        } else {
            grid.color
        };
        segment(
            &mut vertices,
            Vector3::new(-half, 0.0, k),
            Vector3::new(half, 0.0, k),
            color,
        );
        segment(
            &mut vertices,
            Vector3::new(k, 0.0, -half),
            Vector3::new(k, 0.0, half),
            color,
        );
    }
    vertices
}

pub fn path_lines(path_line: &PathLine) -> Vec<LineVertex> {
    let mut vertices = Vec::with_capacity(path_line.points.len().saturating_sub(1) * 2);
    for (from, to) in path_line.points.iter().tuple_windows() {
        segment(&mut vertices, *from, *to, path_line.color);
    }
    vertices
}

/// The twelve edges of a box.
pub fn box_lines(bounds: &BoundingBox, color: [f32; 3]) -> Vec<LineVertex> {
    // Bottom face first, then the top face in the same order.
    let corners = bounds.corners();
    let mut vertices = Vec::with_capacity(24);
    for i in 0..4 {
        let next = (i + 1) % 4;
        segment(&mut vertices, corners[i], corners[next], color);
        segment(&mut vertices, corners[i + 4], corners[next + 4], color);
        segment(&mut vertices, corners[i], corners[i + 4], color);
    }
    vertices
}

/// A single segment from the middle of the model along its facing direction,
/// as long as the model's largest extent.
pub fn heading_lines(model: &Model) -> Vec<LineVertex> {
    let bounds = model.world_bounds();
    let size = bounds.size();
    let length = size.x.max(size.y).max(size.z);
    let start = bounds.center();
    let mut vertices = Vec::with_capacity(2);
    segment(
        &mut vertices,
        start,
        start + model.node.forward() * length,
        HEADING_COLOR,
    );
    vertices
}

/// Everything in the scene as one line list.
pub fn scene_lines(scene: &Scene) -> Vec<LineVertex> {
    let mut vertices = Vec::new();
    if let Some(grid) = &scene.grid {
        vertices.extend(grid_lines(grid));
    }
    if let Some(path_line) = &scene.path_line {
        vertices.extend(path_lines(path_line));
    }
    if let Some(planet) = &scene.planet {
        vertices.extend(box_lines(&planet.world_bounds(), PLANET_COLOR));
    }
    if let Some(rocket) = &scene.rocket {
        vertices.extend(box_lines(&rocket.world_bounds(), ROCKET_COLOR));
        vertices.extend(heading_lines(rocket));
    }
    vertices
}

#[cfg(test)]
mod tests {
    use cgmath::{assert_abs_diff_eq, InnerSpace, Vector3};

    use super::*;
    use crate::scene::{Node, Scene};

    fn unit_box() -> BoundingBox {
        BoundingBox::from_points(vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 1.0),
        ])
        .unwrap()
    }

    #[test]
    fn grid_has_two_lines_per_division() {
        let grid = Grid {
            size: 200.0,
            divisions: 50,
            center_color: [1.0, 0.0, 0.0],
            color: [0.5, 0.5, 0.5],
        };
        let vertices = grid_lines(&grid);
        assert_eq!(51 * 4, vertices.len());
        assert!(vertices.iter().all(|v| v.position[1] == 0.0));
        // Exactly the two centre lines use the centre colour.
        let centre = vertices.iter().filter(|v| v.color == [1.0, 0.0, 0.0]).count();
        assert_eq!(4, centre);
    }

    #[test]
    fn path_is_drawn_as_segments() {
        let path_line = PathLine {
            points: vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(1.0, 1.0, 0.0),
            ],
            color: [1.0, 0.0, 0.0],
        };
        let vertices = path_lines(&path_line);
        assert_eq!(4, vertices.len());
        assert_eq!(vertices[1].position, vertices[2].position);

        let single = PathLine {
            points: vec![Vector3::new(0.0, 0.0, 0.0)],
            color: [1.0, 0.0, 0.0],
        };
        assert!(path_lines(&single).is_empty());
    }

    #[test]
    fn box_edges_have_unit_length() {
        let vertices = box_lines(&unit_box(), [1.0, 1.0, 1.0]);
        assert_eq!(24, vertices.len());
        for pair in vertices.chunks(2) {
            let a = Vector3::from(pair[0].position);
            let b = Vector3::from(pair[1].position);
            assert_abs_diff_eq!(1.0, (b - a).magnitude());
        }
    }

    #[test]
    fn scene_lines_skip_missing_models() {
        let mut scene = Scene::new([0.0, 0.0, 0.0]);
        assert!(scene_lines(&scene).is_empty());

        let mut node = Node::default();
        node.look_at(Vector3::new(1.0, 0.0, 0.0));
        scene.rocket = Some(Model {
            name: "rocket".to_string(),
            node,
            local_bounds: unit_box(),
        });
        let vertices = scene_lines(&scene);
        assert_eq!(26, vertices.len());
        let heading = &vertices[24..];
        let bounds = scene.rocket.as_ref().unwrap().world_bounds();
        let start = Vector3::from(heading[0].position);
        assert_abs_diff_eq!(bounds.center(), start, epsilon = 1e-5);
        // Unit box, so the marker is one unit long and points along +x.
        let direction = Vector3::from(heading[1].position) - start;
        assert_abs_diff_eq!(Vector3::unit_x(), direction, epsilon = 1e-5);
        assert_eq!(HEADING_COLOR, heading[1].color);
    }
}
