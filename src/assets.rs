use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cgmath::{EuclideanSpace, Matrix4, Point3, SquareMatrix, Transform, Vector3};
use flume::{Receiver, Sender};
use rustc_hash::FxHashMap;

use crate::bounding_box::BoundingBox;
use crate::errors::AssetError;

/// The models a scene asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Planet,
    Rocket,
}

impl AssetKind {
    pub fn name(&self) -> &'static str {
        match self {
            AssetKind::Planet => "planet",
            AssetKind::Rocket => "rocket",
        }
    }
}

/// What the scene keeps of a model: its extent, in the model's own space.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedModel {
    pub bounds: BoundingBox,
    pub num_vertices: usize,
}

#[derive(Debug)]
pub struct LoadEvent {
    pub kind: AssetKind,
    pub path: PathBuf,
    pub result: Result<LoadedModel, AssetError>,
}

/// Loads models on background threads. Results arrive over a channel and are
/// picked up by polling from the frame loop, so the scene is only touched there.
pub struct AssetLoader {
    sender: Sender<LoadEvent>,
    receiver: Receiver<LoadEvent>,
    pending: FxHashMap<AssetKind, PathBuf>,
}

impl Default for AssetLoader {
    fn default() -> Self {
        AssetLoader::new()
    }
}

impl AssetLoader {
    pub fn new() -> AssetLoader {
        let (sender, receiver) = flume::unbounded();
        AssetLoader {
            sender,
            receiver,
            pending: FxHashMap::default(),
        }
    }

    pub fn load(&mut self, kind: AssetKind, path: PathBuf) -> Result<(), AssetError> {
        if let Some(previous) = self.pending.get(&kind) {
            log::warn!(
                "{} is still loading from {}, its result will be ignored",
                kind.name(),
                previous.display()
            );
        }

        let sender = self.sender.clone();
        let thread_path = path.clone();
        std::thread::Builder::new()
            .name(format!("load-{}", kind.name()))
            .spawn(move || {
                let result = load_model(&thread_path);
                let event = LoadEvent {
                    kind,
                    path: thread_path,
                    result,
                };
                // The loader was dropped, nobody is waiting for this model any more.
                if sender.send(event).is_err() {
                    log::debug!(
                        "{} finished loading after the loader was dropped",
                        kind.name()
                    );
                }
            })
            .map_err(|source| AssetError::Spawn {
                path: path.clone(),
                source,
            })?;

        log::debug!("loading {} from {}", kind.name(), path.display());
        self.pending.insert(kind, path);
        Ok(())
    }

    /// Completed loads since the last poll. Never blocks.
    pub fn poll(&mut self) -> Vec<LoadEvent> {
        let events: Vec<LoadEvent> = self.receiver.try_iter().collect();
        events
            .into_iter()
            .filter(|event| self.accept(event))
            .collect()
    }

    /// Blocks until the next load completes or the timeout passes.
    pub fn wait(&mut self, timeout: Duration) -> Option<LoadEvent> {
        loop {
            let event = self.receiver.recv_timeout(timeout).ok()?;
            if self.accept(&event) {
                return Some(event);
            }
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drops results for requests that were replaced by a newer one.
    fn accept(&mut self, event: &LoadEvent) -> bool {
        match self.pending.get(&event.kind) {
            Some(path) if *path == event.path => {
                self.pending.remove(&event.kind);
                true
            }
            _ => false,
        }
    }
}

/// Reads a model and measures it. `.glb`/`.gltf` go through gltf, `.obj` through tobj.
pub fn load_model(path: &Path) -> Result<LoadedModel, AssetError> {
    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase);
    let positions = match extension.as_deref() {
        Some("glb") | Some("gltf") => gltf_positions(path)?,
        Some("obj") => obj_positions(path)?,
        _ => return Err(AssetError::UnsupportedFormat(path.to_path_buf())),
    };

    let bounds = BoundingBox::from_points(positions.iter().copied())
        .ok_or_else(|| AssetError::Empty(path.to_path_buf()))?;
    Ok(LoadedModel {
        bounds,
        num_vertices: positions.len(),
    })
}

/// Vertex positions of the default scene, with node transforms applied.
fn gltf_positions(path: &Path) -> Result<Vec<Vector3<f32>>, AssetError> {
    let (document, buffers, _images) = gltf::import(path)?;
    let mut positions = Vec::new();
    if let Some(scene) = document
        .default_scene()
        .or_else(|| document.scenes().next())
    {
        for node in scene.nodes() {
            collect_node_positions(&node, Matrix4::identity(), &buffers, &mut positions);
        }
    }
    Ok(positions)
}

fn collect_node_positions(
    node: &gltf::Node,
    parent_transform: Matrix4<f32>,
    buffers: &[gltf::buffer::Data],
    positions: &mut Vec<Vector3<f32>>,
) {
    let transform = parent_transform * Matrix4::from(node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| {
                buffers.get(buffer.index()).map(|data| data.0.as_slice())
            });
            if let Some(iter) = reader.read_positions() {
                positions.extend(
                    iter.map(|p| transform.transform_point(Point3::from(p)).to_vec()),
                );
            }
        }
    }
    for child in node.children() {
        collect_node_positions(&child, transform, buffers, positions);
    }
}

fn obj_positions(path: &Path) -> Result<Vec<Vector3<f32>>, AssetError> {
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )?;
    Ok(models
        .iter()
        .flat_map(|m| m.mesh.positions.chunks_exact(3))
        .map(|p| Vector3::new(p[0], p[1], p[2]))
        .collect())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use cgmath::assert_abs_diff_eq;

    use super::*;

    fn model_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("assets/models")
            .join(name)
    }

    #[test]
    fn obj_bounds() {
        let planet = load_model(&model_path("planet.obj")).unwrap();
        assert_eq!(-1.0..1.0, planet.bounds.y_range);
        assert_eq!(-1.0..1.0, planet.bounds.x_range);

        let rocket = load_model(&model_path("rocket.obj")).unwrap();
        assert_abs_diff_eq!(0.5, rocket.bounds.size().y, epsilon = 1e-5);
        assert_eq!(-1.0..1.0, rocket.bounds.z_range);
    }

    #[test]
    fn gltf_applies_node_transforms() {
        let marker = load_model(&model_path("marker.gltf")).unwrap();
        assert_eq!(3, marker.num_vertices);
        assert_abs_diff_eq!(2.0, marker.bounds.x_range.end);
        assert_abs_diff_eq!(4.0, marker.bounds.y_range.end);
        assert_abs_diff_eq!(5.0, marker.bounds.z_range.start);
    }

    #[test]
    fn bad_paths_are_errors() {
        assert!(matches!(
            load_model(&model_path("missing.obj")),
            Err(AssetError::Obj(_))
        ));
        assert!(matches!(
            load_model(&model_path("missing.glb")),
            Err(AssetError::Gltf(_))
        ));
        assert!(matches!(
            load_model(&model_path("planet.fbx")),
            Err(AssetError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn loader_delivers_results_and_errors() {
        let mut loader = AssetLoader::new();
        loader.load(AssetKind::Rocket, model_path("rocket.obj")).unwrap();
        loader.load(AssetKind::Planet, model_path("missing.obj")).unwrap();
        assert!(loader.has_pending());

        let mut events = Vec::new();
        while loader.has_pending() {
            let event = loader
                .wait(Duration::from_secs(10))
                .expect("load should finish");
            events.push(event);
        }
        assert_eq!(2, events.len());
        for event in events {
            match event.kind {
                AssetKind::Rocket => assert!(event.result.is_ok()),
                AssetKind::Planet => assert!(event.result.is_err()),
            }
        }
        assert!(loader.poll().is_empty());
    }

    #[test]
    fn replaced_requests_are_dropped() {
        let mut loader = AssetLoader::new();
        loader.load(AssetKind::Planet, model_path("missing.obj")).unwrap();
        loader.load(AssetKind::Planet, model_path("planet.obj")).unwrap();
        let event = loader.wait(Duration::from_secs(10)).unwrap();
        assert_eq!(model_path("planet.obj"), event.path);
        assert!(!loader.has_pending());
    }
}
