use std::time::Duration;

use cgmath::{Deg, Matrix4, Vector3, Zero};
use winit::event::{ElementState, VirtualKeyCode};

use crate::assets::{AssetKind, AssetLoader, LoadEvent};
use crate::camera::{zoom_factor, Camera, CameraController, Projection};
use crate::config::{DemoConfig, ModelConfig, Placement};
use crate::errors::{AssetError, PathError};
use crate::follower::{Follower, Pose};
use crate::path::{self, Path};
use crate::progress::{Page, ProgressSource};
use crate::scene::{rgb, Grid, Model, Node, PathLine, Scene};

/// Owns everything the frame loop reads and writes: the scene, the camera, the
/// path and the state that drives motion along it.
pub struct SceneContext {
    config: DemoConfig,
    scene: Scene,
    path: Option<Path>,
    follower: Follower,
    progress_source: ProgressSource,
    progress: f32,
    page: Page,
    camera: Camera,
    projection: Projection,
    camera_controller: CameraController,
    loader: AssetLoader,
}

impl SceneContext {
    /// Builds the static parts of the scene. The path is generated here unless it
    /// has to wait for the rocket.
    pub fn new(config: DemoConfig, width: u32, height: u32) -> Result<SceneContext, PathError> {
        let mut scene = Scene::new(rgb(config.background));
        scene.grid = config.grid.as_ref().map(|grid| Grid {
            size: grid.size,
            divisions: grid.divisions,
            center_color: rgb(grid.center_color),
            color: rgb(grid.color),
        });

        let camera_config = &config.camera;
        let camera = Camera::new(camera_config.position, camera_config.look);
        let projection = Projection::new(
            width,
            height,
            Deg(camera_config.fovy_degrees),
            camera_config.znear,
            camera_config.zfar,
        );
        let camera_controller = CameraController::new(camera_config.nudge_step);

        let page_height = if height > 0 {
            height as f32
        } else {
            config.page.viewport_height
        };

        let mut context = SceneContext {
            scene,
            path: None,
            follower: Follower::new(config.follower.damping),
            progress_source: config.progress,
            progress: 0.0,
            page: Page::new(page_height, config.page.screens),
            camera,
            projection,
            camera_controller,
            loader: AssetLoader::new(),
            config,
        };

        if !context.config.path.depends_on_rocket() {
            context.build_path(None)?;
        }
        Ok(context)
    }

    /// Requests the planet and rocket models. Results are picked up by `update`.
    pub fn start_loading(&mut self) -> Result<(), AssetError> {
        if let Some(planet) = &self.config.planet {
            let path = self.config.asset_path(planet);
            self.loader.load(AssetKind::Planet, path)?;
        }
        let path = self.config.asset_path(&self.config.rocket);
        self.loader.load(AssetKind::Rocket, path)
    }

    pub fn is_loading(&self) -> bool {
        self.loader.has_pending()
    }

    /// Blocks for the next finished load and applies it. Returns false on timeout.
    pub fn wait_for_load(&mut self, timeout: Duration) -> bool {
        match self.loader.wait(timeout) {
            Some(event) => {
                self.handle_load_event(event);
                true
            }
            None => false,
        }
    }

    pub fn handle_load_event(&mut self, event: LoadEvent) {
        let loaded = match event.result {
            Ok(loaded) => loaded,
            Err(e) => {
                log::error!(
                    "failed to load {} from {}: {}",
                    event.kind.name(),
                    event.path.display(),
                    e
                );
                if event.kind == AssetKind::Rocket && self.path.is_none() {
                    log::warn!("the rocket path depends on the rocket model and will not be built");
                }
                return;
            }
        };
        log::info!(
            "loaded {} from {} ({} vertices)",
            event.kind.name(),
            event.path.display(),
            loaded.num_vertices
        );

        let model_config = match event.kind {
            AssetKind::Planet => match &self.config.planet {
                Some(planet) => planet,
                None => {
                    log::warn!("got a planet nobody asked for, ignoring it");
                    return;
                }
            },
            AssetKind::Rocket => &self.config.rocket,
        };
        let mut model = Model {
            name: event.kind.name().to_string(),
            node: Node::default(),
            local_bounds: loaded.bounds,
        };
        place(&mut model, model_config);

        match event.kind {
            AssetKind::Planet => self.scene.planet = Some(model),
            AssetKind::Rocket => {
                let height = model.size().y;
                self.scene.rocket = Some(model);
                if self.path.is_none() {
                    if let Err(e) = self.build_path(Some(height)) {
                        log::error!("failed to build the rocket path: {}", e);
                    }
                }
            }
        }
    }

    fn build_path(&mut self, rocket_height: Option<f32>) -> Result<(), PathError> {
        let path_config = &self.config.path;
        let shape = path_config.resolved_shape(rocket_height);
        let path = path::generate(
            &shape,
            path_config.representation,
            path_config.orientation(),
        )?;
        self.scene.path_line = Some(PathLine {
            points: path.display_points(path_config.display_divisions),
            color: rgb(path_config.color),
        });
        log::debug!("built rocket path: {:?}", path_config.representation);
        self.path = Some(path);
        Ok(())
    }

    /// Advances one frame. Returns the rocket's new pose, or None if there is
    /// nothing to move yet.
    pub fn update(&mut self, elapsed: Duration) -> Option<Pose> {
        for event in self.loader.poll() {
            self.handle_load_event(event);
        }

        self.camera_controller.update_camera(&mut self.camera);
        if let Some(zoom_speed) = self.config.camera.zoom_speed {
            self.camera
                .set_zoom(zoom_factor(self.page.scroll_offset(), zoom_speed));
        }

        self.progress = self.progress_source.progress(&self.page, elapsed);

        let (path, rocket) = match (&self.path, &mut self.scene.rocket) {
            (Some(path), Some(rocket)) => (path, rocket),
            (path, rocket) => {
                log::debug!(
                    "skipping frame, path ready: {}, rocket ready: {}",
                    path.is_some(),
                    rocket.is_some()
                );
                return None;
            }
        };
        let pose = self
            .follower
            .advance(path, self.progress, rocket.node.position);
        pose.apply_to(&mut rocket.node);
        Some(pose)
    }

    pub fn process_keyboard(&mut self, key: VirtualKeyCode, state: ElementState) -> bool {
        self.camera_controller.process_keyboard(key, state)
    }

    /// Mouse wheel lines. Positive values scroll up the page, like a wheel turned away.
    pub fn scroll_lines(&mut self, lines: f32) {
        self.page.scroll_by(-lines * self.config.page.wheel_step);
    }

    pub fn scroll_by(&mut self, pixels: f32) {
        self.page.scroll_by(pixels);
    }

    pub fn scroll_to(&mut self, offset: f32) {
        self.page.scroll_to(offset);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.projection.resize(width, height);
        self.page.set_viewport_height(height as f32);
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection.calc_matrix() * self.camera.calc_matrix()
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn follower(&self) -> &Follower {
        &self.follower
    }

    pub fn follower_mut(&mut self) -> &mut Follower {
        &mut self.follower
    }

    /// The progress value used by the last update.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn page(&self) -> &Page {
        &self.page
    }
}

fn place(model: &mut Model, config: &ModelConfig) {
    model.node.scale = Vector3::new(config.scale, config.scale, config.scale);
    model.node.position = match config.placement {
        Placement::Origin => Vector3::zero(),
        Placement::Fixed { position } => Vector3::from(position),
        Placement::BelowGround { gap } => {
            let height = model.size().y;
            Vector3::new(0.0, -height / 2.0 - gap, 0.0)
        }
    };
}
