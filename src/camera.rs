use cgmath::{perspective, EuclideanSpace, InnerSpace, Matrix4, Point3, Rad, Vector3, Zero};
use serde::{Deserialize, Serialize};
use winit::event::{ElementState, VirtualKeyCode};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

const MIN_VIEW_DISTANCE2: f32 = 1e-12;

/// What the camera points at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookMode {
    /// A fixed point in the world.
    Target([f32; 3]),
    /// Straight down -z, at the point with the camera's x and y and z = 0.
    Forward,
}

/// Zoom factor for a scroll offset. Never zooms in past the base position.
pub fn zoom_factor(scroll_offset: f32, zoom_speed: f32) -> f32 {
    f32::max(1.0, 1.0 + scroll_offset * zoom_speed)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Position before zoom. Keyboard nudges move this.
    base_position: Vector3<f32>,
    zoom: f32,
    look: LookMode,
}

impl Camera {
    pub fn new<V: Into<Vector3<f32>>>(position: V, look: LookMode) -> Self {
        Self {
            base_position: position.into(),
            zoom: 1.0,
            look,
        }
    }

    pub fn position(&self) -> Point3<f32> {
        Point3::from_vec(self.base_position * self.zoom)
    }

    pub fn base_position(&self) -> Vector3<f32> {
        self.base_position
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() && zoom > 0.0 {
            self.zoom = zoom;
        }
    }

    pub fn nudge(&mut self, delta: Vector3<f32>) {
        self.base_position += delta;
    }

    pub fn target(&self) -> Point3<f32> {
        let eye = self.position();
        match self.look {
            LookMode::Target(target) => Point3::from(target),
            LookMode::Forward => Point3::new(eye.x, eye.y, 0.0),
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        let eye = self.position();
        let mut target = self.target();
        if (target - eye).magnitude2() < MIN_VIEW_DISTANCE2 {
            // Sitting on the target: keep looking down -z.
            target = eye - Vector3::unit_z();
        }

        let direction = (target - eye).normalize();
        let up = if direction.cross(Vector3::unit_y()).magnitude2() < MIN_VIEW_DISTANCE2 {
            -Vector3::unit_z()
        } else {
            Vector3::unit_y()
        };
        Matrix4::look_at_rh(eye, target, up)
    }
}

pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Minimised windows report a zero size; keep the last aspect then.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Turns key presses into camera nudges, applied once per frame.
#[derive(Debug)]
pub struct CameraController {
    step: f32,
    pending: Vector3<f32>,
}

impl CameraController {
    pub fn new(step: f32) -> Self {
        Self {
            step,
            pending: Vector3::zero(),
        }
    }

    /// Returns true if the key moves the camera. Releases are consumed but do nothing.
    pub fn process_keyboard(&mut self, key: VirtualKeyCode, state: ElementState) -> bool {
        let axis = match key {
            VirtualKeyCode::W => Vector3::unit_y(),
            VirtualKeyCode::S => -Vector3::unit_y(),
            VirtualKeyCode::D => Vector3::unit_x(),
            VirtualKeyCode::A => -Vector3::unit_x(),
            VirtualKeyCode::E => Vector3::unit_z(),
            VirtualKeyCode::Q => -Vector3::unit_z(),
            _ => {
                if state == ElementState::Pressed {
                    log::debug!("key {:?} does not move the camera", key);
                }
                return false;
            }
        };
        if state == ElementState::Pressed {
            self.pending += axis * self.step;
        }
        true
    }

    pub fn update_camera(&mut self, camera: &mut Camera) {
        if self.pending.is_zero() {
            return;
        }
        camera.nudge(self.pending);
        self.pending = Vector3::zero();
        log::debug!("camera moved to {:?}", camera.base_position());
    }
}
