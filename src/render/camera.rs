//! Constrained orbit camera and perspective projection.
//!
//! The camera always looks at the anchor. Azimuth is free, elevation stops
//! short of the poles, distance is clamped to `[min_distance, max_distance]`
//! and there is no pan. While the user is not dragging, a slow constant
//! auto-rotation turns the view.

use serde::Deserialize;

/// Configuration constants for the camera.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub min_distance: f32,
    pub max_distance: f32,
    /// Same scale as a three.js OrbitControls `autoRotateSpeed`
    /// (1.0 = one revolution per minute)
    pub auto_rotate_speed: f32,
    pub auto_rotate: bool,
    pub zoom_enabled: bool,
    /// Vertical field of view, degrees
    pub fov_deg: f32,
    /// Initial eye position, looking at the origin
    pub start_position: [f32; 3],
    /// Radians per dragged pixel
    pub drag_sensitivity: f32,
    /// Fractional distance change per scroll unit
    pub zoom_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_distance: 6.0,
            max_distance: 25.0,
            auto_rotate_speed: 0.2,
            auto_rotate: true,
            zoom_enabled: true,
            fov_deg: 60.0,
            start_position: [0.0, 6.0, 14.0],
            drag_sensitivity: 0.008,
            zoom_sensitivity: 0.003,
        }
    }
}

impl CameraConfig {
    /// Why this config cannot drive a camera, if it cannot.
    pub fn check(&self) -> Result<(), String> {
        let numbers = [
            self.min_distance,
            self.max_distance,
            self.auto_rotate_speed,
            self.fov_deg,
            self.drag_sensitivity,
            self.zoom_sensitivity,
        ];
        if numbers.iter().chain(&self.start_position).any(|v| !v.is_finite()) {
            return Err("camera values must be finite numbers".into());
        }
        if self.min_distance <= 0.0 {
            return Err(format!("camera.min_distance must be positive, got {}", self.min_distance));
        }
        if self.min_distance > self.max_distance {
            return Err(format!(
                "camera.min_distance {} exceeds camera.max_distance {}",
                self.min_distance, self.max_distance
            ));
        }
        if !(MIN_FOV..=MAX_FOV).contains(&self.fov_deg) {
            return Err(format!(
                "camera.fov_deg must be within {MIN_FOV}..={MAX_FOV}, got {}",
                self.fov_deg
            ));
        }
        Ok(())
    }

    /// Usable `(min, max)` distance limits. Inverted limits are swapped and
    /// non-finite or non-positive ones fall back to the defaults.
    pub fn distance_range(&self) -> (f32, f32) {
        let fallback = Self::default();
        let lo = if self.min_distance.is_finite() && self.min_distance > 0.0 {
            self.min_distance
        } else {
            fallback.min_distance
        };
        let hi = if self.max_distance.is_finite() && self.max_distance > 0.0 {
            self.max_distance
        } else {
            fallback.max_distance
        };
        (lo.min(hi), lo.max(hi))
    }
}

/// Field of view limits, degrees.
pub const MIN_FOV: f32 = 1.0;
pub const MAX_FOV: f32 = 179.0;

/// Elevation stays this far from ±π/2 so the up vector never flips.
const POLE_MARGIN: f32 = 0.05;
/// Points closer than this along the view axis are not drawn.
const NEAR_PLANE: f32 = 0.1;

/// Camera pose around the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraParams {
    /// Horizontal orbit angle in radians (0 = looking down -Z)
    pub azimuth: f32,
    /// Vertical orbit angle in radians (positive = above the plane)
    pub elevation: f32,
    /// Distance from the target
    pub distance: f32,
}

impl CameraParams {
    /// Pose whose eye sits at `position`, looking at the origin.
    pub fn from_position(position: [f32; 3]) -> Self {
        let [x, y, z] = position;
        let horizontal = (x * x + z * z).sqrt();
        Self {
            azimuth: x.atan2(z),
            elevation: y.atan2(horizontal),
            distance: (horizontal * horizontal + y * y).sqrt(),
        }
    }

    pub fn eye(&self) -> [f32; 3] {
        let (sa, ca) = self.azimuth.sin_cos();
        let (se, ce) = self.elevation.sin_cos();
        [
            self.distance * sa * ce,
            self.distance * se,
            self.distance * ca * ce,
        ]
    }

    /// Orthonormal (right, up, forward) basis looking at the origin.
    fn basis(&self) -> ([f32; 3], [f32; 3], [f32; 3]) {
        let eye = self.eye();
        let forward = normalize([-eye[0], -eye[1], -eye[2]]);
        let right = normalize(cross(forward, [0.0, 1.0, 0.0]));
        let up = cross(right, forward);
        (right, up, forward)
    }
}

/// Orbit controller.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub config: CameraConfig,
    params: CameraParams,
    dragging: bool,
}

impl OrbitCamera {
    pub fn new(config: CameraConfig) -> Self {
        let mut params = CameraParams::from_position(config.start_position);
        let (lo, hi) = config.distance_range();
        params.distance = if params.distance.is_finite() { params.distance.clamp(lo, hi) } else { hi };
        params.azimuth = if params.azimuth.is_finite() { params.azimuth } else { 0.0 };
        params.elevation = if params.elevation.is_finite() { params.elevation } else { 0.0 };
        params.elevation = clamp_elevation(params.elevation);
        Self { config, params, dragging: false }
    }

    pub fn params(&self) -> CameraParams {
        self.params
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Auto-rotation in radians per second.
    pub fn auto_rotate_rate(&self) -> f32 {
        self.config.auto_rotate_speed * std::f32::consts::TAU / 60.0
    }

    /// Apply a drag delta in pixels. Starts a drag that suspends auto-rotation.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.dragging = true;
        let k = self.config.drag_sensitivity;
        self.params.azimuth = wrap_angle(self.params.azimuth - dx * k);
        self.params.elevation = clamp_elevation(self.params.elevation + dy * k);
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Scroll zoom; positive `scroll` moves closer.
    pub fn zoom(&mut self, scroll: f32) {
        if !self.config.zoom_enabled {
            return;
        }
        let d = self.params.distance * (1.0 - scroll * self.config.zoom_sensitivity);
        if !d.is_finite() {
            return;
        }
        let (lo, hi) = self.config.distance_range();
        self.params.distance = d.clamp(lo, hi);
    }

    /// Per-frame update: auto-rotate unless a drag is active.
    pub fn update(&mut self, dt: f32) {
        if self.config.auto_rotate && !self.dragging {
            self.params.azimuth = wrap_angle(self.params.azimuth + self.auto_rotate_rate() * dt);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }
}

/// A world point mapped into the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    /// Screen position in viewport pixels
    pub screen: [f32; 2],
    /// Distance along the view axis
    pub depth: f32,
    /// Pixels per world unit at this depth
    pub scale: f32,
}

/// Perspective projection for one frame.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    eye: [f32; 3],
    right: [f32; 3],
    up: [f32; 3],
    forward: [f32; 3],
    focal: f32,
    origin: [f32; 2],
    size: [f32; 2],
}

impl Projection {
    /// `origin` is the viewport's top-left corner, `size` its extent in pixels.
    pub fn new(params: &CameraParams, fov_deg: f32, origin: [f32; 2], size: [f32; 2]) -> Self {
        let (right, up, forward) = params.basis();
        let fov_deg = if fov_deg.is_finite() {
            fov_deg.clamp(MIN_FOV, MAX_FOV)
        } else {
            CameraConfig::default().fov_deg
        };
        Self {
            eye: params.eye(),
            right,
            up,
            forward,
            focal: 1.0 / (fov_deg.to_radians() * 0.5).tan(),
            origin,
            size: [size[0].max(1.0), size[1].max(1.0)],
        }
    }

    pub fn project(&self, p: [f32; 3]) -> Option<Projected> {
        let rel = [p[0] - self.eye[0], p[1] - self.eye[1], p[2] - self.eye[2]];
        let z = dot(rel, self.forward);
        if z < NEAR_PLANE {
            return None;
        }
        let x = dot(rel, self.right);
        let y = dot(rel, self.up);

        let half_h = self.size[1] * 0.5;
        let scale = self.focal * half_h / z;
        Some(Projected {
            screen: [
                self.origin[0] + self.size[0] * 0.5 + x * scale,
                self.origin[1] + half_h - y * scale,
            ],
            depth: z,
            scale,
        })
    }
}

fn clamp_elevation(e: f32) -> f32 {
    let limit = std::f32::consts::FRAC_PI_2 - POLE_MARGIN;
    e.clamp(-limit, limit)
}

fn wrap_angle(a: f32) -> f32 {
    a.rem_euclid(std::f32::consts::TAU)
}

fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = dot(v, v).sqrt();
    if len < 1e-6 {
        return [0.0, 0.0, -1.0];
    }
    [v[0] / len, v[1] / len, v[2] / len]
}
