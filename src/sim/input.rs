//! Input sampling
//!
//! Turns raw keyboard, pointer, device-orientation and device-motion events into
//! state the frame updater (or the overlay) reads. Handlers write, the frame
//! reads; nothing here knows about the DOM.

use std::collections::HashMap;
use std::f64::consts::FRAC_PI_2;

use glam::Vec3;

use super::state::CameraEuler;
use crate::consts::{DRAG_LOOK_SCALE, HORIZON_BETA_MAX, HORIZON_BETA_MIN, MAX_DRAG_PITCH};
use crate::settings::OrientationConfig;

/// Movement keys and their camera-space directions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKey {
    Forward,
    Backward,
    Left,
    Right,
}

impl MoveKey {
    pub const ALL: [MoveKey; 4] = [
        MoveKey::Forward,
        MoveKey::Backward,
        MoveKey::Left,
        MoveKey::Right,
    ];

    /// Lower-cased key names bound to this action
    pub fn keys(&self) -> &'static [&'static str] {
        match self {
            MoveKey::Forward => &["w", "arrowup"],
            MoveKey::Backward => &["s", "arrowdown"],
            MoveKey::Left => &["a", "arrowleft"],
            MoveKey::Right => &["d", "arrowright"],
        }
    }

    /// Unit vector in camera space
    pub fn local_dir(&self) -> Vec3 {
        match self {
            MoveKey::Forward => Vec3::Z,
            MoveKey::Backward => Vec3::NEG_Z,
            MoveKey::Left => Vec3::NEG_X,
            MoveKey::Right => Vec3::X,
        }
    }
}

/// Which keys are currently held
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys: HashMap<String, bool>,
}

impl InputState {
    pub fn key_down(&mut self, key: &str) {
        self.keys.insert(key.to_lowercase(), true);
    }

    pub fn key_up(&mut self, key: &str) {
        self.keys.insert(key.to_lowercase(), false);
    }

    /// Release everything (focus lost)
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn is_pressed(&self, key: &str) -> bool {
        self.keys.get(key).copied().unwrap_or(false)
    }

    /// Sum of the camera-space directions of every held movement action
    ///
    /// Not normalized: opposite keys cancel, diagonals are longer than one.
    /// Holding both keys of one action counts it once.
    pub fn local_move(&self) -> Vec3 {
        MoveKey::ALL
            .iter()
            .filter(|k| k.keys().iter().any(|key| self.is_pressed(key)))
            .map(|k| k.local_dir())
            .sum()
    }
}

/// Latest device-orientation reading, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrientationSample {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl OrientationSample {
    /// None when the browser left any angle out
    pub fn from_angles(alpha: Option<f64>, beta: Option<f64>, gamma: Option<f64>) -> Option<Self> {
        Some(Self {
            alpha: alpha?,
            beta: beta?,
            gamma: gamma?,
        })
    }

    /// True while the device is held close to upright, screen facing the user
    pub fn is_near_horizontal(&self) -> bool {
        (HORIZON_BETA_MIN..=HORIZON_BETA_MAX).contains(&self.beta)
    }

    /// Camera orientation for this reading
    ///
    /// beta = 90 (device upright, screen facing the user) maps to pitch 0,
    /// i.e. looking straight ahead.
    pub fn to_euler(&self, config: &OrientationConfig) -> CameraEuler {
        let yaw = self.alpha.to_radians() as f32 * config.yaw_scale;
        let pitch = (self.beta.to_radians() - FRAC_PI_2) as f32;
        let roll = if config.suppress_horizon_roll && self.is_near_horizontal() {
            0.0
        } else {
            self.gamma.to_radians() as f32
        };
        CameraEuler { yaw, pitch, roll }
    }
}

/// Dead-reckoned horizontal displacement from device motion
///
/// Naive double integration with no drift correction; readout only, never
/// fed back into the camera.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionTelemetry {
    last_timestamp_ms: Option<f64>,
    pub vx: f64,
    pub vz: f64,
    pub x: f64,
    pub z: f64,
}

impl MotionTelemetry {
    /// Feed one acceleration-including-gravity sample
    ///
    /// Returns true when the accumulators changed. The first usable sample
    /// only sets the time baseline.
    pub fn sample(&mut self, timestamp_ms: f64, ax: Option<f64>, az: Option<f64>) -> bool {
        let (Some(ax), Some(az)) = (ax, az) else {
            return false;
        };

        let Some(last) = self.last_timestamp_ms.replace(timestamp_ms) else {
            return false;
        };

        let dt = (timestamp_ms - last) / 1000.0;
        if dt <= 0.0 {
            return false;
        }

        self.vx += ax * dt;
        self.vz += az * dt;
        self.x += self.vx * dt;
        self.z += self.vz * dt;
        true
    }

    /// Forget the time baseline but keep the accumulators
    ///
    /// The next sample becomes the new baseline, so a pause in the event
    /// stream is not integrated as one long step.
    pub fn pause(&mut self) {
        self.last_timestamp_ms = None;
    }
}

/// Camera turn for a pointer drag of (dx, dy) CSS pixels
///
/// Dragging right turns right, dragging down looks down. Pitch stops short of
/// straight up or down; roll is untouched.
pub fn drag_look(current: CameraEuler, dx: f64, dy: f64) -> CameraEuler {
    CameraEuler {
        yaw: current.yaw + dx as f32 * DRAG_LOOK_SCALE,
        pitch: (current.pitch + dy as f32 * DRAG_LOOK_SCALE)
            .clamp(-MAX_DRAG_PITCH, MAX_DRAG_PITCH),
        roll: current.roll,
    }
}

/// Tracks one pointer drag across move events
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerDrag {
    last: Option<(f64, f64)>,
}

impl PointerDrag {
    pub fn press(&mut self, x: f64, y: f64) {
        self.last = Some((x, y));
    }

    /// Movement since the previous position, None when no button is held
    pub fn move_to(&mut self, x: f64, y: f64) -> Option<(f64, f64)> {
        let (lx, ly) = self.last.replace((x, y))?;
        Some((x - lx, y - ly))
    }

    pub fn release(&mut self) {
        self.last = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.last.is_some()
    }
}
