//! Mapping pilot input onto control-surface deflections

use serde::Deserialize;

use crate::{ControlAxis, ControlBinding};

/// Pilot input sampled for one control cycle
///
/// Passed explicitly into [`Airframe::apply_controls`](crate::Airframe::apply_controls) each tick.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ControlInput {
    /// Normalized stick deflection, in [-1, 1]
    pub pitch: f32,
    /// Normalized stick deflection, in [-1, 1]
    pub roll: f32,
    /// Normalized pedal deflection, in [-1, 1]
    pub yaw: f32,
    /// Flap command in radians, usually [`FlapLever::command`]
    pub flap: f32,
}

/// Per-axis scaling from normalized pilot input to flap angle
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControlSensitivity {
    pub pitch: f32,
    pub roll: f32,
    pub yaw: f32,
}

impl ControlSensitivity {
    /// Flap angle commanded for a surface bound to `binding`
    ///
    /// The flap axis is already expressed in radians and only scaled by the surface gain.
    pub fn flap_angle(&self, binding: &ControlBinding, input: &ControlInput) -> f32 {
        let axis = match binding.axis {
            ControlAxis::Pitch => input.pitch * self.pitch,
            ControlAxis::Roll => input.roll * self.roll,
            ControlAxis::Yaw => input.yaw * self.yaw,
            ControlAxis::Flap => input.flap,
        };
        axis * binding.gain
    }
}

impl Default for ControlSensitivity {
    fn default() -> Self {
        Self {
            pitch: 0.2,
            roll: 0.2,
            yaw: 0.2,
        }
    }
}

/// Two-position flap selector
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FlapLever {
    /// Flap command when deployed, in radians
    pub deflection: f32,
    deployed: bool,
}

impl FlapLever {
    pub fn new(deflection: f32) -> Self {
        Self {
            deflection,
            deployed: false,
        }
    }

    pub fn toggle(&mut self) {
        self.deployed = !self.deployed;
    }

    pub fn is_deployed(&self) -> bool {
        self.deployed
    }

    pub fn command(&self) -> f32 {
        if self.deployed { self.deflection } else { 0.0 }
    }
}

/// Throttle setting in [0, 1], nudged a step at a time
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Throttle {
    setting: f32,
}

impl Throttle {
    /// Change in setting per [`adjust`](Self::adjust) call
    pub const STEP: f32 = 0.01;

    pub fn setting(&self) -> f32 {
        self.setting
    }

    pub fn adjust(&mut self, up: bool, down: bool) {
        if up {
            self.setting += Self::STEP;
        }
        if down {
            self.setting -= Self::STEP;
        }
        self.setting = self.setting.clamp(0.0, 1.0);
    }

    /// Thrust produced by an engine delivering at most `max_thrust`
    pub fn thrust(&self, max_thrust: f32) -> f32 {
        max_thrust * self.setting
    }
}
