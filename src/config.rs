//! Immutable surface and airframe descriptions

use std::path::Path;

use serde::Deserialize;

use crate::{ConfigError, ControlSensitivity};

/// Pilot control axis a surface's flap responds to
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlAxis {
    Pitch,
    Roll,
    Yaw,
    Flap,
}

/// How pilot input drives a control surface's flap angle
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
pub struct ControlBinding {
    pub axis: ControlAxis,
    /// Multiplier applied on top of the axis sensitivity; negative values reverse the surface
    #[serde(default = "unit_gain")]
    pub gain: f32,
}

fn unit_gain() -> f32 {
    1.0
}

/// Geometric and material properties of one lifting surface
///
/// Angles are in degrees. Built once when the aircraft is assembled and never mutated; the flap
/// angle lives on [`AeroSurface`](crate::AeroSurface) instead.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// 2D lift-curve slope, per radian
    pub lift_slope: f32,
    /// Flat-plate tangential friction coefficient
    pub skin_friction: f32,
    /// Angle of attack at which the clean airfoil produces no lift
    pub zero_lift_angle: f32,
    pub stall_angle_high: f32,
    pub stall_angle_low: f32,
    pub chord: f32,
    pub span: f32,
    /// Fraction of the chord taken up by the flap, in [0, 1]
    pub flap_fraction: f32,
    pub aspect_ratio: f32,
    /// `None` for fixed surfaces
    pub control: Option<ControlBinding>,
}

impl SurfaceConfig {
    pub fn area(&self) -> f32 {
        self.chord * self.span
    }

    /// Reject geometry that would make the coefficient model divide by zero or misorder its
    /// regimes
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("lift_slope", self.lift_slope),
            ("skin_friction", self.skin_friction),
            ("zero_lift_angle", self.zero_lift_angle),
            ("stall_angle_high", self.stall_angle_high),
            ("stall_angle_low", self.stall_angle_low),
            ("chord", self.chord),
            ("span", self.span),
            ("flap_fraction", self.flap_fraction),
            ("aspect_ratio", self.aspect_ratio),
        ];
        if let Some(&(name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(name, value, "must be finite"));
        }
        if self.aspect_ratio <= 0.0 {
            return Err(invalid("aspect_ratio", self.aspect_ratio, "must be positive"));
        }
        if self.lift_slope <= 0.0 {
            return Err(invalid("lift_slope", self.lift_slope, "must be positive"));
        }
        if self.stall_angle_high <= self.stall_angle_low {
            return Err(invalid(
                "stall_angle_high",
                self.stall_angle_high,
                "must exceed stall_angle_low",
            ));
        }
        if !(0.0..=1.0).contains(&self.flap_fraction) {
            return Err(invalid("flap_fraction", self.flap_fraction, "must lie in [0, 1]"));
        }
        if self.chord <= 0.0 {
            return Err(invalid("chord", self.chord, "must be positive"));
        }
        if self.span <= 0.0 {
            return Err(invalid("span", self.span, "must be positive"));
        }
        if let Some(binding) = self.control {
            if !binding.gain.is_finite() {
                return Err(invalid("control.gain", binding.gain, "must be finite"));
            }
        }
        Ok(())
    }
}

fn invalid(name: &'static str, value: f32, reason: &'static str) -> ConfigError {
    ConfigError::InvalidParameter {
        name,
        value,
        reason,
    }
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            lift_slope: 6.28,
            skin_friction: 0.02,
            zero_lift_angle: 0.0,
            stall_angle_high: 15.0,
            stall_angle_low: -15.0,
            chord: 1.0,
            span: 1.0,
            flap_fraction: 0.0,
            aspect_ratio: 2.0,
            control: None,
        }
    }
}

/// A surface as placed on the airframe, in body coordinates relative to the center of mass
#[derive(Debug, Clone, Deserialize)]
pub struct MountedSurfaceConfig {
    pub name: String,
    #[serde(default)]
    pub position: [f32; 3],
    /// Roll, pitch and yaw of the surface frame relative to the body, in degrees
    #[serde(default)]
    pub rotation_deg: [f32; 3],
    #[serde(default)]
    pub surface: SurfaceConfig,
}

/// Complete aircraft assembly, as authored in YAML
#[derive(Debug, Clone, Deserialize)]
pub struct AirframeConfig {
    #[serde(default)]
    pub sensitivity: ControlSensitivity,
    /// Flap command while the flap lever is deployed, in radians
    #[serde(default = "default_flap_deflection")]
    pub flap_deflection: f32,
    #[serde(default)]
    pub max_thrust: f32,
    pub surfaces: Vec<MountedSurfaceConfig>,
}

/// Flap command while the flap lever is deployed, unless configured otherwise
pub(crate) const DEFAULT_FLAP_DEFLECTION: f32 = 0.3;

fn default_flap_deflection() -> f32 {
    DEFAULT_FLAP_DEFLECTION
}

impl AirframeConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.surfaces.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one surface is required".into(),
            ));
        }
        if !self.max_thrust.is_finite() || self.max_thrust < 0.0 {
            return Err(invalid("max_thrust", self.max_thrust, "must be non-negative"));
        }
        if !self.flap_deflection.is_finite() {
            return Err(invalid("flap_deflection", self.flap_deflection, "must be finite"));
        }
        let sensitivity = [self.sensitivity.pitch, self.sensitivity.roll, self.sensitivity.yaw];
        if let Some(&value) = sensitivity.iter().find(|v| !v.is_finite()) {
            return Err(invalid("sensitivity", value, "must be finite"));
        }
        for mounted in &self.surfaces {
            let mut placement = mounted.position.iter().chain(&mounted.rotation_deg);
            if let Some(&value) = placement.find(|v| !v.is_finite()) {
                return Err(invalid("placement", value, "must be finite").in_surface(&mounted.name));
            }
            mounted
                .surface
                .validate()
                .map_err(|e| e.in_surface(&mounted.name))?;
        }
        Ok(())
    }
}
