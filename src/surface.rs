use tracing::{debug, warn};

use crate::{Coefficients, ConfigError, Force, LiftCurve, SurfaceConfig};

/// Largest flap deflection in either direction, in degrees
pub const MAX_FLAP_ANGLE: f32 = 50.0;

/// A single lifting surface: immutable geometry plus the current flap deflection
///
/// The surface frame has X along the chord, Y normal to it and Z along the span. Air moving
/// towards -X with a positive Y component meets the surface at a positive angle of attack.
#[derive(Debug, Copy, Clone)]
pub struct AeroSurface {
    config: SurfaceConfig,
    flap_angle: f32,
}

impl AeroSurface {
    pub fn new(config: SurfaceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            flap_angle: 0.0,
        })
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    /// Current flap deflection in radians
    pub fn flap_angle(&self) -> f32 {
        self.flap_angle
    }

    /// Deflect the flap by `angle` radians, limited to [`MAX_FLAP_ANGLE`] either way
    pub fn set_flap_angle(&mut self, angle: f32) {
        if angle.is_nan() {
            warn!("NaN flap angle command; centering flap");
            self.flap_angle = 0.0;
            return;
        }
        let limit = MAX_FLAP_ANGLE.to_radians();
        self.flap_angle = angle.clamp(-limit, limit);
    }

    /// Lift curve at the current flap deflection
    pub fn lift_curve(&self) -> LiftCurve {
        LiftCurve::new(&self.config, self.flap_angle)
    }

    /// Coefficients at `angle_of_attack` radians and the current flap deflection
    pub fn coefficients(&self, angle_of_attack: f32) -> Coefficients {
        self.lift_curve().coefficients(angle_of_attack)
    }

    /// Compute the force and torque on `self` when air moves past it at `air_velocity`
    ///
    /// `air_velocity` and `lever_arm` (the surface's position relative to the center of mass)
    /// are in world coordinates; `orientation` maps surface coordinates to world coordinates.
    /// Non-finite inputs are replaced with zero and logged rather than propagated.
    pub fn compute_force_torque(
        &self,
        air_velocity: mint::Vector3<f32>,
        air_density: f32,
        lever_arm: mint::Vector3<f32>,
        orientation: mint::Quaternion<f32>,
    ) -> Force {
        let velocity = finite_or_zero(air_velocity, "air velocity");
        let lever_arm = finite_or_zero(lever_arm, "lever arm");
        let density = if air_density.is_finite() && air_density >= 0.0 {
            air_density
        } else {
            warn!(air_density, "Invalid air density; treating as vacuum");
            0.0
        };
        let orientation = rotation(orientation);

        // Spanwise flow does not contribute
        let mut local = orientation.inverse_transform_vector(&velocity);
        local.z = 0.0;
        let Some((local_dir, airspeed)) = na::Unit::try_new_and_get(local, 1e-6) else {
            debug!("Zero airspeed over surface; no aerodynamic force");
            return Force::default();
        };

        let drag_dir = orientation * local_dir.into_inner();
        let span_axis = orientation * na::Vector3::z();
        let lift_dir = drag_dir.cross(&span_axis);

        let dynamic_pressure = 0.5 * density * airspeed * airspeed;
        let mut angle_of_attack = local.y.atan2(-local.x);
        if angle_of_attack.is_nan() {
            warn!("NaN angle of attack; using zero");
            angle_of_attack = 0.0;
        }
        let c = self.coefficients(angle_of_attack);

        let area = self.config.area();
        let lift = lift_dir * (c.lift * dynamic_pressure * area);
        let drag = drag_dir * (c.drag * dynamic_pressure * area);
        let pitch_torque = -span_axis * (c.moment * dynamic_pressure * area * self.config.chord);

        let force = lift + drag;
        let torque = lever_arm.cross(&force) + pitch_torque;
        if !force.iter().chain(torque.iter()).all(|x| x.is_finite()) {
            warn!(
                angle_of_attack,
                dynamic_pressure, "Non-finite aerodynamic force; discarding"
            );
            return Force::default();
        }
        Force {
            linear: force.into(),
            angular: torque.into(),
        }
    }
}

/// Normalize `q`, falling back to the identity for a degenerate quaternion
pub(crate) fn rotation(q: mint::Quaternion<f32>) -> na::UnitQuaternion<f32> {
    let quaternion = na::Quaternion::from(q);
    quaternion
        .coords
        .iter()
        .all(|x| x.is_finite())
        .then(|| na::UnitQuaternion::try_new(quaternion, 1e-6))
        .flatten()
        .unwrap_or_else(|| {
            warn!(?q, "Degenerate orientation; using identity");
            na::UnitQuaternion::identity()
        })
}

fn finite_or_zero(v: mint::Vector3<f32>, what: &str) -> na::Vector3<f32> {
    let mut v = na::Vector3::from(v);
    if v.iter().any(|x| !x.is_finite()) {
        warn!(?v, "Non-finite {}; replacing with zero", what);
        v.apply(|x| {
            if !x.is_finite() {
                *x = 0.0;
            }
        });
    }
    v
}
