//! Summing surface contributions into the net force on the body
//!
//! The airframe computes aerodynamic force and torque only. Gravity, thrust and any other loads
//! are accumulated by the caller as world-frame forces through the center of mass (see
//! [`Airframe::external_force`]), and the integrator applies the sum.

use tracing::{debug, info, warn};

use crate::config::DEFAULT_FLAP_DEFLECTION;
use crate::surface::rotation;
use crate::{
    AeroSurface, AirframeConfig, ConfigError, ControlInput, ControlSensitivity, FlapLever, Force,
};

/// A surface fixed to the airframe
#[derive(Debug, Clone)]
pub struct MountedSurface {
    pub name: String,
    pub surface: AeroSurface,
    /// Relative to the center of mass, in body coordinates
    pub position: mint::Vector3<f32>,
    /// Rotation from surface to body coordinates
    pub orientation: mint::Quaternion<f32>,
}

/// Mass properties of the body, used when predicting the half-step state
#[derive(Debug, Copy, Clone)]
pub struct Dynamics {
    pub mass: f32,
    /// Diagonal of the inertia tensor in its principal frame
    pub principal_inertia: mint::Vector3<f32>,
    /// Rotation from the principal frame to body coordinates
    pub inertia_rotation: mint::Quaternion<f32>,
}

impl Default for Dynamics {
    fn default() -> Self {
        Self {
            mass: 0.0,
            principal_inertia: [0.0; 3].into(),
            inertia_rotation: na::UnitQuaternion::identity().into_inner().into(),
        }
    }
}

/// Instantaneous state of the body, as reported by the integrator
///
/// The body faces -Z with +Y up.
#[derive(Debug, Copy, Clone)]
pub struct BodyState {
    /// World velocity of the center of mass
    pub velocity: mint::Vector3<f32>,
    /// World angular velocity
    pub angular_velocity: mint::Vector3<f32>,
    /// Rotation from body to world coordinates
    pub orientation: mint::Quaternion<f32>,
}

impl BodyState {
    /// Predict the state half way through a step of length `dt` under `total`
    ///
    /// `total` must include every load on the body, not just aerodynamics. Axes with zero inertia
    /// do not accelerate.
    pub fn half_step(&self, dt: f32, total: &Force, dynamics: &Dynamics) -> Self {
        let h = 0.5 * dt;
        let mut predicted = *self;

        if dynamics.mass > 0.0 {
            let velocity =
                na::Vector3::from(self.velocity) + na::Vector3::from(total.linear) * (h / dynamics.mass);
            if velocity.iter().all(|x| x.is_finite()) {
                predicted.velocity = velocity.into();
            } else {
                warn!("Non-finite velocity prediction; keeping current velocity");
            }
        }

        let inertia_frame = rotation(self.orientation) * rotation(dynamics.inertia_rotation);
        let torque = inertia_frame.inverse_transform_vector(&na::Vector3::from(total.angular));
        let accel = torque.zip_map(&na::Vector3::from(dynamics.principal_inertia), |t, i| {
            if i != 0.0 { t / i } else { 0.0 }
        });
        let angular_velocity =
            na::Vector3::from(self.angular_velocity) + inertia_frame * accel * h;
        if angular_velocity.iter().all(|x| x.is_finite()) {
            predicted.angular_velocity = angular_velocity.into();
        } else {
            warn!("Non-finite angular velocity prediction; keeping current angular velocity");
        }
        predicted
    }
}

impl Default for BodyState {
    fn default() -> Self {
        Self {
            velocity: [0.0; 3].into(),
            angular_velocity: [0.0; 3].into(),
            orientation: na::UnitQuaternion::identity().into_inner().into(),
        }
    }
}

/// Air surrounding the body
#[derive(Debug, Copy, Clone)]
pub struct AirState {
    /// kg/m^3
    pub density: f32,
    /// World velocity of the air mass
    pub wind: mint::Vector3<f32>,
}

impl Default for AirState {
    fn default() -> Self {
        Self {
            density: 1.2,
            wind: [0.0; 3].into(),
        }
    }
}

/// A rigid body carrying a set of aerodynamic surfaces
#[derive(Debug, Clone)]
pub struct Airframe {
    surfaces: Vec<MountedSurface>,
    pub sensitivity: ControlSensitivity,
    /// Flap command while the flap lever is deployed, in radians
    pub flap_deflection: f32,
    pub max_thrust: f32,
}

impl Airframe {
    pub fn new(surfaces: Vec<MountedSurface>) -> Self {
        Self {
            surfaces,
            sensitivity: ControlSensitivity::default(),
            flap_deflection: DEFAULT_FLAP_DEFLECTION,
            max_thrust: 0.0,
        }
    }

    pub fn from_config(config: &AirframeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let surfaces = config
            .surfaces
            .iter()
            .map(|mounted| {
                let surface =
                    AeroSurface::new(mounted.surface).map_err(|e| e.in_surface(&mounted.name))?;
                let [roll, pitch, yaw] = mounted.rotation_deg.map(f32::to_radians);
                Ok(MountedSurface {
                    name: mounted.name.clone(),
                    surface,
                    position: mounted.position.into(),
                    orientation: na::UnitQuaternion::from_euler_angles(roll, pitch, yaw)
                        .into_inner()
                        .into(),
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        info!(
            surfaces = surfaces.len(),
            control_surfaces = surfaces
                .iter()
                .filter(|m| m.surface.config().control.is_some())
                .count(),
            "Assembled airframe"
        );
        Ok(Self {
            surfaces,
            sensitivity: config.sensitivity,
            flap_deflection: config.flap_deflection,
            max_thrust: config.max_thrust,
        })
    }

    pub fn surfaces(&self) -> &[MountedSurface] {
        &self.surfaces
    }

    pub fn surface(&self, name: &str) -> Option<&MountedSurface> {
        self.surfaces.iter().find(|m| m.name == name)
    }

    /// A retracted flap lever for this airframe's flap deflection
    pub fn flap_lever(&self) -> FlapLever {
        FlapLever::new(self.flap_deflection)
    }

    /// Deflect every control surface according to `input`
    pub fn apply_controls(&mut self, input: &ControlInput) {
        for mounted in &mut self.surfaces {
            let Some(binding) = mounted.surface.config().control else {
                continue;
            };
            let angle = self.sensitivity.flap_angle(&binding, input);
            mounted.surface.set_flap_angle(angle);
        }
        debug!(?input, "Applied control input");
    }

    /// Net aerodynamic force and torque about the center of mass
    pub fn simulate(&self, state: &BodyState, air: &AirState) -> Force {
        let orientation = rotation(state.orientation);
        let velocity = na::Vector3::from(state.velocity);
        let angular_velocity = na::Vector3::from(state.angular_velocity);
        let wind = na::Vector3::from(air.wind);

        let mut total = Force::default();
        for mounted in &self.surfaces {
            let lever_arm = orientation * na::Vector3::from(mounted.position);
            let air_velocity = wind - velocity - angular_velocity.cross(&lever_arm);
            let surface_orientation = orientation * rotation(mounted.orientation);
            total += mounted.surface.compute_force_torque(
                air_velocity.into(),
                air.density,
                lever_arm.into(),
                surface_orientation.into_inner().into(),
            );
        }
        total
    }

    /// Gravity and thrust acting through the center of mass, in world coordinates
    ///
    /// `gravity` is an acceleration; thrust acts along the body's forward (-Z) axis.
    pub fn external_force(
        &self,
        state: &BodyState,
        dynamics: &Dynamics,
        gravity: mint::Vector3<f32>,
        thrust: f32,
    ) -> mint::Vector3<f32> {
        let forward = rotation(state.orientation) * -na::Vector3::z();
        (na::Vector3::from(gravity) * dynamics.mass + forward * thrust).into()
    }

    /// Aerodynamic force averaged over the current state and a predicted half-step state
    ///
    /// `external` is the non-aerodynamic force from [`Self::external_force`]. This refines
    /// [`Self::simulate`] for coarse time steps at the cost of a second evaluation.
    pub fn simulate_midpoint(
        &self,
        state: &BodyState,
        air: &AirState,
        dynamics: &Dynamics,
        external: mint::Vector3<f32>,
        dt: f32,
    ) -> Force {
        let now = self.simulate(state, air);
        let total = now
            + Force {
                linear: external,
                angular: [0.0; 3].into(),
            };
        let predicted = state.half_step(dt, &total, dynamics);
        let later = self.simulate(&predicted, air);
        now.lerp(&later, 0.5)
    }
}
