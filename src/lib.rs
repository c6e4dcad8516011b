//! Quasi-steady per-surface aerodynamics with stall and flap modelling
//!
//! Each [`AeroSurface`] turns the air flowing past it into a force and torque, using a lift curve
//! that stays continuous from low angles of attack through stall to 90 degrees. An [`Airframe`]
//! owns a set of mounted surfaces, routes pilot input to their flaps and sums their contributions
//! for the rigid-body integrator.

mod airframe;
mod coefficients;
mod config;
mod control;
mod error;
mod surface;

pub use airframe::{AirState, Airframe, BodyState, Dynamics, MountedSurface};
pub use coefficients::{Coefficients, LiftCurve, Regime};
pub use config::{AirframeConfig, ControlAxis, ControlBinding, MountedSurfaceConfig, SurfaceConfig};
pub use control::{ControlInput, ControlSensitivity, FlapLever, Throttle};
pub use error::ConfigError;
pub use surface::{AeroSurface, MAX_FLAP_ANGLE};

use std::ops::{Add, AddAssign};

/// Force and torque acting on a body, in world coordinates
///
/// Produced by [`AeroSurface::compute_force_torque`] and summed by [`Airframe::simulate`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Force {
    pub linear: mint::Vector3<f32>,
    /// Torque
    pub angular: mint::Vector3<f32>,
}

impl Force {
    /// Blend towards `other`; `0.5` gives the average of two samples
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            linear: na::Vector3::from(self.linear)
                .lerp(&na::Vector3::from(other.linear), t)
                .into(),
            angular: na::Vector3::from(self.angular)
                .lerp(&na::Vector3::from(other.angular), t)
                .into(),
        }
    }

    pub fn is_finite(&self) -> bool {
        let linear = na::Vector3::from(self.linear);
        let angular = na::Vector3::from(self.angular);
        linear.iter().chain(angular.iter()).all(|x| x.is_finite())
    }
}

impl Default for Force {
    fn default() -> Self {
        Self {
            linear: [0.0; 3].into(),
            angular: [0.0; 3].into(),
        }
    }
}

impl Add for Force {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            linear: (na::Vector3::from(self.linear) + na::Vector3::from(rhs.linear)).into(),
            angular: (na::Vector3::from(self.angular) + na::Vector3::from(rhs.angular)).into(),
        }
    }
}

impl AddAssign for Force {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
