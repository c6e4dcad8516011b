//! Quasi-steady 2D coefficient model covering the full angle-of-attack range
//!
//! Low angles of attack follow thin-airfoil theory with an induced-angle correction for finite
//! aspect ratio. Past stall the surface behaves like a flat plate. The two curves are stitched
//! together by a linear segment spanning a padding band beyond each stall angle, so the lift
//! coefficient is continuous everywhere.

use std::f32::consts::{FRAC_PI_2, PI};

use crate::SurfaceConfig;

/// Smallest magnitude `cos(effective angle)` may take when it is used as a divisor
const MIN_COS: f32 = 1e-3;

/// Non-dimensional lift, drag and pitching moment
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Coefficients {
    pub lift: f32,
    pub drag: f32,
    /// Pitching moment, scaled by chord when converted to torque
    pub moment: f32,
}

impl Coefficients {
    /// Linear interpolation towards `other`, with `t` clamped to [0, 1]
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            lift: lerp(self.lift, other.lift, t),
            drag: lerp(self.drag, other.drag, t),
            moment: lerp(self.moment, other.moment, t),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.lift.is_finite() && self.drag.is_finite() && self.moment.is_finite()
    }
}

/// Which part of the lift curve an angle of attack falls on
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Regime {
    /// Strictly between the stall angles
    Linear,
    /// Between a stall angle and its padded counterpart
    Transition,
    /// Beyond a padded stall angle
    Stall,
}

/// Lift curve of one surface at one flap deflection
///
/// All angles are in radians and already corrected for aspect ratio and flap deflection.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LiftCurve {
    /// Lift-curve slope corrected for finite aspect ratio
    pub slope: f32,
    pub zero_lift_angle: f32,
    pub stall_angle_high: f32,
    pub stall_angle_low: f32,
    /// Width of the transition band above `stall_angle_high`
    pub padding_high: f32,
    /// Width of the transition band below `stall_angle_low`
    pub padding_low: f32,
    aspect_ratio: f32,
    skin_friction: f32,
    flap_angle: f32,
}

impl LiftCurve {
    /// Correct the configured airfoil for aspect ratio and a flap deflected by `flap_angle`
    /// radians
    pub fn new(config: &SurfaceConfig, flap_angle: f32) -> Self {
        let ar = config.aspect_ratio;
        let slope = config.lift_slope * ar / (ar + 2.0 * (ar + 4.0) / (ar + 2.0));

        // Flapped-airfoil theory: lift increment from deflecting the rear `flap_fraction` of the
        // chord
        let theta = (2.0 * config.flap_fraction - 1.0).clamp(-1.0, 1.0).acos();
        let effectiveness = 1.0 - (theta - theta.sin()) / PI;
        let delta_lift =
            slope * effectiveness * flap_effectiveness_correction(flap_angle) * flap_angle;

        let zero_lift_base = config.zero_lift_angle.to_radians();
        let zero_lift_angle = zero_lift_base - delta_lift / slope;

        let max_fraction = lift_coefficient_max_fraction(config.flap_fraction);
        let cl_max_high = slope * (config.stall_angle_high.to_radians() - zero_lift_base)
            + delta_lift * max_fraction;
        let cl_max_low = slope * (config.stall_angle_low.to_radians() - zero_lift_base)
            + delta_lift * max_fraction;

        let flap_deg = flap_angle.to_degrees();
        Self {
            slope,
            zero_lift_angle,
            stall_angle_high: zero_lift_angle + cl_max_high / slope,
            stall_angle_low: zero_lift_angle + cl_max_low / slope,
            padding_high: lerp(15.0, 5.0, (flap_deg + 50.0) / 100.0).to_radians(),
            padding_low: lerp(15.0, 5.0, (-flap_deg + 50.0) / 100.0).to_radians(),
            aspect_ratio: ar,
            skin_friction: config.skin_friction,
            flap_angle,
        }
    }

    pub fn padded_stall_angle_high(&self) -> f32 {
        self.stall_angle_high + self.padding_high
    }

    pub fn padded_stall_angle_low(&self) -> f32 {
        self.stall_angle_low - self.padding_low
    }

    pub fn regime(&self, angle_of_attack: f32) -> Regime {
        if angle_of_attack < self.stall_angle_high && angle_of_attack > self.stall_angle_low {
            Regime::Linear
        } else if angle_of_attack > self.padded_stall_angle_high()
            || angle_of_attack < self.padded_stall_angle_low()
        {
            Regime::Stall
        } else {
            Regime::Transition
        }
    }

    /// Coefficients at `angle_of_attack` radians; NaN is treated as zero
    pub fn coefficients(&self, angle_of_attack: f32) -> Coefficients {
        let aoa = if angle_of_attack.is_nan() {
            0.0
        } else {
            angle_of_attack
        };
        match self.regime(aoa) {
            Regime::Linear => self.linear(aoa),
            Regime::Stall => self.stalled(aoa),
            Regime::Transition => {
                if aoa >= self.stall_angle_high {
                    let padded = self.padded_stall_angle_high();
                    let t = (aoa - self.stall_angle_high) / self.padding_high;
                    self.linear(self.stall_angle_high)
                        .lerp(&self.stalled(padded), t)
                } else {
                    let padded = self.padded_stall_angle_low();
                    let t = (self.stall_angle_low - aoa) / self.padding_low;
                    self.linear(self.stall_angle_low)
                        .lerp(&self.stalled(padded), t)
                }
            }
        }
    }

    fn linear(&self, aoa: f32) -> Coefficients {
        let lift = self.slope * (aoa - self.zero_lift_angle);
        let induced = lift / (PI * self.aspect_ratio);
        let effective = aoa - self.zero_lift_angle - induced;
        let (sin, cos) = effective.sin_cos();
        let cos_divisor = if cos.abs() < MIN_COS {
            MIN_COS.copysign(cos)
        } else {
            cos
        };

        let tangential = self.skin_friction * cos;
        let normal = (lift + sin * tangential) / cos_divisor;
        Coefficients {
            lift,
            drag: normal * sin + tangential * cos,
            moment: -normal * moment_arm(effective),
        }
    }

    fn stalled(&self, aoa: f32) -> Coefficients {
        let clamped = aoa.clamp(-FRAC_PI_2, FRAC_PI_2);
        // Induced angle is carried over from the stall point and fades out towards +-90 degrees
        let (stall_angle, t) = if aoa > self.stall_angle_high {
            let span = FRAC_PI_2 - self.stall_angle_high;
            (self.stall_angle_high, fraction(FRAC_PI_2 - clamped, span))
        } else {
            let span = FRAC_PI_2 + self.stall_angle_low;
            (self.stall_angle_low, fraction(FRAC_PI_2 + clamped, span))
        };
        let lift_at_stall = self.slope * (stall_angle - self.zero_lift_angle);
        let induced = lerp(0.0, lift_at_stall / (PI * self.aspect_ratio), t);
        let effective = aoa - self.zero_lift_angle - induced;
        let (sin, cos) = effective.sin_cos();

        let normal = friction_at_90_degrees(self.flap_angle)
            * sin
            * (1.0 / (0.56 + 0.44 * sin.abs())
                - 0.41 * (1.0 - (-17.0 / self.aspect_ratio).exp()));
        let tangential = 0.5 * self.skin_friction * cos;
        Coefficients {
            lift: normal * cos - tangential * sin,
            drag: normal * sin + tangential * cos,
            moment: -normal * moment_arm(effective),
        }
    }
}

/// Distance of the center of pressure behind the quarter chord, in chords
fn moment_arm(effective_angle: f32) -> f32 {
    0.25 - 0.175 * (1.0 - 2.0 * effective_angle.abs() / PI)
}

/// Flat-plate normal force coefficient at 90 degrees for a flap deflected by `flap_angle`
/// radians
fn friction_at_90_degrees(flap_angle: f32) -> f32 {
    1.98 - 4.26e-2 * flap_angle * flap_angle + 2.1e-1 * flap_angle
}

/// Large deflections separate the flow over the flap and lose effectiveness
fn flap_effectiveness_correction(flap_angle: f32) -> f32 {
    lerp(0.8, 0.4, (flap_angle.abs().to_degrees() - 10.0) / 50.0)
}

/// Share of the flap lift increment that also raises the maximum lift coefficient
fn lift_coefficient_max_fraction(flap_fraction: f32) -> f32 {
    (1.0 - 0.5 * (flap_fraction - 0.1) / 0.3).clamp(0.0, 1.0)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// `num / den` in [0, 1], or 0 when `den` vanishes
fn fraction(num: f32, den: f32) -> f32 {
    if den > f32::EPSILON {
        (num / den).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::*;

    fn symmetric(aspect_ratio: f32) -> SurfaceConfig {
        SurfaceConfig {
            lift_slope: 2.0 * PI,
            aspect_ratio,
            ..Default::default()
        }
    }

    #[test]
    fn aspect_ratio_correction() {
        let curve = LiftCurve::new(&symmetric(6.0), 0.0);
        assert_relative_eq!(curve.slope, 2.0 * PI * 6.0 / 8.5, epsilon = 1e-5);
        assert_abs_diff_eq!(curve.zero_lift_angle, 0.0);
        assert_relative_eq!(curve.stall_angle_high, 15f32.to_radians(), epsilon = 1e-6);
        assert_relative_eq!(curve.stall_angle_low, -15f32.to_radians(), epsilon = 1e-6);
        assert_relative_eq!(curve.padding_high, 10f32.to_radians(), epsilon = 1e-6);
        assert_relative_eq!(curve.padding_low, 10f32.to_radians(), epsilon = 1e-6);
    }

    #[test]
    fn linear_regime_has_induced_drag() {
        let config = symmetric(6.0);
        let curve = LiftCurve::new(&config, 0.0);
        let aoa = 5f32.to_radians();
        assert_eq!(curve.regime(aoa), Regime::Linear);

        let c = curve.coefficients(aoa);
        assert_relative_eq!(c.lift, curve.slope * aoa, epsilon = 1e-6);

        let effective = aoa - c.lift / (PI * 6.0);
        assert!(c.drag > config.skin_friction * effective.cos());
        assert!(c.moment < 0.0);
    }

    #[test]
    fn continuous_at_stall_onset() {
        for flap in [-0.6, 0.0, 0.4] {
            let config = SurfaceConfig {
                flap_fraction: 0.3,
                aspect_ratio: 6.0,
                ..Default::default()
            };
            let curve = LiftCurve::new(&config, flap);
            for stall in [curve.stall_angle_high, curve.stall_angle_low] {
                assert_eq!(curve.regime(stall), Regime::Transition);
                let linear = curve.linear(stall);
                let transition = curve.coefficients(stall);
                assert_relative_eq!(linear.lift, transition.lift, epsilon = 1e-6);
                assert_relative_eq!(linear.drag, transition.drag, epsilon = 1e-6);
                assert_relative_eq!(linear.moment, transition.moment, epsilon = 1e-6);

                let inside = curve.coefficients(stall - 1e-4 * stall.signum());
                assert_abs_diff_eq!(inside.lift, transition.lift, epsilon = 1e-3);
            }
        }
    }

    #[test]
    fn lift_keeps_sign_at_exact_stall_angle() {
        let curve = LiftCurve::new(&symmetric(6.0), 0.0);
        let high = curve.coefficients(curve.stall_angle_high);
        assert!(high.lift > 0.0);
        for aoa in [curve.stall_angle_high - 1e-5, curve.stall_angle_high + 1e-5] {
            assert_abs_diff_eq!(curve.coefficients(aoa).lift, high.lift, epsilon = 1e-3);
        }

        let low = curve.coefficients(curve.stall_angle_low);
        assert!(low.lift < 0.0);
        for aoa in [curve.stall_angle_low - 1e-5, curve.stall_angle_low + 1e-5] {
            assert_abs_diff_eq!(curve.coefficients(aoa).lift, low.lift, epsilon = 1e-3);
        }
    }

    #[test]
    fn continuous_at_padded_stall() {
        let curve = LiftCurve::new(&symmetric(6.0), 0.0);
        for padded in [curve.padded_stall_angle_high(), curve.padded_stall_angle_low()] {
            let band = curve.coefficients(padded);
            let stalled = curve.stalled(padded);
            assert_relative_eq!(band.lift, stalled.lift, epsilon = 1e-5);
            assert_relative_eq!(band.drag, stalled.drag, epsilon = 1e-5);

            let beyond = curve.coefficients(padded + 1e-4 * padded.signum());
            assert_eq!(curve.regime(padded + 1e-4 * padded.signum()), Regime::Stall);
            assert_abs_diff_eq!(beyond.lift, band.lift, epsilon = 1e-3);
        }
    }

    #[test]
    fn symmetric_airfoil() {
        let curve = LiftCurve::new(&symmetric(4.0), 0.0);
        for deg in [1.0f32, 7.0, 14.0, 17.5, 24.0, 40.0, 89.0, 120.0, 179.0] {
            let aoa = deg.to_radians();
            let up = curve.coefficients(aoa);
            let down = curve.coefficients(-aoa);
            assert_relative_eq!(up.lift, -down.lift, epsilon = 1e-5);
            assert_relative_eq!(up.drag, down.drag, epsilon = 1e-5);
        }
    }

    #[test]
    fn flap_shifts_zero_lift_angle() {
        let plain = LiftCurve::new(&symmetric(6.0), 0.3);
        assert_abs_diff_eq!(plain.zero_lift_angle, 0.0);

        let flapped_config = SurfaceConfig {
            flap_fraction: 0.3,
            ..symmetric(6.0)
        };
        let down = LiftCurve::new(&flapped_config, 0.3);
        let up = LiftCurve::new(&flapped_config, -0.3);
        assert!(down.zero_lift_angle < 0.0);
        assert!(up.zero_lift_angle > 0.0);
        assert_relative_eq!(down.zero_lift_angle, -up.zero_lift_angle, epsilon = 1e-6);
        assert!(down.coefficients(0.0).lift > 0.0);
        assert!(up.coefficients(0.0).lift < 0.0);
        // Both stall angles move with the curve, but the stall window keeps its width
        assert!(down.stall_angle_high < plain.stall_angle_high);
        assert_relative_eq!(
            down.stall_angle_high - down.stall_angle_low,
            plain.stall_angle_high - plain.stall_angle_low,
            epsilon = 1e-5
        );
        // Deflecting the flap down narrows the band above stall
        assert!(down.padding_high < down.padding_low);
    }

    #[test]
    fn flap_effectiveness_tapers() {
        assert_abs_diff_eq!(flap_effectiveness_correction(0.0), 0.8);
        assert_abs_diff_eq!(flap_effectiveness_correction(10f32.to_radians()), 0.8, epsilon = 1e-5);
        assert_abs_diff_eq!(flap_effectiveness_correction(-35f32.to_radians()), 0.6, epsilon = 1e-5);
        assert_abs_diff_eq!(flap_effectiveness_correction(60f32.to_radians()), 0.4, epsilon = 1e-5);
        assert_abs_diff_eq!(lift_coefficient_max_fraction(0.0), 1.0);
        assert_abs_diff_eq!(lift_coefficient_max_fraction(0.4), 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(lift_coefficient_max_fraction(1.0), 0.0);
    }

    #[test]
    fn sweep_peaks_at_stall() {
        let curve = LiftCurve::new(&symmetric(6.0), 0.0);
        let sweep: Vec<(f32, Coefficients)> = (0..=900)
            .map(|i| {
                let aoa = (i as f32 * 0.1).to_radians();
                (aoa, curve.coefficients(aoa))
            })
            .collect();
        assert!(sweep.iter().all(|(_, c)| c.is_finite()));

        let (peak, _) = sweep
            .iter()
            .max_by(|a, b| a.1.lift.total_cmp(&b.1.lift))
            .unwrap();
        assert!(*peak >= curve.stall_angle_high - 1e-2);
        assert!(*peak <= curve.padded_stall_angle_high());

        let rising = sweep.iter().take_while(|(aoa, _)| *aoa < curve.stall_angle_high);
        assert!(rising
            .clone()
            .zip(rising.skip(1))
            .all(|(a, b)| b.1.lift > a.1.lift));

        let (_, last) = sweep.last().unwrap();
        assert_abs_diff_eq!(last.lift, 0.0, epsilon = 0.05);
        assert!(last.drag > 1.0);
    }

    #[test]
    fn finite_with_extreme_geometry() {
        let config = SurfaceConfig {
            aspect_ratio: 1e-3,
            stall_angle_high: 89.99,
            stall_angle_low: -120.0,
            flap_fraction: 1.0,
            ..Default::default()
        };
        for flap in [-0.87, 0.0, 0.87] {
            let curve = LiftCurve::new(&config, flap);
            for i in -360..=360 {
                let c = curve.coefficients((i as f32).to_radians());
                assert!(c.is_finite(), "{i} degrees: {c:?}");
            }
        }
        assert_eq!(
            LiftCurve::new(&config, 0.0).coefficients(f32::NAN),
            LiftCurve::new(&config, 0.0).coefficients(0.0)
        );
    }
}
