use aerosurface::{
    AirState, Airframe, AirframeConfig, BodyState, ConfigError, ControlInput, Dynamics, Force,
    Throttle,
};

const TRAINER: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/trainer.yaml");

fn trainer() -> Airframe {
    Airframe::from_config(&AirframeConfig::from_file(TRAINER).unwrap()).unwrap()
}

fn cruise() -> BodyState {
    BodyState {
        velocity: [0.0, 0.0, -50.0].into(),
        ..Default::default()
    }
}

fn forces_with(input: ControlInput) -> Force {
    let mut airframe = trainer();
    airframe.apply_controls(&input);
    airframe.simulate(&cruise(), &AirState::default())
}

#[test]
fn loads_trainer() {
    let airframe = trainer();
    assert_eq!(airframe.surfaces().len(), 8);
    assert_eq!(airframe.max_thrust, 2500.0);
    assert!(airframe.surface("rudder").is_some());
    assert!(airframe.surface("canard").is_none());
}

#[test]
fn missing_file() {
    let err = AirframeConfig::from_file("does/not/exist.yaml").unwrap_err();
    assert!(matches!(err, ConfigError::FileError(_)));
}

#[test]
fn cambered_wings_lift_at_zero_incidence() {
    let f = forces_with(ControlInput::default());
    assert!(f.linear.y > 0.0);
    assert!(f.linear.z > 0.0);
    assert!(f.linear.x.abs() < 1e-2);
}

#[test]
fn ailerons_roll() {
    let neutral = forces_with(ControlInput::default());
    let rolled = forces_with(ControlInput {
        roll: 1.0,
        ..Default::default()
    });
    // Left aileron down, right aileron up: right wing drops
    assert!(rolled.angular.z < neutral.angular.z - 1.0);
}

#[test]
fn elevator_pitches_nose_up() {
    let neutral = forces_with(ControlInput::default());
    let pitched = forces_with(ControlInput {
        pitch: 1.0,
        ..Default::default()
    });
    assert!(pitched.angular.x > neutral.angular.x + 1.0);
}

#[test]
fn rudder_yaws() {
    let neutral = forces_with(ControlInput::default());
    let yawed = forces_with(ControlInput {
        yaw: 1.0,
        ..Default::default()
    });
    assert!(yawed.linear.x > neutral.linear.x);
    assert!(yawed.angular.y > neutral.angular.y + 1.0);
}

#[test]
fn flaps_add_lift() {
    let mut lever = trainer().flap_lever();
    let retracted = forces_with(ControlInput {
        flap: lever.command(),
        ..Default::default()
    });
    lever.toggle();
    let deployed = forces_with(ControlInput {
        flap: lever.command(),
        ..Default::default()
    });
    assert!(deployed.linear.y > retracted.linear.y);
}

#[test]
fn short_flight_stays_finite() {
    let mut airframe = trainer();
    let dynamics = Dynamics {
        mass: 1000.0,
        principal_inertia: [1500.0, 2500.0, 1200.0].into(),
        ..Default::default()
    };
    let air = AirState {
        wind: [3.0, 0.0, 0.0].into(),
        ..Default::default()
    };
    let mut throttle = Throttle::default();
    let mut state = cruise();
    let dt = 0.01;

    for tick in 0..200 {
        throttle.adjust(true, false);
        airframe.apply_controls(&ControlInput {
            pitch: (tick as f32 * 0.05).sin(),
            roll: 0.3,
            ..Default::default()
        });
        let external = airframe.external_force(
            &state,
            &dynamics,
            [0.0, -9.81, 0.0].into(),
            throttle.thrust(airframe.max_thrust),
        );
        let aero = airframe.simulate_midpoint(&state, &air, &dynamics, external, dt);
        assert!(aero.is_finite(), "tick {tick}: {aero:?}");

        let total = aero
            + Force {
                linear: external,
                angular: [0.0; 3].into(),
            };
        // Advancing a half step over twice the interval is a full explicit Euler step
        let mut next = state.half_step(2.0 * dt, &total, &dynamics);
        let orientation = na::UnitQuaternion::new(na::Vector3::from(next.angular_velocity) * dt)
            * na::UnitQuaternion::new_normalize(na::Quaternion::from(state.orientation));
        next.orientation = orientation.into_inner().into();
        state = next;
    }

    let velocity = na::Vector3::from(state.velocity);
    assert!(velocity.iter().all(|x| x.is_finite()));
    assert!(velocity.norm() > 10.0);
    assert_eq!(throttle.setting(), 1.0);
}
