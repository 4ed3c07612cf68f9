use std::time::Instant;

use na::dvector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    error::SomersaultError,
    helpers::build_acrobat,
    integrators::Integrator,
    simulate::simulate,
    solution::{DetailedCost, Solution, SolveStatus},
    types::Float,
    GRAVITY, TWO_PI,
};

/// Physical and numerical parameters of one somersault run. These are
/// constants of the scenario, not CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SomersaultParameters {
    pub jump_height: Float, // apex height of the ballistic flight, in m
    pub somersaults: Float, // total body rotation over the flight, in rad
    pub arm_torque: Float,  // amplitude of the arm swing torque, in N m
    pub trunk_length: Float,
    pub arm_length: Float,
    pub seed: u64,
    pub dt: Float,
}

impl Default for SomersaultParameters {
    fn default() -> Self {
        SomersaultParameters {
            jump_height: 2.0,
            somersaults: TWO_PI,
            arm_torque: 4.0,
            trunk_length: 0.9,
            arm_length: 0.7,
            seed: 42,
            dt: 0.005,
        }
    }
}

impl SomersaultParameters {
    /// Vertical take-off velocity reaching the configured apex.
    pub fn takeoff_velocity(&self) -> Float {
        (2.0 * GRAVITY * self.jump_height).sqrt()
    }

    /// Duration of the ballistic flight, take-off to landing.
    pub fn flight_time(&self) -> Float {
        2.0 * self.takeoff_velocity() / GRAVITY
    }
}

/// Produce one somersault trajectory by simulating the acrobat's flight phase
/// with the given integration scheme.
///
/// The pelvis leaves the ground with the take-off velocity for the configured
/// jump height and the trunk spins at the rate that completes the configured
/// rotation over the flight. The arms swing under a sinusoidal torque profile
/// with seeded jitter, so the internal coordinates move relative to each
/// other the way they would in an optimized motion.
pub fn produce_somersault(
    params: &SomersaultParameters,
    integrator: &Integrator,
) -> Result<Solution, SomersaultError> {
    let mut state = build_acrobat(params);

    let flight_time = params.flight_time();
    let omega = params.somersaults / flight_time;
    state.update(
        &dvector![0.0, 0.0, 0.0],
        &dvector![params.takeoff_velocity(), omega, 0.0],
    );

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut controls: Vec<Vec<Float>> = vec![];
    let amp = params.arm_torque;

    let start = Instant::now();
    let (qs, vs, ts) = simulate(
        &mut state,
        flight_time,
        params.dt,
        |_state, t| {
            let jitter = rng.random_range(-0.05..0.05) * amp;
            let arm = amp * (TWO_PI * t / flight_time).sin() + jitter;
            let tau = dvector![0.0, 0.0, arm];
            controls.push(tau.iter().cloned().collect());
            tau
        },
        integrator,
    )?;
    let real_time_to_solve = start.elapsed().as_secs_f64();

    if qs.iter().flatten().any(|x| !x.is_finite()) || vs.iter().flatten().any(|x| !x.is_finite())
    {
        return Err(SomersaultError::SolveFailed(format!(
            "{} produced non-finite states",
            integrator.name()
        )));
    }

    let control_effort: Float = controls
        .iter()
        .map(|tau| tau.iter().map(|t| t * t).sum::<Float>() * params.dt)
        .sum();
    let arm_deviation: Float = qs.iter().map(|q| q[2] * q[2] * params.dt).sum();

    Ok(Solution {
        scheme: integrator.name().to_string(),
        states_q: qs.iter().map(|q| q.iter().cloned().collect()).collect(),
        states_v: vs.iter().map(|v| v.iter().cloned().collect()).collect(),
        iterations: controls.len(),
        controls,
        parameters: params.clone(),
        cost: control_effort + arm_deviation,
        detailed_cost: DetailedCost {
            control_effort,
            arm_deviation,
        },
        real_time_to_solve,
        status: SolveStatus::Converged,
        time: ts,
    })
}

#[cfg(test)]
mod producer_tests {
    use super::*;

    fn short_params() -> SomersaultParameters {
        SomersaultParameters {
            jump_height: 0.5,
            dt: 0.01,
            ..SomersaultParameters::default()
        }
    }

    #[test]
    fn test_produce_somersault_shape() {
        // Arrange
        let params = short_params();

        // Act
        let solution = produce_somersault(&params, &Integrator::RungeKutta4).unwrap();

        // Assert
        assert_eq!(solution.status, SolveStatus::Converged);
        assert_eq!(solution.states_q.len(), solution.time.len());
        assert_eq!(solution.states_v.len(), solution.time.len());
        assert_eq!(solution.iterations, solution.time.len() - 1);
        assert!(solution.cost.is_finite());
        assert!(solution.real_time_to_solve >= 0.0);

        // Starts at take-off with the configured vertical velocity
        assert_eq!(solution.states_q[0], vec![0.0, 0.0, 0.0]);
        crate::assert_close!(solution.states_v[0][0], params.takeoff_velocity(), 1e-12);
    }

    /// Identical parameters and seed must reproduce the exact same run.
    #[test]
    fn test_produce_somersault_deterministic() {
        // Arrange
        let params = short_params();

        // Act
        let a = produce_somersault(&params, &Integrator::RungeKutta2).unwrap();
        let b = produce_somersault(&params, &Integrator::RungeKutta2).unwrap();

        // Assert
        assert_eq!(a.states_q, b.states_q);
        assert_eq!(a.controls, b.controls);
        assert_eq!(a.cost, b.cost);
    }

    /// The somersault rotation should end near the configured total rotation;
    /// gravity exerts no torque about the trunk joint when the chain hangs
    /// symmetrically, so the spin rate stays close to its initial value.
    #[test]
    fn test_produce_somersault_rotation_progress() {
        // Arrange
        let params = SomersaultParameters {
            arm_torque: 0.0,
            ..short_params()
        };

        // Act
        let solution = produce_somersault(&params, &Integrator::RungeKutta4).unwrap();

        // Assert
        let final_rotation = solution.states_q.last().unwrap()[1];
        let expected = params.somersaults;
        assert!(
            (final_rotation - expected).abs() < 0.2 * expected,
            "final rotation {} too far from {}",
            final_rotation,
            expected
        );
    }
}
