use itertools::izip;
use na::DVector;

use crate::{dynamics::dynamics, error::SomersaultError, mechanism::MechanismState, types::Float};

/// The numerical-integration schemes whose conservation behavior the
/// comparison driver overlays.
pub enum Integrator {
    SemiImplicitEuler,
    RungeKutta2,
    RungeKutta4,
}

impl Integrator {
    /// Label used to key persisted artifacts and plot series.
    pub fn name(&self) -> &'static str {
        match self {
            Integrator::SemiImplicitEuler => "semi_implicit_euler",
            Integrator::RungeKutta2 => "rk2",
            Integrator::RungeKutta4 => "rk4",
        }
    }
}

pub fn semi_implicit_euler(
    state: &mut MechanismState,
    dt: Float,
    tau: &DVector<Float>,
) -> Result<(DVector<Float>, DVector<Float>), SomersaultError> {
    let vdot = dynamics(state, tau)?;

    // Semi-implicit Euler integration
    // Note: this actually turns out to be energy conserving for Hamiltonian systems,
    // informally meaning systems that are not subject to velocity-dependent
    // forces. E.g. single pendulum
    //
    // Ref: Drake Doc, https://drake.mit.edu/doxygen_cxx/classdrake_1_1systems_1_1_semi_explicit_euler_integrator.html
    let v = &state.v + vdot * dt;
    let q = &state.q + &v * dt;
    Ok((q, v))
}

/// Explicit midpoint method over the paired state (q, v). The q-derivative at
/// each stage is that stage's velocity, so the scheme is genuinely
/// second-order in both q and v.
pub fn runge_kutta_2(
    state: &mut MechanismState,
    dt: Float,
    tau: &DVector<Float>,
) -> Result<(DVector<Float>, DVector<Float>), SomersaultError> {
    let q0 = state.q.clone();
    let v0 = state.v.clone();

    let k1v = dynamics(state, tau)?;
    let k1q = v0.clone();

    state.update(&(&q0 + &k1q * (dt / 2.0)), &(&v0 + &k1v * (dt / 2.0)));
    let k2v = dynamics(state, tau)?;
    let k2q = &v0 + &k1v * (dt / 2.0);

    Ok((&q0 + k2q * dt, &v0 + k2v * dt))
}

/// The classic fourth-order Runge-Kutta scheme over the paired state (q, v).
pub fn runge_kutta_4(
    state: &mut MechanismState,
    dt: Float,
    tau: &DVector<Float>,
) -> Result<(DVector<Float>, DVector<Float>), SomersaultError> {
    let q0 = state.q.clone();
    let v0 = state.v.clone();

    let k1v = dynamics(state, tau)?;
    let k1q = v0.clone();

    state.update(&(&q0 + &k1q * (dt / 2.0)), &(&v0 + &k1v * (dt / 2.0)));
    let k2v = dynamics(state, tau)?;
    let k2q = &v0 + &k1v * (dt / 2.0);

    state.update(&(&q0 + &k2q * (dt / 2.0)), &(&v0 + &k2v * (dt / 2.0)));
    let k3v = dynamics(state, tau)?;
    let k3q = &v0 + &k2v * (dt / 2.0);

    state.update(&(&q0 + &k3q * dt), &(&v0 + &k3v * dt));
    let k4v = dynamics(state, tau)?;
    let k4q = &v0 + &k3v * dt;

    let mut q_final = q0.clone();
    let mut v_final = v0.clone();
    for (i, (k1, k2, k3, k4)) in izip!(k1q.iter(), k2q.iter(), k3q.iter(), k4q.iter()).enumerate()
    {
        q_final[i] += dt / 6.0 * (k1 + 2.0 * k2 + 2.0 * k3 + k4);
    }
    for (i, (k1, k2, k3, k4)) in izip!(k1v.iter(), k2v.iter(), k3v.iter(), k4v.iter()).enumerate()
    {
        v_final[i] += dt / 6.0 * (k1 + 2.0 * k2 + 2.0 * k3 + k4);
    }

    Ok((q_final, v_final))
}

#[cfg(test)]
mod integrators_tests {
    use na::{dvector, vector, Matrix3};

    use crate::{helpers::build_slider, simulate::step, GRAVITY};

    use super::*;

    /// Ballistic motion is exactly quadratic in time, so RK2 and RK4
    /// reproduce z(t) = z0 + v0 t - g t²/2 to round-off.
    #[test]
    fn runge_kutta_ballistic_exact() {
        for integrator in [Integrator::RungeKutta2, Integrator::RungeKutta4] {
            // Arrange
            let m = 2.0;
            let mut state = build_slider(&m, &Matrix3::zeros(), &vector![0., 0., 0.], &vector![
                0., 0., 1.
            ]);
            let v0 = 5.0;
            state.update(&dvector![0.0], &dvector![v0]);

            // Act
            let dt = 0.01;
            let n_steps = 100;
            for _ in 0..n_steps {
                step(&mut state, dt, &dvector![0.0], &integrator).unwrap();
            }

            // Assert
            let t = dt * n_steps as Float;
            let z_expected = v0 * t - 0.5 * GRAVITY * t * t;
            crate::assert_close!(state.q[0], z_expected, 1e-9);
            crate::assert_close!(state.v[0], v0 - GRAVITY * t, 1e-9);
        }
    }

    /// Semi-implicit Euler on ballistic motion lags the exact solution by
    /// O(dt) but stays bounded.
    #[test]
    fn semi_implicit_euler_ballistic_first_order() {
        // Arrange
        let m = 2.0;
        let mut state = build_slider(&m, &Matrix3::zeros(), &vector![0., 0., 0.], &vector![
            0., 0., 1.
        ]);
        let v0 = 5.0;
        state.update(&dvector![0.0], &dvector![v0]);

        // Act
        let dt = 0.001;
        let n_steps = 1000;
        for _ in 0..n_steps {
            step(
                &mut state,
                dt,
                &dvector![0.0],
                &Integrator::SemiImplicitEuler,
            )
            .unwrap();
        }

        // Assert
        let t = dt * n_steps as Float;
        let z_expected = v0 * t - 0.5 * GRAVITY * t * t;
        crate::assert_close!(state.q[0], z_expected, 1e-1);
    }
}
