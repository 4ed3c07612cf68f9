use crate::{
    dynamics::newton_euler,
    error::SomersaultError,
    integrators::{runge_kutta_2, runge_kutta_4, semi_implicit_euler, Integrator},
    mechanism::MechanismState,
    spatial_acceleration::{twist_cross, SpatialAcceleration},
    spatial_force::compute_torques,
    transform::{compute_bodies_to_root, Transform3D},
    twist::{compute_twists_wrt_world, Twist},
    types::Float,
};
use itertools::izip;
use na::DVector;
use std::collections::HashMap;

/// Compute the spatial acceleration of each body wrt. the world frame given
/// joint accelerations vdot, along with the transforms and twists used.
pub fn spatial_accelerations(
    state: &MechanismState,
    vdot: &DVector<Float>,
) -> (
    HashMap<usize, SpatialAcceleration>,
    HashMap<usize, Transform3D>,
    HashMap<usize, Twist>,
) {
    let rootid = 0; // root has body id 0 by convention

    // Compute the body to root frame transform for each body
    let bodies_to_root = compute_bodies_to_root(state);

    // Compute the twist of each body with respect to the world frame
    let twists = compute_twists_wrt_world(state, &bodies_to_root);

    // Compute the joint spatial accelerations of each body expressed in body frame
    let mut joint_accels: HashMap<usize, SpatialAcceleration> = HashMap::new();
    for (jointid, joint, vdot) in izip!(
        state.treejointids.iter(),
        state.treejoints.iter(),
        vdot.iter()
    ) {
        let bodyid = jointid;
        joint_accels.insert(*bodyid, joint.spatial_acceleration(vdot));
    }

    // Compute the spatial acceleration of each body wrt. world frame, expressed
    // in world frame
    let mut accels: HashMap<usize, SpatialAcceleration> = HashMap::new();
    accels.insert(
        rootid,
        SpatialAcceleration::inv_gravitational_spatial_acceleration(),
    ); // simulates the effect of gravity
    for jointid in state.treejointids.iter() {
        let parentbodyid = jointid - 1;
        let bodyid = jointid;
        let parent_acc = accels.get(&parentbodyid).unwrap();
        let parent_twist = twists.get(&parentbodyid).unwrap();
        let body_twist = twists.get(bodyid).unwrap();

        let body_to_root = bodies_to_root.get(bodyid).unwrap();
        let joint_acc = joint_accels.get(bodyid).unwrap().transform(body_to_root);

        let body_acc = &(parent_acc + &joint_acc) + &twist_cross(parent_twist, body_twist);
        accels.insert(*bodyid, body_acc);
    }

    (accels, bodies_to_root, twists)
}

/// Do inverse dynamics, i.e. compute τ in the unconstrained joint-space
/// equations of motion
///
/// M(q) vdot + c(q, v) = τ
///
/// given joint configuration vector q, joint velocity vector v, joint
/// acceleration vector vdot.
///
/// This method implements the recursive Newton-Euler algorithm.
pub fn inverse_dynamics(state: &MechanismState, vdot: &DVector<Float>) -> DVector<Float> {
    let (accels, bodies_to_root, twists) = spatial_accelerations(state, vdot);
    let wrenches = newton_euler(state, &accels, &bodies_to_root, &twists);

    compute_torques(state, &wrenches, &bodies_to_root)
}

/// Step the mechanism state forward by dt seconds under joint torques tau.
pub fn step(
    state: &mut MechanismState,
    dt: Float,
    tau: &DVector<Float>,
    integrator: &Integrator,
) -> Result<(DVector<Float>, DVector<Float>), SomersaultError> {
    let (q, v) = match integrator {
        Integrator::SemiImplicitEuler => semi_implicit_euler(state, dt, tau)?,
        Integrator::RungeKutta2 => runge_kutta_2(state, dt, tau)?,
        Integrator::RungeKutta4 => runge_kutta_4(state, dt, tau)?,
    };

    state.update(&q, &v);
    Ok((q, v))
}

/// Simulate the mechanism state from 0 to final_time with a time step of dt.
/// Returns the joint configurations, velocities and time stamps at each
/// sample, including the initial state.
pub fn simulate(
    state: &mut MechanismState,
    final_time: Float,
    dt: Float,
    mut control_fn: impl FnMut(&MechanismState, Float) -> DVector<Float>,
    integrator: &Integrator,
) -> Result<(Vec<DVector<Float>>, Vec<DVector<Float>>, Vec<Float>), SomersaultError> {
    let mut t = 0.0;
    let mut qs: Vec<DVector<Float>> = vec![state.q.clone()];
    let mut vs: Vec<DVector<Float>> = vec![state.v.clone()];
    let mut ts: Vec<Float> = vec![0.0];
    while t < final_time {
        let tau = control_fn(state, t);
        let (q, v) = step(state, dt, &tau, integrator)?;
        t += dt;
        qs.push(q);
        vs.push(v);
        ts.push(t);
    }

    Ok((qs, vs, ts))
}

#[cfg(test)]
mod simulate_tests {
    use crate::{helpers::build_pendulum, GRAVITY, PI};

    use super::*;
    use na::Matrix4;
    use nalgebra::{dvector, vector, Matrix3};

    #[test]
    fn simulate_horizontal_right_rod() {
        // Arrange
        let m = 5.0; // Mass of rod
        let l: Float = 7.0; // Length of rod

        let moment_x = 0.0;
        let moment_y = 1.0 / 3.0 * m * l * l;
        let moment_z = 1.0 / 3.0 * m * l * l;
        let moment = Matrix3::from_diagonal(&vector![moment_x, moment_y, moment_z]);
        let cross_part = vector![m * l / 2.0, 0.0, 0.0];

        let rod_to_world = Matrix4::identity(); // transformation from rod to world frame
        let axis = vector![0.0, 1.0, 0.0]; // axis of joint rotation

        let mut state = build_pendulum(&m, &moment, &cross_part, &rod_to_world, &axis);

        let initial_energy = 0.0 + 0.0; // E = PE + KE, both are zero at the start.

        // Act
        let final_time = 10.0;
        let dt = 0.02;
        let (qs, vs, ts) = simulate(
            &mut state,
            final_time,
            dt,
            |_state, _t| dvector![0.0],
            &Integrator::SemiImplicitEuler,
        )
        .unwrap();

        // Assert
        assert_eq!(qs.len(), ts.len());
        assert_eq!(vs.len(), ts.len());

        let q_max = qs
            .iter()
            .map(|q| q[0])
            .fold(Float::NEG_INFINITY, Float::max);
        assert!((q_max - PI).abs() < 1e-2); // Check highest point of swing

        let q_final = qs[qs.len() - 1][0];
        let v_final = vs[vs.len() - 1][0];

        let potential_energy = m * GRAVITY * l / 2.0 * (-q_final.sin()); // mgh
        let kinetic_energy = 0.5 * (m * l * l / 3.0) * v_final * v_final; // 1/2 I ω^2
        assert!((initial_energy - (potential_energy + kinetic_energy)).abs() < 1.0);
        // Sanity check that energy is conserved. Not exact due to numerical integration.
        // Note: this is potentially flaky test depending on parameters
    }

    #[test]
    fn inverse_dynamics_upright_rod() {
        // Arrange
        let m = 5.0; // Mass of rod
        let l: Float = 3.0; // Length of rod
        let moment_x = 1.0 / 3.0 * m * l * l;
        let moment_y = moment_x;
        let moment_z = 0.0;
        let moment = Matrix3::from_diagonal(&vector![moment_x, moment_y, moment_z]);
        let cross_part = vector![0.0, 0.0, m * l / 2.0];

        let rod_to_world = Matrix4::identity(); // transformation from rod to world frame
        let axis = vector![0.0, 1.0, 0.0]; // axis of joint rotation

        let state = build_pendulum(&m, &moment, &cross_part, &rod_to_world, &axis);

        let vdot = dvector![-1.0]; // acceleration around -y axis

        // Act
        let torquesout = inverse_dynamics(&state, &vdot);

        // Assert
        crate::assert_vec_close!(torquesout, dvector![-1.0 / 3.0 * m * l * l], 1e-9);
    }
}
