use na::DVector;

use crate::{
    error::SomersaultError,
    mechanism::MechanismState,
    quadrature::{finite_difference_velocity, representative_coordinate, QuadratureRule},
    trajectory::Trajectory,
    types::Float,
};

/// Discrete total energy of the interval between two consecutive coordinate
/// samples: kinetic energy at the representative (q, qdot) plus potential
/// energy at the representative q.
pub fn interval_total_energy(
    model: &mut MechanismState,
    q1: &DVector<Float>,
    q2: &DVector<Float>,
    dt: Float,
    rule: QuadratureRule,
) -> Float {
    let q = representative_coordinate(q1, q2, rule);
    let qdot = finite_difference_velocity(q1, q2, dt);
    model.update(&q, &qdot);
    model.total_energy()
}

/// Norm of the model's angular momentum about its center of mass, evaluated at
/// the representative (q, qdot) of the interval.
pub fn interval_angular_momentum(
    model: &mut MechanismState,
    q1: &DVector<Float>,
    q2: &DVector<Float>,
    dt: Float,
    rule: QuadratureRule,
) -> Float {
    let q = representative_coordinate(q1, q2, rule);
    let qdot = finite_difference_velocity(q1, q2, dt);
    model.update(&q, &qdot);
    model.angular_momentum().norm()
}

/// Discrete total energy across the whole trajectory: one sample per interval
/// between consecutive frames, N - 1 samples for N frames, in input order.
pub fn discrete_total_energy(
    model: &mut MechanismState,
    trajectory: &Trajectory,
    rule: QuadratureRule,
) -> Result<DVector<Float>, SomersaultError> {
    trajectory.require_intervals(1)?;
    trajectory.require_dof(model.dof())?;
    let n_frames = trajectory.n_frames();
    let mut energy = DVector::zeros(n_frames - 1);
    for i in 0..n_frames - 1 {
        energy[i] = interval_total_energy(
            model,
            &trajectory.q[i],
            &trajectory.q[i + 1],
            trajectory.time[i + 1] - trajectory.time[i],
            rule,
        );
    }
    Ok(energy)
}

/// Discrete angular momentum norm across the whole trajectory, one sample per
/// interval in input order.
pub fn discrete_angular_momentum(
    model: &mut MechanismState,
    trajectory: &Trajectory,
    rule: QuadratureRule,
) -> Result<DVector<Float>, SomersaultError> {
    trajectory.require_intervals(1)?;
    trajectory.require_dof(model.dof())?;
    let n_frames = trajectory.n_frames();
    let mut angular_momentum = DVector::zeros(n_frames - 1);
    for i in 0..n_frames - 1 {
        angular_momentum[i] = interval_angular_momentum(
            model,
            &trajectory.q[i],
            &trajectory.q[i + 1],
            trajectory.time[i + 1] - trajectory.time[i],
            rule,
        );
    }
    Ok(angular_momentum)
}

/// Net energy drift across the trajectory: the last interval's value minus the
/// first interval's value, both computed with the same rule and a
/// forward-in-time step. With exactly 2 frames the two intervals coincide and
/// the drift is 0.0.
pub fn delta_total_energy(
    model: &mut MechanismState,
    trajectory: &Trajectory,
    rule: QuadratureRule,
) -> Result<Float, SomersaultError> {
    trajectory.require_intervals(1)?;
    trajectory.require_dof(model.dof())?;
    let n = trajectory.n_frames();
    let first = interval_total_energy(
        model,
        &trajectory.q[0],
        &trajectory.q[1],
        trajectory.time[1] - trajectory.time[0],
        rule,
    );
    let last = interval_total_energy(
        model,
        &trajectory.q[n - 2],
        &trajectory.q[n - 1],
        trajectory.time[n - 1] - trajectory.time[n - 2],
        rule,
    );
    Ok(last - first)
}

/// Net angular-momentum drift across the trajectory, same endpoint convention
/// as [`delta_total_energy`].
pub fn delta_angular_momentum(
    model: &mut MechanismState,
    trajectory: &Trajectory,
    rule: QuadratureRule,
) -> Result<Float, SomersaultError> {
    trajectory.require_intervals(1)?;
    trajectory.require_dof(model.dof())?;
    let n = trajectory.n_frames();
    let first = interval_angular_momentum(
        model,
        &trajectory.q[0],
        &trajectory.q[1],
        trajectory.time[1] - trajectory.time[0],
        rule,
    );
    let last = interval_angular_momentum(
        model,
        &trajectory.q[n - 2],
        &trajectory.q[n - 1],
        trajectory.time[n - 1] - trajectory.time[n - 2],
        rule,
    );
    Ok(last - first)
}
