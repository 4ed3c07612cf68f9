use na::Vector3;

use crate::{
    inertia::compute_inertias,
    mechanism::MechanismState,
    transform::compute_bodies_to_root,
    twist::compute_twists_wrt_world,
    types::Float,
    util::mul_inertia,
    WORLD_FRAME,
};

/// The spatial momentum of the whole mechanism, expressed in world frame. The
/// angular part is taken about the system center of mass, which is the
/// reference point for which angular momentum is conserved during free flight.
#[derive(Debug, PartialEq)]
pub struct Momentum {
    pub frame: String,
    pub angular: Vector3<Float>,
    pub linear: Vector3<Float>,
}

/// Sum the per-body spatial momenta h_i = I_i^w T_i and shift the angular part
/// from the world origin to the system center of mass:
///     h_com = h_O - x_com × p
pub fn system_momentum(state: &MechanismState) -> Momentum {
    let bodies_to_root = compute_bodies_to_root(state);
    let twists = compute_twists_wrt_world(state, &bodies_to_root);
    let inertias = compute_inertias(state, &bodies_to_root);

    let mut angular = Vector3::zeros();
    let mut linear = Vector3::zeros();
    let mut cross_part = Vector3::zeros(); // m * com, summed over bodies
    let mut mass = 0.0;
    for bodyid in state.treejointids.iter() {
        let inertia = inertias.get(bodyid).unwrap();
        let twist = twists.get(bodyid).unwrap();

        let (h_ang, h_lin) = mul_inertia(
            &inertia.moment,
            &inertia.cross_part,
            inertia.mass,
            &twist.angular,
            &twist.linear,
        );
        angular += h_ang;
        linear += h_lin;
        cross_part += inertia.cross_part;
        mass += inertia.mass;
    }

    let com = cross_part / mass;
    Momentum {
        frame: WORLD_FRAME.to_string(),
        angular: angular - com.cross(&linear),
        linear,
    }
}
