use std::collections::HashMap;

use crate::geometric_jacobian::GeometricJacobian;
use crate::inertia::compute_inertias;
use crate::inertia::kinetic_energy;
use crate::inertia::SpatialInertia;
use crate::joint::Joint;
use crate::momentum::system_momentum;
use crate::rigid_body::RigidBody;
use crate::transform::compute_bodies_to_root;
use crate::transform::Transform3D;
use crate::twist::compute_twists_wrt_world;
use crate::types::Float;
use crate::util::mul_inertia;
use crate::GRAVITY;
use itertools::izip;
use na::Vector3;
use nalgebra::{DMatrix, DVector};

/// MechanismState stores the state information about the mechanism. This is
/// the model handle all invariant evaluation goes through: it answers kinetic
/// energy, potential energy and angular momentum queries for a given (q, v).
pub struct MechanismState {
    pub treejoints: Vec<Joint>,
    pub treejointids: Vec<usize>,
    pub bodies: Vec<RigidBody>,
    pub q: DVector<Float>, // joint configuration vector
    pub v: DVector<Float>, // joint velocity vector
}

impl MechanismState {
    pub fn new(treejoints: Vec<Joint>, bodies: Vec<RigidBody>) -> Self {
        let njoints = treejoints.len();
        MechanismState {
            treejoints,
            treejointids: (1..=njoints).collect(),
            bodies,
            q: DVector::zeros(njoints),
            v: DVector::zeros(njoints),
        }
    }

    /// Degrees of freedom of the mechanism, one per joint.
    pub fn dof(&self) -> usize {
        self.treejoints.len()
    }

    pub fn update(&mut self, q: &DVector<Float>, v: &DVector<Float>) {
        self.q = q.clone();
        self.v = v.clone();
        for (joint, q) in izip!(self.treejoints.iter_mut(), q.iter()) {
            joint.update(q);
        }
    }

    /// Computes the total kinetic energy of the system
    pub fn kinetic_energy(&self) -> Float {
        let mut KE = 0.0;
        let bodies_to_root = compute_bodies_to_root(self);
        let twists = compute_twists_wrt_world(self, &bodies_to_root);
        let inertias = compute_inertias(self, &bodies_to_root);
        for bodyid in self.treejointids.iter() {
            let twist = twists.get(bodyid).unwrap();
            let spatial_inertia = inertias.get(bodyid).unwrap();

            KE += kinetic_energy(spatial_inertia, twist);
        }
        KE
    }

    /// Computes the total gravitational potential energy of the system,
    /// PE = g * Σ m_i z_com_i, zero at the world origin. The world-frame
    /// cross part of each body inertia is m_i * com_i already.
    pub fn potential_energy(&self) -> Float {
        let bodies_to_root = compute_bodies_to_root(self);
        let inertias = compute_inertias(self, &bodies_to_root);
        let mut PE = 0.0;
        for bodyid in self.treejointids.iter() {
            let inertia = inertias.get(bodyid).unwrap();
            PE += GRAVITY * inertia.cross_part.z;
        }
        PE
    }

    /// Kinetic plus gravitational potential energy at the current (q, v).
    pub fn total_energy(&self) -> Float {
        self.kinetic_energy() + self.potential_energy()
    }

    /// The angular momentum of the whole mechanism about its center of mass,
    /// expressed in world frame.
    pub fn angular_momentum(&self) -> Vector3<Float> {
        system_momentum(self).angular
    }
}

/// Computes the motion space of each joint, expressed in world frame.
pub fn compute_motion_subspaces(
    state: &MechanismState,
    bodies_to_root: &HashMap<usize, Transform3D>,
) -> HashMap<usize, GeometricJacobian> {
    let mut motion_subspaces = HashMap::new();
    for (bodyid, joint) in izip!(state.treejointids.iter(), state.treejoints.iter()) {
        let body_to_root = bodies_to_root.get(bodyid).unwrap();
        let ms_in_body = joint.motion_subspace();
        motion_subspaces.insert(*bodyid, ms_in_body.transform(body_to_root));
    }
    motion_subspaces
}

/// Compute the composite body inertia of each body, expressed in world frame
pub fn compute_crb_inertias(
    state: &MechanismState,
    inertias: &HashMap<usize, SpatialInertia>,
) -> HashMap<usize, SpatialInertia> {
    let mut crb_inertias = HashMap::new();
    for bodyid in state.treejointids.iter().rev() {
        let inertia = inertias.get(bodyid).unwrap();
        let crb_inertia: SpatialInertia;
        if let Some(child_crb_inertia) = crb_inertias.get(&(bodyid + 1)) {
            crb_inertia = inertia + child_crb_inertia;
        } else {
            crb_inertia = inertia.clone();
        }
        crb_inertias.insert(*bodyid, crb_inertia);
    }

    crb_inertias
}

/// Compute the joint-space mass matrix (also known as the inertia matrix) of
/// the Mechanism in the given state, i.e., the matrix M(q) in the unconstrained
/// joint-space equations of motion:
///     M(q) vdot + c(q, v) = τ
/// This method implements the composite rigid body algorithm.
///
/// The result is an n_v by n_v lower triangular symmetric matrix, where n_v
/// is the dimension of the Mechanism's joint velocity vector v.
pub fn mass_matrix(
    state: &MechanismState,
    bodies_to_root: &HashMap<usize, Transform3D>,
) -> DMatrix<Float> {
    let n_v = state.treejointids.len(); // n_v = number of joints, every joint is single-dof
    let mut mass_matrix = DMatrix::zeros(n_v, n_v);
    let motion_subspaces = compute_motion_subspaces(state, bodies_to_root);
    let inertias = compute_inertias(state, bodies_to_root);
    let crb_inertias = compute_crb_inertias(state, &inertias);
    for i in state.treejointids.iter() {
        let Ici = crb_inertias.get(i).unwrap();
        let Si = motion_subspaces.get(i).unwrap();
        let (Fi_angular, Fi_linear) = mul_inertia(
            &Ici.moment,
            &Ici.cross_part,
            Ici.mass,
            &Si.angular,
            &Si.linear,
        );
        for j in 1..=*i {
            let Sj = motion_subspaces.get(&j).unwrap();
            mass_matrix[(i - 1, j - 1)] = Fi_angular.dot(&Sj.angular) + Fi_linear.dot(&Sj.linear);
        }
    }

    mass_matrix
}

#[cfg(test)]
mod mechanism_tests {
    use na::{dvector, vector, Matrix3, Matrix4};

    use crate::helpers::{build_acrobat, build_pendulum};
    use crate::producer::SomersaultParameters;

    use super::*;

    /// Rod pendulum rotating about y at the origin: KE = 1/2 I ω² with
    /// I = m l² / 3, PE = m g (l/2) (-sin q).
    #[test]
    fn test_pendulum_energy() {
        // Arrange
        let m = 5.0;
        let l: Float = 7.0;
        let moment_y = 1.0 / 3.0 * m * l * l;
        let moment = Matrix3::from_diagonal(&vector![0.0, moment_y, moment_y]);
        let cross_part = vector![m * l / 2.0, 0.0, 0.0];
        let axis = vector![0.0, 1.0, 0.0];
        let mut state = build_pendulum(&m, &moment, &cross_part, &Matrix4::identity(), &axis);

        let q = 0.3;
        let omega = 2.0;
        state.update(&dvector![q], &dvector![omega]);

        // Act
        let KE = state.kinetic_energy();
        let PE = state.potential_energy();

        // Assert
        crate::assert_close!(KE, 0.5 * moment_y * omega * omega, 1e-9);
        crate::assert_close!(PE, m * crate::GRAVITY * l / 2.0 * (-q.sin()), 1e-9);
        crate::assert_close!(state.total_energy(), KE + PE, 1e-12);
    }

    /// The mass matrix of the acrobat chain must be symmetric positive on the
    /// diagonal, and its (0, 0) entry is the full chain mass because joint 1
    /// is a vertical prismatic joint carrying everything.
    #[test]
    fn test_acrobat_mass_matrix() {
        // Arrange
        let params = SomersaultParameters::default();
        let mut state = build_acrobat(&params);
        state.update(&dvector![1.0, 0.4, -0.2], &dvector![0.0, 0.0, 0.0]);

        // Act
        let bodies_to_root = compute_bodies_to_root(&state);
        let M = mass_matrix(&state, &bodies_to_root);

        // Assert
        let total_mass: Float = state.bodies.iter().map(|b| b.inertia.mass).sum();
        crate::assert_close!(M[(0, 0)], total_mass, 1e-9);
        for i in 0..state.dof() {
            assert!(M[(i, i)] > 0.0, "diagonal entry {} not positive", i);
        }
    }
}
