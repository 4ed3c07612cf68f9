use crate::{
    inertia::SpatialInertia,
    joint::{Joint, PrismaticJoint, RevoluteJoint},
    mechanism::MechanismState,
    producer::SomersaultParameters,
    rigid_body::RigidBody,
    transform::Transform3D,
    types::Float,
    WORLD_FRAME,
};
use na::{Matrix3, Matrix4, Vector3};

/// Build a mechanism state of a pendulum
pub fn build_pendulum(
    mass: &Float,
    moment: &Matrix3<Float>,
    cross_part: &Vector3<Float>,
    rod_to_world: &Matrix4<Float>,
    axis: &Vector3<Float>,
) -> MechanismState {
    let rod_frame = "rod";
    let rod_to_world = Transform3D::new(rod_frame, WORLD_FRAME, rod_to_world);

    let rod = RigidBody::new(SpatialInertia {
        frame: rod_frame.to_string(),
        moment: moment.clone(),
        cross_part: cross_part.clone(),
        mass: mass.clone(),
    });

    let treejoints = vec![Joint::Revolute(RevoluteJoint::new(
        rod_to_world,
        axis.clone(),
    ))];
    let bodies = vec![rod];

    MechanismState::new(treejoints, bodies)
}

/// Build a mechanism state of a single body on a prismatic joint
pub fn build_slider(
    mass: &Float,
    moment: &Matrix3<Float>,
    cross_part: &Vector3<Float>,
    axis: &Vector3<Float>,
) -> MechanismState {
    let slider_frame = "slider";
    let slider_to_world = Transform3D::identity(slider_frame, WORLD_FRAME);

    let slider = RigidBody::new(SpatialInertia {
        frame: slider_frame.to_string(),
        moment: moment.clone(),
        cross_part: cross_part.clone(),
        mass: mass.clone(),
    });

    let treejoints = vec![Joint::Prismatic(PrismaticJoint::new(
        slider_to_world,
        axis.clone(),
    ))];
    let bodies = vec![slider];

    MechanismState::new(treejoints, bodies)
}

/// Build the planar acrobat used for the somersault runs:
/// - joint 1: vertical prismatic joint carrying the pelvis (ballistic flight)
/// - joint 2: revolute joint about y rotating the trunk (the somersault)
/// - joint 3: revolute joint about y swinging the arms relative to the trunk
///
/// All rotations happen about the y axis, so the motion stays in the x-z
/// plane. q = [z, θ_somersault, θ_arms].
pub fn build_acrobat(params: &SomersaultParameters) -> MechanismState {
    let pelvis_frame = "pelvis";
    let trunk_frame = "trunk";
    let arms_frame = "arms";

    let pelvis_to_world = Transform3D::identity(pelvis_frame, WORLD_FRAME);
    let trunk_to_pelvis = Transform3D::identity(trunk_frame, pelvis_frame);
    let arms_to_trunk = Transform3D::move_z(arms_frame, trunk_frame, params.trunk_length);

    let m_pelvis = 5.0;
    let pelvis = RigidBody::new(SpatialInertia {
        frame: pelvis_frame.to_string(),
        moment: Matrix3::from_diagonal(&Vector3::new(0.05, 0.05, 0.05)),
        cross_part: Vector3::zeros(),
        mass: m_pelvis,
    });

    // Trunk and legs as one rod of length l with COM at l/2 above the hip
    let m_trunk = 55.0;
    let l_trunk = params.trunk_length;
    let moment_trunk = 1.0 / 3.0 * m_trunk * l_trunk * l_trunk;
    let trunk = RigidBody::new(SpatialInertia {
        frame: trunk_frame.to_string(),
        moment: Matrix3::from_diagonal(&Vector3::new(moment_trunk, moment_trunk, 0.5)),
        cross_part: Vector3::new(0.0, 0.0, m_trunk * l_trunk / 2.0),
        mass: m_trunk,
    });

    // Both arms lumped into one rod hanging from the shoulders
    let m_arms = 10.0;
    let l_arms = params.arm_length;
    let moment_arms = 1.0 / 3.0 * m_arms * l_arms * l_arms;
    let arms = RigidBody::new(SpatialInertia {
        frame: arms_frame.to_string(),
        moment: Matrix3::from_diagonal(&Vector3::new(moment_arms, moment_arms, 0.02)),
        cross_part: Vector3::new(0.0, 0.0, m_arms * l_arms / 2.0),
        mass: m_arms,
    });

    let axis_y = Vector3::new(0.0, 1.0, 0.0);
    let treejoints = vec![
        Joint::Prismatic(PrismaticJoint::new(pelvis_to_world, Vector3::z())),
        Joint::Revolute(RevoluteJoint::new(trunk_to_pelvis, axis_y)),
        Joint::Revolute(RevoluteJoint::new(arms_to_trunk, axis_y)),
    ];
    let bodies = vec![pelvis, trunk, arms];

    MechanismState::new(treejoints, bodies)
}
