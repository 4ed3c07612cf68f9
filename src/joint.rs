use na::{zero, Matrix4};
use nalgebra::Vector3;

use crate::{
    geometric_jacobian::GeometricJacobian, spatial_acceleration::SpatialAcceleration,
    transform::Transform3D, twist::Twist, types::Float,
};

/// Represents a revolute joint connecting a predecessor and a successor body.
///
/// Note: joint frame is defined as the successor body frame
pub struct RevoluteJoint {
    pub init_mat: Matrix4<Float>, // initial transform from successor frame to predecessor frame
    pub transform: Transform3D,   // transform from successor frame to predecessor frame
    pub axis: Vector3<Float>,     // axis of rotation expressed in successor body frame
}

impl RevoluteJoint {
    pub fn new(transform: Transform3D, axis: Vector3<Float>) -> Self {
        RevoluteJoint {
            init_mat: transform.mat.clone(),
            transform,
            axis,
        }
    }

    /// Update the transform to be initial transform rotated around axis by q
    pub fn update(&mut self, q: &Float) {
        self.transform = Transform3D {
            from: self.transform.from.clone(),
            to: self.transform.to.clone(),
            mat: self.init_mat * Transform3D::rotation(&self.axis, q),
        };
    }

    pub fn motion_subspace(&self) -> GeometricJacobian {
        GeometricJacobian {
            body: self.transform.from.clone(),
            base: self.transform.to.clone(),
            frame: self.transform.from.clone(),
            angular: self.axis,
            linear: zero(),
        }
    }
}

/// Represents a prismatic joint connecting a predecessor and a successor body.
///
/// Note: joint frame is defined as the successor body frame
pub struct PrismaticJoint {
    pub init_mat: Matrix4<Float>,
    pub transform: Transform3D,
    pub axis: Vector3<Float>, // axis of translation expressed in successor body frame
}

impl PrismaticJoint {
    pub fn new(transform: Transform3D, axis: Vector3<Float>) -> Self {
        PrismaticJoint {
            init_mat: transform.mat.clone(),
            transform,
            axis,
        }
    }

    /// Update the transform to be initial transform moved along axis by q
    pub fn update(&mut self, q: &Float) {
        self.transform = Transform3D {
            from: self.transform.from.clone(),
            to: self.transform.to.clone(),
            mat: self.init_mat * Transform3D::translation(&self.axis, q),
        };
    }

    pub fn motion_subspace(&self) -> GeometricJacobian {
        GeometricJacobian {
            body: self.transform.from.clone(),
            base: self.transform.to.clone(),
            frame: self.transform.from.clone(),
            angular: zero(),
            linear: self.axis,
        }
    }
}

/// Every joint in the chain is single-dof, so joint configuration and
/// velocity stay plain Float vectors.
pub enum Joint {
    Revolute(RevoluteJoint),
    Prismatic(PrismaticJoint),
}

impl Joint {
    pub fn transform(&self) -> &Transform3D {
        match self {
            Joint::Revolute(joint) => &joint.transform,
            Joint::Prismatic(joint) => &joint.transform,
        }
    }

    pub fn update(&mut self, q: &Float) {
        match self {
            Joint::Revolute(joint) => joint.update(q),
            Joint::Prismatic(joint) => joint.update(q),
        }
    }

    pub fn motion_subspace(&self) -> GeometricJacobian {
        match self {
            Joint::Revolute(joint) => joint.motion_subspace(),
            Joint::Prismatic(joint) => joint.motion_subspace(),
        }
    }

    /// The twist of the successor frame wrt. the predecessor frame, expressed
    /// in successor frame.
    pub fn joint_twist(&self, v: Float) -> Twist {
        let transform = self.transform();
        let (angular, linear) = match self {
            Joint::Revolute(joint) => (joint.axis * v, zero()),
            Joint::Prismatic(joint) => (zero(), joint.axis * v),
        };
        Twist {
            body: transform.from.clone(),
            base: transform.to.clone(),
            frame: transform.from.clone(),
            angular,
            linear,
        }
    }

    /// Return the spatial acceleration of the successor with respect
    /// to its predecessor, expressed in the successor frame.
    pub fn spatial_acceleration(&self, vdot: &Float) -> SpatialAcceleration {
        let transform = self.transform();
        let (angular, linear) = match self {
            Joint::Revolute(joint) => (joint.axis * (*vdot), zero()),
            Joint::Prismatic(joint) => (zero(), joint.axis * (*vdot)),
        };
        SpatialAcceleration {
            body: transform.from.clone(),
            base: transform.to.clone(),
            frame: transform.from.clone(),
            angular,
            linear,
        }
    }
}
