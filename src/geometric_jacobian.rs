use na::Vector3;

use crate::{transform::Transform3D, types::Float};

/// A geometric Jacobian maps a joint velocity to a twist. Every joint in the
/// chain has a single degree of freedom, so one angular/linear column pair is
/// enough.
#[derive(PartialEq, Debug)]
pub struct GeometricJacobian {
    pub body: String,
    pub base: String,
    pub frame: String,
    pub angular: Vector3<Float>,
    pub linear: Vector3<Float>,
}

impl GeometricJacobian {
    /// Transform the motion subspace to be expressed in the "to" frame of transform
    pub fn transform(&self, transform: &Transform3D) -> GeometricJacobian {
        if self.frame != transform.from {
            panic!(
                "motion subspace {} frame is not equal to transform `from` {} frame!",
                self.frame, transform.from
            );
        }

        let rot = transform.rot();
        let trans = transform.trans();
        let angular = rot * self.angular;
        let linear = rot * self.linear + trans.cross(&angular);

        GeometricJacobian {
            body: self.body.clone(),
            base: self.base.clone(),
            frame: transform.to.clone(),
            angular,
            linear,
        }
    }
}
