use std::ops::Add;

use na::{zero, Vector3};

use crate::transform::Transform3D;
use crate::twist::Twist;
use crate::types::Float;
use crate::GRAVITY;
use crate::WORLD_FRAME;

/// A spatial acceleration is the time derivative of a twist
#[derive(PartialEq, Debug, Clone)]
pub struct SpatialAcceleration {
    pub body: String,
    pub base: String,
    pub frame: String,
    pub angular: Vector3<Float>,
    pub linear: Vector3<Float>,
}

impl SpatialAcceleration {
    /// Transform the spatial acceleration to be expressed in the "to" frame of transform
    pub fn transform(&self, transform: &Transform3D) -> SpatialAcceleration {
        if self.frame != transform.from {
            panic!(
                "spatial acceleration {} frame is not equal to transform `from` {} frame!",
                self.frame, transform.from
            );
        }

        let rot = transform.rot();
        let trans = transform.trans();
        let angular = rot * self.angular;
        let linear = rot * self.linear + trans.cross(&angular);

        SpatialAcceleration {
            body: self.body.clone(),
            base: self.base.clone(),
            frame: transform.to.clone(),
            angular,
            linear,
        }
    }

    /// The acceleration the whole system would need to cancel gravity; adding
    /// it into the Newton-Euler recursion simulates the effect of gravity.
    pub fn inv_gravitational_spatial_acceleration() -> SpatialAcceleration {
        SpatialAcceleration {
            body: WORLD_FRAME.to_string(),
            base: WORLD_FRAME.to_string(),
            frame: WORLD_FRAME.to_string(),
            angular: Vector3::zeros(),
            linear: Vector3::new(0.0, 0.0, GRAVITY),
        }
    }
}

impl<'a, 'b> Add<&'b SpatialAcceleration> for &'a SpatialAcceleration {
    type Output = SpatialAcceleration;

    /// lhs is A to B spatial acceleration, rhs is B to C spatial acceleration,
    /// returns A to C spatial acceleration.
    fn add(self, rhs: &SpatialAcceleration) -> SpatialAcceleration {
        if self.frame != rhs.frame {
            panic!("lhs and rhs are not expressed in the same frame!");
        }

        if self.body != rhs.base && !(self.base == rhs.base && self.body == rhs.body) {
            panic!("lhs frames do not match as rhs frames!");
        }
        SpatialAcceleration {
            body: rhs.body.clone(),
            base: self.base.clone(),
            frame: self.frame.clone(),
            angular: self.angular + rhs.angular,
            linear: self.linear + rhs.linear,
        }
    }
}

/// The spatial-cross-product term that appears when differentiating a twist
/// expressed in a moving frame.
pub fn twist_cross(lhs: &Twist, rhs: &Twist) -> SpatialAcceleration {
    if lhs.frame != rhs.frame {
        panic!("Frames of two twists do not match!");
    }

    let xw = lhs.angular;
    let xv = lhs.linear;
    let yw = rhs.angular;
    let yv = rhs.linear;
    let angular: Vector3<Float> = xw.cross(&yw);
    let linear: Vector3<Float> = xw.cross(&yv) + xv.cross(&yw);

    SpatialAcceleration {
        body: rhs.body.clone(),
        base: rhs.base.clone(),
        frame: lhs.frame.clone(),
        angular,
        linear,
    }
}

#[cfg(test)]
mod spatial_acceleration_tests {
    use na::vector;

    use super::*;

    #[test]
    fn test_twist_cross_pure_rotation() {
        // Arrange
        let a = Twist {
            body: "a".to_string(),
            base: WORLD_FRAME.to_string(),
            frame: WORLD_FRAME.to_string(),
            angular: vector![0., 0., 1.],
            linear: zero(),
        };
        let b = Twist {
            body: "b".to_string(),
            base: "a".to_string(),
            frame: WORLD_FRAME.to_string(),
            angular: vector![0., 1., 0.],
            linear: vector![1., 0., 0.],
        };

        // Act
        let acc = twist_cross(&a, &b);

        // Assert
        assert_eq!(acc.angular, vector![-1., 0., 0.]);
        assert_eq!(acc.linear, vector![0., 1., 0.]);
    }
}
