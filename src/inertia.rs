use std::collections::HashMap;
use std::ops::Add;

use itertools::izip;
use na::{DMatrix, Point3, Vector3};
use nalgebra::Matrix3;

use crate::{
    mechanism::MechanismState, transform::Transform3D, twist::Twist, types::Float, WORLD_FRAME,
};

/// A spatial inertia, or inertia matrix, represents the mass distribution of a
/// rigid body.
/// A spatial inertia expressed in frame i is defined as:
/// I^i = | J         c_hat |
///       | c_hat^T     mI  |
/// where J is the mass moment of inertia, m is the total mass, and c is the
/// 'cross part', which is the center of mass position scaled by m.
///
/// !!! Warning
///     The __moment__ field of a __SpatialInertia__ is the moment of inertia
///     about the origin of its __frame__, not about the center of mass.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialInertia {
    pub frame: String,
    pub moment: Matrix3<Float>,
    pub cross_part: Vector3<Float>,
    pub mass: Float,
}

impl SpatialInertia {
    pub fn center_of_mass(&self) -> Point3<Float> {
        let p = self.cross_part / self.mass;
        Point3::<Float>::new(p.x, p.y, p.z)
    }

    /// Transform the spatial inertia to be expressed in world frame
    pub fn transform(&self, transform: &Transform3D) -> SpatialInertia {
        if self.frame != transform.from {
            panic!(
                "self frame {} and transform from frame {} do not match!",
                self.frame, transform.from
            );
        }

        let R = transform.rot();
        let p = transform.trans();

        let J = self.moment;
        let mc = self.cross_part;
        let m = self.mass;

        let Rmc = R * mc;
        let mp = m * p;
        let mcnew = Rmc + mp;
        let X = Rmc * p.transpose();
        let Y = X + X.transpose() + mp * p.transpose();
        let Jnew = R * J * R.transpose() - Y + Y.trace() * DMatrix::identity(Y.nrows(), Y.ncols());

        SpatialInertia {
            frame: transform.to.clone(),
            moment: Jnew,
            cross_part: mcnew,
            mass: m,
        }
    }
}

impl<'a, 'b> Add<&'b SpatialInertia> for &'a SpatialInertia {
    type Output = SpatialInertia;

    fn add(self, rhs: &SpatialInertia) -> SpatialInertia {
        if self.frame != rhs.frame {
            panic!("lhs frame {} != rhs frame {}!", self.frame, rhs.frame);
        }

        SpatialInertia {
            frame: self.frame.clone(),
            moment: self.moment + rhs.moment,
            cross_part: self.cross_part + rhs.cross_part,
            mass: self.mass + rhs.mass,
        }
    }
}

/// Compute the inertia of each body expressed in world frame.
pub fn compute_inertias(
    state: &MechanismState,
    bodies_to_root: &HashMap<usize, Transform3D>,
) -> HashMap<usize, SpatialInertia> {
    let mut inertias = HashMap::new();
    for (jointid, body) in izip!(state.treejointids.iter(), state.bodies.iter()) {
        let bodyid = jointid;
        let body_to_root = bodies_to_root.get(bodyid).unwrap();
        let inertia = body.inertia.transform(body_to_root);
        inertias.insert(*bodyid, inertia);
    }

    inertias
}

/// Computes the kinetic energy of a body
/// Essentially implements KE = 1/2 * v^T * M * v
pub fn kinetic_energy(inertia: &SpatialInertia, twist: &Twist) -> Float {
    // Ensure both are expressed in world frame
    if inertia.frame != WORLD_FRAME {
        panic!("spatial inertia frame {} is not world.", inertia.frame);
    }
    if twist.frame != WORLD_FRAME {
        panic!("twist frame {} is not world.", twist.frame);
    }

    if twist.base != WORLD_FRAME {
        panic!("twist base {} is not world.", twist.base);
    }

    let w = twist.angular;
    let v = twist.linear;
    let J = inertia.moment;
    let c = inertia.cross_part;
    let m = inertia.mass;

    (w.dot(&(J * w)) + v.dot(&(m * v + 2.0 * w.cross(&c)))) / 2.0
}

#[cfg(test)]
mod inertia_tests {
    use na::{vector, Matrix3};

    use super::*;

    /// A point mass moving in a straight line carries 1/2 m v^2.
    #[test]
    fn test_kinetic_energy_point_mass() {
        // Arrange
        let inertia = SpatialInertia {
            frame: WORLD_FRAME.to_string(),
            moment: Matrix3::zeros(),
            cross_part: vector![0., 0., 0.],
            mass: 2.0,
        };
        let twist = Twist {
            body: "mass".to_string(),
            base: WORLD_FRAME.to_string(),
            frame: WORLD_FRAME.to_string(),
            angular: vector![0., 0., 0.],
            linear: vector![3., 0., 0.],
        };

        // Act
        let KE = kinetic_energy(&inertia, &twist);

        // Assert
        crate::assert_close!(KE, 0.5 * 2.0 * 9.0, 1e-12);
    }

    /// Transforming an inertia by a pure translation shifts its cross part by
    /// m * p and keeps its mass.
    #[test]
    fn test_transform_translation() {
        // Arrange
        let inertia = SpatialInertia {
            frame: "body".to_string(),
            moment: Matrix3::identity(),
            cross_part: vector![0., 0., 0.],
            mass: 3.0,
        };
        let transform = Transform3D::move_z("body", WORLD_FRAME, 2.0);

        // Act
        let world = inertia.transform(&transform);

        // Assert
        assert_eq!(world.mass, 3.0);
        assert_eq!(world.cross_part, vector![0., 0., 6.0]);
        assert_eq!(world.frame, WORLD_FRAME);
    }
}
