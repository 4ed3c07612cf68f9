use crate::inertia::SpatialInertia;

/// A single rigid body of the mechanism, fully described by its spatial
/// inertia.
pub struct RigidBody {
    pub inertia: SpatialInertia,
}

impl RigidBody {
    pub fn new(inertia: SpatialInertia) -> Self {
        RigidBody { inertia }
    }
}
