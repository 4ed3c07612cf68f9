#![allow(non_snake_case)]

use types::Float;
pub extern crate nalgebra as na;

pub mod dynamics;
pub mod error;
pub mod geometric_jacobian;
pub mod inertia;
pub mod integrators;
pub mod invariants;
pub mod joint;
pub mod mechanism;
pub mod momentum;
pub mod plot;
pub mod producer;
pub mod quadrature;
pub mod rigid_body;
pub mod simulate;
pub mod solution;
pub mod spatial_acceleration;
pub mod spatial_force;
pub mod trajectory;
pub mod transform;
pub mod twist;
pub mod types;
pub mod util;

pub mod helpers;

pub const GRAVITY: Float = 9.81;

pub const PI: Float = std::f64::consts::PI;
pub const TWO_PI: Float = 2.0 * PI;

pub const WORLD_FRAME: &str = "world";
