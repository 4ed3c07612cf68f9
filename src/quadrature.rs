use std::fmt;
use std::str::FromStr;

use na::DVector;

use crate::{error::SomersaultError, types::Float};

/// The discrete approximation used to collapse a pair of consecutive
/// coordinate samples into one representative coordinate. Choosing one
/// consistent with the integrator that produced the trajectory is the
/// caller's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuadratureRule {
    Midpoint,
    LeftRectangle,
    RightRectangle,
    Trapezoidal,
}

impl Default for QuadratureRule {
    fn default() -> Self {
        QuadratureRule::Trapezoidal
    }
}

impl fmt::Display for QuadratureRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuadratureRule::Midpoint => "midpoint",
            QuadratureRule::LeftRectangle => "left_rectangle",
            QuadratureRule::RightRectangle => "right_rectangle",
            QuadratureRule::Trapezoidal => "trapezoidal",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for QuadratureRule {
    type Err = SomersaultError;

    /// Rule names enter from configuration and artifact metadata; anything
    /// unrecognized is an error, with no fallback.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "midpoint" => Ok(QuadratureRule::Midpoint),
            "left_rectangle" => Ok(QuadratureRule::LeftRectangle),
            "right_rectangle" => Ok(QuadratureRule::RightRectangle),
            "trapezoidal" => Ok(QuadratureRule::Trapezoidal),
            other => Err(SomersaultError::UnsupportedRule(other.to_string())),
        }
    }
}

/// The single place rule dispatch happens: select the representative
/// coordinate for the interval between two consecutive samples. Both invariant
/// evaluators go through this selector.
///
/// Midpoint and trapezoidal deliberately share the same averaged coordinate;
/// they differ only in how the underlying integrator weighs the endpoints.
pub fn representative_coordinate(
    q1: &DVector<Float>,
    q2: &DVector<Float>,
    rule: QuadratureRule,
) -> DVector<Float> {
    match rule {
        QuadratureRule::Midpoint | QuadratureRule::Trapezoidal => (q1 + q2) / 2.0,
        QuadratureRule::LeftRectangle => q1.clone(),
        QuadratureRule::RightRectangle => q2.clone(),
    }
}

/// Finite-difference representative velocity over the interval. Shared by all
/// rules regardless of how the representative coordinate is chosen.
pub fn finite_difference_velocity(
    q1: &DVector<Float>,
    q2: &DVector<Float>,
    dt: Float,
) -> DVector<Float> {
    (q2 - q1) / dt
}
