/// Scalar type used throughout the crate. Conservation drifts are orders of
/// magnitude below f32 resolution, so everything is f64.
pub type Float = f64;
