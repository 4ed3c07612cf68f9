use thiserror::Error;

/// Errors surfaced by the trajectory post-processing pipeline.
///
/// Frame bookkeeping mistakes inside the multibody core are programmer errors
/// and panic instead; these variants cover conditions a caller can actually
/// run into.
#[derive(Debug, Error)]
pub enum SomersaultError {
    #[error("quadrature rule `{0}` is not implemented")]
    UnsupportedRule(String),

    #[error("trajectory has {actual} samples, {required} required")]
    InsufficientSamples { required: usize, actual: usize },

    #[error("trajectory has {frames} coordinate frames but {samples} time samples")]
    FrameCountMismatch { frames: usize, samples: usize },

    #[error("time samples are not strictly increasing at index {index}")]
    NonMonotonicTime { index: usize },

    #[error("frame {frame} has {actual} coordinates, expected {expected}")]
    DofMismatch {
        frame: usize,
        expected: usize,
        actual: usize,
    },

    #[error("forward dynamics solve failed: {0}")]
    SolveFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
