use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use na::DVector;
use serde::{Deserialize, Serialize};

use crate::{error::SomersaultError, types::Float};

/// A time-sampled sequence of generalized coordinates, the narrow artifact
/// the post-processing pipeline works on. One coordinate vector per time
/// sample, strictly increasing time.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub q: Vec<DVector<Float>>,
    pub time: Vec<Float>,
}

/// On-disk form of a trajectory: one row of joint coordinates per frame.
#[derive(Serialize, Deserialize)]
struct TrajectoryDocument {
    q: Vec<Vec<Float>>,
    time: Vec<Float>,
}

impl Trajectory {
    pub fn new(q: Vec<DVector<Float>>, time: Vec<Float>) -> Result<Self, SomersaultError> {
        if q.len() != time.len() {
            return Err(SomersaultError::FrameCountMismatch {
                frames: q.len(),
                samples: time.len(),
            });
        }
        for (i, pair) in time.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(SomersaultError::NonMonotonicTime { index: i + 1 });
            }
        }
        if let Some(first) = q.first() {
            for (i, frame) in q.iter().enumerate() {
                if frame.len() != first.len() {
                    return Err(SomersaultError::DofMismatch {
                        frame: i,
                        expected: first.len(),
                        actual: frame.len(),
                    });
                }
            }
        }
        Ok(Trajectory { q, time })
    }

    pub fn n_frames(&self) -> usize {
        self.time.len()
    }

    /// Number of half-open intervals between consecutive samples.
    pub fn n_intervals(&self) -> usize {
        self.n_frames().saturating_sub(1)
    }

    /// Fail unless the trajectory carries at least `required` intervals.
    pub fn require_intervals(&self, required: usize) -> Result<(), SomersaultError> {
        if self.n_intervals() < required {
            return Err(SomersaultError::InsufficientSamples {
                required: required + 1,
                actual: self.n_frames(),
            });
        }
        Ok(())
    }

    /// Fail unless every frame carries `expected` coordinates. Frames are all
    /// the same length by construction, so checking the first is enough.
    pub fn require_dof(&self, expected: usize) -> Result<(), SomersaultError> {
        if let Some(first) = self.q.first() {
            if first.len() != expected {
                return Err(SomersaultError::DofMismatch {
                    frame: 0,
                    expected,
                    actual: first.len(),
                });
            }
        }
        Ok(())
    }

    /// Persist the trajectory as JSON. This is a serialization boundary, not a
    /// cache: downstream post-processing re-loads from disk so it can be rerun
    /// later without re-solving.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SomersaultError> {
        let document = TrajectoryDocument {
            q: self.q.iter().map(|qi| qi.iter().cloned().collect()).collect(),
            time: self.time.clone(),
        };
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), &document)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SomersaultError> {
        let file = File::open(path)?;
        let document: TrajectoryDocument = serde_json::from_reader(BufReader::new(file))?;
        Trajectory::new(
            document.q.into_iter().map(DVector::from_vec).collect(),
            document.time,
        )
    }
}
