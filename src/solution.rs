use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use na::DVector;
use serde::{Deserialize, Serialize};

use crate::{
    error::SomersaultError, producer::SomersaultParameters, trajectory::Trajectory, types::Float,
};

/// Outcome of a trajectory production run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    Converged,
    Failed,
}

/// Breakdown of the scalar cost by contribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedCost {
    pub control_effort: Float,
    pub arm_deviation: Float,
}

/// The full per-run artifact: everything the producer knows about a solved
/// trajectory, persisted so post-processing can be repeated later without
/// re-solving.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    pub scheme: String,
    pub states_q: Vec<Vec<Float>>,
    pub states_v: Vec<Vec<Float>>,
    pub controls: Vec<Vec<Float>>,
    pub parameters: SomersaultParameters,
    pub iterations: usize,
    pub cost: Float,
    pub detailed_cost: DetailedCost,
    pub real_time_to_solve: Float, // seconds
    pub status: SolveStatus,
    pub time: Vec<Float>,
}

impl Solution {
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SomersaultError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SomersaultError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// The narrow coordinates-plus-time view the invariant pipeline consumes.
    pub fn trajectory(&self) -> Result<Trajectory, SomersaultError> {
        Trajectory::new(
            self.states_q
                .iter()
                .map(|frame| DVector::from_vec(frame.clone()))
                .collect(),
            self.time.clone(),
        )
    }
}
