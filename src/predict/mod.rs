//! Running a trained model on data points
//!
//! The model graph and its execution are external: a [`Model`] describes the graph inputs and
//! outputs and opens a [`Session`] that runs it.
//! [`PredictConfig`] selects what to feed and fetch,
//! and [`PredictConfig::build_predictor`] turns it into a [`Predictor`].
mod config;
mod predictor;

pub use config::{ConfigError, PredictConfig, SessionConfig, SessionInit};
pub use predictor::{PredictFlow, PredictResult, Predictor};

use ndarray::ArrayD;
use std::path::Path;
use thiserror::Error;

/// A model graph that can be executed in a session.
pub trait Model {
    type Session: Session;

    /// Names of the graph inputs, indexed by input slot.
    fn input_names(&self) -> &[String];

    /// Whether the graph has an output with the given name.
    fn has_output(&self, name: &str) -> bool;

    /// Build the graph and open a session for running it.
    ///
    /// # Errors
    /// If the graph cannot be built or the session cannot be opened.
    fn build_session(
        &self,
        config: &SessionConfig,
    ) -> Result<Self::Session, <Self::Session as Session>::Error>;
}

/// An open session that executes a model graph.
pub trait Session {
    type Error;

    /// Run the graph, feeding each `(input slot, value)` pair and fetching the named outputs.
    ///
    /// Returns one array per name in `outputs`, in the same order.
    ///
    /// # Errors
    /// Any execution failure.
    fn run(
        &mut self,
        feed: &[(usize, &ArrayD<f32>)],
        outputs: &[String],
    ) -> Result<Vec<ArrayD<f32>>, Self::Error>;

    /// Load variable values from a saved checkpoint.
    ///
    /// # Errors
    /// If the checkpoint cannot be read or does not match the graph.
    fn restore(&mut self, path: &Path) -> Result<(), Self::Error>;
}

/// Error building or running a [`Predictor`].
#[derive(Debug, Error)]
pub enum PredictError<E> {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("input data mapping refers to slot {index} but the model has {num_inputs} inputs")]
    InvalidInputMapping { index: usize, num_inputs: usize },
    #[error("model has no output named {0:?}")]
    UnknownOutput(String),
    #[error("data point has {actual} components but only {max} input slots are mapped")]
    ComponentCount { max: usize, actual: usize },
    #[error(transparent)]
    Session(E),
}

#[cfg(test)]
pub mod testing {
    //! Mock model for predictor tests
    use super::{Model, Session, SessionConfig};
    use ndarray::{ArrayD, IxDyn};
    use std::path::{Path, PathBuf};
    use thiserror::Error;

    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum MockError {
        #[error("no checkpoint at {0:?}")]
        MissingCheckpoint(PathBuf),
        #[error("input slot {0} was not fed")]
        MissingInput(usize),
    }

    /// Model whose outputs are computed from the fed inputs.
    ///
    /// Outputs:
    /// * `"sum"`: elementwise sum of all fed inputs (which must share a shape).
    /// * `"slots"`: 1D array of the fed input slots, in feed order.
    /// * `"first"`: the input in slot 0, failing if it was not fed.
    /// * `"restored"`: 1 if a checkpoint was restored, 0 otherwise.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct MockModel {
        pub inputs: Vec<String>,
        /// Path from which restores succeed
        pub checkpoint: PathBuf,
    }

    impl MockModel {
        pub fn new(inputs: &[&str]) -> Self {
            Self {
                inputs: inputs.iter().map(|&name| name.to_owned()).collect(),
                checkpoint: PathBuf::from("model.ckpt"),
            }
        }
    }

    impl Model for MockModel {
        type Session = MockSession;

        fn input_names(&self) -> &[String] {
            &self.inputs
        }

        fn has_output(&self, name: &str) -> bool {
            matches!(name, "sum" | "slots" | "first" | "restored")
        }

        fn build_session(&self, config: &SessionConfig) -> Result<MockSession, MockError> {
            Ok(MockSession {
                config: config.clone(),
                checkpoint: self.checkpoint.clone(),
                restored: false,
                runs: 0,
            })
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct MockSession {
        pub config: SessionConfig,
        pub checkpoint: PathBuf,
        pub restored: bool,
        pub runs: usize,
    }

    impl Session for MockSession {
        type Error = MockError;

        fn run(
            &mut self,
            feed: &[(usize, &ArrayD<f32>)],
            outputs: &[String],
        ) -> Result<Vec<ArrayD<f32>>, MockError> {
            self.runs += 1;
            outputs
                .iter()
                .map(|name| match name.as_str() {
                    "sum" => Ok(feed
                        .iter()
                        .skip(1)
                        .fold(feed[0].1.clone(), |acc, (_, value)| acc + *value)),
                    "slots" => Ok(ArrayD::from_shape_vec(
                        IxDyn(&[feed.len()]),
                        feed.iter().map(|(slot, _)| *slot as f32).collect(),
                    )
                    .unwrap()),
                    "first" => feed
                        .iter()
                        .find(|(slot, _)| *slot == 0)
                        .map(|(_, value)| (*value).clone())
                        .ok_or(MockError::MissingInput(0)),
                    "restored" => Ok(ArrayD::from_elem(
                        IxDyn(&[]),
                        if self.restored { 1.0 } else { 0.0 },
                    )),
                    other => panic!("unknown output {}", other),
                })
                .collect()
        }

        fn restore(&mut self, path: &Path) -> Result<(), MockError> {
            if path == self.checkpoint {
                self.restored = true;
                Ok(())
            } else {
                Err(MockError::MissingCheckpoint(path.to_owned()))
            }
        }
    }
}
