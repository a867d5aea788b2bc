//! Error type
use crate::dataflow::DataFlowError;
use crate::history::WindowError;
use crate::logging::LogError;
use crate::predict::ConfigError;
use thiserror::Error;

/// Error from the histflow crate.
///
/// Errors that carry a collaborator's own error type
/// ([`HistoryError`](crate::history::HistoryError),
/// [`PredictError`](crate::predict::PredictError),
/// [`SimulationError`](crate::simulation::SimulationError))
/// are generic and stay separate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("frame window error")]
    Window(#[from] WindowError),
    #[error("data flow error")]
    DataFlow(#[from] DataFlowError),
    #[error("configuration error")]
    Config(#[from] ConfigError),
    #[error("logging error")]
    Log(#[from] LogError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataflow::{DataFlow, DataFromQueue};
    use crate::history::FrameWindow;
    use crossbeam::channel;
    use std::error::Error as _;

    fn queue_len() -> Result<usize, Error> {
        let (_sender, receiver) = channel::unbounded::<u8>();
        Ok(DataFromQueue::new(receiver).finite_size()?)
    }

    #[test]
    fn converts_with_question_mark() {
        assert!(matches!(
            queue_len(),
            Err(Error::DataFlow(DataFlowError::Unbounded))
        ));
    }

    #[test]
    fn keeps_source() {
        let error: Error = FrameWindow::<f32, ndarray::Ix1>::new(0)
            .unwrap_err()
            .into();
        assert!(error.source().is_some());
    }
}
