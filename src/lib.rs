//! Frame history aggregation and lazy data sources for reinforcement learning pipelines.
//!
//! * [`history`] turns a stream of observation frames from a [`Player`] into a stacked state of
//!     the most recent frames.
//! * [`dataflow`] provides finite or unbounded sources of data points.
//! * [`predict`] runs a model on data points from a [`DataFlow`].
#![warn(clippy::cast_lossless)]
#![warn(clippy::cast_possible_truncation)]
#![warn(clippy::doc_markdown)]
#![warn(clippy::explicit_iter_loop)]
#![warn(clippy::missing_const_for_fn)] // has some false positives
#![warn(clippy::needless_borrow)]
#![warn(clippy::needless_pass_by_value)]
#![warn(clippy::redundant_closure_for_method_calls)]
#![warn(clippy::use_self)] // also triggered by macro expansions
pub mod dataflow;
pub mod envs;
mod error;
pub mod history;
pub mod logging;
pub mod predict;
pub mod simulation;
pub mod utils;

pub use dataflow::{DataFlow, DataPoint, DataSize};
pub use envs::Player;
pub use error::Error;
pub use history::{FrameWindow, HistoryFramePlayer};
pub use predict::{PredictConfig, Predictor};
pub use simulation::run_player;

/// Pseudo-random number generator type used by data sources
pub type Prng = rand_chacha::ChaCha8Rng;
