//! Stacked frame history
//!
//! Many environments only reveal part of their state in a single observation
//! (the velocity of a ball is not visible in one frame of an Atari game).
//! A [`HistoryFramePlayer`] turns the per-step frames of a [`Player`](crate::envs::Player)
//! into a state made of the last `hist_len` frames, stacked along the channel axis.
//!
//! Selecting history from arbitrary past time points (rather than the contiguous most recent
//! frames) is not provided. It could be built on a [`FrameWindow`] of capacity
//! `max(offsets) + 1` by selecting from the window at stacking time.
mod player;
mod window;

pub use player::HistoryFramePlayer;
pub use window::FrameWindow;

use ndarray::ShapeError;
use thiserror::Error;

/// Error from a [`FrameWindow`].
#[derive(Debug, Clone, Error)]
pub enum WindowError {
    #[error("history length must be at least 1")]
    InvalidCapacity,
    /// The window holds no frames. Only reachable through misuse of the window lifecycle.
    #[error("cannot stack an empty frame window")]
    EmptyWindow,
    #[error("frames cannot be stacked")]
    Shape(#[from] ShapeError),
}

/// Error from a [`HistoryFramePlayer`].
#[derive(Debug, Error)]
pub enum HistoryError<E> {
    #[error(transparent)]
    Window(#[from] WindowError),
    /// Error raised by the wrapped player, passed through unchanged.
    #[error(transparent)]
    Player(E),
}
