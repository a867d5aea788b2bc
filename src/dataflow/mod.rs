//! Lazy data sources
//!
//! A [`DataFlow`] produces a sequence of data points on demand.
//! Each call to [`DataFlow::get_data`] starts a traversal; whether a new traversal replays the
//! data from the start depends on the source (see [`DataFlow::RESTARTABLE`]).
//!
//! | Source | Size | Restartable | Order |
//! |---|---|---|---|
//! | [`FakeData`] | finite | yes | fresh random values on each traversal |
//! | [`DataFromList`] | finite | yes | list order, or a fresh permutation per traversal |
//! | [`DataFromQueue`] | unbounded | no | queue delivery order |
mod fake;
mod list;
mod queue;

pub use fake::{FakeData, FakeDataIter};
pub use list::{DataFromList, ListIter};
pub use queue::{BlockingQueue, DataFromQueue, QueueIter};

use ndarray::ArrayD;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A data point: an ordered list of components.
pub type DataPoint = Vec<ArrayD<f32>>;

/// Number of data points produced by one traversal of a [`DataFlow`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataSize {
    Finite(usize),
    Unbounded,
}

impl DataSize {
    /// The finite size, if any.
    #[must_use]
    pub const fn finite(self) -> Option<usize> {
        match self {
            Self::Finite(n) => Some(n),
            Self::Unbounded => None,
        }
    }

    #[must_use]
    pub const fn is_finite(self) -> bool {
        matches!(self, Self::Finite(_))
    }
}

impl fmt::Display for DataSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Finite(n) => write!(f, "{}", n),
            Self::Unbounded => f.write_str("unbounded"),
        }
    }
}

/// Error from a [`DataFlow`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Error)]
pub enum DataFlowError {
    #[error("data flow is unbounded and has no finite size")]
    Unbounded,
}

/// A source of data points.
///
/// Data points are produced lazily: each is computed or fetched when the consumer asks the
/// iterator for the next element, never ahead of time.
pub trait DataFlow {
    /// Data point type
    type Item;

    /// Iterator over one traversal of the data.
    type Iter<'a>: Iterator<Item = Self::Item>
    where
        Self: 'a;

    /// Whether each call to [`DataFlow::get_data`] starts a complete new traversal.
    ///
    /// If false, a new traversal resumes where the previous one left off.
    const RESTARTABLE: bool;

    /// Number of data points in each traversal.
    fn size(&self) -> DataSize;

    /// Start a traversal of the data.
    fn get_data(&mut self) -> Self::Iter<'_>;

    /// Number of data points in each traversal for consumers that require a finite size.
    ///
    /// # Errors
    /// [`DataFlowError::Unbounded`] if the data flow is unbounded.
    fn finite_size(&self) -> Result<usize, DataFlowError> {
        self.size().finite().ok_or(DataFlowError::Unbounded)
    }
}
