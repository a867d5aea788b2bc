//! Statistics logging
//!
//! Values are logged under a name in groups; all values of a group belong to the same moment
//! (a simulation step, the end of an episode, ...).
//! Loggers such as [`DisplayLogger`] aggregate the logged values into summaries over chunks
//! of time and write the summaries out when a chunk ends.
mod chunk;
mod chunk_by_counter;
mod chunk_by_time;
mod display;

#[cfg(test)]
pub use chunk::testing;
pub use chunk::{ChunkLogger, ChunkSummary, Chunker, SummaryWriter};
pub use chunk_by_counter::ByCounter;
pub use chunk_by_time::ByTime;
pub use display::{DisplayBackend, DisplayLogger};

use std::borrow::Cow;
use thiserror::Error;

/// Name of a logged value.
pub type Id = Cow<'static, str>;

/// A value that can be logged.
#[derive(Debug, Clone, PartialEq)]
pub enum LogValue {
    /// Nothing. No data to log.
    Nothing,
    /// Increment a counter.
    CounterIncrement(u64),
    /// A scalar value. Aggregate by taking means.
    Scalar(f64),
    /// A sample from a distribution over `0 .. size`.
    Index { value: usize, size: usize },
}

impl LogValue {
    /// The name of the variant.
    pub const fn variant_name(&self) -> &'static str {
        match self {
            Self::Nothing => "Nothing",
            Self::CounterIncrement(_) => "CounterIncrement",
            Self::Scalar(_) => "Scalar",
            Self::Index { .. } => "Index",
        }
    }
}

impl From<f64> for LogValue {
    #[inline]
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<f32> for LogValue {
    #[inline]
    fn from(value: f32) -> Self {
        Self::Scalar(value.into())
    }
}

/// Error logging a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum LogError {
    #[error("incompatible value type; previously {prev} now {now}")]
    IncompatibleValue {
        prev: &'static str,
        now: &'static str,
    },
    #[error("incompatible index size; previously {prev} now {now}")]
    IncompatibleIndexSize { prev: usize, now: usize },
    #[error("index {value} out of range for size {size}")]
    IndexOutOfRange { value: usize, size: usize },
}

/// Log statistics.
pub trait StatsLogger {
    /// Start a new group of logs that happen at the same moment.
    fn group_start(&mut self);

    /// Log a value within the current group.
    ///
    /// # Errors
    /// If the value is structurally incompatible with values previously logged under `id`.
    /// The value is not logged in this case.
    fn group_log(&mut self, id: Id, value: LogValue) -> Result<(), LogError>;

    /// End the current group.
    fn group_end(&mut self);

    /// Write out any pending summaries.
    fn flush(&mut self);

    /// Log a single value as its own group.
    ///
    /// # Errors
    /// See [`StatsLogger::group_log`].
    fn log(&mut self, id: Id, value: LogValue) -> Result<(), LogError> {
        self.group_start();
        let result = self.group_log(id, value);
        self.group_end();
        result
    }

    /// Log a scalar value as its own group.
    ///
    /// # Errors
    /// See [`StatsLogger::group_log`].
    fn log_scalar(&mut self, name: &'static str, value: f64) -> Result<(), LogError> {
        self.log(name.into(), LogValue::Scalar(value))
    }

    /// Log a counter increment as its own group.
    ///
    /// # Errors
    /// See [`StatsLogger::group_log`].
    fn log_counter_increment(&mut self, name: &'static str, increment: u64) -> Result<(), LogError> {
        self.log(name.into(), LogValue::CounterIncrement(increment))
    }
}

/// Logger that does nothing
impl StatsLogger for () {
    #[inline]
    fn group_start(&mut self) {}
    #[inline]
    fn group_log(&mut self, _: Id, _: LogValue) -> Result<(), LogError> {
        Ok(())
    }
    #[inline]
    fn group_end(&mut self) {}
    #[inline]
    fn flush(&mut self) {}
}

impl<L: StatsLogger + ?Sized> StatsLogger for &'_ mut L {
    #[inline]
    fn group_start(&mut self) {
        L::group_start(self)
    }
    #[inline]
    fn group_log(&mut self, id: Id, value: LogValue) -> Result<(), LogError> {
        L::group_log(self, id, value)
    }
    #[inline]
    fn group_end(&mut self) {
        L::group_end(self)
    }
    #[inline]
    fn flush(&mut self) {
        L::flush(self)
    }
}

impl<L: StatsLogger + ?Sized> StatsLogger for Box<L> {
    #[inline]
    fn group_start(&mut self) {
        L::group_start(self)
    }
    #[inline]
    fn group_log(&mut self, id: Id, value: LogValue) -> Result<(), LogError> {
        L::group_log(self, id, value)
    }
    #[inline]
    fn group_end(&mut self) {
        L::group_end(self)
    }
    #[inline]
    fn flush(&mut self) {
        L::flush(self)
    }
}
