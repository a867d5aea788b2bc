use super::chunk::{ChunkSummary, Chunker};
use super::{Id, LogValue};

/// Chunk summaries at fixed multiples of a counter (for [`ChunkLogger`][super::ChunkLogger]).
///
/// The flush happens at the end of the group in which the counter reaches a multiple of
/// `interval`, so values logged in the same group as the counter increment are included in the
/// chunk that is flushed.
/// Values logged under `counter` that are not counter increments never trigger a flush.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ByCounter {
    /// Name of the counter
    pub counter: Id,
    /// Chunk length in terms of the counter
    pub interval: u64,
    state: State,
}

impl ByCounter {
    pub fn new<T: Into<Id>>(counter: T, interval: u64) -> Self {
        Self {
            counter: counter.into(),
            interval,
            state: State::NoFlush,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
enum State {
    NoFlush,
    IdMatch,
    Flush,
}

impl Chunker for ByCounter {
    #[inline]
    fn note_log(&mut self, id: &Id, _: &LogValue) {
        if matches!(self.state, State::NoFlush) && &self.counter == id {
            self.state = State::IdMatch;
        }
    }

    #[inline]
    fn note_log_summary(&mut self, summary: &ChunkSummary) {
        if matches!(self.state, State::IdMatch) {
            self.state = match summary {
                ChunkSummary::Counter {
                    increment,
                    initial_value,
                } if self.interval > 0 && (increment + initial_value) % self.interval == 0 => {
                    State::Flush
                }
                _ => State::NoFlush,
            };
        }
    }

    #[inline]
    fn flush_group_end(&mut self) -> bool {
        matches!(self.state, State::Flush)
    }

    #[inline]
    fn note_flush(&mut self) {
        self.state = State::NoFlush;
    }
}
