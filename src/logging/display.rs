//! Command-line logger
use super::chunk::{ChunkLogger, ChunkSummary, Chunker, SummaryWriter};
use super::{ByTime, Id, LogError, LogValue, StatsLogger};
use crate::utils::fmt::{DisplayFn, Frequency, PrettyPrint};
use std::fmt;
use std::time::Duration;
use yansi::Paint;

/// Logger that displays summaries to standard output.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayLogger<C: Chunker = ByTime>(ChunkLogger<C, DisplayBackend>);

impl<C: Chunker> DisplayLogger<C> {
    #[inline]
    pub fn new(chunker: C) -> Self {
        Self(ChunkLogger::new(chunker, DisplayBackend))
    }
}

impl Default for DisplayLogger {
    fn default() -> Self {
        Self::new(ByTime::default())
    }
}

impl<C: Chunker> StatsLogger for DisplayLogger<C> {
    #[inline]
    fn group_start(&mut self) {
        self.0.group_start()
    }
    #[inline]
    fn group_log(&mut self, id: Id, value: LogValue) -> Result<(), LogError> {
        self.0.group_log(id, value)
    }
    #[inline]
    fn group_end(&mut self) {
        self.0.group_end()
    }
    #[inline]
    fn flush(&mut self) {
        self.0.flush()
    }
}

/// Logging backend that displays summaries to standard output.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DisplayBackend;

impl SummaryWriter for DisplayBackend {
    fn write_summaries<'a, I>(&mut self, summaries: I, elapsed: Duration)
    where
        I: Iterator<Item = (&'a Id, &'a ChunkSummary)>,
    {
        let elapsed = &elapsed;
        println!();
        for (id, summary) in summaries {
            println!(
                "{:<24} {}",
                Paint::fixed(35, id),
                DisplaySummary { summary, elapsed }
            );
        }
    }
}

#[derive(Debug)]
struct DisplaySummary<'a> {
    summary: &'a ChunkSummary,
    elapsed: &'a Duration,
}

impl<'a> fmt::Display for DisplaySummary<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.summary {
            ChunkSummary::Nothing => Ok(()),
            ChunkSummary::Counter {
                increment,
                initial_value,
            } => {
                write!(
                    f,
                    "{}  (+{})",
                    initial_value + increment,
                    Paint::fixed(253, increment)
                )?;
                if *increment > 5 {
                    // Rate is unreliable with few increments in the chunk
                    let rate = Frequency(*increment as f64 / self.elapsed.as_secs_f64());
                    write!(f, "  {:.2}", Paint::fixed(111, rate))?;
                }
                Ok(())
            }
            ChunkSummary::Scalar { stats } => {
                if let Some(mean) = stats.mean() {
                    write!(f, "{:.3}", PrettyPrint(mean))?;
                }
                if stats.count() > 1 {
                    if let Some(stddev) = stats.stddev() {
                        write!(
                            f,
                            " {}",
                            Paint::fixed(
                                8,
                                DisplayFn(|f| write!(f, "(σ {:.3})", PrettyPrint(stddev)))
                            )
                        )?;
                    }
                }
                Ok(())
            }
            ChunkSummary::Index { counts } => {
                let n: usize = counts.iter().sum();
                write!(f, "(n {})  [", n)?;
                for (i, c) in counts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", c * 100 / n.max(1))?;
                }
                f.write_str("]%")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::stats::OnlineMeanVariance;

    fn display(summary: &ChunkSummary) -> String {
        Paint::disable();
        DisplaySummary {
            summary,
            elapsed: &Duration::from_secs(2),
        }
        .to_string()
    }

    #[test]
    fn display_counter() {
        let summary = ChunkSummary::Counter {
            increment: 10,
            initial_value: 5,
        };
        assert_eq!(display(&summary), "15  (+10)  5.00Hz");
    }

    #[test]
    fn display_scalar() {
        let stats: OnlineMeanVariance<f64> = [1.0, 3.0].into_iter().collect();
        let summary = ChunkSummary::Scalar { stats };
        assert_eq!(display(&summary), "2.000 (σ 1.000)");
    }

    #[test]
    fn display_index() {
        let summary = ChunkSummary::Index {
            counts: vec![1, 3, 0, 0],
        };
        assert_eq!(display(&summary), "(n 4)  [25 75 0 0]%");
    }

    #[test]
    fn logger_accepts_values() {
        let mut logger = DisplayLogger::default();
        logger.log_scalar("reward", 1.0).unwrap();
        logger.log_counter_increment("steps", 1).unwrap();
        logger.flush();
    }
}
