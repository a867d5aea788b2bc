use super::{DataFlow, DataSize};
use crossbeam::channel;
use std::iter::FusedIterator;
use std::sync::mpsc;

/// A queue with a blocking pop operation.
pub trait BlockingQueue {
    type Item;
    type Error;

    /// Remove the next item from the queue, waiting as long as necessary for one to arrive.
    ///
    /// There is no timeout.
    fn pop(&mut self) -> Result<Self::Item, Self::Error>;
}

impl<T> BlockingQueue for channel::Receiver<T> {
    type Item = T;
    type Error = channel::RecvError;

    #[inline]
    fn pop(&mut self) -> Result<Self::Item, Self::Error> {
        self.recv()
    }
}

impl<T> BlockingQueue for mpsc::Receiver<T> {
    type Item = T;
    type Error = mpsc::RecvError;

    #[inline]
    fn pop(&mut self) -> Result<Self::Item, Self::Error> {
        self.recv()
    }
}

/// Data fetched from a queue fed by another producer.
///
/// The data flow is unbounded and yields items in the order the queue delivers them,
/// blocking until each item is available.
/// It is not restartable: a new traversal continues consuming the same queue.
///
/// A queue failure (for example, every sender disconnected) is yielded once as an `Err`
/// and ends that traversal.
#[derive(Debug, Clone)]
pub struct DataFromQueue<Q> {
    queue: Q,
}

impl<Q> DataFromQueue<Q> {
    #[must_use]
    pub const fn new(queue: Q) -> Self {
        Self { queue }
    }

    pub fn into_inner(self) -> Q {
        self.queue
    }
}

impl<Q: BlockingQueue> DataFlow for DataFromQueue<Q> {
    type Item = Result<Q::Item, Q::Error>;
    type Iter<'a> = QueueIter<'a, Q> where Self: 'a;
    const RESTARTABLE: bool = false;

    fn size(&self) -> DataSize {
        DataSize::Unbounded
    }

    fn get_data(&mut self) -> Self::Iter<'_> {
        QueueIter {
            queue: &mut self.queue,
            failed: false,
        }
    }
}

/// Iterator over a traversal of [`DataFromQueue`].
#[derive(Debug)]
pub struct QueueIter<'a, Q> {
    queue: &'a mut Q,
    failed: bool,
}

impl<'a, Q: BlockingQueue> Iterator for QueueIter<'a, Q> {
    type Item = Result<Q::Item, Q::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let result = self.queue.pop();
        self.failed = result.is_err();
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            (usize::MAX, None)
        }
    }
}

impl<'a, Q: BlockingQueue> FusedIterator for QueueIter<'a, Q> {}
