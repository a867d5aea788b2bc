use super::{DataFlow, DataSize};
use crate::Prng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::iter::FusedIterator;
use std::{slice, vec};

/// Data from an in-memory list.
///
/// Without shuffling, every traversal yields the list in its original order.
/// With shuffling, every traversal yields the list in a fresh random order.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFromList<T> {
    list: Vec<T>,
    shuffle: bool,
    rng: Prng,
}

impl<T> DataFromList<T> {
    #[must_use]
    pub const fn new(list: Vec<T>, shuffle: bool, rng: Prng) -> Self {
        Self { list, shuffle, rng }
    }

    /// Create with a random number generator seeded from `seed`.
    #[must_use]
    pub fn with_seed(list: Vec<T>, shuffle: bool, seed: u64) -> Self {
        Self::new(list, shuffle, Prng::seed_from_u64(seed))
    }

    /// Unshuffled data in list order.
    #[must_use]
    pub fn ordered(list: Vec<T>) -> Self {
        Self::with_seed(list, false, 0)
    }

    #[must_use]
    pub const fn is_shuffled(&self) -> bool {
        self.shuffle
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.list
    }

    pub fn into_inner(self) -> Vec<T> {
        self.list
    }
}

impl<T: Clone> DataFlow for DataFromList<T> {
    type Item = T;
    type Iter<'a> = ListIter<'a, T> where Self: 'a;
    const RESTARTABLE: bool = true;

    fn size(&self) -> DataSize {
        DataSize::Finite(self.list.len())
    }

    fn get_data(&mut self) -> Self::Iter<'_> {
        if self.shuffle {
            let mut indices: Vec<usize> = (0..self.list.len()).collect();
            indices.shuffle(&mut self.rng);
            ListIter::Permuted {
                list: &self.list,
                indices: indices.into_iter(),
            }
        } else {
            ListIter::Ordered(self.list.iter())
        }
    }
}

/// Iterator over one traversal of [`DataFromList`].
#[derive(Debug, Clone)]
pub enum ListIter<'a, T> {
    Ordered(slice::Iter<'a, T>),
    Permuted {
        list: &'a [T],
        indices: vec::IntoIter<usize>,
    },
}

impl<'a, T: Clone> Iterator for ListIter<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Ordered(iter) => iter.next().cloned(),
            Self::Permuted { list, indices } => indices.next().map(|i| list[i].clone()),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = match self {
            Self::Ordered(iter) => iter.len(),
            Self::Permuted { list: _, indices } => indices.len(),
        };
        (len, Some(len))
    }
}

impl<'a, T: Clone> ExactSizeIterator for ListIter<'a, T> {}

impl<'a, T: Clone> FusedIterator for ListIter<'a, T> {}
