use super::{DataFlow, DataPoint, DataSize};
use crate::Prng;
use ndarray::{ArrayD, IxDyn};
use rand::{Rng, SeedableRng};
use std::iter::FusedIterator;

/// Random data of fixed shapes.
///
/// Each data point has one component per shape, filled with independent uniform samples
/// from `[0, 1)` as `f32`.
/// Every traversal produces exactly `size` data points with fresh random values;
/// traversals are reproducible only through the seed of the random number generator.
#[derive(Debug, Clone, PartialEq)]
pub struct FakeData {
    shapes: Vec<Vec<usize>>,
    size: usize,
    rng: Prng,
}

impl FakeData {
    #[must_use]
    pub const fn new(shapes: Vec<Vec<usize>>, size: usize, rng: Prng) -> Self {
        Self { shapes, size, rng }
    }

    /// Create with a random number generator seeded from `seed`.
    #[must_use]
    pub fn with_seed(shapes: Vec<Vec<usize>>, size: usize, seed: u64) -> Self {
        Self::new(shapes, size, Prng::seed_from_u64(seed))
    }

    /// Shape of each component of a data point.
    #[must_use]
    pub fn shapes(&self) -> &[Vec<usize>] {
        &self.shapes
    }
}

impl DataFlow for FakeData {
    type Item = DataPoint;
    type Iter<'a> = FakeDataIter<'a>;
    const RESTARTABLE: bool = true;

    fn size(&self) -> DataSize {
        DataSize::Finite(self.size)
    }

    fn get_data(&mut self) -> Self::Iter<'_> {
        FakeDataIter {
            shapes: &self.shapes,
            remaining: self.size,
            rng: &mut self.rng,
        }
    }
}

/// Iterator over one traversal of [`FakeData`].
#[derive(Debug)]
pub struct FakeDataIter<'a> {
    shapes: &'a [Vec<usize>],
    remaining: usize,
    rng: &'a mut Prng,
}

impl<'a> Iterator for FakeDataIter<'a> {
    type Item = DataPoint;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let rng = &mut *self.rng;
        Some(
            self.shapes
                .iter()
                .map(|shape| ArrayD::from_shape_simple_fn(IxDyn(shape), || rng.gen::<f32>()))
                .collect(),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a> ExactSizeIterator for FakeDataIter<'a> {}

impl<'a> FusedIterator for FakeDataIter<'a> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_declared_size() {
        let mut data = FakeData::with_seed(vec![vec![2, 2]], 5, 0);
        assert_eq!(data.size(), DataSize::Finite(5));
        assert_eq!(data.finite_size(), Ok(5));

        let points: Vec<_> = data.get_data().collect();
        assert_eq!(points.len(), 5);
        for point in &points {
            assert_eq!(point.len(), 1);
            assert_eq!(point[0].shape(), &[2, 2]);
        }
    }

    #[test]
    fn components_follow_shapes() {
        let mut data = FakeData::with_seed(vec![vec![3], vec![2, 4, 1], vec![]], 2, 1);
        for point in data.get_data() {
            let shapes: Vec<&[usize]> = point.iter().map(ArrayD::shape).collect();
            assert_eq!(shapes, vec![&[3][..], &[2, 4, 1][..], &[][..]]);
        }
    }

    #[test]
    fn values_are_unit_uniform() {
        let mut data = FakeData::with_seed(vec![vec![10, 10]], 20, 2);
        let values: Vec<f32> = data
            .get_data()
            .flat_map(|point| point[0].iter().copied().collect::<Vec<_>>())
            .collect();
        assert!(values.iter().all(|v| (0.0..1.0).contains(v)));
        let mean = values.iter().sum::<f32>() / values.len() as f32;
        assert!((mean - 0.5).abs() < 0.05);
    }

    #[test]
    fn restarts_with_fresh_values() {
        let mut data = FakeData::with_seed(vec![vec![4]], 3, 3);
        assert!(FakeData::RESTARTABLE);
        let first: Vec<_> = data.get_data().collect();
        let second: Vec<_> = data.get_data().collect();
        assert_eq!(first.len(), second.len());
        assert_ne!(first, second);
    }

    #[test]
    fn same_seed_same_data() {
        let mut a = FakeData::with_seed(vec![vec![4]], 3, 4);
        let mut b = FakeData::with_seed(vec![vec![4]], 3, 4);
        assert!(a.get_data().eq(b.get_data()));
    }

    #[test]
    fn iter_is_exact_size() {
        let mut data = FakeData::with_seed(vec![vec![1]], 4, 5);
        let mut iter = data.get_data();
        assert_eq!(iter.len(), 4);
        iter.next();
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.by_ref().count(), 3);
        assert!(iter.next().is_none());
    }

    #[test]
    fn empty_size() {
        let mut data = FakeData::with_seed(vec![vec![2]], 0, 6);
        assert_eq!(data.get_data().count(), 0);
    }
}
