use super::WindowError;
use ndarray::{Array, ArrayView, Axis, Dimension, ErrorKind, RemoveAxis, ShapeError};
use num_traits::Zero;
use std::collections::{vec_deque, VecDeque};

/// A bounded window over the most recent frames.
///
/// Holds at most `capacity` frames in chronological order.
/// Pushing onto a full window drops the oldest frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameWindow<A, D: Dimension> {
    capacity: usize,
    /// Frames ordered from oldest to newest.
    ///
    /// Never grows beyond `capacity`.
    frames: VecDeque<Array<A, D>>,
}

impl<A, D: Dimension> FrameWindow<A, D> {
    /// Create an empty window holding up to `capacity` frames.
    ///
    /// # Errors
    /// [`WindowError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, WindowError> {
        if capacity == 0 {
            return Err(WindowError::InvalidCapacity);
        }
        Ok(Self {
            capacity,
            frames: VecDeque::new(),
        })
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.frames.len() == self.capacity
    }

    /// Add a frame as the newest entry, dropping the oldest frame if the window is full.
    pub fn push(&mut self, frame: Array<A, D>) {
        if self.frames.len() == self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
    }

    /// Remove all frames.
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Iterate over the stored frames from oldest to newest.
    pub fn iter(&self) -> vec_deque::Iter<'_, Array<A, D>> {
        self.frames.iter()
    }
}

impl<A, D> FrameWindow<A, D>
where
    A: Clone + Zero,
    D: RemoveAxis,
{
    /// Stack the window into a single array along the trailing (channel) axis.
    ///
    /// The result always contains `capacity` frames, oldest first.
    /// If the window is not full, the missing history is filled with all-zero frames
    /// placed before the real frames.
    /// A window of `[h, w, c]` frames stacks into an `[h, w, capacity * c]` array.
    ///
    /// # Errors
    /// * [`WindowError::EmptyWindow`] if the window holds no frames.
    /// * [`WindowError::Shape`] if the frames have no axes or do not share a shape.
    pub fn stack(&self) -> Result<Array<A, D>, WindowError> {
        let oldest = self.frames.front().ok_or(WindowError::EmptyWindow)?;
        let channel_axis = oldest
            .ndim()
            .checked_sub(1)
            .map(Axis)
            .ok_or_else(|| ShapeError::from_kind(ErrorKind::IncompatibleShape))?;

        let deficit = self.capacity - self.frames.len();
        let padding = (deficit > 0).then(|| Array::zeros(oldest.raw_dim()));

        let views: Vec<ArrayView<A, D>> = padding
            .iter()
            .flat_map(|zeros| std::iter::repeat(zeros.view()).take(deficit))
            .chain(self.frames.iter().map(|frame| frame.view()))
            .collect();
        Ok(ndarray::concatenate(channel_axis, &views)?)
    }
}

impl<'a, A, D: Dimension> IntoIterator for &'a FrameWindow<A, D> {
    type Item = &'a Array<A, D>;
    type IntoIter = vec_deque::Iter<'a, Array<A, D>>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

#[allow(clippy::needless_pass_by_value)]
#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{s, Array3, Ix3};
    use rstest::{fixture, rstest};

    fn frame(value: f32) -> Array3<f32> {
        Array::from_elem((2, 2, 1), value)
    }

    #[fixture]
    fn window() -> FrameWindow<f32, Ix3> {
        FrameWindow::new(4).unwrap()
    }

    #[test]
    fn huge_capacity_allocates_lazily() {
        let mut window = FrameWindow::new(usize::MAX).unwrap();
        window.push(frame(1.0));
        assert_eq!(window.capacity(), usize::MAX);
        assert_eq!(window.len(), 1);
        assert!(!window.is_full());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(matches!(
            FrameWindow::<f32, Ix3>::new(0),
            Err(WindowError::InvalidCapacity)
        ));
    }

    #[rstest]
    fn stack_empty_fails(window: FrameWindow<f32, Ix3>) {
        assert!(matches!(window.stack(), Err(WindowError::EmptyWindow)));
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    fn stack_pads_with_leading_zeros(mut window: FrameWindow<f32, Ix3>, #[case] n: usize) {
        for i in 0..n {
            window.push(frame((i + 1) as f32));
        }
        let stacked = window.stack().unwrap();
        assert_eq!(stacked.shape(), &[2, 2, 4]);

        let deficit = 4 - n;
        assert!(stacked.slice(s![.., .., ..deficit]).iter().all(|&x| x == 0.0));
        for i in 0..n {
            let channel = stacked.slice(s![.., .., deficit + i..deficit + i + 1]);
            assert_eq!(channel, frame((i + 1) as f32));
        }
    }

    #[rstest]
    #[case(4)]
    #[case(5)]
    #[case(11)]
    fn stack_keeps_last_frames_when_full(mut window: FrameWindow<f32, Ix3>, #[case] n: usize) {
        for i in 0..n {
            window.push(frame((i + 1) as f32));
        }
        assert!(window.is_full());
        assert_eq!(window.len(), 4);

        let stacked = window.stack().unwrap();
        assert_eq!(stacked.shape(), &[2, 2, 4]);
        for (c, value) in ((n - 3)..=n).enumerate() {
            assert_eq!(stacked.slice(s![.., .., c..c + 1]), frame(value as f32));
        }
    }

    #[rstest]
    fn push_evicts_oldest(mut window: FrameWindow<f32, Ix3>) {
        for i in 0..6 {
            window.push(frame(i as f32));
        }
        let firsts: Vec<f32> = window.iter().map(|f| f[[0, 0, 0]]).collect();
        assert_eq!(firsts, vec![2.0, 3.0, 4.0, 5.0]);
    }

    #[rstest]
    fn clear_empties(mut window: FrameWindow<f32, Ix3>) {
        window.push(frame(1.0));
        window.push(frame(2.0));
        window.clear();
        assert!(window.is_empty());
        assert!(matches!(window.stack(), Err(WindowError::EmptyWindow)));
    }

    #[test]
    fn stack_multi_channel_frames() {
        let mut window = FrameWindow::new(2).unwrap();
        let a = Array::from_shape_vec((1, 1, 3), vec![1, 2, 3]).unwrap();
        let b = Array::from_shape_vec((1, 1, 3), vec![4, 5, 6]).unwrap();
        window.push(a);
        window.push(b);
        let stacked = window.stack().unwrap();
        assert_eq!(
            stacked,
            Array::from_shape_vec((1, 1, 6), vec![1, 2, 3, 4, 5, 6]).unwrap()
        );
    }

    #[test]
    fn capacity_one_is_latest_frame() {
        let mut window = FrameWindow::new(1).unwrap();
        window.push(frame(1.0));
        window.push(frame(2.0));
        assert_eq!(window.stack().unwrap(), frame(2.0));
    }

    #[test]
    fn mismatched_frames_fail() {
        let mut window = FrameWindow::new(2).unwrap();
        window.push(Array::<f32, _>::zeros((2, 2, 1)));
        window.push(Array::<f32, _>::zeros((3, 2, 1)));
        assert!(matches!(window.stack(), Err(WindowError::Shape(_))));
    }
}
