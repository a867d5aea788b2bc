use super::{PredictError, Session};
use crate::dataflow::{DataFlow, DataPoint};
use ndarray::ArrayD;
use std::iter::FusedIterator;

/// Computes model outputs for data points in an open session.
///
/// Built by [`PredictConfig::build_predictor`](super::PredictConfig::build_predictor).
#[derive(Debug, Clone, PartialEq)]
pub struct Predictor<S> {
    session: S,
    /// Input slot fed by each data point component
    input_slots: Vec<usize>,
    output_names: Vec<String>,
    return_input: bool,
}

/// Model outputs for one data point.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictResult {
    /// The data point, if the predictor is configured to return inputs.
    pub input: Option<DataPoint>,
    /// One array per configured output name.
    pub output: Vec<ArrayD<f32>>,
}

impl<S> Predictor<S> {
    pub(super) const fn new(
        session: S,
        input_slots: Vec<usize>,
        output_names: Vec<String>,
        return_input: bool,
    ) -> Self {
        Self {
            session,
            input_slots,
            output_names,
            return_input,
        }
    }

    /// Input slot fed by each data point component.
    pub fn input_slots(&self) -> &[usize] {
        &self.input_slots
    }

    /// Names of the computed outputs.
    pub fn output_names(&self) -> &[String] {
        &self.output_names
    }

    pub const fn session(&self) -> &S {
        &self.session
    }

    pub fn into_session(self) -> S {
        self.session
    }
}

impl<S: Session> Predictor<S> {
    /// Compute the configured outputs for a single data point.
    ///
    /// Component `i` is fed to input slot `input_slots()[i]`.
    /// A data point may have fewer components than there are mapped slots;
    /// the slots left over are not fed.
    /// This lets a data point without labels run through a model that also takes a label
    /// input, as long as the requested outputs do not depend on it.
    ///
    /// # Errors
    /// * [`PredictError::ComponentCount`] if the data point has more components than there are
    ///     mapped input slots.
    /// * [`PredictError::Session`] if running the session fails.
    pub fn predict(
        &mut self,
        data_point: &[ArrayD<f32>],
    ) -> Result<Vec<ArrayD<f32>>, PredictError<S::Error>> {
        if data_point.len() > self.input_slots.len() {
            return Err(PredictError::ComponentCount {
                max: self.input_slots.len(),
                actual: data_point.len(),
            });
        }
        let feed: Vec<(usize, &ArrayD<f32>)> = self
            .input_slots
            .iter()
            .copied()
            .zip(data_point)
            .collect();
        self.session
            .run(&feed, &self.output_names)
            .map_err(PredictError::Session)
    }

    /// Lazily compute outputs for every data point of one traversal of `data`.
    ///
    /// Each result is computed when the iterator reaches it.
    /// A failed prediction is yielded as an error and the traversal continues.
    pub fn predict_flow<'a, F>(&'a mut self, data: &'a mut F) -> PredictFlow<'a, S, F::Iter<'a>>
    where
        F: DataFlow<Item = DataPoint> + 'a,
    {
        PredictFlow {
            predictor: self,
            data: data.get_data(),
        }
    }
}

/// Iterator of predictions over a data traversal. See [`Predictor::predict_flow`].
#[derive(Debug)]
pub struct PredictFlow<'a, S, I> {
    predictor: &'a mut Predictor<S>,
    data: I,
}

impl<'a, S, I> Iterator for PredictFlow<'a, S, I>
where
    S: Session,
    I: Iterator<Item = DataPoint>,
{
    type Item = Result<PredictResult, PredictError<S::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        let data_point = self.data.next()?;
        Some(self.predictor.predict(&data_point).map(|output| {
            let input = if self.predictor.return_input {
                Some(data_point)
            } else {
                None
            };
            PredictResult { input, output }
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.data.size_hint()
    }
}

impl<'a, S, I> FusedIterator for PredictFlow<'a, S, I>
where
    S: Session,
    I: FusedIterator<Item = DataPoint>,
{
}
