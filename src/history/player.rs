use super::{FrameWindow, HistoryError};
use crate::envs::{Frame, Player};

/// Player wrapper whose state is the stack of the most recent `hist_len` frames.
///
/// The stacked state always has `hist_len` times the channel depth of a single frame.
/// At the start of an episode the frames from before the episode began are all-zero.
///
/// Assumes that the inner player restarts automatically at the end of an episode
/// (see [`Player`]): on `is_over` the window is cleared and seeded with the first frame of the
/// new episode so that no frames carry over from one episode to the next.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryFramePlayer<P: Player> {
    player: P,
    window: FrameWindow<P::Elem, P::Dim>,
}

impl<P: Player> HistoryFramePlayer<P> {
    /// Wrap a player, keeping a history of `hist_len` frames including the current one.
    ///
    /// # Errors
    /// * [`WindowError::InvalidCapacity`](super::WindowError::InvalidCapacity)
    ///     if `hist_len` is zero.
    /// * [`HistoryError::Player`] if the current frame cannot be observed.
    pub fn new(player: P, hist_len: usize) -> Result<Self, HistoryError<P::Error>> {
        let mut window = FrameWindow::new(hist_len)?;
        window.push(player.current_state().map_err(HistoryError::Player)?);
        Ok(Self { player, window })
    }

    /// Number of frames in the stacked state.
    #[must_use]
    pub const fn hist_len(&self) -> usize {
        self.window.capacity()
    }

    /// The frames of the current episode, at most `hist_len` of them.
    #[must_use]
    pub const fn window(&self) -> &FrameWindow<P::Elem, P::Dim> {
        &self.window
    }

    #[must_use]
    pub const fn inner(&self) -> &P {
        &self.player
    }

    /// Mutable access to the wrapped player.
    ///
    /// Restarting the inner player directly leaves stale frames in the window;
    /// use [`Player::restart_episode`] on the wrapper instead.
    pub fn inner_mut(&mut self) -> &mut P {
        &mut self.player
    }

    pub fn into_inner(self) -> P {
        self.player
    }

    /// Clear the history and seed it with the inner player's current frame.
    ///
    /// The history stays empty if the frame cannot be observed.
    fn reseed(&mut self) -> Result<(), HistoryError<P::Error>> {
        self.window.clear();
        let frame = self.player.current_state().map_err(HistoryError::Player)?;
        self.window.push(frame);
        Ok(())
    }
}

impl<P: Player> Player for HistoryFramePlayer<P> {
    type Action = P::Action;
    type Elem = P::Elem;
    type Dim = P::Dim;
    type Error = HistoryError<P::Error>;

    fn current_state(&self) -> Result<Frame<Self>, Self::Error> {
        Ok(self.window.stack()?)
    }

    fn step(&mut self, action: &Self::Action) -> Result<(f64, bool), Self::Error> {
        let (reward, is_over) = self.player.step(action).map_err(HistoryError::Player)?;
        if is_over {
            // The inner player has already moved on to the next episode
            self.reseed()?;
        } else {
            let frame = self.player.current_state().map_err(HistoryError::Player)?;
            self.window.push(frame);
        }
        Ok((reward, is_over))
    }

    fn restart_episode(&mut self) -> Result<(), Self::Error> {
        self.player
            .restart_episode()
            .map_err(HistoryError::Player)?;
        self.reseed()
    }
}
