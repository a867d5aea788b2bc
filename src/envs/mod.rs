//! Interactive environments seen from the player's side
#[cfg(test)]
pub mod testing;

use ndarray::{Array, RemoveAxis};
use num_traits::Zero;

/// An observation frame produced by a [`Player`].
pub type Frame<P> = Array<<P as Player>::Elem, <P as Player>::Dim>;

/// A player stepping through an interactive environment.
///
/// The player owns the environment state and exposes the observation of the current time step
/// as a multi-dimensional array whose shape is fixed for the lifetime of the player.
///
/// # Auto-restart
/// When [`Player::step`] reports the end of an episode, the player must already have started
/// the next episode: the following call to [`Player::current_state`] yields the first frame of
/// the new episode, never the terminal frame of the old one.
pub trait Player {
    /// Action taken on each step.
    type Action;
    /// Element type of the observation frames.
    type Elem: Clone + Zero;
    /// Dimension of the observation frames.
    ///
    /// The last axis is the channel axis.
    type Dim: RemoveAxis;
    /// Error raised by the environment.
    type Error;

    /// Observation of the current time step.
    fn current_state(&self) -> Result<Frame<Self>, Self::Error>;

    /// Take an action.
    ///
    /// # Returns
    /// * `reward`: The reward value for this transition.
    /// * `is_over`: Whether this step ended the episode.
    ///     If true, the player has already moved on to the first state of a new episode.
    fn step(&mut self, action: &Self::Action) -> Result<(f64, bool), Self::Error>;

    /// Abandon the current episode and start a new one.
    fn restart_episode(&mut self) -> Result<(), Self::Error>;
}

impl<P: Player + ?Sized> Player for Box<P> {
    type Action = P::Action;
    type Elem = P::Elem;
    type Dim = P::Dim;
    type Error = P::Error;

    #[inline]
    fn current_state(&self) -> Result<Frame<Self>, Self::Error> {
        P::current_state(self)
    }
    #[inline]
    fn step(&mut self, action: &Self::Action) -> Result<(f64, bool), Self::Error> {
        P::step(self, action)
    }
    #[inline]
    fn restart_episode(&mut self) -> Result<(), Self::Error> {
        P::restart_episode(self)
    }
}

impl<P: Player + ?Sized> Player for &'_ mut P {
    type Action = P::Action;
    type Elem = P::Elem;
    type Dim = P::Dim;
    type Error = P::Error;

    #[inline]
    fn current_state(&self) -> Result<Frame<Self>, Self::Error> {
        P::current_state(self)
    }
    #[inline]
    fn step(&mut self, action: &Self::Action) -> Result<(f64, bool), Self::Error> {
        P::step(self, action)
    }
    #[inline]
    fn restart_episode(&mut self) -> Result<(), Self::Error> {
        P::restart_episode(self)
    }
}
