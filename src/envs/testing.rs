//! Player testing utilities
use super::{Frame, Player};
use ndarray::{Array, Ix3};
use std::convert::Infallible;
use thiserror::Error;

/// Deterministic player whose frames count the steps taken in the current episode.
///
/// Every frame has shape `[height, width, 1]` and is filled with `t + 1` where `t` is the number
/// of steps taken so far in the episode, so no real frame is ever all-zero.
/// Episodes end after `episode_len` steps and the player restarts automatically.
/// Each step has reward 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountingPlayer {
    pub height: usize,
    pub width: usize,
    pub episode_len: u64,
    /// Steps taken in the current episode
    pub t: u64,
    /// Total number of steps over all episodes
    pub total_steps: u64,
    /// Total number of restarts (automatic or requested)
    pub restarts: u64,
}

impl CountingPlayer {
    pub const fn new(height: usize, width: usize, episode_len: u64) -> Self {
        Self {
            height,
            width,
            episode_len,
            t: 0,
            total_steps: 0,
            restarts: 0,
        }
    }

    /// The frame observed after `t` steps of an episode.
    pub fn frame_at(&self, t: u64) -> Array<f32, Ix3> {
        Array::from_elem((self.height, self.width, 1), (t + 1) as f32)
    }
}

impl Default for CountingPlayer {
    fn default() -> Self {
        Self::new(2, 2, 5)
    }
}

impl Player for CountingPlayer {
    type Action = ();
    type Elem = f32;
    type Dim = Ix3;
    type Error = Infallible;

    fn current_state(&self) -> Result<Frame<Self>, Self::Error> {
        Ok(self.frame_at(self.t))
    }

    fn step(&mut self, _action: &()) -> Result<(f64, bool), Self::Error> {
        self.t += 1;
        self.total_steps += 1;
        let is_over = self.t >= self.episode_len;
        if is_over {
            self.t = 0;
            self.restarts += 1;
        }
        Ok((1.0, is_over))
    }

    fn restart_episode(&mut self) -> Result<(), Self::Error> {
        self.t = 0;
        self.restarts += 1;
        Ok(())
    }
}

/// Failure raised by [`BrokenPlayer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("emulator crashed after {0} steps")]
pub struct EmulatorCrash(pub u64);

/// Player that fails on every step after the first `steps_until_crash`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenPlayer {
    pub steps_until_crash: u64,
    pub steps: u64,
}

impl BrokenPlayer {
    pub const fn new(steps_until_crash: u64) -> Self {
        Self {
            steps_until_crash,
            steps: 0,
        }
    }
}

impl Player for BrokenPlayer {
    type Action = ();
    type Elem = f32;
    type Dim = Ix3;
    type Error = EmulatorCrash;

    fn current_state(&self) -> Result<Frame<Self>, Self::Error> {
        Ok(Array::from_elem((1, 1, 1), 1.0))
    }

    fn step(&mut self, _action: &()) -> Result<(f64, bool), Self::Error> {
        if self.steps >= self.steps_until_crash {
            return Err(EmulatorCrash(self.steps));
        }
        self.steps += 1;
        Ok((0.0, false))
    }

    fn restart_episode(&mut self) -> Result<(), Self::Error> {
        Err(EmulatorCrash(self.steps))
    }
}

/// Counting player whose frames cannot be observed while `blind` is set.
///
/// Stepping and restarting always succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlindPlayer {
    pub inner: CountingPlayer,
    pub blind: bool,
}

impl BlindPlayer {
    pub const fn new(episode_len: u64) -> Self {
        Self {
            inner: CountingPlayer::new(1, 1, episode_len),
            blind: false,
        }
    }
}

impl Player for BlindPlayer {
    type Action = ();
    type Elem = f32;
    type Dim = Ix3;
    type Error = EmulatorCrash;

    fn current_state(&self) -> Result<Frame<Self>, Self::Error> {
        if self.blind {
            return Err(EmulatorCrash(self.inner.total_steps));
        }
        Ok(self.inner.frame_at(self.inner.t))
    }

    fn step(&mut self, action: &()) -> Result<(f64, bool), Self::Error> {
        match self.inner.step(action) {
            Ok(result) => Ok(result),
            Err(never) => match never {},
        }
    }

    fn restart_episode(&mut self) -> Result<(), Self::Error> {
        match self.inner.restart_episode() {
            Ok(()) => Ok(()),
            Err(never) => match never {},
        }
    }
}
