//! Drive a player with a policy
use crate::envs::{Frame, Player};
use crate::logging::{LogError, LogValue, StatsLogger};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Summary of a completed episode.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Number of steps in the episode
    pub length: u64,
    /// Total (undiscounted) reward of the episode
    pub reward: f64,
}

/// Error from running a simulation.
#[derive(Debug, Error)]
pub enum SimulationError<E> {
    #[error(transparent)]
    Player(E),
    #[error(transparent)]
    Log(#[from] LogError),
}

/// Run a player for `num_steps` steps, choosing each action with `policy`.
///
/// The policy is given the player's current state.
/// Logs `step_reward` and a `steps` counter on every step, and `episode_reward`,
/// `episode_length` and an `episodes` counter at the end of every episode.
///
/// # Returns
/// Summaries of the episodes completed within `num_steps`.
/// An unfinished final episode is not included.
///
/// # Errors
/// Stops at the first error raised by the player or the logger.
pub fn run_player<P, F, L>(
    player: &mut P,
    mut policy: F,
    num_steps: u64,
    logger: &mut L,
) -> Result<Vec<EpisodeSummary>, SimulationError<P::Error>>
where
    P: Player + ?Sized,
    F: FnMut(&Frame<P>) -> P::Action,
    L: StatsLogger + ?Sized,
{
    let mut episodes = Vec::new();
    let mut current = EpisodeSummary {
        length: 0,
        reward: 0.0,
    };

    for _ in 0..num_steps {
        let state = player.current_state().map_err(SimulationError::Player)?;
        let action = policy(&state);
        let (reward, is_over) = player.step(&action).map_err(SimulationError::Player)?;
        current.length += 1;
        current.reward += reward;

        logger.group_start();
        let logged = logger
            .group_log("step_reward".into(), LogValue::Scalar(reward))
            .and_then(|()| logger.group_log("steps".into(), LogValue::CounterIncrement(1)));
        logger.group_end();
        logged?;

        if is_over {
            log_episode(logger, &current)?;
            episodes.push(current);
            current = EpisodeSummary {
                length: 0,
                reward: 0.0,
            };
        }
    }
    Ok(episodes)
}

#[allow(clippy::cast_precision_loss)]
fn log_episode<L: StatsLogger + ?Sized>(
    logger: &mut L,
    episode: &EpisodeSummary,
) -> Result<(), LogError> {
    logger.group_start();
    let logged = logger
        .group_log("episode_reward".into(), LogValue::Scalar(episode.reward))
        .and_then(|()| {
            logger.group_log(
                "episode_length".into(),
                LogValue::Scalar(episode.length as f64),
            )
        })
        // Last so that a counter-based chunker includes the values above
        .and_then(|()| logger.group_log("episodes".into(), LogValue::CounterIncrement(1)));
    logger.group_end();
    logged
}
