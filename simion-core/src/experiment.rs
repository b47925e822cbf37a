//! Episode schedule and step counters of an experiment.
use crate::{config::param_or_default, error::SimionError};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Configuration of [`Experiment`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct ExperimentConfig {
    /// Number of episodes, evaluation episodes included.
    #[serde(rename = "Num-Episodes")]
    pub num_episodes: usize,

    /// Every `eval_freq`-th episode is an evaluation episode. 0 disables evaluation.
    #[serde(rename = "Eval-Freq", default)]
    pub eval_freq: Option<usize>,

    /// Maximum length of an episode in seconds.
    #[serde(rename = "Episode-Length", default)]
    pub episode_length: Option<f64>,

    /// Control period in seconds.
    #[serde(rename = "Delta-T", default)]
    pub delta_t: Option<f64>,

    /// Seed of the random number generators.
    #[serde(rename = "Random-Seed", default)]
    pub random_seed: Option<u64>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            num_episodes: 1,
            eval_freq: None,
            episode_length: None,
            delta_t: None,
            random_seed: None,
        }
    }
}

impl ExperimentConfig {
    /// Sets the number of episodes.
    pub fn num_episodes(mut self, v: usize) -> Self {
        self.num_episodes = v;
        self
    }

    /// Sets the evaluation frequency.
    pub fn eval_freq(mut self, v: usize) -> Self {
        self.eval_freq = Some(v);
        self
    }

    /// Sets the length of an episode in seconds.
    pub fn episode_length(mut self, v: f64) -> Self {
        self.episode_length = Some(v);
        self
    }

    /// Sets the control period.
    pub fn delta_t(mut self, v: f64) -> Self {
        self.delta_t = Some(v);
        self
    }

    /// Sets the random seed.
    pub fn random_seed(mut self, v: u64) -> Self {
        self.random_seed = Some(v);
        self
    }
}

/// Counters and flags of a running experiment.
///
/// The experiment step counts every simulation step since the start of the
/// experiment, evaluation episodes included.
#[derive(Debug, Clone)]
pub struct Experiment {
    num_episodes: usize,
    eval_freq: usize,
    delta_t: f64,
    steps_per_episode: usize,
    episode: usize,
    episode_step: usize,
    experiment_step: usize,
    evaluation: bool,
    terminal: bool,
}

impl Experiment {
    /// Creates the experiment, positioned at the first step of episode 0.
    ///
    /// Fails unless `Episode-Length` and `Delta-T` are positive.
    pub fn new(config: &ExperimentConfig) -> Result<Self> {
        let eval_freq = param_or_default(config.eval_freq, "Experiment", "Eval-Freq", 0);
        let episode_length =
            param_or_default(config.episode_length, "Experiment", "Episode-Length", 10.0);
        let delta_t = param_or_default(config.delta_t, "Experiment", "Delta-T", 0.01);
        for (name, v) in [("Episode-Length", episode_length), ("Delta-T", delta_t)] {
            if !(v > 0.0 && v.is_finite()) {
                return Err(SimionError::InvalidConfig(
                    format!("Experiment/{}", name),
                    format!("{} is not a positive duration", v),
                )
                .into());
            }
        }
        let steps_per_episode = ((episode_length / delta_t).round() as usize).max(1);

        let mut experiment = Self {
            num_episodes: config.num_episodes,
            eval_freq,
            delta_t,
            steps_per_episode,
            episode: 0,
            episode_step: 0,
            experiment_step: 0,
            evaluation: false,
            terminal: false,
        };
        experiment.start_episode(0);
        Ok(experiment)
    }

    /// Resets the per-episode counters and flags.
    pub fn start_episode(&mut self, episode: usize) {
        self.episode = episode;
        self.episode_step = 0;
        self.terminal = false;
        self.evaluation = self.eval_freq > 0 && episode % self.eval_freq == 0;
    }

    /// Advances the step counters.
    pub fn next_step(&mut self) {
        self.episode_step += 1;
        self.experiment_step += 1;
    }

    /// Whether the episode ended, by a terminal state or by its length.
    pub fn is_episode_done(&self) -> bool {
        self.terminal || self.episode_step >= self.steps_per_episode
    }

    /// Marks the current state as terminal.
    pub fn set_terminal_state(&mut self) {
        self.terminal = true;
    }

    /// Whether the current state is terminal.
    pub fn is_terminal_state(&self) -> bool {
        self.terminal
    }

    /// Whether the current episode only evaluates the learned policy.
    pub fn is_evaluation_episode(&self) -> bool {
        self.evaluation
    }

    /// Index of the current episode.
    pub fn episode(&self) -> usize {
        self.episode
    }

    /// Step within the current episode.
    pub fn episode_step(&self) -> usize {
        self.episode_step
    }

    /// Step since the start of the experiment.
    pub fn experiment_step(&self) -> usize {
        self.experiment_step
    }

    /// Number of episodes to run.
    pub fn num_episodes(&self) -> usize {
        self.num_episodes
    }

    /// Maximum number of steps of an episode.
    pub fn steps_per_episode(&self) -> usize {
        self.steps_per_episode
    }

    /// Control period.
    pub fn delta_t(&self) -> f64 {
        self.delta_t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_schedule() -> Result<()> {
        let mut experiment =
            Experiment::new(&ExperimentConfig::default().num_episodes(10).eval_freq(3))?;
        let evaluation = (0..10)
            .map(|i| {
                experiment.start_episode(i);
                experiment.is_evaluation_episode()
            })
            .collect::<Vec<_>>();
        assert_eq!(
            evaluation,
            [true, false, false, true, false, false, true, false, false, true]
        );

        let mut experiment = Experiment::new(&ExperimentConfig::default())?;
        experiment.start_episode(0);
        assert!(!experiment.is_evaluation_episode());
        Ok(())
    }

    #[test]
    fn test_counters() -> Result<()> {
        let config = ExperimentConfig::default()
            .episode_length(0.5)
            .delta_t(0.1);
        let mut experiment = Experiment::new(&config)?;
        assert_eq!(experiment.steps_per_episode(), 5);

        for _ in 0..5 {
            assert!(!experiment.is_episode_done());
            experiment.next_step();
        }
        assert!(experiment.is_episode_done());

        experiment.start_episode(1);
        experiment.next_step();
        experiment.set_terminal_state();
        assert!(experiment.is_episode_done());
        assert_eq!(experiment.episode_step(), 1);
        assert_eq!(experiment.experiment_step(), 6);

        experiment.start_episode(2);
        assert!(!experiment.is_terminal_state());
        Ok(())
    }

    #[test]
    fn test_durations_must_be_positive() {
        for delta_t in [0.0, -0.01, f64::NAN] {
            assert!(Experiment::new(&ExperimentConfig::default().delta_t(delta_t)).is_err());
        }
        for length in [0.0, -1.0, f64::INFINITY] {
            assert!(Experiment::new(&ExperimentConfig::default().episode_length(length)).is_err());
        }
    }
}
