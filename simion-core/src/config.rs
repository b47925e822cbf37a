//! Configuration of a whole experiment and helpers for optional parameters.
use crate::{experiment::ExperimentConfig, sim_god::SimGodConfig, world::WorldConfig};
use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fmt::Debug,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Returns the given parameter, or `default` with a warning when it is missing.
pub(crate) fn param_or_default<T: Debug>(value: Option<T>, node: &str, name: &str, default: T) -> T {
    match value {
        Some(v) => v,
        None => {
            warn!(
                "Parameter {}/{} not found. Using default value {:?}",
                node, name, default
            );
            default
        }
    }
}

/// Configuration of an experiment: the world, the schedule and the learning agents.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct SimionZooConfig {
    /// Episodes, control period and evaluation schedule.
    #[serde(rename = "Experiment")]
    pub experiment: ExperimentConfig,

    /// The control problem.
    #[serde(rename = "World")]
    pub world: WorldConfig,

    /// Feature maps, replay and the learning agents.
    #[serde(rename = "SimGod")]
    pub sim_god: SimGodConfig,
}

impl SimionZooConfig {
    /// Constructs [`SimionZooConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Couldn't load file: {:?}", path))?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)
            .with_context(|| format!("Invalid experiment configuration: {:?}", path))?;
        Ok(b)
    }

    /// Saves [`SimionZooConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        critic::{CriticConfig, TdLambdaConfig},
        feature_map::FeatureMapConfig,
        replay_buffer::ExperienceReplayConfig,
        simion::{ActorCriticConfig, PolicyConfig, SimionConfig},
    };
    use tempdir::TempDir;

    #[test]
    fn test_serde_experiment_config() -> Result<()> {
        let config = SimionZooConfig {
            experiment: ExperimentConfig::default().num_episodes(10).eval_freq(5),
            world: WorldConfig::BalancingPole,
            sim_god: SimGodConfig::default()
                .gamma(0.95)
                .freeze_target_function(true)
                .state_feature_map(FeatureMapConfig::gaussian_rbf_grid(&["theta"], 5))
                .experience_replay(Some(ExperienceReplayConfig::default().buffer_size(100)))
                .simion(SimionConfig::ActorCritic(ActorCriticConfig {
                    critic: CriticConfig::TdLambda(TdLambdaConfig::default().alpha(0.1)),
                    actor: vec![PolicyConfig::new("force")],
                })),
        };

        let dir = TempDir::new("simion_zoo_config")?;
        let path = dir.path().join("experiment.yaml");
        config.save(&path)?;
        let config_ = SimionZooConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_parse_hyphenated_keys() -> Result<()> {
        let yaml = "
Experiment:
  Num-Episodes: 3
World:
  Type: Balancing-Pole
SimGod:
  Gamma: 0.8
  Freeze-Target-Function: true
  Target-Function-Update-Freq: 50
  State-Feature-Map:
    Type: Gaussian-RBF-Grid
    Variables: [x, theta]
    Num-Features: 4
  Simion:
    - Type: Actor-Critic
      Critic:
        Type: TDC-Lambda
        Alpha: 0.01
      Actor:
        - Output-Action: force
";
        let config: SimionZooConfig = serde_yaml::from_str(yaml)?;
        assert_eq!(config.sim_god.gamma, Some(0.8));
        assert_eq!(config.sim_god.target_function_update_freq, Some(50));
        assert_eq!(config.sim_god.simions.len(), 1);
        assert!(config.sim_god.experience_replay.is_none());
        Ok(())
    }

    #[test]
    fn test_invalid_critic_type_fails() {
        let yaml = "
Type: Actor-Critic
Critic:
  Type: Monte-Carlo
Actor: []
";
        let config: Result<SimionConfig, _> = serde_yaml::from_str(yaml);
        assert!(config.is_err());
    }

    #[test]
    fn test_missing_required_node_fails() {
        let yaml = "
World:
  Type: Balancing-Pole
SimGod: {}
";
        let config: Result<SimionZooConfig, _> = serde_yaml::from_str(yaml);
        assert!(config.is_err());
    }
}
