//! Orchestrator of the simions.
mod config;
use crate::{
    config::param_or_default,
    context::{BuildContext, StepContext},
    deferred_load::{
        DeferredLoad, DeferredLoadContext, DeferredLoadRegistry, Shared, FEATURE_MAP_LOAD_PRIORITY,
    },
    error::SimionError,
    experiment::Experiment,
    feature_map::{FeatureMap, FeatureMapConfig, FeatureMapKind},
    named_var_set::{Action, Descriptor, State},
    replay_buffer::{ExperienceReplay, ReplayBufferBase},
    simion::Simion,
};
use anyhow::Result;
pub use config::SimGodConfig;
use log::{info, warn};
use std::{cell::RefCell, rc::Rc};

/// Drives action selection, learning updates and experience replay across
/// every simion of an experiment.
///
/// [`SimGod`] owns the global state and action feature maps, the discount
/// factor, the target-function freezing schedule, the importance-weight policy
/// and the replay buffer. Simions receive these through a [`StepContext`] built
/// at each call.
///
/// A simulation step is driven as follows:
///
/// 1. [`SimGod::select_action`] lets every simion write its action variables
///    and returns the product of their probabilities.
/// 2. The world executes the action and computes the reward.
/// 3. [`SimGod::update`] updates every simion with the transition and stores
///    it in the replay buffer.
/// 4. [`SimGod::post_update`] replays a batch of stored transitions.
///
/// Before the first step, [`SimGod::deferred_load`] completes the feature maps
/// and the function approximators registered while building.
pub struct SimGod {
    gamma: f64,
    freeze_target_function: bool,
    target_function_update_freq: usize,
    use_importance_weights: bool,
    state_feature_map: Shared<FeatureMap>,
    action_feature_map: Shared<FeatureMap>,
    experience_replay: ExperienceReplay,
    simions: Vec<Box<dyn Simion>>,
    registry: DeferredLoadRegistry,
    replaying: bool,
}

impl SimGod {
    /// Builds the feature maps, the replay buffer and the simions.
    ///
    /// Random components are seeded from `seed`.
    pub fn build(config: &SimGodConfig, seed: u64) -> Result<Self> {
        let gamma = param_or_default(config.gamma, "SimGod", "Gamma", 0.9);
        if !(0.0..=1.0).contains(&gamma) {
            return Err(SimionError::InvalidConfig(
                "SimGod/Gamma".to_string(),
                format!("{} is not within [0, 1]", gamma),
            )
            .into());
        }
        let freeze_target_function = param_or_default(
            config.freeze_target_function,
            "SimGod",
            "Freeze-Target-Function",
            false,
        );
        let target_function_update_freq = param_or_default(
            config.target_function_update_freq,
            "SimGod",
            "Target-Function-Update-Freq",
            100,
        );
        if freeze_target_function && target_function_update_freq == 0 {
            return Err(SimionError::InvalidConfig(
                "SimGod/Target-Function-Update-Freq".to_string(),
                "must be positive when the target function is frozen".to_string(),
            )
            .into());
        }
        let use_importance_weights = param_or_default(
            config.use_importance_weights,
            "SimGod",
            "Use-Importance-Weights",
            false,
        );

        let state_feature_map = Self::build_feature_map(
            FeatureMapKind::State,
            &config.state_feature_map,
            "State-Feature-Map",
        );
        let action_feature_map = Self::build_feature_map(
            FeatureMapKind::Action,
            &config.action_feature_map,
            "Action-Feature-Map",
        );
        let mut registry = DeferredLoadRegistry::new();
        registry.register(state_feature_map.clone(), FEATURE_MAP_LOAD_PRIORITY);
        registry.register(action_feature_map.clone(), FEATURE_MAP_LOAD_PRIORITY);

        let mut ctx = BuildContext::new(
            state_feature_map.clone(),
            action_feature_map.clone(),
            freeze_target_function,
            &mut registry,
            seed,
        );
        let simions = config
            .simions
            .iter()
            .map(|simion| simion.build(&mut ctx))
            .collect::<Result<Vec<_>>>()?;
        let replay_seed = ctx.next_seed();

        let experience_replay = match &config.experience_replay {
            Some(replay) => ExperienceReplay::build(replay, replay_seed)?,
            None => ExperienceReplay::disabled(),
        };

        info!(
            "SimGod: {} simion(s), gamma {}, target function freezing {}, replay {}",
            simions.len(),
            gamma,
            freeze_target_function,
            experience_replay.using()
        );

        Ok(Self {
            gamma,
            freeze_target_function,
            target_function_update_freq,
            use_importance_weights,
            state_feature_map,
            action_feature_map,
            experience_replay,
            simions,
            registry,
            replaying: false,
        })
    }

    fn build_feature_map(
        kind: FeatureMapKind,
        config: &Option<FeatureMapConfig>,
        name: &str,
    ) -> Shared<FeatureMap> {
        let config = match config {
            Some(config) => config.clone(),
            None => {
                warn!("SimGod/{} not found. Using a single constant feature", name);
                FeatureMapConfig::default()
            }
        };
        Rc::new(RefCell::new(FeatureMap::build(kind, config)))
    }

    /// Appends a simion built outside of the configuration.
    pub fn push_simion(&mut self, simion: Box<dyn Simion>) {
        self.simions.push(simion);
    }

    /// Number of simions.
    pub fn num_simions(&self) -> usize {
        self.simions.len()
    }

    /// Registers a component to be completed by [`SimGod::deferred_load`].
    pub fn register_deferred_load_step(
        &mut self,
        loadable: Rc<RefCell<dyn DeferredLoad>>,
        priority: u32,
    ) {
        self.registry.register(loadable, priority);
    }

    /// Runs every registered deferred load step. Fails if called twice.
    pub fn deferred_load(
        &mut self,
        state_descriptor: &Descriptor,
        action_descriptor: &Descriptor,
    ) -> Result<()> {
        self.registry.deferred_load(&DeferredLoadContext {
            state_descriptor,
            action_descriptor,
        })
    }

    /// Lets every simion write its action variables, in configuration order.
    ///
    /// Returns the joint probability of the selected action.
    pub fn select_action(
        &mut self,
        experiment: &Experiment,
        s: &State,
        a: &mut Action,
    ) -> Result<f64> {
        let ctx = self.step_context(experiment);
        let mut probability = 1.0;
        for simion in self.simions.iter_mut() {
            probability *= simion.select_action(s, a, &ctx)?;
        }
        Ok(probability)
    }

    /// Updates every simion with a transition and stores it for replay.
    ///
    /// Does nothing in evaluation episodes.
    pub fn update(
        &mut self,
        experiment: &Experiment,
        s: &State,
        a: &Action,
        s_p: &State,
        r: f64,
        probability: f64,
    ) -> Result<()> {
        if experiment.is_evaluation_episode() {
            return Ok(());
        }
        self.replaying = false;

        let ctx = self.step_context(experiment);
        for simion in self.simions.iter_mut() {
            simion.update(s, a, s_p, r, probability, &ctx)?;
        }

        if self.experience_replay.using() {
            self.experience_replay.add_tuple(s, a, s_p, r, probability);
        }
        Ok(())
    }

    /// Replays a batch of stored transitions once the buffer holds enough of them.
    ///
    /// Tuples are drawn uniformly with replacement.
    pub fn post_update(&mut self, experiment: &Experiment) -> Result<()> {
        if !self.experience_replay.using() || !self.experience_replay.have_enough_tuples() {
            return Ok(());
        }

        self.replaying = true;
        let result = self.replay(experiment);
        self.replaying = false;
        result
    }

    fn replay(&mut self, experiment: &Experiment) -> Result<()> {
        let ctx = self.step_context(experiment);
        let batch = self
            .experience_replay
            .batch(self.experience_replay.update_batch_size())?;
        for tuple in batch.iter() {
            for simion in self.simions.iter_mut() {
                simion.update(&tuple.s, &tuple.a, &tuple.s_p, tuple.r, tuple.probability, &ctx)?;
            }
        }
        Ok(())
    }

    fn step_context(&self, experiment: &Experiment) -> StepContext {
        StepContext {
            gamma: self.gamma,
            use_importance_weights: self.use_importance_weights,
            update_frozen_weights_now: self.update_frozen_weights_now(experiment),
            is_evaluation: experiment.is_evaluation_episode(),
            replaying: self.replaying,
            is_first_step: !self.replaying && experiment.episode_step() == 0,
        }
    }

    /// Synchronization period of the frozen target function, 0 when freezing is disabled.
    pub fn target_function_update_freq(&self) -> usize {
        match self.freeze_target_function {
            true => self.target_function_update_freq,
            false => 0,
        }
    }

    /// Whether critics must copy their weights into the frozen target function now.
    ///
    /// True only with freezing enabled, outside experience replay, at experiment
    /// steps that are a multiple of the update frequency.
    pub fn update_frozen_weights_now(&self, experiment: &Experiment) -> bool {
        let freq = self.target_function_update_freq();
        freq > 0 && !self.replaying && experiment.experiment_step() % freq == 0
    }

    /// Discount factor.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Whether critics weight samples with `pi(a|s) / probability`.
    pub fn use_sample_importance_weights(&self) -> bool {
        self.use_importance_weights
    }

    /// Number of tuples replayed at each step, 0 when replay is disabled.
    pub fn experience_replay_update_size(&self) -> usize {
        match self.experience_replay.using() {
            true => self.experience_replay.update_batch_size(),
            false => 0,
        }
    }

    /// The replay buffer.
    pub fn experience_replay(&self) -> &ExperienceReplay {
        &self.experience_replay
    }

    /// Whether the current update comes from experience replay.
    pub fn is_replaying(&self) -> bool {
        self.replaying
    }

    /// Global state feature map.
    pub fn state_feature_map(&self) -> &Shared<FeatureMap> {
        &self.state_feature_map
    }

    /// Global action feature map.
    pub fn action_feature_map(&self) -> &Shared<FeatureMap> {
        &self.action_feature_map
    }
}
