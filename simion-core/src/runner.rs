//! Runs an experiment episode by episode.
use crate::{
    config::{param_or_default, SimionZooConfig},
    experiment::Experiment,
    named_var_set::NamedVarSet,
    record::{Record, RecordValue, Recorder},
    sim_god::SimGod,
    world::World,
};
use anyhow::Result;
use chrono::Local;
use log::info;
use rand::{rngs::StdRng, SeedableRng};

/// Columns of the episode records written by [`Runner::run`].
pub const EPISODE_RECORD_COLUMNS: [&str; 6] = [
    "episode",
    "steps",
    "total_reward",
    "avg_reward",
    "is_evaluation",
    "timestamp",
];

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Drives the simulation loop of an experiment.
///
/// # Simulation loop
///
/// 0. Build the [`World`], the [`SimGod`] and the [`Experiment`], then run the
///    deferred load steps with the descriptors of the world.
/// 1. Start an episode and reset the state of the world. Every `Eval-Freq`-th
///    episode is an evaluation episode, in which nothing is learned.
/// 2. [`SimGod::select_action`] writes the action and returns its probability.
/// 3. The world integrates its dynamics over `Delta-T` and computes the reward,
///    which may mark the state as terminal.
/// 4. [`SimGod::update`] learns from the transition and stores it for replay.
/// 5. [`SimGod::post_update`] replays a batch of stored transitions.
/// 6. Advance the step counters. Back to 2 until the state is terminal or the
///    episode reaches `Episode-Length`.
/// 7. Write the episode record and back to 1 until `Num-Episodes` episodes ran.
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     A[SimGod]-->|Action|B[World]
///     B -->|"State, reward"|A
///     B -->|terminal state|C[Experiment]
///     C -->|"experiment step, evaluation flag"|A
///     A -->|ExperienceTuple|D[ExperienceReplay]
///     D -->|batch|A
/// ```
pub struct Runner {
    world: Box<dyn World>,
    sim_god: SimGod,
    experiment: Experiment,
    rng: StdRng,
}

impl Runner {
    /// Builds every component of the experiment and runs the deferred load steps.
    ///
    /// `seed` overrides `Experiment/Random-Seed`.
    pub fn build(config: &SimionZooConfig, seed: Option<u64>) -> Result<Self> {
        let seed = match seed {
            Some(seed) => seed,
            None => param_or_default(config.experiment.random_seed, "Experiment", "Random-Seed", 0),
        };
        let experiment = Experiment::new(&config.experiment)?;
        let world = config.world.build()?;
        let mut sim_god = SimGod::build(&config.sim_god, seed)?;
        sim_god.deferred_load(world.state_descriptor(), world.action_descriptor())?;

        Ok(Self {
            world,
            sim_god,
            experiment,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Runs every episode and writes one record per episode.
    pub fn run(&mut self, recorder: &mut dyn Recorder) -> Result<()> {
        info!(
            "Running {} episode(s) of at most {} steps",
            self.experiment.num_episodes(),
            self.experiment.steps_per_episode()
        );
        for episode in 0..self.experiment.num_episodes() {
            let record = self.run_episode(episode)?;
            recorder.write(record)?;
        }
        recorder.flush()
    }

    /// Runs a single episode and returns its record.
    pub fn run_episode(&mut self, episode: usize) -> Result<Record> {
        self.experiment.start_episode(episode);
        let mut s = NamedVarSet::new(self.world.state_descriptor().clone());
        let mut a = NamedVarSet::new(self.world.action_descriptor().clone());
        self.world.reset(&mut s, &self.experiment, &mut self.rng)?;
        let mut s_p = s.clone();
        let dt = self.experiment.delta_t();

        let mut total_reward = 0.0;
        let mut steps = 0usize;
        while !self.experiment.is_episode_done() {
            let probability = self.sim_god.select_action(&self.experiment, &s, &mut a)?;

            s_p.copy_from(&s);
            self.world.execute_action(&mut s_p, &a, dt)?;
            let r = self.world.reward(&s, &a, &s_p, &mut self.experiment)?;

            self.sim_god
                .update(&self.experiment, &s, &a, &s_p, r, probability)?;
            self.sim_god.post_update(&self.experiment)?;

            total_reward += r;
            steps += 1;
            self.experiment.next_step();
            std::mem::swap(&mut s, &mut s_p);
        }

        let is_evaluation = self.experiment.is_evaluation_episode();
        let avg_reward = total_reward / steps.max(1) as f64;
        info!(
            "Episode {}{}: {} steps, total reward {:.3}, average reward {:.5}",
            episode,
            if is_evaluation { " (evaluation)" } else { "" },
            steps,
            total_reward,
            avg_reward
        );

        Ok(Record::from_slice(&[
            ("episode", RecordValue::Scalar(episode as f64)),
            ("steps", RecordValue::Scalar(steps as f64)),
            ("total_reward", RecordValue::Scalar(total_reward)),
            ("avg_reward", RecordValue::Scalar(avg_reward)),
            ("is_evaluation", RecordValue::Scalar(is_evaluation as u8 as f64)),
            ("timestamp", RecordValue::DateTime(Local::now())),
        ]))
    }

    /// The orchestrator.
    pub fn sim_god(&self) -> &SimGod {
        &self.sim_god
    }

    /// The experiment counters.
    pub fn experiment(&self) -> &Experiment {
        &self.experiment
    }

    /// The world.
    pub fn world(&self) -> &dyn World {
        self.world.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        experiment::ExperimentConfig,
        record::BufferedRecorder,
        sim_god::SimGodConfig,
        simion::{ControllerConfig, SimionConfig},
        world::WorldConfig,
    };

    fn config(simion: SimionConfig) -> SimionZooConfig {
        SimionZooConfig {
            experiment: ExperimentConfig::default()
                .num_episodes(4)
                .eval_freq(2)
                .episode_length(10.0)
                .delta_t(0.02),
            world: WorldConfig::BalancingPole,
            sim_god: SimGodConfig::default().simion(simion),
        }
    }

    #[test]
    fn test_one_record_per_episode() -> Result<()> {
        // Without any force the pole falls before the end of the episode
        let simion = SimionConfig::Controller(ControllerConfig::new("force"));
        let mut runner = Runner::build(&config(simion), Some(7))?;
        let mut recorder = BufferedRecorder::new();
        runner.run(&mut recorder)?;

        assert_eq!(recorder.len(), 4);
        for (i, record) in recorder.iter().enumerate() {
            assert_eq!(record.get_scalar("episode")?, i as f64);
            assert_eq!(record.get_scalar("is_evaluation")?, (i % 2 == 0) as u8 as f64);
            assert_eq!(record.get_scalar("total_reward")?, -1.0);
            assert!(record.get_scalar("steps")? < 500.0);
        }
        assert!(runner.experiment().experiment_step() > 0);
        Ok(())
    }

    #[test]
    fn test_feedback_keeps_the_pole_up() -> Result<()> {
        let controller = ControllerConfig::new("force")
            .gain("theta", 100.0)
            .gain("theta_dot", 20.0)
            .gain("x", 1.0)
            .gain("x_dot", 2.0);
        let mut runner = Runner::build(&config(SimionConfig::Controller(controller)), Some(7))?;
        let record = runner.run_episode(0)?;
        assert_eq!(record.get_scalar("steps")?, 500.0);
        assert_eq!(record.get_scalar("total_reward")?, 0.0);
        Ok(())
    }

    #[test]
    fn test_zero_control_period_is_rejected() {
        let mut config = config(SimionConfig::Controller(ControllerConfig::new("force")));
        config.experiment.delta_t = Some(0.0);
        assert!(Runner::build(&config, None).is_err());
    }
}
