//! Ring buffer of experience tuples.
use super::{ExperienceBufferBase, ExperienceReplayConfig, ReplayBufferBase};
use crate::{
    config::param_or_default,
    error::SimionError,
    named_var_set::{Action, State},
};
use anyhow::Result;
use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// A transition sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceTuple {
    /// State before the action.
    pub s: State,

    /// Action taken.
    pub a: Action,

    /// State reached.
    pub s_p: State,

    /// Reward received.
    pub r: f64,

    /// Joint probability with which the action was selected.
    pub probability: f64,
}

/// Fixed-capacity ring buffer of [`ExperienceTuple`]s with uniform sampling.
pub struct ExperienceReplay {
    capacity: usize,
    update_batch_size: usize,
    min_tuples: usize,
    i: usize,
    num_tuples_seen: usize,
    buffer: Vec<ExperienceTuple>,
    rng: StdRng,
}

impl ExperienceReplay {
    /// A buffer that is not used.
    pub fn disabled() -> Self {
        Self {
            capacity: 0,
            update_batch_size: 0,
            min_tuples: 0,
            i: 0,
            num_tuples_seen: 0,
            buffer: Vec::new(),
            rng: StdRng::seed_from_u64(0),
        }
    }

    /// Whether experience replay is enabled.
    pub fn using(&self) -> bool {
        self.capacity > 0
    }

    /// Whether enough tuples have been stored for replay to start.
    pub fn have_enough_tuples(&self) -> bool {
        self.using() && self.buffer.len() >= self.min_tuples
    }

    /// Number of tuples replayed at each step.
    pub fn update_batch_size(&self) -> usize {
        self.update_batch_size
    }

    /// Maximum number of tuples kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of tuples added since the buffer was built, including overwritten ones.
    pub fn num_tuples_seen(&self) -> usize {
        self.num_tuples_seen
    }

    /// Stores a copy of a transition, overwriting the oldest one when full.
    pub fn add_tuple(&mut self, s: &State, a: &Action, s_p: &State, r: f64, probability: f64) {
        let tuple = ExperienceTuple {
            s: s.clone(),
            a: a.clone(),
            s_p: s_p.clone(),
            r,
            probability,
        };
        self.push_tuple(tuple);
    }

    fn push_tuple(&mut self, tuple: ExperienceTuple) {
        if !self.using() {
            return;
        }
        if self.buffer.len() < self.capacity {
            self.buffer.push(tuple);
        } else {
            self.buffer[self.i] = tuple;
        }
        self.i = (self.i + 1) % self.capacity;
        self.num_tuples_seen += 1;
    }

    /// Draws a stored tuple uniformly at random.
    pub fn random_tuple(&mut self) -> Result<&ExperienceTuple> {
        if self.buffer.is_empty() {
            return Err(SimionError::EmptyReplayBuffer.into());
        }
        let ix = self.rng.gen_range(0..self.buffer.len());
        Ok(&self.buffer[ix])
    }

    /// Iterates over the stored tuples from the oldest to the most recent.
    pub fn iter(&self) -> impl Iterator<Item = &ExperienceTuple> {
        let (newer, older) = match self.buffer.len() < self.capacity {
            true => self.buffer.split_at(self.buffer.len()),
            false => self.buffer.split_at(self.i),
        };
        older.iter().chain(newer.iter())
    }
}

impl ExperienceBufferBase for ExperienceReplay {
    type Item = ExperienceTuple;

    fn push(&mut self, tr: Self::Item) -> Result<()> {
        self.push_tuple(tr);
        Ok(())
    }

    fn len(&self) -> usize {
        self.buffer.len()
    }
}

impl ReplayBufferBase for ExperienceReplay {
    type Config = ExperienceReplayConfig;
    type Batch = Vec<ExperienceTuple>;

    fn build(config: &Self::Config, seed: u64) -> Result<Self> {
        let capacity = param_or_default(config.buffer_size, "Experience-Replay", "Buffer-Size", 1000);
        let update_batch_size = param_or_default(
            config.update_batch_size,
            "Experience-Replay",
            "Update-Batch-Size",
            10,
        );
        let min_tuples = config.min_tuples.unwrap_or(update_batch_size);

        if capacity > 0 && (min_tuples == 0 || min_tuples > capacity) {
            return Err(SimionError::InvalidConfig(
                "Experience-Replay/Min-Tuples".to_string(),
                format!("{} is not within [1, Buffer-Size={}]", min_tuples, capacity),
            )
            .into());
        }
        if capacity > 0 {
            info!(
                "Experience replay: buffer size {}, batch size {}, min tuples {}",
                capacity, update_batch_size, min_tuples
            );
        }

        Ok(Self {
            capacity,
            update_batch_size,
            min_tuples,
            i: 0,
            num_tuples_seen: 0,
            buffer: Vec::with_capacity(capacity),
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Draws `size` tuples uniformly with replacement.
    ///
    /// `size` may exceed the number of stored tuples.
    fn batch(&mut self, size: usize) -> Result<Self::Batch> {
        (0..size)
            .map(|_| self.random_tuple().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::named_var_set::{Descriptor, NamedVarSet};
    use std::rc::Rc;

    fn var_set() -> NamedVarSet {
        let mut d = Descriptor::new();
        d.add_var("x", "m", 0.0, 1.0).unwrap();
        NamedVarSet::new(Rc::new(d))
    }

    fn build(buffer_size: usize, batch: usize, min_tuples: usize) -> Result<ExperienceReplay> {
        let config = ExperienceReplayConfig::default()
            .buffer_size(buffer_size)
            .update_batch_size(batch)
            .min_tuples(min_tuples);
        ExperienceReplay::build(&config, 42)
    }

    #[test]
    fn test_ring_keeps_most_recent_tuples() -> Result<()> {
        let capacity = 10;
        let mut buffer = build(capacity, 4, 4)?;
        let s = var_set();
        for i in 0..25 {
            buffer.add_tuple(&s, &s, &s, i as f64, 1.0);

            let n = (i + 1).min(capacity);
            assert_eq!(buffer.len(), n);
            let rewards = buffer.iter().map(|t| t.r).collect::<Vec<_>>();
            let expected = ((i + 1 - n)..=i).map(|r| r as f64).collect::<Vec<_>>();
            assert_eq!(rewards, expected);
        }
        assert_eq!(buffer.num_tuples_seen(), 25);
        Ok(())
    }

    #[test]
    fn test_push_counts_tuples() -> Result<()> {
        let mut buffer = build(2, 1, 1)?;
        let s = var_set();
        for r in [1.0, 2.0, 3.0] {
            buffer.push(ExperienceTuple {
                s: s.clone(),
                a: s.clone(),
                s_p: s.clone(),
                r,
                probability: 1.0,
            })?;
        }
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.num_tuples_seen(), 3);
        assert_eq!(buffer.iter().map(|t| t.r).collect::<Vec<_>>(), [2.0, 3.0]);
        Ok(())
    }

    #[test]
    fn test_readiness_gate() -> Result<()> {
        let mut buffer = build(100, 8, 5)?;
        let s = var_set();
        for i in 0..20 {
            assert_eq!(buffer.have_enough_tuples(), i >= 5);
            buffer.add_tuple(&s, &s, &s, 0.0, 1.0);
        }
        assert!(buffer.have_enough_tuples());
        Ok(())
    }

    #[test]
    fn test_empty_buffer_cannot_be_sampled() -> Result<()> {
        let mut buffer = build(10, 2, 2)?;
        assert!(buffer.random_tuple().is_err());
        assert!(buffer.batch(1).is_err());
        Ok(())
    }

    #[test]
    fn test_batch_larger_than_buffer_draws_with_replacement() -> Result<()> {
        let mut buffer = build(10, 2, 2)?;
        let s = var_set();
        for i in 0..3 {
            buffer.add_tuple(&s, &s, &s, i as f64, 0.5);
        }
        let batch = buffer.batch(20)?;
        assert_eq!(batch.len(), 20);
        assert!(batch.iter().all(|t| t.r >= 0.0 && t.r < 3.0 && t.probability == 0.5));
        Ok(())
    }

    #[test]
    fn test_invalid_min_tuples() {
        assert!(build(10, 2, 11).is_err());
        assert!(build(10, 2, 0).is_err());
    }

    #[test]
    fn test_zero_buffer_size_disables_replay() -> Result<()> {
        let mut buffer = build(0, 2, 5)?;
        let s = var_set();
        buffer.add_tuple(&s, &s, &s, 0.0, 1.0);
        assert!(!buffer.using());
        assert!(!buffer.have_enough_tuples());
        assert!(buffer.is_empty());
        assert!(!ExperienceReplay::disabled().using());
        Ok(())
    }
}
