//! Two-phase initialization of components.
//!
//! Some components cannot be completed when they are constructed from the
//! configuration: a feature map needs the descriptors of the world to know its
//! dimensionality, and a function approximator needs that dimensionality to
//! allocate its weights. Such components register themselves in a
//! [`DeferredLoadRegistry`] while being built, and the registry runs their
//! [`DeferredLoad::deferred_load_step`] once, in ascending priority order, after
//! the whole configuration has been constructed.
use crate::{error::SimionError, named_var_set::Descriptor};
use anyhow::Result;
use log::debug;
use std::{cell::RefCell, rc::Rc};

/// Priority of feature maps.
pub const FEATURE_MAP_LOAD_PRIORITY: u32 = 0;

/// Priority of function approximators, which depend on feature maps.
pub const VFA_LOAD_PRIORITY: u32 = 1;

/// A component shared between its owner and the deferred load registry.
pub type Shared<T> = Rc<RefCell<T>>;

/// Information available to deferred load steps.
pub struct DeferredLoadContext<'a> {
    /// Schema of the states of the world.
    pub state_descriptor: &'a Descriptor,

    /// Schema of the actions of the world.
    pub action_descriptor: &'a Descriptor,
}

/// A component with a second initialization phase.
pub trait DeferredLoad {
    /// Completes the initialization of the component.
    fn deferred_load_step(&mut self, ctx: &DeferredLoadContext) -> Result<()>;
}

/// Ordered list of pending deferred load steps.
///
/// The registry is drained by [`DeferredLoadRegistry::deferred_load`], which holds
/// it exclusively, so no step can be registered while the steps are running.
#[derive(Default)]
pub struct DeferredLoadRegistry {
    steps: Vec<(Rc<RefCell<dyn DeferredLoad>>, u32)>,
    done: bool,
}

impl DeferredLoadRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a deferred load step with the given priority.
    ///
    /// Steps with lower priority run first. Steps with the same priority run in
    /// registration order.
    pub fn register(&mut self, loadable: Rc<RefCell<dyn DeferredLoad>>, priority: u32) {
        self.steps.push((loadable, priority));
    }

    /// The number of pending steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if no step is pending.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns `true` once the steps have been executed.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Runs every registered step once, in ascending priority order.
    ///
    /// Returns an error if called a second time.
    pub fn deferred_load(&mut self, ctx: &DeferredLoadContext) -> Result<()> {
        if self.done {
            return Err(SimionError::DeferredLoadAlreadyDone.into());
        }
        self.done = true;

        let mut steps = std::mem::take(&mut self.steps);
        steps.sort_by_key(|(_, priority)| *priority);
        debug!("Running {} deferred load steps", steps.len());
        for (loadable, priority) in steps.into_iter() {
            debug!("Deferred load step with priority {}", priority);
            loadable.borrow_mut().deferred_load_step(ctx)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LoggedStep {
        priority: u32,
        log: Rc<RefCell<Vec<u32>>>,
    }

    impl DeferredLoad for LoggedStep {
        fn deferred_load_step(&mut self, _ctx: &DeferredLoadContext) -> Result<()> {
            self.log.borrow_mut().push(self.priority);
            Ok(())
        }
    }

    fn logged_step(priority: u32, log: &Rc<RefCell<Vec<u32>>>) -> Rc<RefCell<dyn DeferredLoad>> {
        Rc::new(RefCell::new(LoggedStep {
            priority,
            log: log.clone(),
        }))
    }

    #[test]
    fn test_steps_run_in_priority_order() -> Result<()> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = DeferredLoadRegistry::new();
        for priority in [3, 1, 2] {
            registry.register(logged_step(priority, &log), priority);
        }

        let d = Descriptor::new();
        let ctx = DeferredLoadContext {
            state_descriptor: &d,
            action_descriptor: &d,
        };
        registry.deferred_load(&ctx)?;
        assert_eq!(*log.borrow(), vec![1, 2, 3]);
        assert!(registry.is_done());
        assert!(registry.is_empty());
        Ok(())
    }

    #[test]
    fn test_second_drain_fails() -> Result<()> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = DeferredLoadRegistry::new();
        registry.register(logged_step(0, &log), 0);

        let d = Descriptor::new();
        let ctx = DeferredLoadContext {
            state_descriptor: &d,
            action_descriptor: &d,
        };
        registry.deferred_load(&ctx)?;
        assert!(registry.deferred_load(&ctx).is_err());
        assert_eq!(log.borrow().len(), 1);
        Ok(())
    }
}
