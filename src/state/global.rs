use std::any::{type_name, Any};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::debug;
use once_cell::sync::Lazy;

use super::global_state::{GlobalState, StateConfig};
use crate::error::{Result, ToolError};

/// Named containers shared across call sites.
///
/// Each name maps to exactly one [`GlobalState`]. The value type is fixed by
/// whoever registers the name first.
#[derive(Default)]
pub struct StateRegistry {
    entries: Mutex<HashMap<String, Box<dyn Any + Send + Sync>>>,
}

impl StateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Box<dyn Any + Send + Sync>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Handle registered under `name`, creating it from `init` and `config`
    /// if the name is new. `config` is renamed to `name`.
    pub fn get_or_create<V: Clone + Send + 'static>(
        &self,
        name: &str,
        init: impl FnOnce() -> V,
        config: StateConfig<V>,
    ) -> Result<GlobalState<V>> {
        let mut entries = self.entries();
        if let Some(existing) = entries.get(name) {
            return downcast(name, existing.as_ref());
        }

        debug!("registering shared state '{}'", name);
        let state = GlobalState::create(init(), config.named(name));
        entries.insert(name.to_string(), Box::new(state.clone()));
        Ok(state)
    }

    /// Handle registered under `name`, if any.
    pub fn get<V: Clone + Send + 'static>(&self, name: &str) -> Result<Option<GlobalState<V>>> {
        self.entries()
            .get(name)
            .map(|existing| downcast(name, existing.as_ref()))
            .transpose()
    }

    /// Forget `name`. Handles already given out keep working.
    pub fn remove(&self, name: &str) -> bool {
        self.entries().remove(name).is_some()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

fn downcast<V: Clone + Send + 'static>(
    name: &str,
    entry: &(dyn Any + Send + Sync),
) -> Result<GlobalState<V>> {
    entry
        .downcast_ref::<GlobalState<V>>()
        .cloned()
        .ok_or_else(|| ToolError::StateTypeMismatch {
            name: name.to_string(),
            expected: type_name::<V>(),
        })
}

// Process-wide registry so any module can reach the same named state
pub static GLOBAL_REGISTRY: Lazy<StateRegistry> = Lazy::new(StateRegistry::new);

pub fn global_registry() -> &'static StateRegistry {
    &GLOBAL_REGISTRY
}
