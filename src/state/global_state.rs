//! Shared, version-tracked state containers with validated writes and
//! ordered change notification.
//!
//! A [`GlobalState<V>`] handle is created once with [`GlobalState::create`]
//! and cloned to every call site that needs it. Clones share one container;
//! separate `create` calls never share anything.
//!
//! # Invariants
//!
//! 1. `version` increases by exactly 1 per accepted mutation and never resets.
//! 2. The value is only replaced through [`GlobalState::set`] or
//!    [`GlobalState::update`].
//! 3. Listeners are notified in subscription order, with `(new, old)`.
//! 4. A failing listener never stops the rest of the pass and never rolls
//!    back the mutation. Failures are reported together once the pass ends.
//! 5. A registration stays until it is explicitly removed. Removal is
//!    idempotent.
//! 6. Passes are delivered one at a time, in version order. A mutation
//!    committed while a pass is running (from a listener, or from another
//!    thread) is queued. Its `set` returns as soon as it is committed, and
//!    the call already delivering runs the queued pass next and reports its
//!    listener failures. The last pass every listener sees is therefore the
//!    current value.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use log::{debug, warn};

use crate::error::{ListenerFailure, Result, ToolError};

/// Callback invoked with `(new, old)` after every accepted mutation.
pub type Listener<V> = Arc<dyn Fn(&V, &V) -> anyhow::Result<()> + Send + Sync>;

type Validator<V> = Arc<dyn Fn(&V) -> bool + Send + Sync>;
type ChangeHook<V> = Arc<dyn Fn(&V, &V) + Send + Sync>;

/// Options recognized by [`GlobalState::create`].
///
/// Missing options fall back to: accept every value, no change hook, no name.
pub struct StateConfig<V> {
    name: Option<String>,
    validate: Option<Validator<V>>,
    on_change: Option<ChangeHook<V>>,
}

impl<V> StateConfig<V> {
    pub fn new() -> Self {
        StateConfig {
            name: None,
            validate: None,
            on_change: None,
        }
    }

    /// Label used in log lines and error reports.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Reject any candidate for which `predicate` returns false.
    ///
    /// `predicate` runs under the container lock and must not call back into
    /// the handle it guards.
    pub fn validate(mut self, predicate: impl Fn(&V) -> bool + Send + Sync + 'static) -> Self {
        self.validate = Some(Arc::new(predicate));
        self
    }

    /// Runs after each accepted mutation, before listeners are notified.
    pub fn on_change(mut self, hook: impl Fn(&V, &V) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Arc::new(hook));
        self
    }
}

impl<V> Default for StateConfig<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for StateConfig<V> {
    fn clone(&self) -> Self {
        StateConfig {
            name: self.name.clone(),
            validate: self.validate.clone(),
            on_change: self.on_change.clone(),
        }
    }
}

impl<V> fmt::Debug for StateConfig<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateConfig")
            .field("name", &self.name)
            .field("validate", &self.validate.is_some())
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

struct Registration<V> {
    id: u64,
    listener: Listener<V>,
}

struct Container<V> {
    value: V,
    version: u64,
    next_id: u64,
    listeners: Vec<Registration<V>>,
    /// Committed mutations waiting for their notification pass.
    pending: VecDeque<Committed<V>>,
    /// A pass is being delivered; new commits queue behind it.
    notifying: bool,
}

struct Shared<V> {
    name: Option<String>,
    validate: Option<Validator<V>>,
    on_change: Option<ChangeHook<V>>,
    container: Mutex<Container<V>>,
}

impl<V> Shared<V> {
    fn lock(&self) -> MutexGuard<'_, Container<V>> {
        // A panic inside a validator or updater must not brick the handle.
        self.container.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }
}

/// Handle to one shared state container.
///
/// Cloning a handle gives another handle to the **same** container.
pub struct GlobalState<V> {
    shared: Arc<Shared<V>>,
}

impl<V> Clone for GlobalState<V> {
    fn clone(&self) -> Self {
        GlobalState {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for GlobalState<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let container = self.shared.lock();
        f.debug_struct("GlobalState")
            .field("name", &self.shared.name)
            .field("value", &container.value)
            .field("version", &container.version)
            .field("listener_count", &container.listeners.len())
            .finish()
    }
}

/// Listeners scheduled by one accepted mutation.
struct Committed<V> {
    new: V,
    old: V,
    version: u64,
    listeners: Vec<Listener<V>>,
}

impl<V: Clone + Send + 'static> GlobalState<V> {
    /// Allocate a fresh container holding `initial`. Never fails.
    pub fn create(initial: V, config: StateConfig<V>) -> Self {
        let StateConfig { name, validate, on_change } = config;
        debug!("creating state {}", name.as_deref().unwrap_or("<anonymous>"));
        GlobalState {
            shared: Arc::new(Shared {
                name,
                validate,
                on_change,
                container: Mutex::new(Container {
                    value: initial,
                    version: 0,
                    next_id: 0,
                    listeners: Vec::new(),
                    pending: VecDeque::new(),
                    notifying: false,
                }),
            }),
        }
    }

    /// Shorthand for [`GlobalState::create`] with the default config.
    pub fn new(initial: V) -> Self {
        Self::create(initial, StateConfig::default())
    }

    pub fn name(&self) -> Option<&str> {
        self.shared.name.as_deref()
    }

    /// Snapshot of the current value.
    pub fn get(&self) -> V {
        self.shared.lock().value.clone()
    }

    /// Read the current value by reference.
    ///
    /// `f` runs under the container lock and must not call back into this handle.
    pub fn with<R>(&self, f: impl FnOnce(&V) -> R) -> R {
        f(&self.shared.lock().value)
    }

    /// Number of accepted mutations so far.
    pub fn version(&self) -> u64 {
        self.shared.lock().version
    }

    pub fn listener_count(&self) -> usize {
        self.shared.lock().listeners.len()
    }

    /// Replace the value.
    ///
    /// Returns `Ok(false)` when the validator rejects `value` (nothing
    /// changes, nobody is notified) and `Ok(true)` once the value is
    /// committed and every listener has run cleanly. Called from inside a
    /// listener, the new pass is queued behind the running one and this
    /// returns right after the commit.
    ///
    /// # Errors
    ///
    /// [`ToolError::ListenerFailures`] when one or more listeners failed. The
    /// mutation is committed regardless and every listener was still called.
    pub fn set(&self, value: V) -> Result<bool> {
        self.commit(move |_| value)
    }

    /// Compute the next value from the current one and apply it like [`set`].
    ///
    /// Reading, computing, validating and committing happen under one lock,
    /// so no other mutation on this container can interleave. `f` must not
    /// call back into this handle.
    ///
    /// [`set`]: GlobalState::set
    pub fn update(&self, f: impl FnOnce(&V) -> V) -> Result<bool> {
        self.commit(f)
    }

    /// Register a closure. Each call adds a distinct registration.
    pub fn subscribe(
        &self,
        listener: impl Fn(&V, &V) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> Subscription<V> {
        self.subscribe_listener(Arc::new(listener))
    }

    /// Register an existing listener. The same `Arc` may be registered more
    /// than once; each registration is notified separately.
    pub fn subscribe_listener(&self, listener: Listener<V>) -> Subscription<V> {
        let mut container = self.shared.lock();
        let id = container.next_id;
        container.next_id += 1;
        container.listeners.push(Registration { id, listener });
        debug!(
            "state {} subscribed listener #{} ({} registered)",
            self.shared.label(),
            id,
            container.listeners.len()
        );
        Subscription {
            id,
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Remove the first registration of `listener`. Returns whether one was
    /// removed; absent listeners are a no-op.
    pub fn unsubscribe(&self, listener: &Listener<V>) -> bool {
        let mut container = self.shared.lock();
        let found = container
            .listeners
            .iter()
            .position(|r| Arc::ptr_eq(&r.listener, listener));
        match found {
            Some(index) => {
                container.listeners.remove(index);
                true
            }
            None => false,
        }
    }

    /// Drop every registration.
    pub fn unsubscribe_all(&self) {
        let mut container = self.shared.lock();
        debug!(
            "state {} dropping {} listener(s)",
            self.shared.label(),
            container.listeners.len()
        );
        container.listeners.clear();
    }

    fn commit(&self, next: impl FnOnce(&V) -> V) -> Result<bool> {
        {
            let mut container = self.shared.lock();
            let candidate = next(&container.value);

            if let Some(validate) = &self.shared.validate {
                if !validate(&candidate) {
                    debug!(
                        "state {} rejected mutation at version {}",
                        self.shared.label(),
                        container.version
                    );
                    return Ok(false);
                }
            }

            let old = std::mem::replace(&mut container.value, candidate.clone());
            container.version += 1;
            let committed = Committed {
                new: candidate,
                old,
                version: container.version,
                listeners: container
                    .listeners
                    .iter()
                    .map(|r| Arc::clone(&r.listener))
                    .collect(),
            };
            let version = committed.version;
            container.pending.push_back(committed);

            if container.notifying {
                debug!(
                    "state {} queued version {} behind the running pass",
                    self.shared.label(),
                    version
                );
                return Ok(true);
            }
            container.notifying = true;
        }

        self.drain()
    }

    /// Deliver queued passes in version order until the queue is empty.
    fn drain(&self) -> Result<bool> {
        let _reset = ResetOnUnwind { shared: &self.shared };
        let mut failures = Vec::new();
        let mut last_version = 0;

        loop {
            let committed = {
                let mut container = self.shared.lock();
                match container.pending.pop_front() {
                    Some(committed) => committed,
                    None => {
                        container.notifying = false;
                        break;
                    }
                }
            };
            last_version = committed.version;
            self.deliver(committed, &mut failures);
        }

        if failures.is_empty() {
            Ok(true)
        } else {
            Err(ToolError::ListenerFailures {
                state: self.shared.name.clone(),
                version: last_version,
                failures,
            })
        }
    }

    fn deliver(&self, committed: Committed<V>, failures: &mut Vec<ListenerFailure>) {
        debug!(
            "state {} notifying {} listener(s) of version {}",
            self.shared.label(),
            committed.listeners.len(),
            committed.version
        );

        if let Some(hook) = &self.shared.on_change {
            hook(&committed.new, &committed.old);
        }

        for (position, listener) in committed.listeners.iter().enumerate() {
            if let Err(err) = listener(&committed.new, &committed.old) {
                warn!(
                    "state {} listener #{} failed at version {}: {:#}",
                    self.shared.label(),
                    position,
                    committed.version,
                    err
                );
                failures.push(ListenerFailure {
                    position,
                    version: committed.version,
                    message: format!("{:#}", err),
                });
            }
        }
    }
}

/// Clears the `notifying` flag if a hook or listener panics mid-pass, so the
/// next mutation starts delivering again.
struct ResetOnUnwind<'a, V> {
    shared: &'a Shared<V>,
}

impl<V> Drop for ResetOnUnwind<'_, V> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.shared.lock().notifying = false;
        }
    }
}

/// Token for one registration, returned by [`GlobalState::subscribe`].
///
/// Dropping it leaves the listener registered; call
/// [`Subscription::unsubscribe`] to remove it.
pub struct Subscription<V> {
    id: u64,
    shared: Weak<Shared<V>>,
}

impl<V> Subscription<V> {
    /// Remove exactly this registration. Returns whether it was still
    /// registered. A no-op once the container is gone.
    pub fn unsubscribe(&self) -> bool {
        let Some(shared) = self.shared.upgrade() else {
            return false;
        };
        let mut container = shared.lock();
        let before = container.listeners.len();
        container.listeners.retain(|r| r.id != self.id);
        before != container.listeners.len()
    }
}

impl<V> fmt::Debug for Subscription<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
