pub mod global;
pub mod global_state;

pub use global::{global_registry, StateRegistry};
pub use global_state::{GlobalState, Listener, StateConfig, Subscription};
