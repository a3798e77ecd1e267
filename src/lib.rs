pub mod error;
pub mod cli;
pub mod configs;
pub mod general_utils;
pub mod state;

pub use error::{ListenerFailure, ToolError};
pub use state::{global_registry, GlobalState, Listener, StateConfig, StateRegistry, Subscription};
