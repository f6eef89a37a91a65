//! Scheduler runner -- owns the time heap and the single consumer thread.
//!
//! Split into focused submodules:
//! - `core`: Scheduler struct, shared state, constructors and accessors
//! - `submit`: task submission and input pause/resume
//! - `lifecycle`: start/stop of the consumer thread
//! - `execution`: the consumer loop and the task failure boundary
//! - `completion`: blocking until all submitted work has run

mod completion;
mod core;
mod execution;
mod lifecycle;
mod submit;

pub use self::core::Scheduler;
