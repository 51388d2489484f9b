//! Core application primitives (screening runtime, scheduler)

pub mod runtime;
pub mod scheduler;

pub use runtime::*;
pub use scheduler::*;
