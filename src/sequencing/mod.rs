pub mod clocks;
pub mod scheduler;

pub use clocks::*;
pub use scheduler::*;
