//! Domain Layer
//!
//! Pure logic of the coordinator. No I/O, no channel access.

pub mod await_set;
pub mod options;

pub use await_set::AwaitSet;
pub use options::DecisionOptions;
