//! Service Layer
//!
//! Orchestrates the store and the channel on behalf of callers.

pub mod context;
pub mod coordinator;
pub mod wait;

pub use context::ConsentContext;
pub use coordinator::ConsentCoordinator;
pub use wait::ConsentWait;
