mod adapter;
mod engine;
mod format;
mod reconcile;
mod snapshot;

pub mod provider;

pub use adapter::*;
pub use engine::*;
pub use format::*;
pub use snapshot::*;
