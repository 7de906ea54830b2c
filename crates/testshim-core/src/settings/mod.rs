//! Adapter settings read from a persisted key-value store

pub mod defaults;
mod store;
mod types;

pub use defaults::*;
pub use store::*;
pub use types::*;
