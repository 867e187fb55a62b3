//! Named groups of connections.

pub mod registry;

pub use registry::{GroupRegistry, user_group};
