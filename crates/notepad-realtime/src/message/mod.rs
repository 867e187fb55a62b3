//! JSON frames exchanged over the hub socket.

pub mod types;

pub use types::{InboundMessage, OutboundMessage};
