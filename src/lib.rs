//! Real-time bridge from an 8-channel, 24-bit front-end to a network collector.
//!
//! Sample sets are read through [`hal::DeviceAdapter`], collected into
//! double-buffered [`buffers::BatchBuffer`]s, converted and back-dated by
//! [`engine::PacketAssembler`], and delivered through a
//! [`transport::TransportSender`].

pub mod buffers;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod hal;
pub mod observability;
pub mod transport;

pub use config::BridgeConfig;
pub use error::{BridgeError, Result};
