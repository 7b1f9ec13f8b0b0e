use async_trait::async_trait;

use crate::core::Packet;
use crate::error::Result;

/// Accepted delivery of one packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendOutcome {
    pub status: u16,
    pub bytes: usize,
}

/// Delivers assembled packets to the collector.
///
/// One call per full batch. Delivery is at-most-once: the caller never
/// retries, so an `Err` means the batch is gone.
#[async_trait]
pub trait TransportSender: Send + Sync {
    async fn send(&self, packet: &Packet) -> Result<SendOutcome>;
}
