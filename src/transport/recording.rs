use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::traits::{SendOutcome, TransportSender};
use crate::core::Packet;
use crate::error::{BridgeError, Result};

/// In-memory sender that keeps every delivered packet
#[derive(Clone, Default)]
pub struct RecordingSender {
    packets: Arc<Mutex<Vec<Packet>>>,
    failures_left: Arc<AtomicU32>,
    delay: Option<Duration>,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `count` sends with a transport error
    pub fn failing(self, count: u32) -> Self {
        self.failures_left.store(count, Ordering::SeqCst);
        self
    }

    /// Hold every send for `delay` before completing
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn packets(&self) -> Vec<Packet> {
        self.packets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn sent_count(&self) -> usize {
        self.packets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

#[async_trait]
impl TransportSender for RecordingSender {
    async fn send(&self, packet: &Packet) -> Result<SendOutcome> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let fail = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if fail {
            return Err(BridgeError::Transport("injected failure".into()));
        }

        self.packets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(packet.clone());

        Ok(SendOutcome {
            status: 200,
            bytes: 0,
        })
    }
}
