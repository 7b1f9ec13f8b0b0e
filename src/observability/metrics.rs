use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Counters shared between the acquisition thread and the sender task
#[derive(Debug, Default)]
pub struct BridgeMetrics {
    sample_sets_acquired: AtomicU64,
    batches_filled: AtomicU64,
    batches_sent: AtomicU64,
    transport_failures: AtomicU64,
    batches_dropped: AtomicU64,
    partial_batches_discarded: AtomicU64,
    device_faults: AtomicU64,
    total_send_latency_us: AtomicU64,
    send_latency_samples: AtomicU64,
}

/// Point-in-time copy of [`BridgeMetrics`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub sample_sets_acquired: u64,
    pub batches_filled: u64,
    pub batches_sent: u64,
    pub transport_failures: u64,
    pub batches_dropped: u64,
    pub partial_batches_discarded: u64,
    pub device_faults: u64,
    pub avg_send_latency_us: u64,
}

impl BridgeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_sample_set(&self) {
        self.sample_sets_acquired.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_batch_filled(&self) {
        self.batches_filled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_batch_sent(&self) {
        self.batches_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_transport_failure(&self) {
        self.transport_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Full batch lost because the sender still held the spare buffer
    pub fn record_batch_dropped(&self) {
        self.batches_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_partial_discarded(&self) {
        self.partial_batches_discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_device_fault(&self) {
        self.device_faults.fetch_add(1, Ordering::Relaxed);
    }

    pub fn start_send(&self) -> Instant {
        Instant::now()
    }

    pub fn finish_send(&self, start: Instant) {
        let latency_us = start.elapsed().as_micros() as u64;
        self.total_send_latency_us.fetch_add(latency_us, Ordering::Relaxed);
        self.send_latency_samples.fetch_add(1, Ordering::Relaxed);
    }

    pub fn batches_sent(&self) -> u64 {
        self.batches_sent.load(Ordering::Relaxed)
    }

    pub fn batches_filled(&self) -> u64 {
        self.batches_filled.load(Ordering::Relaxed)
    }

    pub fn avg_send_latency_us(&self) -> u64 {
        let samples = self.send_latency_samples.load(Ordering::Relaxed);
        if samples == 0 {
            return 0;
        }
        self.total_send_latency_us.load(Ordering::Relaxed) / samples
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            sample_sets_acquired: self.sample_sets_acquired.load(Ordering::Relaxed),
            batches_filled: self.batches_filled.load(Ordering::Relaxed),
            batches_sent: self.batches_sent.load(Ordering::Relaxed),
            transport_failures: self.transport_failures.load(Ordering::Relaxed),
            batches_dropped: self.batches_dropped.load(Ordering::Relaxed),
            partial_batches_discarded: self.partial_batches_discarded.load(Ordering::Relaxed),
            device_faults: self.device_faults.load(Ordering::Relaxed),
            avg_send_latency_us: self.avg_send_latency_us(),
        }
    }
}
