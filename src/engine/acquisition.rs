use log::{debug, error, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use super::state::LoopExit;
use crate::buffers::{BufferState, FillSide, HandOff};
use crate::core::RawSample;
use crate::error::Result;
use crate::hal::{AcquisitionDevice, DeviceAdapter};
use crate::observability::BridgeMetrics;

/// Blocking sample loop: read a set, store it, hand off full batches.
///
/// Runs on its own OS thread so the data-ready busy wait never stalls the
/// sender. A device fault discards the partial batch; the loop only gives up
/// after `max_consecutive_faults` faults in a row.
pub struct AcquisitionLoop<D: AcquisitionDevice> {
    adapter: DeviceAdapter<D>,
    fill: FillSide,
    metrics: Arc<BridgeMetrics>,
    stop: Arc<AtomicBool>,
    max_consecutive_faults: u32,
    batch_limit: Option<u64>,
}

impl<D: AcquisitionDevice + 'static> AcquisitionLoop<D> {
    pub fn new(
        adapter: DeviceAdapter<D>,
        fill: FillSide,
        metrics: Arc<BridgeMetrics>,
        stop: Arc<AtomicBool>,
        max_consecutive_faults: u32,
    ) -> Self {
        Self {
            adapter,
            fill,
            metrics,
            stop,
            max_consecutive_faults: max_consecutive_faults.max(1),
            batch_limit: None,
        }
    }

    /// Return after this many full batches instead of running until stopped
    pub fn with_batch_limit(mut self, batches: Option<u64>) -> Self {
        self.batch_limit = batches;
        self
    }

    pub fn spawn(self) -> std::io::Result<JoinHandle<Result<LoopExit>>> {
        std::thread::Builder::new()
            .name("acquisition".to_string())
            .spawn(move || self.run())
    }

    pub fn run(mut self) -> Result<LoopExit> {
        let mut scratch = vec![RawSample::default(); self.adapter.channels()];
        let mut consecutive_faults = 0u32;
        let mut batches = 0u64;

        while !self.stop.load(Ordering::Relaxed) {
            if let Err(e) = self.adapter.read_sample_set_into(&mut scratch) {
                self.metrics.record_device_fault();
                let lost = self.fill.discard_partial();
                if lost > 0 {
                    self.metrics.record_partial_discarded();
                }

                consecutive_faults += 1;
                if !e.is_retryable() || consecutive_faults >= self.max_consecutive_faults {
                    error!(
                        "Acquisition stopped after {} consecutive fault(s): {}",
                        consecutive_faults, e
                    );
                    return Err(e);
                }

                warn!("Discarded {} sample set(s) of partial batch: {}", lost, e);
                continue;
            }
            consecutive_faults = 0;
            self.metrics.record_sample_set();

            if self.fill.push(&scratch)? == BufferState::Full {
                self.metrics.record_batch_filled();

                match self.fill.hand_off()? {
                    HandOff::Swapped => debug!("Batch {} handed to sender", batches),
                    HandOff::Dropped => {
                        self.metrics.record_batch_dropped();
                        warn!("Sender still busy, dropped batch {}", batches);
                    }
                    HandOff::Incomplete => {}
                }

                batches += 1;
                if self.batch_limit.is_some_and(|limit| batches >= limit) {
                    return Ok(LoopExit::BatchLimit);
                }
            }
        }

        let lost = self.fill.discard_partial();
        if lost > 0 {
            self.metrics.record_partial_discarded();
            debug!("Stop requested, discarded {} buffered sample set(s)", lost);
        }

        Ok(LoopExit::Stopped)
    }
}
