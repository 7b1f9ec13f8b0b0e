use anyhow::{anyhow, Context, Result};
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use super::acquisition::AcquisitionLoop;
use super::assembler::PacketAssembler;
use super::clock::{Clock, SystemClock};
use super::state::{BridgeStatus, LoopExit};
use crate::buffers::{batch_exchange, DrainSide, Drained};
use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::hal::{AcquisitionDevice, DeviceAdapter};
use crate::observability::{BridgeMetrics, MetricsSnapshot};
use crate::transport::TransportSender;

type AcquisitionHandle = std::thread::JoinHandle<std::result::Result<LoopExit, BridgeError>>;

/// Wires a device to a transport: acquisition on a dedicated thread, assembly
/// and delivery on a tokio task, with a double buffer between them.
pub struct Bridge {
    config: Arc<BridgeConfig>,
    sender: Arc<dyn TransportSender>,
    clock: Arc<dyn Clock>,
    metrics: Arc<BridgeMetrics>,
    status: BridgeStatus,
    stop: Arc<AtomicBool>,
    acquisition: Option<AcquisitionHandle>,
    drain: Option<JoinHandle<()>>,
}

impl Bridge {
    /// Validates the configuration; an inconsistent one never starts
    pub fn new(config: BridgeConfig, sender: Arc<dyn TransportSender>) -> Result<Self> {
        config.validate().context("Refusing to build bridge")?;

        Ok(Self {
            config: Arc::new(config),
            sender,
            clock: Arc::new(SystemClock),
            metrics: Arc::new(BridgeMetrics::new()),
            status: BridgeStatus::Stopped,
            stop: Arc::new(AtomicBool::new(false)),
            acquisition: None,
            drain: None,
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn status(&self) -> BridgeStatus {
        self.status
    }

    pub fn metrics(&self) -> Arc<BridgeMetrics> {
        self.metrics.clone()
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Start sampling `device`. With `batch_limit` the acquisition thread
    /// returns on its own after that many full batches.
    pub fn start<D>(&mut self, device: D, batch_limit: Option<u64>) -> Result<()>
    where
        D: AcquisitionDevice + 'static,
    {
        if self.status == BridgeStatus::Running {
            return Err(anyhow!("Bridge is already running"));
        }

        let config = &self.config;
        let channels = config.channels.len();
        let (fill, drain) = batch_exchange(config.batch.points_per_packet, channels)?;

        let adapter = DeviceAdapter::from_config(device, config);
        if config.device.ready_timeout().is_none() {
            warn!("Data-ready wait is unbounded; a silent device will hang acquisition");
        }

        info!(
            "Sampling {} channels at {:.1} sets/s per channel ({:.0} Hz conversions), {} points per packet",
            channels,
            adapter.effective_set_rate_hz(),
            config.device.conversion_rate_hz,
            config.batch.points_per_packet
        );

        self.stop.store(false, Ordering::SeqCst);
        let acquisition = AcquisitionLoop::new(
            adapter,
            fill,
            self.metrics.clone(),
            self.stop.clone(),
            config.runtime.max_consecutive_faults,
        )
        .with_batch_limit(batch_limit)
        .spawn()
        .context("Failed to spawn acquisition thread")?;

        let drain_task = tokio::spawn(drain_loop(
            drain,
            PacketAssembler::from_config(config),
            self.sender.clone(),
            self.clock.clone(),
            self.metrics.clone(),
            Duration::from_millis(config.runtime.drain_poll_ms.max(1)),
        ));

        self.acquisition = Some(acquisition);
        self.drain = Some(drain_task);
        self.status = BridgeStatus::Running;
        Ok(())
    }

    /// Wait for acquisition to end on its own (batch limit or fatal fault)
    /// and for every handed-off batch to be delivered.
    pub async fn wait(&mut self) -> Result<MetricsSnapshot> {
        self.finish().await
    }

    /// Stop acquisition, drain what was already handed off, and report
    pub async fn shutdown(&mut self) -> Result<MetricsSnapshot> {
        if self.status == BridgeStatus::Stopped {
            return Ok(self.metrics.snapshot());
        }
        self.stop.store(true, Ordering::SeqCst);
        self.finish().await
    }

    async fn finish(&mut self) -> Result<MetricsSnapshot> {
        let acquisition_result = match self.acquisition.take() {
            Some(handle) => {
                let joined = tokio::task::spawn_blocking(move || handle.join())
                    .await
                    .context("Failed to join acquisition thread")?;
                Some(joined.map_err(|_| anyhow!("Acquisition thread panicked"))?)
            }
            None => None,
        };

        // The fill side is gone now, so the drain task ends once it is empty
        if let Some(handle) = self.drain.take() {
            handle.await.context("Sender task failed")?;
        }

        let snapshot = self.metrics.snapshot();
        match acquisition_result {
            Some(Err(e)) => {
                self.status = BridgeStatus::Error;
                Err(anyhow::Error::new(e).context("Acquisition aborted"))
            }
            Some(Ok(exit)) => {
                info!("Acquisition ended ({:?}): {:?}", exit, snapshot);
                self.status = BridgeStatus::Stopped;
                Ok(snapshot)
            }
            None => {
                self.status = BridgeStatus::Stopped;
                Ok(snapshot)
            }
        }
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        // Cannot join here; just make sure the acquisition thread winds down
        self.stop.store(true, Ordering::SeqCst);
    }
}

async fn drain_loop(
    drain: DrainSide,
    assembler: PacketAssembler,
    sender: Arc<dyn TransportSender>,
    clock: Arc<dyn Clock>,
    metrics: Arc<BridgeMetrics>,
    poll_interval: Duration,
) {
    loop {
        let batch = match drain.try_take() {
            Drained::Batch(batch) => batch,
            Drained::Idle => {
                tokio::time::sleep(poll_interval).await;
                continue;
            }
            Drained::Closed => break,
        };

        let assembled = assembler.assemble(&batch, clock.now_ms());
        // Assembly copied everything out; the buffer can refill while we send
        if !drain.give_back(batch) {
            debug!("Fill side closed, buffer not returned");
        }

        let packet = match assembled {
            Ok(packet) => packet,
            Err(e) => {
                error!("Failed to assemble batch: {}", e);
                continue;
            }
        };

        let start = metrics.start_send();
        match sender.send(&packet).await {
            Ok(outcome) => {
                metrics.finish_send(start);
                metrics.record_batch_sent();
                debug!(
                    "Delivered {} channels x {} points (status {}, {} bytes)",
                    packet.channel_count(),
                    packet.points_per_channel(),
                    outcome.status,
                    outcome.bytes
                );
            }
            Err(e) => {
                metrics.record_transport_failure();
                warn!("Discarding batch after transport failure: {}", e);
            }
        }
    }

    debug!("Sender task finished");
}
