use crate::buffers::BatchBuffer;
use crate::config::BridgeConfig;
use crate::core::{ChannelSeries, ChannelSet, Packet, Point};
use crate::error::{BridgeError, Result};
use crate::hal::Converter;

/// Turns a full batch into per-channel, back-dated point series.
///
/// Timestamps are inferred from the nominal interval, not measured: point
/// `j` of `n` sits at `send_time - (n - 1 - j) * interval`, so the newest
/// point carries the send time itself.
#[derive(Debug, Clone)]
pub struct PacketAssembler {
    channels: ChannelSet,
    converter: Converter,
    nominal_interval_ms: f64,
    display_offset: f64,
}

impl PacketAssembler {
    pub fn new(
        channels: ChannelSet,
        converter: Converter,
        nominal_interval_ms: f64,
        display_offset: f64,
    ) -> Self {
        Self {
            channels,
            converter,
            nominal_interval_ms,
            display_offset,
        }
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(
            config.channel_set(),
            config.converter(),
            config.nominal_interval_ms(),
            config.conversion.display_offset,
        )
    }

    pub fn nominal_interval_ms(&self) -> f64 {
        self.nominal_interval_ms
    }

    pub fn assemble(&self, buffer: &BatchBuffer, send_time_ms: i64) -> Result<Packet> {
        if !buffer.is_full() {
            return Err(BridgeError::IncompleteBatch {
                filled: buffer.fill_count(),
                capacity: buffer.capacity(),
            });
        }
        if buffer.channels() != self.channels.len() {
            return Err(BridgeError::ChannelCountMismatch {
                expected: self.channels.len(),
                actual: buffer.channels(),
            });
        }

        let points = buffer.capacity();
        let anchor = send_time_ms as f64;

        let series = self
            .channels
            .iter()
            .map(|channel| {
                let series_points = (0..points)
                    .filter_map(|j| {
                        let raw = buffer.get(j, channel.index)?;
                        Some(Point {
                            t: anchor - (points - 1 - j) as f64 * self.nominal_interval_ms,
                            v: self.converter.to_physical(raw.value()) + self.display_offset,
                        })
                    })
                    .collect();

                ChannelSeries {
                    channel_id: channel.label.clone(),
                    points: series_points,
                }
            })
            .collect();

        Ok(Packet { series })
    }
}
