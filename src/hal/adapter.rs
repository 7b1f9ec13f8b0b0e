use std::time::Duration;

use super::traits::AcquisitionDevice;
use super::types::{ReadyOutcome, ReadyPolicy};
use crate::config::BridgeConfig;
use crate::core::RawSample;
use crate::error::{BridgeError, Result};

/// Widest code a device word can carry
pub const WORD_BITS: u32 = 24;

/// Drives the ready handshake and fixed channel rotation over a device
pub struct DeviceAdapter<D: AcquisitionDevice> {
    device: D,
    channels: usize,
    policy: ReadyPolicy,
    ready_timeout: Option<Duration>,
    conversion_rate_hz: f64,
    resolution_bits: u32,
}

impl<D: AcquisitionDevice> DeviceAdapter<D> {
    pub fn new(
        device: D,
        channels: usize,
        policy: ReadyPolicy,
        ready_timeout: Option<Duration>,
        conversion_rate_hz: f64,
    ) -> Self {
        Self {
            device,
            channels,
            policy,
            ready_timeout,
            conversion_rate_hz,
            resolution_bits: WORD_BITS,
        }
    }

    /// Adapter decoding at the same width the converter scales with
    pub fn from_config(device: D, config: &BridgeConfig) -> Self {
        Self::new(
            device,
            config.channels.len(),
            config.device.ready_policy,
            config.device.ready_timeout(),
            config.device.conversion_rate_hz,
        )
        .with_resolution_bits(config.device.resolution_bits)
    }

    /// Sign-extend codes at `bits` instead of the full 24-bit word. Narrower
    /// codes are right-aligned in the word.
    pub fn with_resolution_bits(mut self, bits: u32) -> Self {
        self.resolution_bits = bits.clamp(2, WORD_BITS);
        self
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Per-channel rate after multiplexing; never the raw conversion rate
    /// when channels share one converter.
    pub fn effective_set_rate_hz(&self) -> f64 {
        self.policy
            .effective_set_rate_hz(self.conversion_rate_hz, self.channels)
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Read one raw value per channel, in rotation order, into `out`
    pub fn read_sample_set_into(&mut self, out: &mut [RawSample]) -> Result<()> {
        if out.len() != self.channels {
            return Err(BridgeError::ChannelCountMismatch {
                expected: self.channels,
                actual: out.len(),
            });
        }

        for (channel, slot) in out.iter_mut().enumerate() {
            self.device.select_channel(channel)?;

            if self.policy == ReadyPolicy::PerChannel || channel == 0 {
                self.await_ready(channel)?;
            }

            let [hi, mid, lo] = self.device.read_code()?;
            let word = u32::from_be_bytes([0, hi, mid, lo]);
            *slot = RawSample::from_code(word, self.resolution_bits);
        }

        Ok(())
    }

    pub fn read_sample_set(&mut self) -> Result<Vec<RawSample>> {
        let mut set = vec![RawSample::default(); self.channels];
        self.read_sample_set_into(&mut set)?;
        Ok(set)
    }

    fn await_ready(&mut self, channel: usize) -> Result<()> {
        match self.device.wait_ready(self.ready_timeout)? {
            ReadyOutcome::Ready => Ok(()),
            ReadyOutcome::TimedOut => Err(BridgeError::DeviceNotReady {
                channel,
                waited_ms: self.ready_timeout.map(|t| t.as_millis() as u64).unwrap_or(0),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::mock::ScriptedAdc;

    #[test]
    fn test_reads_every_channel_in_order() {
        let adc = ScriptedAdc::from_fn(4, |_, channel| channel as u32 * 10);
        let log = adc.selection_log();
        let mut adapter = DeviceAdapter::new(adc, 4, ReadyPolicy::PerChannel, None, 1000.0);

        let set = adapter.read_sample_set().unwrap();

        assert_eq!(set, vec![RawSample(0), RawSample(10), RawSample(20), RawSample(30)]);
        assert_eq!(log.selections(), vec![0, 1, 2, 3]);
        assert_eq!(adapter.device().ready_waits(), 4);
    }

    #[test]
    fn test_single_wait_per_set_for_simultaneous_devices() {
        let adc = ScriptedAdc::constant(8, 0);
        let mut adapter = DeviceAdapter::new(adc, 8, ReadyPolicy::PerSampleSet, None, 1000.0);

        adapter.read_sample_set().unwrap();
        adapter.read_sample_set().unwrap();

        assert_eq!(adapter.device().ready_waits(), 2);
        assert!((adapter.effective_set_rate_hz() - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_timeout_surfaces_device_not_ready() {
        let adc = ScriptedAdc::never_ready(2);
        let mut adapter = DeviceAdapter::new(
            adc,
            2,
            ReadyPolicy::PerChannel,
            Some(Duration::from_millis(5)),
            1000.0,
        );

        match adapter.read_sample_set() {
            Err(BridgeError::DeviceNotReady { channel, waited_ms }) => {
                assert_eq!(channel, 0);
                assert_eq!(waited_ms, 5);
            }
            other => panic!("expected DeviceNotReady, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_wrong_output_width() {
        let mut adapter =
            DeviceAdapter::new(ScriptedAdc::constant(3, 0), 3, ReadyPolicy::PerChannel, None, 1.0);
        let mut out = vec![RawSample::default(); 2];

        assert!(matches!(
            adapter.read_sample_set_into(&mut out),
            Err(BridgeError::ChannelCountMismatch { expected: 3, actual: 2 })
        ));
    }

    #[test]
    fn test_narrow_codes_use_configured_width() {
        let adc = ScriptedAdc::from_fn(2, |_, channel| if channel == 0 { 0x8000 } else { 0x7FFF });
        let mut adapter = DeviceAdapter::new(adc, 2, ReadyPolicy::PerChannel, None, 1000.0)
            .with_resolution_bits(16);

        let set = adapter.read_sample_set().unwrap();
        assert_eq!(set, vec![RawSample(-32768), RawSample(32767)]);
    }

    #[test]
    fn test_multiplexed_rate_is_reported() {
        let adapter =
            DeviceAdapter::new(ScriptedAdc::constant(8, 0), 8, ReadyPolicy::PerChannel, None, 30_000.0);
        assert!((adapter.effective_set_rate_hz() - 3_750.0).abs() < 1e-9);
    }
}
