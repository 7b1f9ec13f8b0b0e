use std::sync::{Arc, Mutex};

use crate::error::{BridgeError, Result};
use crate::hal::AcquisitionDevice;

type CodeFn = Box<dyn Fn(u64, usize) -> u32 + Send>;

/// Shared record of every channel selection a device received
#[derive(Clone, Default)]
pub struct SelectionLog {
    inner: Arc<Mutex<Vec<usize>>>,
}

impl SelectionLog {
    pub fn selections(&self) -> Vec<usize> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn record(&self, channel: usize) {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(channel);
    }
}

/// Deterministic device for tests.
///
/// Codes come from `f(set_index, channel)` where the set index advances each
/// time channel 0 is selected. Ready asserts immediately unless the device was
/// built with [`ScriptedAdc::never_ready`] or a stall was scheduled.
pub struct ScriptedAdc {
    channels: usize,
    codes: CodeFn,
    log: SelectionLog,
    current: Option<usize>,
    sets_started: u64,
    always_ready: bool,
    stall: Option<(u64, usize)>,
    stall_hit: bool,
    ready_waits: u64,
}

impl ScriptedAdc {
    pub fn from_fn<F>(channels: usize, codes: F) -> Self
    where
        F: Fn(u64, usize) -> u32 + Send + 'static,
    {
        Self {
            channels,
            codes: Box::new(codes),
            log: SelectionLog::default(),
            current: None,
            sets_started: 0,
            always_ready: true,
            stall: None,
            stall_hit: false,
            ready_waits: 0,
        }
    }

    /// Every channel always reads `code` (24-bit, unextended)
    pub fn constant(channels: usize, code: u32) -> Self {
        Self::from_fn(channels, move |_, _| code)
    }

    /// Data-ready never asserts
    pub fn never_ready(channels: usize) -> Self {
        let mut adc = Self::constant(channels, 0);
        adc.always_ready = false;
        adc
    }

    /// Withhold data-ready once, at `channel` of the `set_index`th sample set
    pub fn with_stall(mut self, set_index: u64, channel: usize) -> Self {
        self.stall = Some((set_index, channel));
        self
    }

    pub fn selection_log(&self) -> SelectionLog {
        self.log.clone()
    }

    /// Number of times data-ready was observed asserted
    pub fn ready_waits(&self) -> u64 {
        self.ready_waits
    }

    fn set_index(&self) -> u64 {
        self.sets_started.saturating_sub(1)
    }
}

impl AcquisitionDevice for ScriptedAdc {
    fn select_channel(&mut self, channel: usize) -> Result<()> {
        if channel >= self.channels {
            return Err(BridgeError::Device(format!(
                "channel {} out of range for {}-channel device",
                channel, self.channels
            )));
        }

        if channel == 0 {
            self.sets_started += 1;
            if self.stall_hit {
                self.stall = None;
                self.stall_hit = false;
            }
        }

        self.log.record(channel);
        self.current = Some(channel);
        Ok(())
    }

    fn data_ready(&mut self) -> Result<bool> {
        if !self.always_ready {
            return Ok(false);
        }

        if let (Some((set, channel)), Some(current)) = (self.stall, self.current) {
            if set == self.set_index() && channel == current {
                self.stall_hit = true;
                return Ok(false);
            }
        }

        self.ready_waits += 1;
        Ok(true)
    }

    fn read_code(&mut self) -> Result<[u8; 3]> {
        let channel = self
            .current
            .ok_or_else(|| BridgeError::Device("read before channel select".into()))?;
        let code = (self.codes)(self.set_index(), channel) & 0x00FF_FFFF;

        Ok([(code >> 16) as u8, (code >> 8) as u8, code as u8])
    }
}
