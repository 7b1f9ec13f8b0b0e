use std::time::{Duration, Instant};

use super::types::ReadyOutcome;
use crate::error::Result;

/// Register-level access to a multiplexed converter.
///
/// Calls are blocking and must be issued in `select -> wait -> read` order;
/// selecting a channel changes the device mux and is not idempotent.
pub trait AcquisitionDevice: Send {
    /// Route `channel` to the converter input
    fn select_channel(&mut self, channel: usize) -> Result<()>;

    /// Poll the data-ready line once
    fn data_ready(&mut self) -> Result<bool>;

    /// Block until data-ready asserts. `None` waits forever.
    fn wait_ready(&mut self, timeout: Option<Duration>) -> Result<ReadyOutcome> {
        let deadline = timeout.map(|t| Instant::now() + t);

        loop {
            if self.data_ready()? {
                return Ok(ReadyOutcome::Ready);
            }
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    return Ok(ReadyOutcome::TimedOut);
                }
            }
            std::hint::spin_loop();
        }
    }

    /// Clock out one conversion result, most significant byte first
    fn read_code(&mut self) -> Result<[u8; 3]>;
}
