use thiserror::Error;

/// Faults raised by the acquisition and delivery path
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Device never asserted data-ready within the configured wait
    #[error("device not ready on channel {channel} after {waited_ms} ms")]
    DeviceNotReady { channel: usize, waited_ms: u64 },

    #[error("device fault: {0}")]
    Device(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("collector rejected packet with status {status}")]
    TransportRejected { status: u16 },

    /// Inconsistent startup configuration; fatal
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("batch buffer full ({capacity} sample sets), reset before reuse")]
    BufferFull { capacity: usize },

    #[error("batch holds {filled} of {capacity} sample sets, only full batches are sent")]
    IncompleteBatch { filled: usize, capacity: usize },

    #[error("sample set has {actual} channels, expected {expected}")]
    ChannelCountMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl BridgeError {
    /// Faults the runtime recovers from by discarding the affected batch
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BridgeError::DeviceNotReady { .. }
                | BridgeError::Transport(_)
                | BridgeError::TransportRejected { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
