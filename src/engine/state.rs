use serde::{Deserialize, Serialize};

/// Lifecycle of a [`Bridge`](super::Bridge)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BridgeStatus {
    #[default]
    Stopped,
    Running,
    Error,
}

/// Why the acquisition loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// Stop flag raised
    Stopped,
    /// Requested number of full batches reached
    BatchLimit,
}
