use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};

use super::batch::{BatchBuffer, BufferState};
use crate::core::RawSample;
use crate::error::{BridgeError, Result};

/// What happened to a full batch at hand-off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandOff {
    /// Batch moved to the drain side; filling continues in the spare buffer
    Swapped,
    /// Drain side still held the spare; batch discarded, buffer reused
    Dropped,
    /// Buffer was not full; nothing moved
    Incomplete,
}

/// Outcome of polling the drain side
#[derive(Debug)]
pub enum Drained {
    Batch(BatchBuffer),
    Idle,
    Closed,
}

/// Acquisition half of the double buffer
pub struct FillSide {
    current: BatchBuffer,
    filled_tx: Sender<BatchBuffer>,
    empty_rx: Receiver<BatchBuffer>,
}

/// Transmission half of the double buffer
pub struct DrainSide {
    filled_rx: Receiver<BatchBuffer>,
    empty_tx: Sender<BatchBuffer>,
}

/// Create two `points x channels` buffers circulating between a filler and a drainer.
///
/// A buffer is owned by exactly one side at a time, so the drainer never
/// reads a slot the filler is writing.
pub fn batch_exchange(points: usize, channels: usize) -> Result<(FillSide, DrainSide)> {
    let (filled_tx, filled_rx) = bounded(2);
    let (empty_tx, empty_rx) = bounded(2);

    empty_tx
        .send(BatchBuffer::new(points, channels)?)
        .map_err(|e| BridgeError::Configuration(format!("Failed to seed spare buffer: {}", e)))?;

    Ok((
        FillSide {
            current: BatchBuffer::new(points, channels)?,
            filled_tx,
            empty_rx,
        },
        DrainSide {
            filled_rx,
            empty_tx,
        },
    ))
}

impl FillSide {
    pub fn push(&mut self, set: &[RawSample]) -> Result<BufferState> {
        self.current.push(set)
    }

    pub fn current(&self) -> &BatchBuffer {
        &self.current
    }

    /// Pass the full buffer to the drain side without blocking
    pub fn hand_off(&mut self) -> Result<HandOff> {
        if !self.current.is_full() {
            return Ok(HandOff::Incomplete);
        }

        match self.empty_rx.try_recv() {
            Ok(mut spare) => {
                spare.reset();
                let full = std::mem::replace(&mut self.current, spare);
                match self.filled_tx.try_send(full) {
                    Ok(()) => Ok(HandOff::Swapped),
                    Err(TrySendError::Full(_)) => Err(BridgeError::Device(
                        "hand-off queue full with both buffers outstanding".into(),
                    )),
                    Err(TrySendError::Disconnected(_)) => {
                        Err(BridgeError::Transport("drain side closed".into()))
                    }
                }
            }
            Err(TryRecvError::Empty) => {
                self.current.reset();
                Ok(HandOff::Dropped)
            }
            Err(TryRecvError::Disconnected) => {
                Err(BridgeError::Transport("drain side closed".into()))
            }
        }
    }

    /// Throw away a partially filled batch; returns how many sets were lost
    pub fn discard_partial(&mut self) -> usize {
        let lost = self.current.fill_count();
        self.current.reset();
        lost
    }
}

impl DrainSide {
    pub fn try_take(&self) -> Drained {
        match self.filled_rx.try_recv() {
            Ok(batch) => Drained::Batch(batch),
            Err(TryRecvError::Empty) => Drained::Idle,
            Err(TryRecvError::Disconnected) => Drained::Closed,
        }
    }

    /// Return a drained buffer for refilling. False once the fill side is gone.
    pub fn give_back(&self, mut batch: BatchBuffer) -> bool {
        batch.reset();
        self.empty_tx.try_send(batch).is_ok()
    }
}
