use crate::core::RawSample;
use crate::error::{BridgeError, Result};

/// Result of storing one sample set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferState {
    Filling,
    Full,
}

/// Fixed `points x channels` store of raw samples, point-major.
///
/// The fill cursor only moves forward through `push` and only returns to
/// zero through `reset`; a full buffer rejects further pushes.
#[derive(Debug, Clone)]
pub struct BatchBuffer {
    slots: Vec<RawSample>,
    points: usize,
    channels: usize,
    fill_count: usize,
}

impl BatchBuffer {
    pub fn new(points: usize, channels: usize) -> Result<Self> {
        if points == 0 || channels == 0 {
            return Err(BridgeError::Configuration(format!(
                "batch buffer needs at least one point and one channel, got {}x{}",
                points, channels
            )));
        }

        Ok(Self {
            slots: vec![RawSample::default(); points * channels],
            points,
            channels,
            fill_count: 0,
        })
    }

    /// Store one sample set at the cursor
    pub fn push(&mut self, set: &[RawSample]) -> Result<BufferState> {
        if set.len() != self.channels {
            return Err(BridgeError::ChannelCountMismatch {
                expected: self.channels,
                actual: set.len(),
            });
        }
        if self.is_full() {
            return Err(BridgeError::BufferFull {
                capacity: self.points,
            });
        }

        let start = self.fill_count * self.channels;
        self.slots[start..start + self.channels].copy_from_slice(set);
        self.fill_count += 1;

        if self.is_full() {
            Ok(BufferState::Full)
        } else {
            Ok(BufferState::Filling)
        }
    }

    pub fn reset(&mut self) {
        self.fill_count = 0;
    }

    pub fn get(&self, point: usize, channel: usize) -> Option<RawSample> {
        if point >= self.fill_count || channel >= self.channels {
            return None;
        }
        Some(self.slots[point * self.channels + channel])
    }

    /// All channels of sample set `point`
    pub fn point(&self, point: usize) -> Option<&[RawSample]> {
        if point >= self.fill_count {
            return None;
        }
        let start = point * self.channels;
        Some(&self.slots[start..start + self.channels])
    }

    pub fn fill_count(&self) -> usize {
        self.fill_count
    }

    /// Sample sets per batch
    pub fn capacity(&self) -> usize {
        self.points
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn is_full(&self) -> bool {
        self.fill_count == self.points
    }

    pub fn is_empty(&self) -> bool {
        self.fill_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[i32]) -> Vec<RawSample> {
        values.iter().copied().map(RawSample).collect()
    }

    #[test]
    fn test_full_exactly_on_last_push() {
        let mut buffer = BatchBuffer::new(3, 2).unwrap();

        assert_eq!(buffer.push(&set(&[1, 2])).unwrap(), BufferState::Filling);
        assert_eq!(buffer.push(&set(&[3, 4])).unwrap(), BufferState::Filling);
        assert_eq!(buffer.push(&set(&[5, 6])).unwrap(), BufferState::Full);
        assert!(buffer.is_full());
    }

    #[test]
    fn test_push_after_full_is_rejected() {
        let mut buffer = BatchBuffer::new(1, 2).unwrap();
        buffer.push(&set(&[7, 8])).unwrap();

        let err = buffer.push(&set(&[9, 9])).unwrap_err();
        assert!(matches!(err, BridgeError::BufferFull { capacity: 1 }));
        // Stored data untouched
        assert_eq!(buffer.get(0, 0), Some(RawSample(7)));
        assert_eq!(buffer.get(0, 1), Some(RawSample(8)));
    }

    #[test]
    fn test_point_major_layout() {
        let mut buffer = BatchBuffer::new(2, 3).unwrap();
        buffer.push(&set(&[10, 11, 12])).unwrap();
        buffer.push(&set(&[20, 21, 22])).unwrap();

        assert_eq!(buffer.get(1, 2), Some(RawSample(22)));
        assert_eq!(buffer.point(0).unwrap(), set(&[10, 11, 12]).as_slice());
        assert_eq!(buffer.get(2, 0), None);
        assert_eq!(buffer.get(0, 3), None);
    }

    #[test]
    fn test_reset_returns_cursor_to_zero() {
        let mut buffer = BatchBuffer::new(2, 1).unwrap();
        buffer.push(&set(&[1])).unwrap();
        buffer.push(&set(&[2])).unwrap();

        buffer.reset();
        assert!(buffer.is_empty());
        assert_eq!(buffer.get(0, 0), None);
        assert_eq!(buffer.push(&set(&[3])).unwrap(), BufferState::Filling);
    }

    #[test]
    fn test_wrong_width_rejected() {
        let mut buffer = BatchBuffer::new(2, 3).unwrap();
        let err = buffer.push(&set(&[1, 2])).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::ChannelCountMismatch { expected: 3, actual: 2 }
        ));
        assert_eq!(buffer.fill_count(), 0);
    }

    #[test]
    fn test_zero_sizes_rejected() {
        assert!(BatchBuffer::new(0, 8).is_err());
        assert!(BatchBuffer::new(50, 0).is_err());
    }
}
