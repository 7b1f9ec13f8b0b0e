use serde::{Deserialize, Serialize};

/// Result of waiting on the data-ready line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyOutcome {
    Ready,
    TimedOut,
}

/// How many data-ready pulses one sample set costs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReadyPolicy {
    /// One conversion per channel through a single multiplexed converter
    #[default]
    PerChannel,
    /// Simultaneous-sampling front-end: one pulse covers every channel
    PerSampleSet,
}

impl ReadyPolicy {
    /// Sample sets per second the device can actually deliver
    pub fn effective_set_rate_hz(self, conversion_rate_hz: f64, channels: usize) -> f64 {
        match self {
            ReadyPolicy::PerChannel => conversion_rate_hz / channels.max(1) as f64,
            ReadyPolicy::PerSampleSet => conversion_rate_hz,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplexed_rate_divides_by_channels() {
        let rate = ReadyPolicy::PerChannel.effective_set_rate_hz(30_000.0, 8);
        assert!((rate - 3_750.0).abs() < 1e-9);

        let rate = ReadyPolicy::PerSampleSet.effective_set_rate_hz(30_000.0, 8);
        assert!((rate - 30_000.0).abs() < 1e-9);
    }
}
