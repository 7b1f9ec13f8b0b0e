use std::f64::consts::PI;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{BridgeError, Result};
use crate::hal::{AcquisitionDevice, WORD_BITS};

/// Sine components (amplitude uV, frequency Hz) plus a uniform noise span
struct Profile {
    tones: &'static [(f64, f64)],
    noise_uv: f64,
}

// Frontal alpha, occipital theta, temporal gamma, sensorimotor beta,
// central alpha/theta mix, mastoid reference.
static PROFILES: [Profile; 6] = [
    Profile { tones: &[(50.0, 10.0), (20.0, 2.0)], noise_uv: 10.0 },
    Profile { tones: &[(30.0, 4.0), (10.0, 1.0)], noise_uv: 10.0 },
    Profile { tones: &[(10.0, 30.0), (5.0, 60.0)], noise_uv: 10.0 },
    Profile { tones: &[(25.0, 18.0)], noise_uv: 15.0 },
    Profile { tones: &[(40.0, 8.0)], noise_uv: 25.0 },
    Profile { tones: &[(5.0, 60.0)], noise_uv: 20.0 },
];

/// Free-running converter simulation paced at the configured conversion rate
pub struct SimulatedAdc {
    channels: usize,
    reference_uv: f64,
    gain: f64,
    conversion_period: Duration,
    set_period_s: f64,
    next_ready: Option<Instant>,
    current: Option<usize>,
    sets_started: u64,
    resolution_bits: u32,
    rng: StdRng,
}

impl SimulatedAdc {
    pub fn new(channels: usize, conversion_rate_hz: f64, reference_voltage: f64, gain: f64) -> Self {
        let conversion_rate_hz = conversion_rate_hz.max(1.0);

        Self {
            channels,
            reference_uv: reference_voltage * 1e6,
            gain,
            conversion_period: Duration::from_secs_f64(1.0 / conversion_rate_hz),
            set_period_s: channels.max(1) as f64 / conversion_rate_hz,
            next_ready: None,
            current: None,
            sets_started: 0,
            resolution_bits: WORD_BITS,
            rng: StdRng::seed_from_u64(0x5EED),
        }
    }

    /// Reseed the noise source
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Emit right-aligned codes of `bits` width instead of full 24-bit words
    pub fn with_resolution_bits(mut self, bits: u32) -> Self {
        self.resolution_bits = bits.clamp(2, WORD_BITS);
        self
    }

    fn synthesize_uv(&mut self, channel: usize) -> f64 {
        let t = self.sets_started.saturating_sub(1) as f64 * self.set_period_s;
        let profile = &PROFILES[channel % PROFILES.len()];

        let tones: f64 = profile
            .tones
            .iter()
            .map(|(amplitude, freq)| amplitude * (2.0 * PI * freq * t).sin())
            .sum();
        let noise = self.rng.gen_range(-0.5f64..0.5) * profile.noise_uv;

        tones + noise
    }

    /// Inverse of the offset-binary convention, clamped to the code range
    fn uv_to_code(&self, uv: f64) -> u32 {
        let half_range = (1u32 << (self.resolution_bits - 1)) as f64;
        let code = (uv * half_range * self.gain / self.reference_uv).round();
        let code = code.clamp(-half_range, half_range - 1.0) as i32;
        (code as u32) & ((1u32 << self.resolution_bits) - 1)
    }
}

impl AcquisitionDevice for SimulatedAdc {
    fn select_channel(&mut self, channel: usize) -> Result<()> {
        if channel >= self.channels {
            return Err(BridgeError::Device(format!(
                "channel {} out of range for {}-channel device",
                channel, self.channels
            )));
        }
        if channel == 0 {
            self.sets_started += 1;
        }
        self.current = Some(channel);
        Ok(())
    }

    fn data_ready(&mut self) -> Result<bool> {
        let now = Instant::now();
        let next = *self.next_ready.get_or_insert(now);
        Ok(now >= next)
    }

    fn read_code(&mut self) -> Result<[u8; 3]> {
        let channel = self
            .current
            .ok_or_else(|| BridgeError::Device("read before channel select".into()))?;

        // Conversions free-run: schedule from the previous slot, not from now
        let now = Instant::now();
        let next = self.next_ready.unwrap_or(now) + self.conversion_period;
        self.next_ready = Some(if next < now { now } else { next });

        let uv = self.synthesize_uv(channel);
        let code = self.uv_to_code(uv);
        Ok([(code >> 16) as u8, (code >> 8) as u8, code as u8])
    }
}
