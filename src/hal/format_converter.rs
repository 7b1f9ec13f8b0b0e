use serde::{Deserialize, Serialize};

/// Reinterpret the low `resolution_bits` of `code` as two's complement.
///
/// Bits above the word width are ignored, so a 24-bit code read into a
/// 32-bit register converts the same whether or not the upper byte is clear.
pub fn sign_extend(code: u32, resolution_bits: u32) -> i32 {
    debug_assert!((1..=32).contains(&resolution_bits));
    let shift = 32 - resolution_bits;
    ((code << shift) as i32) >> shift
}

/// Scaling convention from converter codes to physical units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Convention {
    /// `raw * ref / (2^(n-1) * gain)`: the most negative code maps to exactly `-ref/gain`
    #[default]
    OffsetBinary,
    /// `raw / (2^(n-1) - 1) * (ref / gain)`: the most positive code maps to exactly `ref/gain`
    Ratiometric,
}

/// Unit the converted values are expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PhysicalUnit {
    Volts,
    Millivolts,
    #[default]
    Microvolts,
}

impl PhysicalUnit {
    /// Multiplier from volts
    pub fn per_volt(self) -> f64 {
        match self {
            PhysicalUnit::Volts => 1.0,
            PhysicalUnit::Millivolts => 1e3,
            PhysicalUnit::Microvolts => 1e6,
        }
    }
}

/// Pure raw-code to physical-unit conversion. Never applies display offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Converter {
    full_scale_ref: f64,
    gain: f64,
    resolution_bits: u32,
    convention: Convention,
}

impl Converter {
    /// `reference_voltage` is in volts; results come out in `unit`
    pub fn new(
        reference_voltage: f64,
        gain: f64,
        resolution_bits: u32,
        convention: Convention,
        unit: PhysicalUnit,
    ) -> Self {
        Self {
            full_scale_ref: reference_voltage * unit.per_volt(),
            gain,
            resolution_bits,
            convention,
        }
    }

    pub fn full_scale_ref(&self) -> f64 {
        self.full_scale_ref
    }

    pub fn convention(&self) -> Convention {
        self.convention
    }

    /// Convert an already sign-extended code
    pub fn to_physical(&self, raw: i32) -> f64 {
        let half_scale = (1u64 << (self.resolution_bits - 1)) as f64;
        let raw = raw as f64;

        match self.convention {
            Convention::OffsetBinary => raw * self.full_scale_ref / (half_scale * self.gain),
            Convention::Ratiometric => raw / (half_scale - 1.0) * (self.full_scale_ref / self.gain),
        }
    }

    /// Convert a code that still carries its device word width
    pub fn code_to_physical(&self, code: u32) -> f64 {
        self.to_physical(sign_extend(code, self.resolution_bits))
    }
}
