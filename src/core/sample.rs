use crate::hal::format_converter::sign_extend;

/// Signed converter code, sign-extended from the device word width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawSample(pub i32);

impl RawSample {
    /// Build from a 24-bit word transferred most-significant byte first
    pub fn from_be_bytes(bytes: [u8; 3]) -> Self {
        let code = ((bytes[0] as u32) << 16) | ((bytes[1] as u32) << 8) | bytes[2] as u32;
        Self(sign_extend(code, 24))
    }

    /// Build from an unextended code of `resolution_bits` width
    pub fn from_code(code: u32, resolution_bits: u32) -> Self {
        Self(sign_extend(code, resolution_bits))
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_be_bytes_msb_first() {
        assert_eq!(RawSample::from_be_bytes([0x00, 0x00, 0x01]).value(), 1);
        assert_eq!(RawSample::from_be_bytes([0x12, 0x34, 0x56]).value(), 0x123456);
        assert_eq!(RawSample::from_be_bytes([0x7F, 0xFF, 0xFF]).value(), 8_388_607);
    }

    #[test]
    fn test_from_be_bytes_negative() {
        assert_eq!(RawSample::from_be_bytes([0xFF, 0xFF, 0xFF]).value(), -1);
        assert_eq!(RawSample::from_be_bytes([0x80, 0x00, 0x00]).value(), -8_388_608);
    }

    #[test]
    fn test_from_code_other_width() {
        assert_eq!(RawSample::from_code(0x8000, 16).value(), -32768);
        assert_eq!(RawSample::from_code(0x7FFF, 16).value(), 32767);
    }
}
