//! ZX81 five-byte floating point numbers
//!
//! Numeric literals in a BASIC line are followed by a hidden binary copy of
//! their value so the interpreter never re-parses the digits. The copy is
//! NUMBER_MARKER, an exponent byte (0x80 + binary exponent) and a 32-bit
//! big-endian mantissa normalized to 0.1xxx in binary. The leading one is
//! implied and its bit carries the sign instead (0 = positive).

use crate::zx81::charset::NUMBER_MARKER;

/// Encoded length, including the number marker.
pub const FLOAT_ENCODED_LEN: usize = 6;

/// Exponent for values in [16384, 32767].
pub const EXEC_EXPONENT: u8 = 0x8F;

const EXPONENT_BIAS: u8 = 0x80;
const SIGN_BIT: u32 = 0x8000_0000;

/// Mantissa for an address in [16384, 32767], where the exponent is always 0x8F.
///
/// 0.1xxx * 2^15 == addr, so the fraction is addr / 32768 and the stored
/// mantissa drops the implied leading one: ((addr * 2) - 32768) * 65536.
pub const fn mantissa_for_address(address: u16) -> u32 {
    ((address as u32 * 2) - 32768) * 65536
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatingPointAddress {
    pub exponent: u8,
    pub mantissa: u32,
}

impl FloatingPointAddress {
    /// Normalized encoding of `address`.
    ///
    /// Only [16384, 32767] gets the fixed exponent 0x8F and
    /// `mantissa_for_address`. 16383 needs one bit less, so it encodes as
    /// exponent 0x8E and mantissa 0x7FFC0000 and the fixed-exponent decode
    /// `(m / 65536 + 32768) / 2` does not apply to it.
    pub fn from_address(address: u16) -> Self {
        if address == 0 {
            return FloatingPointAddress {
                exponent: 0,
                mantissa: 0,
            };
        }

        let bits = u16::BITS - address.leading_zeros();
        let mantissa = ((address as u32) << (32 - bits)) & !SIGN_BIT;

        FloatingPointAddress {
            exponent: EXPONENT_BIAS + bits as u8,
            mantissa,
        }
    }

    /// Decode back to an integer address. Returns None for negative,
    /// fractional or out-of-range values.
    pub fn to_address(&self) -> Option<u16> {
        if self.exponent == 0 {
            return (self.mantissa == 0).then_some(0);
        }
        if self.mantissa & SIGN_BIT != 0 || self.exponent <= EXPONENT_BIAS {
            return None;
        }

        let bits = (self.exponent - EXPONENT_BIAS) as u32;
        if bits > u16::BITS {
            return None;
        }

        let normalized = self.mantissa | SIGN_BIT;
        let shift = 32 - bits;
        if normalized & ((1u32 << shift) - 1) != 0 {
            return None;
        }
        Some((normalized >> shift) as u16)
    }

    pub fn to_bytes(&self) -> [u8; FLOAT_ENCODED_LEN] {
        let m = self.mantissa.to_be_bytes();
        [NUMBER_MARKER, self.exponent, m[0], m[1], m[2], m[3]]
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [NUMBER_MARKER, exponent, m0, m1, m2, m3] => Some(FloatingPointAddress {
                exponent: *exponent,
                mantissa: u32::from_be_bytes([*m0, *m1, *m2, *m3]),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zx81::{MAX_EXEC_ADDRESS, MIN_EXEC_ADDRESS};
    use test_log::test;

    #[test]
    fn default_exec_address_encoding() {
        // 16514 = 0x4082 -> 0.1000000010000010 * 2^15
        let fp = FloatingPointAddress::from_address(16514);
        assert_eq!(fp.to_bytes(), [0x7E, 0x8F, 0x01, 0x04, 0x00, 0x00]);
    }

    #[test]
    fn fixed_formula_matches_normalization() {
        for address in 16384..=MAX_EXEC_ADDRESS {
            let fp = FloatingPointAddress::from_address(address);
            assert_eq!(fp.exponent, EXEC_EXPONENT, "exponent for {}", address);
            assert_eq!(fp.mantissa, mantissa_for_address(address), "mantissa for {}", address);
        }
    }

    #[test]
    fn mantissa_formula_inverts() {
        for address in 16384..=MAX_EXEC_ADDRESS {
            let mantissa = mantissa_for_address(address);
            let decoded = (mantissa / 65536 + 32768) / 2;
            assert_eq!(decoded, address as u32);
        }
    }

    #[test]
    fn every_exec_address_round_trips() {
        for address in MIN_EXEC_ADDRESS..=MAX_EXEC_ADDRESS {
            let bytes = FloatingPointAddress::from_address(address).to_bytes();
            let decoded = FloatingPointAddress::from_bytes(&bytes).and_then(|fp| fp.to_address());
            assert_eq!(decoded, Some(address));
        }
    }

    #[test]
    fn lowest_exec_address_drops_an_exponent() {
        let fp = FloatingPointAddress::from_address(16383);
        assert_eq!(fp.exponent, 0x8E);
        assert_eq!(fp.mantissa, 0x7FFC_0000);
    }

    #[test]
    fn small_values_and_zero() {
        assert_eq!(FloatingPointAddress::from_address(0).to_bytes(), [0x7E, 0, 0, 0, 0, 0]);
        let one = FloatingPointAddress::from_address(1);
        assert_eq!((one.exponent, one.mantissa), (0x81, 0));
        assert_eq!(one.to_address(), Some(1));
        assert_eq!(FloatingPointAddress::from_address(u16::MAX).to_address(), Some(u16::MAX));
    }

    #[test]
    fn rejects_non_integers() {
        // 0.75
        let fraction = FloatingPointAddress {
            exponent: 0x80,
            mantissa: 0x4000_0000,
        };
        assert_eq!(fraction.to_address(), None);

        // 1.5
        let one_and_a_half = FloatingPointAddress {
            exponent: 0x81,
            mantissa: 0x4000_0000,
        };
        assert_eq!(one_and_a_half.to_address(), None);

        let negative = FloatingPointAddress {
            exponent: 0x8F,
            mantissa: 0x8000_0000,
        };
        assert_eq!(negative.to_address(), None);
        assert_eq!(FloatingPointAddress::from_bytes(&[0x7F, 0, 0, 0, 0, 0]), None);
    }
}
