//! Bit serialization of generated sequences.
//!
//! Every value of a [`Sequence`] is written MSB-first and the encodings are
//! concatenated in generation order. Nothing is padded at this stage.
//!
//! # Packing conventions
//!
//! - **Minimal**: variable-width unsigned binary, exactly what `format(v, "b")`
//!   prints. Zero is the single bit `0`. Used by the LCG, whose values are
//!   never negative.
//! - **TwosComplement**: fixed-width two's complement. At width 8 this is the
//!   same as casting each value to `u8` and unpacking its bits. Used by the
//!   Mersenne Twister, whose values span `[-128, 128)`.

use crate::error::{Error, Result};
use crate::generator::Sequence;

/// How integers are turned into bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitPacking {
    /// Shortest unsigned binary form, no leading zeros.
    Minimal,
    /// Fixed-width two's complement, `width` in `1..=64`.
    TwosComplement { width: u8 },
}

impl BitPacking {
    /// Two's complement over one byte.
    pub const TWOS_COMPLEMENT_8: Self = Self::TwosComplement { width: 8 };
}

impl std::fmt::Display for BitPacking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Minimal => write!(f, "minimal"),
            Self::TwosComplement { width } => write!(f, "twos_complement_{width}"),
        }
    }
}

/// Number of bits `value` occupies under `packing`.
///
/// Fails with [`Error::InvalidInput`] if the value cannot be represented.
pub fn bit_width(value: i64, packing: BitPacking) -> Result<usize> {
    match packing {
        BitPacking::Minimal => {
            if value < 0 {
                return Err(Error::InvalidInput(format!(
                    "minimal packing needs non-negative values, got {value}"
                )));
            }
            Ok((64 - value.leading_zeros() as usize).max(1))
        }
        BitPacking::TwosComplement { width } => {
            check_twos_complement(value, width)?;
            Ok(width as usize)
        }
    }
}

fn check_twos_complement(value: i64, width: u8) -> Result<()> {
    if width == 0 || width > 64 {
        return Err(Error::InvalidInput(format!(
            "two's complement width must be 1..=64, got {width}"
        )));
    }
    if width < 64 {
        let min = -(1i64 << (width - 1));
        let max = (1i64 << (width - 1)) - 1;
        if value < min || value > max {
            return Err(Error::InvalidInput(format!(
                "{value} does not fit in {width}-bit two's complement [{min}, {max}]"
            )));
        }
    }
    Ok(())
}

/// An ordered sequence of bits, one `u8` (0 or 1) per bit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitStream {
    bits: Vec<u8>,
}

impl BitStream {
    /// Build from raw 0/1 values. Any non-zero byte counts as a 1.
    pub fn from_bits(bits: impl IntoIterator<Item = u8>) -> Self {
        Self {
            bits: bits.into_iter().map(|b| u8::from(b != 0)).collect(),
        }
    }

    pub fn as_bits(&self) -> &[u8] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Count of set bits.
    pub fn ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b == 1).count()
    }

    /// Render as a `0`/`1` string.
    pub fn to_bit_string(&self) -> String {
        self.bits.iter().map(|&b| if b == 1 { '1' } else { '0' }).collect()
    }
}

/// Serialize a sequence into a flat bit stream using its packing convention.
pub fn pack(sequence: &Sequence) -> Result<BitStream> {
    let packing = sequence.packing();
    let mut bits = Vec::with_capacity(sequence.len() * 8);
    for &value in sequence.values() {
        let width = bit_width(value, packing)?;
        // Two's complement falls out of the i64 representation; masking to
        // `width` keeps only the low bits.
        let raw = value as u64;
        for shift in (0..width).rev() {
            bits.push(((raw >> shift) & 1) as u8);
        }
    }
    log::debug!(
        "packed {} values ({packing}) into {} bits",
        sequence.len(),
        bits.len()
    );
    Ok(BitStream { bits })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal(values: &[i64]) -> Sequence {
        Sequence::new(values.to_vec(), BitPacking::Minimal)
    }

    fn signed(values: &[i64]) -> Sequence {
        Sequence::new(values.to_vec(), BitPacking::TWOS_COMPLEMENT_8)
    }

    #[test]
    fn test_bit_width_minimal() {
        assert_eq!(bit_width(0, BitPacking::Minimal).unwrap(), 1);
        assert_eq!(bit_width(1, BitPacking::Minimal).unwrap(), 1);
        assert_eq!(bit_width(2, BitPacking::Minimal).unwrap(), 2);
        assert_eq!(bit_width(126, BitPacking::Minimal).unwrap(), 7);
        assert_eq!(bit_width(127, BitPacking::Minimal).unwrap(), 7);
        assert_eq!(bit_width(128, BitPacking::Minimal).unwrap(), 8);
    }

    #[test]
    fn test_bit_width_minimal_rejects_negative() {
        assert!(matches!(
            bit_width(-1, BitPacking::Minimal),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_bit_width_twos_complement_bounds() {
        let p = BitPacking::TWOS_COMPLEMENT_8;
        assert_eq!(bit_width(-128, p).unwrap(), 8);
        assert_eq!(bit_width(127, p).unwrap(), 8);
        assert!(bit_width(128, p).is_err());
        assert!(bit_width(-129, p).is_err());
        assert!(bit_width(0, BitPacking::TwosComplement { width: 0 }).is_err());
        assert!(bit_width(0, BitPacking::TwosComplement { width: 65 }).is_err());
        assert_eq!(
            bit_width(i64::MIN, BitPacking::TwosComplement { width: 64 }).unwrap(),
            64
        );
    }

    #[test]
    fn test_pack_minimal_matches_binary_format() {
        let stream = pack(&minimal(&[15, 29, 0, 2])).unwrap();
        assert_eq!(stream.to_bit_string(), "111111101010");
        assert_eq!(stream.len(), 4 + 5 + 1 + 2);
    }

    #[test]
    fn test_pack_twos_complement() {
        let stream = pack(&signed(&[-1, 0, -128, 5])).unwrap();
        assert_eq!(
            stream.to_bit_string(),
            "11111111000000001000000000000101"
        );
    }

    #[test]
    fn test_pack_empty() {
        let stream = pack(&minimal(&[])).unwrap();
        assert!(stream.is_empty());
        assert_eq!(stream.to_bit_string(), "");
    }

    #[test]
    fn test_pack_rejects_out_of_range() {
        assert!(pack(&signed(&[200])).is_err());
        assert!(pack(&minimal(&[3, -4])).is_err());
    }

    #[test]
    fn test_twos_complement_is_injective() {
        let a = pack(&signed(&[-3, 7])).unwrap();
        let b = pack(&signed(&[7, -3])).unwrap();
        let c = pack(&signed(&[-3, 8])).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_from_bits_and_ones() {
        let stream = BitStream::from_bits([1, 0, 7, 0, 1]);
        assert_eq!(stream.as_bits(), &[1, 0, 1, 0, 1]);
        assert_eq!(stream.ones(), 3);
    }

    #[test]
    fn test_packing_display() {
        assert_eq!(BitPacking::Minimal.to_string(), "minimal");
        assert_eq!(
            BitPacking::TWOS_COMPLEMENT_8.to_string(),
            "twos_complement_8"
        );
    }
}
