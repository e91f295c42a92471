//! 64-bit integer marshalling.
//!
//! `LongType` values are 8-byte big-endian two's complement. Two paths are
//! provided and must agree on every input:
//!
//! - the native path, using `i64` byte order directly;
//! - the portable path, which keeps the value as a sign plus two 32-bit
//!   magnitude words and performs the two's-complement negation with 32-bit
//!   operations only (bitwise not, add one, carry into the high word).
//!
//! The `portable-long` feature routes [`encode_long`] and [`decode_long`]
//! through the portable path.

/// Encoded width of a long.
pub const LONG_WIDTH: usize = 8;

const SIGN_BIT: u32 = 0x8000_0000;

/// A 64-bit two's-complement value held as high and low 32-bit words.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LongWords {
    pub high: u32,
    pub low: u32,
}

impl LongWords {
    /// Builds the two's-complement words for a sign and a magnitude.
    ///
    /// The magnitude of `i64::MIN` is `(0x8000_0000, 0)`.
    pub fn from_sign_magnitude(negative: bool, high: u32, low: u32) -> Self {
        let words = Self { high, low };
        if negative {
            words.negate()
        } else {
            words
        }
    }

    /// Splits a signed value into sign and magnitude words.
    pub fn from_i64(value: i64) -> Self {
        let magnitude = value.unsigned_abs();
        Self::from_sign_magnitude(value < 0, (magnitude >> 32) as u32, magnitude as u32)
    }

    /// Two's-complement negation: invert both words, add one to the low word
    /// and carry into the high word on overflow.
    fn negate(self) -> Self {
        let (low, carry) = (!self.low).overflowing_add(1);
        let high = if carry {
            (!self.high).wrapping_add(1)
        } else {
            !self.high
        };
        Self { high, low }
    }

    /// Returns whether the sign bit is set.
    #[inline]
    pub fn is_negative(self) -> bool {
        self.high & SIGN_BIT != 0
    }

    /// Inverse of [`LongWords::from_sign_magnitude`].
    pub fn to_sign_magnitude(self) -> (bool, u32, u32) {
        if self.is_negative() {
            let magnitude = self.negate();
            (true, magnitude.high, magnitude.low)
        } else {
            (false, self.high, self.low)
        }
    }

    /// Reassembles the signed value.
    pub fn to_i64(self) -> i64 {
        let (negative, high, low) = self.to_sign_magnitude();
        let magnitude = (u64::from(high) << 32) | u64::from(low);
        if negative {
            // magnitude 2^63 wraps to i64::MIN, which is its own negation
            (magnitude as i64).wrapping_neg()
        } else {
            magnitude as i64
        }
    }

    /// Writes the words high first, each big-endian.
    pub fn to_be_bytes(self) -> [u8; LONG_WIDTH] {
        let mut out = [0u8; LONG_WIDTH];
        out[..4].copy_from_slice(&self.high.to_be_bytes());
        out[4..].copy_from_slice(&self.low.to_be_bytes());
        out
    }

    /// Reads words written by [`LongWords::to_be_bytes`].
    pub fn from_be_bytes(bytes: [u8; LONG_WIDTH]) -> Self {
        Self {
            high: u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            low: u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        }
    }
}

/// Encodes through 32-bit words.
pub fn encode_long_portable(value: i64) -> [u8; LONG_WIDTH] {
    LongWords::from_i64(value).to_be_bytes()
}

/// Decodes through 32-bit words.
pub fn decode_long_portable(bytes: [u8; LONG_WIDTH]) -> i64 {
    LongWords::from_be_bytes(bytes).to_i64()
}

/// Encodes with native 64-bit arithmetic.
#[inline]
pub fn encode_long_native(value: i64) -> [u8; LONG_WIDTH] {
    value.to_be_bytes()
}

/// Decodes with native 64-bit arithmetic.
#[inline]
pub fn decode_long_native(bytes: [u8; LONG_WIDTH]) -> i64 {
    i64::from_be_bytes(bytes)
}

/// Encodes a long with the path selected at build time.
#[inline]
pub fn encode_long(value: i64) -> [u8; LONG_WIDTH] {
    if cfg!(feature = "portable-long") {
        encode_long_portable(value)
    } else {
        encode_long_native(value)
    }
}

/// Decodes a long with the path selected at build time.
#[inline]
pub fn decode_long(bytes: [u8; LONG_WIDTH]) -> i64 {
    if cfg!(feature = "portable-long") {
        decode_long_portable(bytes)
    } else {
        decode_long_native(bytes)
    }
}
