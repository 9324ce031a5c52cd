//! # Time Quantization
//!
//! OLSR carries validity and emission intervals in a single byte:
//!
//! ```text
//!   7   6   5   4   3   2   1   0
//! ┌───────────────┬───────────────┐
//! │   exponent a  │  mantissa b   │
//! └───────────────┴───────────────┘
//!
//!   seconds = C * 2^a * (1 + b / 16)        C = 1/16 s
//! ```
//!
//! The encoding is lossy: sixteen steps per octave. Every whole second
//! from 1 to 30 is exactly representable.

use std::fmt;
use std::time::Duration;

use crate::error::{WireError, WireResult};

/// Scaling constant `C` in seconds.
pub const OLSR_C: f64 = 0.0625;

/// Smallest representable interval (`0x00`).
pub const MIN_SECONDS: f64 = OLSR_C;

/// Largest representable interval (`0xFF`).
pub const MAX_SECONDS: f64 = OLSR_C * 32768.0 * (1.0 + 15.0 / 16.0);

/// A quantized time interval, stored in its wire form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantum(pub u8);

impl Quantum {
    /// The minimum interval, `C`.
    pub const MIN: Self = Self(0x00);
    /// The maximum interval.
    pub const MAX: Self = Self(0xFF);

    /// Quantizes an interval given in seconds.
    ///
    /// Positive values below `C` clamp to [`Quantum::MIN`].
    ///
    /// # Errors
    ///
    /// Returns [`WireError::QuantizationRange`] for zero, negative, NaN or
    /// values above [`MAX_SECONDS`].
    pub fn from_seconds(seconds: f64) -> WireResult<Self> {
        if !(seconds > 0.0 && seconds <= MAX_SECONDS) {
            return Err(WireError::QuantizationRange { seconds });
        }
        let ratio = seconds / OLSR_C;
        if ratio < 1.0 {
            return Ok(Self::MIN);
        }

        // Largest a with ratio >= 2^a.
        let mut a: u32 = 0;
        while a < 15 && ratio >= f64::from(1u32 << (a + 1)) {
            a += 1;
        }

        let scale = f64::from(1u32 << a);
        let mut b = (16.0 * (ratio / scale - 1.0)).ceil() as u32;
        if b >= 16 {
            a += 1;
            b = 0;
        }
        if a > 15 {
            return Err(WireError::QuantizationRange { seconds });
        }

        Ok(Self(((a as u8) << 4) | (b as u8 & 0x0F)))
    }

    /// Quantizes a [`Duration`].
    ///
    /// # Errors
    ///
    /// Same as [`Quantum::from_seconds`].
    pub fn from_duration(duration: Duration) -> WireResult<Self> {
        Self::from_seconds(duration.as_secs_f64())
    }

    /// Exponent nibble.
    #[inline]
    #[must_use]
    pub const fn exponent(self) -> u8 {
        self.0 >> 4
    }

    /// Mantissa nibble.
    #[inline]
    #[must_use]
    pub const fn mantissa(self) -> u8 {
        self.0 & 0x0F
    }

    /// Interval in seconds. Never negative.
    #[must_use]
    pub fn as_seconds(self) -> f64 {
        let scale = f64::from(1u32 << self.exponent());
        OLSR_C * scale * (1.0 + f64::from(self.mantissa()) / 16.0)
    }

    /// Interval as a [`Duration`].
    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_secs_f64(self.as_seconds())
    }

    /// Raw wire byte.
    #[inline]
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        self.0
    }
}

impl From<u8> for Quantum {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl TryFrom<Duration> for Quantum {
    type Error = WireError;

    fn try_from(value: Duration) -> WireResult<Self> {
        Self::from_duration(value)
    }
}

impl fmt::Display for Quantum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.as_seconds())
    }
}

/// Converts seconds to a wire quantum.
///
/// # Errors
///
/// See [`Quantum::from_seconds`].
pub fn seconds_to_quantum(seconds: f64) -> WireResult<Quantum> {
    Quantum::from_seconds(seconds)
}

/// Converts a wire quantum back to seconds.
#[must_use]
pub fn quantum_to_seconds(quantum: Quantum) -> f64 {
    quantum.as_seconds()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_seconds_round_trip() {
        for time in 1..=30 {
            let seconds = f64::from(time);
            let q = seconds_to_quantum(seconds).unwrap();
            let back = quantum_to_seconds(q);
            assert!(back >= 0.0);
            assert!((back - seconds).abs() <= 0.1, "{seconds}s -> {q:?} -> {back}s");
        }
    }

    #[test]
    fn test_known_encodings() {
        // 1s = C * 2^4
        assert_eq!(Quantum::from_seconds(1.0).unwrap(), Quantum(0x40));
        // 6s = C * 2^6 * (1 + 8/16)
        assert_eq!(Quantum::from_seconds(6.0).unwrap(), Quantum(0x68));
        assert_eq!(Quantum::from_seconds(OLSR_C).unwrap(), Quantum::MIN);
        assert_eq!(Quantum::from_seconds(MAX_SECONDS).unwrap(), Quantum::MAX);
    }

    #[test]
    fn test_monotonic() {
        let mut previous = -1.0;
        for byte in 0..=255u8 {
            let seconds = Quantum(byte).as_seconds();
            assert!(seconds >= previous, "not monotonic at {byte:#04x}");
            previous = seconds;
        }
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(
            Quantum::from_seconds(0.0),
            Err(WireError::QuantizationRange { .. })
        ));
        assert!(Quantum::from_seconds(-3.0).is_err());
        assert!(Quantum::from_seconds(f64::NAN).is_err());
        assert!(Quantum::from_seconds(MAX_SECONDS + 1.0).is_err());
    }

    #[test]
    fn test_below_minimum_clamps() {
        assert_eq!(Quantum::from_seconds(0.01).unwrap(), Quantum::MIN);
    }

    #[test]
    fn test_rounds_up() {
        // 9.3s lies between 9.0 and 9.5 in the 8..16 octave
        let q = Quantum::from_seconds(9.3).unwrap();
        assert!((q.as_seconds() - 9.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_duration_conversion() {
        let q = Quantum::try_from(Duration::from_secs(15)).unwrap();
        assert_eq!(q.as_duration(), Duration::from_secs(15));
    }
}
