//! Byte-size units for sizing cache capacity.
//!
//! ```
//! use strcache::units::ByteSize;
//!
//! let capacity = ByteSize::KB * 10;
//! assert_eq!(capacity.as_u128(), 10 * 1024);
//! assert_eq!(capacity.to_string(), "10 KB");
//! ```

use std::fmt;
use std::ops::{Add, Mul};

/// A size in bytes. Wide enough to hold `YB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ByteSize(u128);

impl ByteSize {
    pub const B: ByteSize = ByteSize(1);
    pub const KB: ByteSize = ByteSize(1 << 10);
    pub const MB: ByteSize = ByteSize(1 << 20);
    pub const GB: ByteSize = ByteSize(1 << 30);
    pub const TB: ByteSize = ByteSize(1 << 40);
    pub const PB: ByteSize = ByteSize(1 << 50);
    pub const EB: ByteSize = ByteSize(1 << 60);
    pub const ZB: ByteSize = ByteSize(1 << 70);
    pub const YB: ByteSize = ByteSize(1 << 80);

    const UNITS: [(ByteSize, &'static str); 8] = [
        (Self::YB, "YB"),
        (Self::ZB, "ZB"),
        (Self::EB, "EB"),
        (Self::PB, "PB"),
        (Self::TB, "TB"),
        (Self::GB, "GB"),
        (Self::MB, "MB"),
        (Self::KB, "KB"),
    ];

    pub const fn bytes(n: u64) -> Self {
        Self(n as u128)
    }

    pub const fn as_u128(self) -> u128 {
        self.0
    }

    /// Converts to `usize`, clamping at `usize::MAX`.
    pub fn to_usize_saturating(self) -> usize {
        usize::try_from(self.0).unwrap_or(usize::MAX)
    }
}

impl From<usize> for ByteSize {
    fn from(n: usize) -> Self {
        Self(n as u128)
    }
}

impl Mul<u64> for ByteSize {
    type Output = ByteSize;

    fn mul(self, rhs: u64) -> ByteSize {
        ByteSize(self.0.saturating_mul(u128::from(rhs)))
    }
}

impl Mul<ByteSize> for u64 {
    type Output = ByteSize;

    fn mul(self, rhs: ByteSize) -> ByteSize {
        rhs * self
    }
}

impl Add for ByteSize {
    type Output = ByteSize;

    fn add(self, rhs: ByteSize) -> ByteSize {
        ByteSize(self.0.saturating_add(rhs.0))
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (unit, name) in Self::UNITS {
            if self.0 >= unit.0 && self.0 % unit.0 == 0 {
                return write!(f, "{} {}", self.0 / unit.0, name);
            }
        }
        write!(f, "{} B", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_are_powers_of_1024() {
        assert_eq!(ByteSize::KB.as_u128(), 1024);
        assert_eq!(ByteSize::MB.as_u128(), 1024 * 1024);
        assert_eq!(ByteSize::YB.as_u128(), 1024u128.pow(8));
        assert_eq!((10 * ByteSize::KB).as_u128(), 10 * 1024);
    }

    #[test]
    fn saturating_conversion() {
        assert_eq!((ByteSize::KB * 3).to_usize_saturating(), 3 * 1024);
        assert_eq!(ByteSize::YB.to_usize_saturating(), usize::MAX);
        assert_eq!(ByteSize::from(7usize), ByteSize::bytes(7));
    }

    #[test]
    fn display_picks_largest_exact_unit() {
        assert_eq!(ByteSize::bytes(0).to_string(), "0 B");
        assert_eq!(ByteSize::bytes(1536).to_string(), "1536 B");
        assert_eq!((ByteSize::MB * 2).to_string(), "2 MB");
        assert_eq!((ByteSize::GB * 1024).to_string(), "1 TB");
        assert_eq!((ByteSize::KB + ByteSize::B).to_string(), "1025 B");
    }
}
