//! Rational numbers as stored in TIFF entries.
//!
//! Numerator and denominator are kept exactly as read, without
//! reduction. A zero denominator is legal on disk; conversions treat
//! it as a failed conversion rather than trapping.

/// Unsigned rational: numerator / denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub struct URational {
    pub num: u32,
    pub den: u32,
}

impl URational {
    pub const fn new(num: u32, den: u32) -> Self {
        Self { num, den }
    }

    /// Convert to f64; zero denominator yields `None`.
    pub fn to_f64(self) -> Option<f64> {
        if self.den == 0 {
            None
        } else {
            Some(self.num as f64 / self.den as f64)
        }
    }

    /// Truncating integer division; `None` when the denominator is zero.
    pub fn to_u32(self) -> Option<u32> {
        if self.den == 0 {
            None
        } else {
            Some(self.num / self.den)
        }
    }

    /// Signed view; `None` when the numerator exceeds `i32::MAX`.
    pub fn to_srational(self) -> Option<SRational> {
        let num = i32::try_from(self.num).ok()?;
        let den = i32::try_from(self.den).ok()?;
        Some(SRational::new(num, den))
    }
}

impl std::fmt::Display for URational {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// Signed rational: numerator / denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub struct SRational {
    pub num: i32,
    pub den: i32,
}

impl SRational {
    pub const fn new(num: i32, den: i32) -> Self {
        Self { num, den }
    }

    /// Convert to f64; a denominator of zero yields `None`.
    pub fn to_f64(self) -> Option<f64> {
        if self.den == 0 {
            None
        } else {
            Some(self.num as f64 / self.den as f64)
        }
    }

    /// Truncating integer division.
    ///
    /// `None` for non-positive denominators, matching the policy that
    /// a signed rational with `den <= 0` never converts to an integer.
    pub fn to_i64(self) -> Option<i64> {
        if self.den <= 0 {
            None
        } else {
            Some(self.num as i64 / self.den as i64)
        }
    }

    /// Truncating conversion to u32; negative results are rejected.
    pub fn to_u32(self) -> Option<u32> {
        let v = self.to_i64()?;
        u32::try_from(v).ok()
    }
}

impl std::fmt::Display for SRational {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// Rounded float-to-integer conversion with explicit range check.
///
/// Rounds to nearest; negative inputs and values past `u32::MAX` are
/// conversion failures, never wrapped.
pub fn f64_to_u32(v: f64) -> Option<u32> {
    if !v.is_finite() || v < 0.0 {
        return None;
    }
    let r = v.round();
    if r > u32::MAX as f64 {
        return None;
    }
    Some(r as u32)
}

/// Rounded float-to-i64 conversion with explicit range check.
pub fn f64_to_i64(v: f64) -> Option<i64> {
    if !v.is_finite() {
        return None;
    }
    let r = v.round();
    // i64::MAX is not exactly representable as f64; the cast below is
    // exact for all values strictly inside the checked interval.
    if r < i64::MIN as f64 || r >= i64::MAX as f64 {
        return None;
    }
    Some(r as i64)
}

/// Lossy float-to-rational conversion: truncates to num/1.
pub fn f64_to_srational(v: f64) -> Option<SRational> {
    if !v.is_finite() {
        return None;
    }
    let t = v.trunc();
    if t < i32::MIN as f64 || t > i32::MAX as f64 {
        return None;
    }
    Some(SRational::new(t as i32, 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_denominator_never_traps() {
        assert_eq!(URational::new(5, 0).to_f64(), None);
        assert_eq!(URational::new(5, 0).to_u32(), None);
        assert_eq!(SRational::new(5, 0).to_i64(), None);
        assert_eq!(SRational::new(5, -2).to_i64(), None);
    }

    #[test]
    fn float_to_u32_edges() {
        assert_eq!(f64_to_u32(-0.1), None);
        assert_eq!(f64_to_u32(4.295e9), None);
        assert_eq!(f64_to_u32(0.4), Some(0));
        assert_eq!(f64_to_u32(1.5), Some(2));
        assert_eq!(f64_to_u32(u32::MAX as f64), Some(u32::MAX));
        assert_eq!(f64_to_u32(f64::NAN), None);
        assert_eq!(f64_to_u32(f64::INFINITY), None);
    }

    #[test]
    fn signed_unsigned_crossing() {
        assert_eq!(SRational::new(-4, 2).to_i64(), Some(-2));
        assert_eq!(SRational::new(-4, 2).to_u32(), None);
        assert_eq!(URational::new(u32::MAX, 1).to_srational(), None);
    }

    #[test]
    fn float_to_rational_is_truncating() {
        assert_eq!(f64_to_srational(2.9), Some(SRational::new(2, 1)));
        assert_eq!(f64_to_srational(-2.9), Some(SRational::new(-2, 1)));
        assert_eq!(f64_to_srational(f64::NAN), None);
    }
}
