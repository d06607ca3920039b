//! LAG (link aggregation group) identifier type.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

/// A link-aggregation group identifier.
///
/// LAG id `0` is reserved and always means "no LAG"; the fabric uses it to
/// mark free slots in the live-id pool, so it can never name a real group.
///
/// # Examples
///
/// ```
/// use switchfab_types::LagId;
///
/// let lag = LagId::new(7).unwrap();
/// assert_eq!(lag.as_u32(), 7);
///
/// assert!(LagId::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct LagId(NonZeroU32);

impl LagId {
    /// Creates a new LAG id.
    ///
    /// # Errors
    ///
    /// Returns an error for the reserved id `0`.
    pub fn new(id: u32) -> Result<Self, ParseError> {
        NonZeroU32::new(id).map(LagId).ok_or(ParseError::InvalidLagId)
    }

    /// Returns the raw id value.
    pub const fn as_u32(&self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for LagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for LagId {
    type Error = ParseError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        LagId::new(id)
    }
}

impl From<LagId> for u32 {
    fn from(lag: LagId) -> u32 {
        lag.as_u32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_zero_is_reserved() {
        assert!(LagId::new(0).is_err());
    }

    #[test]
    fn test_roundtrip() {
        let lag = LagId::new(10).unwrap();
        assert_eq!(lag.as_u32(), 10);
        assert_eq!(u32::from(lag), 10);
        assert_eq!(lag.to_string(), "10");
    }
}
