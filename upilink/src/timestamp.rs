//! Epoch-millisecond instants for references and confirmations.
//!
//! This module provides the [`UnixMillis`] type used when generating
//! transaction references and when recording the instant a payer asserted
//! completion. Milliseconds match the granularity UPI apps report and keep
//! consecutive reference generations distinct in practice.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::time::SystemTime;

/// Milliseconds since the Unix epoch (1970-01-01T00:00:00Z).
///
/// # Serialization
///
/// Serialized as a stringified integer to avoid loss of precision in JSON,
/// since `JavaScript`'s `Number` type cannot safely represent all 64-bit
/// integers.
///
/// ```json
/// "1699999999000"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Ord, Eq, Hash)]
pub struct UnixMillis(u64);

impl Serialize for UnixMillis {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for UnixMillis {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let millis = s
            .parse::<u64>()
            .map_err(|_| serde::de::Error::custom("timestamp must be a non-negative integer"))?;
        Ok(Self(millis))
    }
}

impl Display for UnixMillis {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl UnixMillis {
    /// Creates a [`UnixMillis`] from a raw millisecond value.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Returns the current system time as a [`UnixMillis`].
    ///
    /// # Panics
    ///
    /// Panics if the system clock is set to a time before the Unix epoch,
    /// which should never happen on properly configured systems.
    #[must_use]
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .expect("SystemTime before UNIX epoch?!?")
            .as_millis();
        // u128 only overflows u64 half a billion years from now.
        Self(u64::try_from(millis).unwrap_or(u64::MAX))
    }

    /// Returns the raw milliseconds since the Unix epoch.
    #[must_use]
    pub const fn as_millis(&self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_as_string() {
        let ts = UnixMillis::from_millis(1_699_999_999_000);
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"1699999999000\"");
        let back: UnixMillis = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }

    #[test]
    fn test_deserialize_rejects_non_numeric() {
        let result: Result<UnixMillis, _> = serde_json::from_str("\"soon\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_now_is_after_2024() {
        assert!(UnixMillis::now().as_millis() > 1_704_067_200_000);
    }
}
