//! Transaction reference generation and validation.
//!
//! UPI allows a 1-35 character alphanumeric reference (`tr=`) per payment
//! attempt, echoed back by the payer's app and useful when matching a
//! user-asserted confirmation to a booking. References generated here are
//! collision-resistant in practice (timestamp plus random suffix) but are a
//! reconciliation aid, not a security token; the rail's own UTR is the
//! settlement identifier.
//!
//! Each retry of a payment should regenerate a fresh reference unless the
//! caller deliberately pins one.

use rand::RngExt;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::timestamp::UnixMillis;

static REF_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]{1,35}$").expect("reference grammar regex is valid")
});

/// Prefix used by [`TxnRef::generate`].
pub const DEFAULT_REF_PREFIX: &str = "TXN";

const SUFFIX_LEN: usize = 6;
const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A validated transaction reference: 1-35 alphanumeric characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TxnRef(String);

impl TxnRef {
    /// Returns `true` iff the input matches the reference grammar.
    #[must_use]
    pub fn is_valid(input: &str) -> bool {
        REF_GRAMMAR.is_match(input)
    }

    /// Generates a fresh reference with the default `TXN` prefix.
    ///
    /// The shape is `{prefix}{unix-millis}{6-char uppercase base36 suffix}`,
    /// distinct across consecutive calls with overwhelming probability.
    #[must_use]
    pub fn generate() -> Self {
        Self::assemble(DEFAULT_REF_PREFIX)
    }

    /// Generates a fresh reference with a caller-supplied prefix.
    ///
    /// # Errors
    ///
    /// Returns [`RefError`] if the prefix would break the 1-35 alphanumeric
    /// format (non-alphanumeric characters, or too long to leave room for
    /// the timestamp and suffix).
    pub fn generate_with_prefix(prefix: &str) -> Result<Self, RefError> {
        let millis_len = UnixMillis::now().as_millis().to_string().len();
        let budget = 35_usize.saturating_sub(millis_len).saturating_sub(SUFFIX_LEN);
        if prefix.len() > budget || !prefix.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(RefError(prefix.into()));
        }
        Ok(Self::assemble(prefix))
    }

    fn assemble(prefix: &str) -> Self {
        let millis = UnixMillis::now().as_millis().to_string();
        let mut rng = rand::rng();
        let mut value = String::with_capacity(prefix.len() + millis.len() + SUFFIX_LEN);
        value.push_str(prefix);
        value.push_str(&millis);
        for _ in 0..SUFFIX_LEN {
            value.push(char::from(BASE36[rng.random_range(0..BASE36.len())]));
        }
        Self(value)
    }

    /// Returns the reference as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<TxnRef> for String {
    fn from(value: TxnRef) -> Self {
        value.0
    }
}

/// Error returned for a string that fails the reference grammar.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid transaction reference {0:?} (expected 1-35 alphanumeric characters)")]
pub struct RefError(pub String);

impl FromStr for TxnRef {
    type Err = RefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if REF_GRAMMAR.is_match(s) {
            Ok(Self(s.into()))
        } else {
            Err(RefError(s.into()))
        }
    }
}

impl Serialize for TxnRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TxnRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(de::Error::custom)
    }
}
