//! Virtual payment address (VPA) validation for UPI identifiers.
//!
//! A VPA is the `handle@psp` identifier that addresses a payee on the UPI
//! rail, e.g. `user@paytm` or `9876543210@ybl`. The NPCI grammar allows a
//! handle of 2-256 characters drawn from letters, digits, `.`, `_` and `-`,
//! followed by `@` and a 2-64 character alphabetic PSP code.
//!
//! Validation trims surrounding whitespace and preserves the original case;
//! UPI resolution is case-insensitive, so [`Vpa::normalized`] and
//! [`Vpa::eq_ignore_case`] are provided for display and comparison.
//!
//! # Serialization
//!
//! Serializes to/from the joined string form: `"user@paytm"`

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

static VPA_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._-]{2,256}@[A-Za-z]{2,64}$").expect("VPA grammar regex is valid")
});

/// A validated UPI virtual payment address.
///
/// Construction goes through [`FromStr`], which enforces the NPCI grammar,
/// so a held `Vpa` is always well-formed. The original case of the input is
/// preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Vpa {
    handle: String,
    psp: String,
}

impl Vpa {
    /// Returns `true` iff the input, after trimming surrounding whitespace,
    /// matches the NPCI VPA grammar.
    ///
    /// Total over any string: empty or malformed input yields `false`,
    /// never an error.
    #[must_use]
    pub fn is_valid(input: &str) -> bool {
        VPA_GRAMMAR.is_match(input.trim())
    }

    /// Returns the handle component (the part before `@`).
    #[must_use]
    pub fn handle(&self) -> &str {
        &self.handle
    }

    /// Returns the PSP code (the part after `@`).
    #[must_use]
    pub fn psp(&self) -> &str {
        &self.psp
    }

    /// Consumes the address and returns its (handle, psp) components.
    #[must_use]
    pub fn into_parts(self) -> (String, String) {
        (self.handle, self.psp)
    }

    /// Returns the lowercased form used for display and storage keys.
    ///
    /// UPI resolution is case-insensitive; validation preserves case but
    /// anything user-facing should show the normalized form.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.to_string().to_lowercase()
    }

    /// Case-insensitive equality, the recommended comparison between VPAs.
    #[must_use]
    pub fn eq_ignore_case(&self, other: &Self) -> bool {
        self.handle.eq_ignore_ascii_case(&other.handle)
            && self.psp.eq_ignore_ascii_case(&other.psp)
    }
}

impl fmt::Display for Vpa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.handle, self.psp)
    }
}

impl From<Vpa> for String {
    fn from(value: Vpa) -> Self {
        value.to_string()
    }
}

/// Error returned when parsing a string that fails the VPA grammar.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid UPI id format: {0:?} (expected handle@psp, e.g. user@paytm)")]
pub struct VpaError(pub String);

impl FromStr for Vpa {
    type Err = VpaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if !VPA_GRAMMAR.is_match(trimmed) {
            return Err(VpaError(s.into()));
        }
        // The grammar guarantees exactly one '@' outside the handle class.
        let (handle, psp) = trimmed.split_once('@').ok_or_else(|| VpaError(s.into()))?;
        Ok(Self {
            handle: handle.into(),
            psp: psp.into(),
        })
    }
}

impl Serialize for Vpa {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Vpa {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(de::Error::custom)
    }
}
