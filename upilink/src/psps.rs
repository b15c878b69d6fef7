//! Registry of well-known UPI payment service providers.
//!
//! The PSP is the suffix of a VPA (`user@ybl` resolves through PhonePe).
//! This registry backs display names and handle autocomplete; it is not a
//! validity oracle — a VPA with an unlisted PSP is still grammatically
//! valid and may resolve fine on the rail.

use crate::vpa::Vpa;

/// A known payment service provider handle suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PspInfo {
    /// Handle suffix (e.g., "ybl").
    pub code: &'static str,
    /// App or bank name shown to users (e.g., "PhonePe").
    pub name: &'static str,
    /// Example VPA for placeholder text.
    pub example: &'static str,
}

/// Popular PSP handles, ordered roughly by market share.
pub static KNOWN_PSPS: &[PspInfo] = &[
    PspInfo {
        code: "ybl",
        name: "PhonePe",
        example: "user@ybl",
    },
    PspInfo {
        code: "paytm",
        name: "Paytm",
        example: "user@paytm",
    },
    PspInfo {
        code: "oksbi",
        name: "SBI Pay",
        example: "user@oksbi",
    },
    PspInfo {
        code: "okaxis",
        name: "Axis Pay",
        example: "user@okaxis",
    },
    PspInfo {
        code: "okicici",
        name: "iMobile Pay",
        example: "user@okicici",
    },
    PspInfo {
        code: "okhdfcbank",
        name: "HDFC Bank",
        example: "user@okhdfcbank",
    },
    PspInfo {
        code: "upi",
        name: "BHIM UPI",
        example: "user@upi",
    },
    PspInfo {
        code: "gpay",
        name: "Google Pay",
        example: "user@gpay",
    },
];

/// Maximum number of autocomplete suggestions returned.
const SUGGESTION_LIMIT: usize = 5;

/// Looks up a PSP by its handle suffix, case-insensitively.
#[must_use]
pub fn psp_by_code(code: &str) -> Option<&'static PspInfo> {
    KNOWN_PSPS
        .iter()
        .find(|psp| psp.code.eq_ignore_ascii_case(code))
}

/// Completes a partial handle into full VPAs on popular PSPs.
///
/// Returns nothing for empty input or input that already names a PSP
/// (contains `@`); otherwise the first few `input@code` candidates.
#[must_use]
pub fn suggestions(input: &str) -> Vec<String> {
    let input = input.trim();
    if input.is_empty() || input.contains('@') {
        return Vec::new();
    }
    KNOWN_PSPS
        .iter()
        .take(SUGGESTION_LIMIT)
        .map(|psp| format!("{input}@{}", psp.code))
        .collect()
}

impl Vpa {
    /// Returns registry info for this address's PSP, if it is a known one.
    #[must_use]
    pub fn psp_info(&self) -> Option<&'static PspInfo> {
        psp_by_code(self.psp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(psp_by_code("ybl").unwrap().name, "PhonePe");
        assert_eq!(psp_by_code("YBL").unwrap().name, "PhonePe");
        assert!(psp_by_code("mysterybank").is_none());
    }

    #[test]
    fn test_vpa_psp_info() {
        let vpa: Vpa = "user@Paytm".parse().unwrap();
        assert_eq!(vpa.psp_info().unwrap().name, "Paytm");

        let vpa: Vpa = "user@obscure".parse().unwrap();
        assert!(vpa.psp_info().is_none());
    }

    #[test]
    fn test_suggestions_complete_partial_handle() {
        let got = suggestions("ravi");
        assert_eq!(got.len(), SUGGESTION_LIMIT);
        assert_eq!(got[0], "ravi@ybl");
        assert!(got.iter().all(|s| Vpa::is_valid(s)));
    }

    #[test]
    fn test_suggestions_skip_complete_input() {
        assert!(suggestions("ravi@ybl").is_empty());
        assert!(suggestions("").is_empty());
        assert!(suggestions("   ").is_empty());
    }

    #[test]
    fn test_examples_are_valid_vpas() {
        for psp in KNOWN_PSPS {
            assert!(Vpa::is_valid(psp.example), "{}", psp.code);
        }
    }
}
