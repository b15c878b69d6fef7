//! Failure taxonomy and user-facing message classification.
//!
//! Payment failures classify into a fixed set of [`FailureKind`]s, each
//! mapped by [`classify`] to a [`PaymentProblem`]: a fixed user-facing
//! message, a retryable flag, and optional remedial hints. The classifier
//! is the single source of truth for payment-error copy so the surrounding
//! shell never hardcodes it.
//!
//! Errors here are data, never control flow: validators and generators
//! return them immediately and the caller decides what to do. Everything is
//! locally recoverable; nothing in this crate is fatal to the process.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::amount::{Amount, AmountError};
use crate::link::LinkError;
use crate::reference::RefError;
use crate::vpa::VpaError;

/// Machine-readable cause of a payment failure.
///
/// Downstream launch and verification failures are reported by the caller
/// using these symbolic causes; validation failures map onto the same set
/// via [`AsPaymentProblem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum FailureKind {
    /// The payer's bank rejected the amount against its own limits.
    BankLimitExceeded,
    /// Transient connectivity failure.
    NetworkError,
    /// The payee identifier fails the VPA grammar.
    InvalidIdentifier,
    /// Generic rejection by the rail or the payer's app.
    PaymentFailed,
    /// The user-asserted completion never arrived in the caller's window.
    VerificationTimeout,
    /// The payer's account balance could not cover the amount.
    InsufficientBalance,
    /// The amount is non-numeric or outside the configured regime.
    InvalidAmount,
    /// Anything not in the taxonomy.
    Unknown,
}

impl FailureKind {
    /// Returns the canonical snake_case name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BankLimitExceeded => "bank_limit_exceeded",
            Self::NetworkError => "network_error",
            Self::InvalidIdentifier => "invalid_identifier",
            Self::PaymentFailed => "payment_failed",
            Self::VerificationTimeout => "verification_timeout",
            Self::InsufficientBalance => "insufficient_balance",
            Self::InvalidAmount => "invalid_amount",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FailureKind {
    type Err = std::convert::Infallible;

    /// Total: unrecognized causes parse to [`FailureKind::Unknown`] so the
    /// classifier can always produce a generic retryable problem.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "bank_limit_exceeded" | "bank_limit" => Self::BankLimitExceeded,
            "network_error" => Self::NetworkError,
            "invalid_identifier" | "invalid_upi" | "invalid_upi_id" => Self::InvalidIdentifier,
            "payment_failed" | "transaction_failed" => Self::PaymentFailed,
            "verification_timeout" | "timeout" => Self::VerificationTimeout,
            "insufficient_balance" | "insufficient_funds" => Self::InsufficientBalance,
            "invalid_amount" => Self::InvalidAmount,
            _ => Self::Unknown,
        })
    }
}

/// Caller-known circumstances of a failure, woven into the message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FailureContext {
    /// The amount that was being paid, if known.
    pub amount: Option<Amount>,
    /// Which attempt this was (1-based), if the caller is retrying.
    pub attempt: Option<u32>,
}

impl FailureContext {
    /// Context carrying the attempted amount.
    #[must_use]
    pub const fn with_amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Context carrying the attempt ordinal.
    #[must_use]
    pub const fn with_attempt(mut self, attempt: u32) -> Self {
        self.attempt = Some(attempt);
        self
    }
}

/// A structured payment failure with user-facing copy and remedial hints.
///
/// Constructed at the point of failure, returned to the caller, never
/// stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentProblem {
    kind: FailureKind,
    message: String,
    retryable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    suggested_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    suggested_amount: Option<Amount>,
}

impl PaymentProblem {
    /// Creates a problem with the given kind, message and retryability.
    #[must_use]
    pub const fn new(kind: FailureKind, message: String, retryable: bool) -> Self {
        Self {
            kind,
            message,
            retryable,
            suggested_action: None,
            suggested_amount: None,
        }
    }

    /// Sets the suggested next action.
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.suggested_action = Some(action.into());
        self
    }

    /// Sets the suggested remedial amount.
    #[must_use]
    pub const fn with_suggested_amount(mut self, amount: Amount) -> Self {
        self.suggested_amount = Some(amount);
        self
    }

    /// Returns the machine-readable failure kind.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Returns the user-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns whether the caller may retry.
    #[must_use]
    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    /// Returns the suggested next action, if any.
    #[must_use]
    pub fn suggested_action(&self) -> Option<&str> {
        self.suggested_action.as_deref()
    }

    /// Returns the suggested remedial amount, if any.
    #[must_use]
    pub const fn suggested_amount(&self) -> Option<Amount> {
        self.suggested_amount
    }
}

impl fmt::Display for PaymentProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Maps a failure cause and its context to user-facing copy.
///
/// A static lookup: the same cause and context always produce the same
/// problem. Unknown causes map to a generic retryable problem. A known
/// amount refines the bank-limit message and attaches a halved remedial
/// amount (the payer's bank ceiling is not knowable here, so halving is
/// the retry step); a known attempt ordinal is woven into the network
/// message.
#[must_use]
pub fn classify(kind: FailureKind, context: &FailureContext) -> PaymentProblem {
    match kind {
        FailureKind::BankLimitExceeded => {
            let message = context.amount.map_or_else(
                || {
                    "You've exceeded the bank limit for this payment. \
                     Retry with a smaller amount."
                        .to_owned()
                },
                |amount| {
                    format!(
                        "Payment amount {} exceeds your bank limit. \
                         Retry with a smaller amount.",
                        amount.format_inr()
                    )
                },
            );
            let problem = PaymentProblem::new(kind, message, true)
                .with_action("Try splitting the payment or use a different payment method");
            match context.amount {
                Some(amount) => problem.with_suggested_amount(halved(amount)),
                None => problem,
            }
        }
        FailureKind::NetworkError => {
            let message = context.attempt.map_or_else(
                || "Network connection issue. Please check your internet connection.".to_owned(),
                |attempt| {
                    format!(
                        "Network error (attempt {attempt}). \
                         Please check your connection and try again."
                    )
                },
            );
            PaymentProblem::new(kind, message, true)
                .with_action("Check your internet connection and try again")
        }
        FailureKind::InvalidIdentifier => PaymentProblem::new(
            kind,
            "Invalid UPI ID. Please check and enter a valid UPI ID.".to_owned(),
            true,
        )
        .with_action("Verify your UPI ID format (e.g., name@bank)"),
        FailureKind::PaymentFailed => PaymentProblem::new(
            kind,
            "Payment failed. Please try again or contact your bank.".to_owned(),
            true,
        )
        .with_action("Check your account balance and try again"),
        FailureKind::VerificationTimeout => PaymentProblem::new(
            kind,
            "Payment verification timed out. Please verify manually.".to_owned(),
            true,
        )
        .with_action("Check your UPI app for payment status"),
        FailureKind::InsufficientBalance => PaymentProblem::new(
            kind,
            "Insufficient balance in your account.".to_owned(),
            true,
        )
        .with_action("Add money to your account or use a different payment method"),
        FailureKind::InvalidAmount => PaymentProblem::new(
            kind,
            "Invalid payment amount. Please check the amount and try again.".to_owned(),
            true,
        )
        .with_action("Verify the payment amount is correct"),
        FailureKind::Unknown => PaymentProblem::new(
            FailureKind::Unknown,
            "An unexpected payment error occurred.".to_owned(),
            true,
        )
        .with_action("Please try again or contact support"),
    }
}

/// Half the amount, rounded up to paise.
fn halved(amount: Amount) -> Amount {
    Amount::new(
        (amount.value() / Decimal::TWO)
            .round_dp_with_strategy(2, RoundingStrategy::ToPositiveInfinity),
    )
}

/// Conversion from typed validation errors into the shared problem shape.
///
/// Lets the shell surface any failure, whether a local validation error or
/// a caller-reported downstream cause, through the same copy table.
pub trait AsPaymentProblem {
    /// Converts this error into a [`PaymentProblem`].
    fn as_payment_problem(&self) -> PaymentProblem;
}

impl AsPaymentProblem for VpaError {
    fn as_payment_problem(&self) -> PaymentProblem {
        classify(FailureKind::InvalidIdentifier, &FailureContext::default())
    }
}

impl AsPaymentProblem for AmountError {
    /// Keeps the validator's precise message (which names the configured
    /// bound) and carries its suggestion through.
    fn as_payment_problem(&self) -> PaymentProblem {
        let problem = PaymentProblem::new(FailureKind::InvalidAmount, self.to_string(), true)
            .with_action("Verify the payment amount is correct");
        match self {
            Self::AboveMaximum { suggested, .. } => problem.with_suggested_amount(*suggested),
            _ => problem,
        }
    }
}

impl AsPaymentProblem for RefError {
    fn as_payment_problem(&self) -> PaymentProblem {
        PaymentProblem::new(FailureKind::Unknown, self.to_string(), true)
            .with_action("Regenerate the transaction reference and try again")
    }
}

impl AsPaymentProblem for LinkError {
    fn as_payment_problem(&self) -> PaymentProblem {
        match self {
            Self::Identifier(err) => err.as_payment_problem(),
            Self::Amount(err) => err.as_payment_problem(),
            Self::Reference(err) => err.as_payment_problem(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amt(s: &str) -> Amount {
        s.parse().unwrap()
    }

    #[test]
    fn test_every_kind_has_copy_and_is_retryable() {
        let kinds = [
            FailureKind::BankLimitExceeded,
            FailureKind::NetworkError,
            FailureKind::InvalidIdentifier,
            FailureKind::PaymentFailed,
            FailureKind::VerificationTimeout,
            FailureKind::InsufficientBalance,
            FailureKind::InvalidAmount,
            FailureKind::Unknown,
        ];
        for kind in kinds {
            let problem = classify(kind, &FailureContext::default());
            assert!(!problem.message().is_empty(), "{kind}");
            assert!(problem.retryable(), "{kind}");
            assert!(problem.suggested_action().is_some(), "{kind}");
        }
    }

    #[test]
    fn test_unknown_cause_parses_to_generic() {
        let kind: FailureKind = "quantum_flux".parse().unwrap();
        assert_eq!(kind, FailureKind::Unknown);
        let problem = classify(kind, &FailureContext::default());
        assert_eq!(problem.kind(), FailureKind::Unknown);
        assert!(problem.retryable());
    }

    #[test]
    fn test_cause_aliases() {
        assert_eq!(
            "BANK_LIMIT".parse::<FailureKind>().unwrap(),
            FailureKind::BankLimitExceeded
        );
        assert_eq!(
            "insufficient_funds".parse::<FailureKind>().unwrap(),
            FailureKind::InsufficientBalance
        );
        assert_eq!(
            "timeout".parse::<FailureKind>().unwrap(),
            FailureKind::VerificationTimeout
        );
    }

    #[test]
    fn test_bank_limit_weaves_amount() {
        let context = FailureContext::default().with_amount(amt("80000"));
        let problem = classify(FailureKind::BankLimitExceeded, &context);
        assert!(problem.message().contains("₹80,000"), "{}", problem.message());
        assert_eq!(problem.suggested_amount(), Some(amt("40000")));
    }

    #[test]
    fn test_network_weaves_attempt() {
        let context = FailureContext::default().with_attempt(3);
        let problem = classify(FailureKind::NetworkError, &context);
        assert!(problem.message().contains("attempt 3"), "{}", problem.message());
        assert!(problem.suggested_amount().is_none());
    }

    #[test]
    fn test_classification_is_stable() {
        let context = FailureContext::default().with_amount(amt("500"));
        assert_eq!(
            classify(FailureKind::BankLimitExceeded, &context),
            classify(FailureKind::BankLimitExceeded, &context)
        );
    }

    #[test]
    fn test_amount_error_keeps_precise_message() {
        let err = crate::amount::UpiLimits::default()
            .validate(amt("150000"))
            .unwrap_err();
        let problem = err.as_payment_problem();
        assert_eq!(problem.kind(), FailureKind::InvalidAmount);
        assert_eq!(problem.message(), "Maximum amount is ₹1,00,000");
        assert_eq!(problem.suggested_amount(), Some(amt("75000")));
    }

    #[test]
    fn test_vpa_error_uses_classifier_copy() {
        let err = "nope".parse::<crate::vpa::Vpa>().unwrap_err();
        let problem = err.as_payment_problem();
        assert_eq!(problem.kind(), FailureKind::InvalidIdentifier);
        assert_eq!(
            problem.message(),
            "Invalid UPI ID. Please check and enter a valid UPI ID."
        );
    }

    #[test]
    fn test_kind_serde_snake_case() {
        let json = serde_json::to_string(&FailureKind::BankLimitExceeded).unwrap();
        assert_eq!(json, "\"bank_limit_exceeded\"");
        let back: FailureKind = serde_json::from_str("\"verification_timeout\"").unwrap();
        assert_eq!(back, FailureKind::VerificationTimeout);
    }

    #[test]
    fn test_problem_serde_skips_empty_hints() {
        let problem = classify(FailureKind::PaymentFailed, &FailureContext::default());
        let json = serde_json::to_value(&problem).unwrap();
        assert_eq!(json["kind"], "payment_failed");
        assert!(json.get("suggestedAmount").is_none());
        assert!(json["retryable"].as_bool().unwrap());
    }
}
