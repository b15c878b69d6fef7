//! User-asserted payment confirmation and launch strategies.
//!
//! Money moves in a third-party UPI app, outside this system. What comes
//! back is a user assertion: "I paid, here is the reference". This module
//! carries that assertion as a typed record and models how the shell asks
//! for it — redirect into a UPI app on mobile, clipboard/QR on desktop, or
//! a screenshot upload verified by an operator. The strategies are pure
//! values; performing the launch (OS intent, clipboard write, rendering)
//! stays with the platform shell.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::amount::Amount;
use crate::link::PaymentIntent;
use crate::timestamp::UnixMillis;
use crate::vpa::Vpa;

/// Outcome the payer asserted for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// The payer reports the payment went through.
    Success,
    /// The payer reports the payment failed.
    Failed,
    /// Awaiting the payer's assertion.
    Pending,
}

/// A user-asserted completion record, handed by the shell to its booking
/// store. This crate never persists it.
///
/// # JSON Format
///
/// ```json
/// {
///   "transactionId": "TXN1699999999000A1B2C3",
///   "bankReference": "425712345678",
///   "amount": "250.00",
///   "timestamp": "1699999999000",
///   "upiId": "user@paytm",
///   "status": "SUCCESS"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    /// The reference the payer echoed back, normally the link's `tr`.
    pub transaction_id: String,

    /// Bank-assigned UTR, when the payer supplies one as proof.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_reference: Option<String>,

    /// Amount the payer claims to have paid.
    pub amount: Amount,

    /// When the assertion was recorded.
    pub timestamp: UnixMillis,

    /// The payee address the payment was sent to.
    pub upi_id: Vpa,

    /// Asserted outcome.
    pub status: PaymentStatus,
}

impl PaymentConfirmation {
    /// Returns `true` when the record carries enough to act on: a
    /// non-empty reference and a positive amount.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.transaction_id.trim().is_empty() && self.amount > Amount::from(0_u64)
    }

    /// Returns `true` for a complete record asserting success.
    #[must_use]
    pub fn is_successful(&self) -> bool {
        self.is_complete() && self.status == PaymentStatus::Success
    }
}

/// Where the shell is running, for picking a default strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// A device that can open `upi://` intents directly.
    Mobile,
    /// A browser/desktop without UPI intent handling.
    Desktop,
}

/// How the shell asks the payer to complete and confirm payment.
///
/// All four flows consume the same [`PaymentIntent`] contract; the choice
/// is presentation, not semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationStrategy {
    /// Open the link as an OS intent and wait for the payer's assertion.
    DirectRedirect,
    /// Copy the link for the payer to paste into a UPI app.
    ClipboardCopy,
    /// Render the link as a QR code for a phone to scan.
    QrDisplay,
    /// Show payment details and collect a screenshot for operator review.
    ScreenshotUpload,
}

impl ConfirmationStrategy {
    /// The default strategy for a platform: redirect where intents work,
    /// clipboard where they don't.
    #[must_use]
    pub const fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Mobile => Self::DirectRedirect,
            Platform::Desktop => Self::ClipboardCopy,
        }
    }

    /// The action the shell must perform to run this strategy for one
    /// intent.
    #[must_use]
    pub fn action(&self, intent: &PaymentIntent) -> LaunchAction {
        let uri = intent.to_uri();
        match self {
            Self::DirectRedirect => LaunchAction::OpenUri(uri),
            Self::ClipboardCopy => LaunchAction::CopyText(uri),
            Self::QrDisplay => LaunchAction::RenderQr(uri),
            Self::ScreenshotUpload => LaunchAction::AwaitUpload(uri),
        }
    }
}

/// A platform-side effect the shell performs with a generated link.
///
/// From this crate's point of view the launch is fire-and-forget; its
/// success/failure comes back, if at all, as a symbolic cause for
/// [`classify`](crate::error::classify).
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LaunchAction {
    /// Open the URI as an OS-level intent.
    OpenUri(String),
    /// Put the URI on the clipboard and tell the payer.
    CopyText(String),
    /// Render the URI as a QR code.
    RenderQr(String),
    /// Display the URI and collect proof-of-payment for review.
    AwaitUpload(String),
}

/// Base delay before the first retry.
const RETRY_BASE: Duration = Duration::from_secs(1);

/// Ceiling on the retry delay.
const RETRY_CAP: Duration = Duration::from_secs(30);

/// Exponential backoff schedule for caller-driven retries, capped at 30
/// seconds. Attempt 0 is the first retry.
///
/// The crate performs no retries itself; a retry is the caller re-invoking
/// the generator (usually with a fresh reference) after this delay.
#[must_use]
pub fn retry_delay(attempt: u32) -> Duration {
    RETRY_BASE
        .saturating_mul(2_u32.saturating_pow(attempt))
        .min(RETRY_CAP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::UpiLimits;

    fn confirmation() -> PaymentConfirmation {
        PaymentConfirmation {
            transaction_id: "TXN1699999999000A1B2C3".into(),
            bank_reference: Some("425712345678".into()),
            amount: Amount::from(250_u64),
            timestamp: UnixMillis::from_millis(1_699_999_999_000),
            upi_id: "user@paytm".parse().unwrap(),
            status: PaymentStatus::Success,
        }
    }

    #[test]
    fn test_confirmation_completeness() {
        assert!(confirmation().is_complete());
        assert!(confirmation().is_successful());

        let mut missing_ref = confirmation();
        missing_ref.transaction_id = "   ".into();
        assert!(!missing_ref.is_complete());

        let mut zero_amount = confirmation();
        zero_amount.amount = Amount::from(0_u64);
        assert!(!zero_amount.is_complete());

        let mut pending = confirmation();
        pending.status = PaymentStatus::Pending;
        assert!(pending.is_complete());
        assert!(!pending.is_successful());
    }

    #[test]
    fn test_confirmation_wire_format() {
        let json = serde_json::to_value(confirmation()).unwrap();
        assert_eq!(json["transactionId"], "TXN1699999999000A1B2C3");
        assert_eq!(json["bankReference"], "425712345678");
        assert_eq!(json["amount"], "250.00");
        assert_eq!(json["timestamp"], "1699999999000");
        assert_eq!(json["upiId"], "user@paytm");
        assert_eq!(json["status"], "SUCCESS");

        let back: PaymentConfirmation = serde_json::from_value(json).unwrap();
        assert_eq!(back, confirmation());
    }

    #[test]
    fn test_platform_defaults() {
        assert_eq!(
            ConfirmationStrategy::for_platform(Platform::Mobile),
            ConfirmationStrategy::DirectRedirect
        );
        assert_eq!(
            ConfirmationStrategy::for_platform(Platform::Desktop),
            ConfirmationStrategy::ClipboardCopy
        );
    }

    #[test]
    fn test_every_strategy_consumes_the_same_intent() {
        let intent = PaymentIntent::checked(
            &UpiLimits::default(),
            "user@ybl",
            Amount::from(250_u64),
            "Compere Movies",
            "Inception",
            None,
        )
        .unwrap();
        let uri = intent.to_uri();

        assert_eq!(
            ConfirmationStrategy::DirectRedirect.action(&intent),
            LaunchAction::OpenUri(uri.clone())
        );
        assert_eq!(
            ConfirmationStrategy::ClipboardCopy.action(&intent),
            LaunchAction::CopyText(uri.clone())
        );
        assert_eq!(
            ConfirmationStrategy::QrDisplay.action(&intent),
            LaunchAction::RenderQr(uri.clone())
        );
        assert_eq!(
            ConfirmationStrategy::ScreenshotUpload.action(&intent),
            LaunchAction::AwaitUpload(uri)
        );
    }

    #[test]
    fn test_retry_delay_grows_and_caps() {
        assert_eq!(retry_delay(0), Duration::from_secs(1));
        assert_eq!(retry_delay(1), Duration::from_secs(2));
        assert_eq!(retry_delay(3), Duration::from_secs(8));
        assert_eq!(retry_delay(5), Duration::from_secs(30));
        assert_eq!(retry_delay(40), Duration::from_secs(30));
    }
}
