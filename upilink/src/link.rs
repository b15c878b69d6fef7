//! `upi://pay` payment intent links.
//!
//! A payment intent link is the deep link handed to a UPI app: scheme
//! `upi`, authority `pay`, and a fixed query parameter set (`pa` payee
//! address, `pn` payee name, `am` amount, `cu` currency, `tn` note, and
//! optionally `tr` reference and `mc` merchant category code). Field names
//! and the scheme/authority are fixed by NPCI convention and must not be
//! altered.
//!
//! Generation is deterministic: identical inputs, including the same pinned
//! reference, produce byte-identical URIs. A link represents a single
//! payment attempt and is not reused across attempts; retries regenerate a
//! fresh reference unless the caller pins one.
//!
//! # Example
//!
//! ```rust
//! use upilink::amount::{Amount, UpiLimits};
//! use upilink::link::PaymentIntent;
//!
//! let intent = PaymentIntent::checked(
//!     &UpiLimits::default(),
//!     "user@paytm",
//!     Amount::from(250_u64),
//!     "Compere Movies",
//!     "Inception - Movie Booking",
//!     Some("TXN123"),
//! )?;
//! assert!(intent.to_uri().starts_with("upi://pay?pa=user%40paytm"));
//! # Ok::<(), upilink::link::LinkError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use url::Url;
use url::form_urlencoded;

use crate::CURRENCY;
use crate::amount::{Amount, AmountError, UpiLimits};
use crate::reference::{RefError, TxnRef};
use crate::vpa::{Vpa, VpaError};

/// NPCI merchant category code for motion-picture / entertainment payees.
pub const MCC_ENTERTAINMENT: &str = "5411";

/// A single UPI payment attempt, convertible to and from its URI form.
///
/// Free-text fields (payee name, note) are sanitized on construction:
/// characters that could corrupt query syntax (`&`, `=`, `?`, `#`) are
/// stripped and surrounding whitespace trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    pay_to: Vpa,
    payee_name: String,
    amount: Amount,
    note: String,
    reference: Option<TxnRef>,
    merchant_code: Option<String>,
}

impl PaymentIntent {
    /// Creates an intent from already-validated parts.
    ///
    /// The amount is taken as-is here; use [`Self::checked`] to apply a
    /// limit regime to untrusted input.
    #[must_use]
    pub fn new(pay_to: Vpa, amount: Amount, payee_name: &str) -> Self {
        Self {
            pay_to,
            payee_name: sanitize(payee_name),
            amount,
            note: String::new(),
            reference: None,
            merchant_code: None,
        }
    }

    /// Sets the transaction note shown in the payer's app.
    #[must_use]
    pub fn with_note(mut self, note: &str) -> Self {
        self.note = sanitize(note);
        self
    }

    /// Pins the transaction reference (`tr`).
    #[must_use]
    pub fn with_reference(mut self, reference: TxnRef) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Sets the merchant category code (`mc`).
    #[must_use]
    pub fn with_merchant_code(mut self, code: impl Into<String>) -> Self {
        self.merchant_code = Some(code.into());
        self
    }

    /// Assembles an intent from untrusted caller input, validating the
    /// payee identifier against the VPA grammar, the amount against the
    /// given limit regime, and the reference (when supplied) against the
    /// reference grammar.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Identifier`], [`LinkError::Amount`] or
    /// [`LinkError::Reference`] for the failing input.
    pub fn checked(
        limits: &UpiLimits,
        payee: &str,
        amount: Amount,
        payee_name: &str,
        note: &str,
        reference: Option<&str>,
    ) -> Result<Self, LinkError> {
        let pay_to: Vpa = payee.parse()?;
        limits.validate(amount)?;
        let reference = reference.map(TxnRef::from_str).transpose()?;

        #[cfg(feature = "telemetry")]
        tracing::debug!(payee = %pay_to, %amount, "validated payment intent inputs");

        let mut intent = Self::new(pay_to, amount, payee_name).with_note(note);
        intent.reference = reference;
        Ok(intent)
    }

    /// Renders the `upi://pay` URI.
    ///
    /// Parameters appear in the fixed order `pa`, `pn`, `am`, `cu`, `tn`,
    /// then `tr` and `mc` when present; the amount carries exactly two
    /// decimal places and all values are form-encoded.
    #[must_use]
    pub fn to_uri(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("pa", &self.pay_to.to_string());
        query.append_pair("pn", &self.payee_name);
        query.append_pair("am", &self.amount.to_string());
        query.append_pair("cu", CURRENCY);
        query.append_pair("tn", &self.note);
        if let Some(reference) = &self.reference {
            query.append_pair("tr", reference.as_str());
        }
        if let Some(code) = &self.merchant_code {
            query.append_pair("mc", code);
        }
        format!("upi://pay?{}", query.finish())
    }

    /// Recovers an intent from a `upi://pay` URI.
    ///
    /// Returns `None` for anything that is not a well-formed link of this
    /// shape: wrong scheme or authority, missing `pa`/`pn`/`am`, an
    /// unparseable amount, or a `pa`/`tr` value failing its own grammar.
    /// A parsed intent therefore upholds the same invariants as a
    /// constructed one. The limit regime is deliberately not applied; the
    /// caller decides whether a foreign link's amount is payable.
    #[must_use]
    pub fn parse(uri: &str) -> Option<Self> {
        let url = Url::parse(uri).ok()?;
        if url.scheme() != "upi" || url.host_str() != Some("pay") {
            return None;
        }

        let mut pa = None;
        let mut pn = None;
        let mut am = None;
        let mut tn = None;
        let mut tr = None;
        let mut mc = None;
        for (key, value) in url.query_pairs() {
            let value = value.into_owned();
            match key.as_ref() {
                "pa" => pa = Some(value),
                "pn" => pn = Some(value),
                "am" => am = Some(value),
                "tn" => tn = Some(value),
                "tr" => tr = Some(value),
                "mc" => mc = Some(value),
                _ => {}
            }
        }

        let pay_to: Vpa = pa?.parse().ok()?;
        let amount: Amount = am?.parse().ok()?;
        let reference = match tr {
            Some(raw) => Some(raw.parse().ok()?),
            None => None,
        };
        Some(Self {
            pay_to,
            payee_name: pn?,
            amount,
            note: tn.unwrap_or_default(),
            reference,
            merchant_code: mc,
        })
    }

    /// Returns the payee address.
    #[must_use]
    pub fn pay_to(&self) -> &Vpa {
        &self.pay_to
    }

    /// Returns the sanitized payee display name.
    #[must_use]
    pub fn payee_name(&self) -> &str {
        &self.payee_name
    }

    /// Returns the amount.
    #[must_use]
    pub const fn amount(&self) -> Amount {
        self.amount
    }

    /// Returns the sanitized transaction note.
    #[must_use]
    pub fn note(&self) -> &str {
        &self.note
    }

    /// Returns the transaction reference, if pinned.
    #[must_use]
    pub fn reference(&self) -> Option<&TxnRef> {
        self.reference.as_ref()
    }

    /// Returns the merchant category code, if set.
    #[must_use]
    pub fn merchant_code(&self) -> Option<&str> {
        self.merchant_code.as_deref()
    }
}

impl fmt::Display for PaymentIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uri())
    }
}

/// Generates a `upi://pay` URI in one call.
///
/// Convenience over [`PaymentIntent::checked`] + [`PaymentIntent::to_uri`]
/// for callers that only want the string.
///
/// # Errors
///
/// Returns [`LinkError`] when the payee identifier, amount, or reference
/// fails validation.
pub fn payment_link(
    limits: &UpiLimits,
    payee: &str,
    amount: Amount,
    payee_name: &str,
    note: &str,
    reference: Option<&str>,
) -> Result<String, LinkError> {
    PaymentIntent::checked(limits, payee, amount, payee_name, note, reference)
        .map(|intent| intent.to_uri())
}

/// Why a link could not be assembled.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum LinkError {
    /// The payee identifier fails the VPA grammar.
    #[error("{0}")]
    Identifier(#[from] VpaError),

    /// The amount fails the configured limit regime.
    #[error("{0}")]
    Amount(#[from] AmountError),

    /// The supplied reference fails the reference grammar.
    #[error("{0}")]
    Reference(#[from] RefError),
}

fn sanitize(field: &str) -> String {
    field
        .chars()
        .filter(|c| !matches!(c, '&' | '=' | '?' | '#'))
        .collect::<String>()
        .trim()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking_intent() -> PaymentIntent {
        PaymentIntent::checked(
            &UpiLimits::default(),
            "user@paytm",
            Amount::from(250_u64),
            "Compere Movies",
            "Inception - Movie Booking",
            Some("TXN123"),
        )
        .unwrap()
    }

    #[test]
    fn test_booking_scenario_uri() {
        let uri = booking_intent().to_uri();
        assert_eq!(
            uri,
            "upi://pay?pa=user%40paytm&pn=Compere+Movies&am=250.00&cu=INR\
             &tn=Inception+-+Movie+Booking&tr=TXN123"
        );
    }

    #[test]
    fn test_invalid_identifier() {
        let err = PaymentIntent::checked(
            &UpiLimits::default(),
            "bad id",
            Amount::from(250_u64),
            "Payee",
            "note",
            None,
        )
        .unwrap_err();
        assert!(matches!(err, LinkError::Identifier(_)));
    }

    #[test]
    fn test_invalid_amount() {
        let err = PaymentIntent::checked(
            &UpiLimits::default(),
            "user@paytm",
            Amount::from(150_000_u64),
            "Payee",
            "note",
            None,
        )
        .unwrap_err();
        assert!(matches!(err, LinkError::Amount(_)));
        assert_eq!(err.to_string(), "Maximum amount is ₹1,00,000");
    }

    #[test]
    fn test_invalid_reference() {
        let err = PaymentIntent::checked(
            &UpiLimits::default(),
            "user@paytm",
            Amount::from(250_u64),
            "Payee",
            "note",
            Some("has spaces"),
        )
        .unwrap_err();
        assert!(matches!(err, LinkError::Reference(_)));
    }

    #[test]
    fn test_sanitizes_name_and_note() {
        let intent = PaymentIntent::checked(
            &UpiLimits::default(),
            "user@paytm",
            Amount::from(10_u64),
            "  A&B=C Cinemas ",
            " popcorn?#combo ",
            None,
        )
        .unwrap();
        assert_eq!(intent.payee_name(), "ABC Cinemas");
        assert_eq!(intent.note(), "popcorncombo");
    }

    #[test]
    fn test_generation_is_idempotent() {
        assert_eq!(booking_intent().to_uri(), booking_intent().to_uri());
    }

    #[test]
    fn test_roundtrip() {
        let intent = booking_intent();
        let parsed = PaymentIntent::parse(&intent.to_uri()).unwrap();
        assert_eq!(parsed, intent);
        assert_eq!(parsed.pay_to().to_string(), "user@paytm");
        assert_eq!(parsed.amount(), Amount::from(250_u64));
        assert_eq!(parsed.payee_name(), "Compere Movies");
        assert_eq!(parsed.note(), "Inception - Movie Booking");
        assert_eq!(parsed.reference().unwrap().as_str(), "TXN123");
    }

    #[test]
    fn test_roundtrip_with_merchant_code() {
        let vpa: Vpa = "cinema@okaxis".parse().unwrap();
        let intent = PaymentIntent::new(vpa, Amount::from(499_u64), "Cinema")
            .with_note("2 tickets")
            .with_merchant_code(MCC_ENTERTAINMENT);
        let parsed = PaymentIntent::parse(&intent.to_uri()).unwrap();
        assert_eq!(parsed.merchant_code(), Some(MCC_ENTERTAINMENT));
        assert_eq!(parsed, intent);
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        assert!(PaymentIntent::parse("not a uri at all").is_none());
        assert!(
            PaymentIntent::parse("https://pay?pa=user%40paytm&pn=X&am=1.00").is_none(),
            "wrong scheme"
        );
        assert!(
            PaymentIntent::parse("upi://collect?pa=user%40paytm&pn=X&am=1.00").is_none(),
            "wrong authority"
        );
        assert!(
            PaymentIntent::parse("upi://pay?pn=X&am=1.00").is_none(),
            "missing payee"
        );
        assert!(
            PaymentIntent::parse("upi://pay?pa=user%40paytm&am=1.00").is_none(),
            "missing name"
        );
        assert!(
            PaymentIntent::parse("upi://pay?pa=user%40paytm&pn=X").is_none(),
            "missing amount"
        );
        assert!(
            PaymentIntent::parse("upi://pay?pa=user%40paytm&pn=X&am=abc").is_none(),
            "bad amount"
        );
        assert!(
            PaymentIntent::parse("upi://pay?pa=nope&pn=X&am=1.00").is_none(),
            "bad payee"
        );
        assert!(
            PaymentIntent::parse("upi://pay?pa=user%40paytm&pn=X&am=1.00&tr=a b").is_none(),
            "bad reference"
        );
    }

    #[test]
    fn test_parse_defaults_missing_note() {
        let parsed = PaymentIntent::parse("upi://pay?pa=user%40paytm&pn=X&am=1.00").unwrap();
        assert_eq!(parsed.note(), "");
    }

    #[test]
    fn test_payment_link_convenience() {
        let uri = payment_link(
            &UpiLimits::default(),
            "user@ybl",
            Amount::from(99_u64),
            "Stall",
            "chai",
            None,
        )
        .unwrap();
        assert!(uri.starts_with("upi://pay?pa=user%40ybl&pn=Stall&am=99.00&cu=INR&tn=chai"));
    }
}
