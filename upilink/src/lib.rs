#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types for NPCI-style UPI deep-link payments.
//!
//! This crate provides the foundational types for building and validating
//! `upi://pay` payment intent links, the deep-link format consumed by UPI
//! apps (GPay, PhonePe, Paytm, BHIM, ...). It is designed to sit underneath
//! a booking or checkout shell: the shell supplies plain values (a payee
//! identifier, an amount, a note) and receives plain values back (a URI
//! string, a validation verdict, an error descriptor). There is no I/O, no
//! shared state, and no dependency on any UI or storage layer.
//!
//! # Overview
//!
//! A caller validates a payee [`Vpa`](vpa::Vpa) and an
//! [`Amount`](amount::Amount) against a configured
//! [`UpiLimits`](amount::UpiLimits) regime, assembles a
//! [`PaymentIntent`](link::PaymentIntent), and hands the resulting URI to a
//! platform launcher. Actual money movement happens in a third-party UPI
//! app; the caller later records a user-asserted
//! [`PaymentConfirmation`](confirm::PaymentConfirmation). Failures at any
//! step classify into a fixed [`PaymentProblem`](error::PaymentProblem)
//! taxonomy so the shell never hardcodes payment-error copy.
//!
//! Every operation is a synchronous pure function over its inputs; retries
//! are the caller re-invoking the generator with a fresh reference.
//!
//! # Modules
//!
//! - [`amount`] - Rupee amounts, limit regimes, and Indian-format display
//! - [`confirm`] - User-asserted confirmation records and launch strategies
//! - [`error`] - Failure taxonomy and the user-facing message classifier
//! - [`link`] - `upi://pay` intent link generation and parsing
//! - [`psps`] - Registry of well-known payment service providers
//! - [`reference`] - Transaction reference generation and validation
//! - [`split`] - Over-ceiling split-payment suggestions
//! - [`timestamp`] - Epoch-millisecond instants
//! - [`vpa`] - Virtual payment address (`handle@psp`) validation
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation for debugging and monitoring

pub mod amount;
pub mod confirm;
pub mod error;
pub mod link;
pub mod psps;
pub mod reference;
pub mod split;
pub mod timestamp;
pub mod vpa;

pub use amount::{Amount, AmountError, UpiLimits};
pub use confirm::{
    ConfirmationStrategy, LaunchAction, PaymentConfirmation, PaymentStatus, Platform, retry_delay,
};
pub use error::{AsPaymentProblem, FailureContext, FailureKind, PaymentProblem, classify};
pub use link::{LinkError, PaymentIntent, payment_link};
pub use reference::{RefError, TxnRef};
pub use split::{SplitPlan, suggest_split};
pub use timestamp::UnixMillis;
pub use vpa::{Vpa, VpaError};

/// ISO 4217 currency code carried in every generated link.
///
/// Fixed by the NPCI deep-link convention; UPI settles in Indian rupees only.
pub const CURRENCY: &str = "INR";
