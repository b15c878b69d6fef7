//! Split-payment suggestions for over-ceiling amounts.
//!
//! UPI caps a single transaction, so a booking that exceeds the ceiling has
//! to be collected in installments. [`suggest_split`] divides a total into
//! the minimum number of equal installments that each fit the configured
//! regime.
//!
//! Rounding policy: the per-installment amount is the total divided by the
//! installment count, rounded up to paise so the schedule always covers the
//! total; the final installment is the remainder and may be smaller than
//! the others.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amount::{Amount, UpiLimits};

/// A proposed installment schedule for one total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitPlan {
    /// Number of installments.
    pub installments: u32,

    /// Amount per installment; the final installment may be smaller.
    pub per_installment: Amount,

    /// Ready-to-show description of the schedule.
    pub message: String,
}

/// Proposes the minimum-count equal-installment schedule for `total`.
///
/// Totals already within the regime's ceiling come back as a single
/// installment.
#[must_use]
pub fn suggest_split(limits: &UpiLimits, total: Amount) -> SplitPlan {
    let installments = limits.installment_count(total);
    let per_installment = limits.installment_amount(total);

    if installments <= 1 {
        return SplitPlan {
            installments: 1,
            per_installment: total,
            message: format!(
                "{} is within the per-transaction limit; no split needed.",
                total.format_inr()
            ),
        };
    }

    let paid_upfront = per_installment.value() * Decimal::from(installments - 1);
    let final_installment = Amount::new(total.value() - paid_upfront);
    let message = if final_installment == per_installment {
        format!(
            "Split {} into {installments} installments of {} each.",
            total.format_inr(),
            per_installment.format_inr()
        )
    } else {
        format!(
            "Split {} into {installments} installments of {} (final installment {}).",
            total.format_inr(),
            per_installment.format_inr(),
            final_installment.format_inr()
        )
    };

    SplitPlan {
        installments,
        per_installment,
        message,
    }
}
