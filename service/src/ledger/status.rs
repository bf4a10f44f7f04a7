//! [`PaymentStatus`] classification.

use common::{define_kind, Money};
use rust_decimal::Decimal;

define_kind! {
    #[doc = "Status of paying off an amount."]
    enum PaymentStatus {
        #[doc = "Amount is paid in full."]
        Paid = 1,

        #[doc = "Amount is paid in part."]
        Partial = 2,

        #[doc = "Nothing is paid yet."]
        Unpaid = 3,
    }
}

impl PaymentStatus {
    /// Classifies the `amount_paid` towards the `total_amount`.
    ///
    /// Paying the total in full wins over paying nothing, so a zero total is
    /// always [`PaymentStatus::Paid`].
    #[must_use]
    pub fn of(amount_paid: Decimal, total_amount: Decimal) -> Self {
        if amount_paid >= total_amount {
            Self::Paid
        } else if amount_paid.is_zero() {
            Self::Unpaid
        } else {
            Self::Partial
        }
    }
}

/// Returns the rounded percentage of the `total_amount` covered by the
/// `amount_paid`.
///
/// Overpayment is reported as is, so the result may exceed `100`. A
/// non-positive `total_amount` is always `100` percent paid.
#[must_use]
pub fn payment_percentage(amount_paid: Decimal, total_amount: Decimal) -> Decimal {
    if total_amount <= Decimal::ZERO {
        return Decimal::ONE_HUNDRED;
    }
    Money::round(amount_paid / total_amount * Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use super::{payment_percentage, PaymentStatus};

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn classifies_payment() {
        assert_eq!(PaymentStatus::of(dec(5000), dec(5000)), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::of(dec(6000), dec(5000)), PaymentStatus::Paid);
        assert_eq!(
            PaymentStatus::of(dec(1), dec(5000)),
            PaymentStatus::Partial,
        );
        assert_eq!(
            PaymentStatus::of(dec(4999), dec(5000)),
            PaymentStatus::Partial,
        );
        assert_eq!(PaymentStatus::of(dec(0), dec(5000)), PaymentStatus::Unpaid);
        assert_eq!(PaymentStatus::of(dec(0), dec(0)), PaymentStatus::Paid);
    }

    #[test]
    fn displays_as_screaming_snake_case() {
        assert_eq!(PaymentStatus::Partial.to_string(), "PARTIAL");
        assert_eq!("UNPAID".parse::<PaymentStatus>().unwrap(), PaymentStatus::Unpaid);
    }

    #[test]
    fn calculates_unclamped_percentage() {
        assert_eq!(payment_percentage(dec(6000), dec(5000)), dec(120));
        assert_eq!(payment_percentage(dec(2500), dec(5000)), dec(50));
        assert_eq!(payment_percentage(dec(1), dec(3)), dec(33));
        assert_eq!(payment_percentage(dec(2), dec(3)), dec(67));
        assert_eq!(payment_percentage(dec(0), dec(5000)), dec(0));
        assert_eq!(payment_percentage(dec(10), dec(0)), dec(100));
    }
}
