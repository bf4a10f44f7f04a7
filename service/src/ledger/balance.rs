//! Outstanding balance and late fees.

use common::{Date, Money, Percent};
use rust_decimal::Decimal;

use super::date;

/// Returns the outstanding balance: the `total_rent` not covered by the
/// `total_paid` yet.
///
/// Overpayment never makes the balance negative.
#[must_use]
pub fn balance(total_rent: Decimal, total_paid: Decimal) -> Decimal {
    (total_rent - total_paid).max(Decimal::ZERO)
}

/// Indicates whether the `total_paid` doesn't cover the `total_rent` yet.
#[must_use]
pub fn is_past_due(total_rent: Decimal, total_paid: Decimal) -> bool {
    total_paid < total_rent
}

/// Returns the total amount due: the [`balance()`] plus the `late_fee`.
#[must_use]
pub fn total_due(
    total_rent: Decimal,
    total_paid: Decimal,
    late_fee: Decimal,
) -> Decimal {
    balance(total_rent, total_paid) + late_fee
}

/// Policy of charging late fees on expired contracts with an outstanding
/// balance.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LateFeePolicy {
    /// Daily rate for each day past the end date.
    #[default]
    PerDiem,

    /// One-time share of the outstanding balance, regardless of how many days
    /// it is overdue.
    Flat(Percent),
}

impl LateFeePolicy {
    /// Legacy flat late fee of ten percent of the balance.
    pub const LEGACY_FLAT: Self = Self::Flat(Percent::TEN);

    /// Calculates the late fee accrued as of `today`.
    ///
    /// Zero is returned unless the contract ending at the `end_date` is
    /// expired and still [`is_past_due()`].
    #[must_use]
    pub fn late_fee(
        self,
        end_date: Date,
        today: Date,
        total_rent: Decimal,
        total_paid: Decimal,
        daily_rate: Decimal,
    ) -> Decimal {
        if !date::is_expired(end_date, today)
            || !is_past_due(total_rent, total_paid)
        {
            return Decimal::ZERO;
        }

        let fee = match self {
            Self::PerDiem => {
                Decimal::from(date::days_overdue(end_date, today)) * daily_rate
            }
            Self::Flat(percent) => percent.of(balance(total_rent, total_paid)),
        };
        Money::round(fee).max(Decimal::ZERO)
    }
}
