//! Rent and payment ledger calculations.
//!
//! Everything here is a pure function of its inputs: a [`Snapshot`] of a
//! [`Contract`], the amounts paid so far, and the date of evaluation.
//!
//! [`Contract`]: crate::domain::Contract

pub mod balance;
pub mod date;
pub mod rent;
pub mod status;

use common::{money::Currency, Date, Money};
use rust_decimal::Decimal;

pub use self::{
    balance::LateFeePolicy,
    rent::RentFormula,
    status::{payment_percentage, PaymentStatus},
};

/// Terms of a [`Contract`] required to calculate its ledger.
///
/// [`Contract`]: crate::domain::Contract
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Snapshot {
    /// [`Currency`] of all the amounts.
    pub currency: Currency,

    /// First day of the term.
    pub start_date: Date,

    /// Last day of the term.
    pub end_date: Date,

    /// Rent per calendar month.
    pub monthly_rate: Decimal,

    /// Rent per day, if agreed explicitly.
    pub daily_rate: Option<Decimal>,

    /// Total rent fixed for the term, overriding the calculated one.
    ///
    /// Set once the term is extended.
    pub stored_total_rent: Option<Decimal>,
}

impl Snapshot {
    /// Returns the daily rate of this [`Snapshot`], defaulting to the rounded
    /// thirtieth of the monthly rate.
    #[must_use]
    pub fn daily_rate(&self) -> Decimal {
        self.daily_rate
            .unwrap_or_else(|| rent::default_daily_rate(self.monthly_rate))
    }
}

/// Derived view of a [`Contract`] balance as of some date.
///
/// [`Contract`]: crate::domain::Contract
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BalanceView {
    /// Total rent owed for the whole term.
    pub total_rent: Money,

    /// Sum of all the payments.
    pub total_paid: Money,

    /// Rent not paid yet.
    pub balance: Money,

    /// Number of days the term is over while the rent is not paid in full.
    pub days_overdue: i64,

    /// Accrued late fee.
    pub late_fee: Money,

    /// Amount required to settle the [`Contract`]: balance plus late fee.
    ///
    /// [`Contract`]: crate::domain::Contract
    pub total_due: Money,

    /// [`PaymentStatus`] of the total rent.
    pub status: PaymentStatus,
}

impl BalanceView {
    /// Returns the percentage of the total rent paid so far.
    #[must_use]
    pub fn percentage(&self) -> Decimal {
        payment_percentage(self.total_paid.amount, self.total_rent.amount)
    }
}

/// Ledger calculator configured with the formulas in use.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Calculator {
    /// [`RentFormula`] of total rent.
    pub rent: RentFormula,

    /// [`LateFeePolicy`] of expired contracts.
    pub late_fee: LateFeePolicy,
}

impl Calculator {
    /// Returns the total rent owed for the whole term of the [`Snapshot`].
    ///
    /// [`Snapshot::stored_total_rent`] wins over the calculated one.
    #[must_use]
    pub fn total_rent(&self, snapshot: &Snapshot) -> Decimal {
        snapshot.stored_total_rent.unwrap_or_else(|| {
            self.rent.total_rent(
                snapshot.start_date,
                snapshot.end_date,
                snapshot.monthly_rate,
                snapshot.daily_rate(),
            )
        })
    }

    /// Returns the rent to add for extending the term of the [`Snapshot`]
    /// until the `new_end` date.
    #[must_use]
    pub fn additional_rent(&self, snapshot: &Snapshot, new_end: Date) -> Decimal {
        self.rent.additional_rent_for_extension(
            snapshot.end_date,
            new_end,
            snapshot.monthly_rate,
            snapshot.daily_rate(),
        )
    }

    /// Returns the late fee accrued by the [`Snapshot`] as of `today`.
    #[must_use]
    pub fn late_fee(
        &self,
        snapshot: &Snapshot,
        total_paid: Decimal,
        today: Date,
    ) -> Decimal {
        self.late_fee.late_fee(
            snapshot.end_date,
            today,
            self.total_rent(snapshot),
            total_paid,
            snapshot.daily_rate(),
        )
    }

    /// Derives the [`BalanceView`] of the [`Snapshot`] with the provided
    /// `payments` amounts as of `today`.
    #[must_use]
    pub fn balance_view(
        &self,
        snapshot: &Snapshot,
        payments: impl IntoIterator<Item = Decimal>,
        today: Date,
    ) -> BalanceView {
        let total_rent = self.total_rent(snapshot);
        let total_paid = payments.into_iter().sum::<Decimal>();
        let late_fee = self.late_fee.late_fee(
            snapshot.end_date,
            today,
            total_rent,
            total_paid,
            snapshot.daily_rate(),
        );
        let days_overdue = if balance::is_past_due(total_rent, total_paid) {
            date::days_overdue(snapshot.end_date, today)
        } else {
            0
        };

        let money = |amount| Money {
            amount,
            currency: snapshot.currency,
        };
        BalanceView {
            total_rent: money(total_rent),
            total_paid: money(total_paid),
            balance: money(balance::balance(total_rent, total_paid)),
            days_overdue,
            late_fee: money(late_fee),
            total_due: money(balance::total_due(
                total_rent, total_paid, late_fee,
            )),
            status: PaymentStatus::of(total_paid, total_rent),
        }
    }
}
