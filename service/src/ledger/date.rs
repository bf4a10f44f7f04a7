//! Calendar arithmetic of [`Contract`] terms.
//!
//! "Today" is always passed in explicitly.
//!
//! [`Contract`]: crate::domain::Contract

use common::Date;

use crate::domain::contract;

/// Indicates whether a [`Contract`] ending at the `end_date` is expired as of
/// `today`.
///
/// A [`Contract`] ending today is not expired yet.
///
/// [`Contract`]: crate::domain::Contract
#[must_use]
pub fn is_expired(end_date: Date, today: Date) -> bool {
    end_date < today
}

/// Returns the number of days left until the `end_date`.
///
/// `0` means the due date is today, a negative value means it has passed that
/// many days ago.
#[must_use]
pub fn days_until_due(end_date: Date, today: Date) -> i64 {
    today.days_until(end_date)
}

/// Returns the number of days the `end_date` has passed by, or `0` if it
/// hasn't passed yet.
#[must_use]
pub fn days_overdue(end_date: Date, today: Date) -> i64 {
    (-days_until_due(end_date, today)).max(0)
}

/// Returns the default end date of a [`Contract`] of the provided
/// [`contract::Kind`] starting at the `start_date`.
///
/// [`None`] is returned for [`contract::Kind::Custom`] contracts, whose end
/// date is always chosen explicitly.
///
/// [`Contract`]: crate::domain::Contract
#[must_use]
pub fn add_contract_period(
    start_date: Date,
    kind: contract::Kind,
) -> Option<Date> {
    match kind {
        contract::Kind::Monthly => start_date.add_months(1),
        contract::Kind::Yearly => start_date.add_years(1),
        contract::Kind::Custom => None,
    }
}
