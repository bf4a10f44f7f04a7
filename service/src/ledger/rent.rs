//! Rent schedule of [`Contract`] terms.
//!
//! [`Contract`]: crate::domain::Contract

use common::{Date, Money};
use rust_decimal::Decimal;

/// Number of days a monthly rate is spread over to get a default daily rate.
pub const DAYS_PER_MONTH: u8 = 30;

/// Formula of the total rent owed for a term.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RentFormula {
    /// Whole calendar months billed at the monthly rate, plus the remaining
    /// days billed at the daily rate.
    #[default]
    CalendarMonths,

    /// Legacy formula classifying the term by its length in days:
    /// - `365..=366` days is a year of 12 monthly rates;
    /// - `28..=31` days is a single monthly rate;
    /// - less than `28` days is billed per day;
    /// - anything else is billed as 30-day months plus the remaining days.
    DayClassification,
}

impl RentFormula {
    /// Calculates the total rent owed for the term between the `start` and
    /// `end` dates.
    ///
    /// The result is rounded to whole currency units and is never negative.
    #[must_use]
    pub fn total_rent(
        self,
        start: Date,
        end: Date,
        monthly_rate: Decimal,
        daily_rate: Decimal,
    ) -> Decimal {
        let total = match self {
            Self::CalendarMonths => {
                calendar_months(start, end, monthly_rate, daily_rate)
            }
            Self::DayClassification => {
                day_classification(start, end, monthly_rate, daily_rate)
            }
        };
        Money::round(total).max(Decimal::ZERO)
    }

    /// Calculates the rent to be added to a [`Contract`] whose end date is
    /// moved from the `old_end` to the `new_end`.
    ///
    /// The extension is billed as a contract of its own, so this is the same
    /// [`RentFormula::total_rent()`] over the `[old_end, new_end]` term.
    ///
    /// [`Contract`]: crate::domain::Contract
    #[must_use]
    pub fn additional_rent_for_extension(
        self,
        old_end: Date,
        new_end: Date,
        monthly_rate: Decimal,
        daily_rate: Decimal,
    ) -> Decimal {
        self.total_rent(old_end, new_end, monthly_rate, daily_rate)
    }
}

/// Returns the daily rate used when a [`Contract`] doesn't specify one.
///
/// [`Contract`]: crate::domain::Contract
#[must_use]
pub fn default_daily_rate(monthly_rate: Decimal) -> Decimal {
    Money::round(monthly_rate / Decimal::from(DAYS_PER_MONTH))
}

/// Bills whole calendar months between the `start` and `end` dates at the
/// `monthly_rate` and the rest days at the `daily_rate`.
fn calendar_months(
    start: Date,
    end: Date,
    monthly_rate: Decimal,
    daily_rate: Decimal,
) -> Decimal {
    // Backed off once only: an overflowing anchor may still overshoot the
    // `end`, leaving negative remaining days.
    let mut months = start.months_until(end);
    let mut anchor = start.add_months(months).unwrap_or(start);
    if anchor > end {
        months -= 1;
        anchor = start.add_months(months).unwrap_or(start);
    }
    let days = anchor.days_until(end);

    Decimal::from(months) * monthly_rate + Decimal::from(days) * daily_rate
}

/// Bills the term between the `start` and `end` dates according to its
/// length in days.
fn day_classification(
    start: Date,
    end: Date,
    monthly_rate: Decimal,
    daily_rate: Decimal,
) -> Decimal {
    let days = start.days_until(end);
    match days {
        365..=366 => monthly_rate * Decimal::from(12),
        28..=31 => monthly_rate,
        i64::MIN..=27 => Decimal::from(days) * daily_rate,
        _ => {
            let per_month = i64::from(DAYS_PER_MONTH);
            Decimal::from(days / per_month) * monthly_rate
                + Decimal::from(days % per_month) * daily_rate
        }
    }
}

#[cfg(test)]
mod spec {
    use common::Date;
    use rust_decimal::Decimal;

    use super::{default_daily_rate, RentFormula};

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn defaults_daily_rate_to_rounded_thirtieth() {
        assert_eq!(default_daily_rate(dec(3000)), dec(100));
        assert_eq!(default_daily_rate(dec(1000)), dec(33));
        assert_eq!(default_daily_rate(dec(1005)), dec(34));
        assert_eq!(default_daily_rate(dec(0)), dec(0));
    }

    #[test]
    fn calendar_months_bills_whole_months_and_rest_days() {
        let f = RentFormula::CalendarMonths;

        // One year of exactly 365 days.
        assert_eq!(
            f.total_rent(
                date("2023-01-01"),
                date("2024-01-01"),
                dec(3000),
                dec(100),
            ),
            dec(36000),
        );
        // 2 months (until March 15) and 5 days.
        assert_eq!(
            f.total_rent(
                date("2024-01-15"),
                date("2024-03-20"),
                dec(3000),
                dec(100),
            ),
            dec(6500),
        );
        // Day of month not reached yet: 1 month (until February 20) and
        // 19 days over a leap February.
        assert_eq!(
            f.total_rent(
                date("2024-01-20"),
                date("2024-03-10"),
                dec(3000),
                dec(100),
            ),
            dec(4900),
        );
    }

    #[test]
    fn calendar_months_backs_off_overflowing_anchor() {
        // Two months overshoot the end, and January 31 plus one month
        // overflows into March 3, one day past the end.
        assert_eq!(
            RentFormula::CalendarMonths.total_rent(
                date("2023-01-31"),
                date("2023-03-02"),
                dec(3000),
                dec(100),
            ),
            dec(2900),
        );
        // A single back-off fitting the end bills the rest per day.
        assert_eq!(
            RentFormula::CalendarMonths.total_rent(
                date("2024-01-20"),
                date("2024-03-10"),
                dec(3000),
                dec(100),
            ),
            dec(4900),
        );
    }

    #[test]
    fn custom_short_term_is_billed_per_day() {
        for f in [RentFormula::CalendarMonths, RentFormula::DayClassification] {
            assert_eq!(
                f.total_rent(
                    date("2024-03-01"),
                    date("2024-03-11"),
                    dec(4500),
                    dec(150),
                ),
                dec(1500),
                "{f:?}",
            );
        }
    }

    #[test]
    fn day_classification_buckets_term_length() {
        let f = RentFormula::DayClassification;
        let start = date("2023-01-01");
        let total = |end: &str| f.total_rent(start, date(end), dec(3000), dec(100));

        // 365 days.
        assert_eq!(total("2024-01-01"), dec(36000));
        // 366 days.
        assert_eq!(total("2024-01-02"), dec(36000));
        // 28 and 31 days.
        assert_eq!(total("2023-01-29"), dec(3000));
        assert_eq!(total("2023-02-01"), dec(3000));
        // 27 days.
        assert_eq!(total("2023-01-28"), dec(2700));
        // 45 days: one 30-day month and 15 days.
        assert_eq!(total("2023-02-15"), dec(4500));
        // 367 days: twelve 30-day months and 7 days.
        assert_eq!(total("2024-01-03"), dec(36700));
    }

    #[test]
    fn rounds_and_never_goes_negative() {
        for f in [RentFormula::CalendarMonths, RentFormula::DayClassification] {
            assert_eq!(
                f.total_rent(
                    date("2024-03-11"),
                    date("2024-03-01"),
                    dec(3000),
                    dec(100),
                ),
                Decimal::ZERO,
                "{f:?}",
            );
            assert_eq!(
                f.total_rent(
                    date("2024-03-01"),
                    date("2024-03-04"),
                    dec(1000),
                    "33.5".parse().unwrap(),
                ),
                dec(101),
                "{f:?}",
            );
        }
    }

    #[test]
    fn extension_is_billed_as_separate_term() {
        let f = RentFormula::CalendarMonths;

        assert_eq!(
            f.additional_rent_for_extension(
                date("2024-02-15"),
                date("2024-03-15"),
                dec(3000),
                dec(100),
            ),
            dec(3000),
        );
        assert_eq!(
            f.additional_rent_for_extension(
                date("2024-02-15"),
                date("2024-02-25"),
                dec(3000),
                dec(100),
            ),
            dec(1000),
        );
    }
}
