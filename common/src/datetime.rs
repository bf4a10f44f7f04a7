//! Date and time utilities.

use std::{cmp::Ordering, fmt, marker::PhantomData, str::FromStr};

use derive_more::{Debug, Display, Error};
use time::format_description::well_known::{Iso8601, Rfc3339};

/// Untyped date and time.
pub type DateTime = DateTimeOf;

/// UTC date and time.
#[derive(Debug)]
pub struct DateTimeOf<Of: ?Sized = ()> {
    /// Inner representation of the date and time.
    inner: time::OffsetDateTime,

    /// Type parameter describing the kind of date and time.
    #[debug(skip)]
    _of: PhantomData<Of>,
}

impl<Of: ?Sized> DateTimeOf<Of> {
    /// A [`DateTime`] representing the Unix epoch.
    pub const UNIX_EPOCH: Self = Self {
        inner: time::OffsetDateTime::UNIX_EPOCH,
        _of: PhantomData,
    };

    /// Creates a new [`DateTime`] representing the current date and time.
    #[must_use]
    pub fn now() -> Self {
        let inner = time::OffsetDateTime::now_utc();
        Self {
            _of: PhantomData,
            inner: inner.replace_microsecond(inner.microsecond()).unwrap_or(inner),
        }
    }

    /// Returns the Unix timestamp of this [`DateTime`].
    #[must_use]
    pub fn unix_timestamp(&self) -> i64 {
        self.inner.unix_timestamp()
    }

    /// Returns the [`DateTime`] as an [RFC 3339] string.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.inner
            .format(&Rfc3339)
            .unwrap_or_else(|_| self.unix_timestamp().to_string())
    }

    /// Returns the calendar [`Date`] of this [`DateTime`] in UTC.
    #[must_use]
    pub fn date(&self) -> Date {
        DateOf {
            inner: self.inner.date(),
            _of: PhantomData,
        }
    }

    /// Coerces one kind of [`DateTime`] into another.
    #[must_use]
    pub fn coerce<NewOf: ?Sized>(self) -> DateTimeOf<NewOf> {
        DateTimeOf {
            inner: self.inner,
            _of: PhantomData,
        }
    }
}

/// Error of parsing a [`Date`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
pub struct ParseError(time::error::Parse);

impl<Of: ?Sized> Copy for DateTimeOf<Of> {}
impl<Of: ?Sized> Clone for DateTimeOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Eq for DateTimeOf<Of> {}
impl<Of: ?Sized> PartialEq for DateTimeOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<Of: ?Sized> Ord for DateTimeOf<Of> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<Of: ?Sized> PartialOrd for DateTimeOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Of: ?Sized> TryFrom<time::OffsetDateTime> for DateTimeOf<Of> {
    type Error = time::error::ComponentRange;

    fn try_from(dt: time::OffsetDateTime) -> Result<Self, Self::Error> {
        dt.to_offset(time::UtcOffset::UTC)
            .replace_microsecond(dt.microsecond())
            .map(|inner| Self {
                inner,
                _of: PhantomData,
            })
    }
}

impl<Of: ?Sized> From<DateTimeOf<Of>> for time::OffsetDateTime {
    fn from(dt: DateTimeOf<Of>) -> Self {
        dt.inner
    }
}

/// Untyped calendar date.
pub type Date = DateOf;

/// Calendar date without a time of day.
///
/// Arithmetic on months and years follows overflow semantics: a day of month
/// not existing in the target month rolls over into the following month
/// (January 31 plus one month is March 3 in a non-leap year).
#[derive(Debug)]
pub struct DateOf<Of: ?Sized = ()> {
    /// Inner representation of the date.
    inner: time::Date,

    /// Type parameter describing the kind of date.
    #[debug(skip)]
    _of: PhantomData<Of>,
}

impl<Of: ?Sized> DateOf<Of> {
    /// Creates a new [`Date`] from the provided calendar components.
    ///
    /// [`None`] is returned if the components don't form a valid date.
    #[must_use]
    pub fn from_ymd(year: i32, month: u8, day: u8) -> Option<Self> {
        let month = time::Month::try_from(month).ok()?;
        Some(Self {
            inner: time::Date::from_calendar_date(year, month, day).ok()?,
            _of: PhantomData,
        })
    }

    /// Creates a new [`Date`] from the provided [ISO 8601] string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid [ISO 8601] date.
    ///
    /// [ISO 8601]: https://en.wikipedia.org/wiki/ISO_8601
    pub fn from_iso8601(input: &str) -> Result<Self, ParseError> {
        time::Date::parse(input, &Iso8601::DATE)
            .map(|inner| Self {
                inner,
                _of: PhantomData,
            })
            .map_err(ParseError)
    }

    /// Returns the year of this [`Date`].
    #[must_use]
    pub fn year(&self) -> i32 {
        self.inner.year()
    }

    /// Returns the month of this [`Date`] in `1..=12` range.
    #[must_use]
    pub fn month(&self) -> u8 {
        u8::from(self.inner.month())
    }

    /// Returns the day of month of this [`Date`].
    #[must_use]
    pub fn day(&self) -> u8 {
        self.inner.day()
    }

    /// Returns the number of whole days from this [`Date`] until the `other`
    /// one.
    ///
    /// Negative value means that the `other` [`Date`] is in the past.
    #[must_use]
    pub fn days_until<OtherOf: ?Sized>(&self, other: DateOf<OtherOf>) -> i64 {
        (other.inner - self.inner).whole_days()
    }

    /// Returns the calendar month difference between this [`Date`] and the
    /// `other` one, ignoring days of month.
    #[must_use]
    pub fn months_until<OtherOf: ?Sized>(&self, other: DateOf<OtherOf>) -> i32 {
        (other.year() - self.year()) * 12
            + i32::from(other.month())
            - i32::from(self.month())
    }

    /// Adds the provided number of days to this [`Date`].
    ///
    /// [`None`] is returned on overflow.
    #[must_use]
    pub fn add_days(self, days: i64) -> Option<Self> {
        Some(Self {
            inner: self.inner.checked_add(time::Duration::days(days))?,
            _of: PhantomData,
        })
    }

    /// Adds the provided number of calendar months to this [`Date`], rolling
    /// a non-existent day of month over into the next month.
    ///
    /// [`None`] is returned on overflow.
    #[must_use]
    pub fn add_months(self, months: i32) -> Option<Self> {
        let total = self
            .year()
            .checked_mul(12)?
            .checked_add(i32::from(self.month()) - 1)?
            .checked_add(months)?;
        let month = u8::try_from(total.rem_euclid(12) + 1).ok()?;
        let first = Self::from_ymd(total.div_euclid(12), month, 1)?;
        first.add_days(i64::from(self.day()) - 1)
    }

    /// Adds the provided number of calendar years to this [`Date`], rolling
    /// February 29 over into March 1 of a non-leap year.
    ///
    /// [`None`] is returned on overflow.
    #[must_use]
    pub fn add_years(self, years: i32) -> Option<Self> {
        self.add_months(years.checked_mul(12)?)
    }

    /// Coerces one kind of [`Date`] into another.
    #[must_use]
    pub fn coerce<NewOf: ?Sized>(self) -> DateOf<NewOf> {
        DateOf {
            inner: self.inner,
            _of: PhantomData,
        }
    }
}

impl<Of: ?Sized> Copy for DateOf<Of> {}
impl<Of: ?Sized> Clone for DateOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Eq for DateOf<Of> {}
impl<Of: ?Sized> PartialEq for DateOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<Of: ?Sized> Ord for DateOf<Of> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<Of: ?Sized> PartialOrd for DateOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Of: ?Sized> fmt::Display for DateOf<Of> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year(), self.month(), self.day())
    }
}

impl<Of: ?Sized> FromStr for DateOf<Of> {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_iso8601(s)
    }
}

impl<Of: ?Sized> From<time::Date> for DateOf<Of> {
    fn from(inner: time::Date) -> Self {
        Self {
            inner,
            _of: PhantomData,
        }
    }
}

impl<Of: ?Sized> From<DateOf<Of>> for time::Date {
    fn from(date: DateOf<Of>) -> Self {
        date.inner
    }
}

#[cfg(feature = "serde")]
pub mod serde {
    //! Module providing integration with [`serde`] crate.

    use std::str::FromStr as _;

    use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

    use super::DateOf;

    impl<Of: ?Sized> Serialize for DateOf<Of> {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.collect_str(self)
        }
    }

    impl<'de, Of: ?Sized> Deserialize<'de> for DateOf<Of> {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            Self::from_str(&s).map_err(|e| {
                D::Error::custom(format!("invalid date `{s}`: {e}"))
            })
        }
    }
}

#[cfg(test)]
mod spec {
    use super::Date;

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    #[test]
    fn parses_and_formats_iso8601() {
        let d = date("2024-01-15");
        assert_eq!((d.year(), d.month(), d.day()), (2024, 1, 15));
        assert_eq!(d.to_string(), "2024-01-15");

        assert!("2024-02-30".parse::<Date>().is_err());
        assert!("15.01.2024".parse::<Date>().is_err());
    }

    #[test]
    fn adds_months_with_overflow() {
        assert_eq!(date("2024-01-15").add_months(1), Some(date("2024-02-15")));
        assert_eq!(date("2023-01-31").add_months(1), Some(date("2023-03-03")));
        assert_eq!(date("2024-01-31").add_months(1), Some(date("2024-03-02")));
        assert_eq!(date("2024-12-10").add_months(1), Some(date("2025-01-10")));
        assert_eq!(date("2024-03-10").add_months(-3), Some(date("2023-12-10")));
        assert_eq!(date("2024-03-10").add_months(0), Some(date("2024-03-10")));
    }

    #[test]
    fn adds_years_with_overflow() {
        assert_eq!(date("2024-05-20").add_years(1), Some(date("2025-05-20")));
        assert_eq!(date("2024-02-29").add_years(1), Some(date("2025-03-01")));
        assert_eq!(date("2024-02-29").add_years(4), Some(date("2028-02-29")));
    }

    #[test]
    fn counts_days_and_months() {
        let start = date("2024-01-15");

        assert_eq!(start.days_until(date("2024-01-25")), 10);
        assert_eq!(start.days_until(date("2024-01-05")), -10);
        assert_eq!(start.days_until(start), 0);
        assert_eq!(date("2023-01-01").days_until(date("2024-01-01")), 365);

        assert_eq!(start.months_until(date("2024-03-01")), 2);
        assert_eq!(start.months_until(date("2025-01-01")), 12);
        assert_eq!(start.months_until(date("2023-12-31")), -1);
    }
}
