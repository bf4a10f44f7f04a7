//! [`Clock`] abstractions.

use crate::{Date, DateTime};

/// Source of the current date and time.
pub trait Clock {
    /// Returns the current [`DateTime`].
    fn now(&self) -> DateTime;

    /// Returns the current calendar [`Date`].
    fn today(&self) -> Date {
        self.now().date()
    }
}

/// [`Clock`] reading the system UTC time.
#[derive(Clone, Copy, Debug, Default)]
pub struct System;

impl Clock for System {
    fn now(&self) -> DateTime {
        DateTime::now()
    }
}

/// [`Clock`] frozen at the provided [`DateTime`].
#[derive(Clone, Copy, Debug)]
pub struct Fixed(pub DateTime);

impl Fixed {
    /// Creates a new [`Fixed`] [`Clock`] pointing to the midnight of the
    /// provided [`Date`].
    #[must_use]
    pub fn at(date: Date) -> Self {
        let midnight = time::Date::from(date).midnight().assume_utc();
        Self(DateTime::try_from(midnight).unwrap_or(DateTime::UNIX_EPOCH))
    }
}

impl Clock for Fixed {
    fn now(&self) -> DateTime {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime {
        (**self).now()
    }
}
