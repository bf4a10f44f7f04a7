//! [`Contract`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{
    define_kind, money::Currency, unit, Date, DateOf, DateTimeOf, Money,
};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    domain::{renter, room},
    ledger::{self, BalanceView},
};
#[cfg(doc)]
use crate::domain::{Renter, Room};

/// Tenancy agreement binding a [`Renter`] to a [`Room`] for a date range at
/// a rent rate.
#[derive(Clone, Debug)]
pub struct Contract {
    /// ID of this [`Contract`].
    pub id: Id,

    /// ID of the rented [`Room`].
    pub room_id: room::Id,

    /// ID of the [`Renter`] renting the [`Room`].
    pub renter_id: renter::Id,

    /// [`Kind`] of this [`Contract`].
    pub kind: Kind,

    /// First day of this [`Contract`] term.
    pub start_date: StartDate,

    /// Last day of this [`Contract`] term.
    pub end_date: EndDate,

    /// Rent per calendar month.
    ///
    /// Defines the [`Currency`] of this [`Contract`].
    pub monthly_rate: Money,

    /// Rent per day, if agreed explicitly.
    pub daily_rate: Option<Money>,

    /// Total rent fixed for the whole term, overriding the calculated one.
    pub total_rent: Option<Money>,

    /// [`Status`] of this [`Contract`].
    pub status: Status,

    /// [`DateTime`] when this [`Contract`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Contract`] was closed, if it was.
    pub closed_at: Option<ClosingDateTime>,
}

impl Contract {
    /// Indicates whether this [`Contract`] is [`Status::Active`].
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }

    /// Returns [`Currency`] of this [`Contract`].
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.monthly_rate.currency
    }

    /// Returns [`ledger::Snapshot`] of this [`Contract`] terms.
    #[must_use]
    pub fn snapshot(&self) -> ledger::Snapshot {
        ledger::Snapshot {
            currency: self.currency(),
            start_date: self.start_date.coerce(),
            end_date: self.end_date.coerce(),
            monthly_rate: self.monthly_rate.amount,
            daily_rate: self.daily_rate.map(|m| m.amount),
            stored_total_rent: self.total_rent.map(|m| m.amount),
        }
    }

    /// Returns the [`Date`] to evaluate this [`Contract`] balance as of.
    ///
    /// A closed [`Contract`] is frozen as of its closing date, so no late fee
    /// accrues once the [`Room`] is vacated.
    #[must_use]
    pub fn evaluation_date(&self, today: Date) -> Date {
        self.closed_at.map_or(today, |at| at.date().min(today))
    }
}

/// ID of a [`Contract`].
#[derive(
    Clone, Copy, Debug, Default, Display, Eq, From, FromStr, Hash, Into, PartialEq,
)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Kind of a [`Contract`] term."]
    enum Kind {
        #[doc = "[`Contract`] for a calendar month by default."]
        Monthly = 1,

        #[doc = "[`Contract`] for a calendar year by default."]
        Yearly = 2,

        #[doc = "[`Contract`] with an explicitly chosen end date."]
        Custom = 3,
    }
}

define_kind! {
    #[doc = "Status of a [`Contract`]."]
    enum Status {
        #[doc = "[`Contract`] is in effect."]
        Active = 1,

        #[doc = "[`Renter`] vacated the [`Room`] voluntarily."]
        Completed = 2,

        #[doc = "[`Renter`] was forced to vacate the [`Room`]."]
        Evicted = 3,

        #[doc = "[`Contract`] was terminated early."]
        Terminated = 4,
    }
}

/// Outcome of evicting a [`Renter`].
#[derive(Clone, Debug)]
pub struct Eviction {
    /// Evicted [`Contract`].
    pub contract: Contract,

    /// [`BalanceView`] as of the eviction, retained as a debt of the
    /// [`Renter`].
    pub outstanding: BalanceView,
}

/// Marker type indicating a [`Contract`] term start.
#[derive(Clone, Copy, Debug)]
pub struct Start;

/// Marker type indicating a [`Contract`] term end.
#[derive(Clone, Copy, Debug)]
pub struct End;

/// [`Date`] when a [`Contract`] term starts.
pub type StartDate = DateOf<(Contract, Start)>;

/// [`Date`] when a [`Contract`] term ends.
pub type EndDate = DateOf<(Contract, End)>;

/// [`DateTime`] when a [`Contract`] was created.
pub type CreationDateTime = DateTimeOf<(Contract, unit::Creation)>;

/// [`DateTime`] when a [`Contract`] was closed.
pub type ClosingDateTime = DateTimeOf<(Contract, unit::Closing)>;
