//! [`Room`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Room available for rent.
#[derive(Clone, Debug)]
pub struct Room {
    /// ID of this [`Room`].
    pub id: Id,

    /// [`Number`] of this [`Room`].
    pub number: Number,

    /// Rent of this [`Room`] per calendar month.
    pub monthly_rate: Money,

    /// [`Status`] of this [`Room`].
    pub status: Status,

    /// [`DateTime`] when this [`Room`] was created.
    pub created_at: CreationDateTime,
}

impl Room {
    /// Indicates whether this [`Room`] can be rented out.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == Status::Available
    }
}

/// ID of a [`Room`].
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

/// Number of a [`Room`], as displayed on its door.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Number(String);

impl Number {
    /// Creates a new [`Number`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`Number`].
    fn check(number: impl AsRef<str>) -> bool {
        let number = number.as_ref();
        number.trim() == number && !number.is_empty() && number.len() <= 32
    }
}

impl std::str::FromStr for Number {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Number`")
    }
}

define_kind! {
    #[doc = "Status of a [`Room`]."]
    enum Status {
        #[doc = "[`Room`] can be rented out."]
        Available = 1,

        #[doc = "[`Room`] is rented out by an active contract."]
        Occupied = 2,
    }
}

/// [`DateTime`] when a [`Room`] was created.
pub type CreationDateTime = DateTimeOf<(Room, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::{Number, Status};

    #[test]
    fn validates_number() {
        assert!(Number::new("101").is_some());
        assert!(Number::new("B-12").is_some());
        assert!(Number::new("").is_none());
        assert!(Number::new(" 101").is_none());
        assert!(Number::new("1".repeat(33)).is_none());
    }

    #[test]
    fn parses_status() {
        assert_eq!("OCCUPIED".parse::<Status>().unwrap(), Status::Occupied);
        assert_eq!(Status::Available.to_string(), "AVAILABLE");
    }
}
