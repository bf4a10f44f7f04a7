//! [`Query`] collection related to a single [`Renter`].

use common::operations::By;

use crate::domain::{renter, Renter};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Renter`] by its [`renter::Id`].
pub type ById = DatabaseQuery<By<Option<Renter>, renter::Id>>;
