//! [`Query`] collection related to [`Contract`]s.

use common::operations::By;

use crate::domain::{contract, Contract, Payment};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Contract`] by its [`contract::Id`].
pub type ById = DatabaseQuery<By<Option<Contract>, contract::Id>>;

/// Queries [`Contract`]s having the provided [`contract::Status`], or all of
/// them if [`None`].
pub type ByStatus = DatabaseQuery<By<Vec<Contract>, Option<contract::Status>>>;

/// Queries [`Payment`]s made towards a [`Contract`], ordered by date.
pub type Payments = DatabaseQuery<By<Vec<Payment>, contract::Id>>;
