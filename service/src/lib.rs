//! Service contains the business logic of the rental ledger.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod ledger;
pub mod query;
pub mod read;

use common::{clock, Clock, Date, DateTime};
use derive_more::Debug;

#[cfg(doc)]
use infra::Database;

pub use self::{command::Command, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    /// [`ledger::Calculator`] deriving balances of contracts.
    pub ledger: ledger::Calculator,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db, Clk = clock::System> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,

    /// [`Clock`] telling "today" to this [`Service`].
    #[debug(skip)]
    clock: Clk,
}

impl<Db> Service<Db> {
    /// Creates a new [`Service`] with the provided parameters, reading the
    /// system [`Clock`].
    pub fn new(config: Config, database: Db) -> Self {
        Self::with_clock(config, database, clock::System)
    }
}

impl<Db, Clk> Service<Db, Clk> {
    /// Creates a new [`Service`] with the provided [`Clock`].
    pub fn with_clock(config: Config, database: Db, clock: Clk) -> Self {
        Self {
            config,
            database,
            clock,
        }
    }

    /// Returns [`Config`] of this [`Service`].
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns [`ledger::Calculator`] of this [`Service`].
    #[must_use]
    pub fn ledger(&self) -> &ledger::Calculator {
        &self.config.ledger
    }
}

impl<Db, Clk: Clock> Service<Db, Clk> {
    /// Returns the current [`DateTime`] according to the [`Clock`] of this
    /// [`Service`].
    #[must_use]
    pub fn now(&self) -> DateTime {
        self.clock.now()
    }

    /// Returns the current [`Date`] according to the [`Clock`] of this
    /// [`Service`].
    #[must_use]
    pub fn today(&self) -> Date {
        self.clock.today()
    }
}

#[cfg(test)]
mod fixture {
    //! Shared fixtures of [`Command`] and [`Query`] tests.

    use common::{clock, money::Currency, Money};
    use rust_decimal::Decimal;

    use crate::{
        command::{CreateContract, CreateRenter, CreateRoom},
        domain::{contract, renter, room, Contract, Renter, Room},
        infra::Memory,
        Command as _, Config, Service,
    };

    /// [`Service`] under test.
    pub(crate) type TestService = Service<Memory, clock::Fixed>;

    /// Creates a new [`TestService`] with "today" being the provided date.
    pub(crate) fn service(today: &str) -> TestService {
        Service::with_clock(
            Config::default(),
            Memory::new(),
            clock::Fixed::at(today.parse().unwrap()),
        )
    }

    /// Creates a new [`TestService`] sharing the database of the provided one,
    /// but with "today" being the provided date.
    pub(crate) fn later(svc: &TestService, today: &str) -> TestService {
        Service::with_clock(
            Config::default(),
            svc.database().clone(),
            clock::Fixed::at(today.parse().unwrap()),
        )
    }

    /// Creates [`Money`] of the provided amount in USD.
    pub(crate) fn usd(amount: i64) -> Money {
        Money {
            amount: Decimal::from(amount),
            currency: Currency::Usd,
        }
    }

    /// Creates a new [`Room`] with the provided monthly rate in USD.
    pub(crate) async fn room(svc: &TestService, monthly_rate: i64) -> Room {
        svc.execute(CreateRoom {
            number: room::Number::new("101").unwrap(),
            monthly_rate: usd(monthly_rate),
        })
        .await
        .unwrap()
    }

    /// Creates a new [`Renter`].
    pub(crate) async fn renter(svc: &TestService) -> Renter {
        svc.execute(CreateRenter {
            name: renter::Name::new("Jane Doe").unwrap(),
            email: renter::Email::new("jane@example.com"),
            phone: None,
        })
        .await
        .unwrap()
    }

    /// Creates a new [`contract::Kind::Custom`] [`Contract`] for a new
    /// [`Room`] and [`Renter`].
    pub(crate) async fn contract(
        svc: &TestService,
        start: &str,
        end: &str,
        monthly_rate: i64,
    ) -> Contract {
        let room = room(svc, monthly_rate).await;
        let renter = renter(svc).await;

        svc.execute(CreateContract {
            room_id: room.id,
            renter_id: renter.id,
            kind: contract::Kind::Custom,
            start_date: start.parse().unwrap(),
            end_date: Some(end.parse().unwrap()),
            monthly_rate: None,
            daily_rate: None,
            total_rent: None,
        })
        .await
        .unwrap()
    }
}
