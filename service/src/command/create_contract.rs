//! [`Command`] for creating a new [`Contract`].

use common::{
    money::Currency,
    operations::{By, Commit, Insert, Select, Transact, Transacted, Update},
    Clock, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{contract, renter, room, Contract, Renter, Room},
    infra::{database, Database},
    ledger, Service,
};

use super::Command;

/// [`Command`] for creating a new [`Contract`], renting out an available
/// [`Room`].
#[derive(Clone, Copy, Debug)]
pub struct CreateContract {
    /// ID of the [`Room`] to rent out.
    pub room_id: room::Id,

    /// ID of the [`Renter`] renting the [`Room`].
    pub renter_id: renter::Id,

    /// [`contract::Kind`] of a new [`Contract`].
    pub kind: contract::Kind,

    /// First day of a new [`Contract`] term.
    pub start_date: contract::StartDate,

    /// Last day of a new [`Contract`] term.
    ///
    /// Required for [`contract::Kind::Custom`]. Defaults to one period of the
    /// [`contract::Kind`] after the `start_date` otherwise.
    pub end_date: Option<contract::EndDate>,

    /// Rent per calendar month.
    ///
    /// Defaults to the [`Room`] monthly rate.
    pub monthly_rate: Option<Money>,

    /// Rent per day, if agreed explicitly.
    pub daily_rate: Option<Money>,

    /// Total rent for the whole term, if agreed explicitly.
    ///
    /// Overrides the total rent calculated from the rates.
    pub total_rent: Option<Money>,
}

impl<Db, Clk> Command<CreateContract> for Service<Db, Clk>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Renter>, renter::Id>>,
            Ok = Option<Renter>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Select<By<Option<Room>, room::Id>>,
            Ok = Option<Room>,
            Err = Traced<database::Error>,
        > + Database<Insert<Contract>, Err = Traced<database::Error>>
        + Database<Update<Room>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Clk: Clock,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateContract {
            room_id,
            renter_id,
            kind,
            start_date,
            end_date,
            monthly_rate,
            daily_rate,
            total_rent,
        } = cmd;

        let end_date = match end_date {
            Some(end) => end,
            None => ledger::date::add_contract_period(start_date.coerce(), kind)
                .ok_or(E::EndDateRequired(kind))
                .map_err(tracerr::wrap!())?
                .coerce(),
        };
        if end_date.coerce() < start_date {
            return Err(tracerr::new!(E::EndBeforeStart {
                start: start_date,
                end: end_date,
            }));
        }

        let renter = self
            .database()
            .execute(Select(By::<Option<Renter>, _>::new(renter_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RenterNotExists(renter_id))
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut room = tx
            .execute(Select(By::<Option<Room>, _>::new(room_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RoomNotExists(room_id))
            .map_err(tracerr::wrap!())?;
        if !room.is_available() {
            return Err(tracerr::new!(E::RoomOccupied(room_id)));
        }

        let currency = room.monthly_rate.currency;
        let monthly_rate = monthly_rate.unwrap_or(room.monthly_rate);
        let rates = [Some(monthly_rate), daily_rate, total_rent];
        for rate in rates.into_iter().flatten() {
            if rate.currency != currency {
                return Err(tracerr::new!(E::CurrencyMismatch {
                    expected: currency,
                    actual: rate.currency,
                }));
            }
            if !rate.is_positive() {
                return Err(tracerr::new!(E::RateNotPositive(rate)));
            }
        }

        let contract = Contract {
            id: contract::Id::new(),
            room_id: room.id,
            renter_id: renter.id,
            kind,
            start_date,
            end_date,
            monthly_rate,
            daily_rate,
            total_rent,
            status: contract::Status::Active,
            created_at: self.now().coerce(),
            closed_at: None,
        };
        tx.execute(Insert(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        room.status = room::Status::Occupied;
        tx.execute(Update(room))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::debug!(
            "`Contract(id: {})` created for `Room(id: {room_id})` until {}",
            contract.id,
            contract.end_date,
        );

        Ok(contract)
    }
}

/// Error of [`CreateContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Money`] is in a [`Currency`] other than the [`Room`] one.
    #[display("`{actual}` doesn't match `Room` currency `{expected}`")]
    CurrencyMismatch {
        /// [`Currency`] of the [`Room`].
        #[error(not(source))]
        expected: Currency,

        /// Provided [`Currency`].
        #[error(not(source))]
        actual: Currency,
    },

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// End date precedes the start date.
    #[display("End date `{end}` precedes start date `{start}`")]
    EndBeforeStart {
        /// Provided start date.
        #[error(not(source))]
        start: contract::StartDate,

        /// Provided end date.
        #[error(not(source))]
        end: contract::EndDate,
    },

    /// End date is not provided and cannot be derived from the
    /// [`contract::Kind`].
    #[display("End date is required for `{_0}` contracts")]
    EndDateRequired(#[error(not(source))] contract::Kind),

    /// Rate is zero or negative.
    #[display("Rate `{_0}` is not positive")]
    RateNotPositive(#[error(not(source))] Money),

    /// [`Renter`] with the provided ID does not exist.
    #[display("`Renter(id: {_0})` does not exist")]
    RenterNotExists(#[error(not(source))] renter::Id),

    /// [`Room`] with the provided ID does not exist.
    #[display("`Room(id: {_0})` does not exist")]
    RoomNotExists(#[error(not(source))] room::Id),

    /// [`Room`] is rented out by another [`Contract`].
    #[display("`Room(id: {_0})` is occupied")]
    RoomOccupied(#[error(not(source))] room::Id),
}

#[cfg(test)]
mod spec {
    use common::{money::Currency, Money};
    use rust_decimal::Decimal;

    use crate::{
        domain::{contract, renter, room, Room},
        fixture::{self, service, usd},
        query, Command as _, Query as _,
    };

    use super::{CreateContract, ExecutionError};

    fn monthly(room: &Room, renter_id: renter::Id) -> CreateContract {
        CreateContract {
            room_id: room.id,
            renter_id,
            kind: contract::Kind::Monthly,
            start_date: "2024-01-15".parse().unwrap(),
            end_date: None,
            monthly_rate: None,
            daily_rate: None,
            total_rent: None,
        }
    }

    #[tokio::test]
    async fn defaults_end_date_and_rate() {
        let svc = service("2024-01-15");
        let renter = fixture::renter(&svc).await;

        let r = fixture::room(&svc, 3000).await;
        let contract = svc.execute(monthly(&r, renter.id)).await.unwrap();
        assert_eq!(contract.end_date.to_string(), "2024-02-15");
        assert_eq!(contract.monthly_rate, usd(3000));
        assert_eq!(contract.status, contract::Status::Active);
        assert_eq!(contract.total_rent, None);

        let r = fixture::room(&svc, 3000).await;
        let yearly = svc
            .execute(CreateContract {
                kind: contract::Kind::Yearly,
                ..monthly(&r, renter.id)
            })
            .await
            .unwrap();
        assert_eq!(yearly.end_date.to_string(), "2025-01-15");
    }

    #[tokio::test]
    async fn stores_agreed_total_rent() {
        let svc = service("2024-01-15");
        let r = fixture::room(&svc, 3000).await;
        let renter = fixture::renter(&svc).await;

        let contract = svc
            .execute(CreateContract {
                total_rent: Some(usd(2800)),
                ..monthly(&r, renter.id)
            })
            .await
            .unwrap();
        assert_eq!(contract.total_rent, Some(usd(2800)));

        let ledger = svc
            .execute(query::ContractLedger(contract.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ledger.view.total_rent, usd(2800));
    }

    #[tokio::test]
    async fn occupies_room() {
        let svc = service("2024-01-15");
        let r = fixture::room(&svc, 3000).await;
        let renter = fixture::renter(&svc).await;

        _ = svc.execute(monthly(&r, renter.id)).await.unwrap();

        let stored = svc
            .execute(query::room::ById::by(r.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, room::Status::Occupied);

        let err = svc.execute(monthly(&r, renter.id)).await.unwrap_err();
        let err: &ExecutionError = err.as_ref();
        assert!(matches!(err, ExecutionError::RoomOccupied(_)), "{err}");
    }

    #[tokio::test]
    async fn requires_end_date_of_custom_contract() {
        let svc = service("2024-01-15");
        let r = fixture::room(&svc, 3000).await;
        let renter = fixture::renter(&svc).await;

        let err = svc
            .execute(CreateContract {
                kind: contract::Kind::Custom,
                ..monthly(&r, renter.id)
            })
            .await
            .unwrap_err();
        let err: &ExecutionError = err.as_ref();
        assert!(matches!(err, ExecutionError::EndDateRequired(_)), "{err}");
    }

    #[tokio::test]
    async fn rejects_end_before_start() {
        let svc = service("2024-01-15");
        let r = fixture::room(&svc, 3000).await;
        let renter = fixture::renter(&svc).await;

        let err = svc
            .execute(CreateContract {
                end_date: Some("2024-01-14".parse().unwrap()),
                ..monthly(&r, renter.id)
            })
            .await
            .unwrap_err();
        let err: &ExecutionError = err.as_ref();
        assert!(matches!(err, ExecutionError::EndBeforeStart { .. }), "{err}");
    }

    #[tokio::test]
    async fn rejects_foreign_currency() {
        let svc = service("2024-01-15");
        let r = fixture::room(&svc, 3000).await;
        let renter = fixture::renter(&svc).await;

        let err = svc
            .execute(CreateContract {
                daily_rate: Some(Money {
                    amount: Decimal::from(100),
                    currency: Currency::Eur,
                }),
                ..monthly(&r, renter.id)
            })
            .await
            .unwrap_err();
        let err: &ExecutionError = err.as_ref();
        assert!(
            matches!(
                err,
                ExecutionError::CurrencyMismatch {
                    expected: Currency::Usd,
                    actual: Currency::Eur,
                },
            ),
            "{err}",
        );
    }

    #[tokio::test]
    async fn rejects_missing_parties() {
        let svc = service("2024-01-15");
        let r = fixture::room(&svc, 3000).await;

        let err = svc
            .execute(monthly(&r, renter::Id::new()))
            .await
            .unwrap_err();
        let err: &ExecutionError = err.as_ref();
        assert!(matches!(err, ExecutionError::RenterNotExists(_)), "{err}");

        let renter = fixture::renter(&svc).await;
        let err = svc
            .execute(CreateContract {
                room_id: room::Id::new(),
                ..monthly(&r, renter.id)
            })
            .await
            .unwrap_err();
        let err: &ExecutionError = err.as_ref();
        assert!(matches!(err, ExecutionError::RoomNotExists(_)), "{err}");
    }
}
