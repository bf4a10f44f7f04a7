//! [`Command`]s for closing a [`Contract`] and releasing its [`Room`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    Clock,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{contract, room, Contract, Eviction, Payment, Room},
    infra::{database, Database},
    ledger::BalanceView,
    Service,
};

use super::Command;

/// [`Command`] for closing an active [`Contract`] with the provided
/// [`contract::Status`], making its [`Room`] available again.
///
/// Prefer [`VacateContract`], [`EvictContract`] or [`TerminateContract`].
#[derive(Clone, Copy, Debug)]
pub struct CloseContract {
    /// ID of the [`Contract`] to close.
    pub contract_id: contract::Id,

    /// [`contract::Status`] to close the [`Contract`] with.
    pub status: contract::Status,
}

/// [`Contract`] closed by the [`CloseContract`] [`Command`].
#[derive(Clone, Debug)]
pub struct Closed {
    /// Closed [`Contract`].
    pub contract: Contract,

    /// [`BalanceView`] of the [`Contract`] as of closing.
    pub balance: BalanceView,
}

impl<Db, Clk> Command<CloseContract> for Service<Db, Clk>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Room>, room::Id>>,
            Ok = Option<Room>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Payment>, contract::Id>>,
            Ok = Vec<Payment>,
            Err = Traced<database::Error>,
        > + Database<Update<Contract>, Err = Traced<database::Error>>
        + Database<Update<Room>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Clk: Clock,
{
    type Ok = Closed;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CloseContract) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CloseContract {
            contract_id,
            status,
        } = cmd;

        if status == contract::Status::Active {
            return Err(tracerr::new!(E::NotClosingStatus(status)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut contract = tx
            .execute(Select(By::<Option<Contract>, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(contract_id))
            .map_err(tracerr::wrap!())?;
        if !contract.is_active() {
            return Err(tracerr::new!(E::ContractNotActive(contract_id)));
        }

        let mut room = tx
            .execute(Select(By::<Option<Room>, _>::new(contract.room_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RoomNotExists(contract.room_id))
            .map_err(tracerr::wrap!())?;

        let payments = tx
            .execute(Select(By::<Vec<Payment>, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let balance = self.ledger().balance_view(
            &contract.snapshot(),
            payments.iter().map(|p| p.amount.amount),
            self.today(),
        );

        contract.status = status;
        contract.closed_at = Some(self.now().coerce());
        tx.execute(Update(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        room.status = room::Status::Available;
        tx.execute(Update(room))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::debug!(
            "`Contract(id: {contract_id})` closed as {status} with {} due",
            balance.total_due,
        );

        Ok(Closed { contract, balance })
    }
}

/// [`Command`] for a voluntary vacating of a [`Room`] by its renter.
#[derive(Clone, Copy, Debug)]
pub struct VacateContract {
    /// ID of the [`Contract`] to complete.
    pub contract_id: contract::Id,
}

impl<Db, Clk> Command<VacateContract> for Service<Db, Clk>
where
    Self: Command<CloseContract, Ok = Closed, Err = Traced<ExecutionError>>,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: VacateContract,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(CloseContract {
            contract_id: cmd.contract_id,
            status: contract::Status::Completed,
        })
        .await
        .map(|closed| closed.contract)
        .map_err(tracerr::wrap!())
    }
}

/// [`Command`] for a forced vacating of a [`Room`], retaining the outstanding
/// balance as a debt of its renter.
#[derive(Clone, Copy, Debug)]
pub struct EvictContract {
    /// ID of the [`Contract`] to evict.
    pub contract_id: contract::Id,
}

impl<Db, Clk> Command<EvictContract> for Service<Db, Clk>
where
    Self: Command<CloseContract, Ok = Closed, Err = Traced<ExecutionError>>,
{
    type Ok = Eviction;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: EvictContract) -> Result<Self::Ok, Self::Err> {
        let Closed { contract, balance } = self
            .execute(CloseContract {
                contract_id: cmd.contract_id,
                status: contract::Status::Evicted,
            })
            .await
            .map_err(tracerr::wrap!())?;

        if balance.total_due.is_positive() {
            log::info!(
                "`Contract(id: {})` evicted with a debt of {}",
                contract.id,
                balance.total_due,
            );
        }

        Ok(Eviction {
            contract,
            outstanding: balance,
        })
    }
}

/// [`Command`] for terminating a [`Contract`] early.
#[derive(Clone, Copy, Debug)]
pub struct TerminateContract {
    /// ID of the [`Contract`] to terminate.
    pub contract_id: contract::Id,
}

impl<Db, Clk> Command<TerminateContract> for Service<Db, Clk>
where
    Self: Command<CloseContract, Ok = Closed, Err = Traced<ExecutionError>>,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: TerminateContract,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(CloseContract {
            contract_id: cmd.contract_id,
            status: contract::Status::Terminated,
        })
        .await
        .map(|closed| closed.contract)
        .map_err(tracerr::wrap!())
    }
}

/// Error of closing a [`Contract`].
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Contract`] is not [`contract::Status::Active`].
    #[display("`Contract(id: {_0})` is not active")]
    ContractNotActive(#[error(not(source))] contract::Id),

    /// [`Contract`] with the provided ID does not exist.
    #[display("`Contract(id: {_0})` does not exist")]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`contract::Status`] doesn't close a [`Contract`].
    #[display("`{_0}` is not a closing status")]
    NotClosingStatus(#[error(not(source))] contract::Status),

    /// [`Room`] of the [`Contract`] does not exist.
    #[display("`Room(id: {_0})` does not exist")]
    RoomNotExists(#[error(not(source))] room::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::{record_payment, RecordPayment},
        domain::{contract, room},
        fixture::{contract, later, service, usd},
        ledger::PaymentStatus,
        query, Command as _, Query as _,
    };

    use super::{
        CloseContract, EvictContract, ExecutionError, TerminateContract,
        VacateContract,
    };

    #[tokio::test]
    async fn vacating_completes_contract_and_frees_room() {
        let svc = service("2024-03-01");
        let c = contract(&svc, "2024-01-01", "2024-03-01", 2500).await;

        let closed = svc
            .execute(VacateContract { contract_id: c.id })
            .await
            .unwrap();
        assert_eq!(closed.status, contract::Status::Completed);
        assert_eq!(closed.closed_at.map(|at| at.coerce()), Some(svc.now()));

        let room = svc
            .execute(query::room::ById::by(c.room_id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(room.status, room::Status::Available);
    }

    #[tokio::test]
    async fn eviction_retains_debt() {
        let svc = service("2024-03-11");
        let c = contract(&svc, "2024-01-01", "2024-03-01", 2500).await;
        _ = svc
            .execute(RecordPayment {
                contract_id: c.id,
                amount: record_payment::Amount::Exact(usd(2000)),
                date: Some("2024-02-01".parse().unwrap()),
            })
            .await
            .unwrap();

        let eviction = svc
            .execute(EvictContract { contract_id: c.id })
            .await
            .unwrap();
        assert_eq!(eviction.contract.status, contract::Status::Evicted);
        assert_eq!(eviction.outstanding.balance, usd(3000));
        assert_eq!(eviction.outstanding.days_overdue, 10);
        assert_eq!(eviction.outstanding.total_due, usd(3830));
        assert_eq!(eviction.outstanding.status, PaymentStatus::Partial);

        // Debt of the evicted renter can still be collected.
        _ = svc
            .execute(RecordPayment {
                contract_id: c.id,
                amount: record_payment::Amount::FullyPaid,
                date: None,
            })
            .await
            .unwrap();
        let ledger = svc
            .execute(query::ContractLedger(c.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ledger.view.status, PaymentStatus::Paid);
    }

    #[tokio::test]
    async fn evicted_debt_stops_accruing() {
        let svc = service("2024-03-01");
        let c = contract(&svc, "2024-01-01", "2024-03-01", 2500).await;
        _ = svc
            .execute(RecordPayment {
                contract_id: c.id,
                amount: record_payment::Amount::Exact(usd(2000)),
                date: Some("2024-02-01".parse().unwrap()),
            })
            .await
            .unwrap();
        let eviction = svc
            .execute(EvictContract { contract_id: c.id })
            .await
            .unwrap();
        assert_eq!(eviction.outstanding.days_overdue, 0);
        assert_eq!(eviction.outstanding.total_due, usd(3000));

        let svc = later(&svc, "2024-03-11");
        let ledger = svc
            .execute(query::ContractLedger(c.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ledger.view.balance, usd(3000));
        assert_eq!(ledger.view.days_overdue, 0);
        assert_eq!(ledger.view.late_fee, usd(0));
        assert_eq!(ledger.view.total_due, usd(3000));

        let payment = svc
            .execute(RecordPayment {
                contract_id: c.id,
                amount: record_payment::Amount::FullyPaid,
                date: None,
            })
            .await
            .unwrap();
        assert_eq!(payment.amount, usd(3000));
        assert_eq!(payment.date.to_string(), "2024-03-11");
    }

    #[tokio::test]
    async fn closes_only_once() {
        let svc = service("2024-02-01");
        let c = contract(&svc, "2024-01-01", "2024-03-01", 2500).await;

        let terminated = svc
            .execute(TerminateContract { contract_id: c.id })
            .await
            .unwrap();
        assert_eq!(terminated.status, contract::Status::Terminated);

        let err = svc
            .execute(EvictContract { contract_id: c.id })
            .await
            .unwrap_err();
        let err: &ExecutionError = err.as_ref();
        assert!(matches!(err, ExecutionError::ContractNotActive(_)), "{err}");

        let err = svc
            .execute(VacateContract {
                contract_id: contract::Id::new(),
            })
            .await
            .unwrap_err();
        let err: &ExecutionError = err.as_ref();
        assert!(matches!(err, ExecutionError::ContractNotExists(_)), "{err}");
    }

    #[tokio::test]
    async fn rejects_active_status() {
        let svc = service("2024-02-01");
        let c = contract(&svc, "2024-01-01", "2024-03-01", 2500).await;

        let err = svc
            .execute(CloseContract {
                contract_id: c.id,
                status: contract::Status::Active,
            })
            .await
            .unwrap_err();
        let err: &ExecutionError = err.as_ref();
        assert!(matches!(err, ExecutionError::NotClosingStatus(_)), "{err}");
    }
}
