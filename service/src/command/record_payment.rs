//! [`Command`] for recording a new [`Payment`].

use common::{
    money::Currency,
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    Clock, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{contract, payment, Contract, Payment},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for recording a new [`Payment`] towards a [`Contract`].
#[derive(Clone, Copy, Debug)]
pub struct RecordPayment {
    /// ID of the [`Contract`] to pay for.
    pub contract_id: contract::Id,

    /// [`Amount`] to pay.
    pub amount: Amount,

    /// Date of a new [`Payment`].
    ///
    /// Defaults to today.
    pub date: Option<payment::Date>,
}

/// Amount of a [`Payment`].
#[derive(Clone, Copy, Debug)]
pub enum Amount {
    /// Exact [`Money`], not exceeding the current balance.
    Exact(Money),

    /// Total amount due as of today, including the accrued late fee.
    FullyPaid,
}

impl<Db, Clk> Command<RecordPayment> for Service<Db, Clk>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Payment>, contract::Id>>,
            Ok = Vec<Payment>,
            Err = Traced<database::Error>,
        > + Database<Insert<Payment>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Clk: Clock,
{
    type Ok = Payment;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RecordPayment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RecordPayment {
            contract_id,
            amount,
            date,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let contract = tx
            .execute(Select(By::<Option<Contract>, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(contract_id))
            .map_err(tracerr::wrap!())?;
        if !matches!(
            contract.status,
            contract::Status::Active | contract::Status::Evicted,
        ) {
            return Err(tracerr::new!(E::ContractClosed(
                contract_id,
                contract.status,
            )));
        }

        let payments = tx
            .execute(Select(By::<Vec<Payment>, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let today = self.today();
        let view = self.ledger().balance_view(
            &contract.snapshot(),
            payments.iter().map(|p| p.amount.amount),
            contract.evaluation_date(today),
        );

        let amount = match amount {
            Amount::Exact(money) => {
                if money.currency != contract.currency() {
                    return Err(tracerr::new!(E::CurrencyMismatch {
                        expected: contract.currency(),
                        actual: money.currency,
                    }));
                }
                if !money.is_positive() {
                    return Err(tracerr::new!(E::AmountNotPositive(money)));
                }
                if money.amount > view.balance.amount {
                    return Err(tracerr::new!(E::AmountExceedsBalance {
                        amount: money,
                        balance: view.balance,
                    }));
                }
                money
            }
            Amount::FullyPaid => {
                if !view.total_due.is_positive() {
                    return Err(tracerr::new!(E::NothingDue(contract_id)));
                }
                view.total_due
            }
        };

        let payment = Payment {
            id: payment::Id::new(),
            contract_id,
            amount,
            date: date.unwrap_or_else(|| today.coerce()),
            created_at: self.now().coerce(),
        };
        tx.execute(Insert(payment.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::debug!(
            "`Payment(id: {})` of {} recorded for `Contract(id: {contract_id})`",
            payment.id,
            payment.amount,
        );

        Ok(payment)
    }
}

/// Error of [`RecordPayment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Amount`] is greater than the current balance.
    #[display("`{amount}` exceeds the current balance of `{balance}`")]
    AmountExceedsBalance {
        /// Requested amount.
        #[error(not(source))]
        amount: Money,

        /// Current balance of the [`Contract`].
        #[error(not(source))]
        balance: Money,
    },

    /// [`Amount`] is zero or negative.
    #[display("`{_0}` is not positive")]
    AmountNotPositive(#[error(not(source))] Money),

    /// [`Contract`] is closed without a debt to collect.
    #[display("`Contract(id: {_0})` is `{_1}`")]
    ContractClosed(
        #[error(not(source))] contract::Id,
        #[error(not(source))] contract::Status,
    ),

    /// [`Contract`] with the provided ID does not exist.
    #[display("`Contract(id: {_0})` does not exist")]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// [`Money`] is in a [`Currency`] other than the [`Contract`] one.
    #[display("`{actual}` doesn't match `Contract` currency `{expected}`")]
    CurrencyMismatch {
        /// [`Currency`] of the [`Contract`].
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

    /// [`Contract`] is paid in full already.
    #[display("`Contract(id: {_0})` has nothing due")]
    NothingDue(#[error(not(source))] contract::Id),
}
