//! [`Query`] collection deriving [`Ledger`]s of [`Contract`]s.

use common::{
    operations::{By, Select},
    Clock,
};
use tracerr::Traced;

use crate::{
    domain::{contract, Contract, Payment},
    infra::{database, Database},
    ledger::PaymentStatus,
    read::Ledger,
    Service,
};

use super::Query;

/// [`Query`] deriving the [`Ledger`] of a [`Contract`] as of today.
///
/// [`None`] is returned if the [`Contract`] doesn't exist.
#[derive(Clone, Copy, Debug)]
pub struct ContractLedger(pub contract::Id);

impl<Db, Clk> Query<ContractLedger> for Service<Db, Clk>
where
    Db: Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Payment>, contract::Id>>,
            Ok = Vec<Payment>,
            Err = Traced<database::Error>,
        >,
    Clk: Clock,
{
    type Ok = Option<Ledger>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        ContractLedger(id): ContractLedger,
    ) -> Result<Self::Ok, Self::Err> {
        let Some(contract) = self
            .database()
            .execute(Select(By::<Option<Contract>, _>::new(id)))
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        let payments = self
            .database()
            .execute(Select(By::<Vec<Payment>, _>::new(id)))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(Some(Ledger::new(
            contract,
            payments,
            self.ledger(),
            self.today(),
        )))
    }
}

/// [`Query`] deriving [`Ledger`]s of all the [`Contract`]s as of today,
/// keeping only the ones of the provided [`PaymentStatus`], if any.
#[derive(Clone, Copy, Debug)]
pub struct ContractsByPaymentStatus(pub Option<PaymentStatus>);

impl<Db, Clk> Query<ContractsByPaymentStatus> for Service<Db, Clk>
where
    Db: Database<
            Select<By<Vec<Contract>, Option<contract::Status>>>,
            Ok = Vec<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Payment>, contract::Id>>,
            Ok = Vec<Payment>,
            Err = Traced<database::Error>,
        >,
    Clk: Clock,
{
    type Ok = Vec<Ledger>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        ContractsByPaymentStatus(status): ContractsByPaymentStatus,
    ) -> Result<Self::Ok, Self::Err> {
        let contracts = self
            .database()
            .execute(Select(By::<Vec<Contract>, _>::new(None)))
            .await
            .map_err(tracerr::wrap!())?;

        let today = self.today();
        let mut ledgers = Vec::with_capacity(contracts.len());
        for contract in contracts {
            let payments = self
                .database()
                .execute(Select(By::<Vec<Payment>, _>::new(contract.id)))
                .await
                .map_err(tracerr::wrap!())?;

            let ledger = Ledger::new(contract, payments, self.ledger(), today);
            if status.map_or(true, |s| ledger.view.status == s) {
                ledgers.push(ledger);
            }
        }
        Ok(ledgers)
    }
}
