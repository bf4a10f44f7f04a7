//! [`Command`] for renewing a [`Contract`].

use common::operations::{By, Commit, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{contract, Contract},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for renewing an active [`Contract`], extending its term until
/// a new end date.
///
/// The rent for the extension is added on top of the current total rent,
/// which becomes fixed for the [`Contract`] from now on.
#[derive(Clone, Copy, Debug)]
pub struct RenewContract {
    /// ID of the [`Contract`] to renew.
    pub contract_id: contract::Id,

    /// New last day of the [`Contract`] term.
    pub new_end_date: contract::EndDate,
}

impl<Db, Clk> Command<RenewContract> for Service<Db, Clk>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<Update<Contract>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: RenewContract) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RenewContract {
            contract_id,
            new_end_date,
        } = cmd;

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
        if new_end_date <= contract.end_date {
            return Err(tracerr::new!(E::EndDateNotExtended {
                current: contract.end_date,
                requested: new_end_date,
            }));
        }

        let snapshot = contract.snapshot();
        let total_rent = self.ledger().total_rent(&snapshot)
            + self.ledger().additional_rent(&snapshot, new_end_date.coerce());
        contract.total_rent = Some(contract.monthly_rate.with_amount(total_rent));
        contract.end_date = new_end_date;

        tx.execute(Update(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::debug!(
            "`Contract(id: {contract_id})` renewed until {new_end_date} with \
             total rent of {total_rent}",
        );

        Ok(contract)
    }
}

/// Error of [`RenewContract`] [`Command`] execution.
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

    /// New end date is not after the current one.
    #[display("New end date `{requested}` is not after `{current}`")]
    EndDateNotExtended {
        /// Current end date of the [`Contract`].
        #[error(not(source))]
        current: contract::EndDate,

        /// Requested end date.
        #[error(not(source))]
        requested: contract::EndDate,
    },
}
