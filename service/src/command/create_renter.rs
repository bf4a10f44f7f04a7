//! [`Command`] for creating a new [`Renter`].

use common::{operations::Insert, Clock};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{renter, Renter},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Renter`].
#[derive(Clone, Debug)]
pub struct CreateRenter {
    /// [`renter::Name`] of a new [`Renter`].
    pub name: renter::Name,

    /// [`renter::Email`] of a new [`Renter`], if any.
    pub email: Option<renter::Email>,

    /// [`renter::Phone`] of a new [`Renter`], if any.
    pub phone: Option<renter::Phone>,
}

impl<Db, Clk> Command<CreateRenter> for Service<Db, Clk>
where
    Db: Database<Insert<Renter>, Err = Traced<database::Error>>,
    Clk: Clock,
{
    type Ok = Renter;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateRenter) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateRenter { name, email, phone } = cmd;

        let renter = Renter {
            id: renter::Id::new(),
            name,
            email,
            phone,
            created_at: self.now().coerce(),
        };
        self.database()
            .execute(Insert(renter.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::debug!("`Renter(id: {})` created", renter.id);

        Ok(renter)
    }
}

/// Error of [`CreateRenter`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}
