//! [`Command`] for creating a new [`Room`].

use common::{operations::Insert, Clock, Money};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{room, Room},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Room`].
#[derive(Clone, Debug)]
pub struct CreateRoom {
    /// [`room::Number`] of a new [`Room`].
    pub number: room::Number,

    /// Rent of a new [`Room`] per calendar month.
    pub monthly_rate: Money,
}

impl<Db, Clk> Command<CreateRoom> for Service<Db, Clk>
where
    Db: Database<Insert<Room>, Err = Traced<database::Error>>,
    Clk: Clock,
{
    type Ok = Room;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateRoom) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateRoom {
            number,
            monthly_rate,
        } = cmd;

        if !monthly_rate.is_positive() {
            return Err(tracerr::new!(E::RateNotPositive(monthly_rate)));
        }

        let room = Room {
            id: room::Id::new(),
            number,
            monthly_rate,
            status: room::Status::Available,
            created_at: self.now().coerce(),
        };
        self.database()
            .execute(Insert(room.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::debug!("`Room(id: {})` created", room.id);

        Ok(room)
    }
}

/// Error of [`CreateRoom`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Monthly rate is zero or negative.
    #[display("Monthly rate `{_0}` is not positive")]
    RateNotPositive(#[error(not(source))] Money),
}
