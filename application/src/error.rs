//! [`Error`]-related definitions.

use derive_more::{Display, Error as StdError, From};
use service::{
    command::{create_contract, create_renter, create_room, record_payment},
    domain::contract,
    infra::database,
};

/// Error of replaying a [`LedgerFile`].
///
/// [`LedgerFile`]: crate::LedgerFile
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Failed to create a `Contract`.
    #[display("failed to create `Contract`: {_0}")]
    #[from]
    CreateContract(create_contract::ExecutionError),

    /// Failed to create a `Renter`.
    #[display("failed to create `Renter`: {_0}")]
    #[from]
    CreateRenter(create_renter::ExecutionError),

    /// Failed to create a `Room`.
    #[display("failed to create `Room`: {_0}")]
    #[from]
    CreateRoom(create_room::ExecutionError),

    /// [`database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Name of a `Renter` is invalid.
    #[display("invalid `Renter` name: `{_0}`")]
    InvalidRenterName(#[error(not(source))] String),

    /// Number of a `Room` is invalid.
    #[display("invalid `Room` number: `{_0}`")]
    InvalidRoomNumber(#[error(not(source))] String),

    /// Ledger of a replayed `Contract` is missing.
    #[display("`Contract(id: {_0})` ledger is missing")]
    LedgerNotExists(#[error(not(source))] contract::Id),

    /// Failed to record a `Payment`.
    #[display("failed to record `Payment`: {_0}")]
    #[from]
    RecordPayment(record_payment::ExecutionError),
}

#[cfg(test)]
mod spec {
    use std::error::Error as _;

    use service::infra::database::{self, memory};

    use super::Error;

    #[test]
    fn keeps_cause_as_source() {
        let err = Error::InvalidRoomNumber(" 1".to_owned());
        assert_eq!(err.to_string(), "invalid `Room` number: ` 1`");
        assert!(err.source().is_none());

        let err = Error::from(database::Error::from(memory::Error::TxFinished));
        assert_eq!(
            err.to_string(),
            "`Database` operation failed: Transaction is committed already",
        );
        assert!(err.source().is_some());
    }
}
