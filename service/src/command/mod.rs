//! [`Command`] definition.

pub mod close_contract;
pub mod create_contract;
pub mod create_renter;
pub mod create_room;
pub mod record_payment;
pub mod renew_contract;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    close_contract::{
        CloseContract, EvictContract, TerminateContract, VacateContract,
    },
    create_contract::CreateContract,
    create_renter::CreateRenter,
    create_room::CreateRoom,
    record_payment::RecordPayment,
    renew_contract::RenewContract,
};
