//! Domain definitions.

pub mod contract;
pub mod payment;
pub mod renter;
pub mod room;

pub use self::{
    contract::{Contract, Eviction},
    payment::Payment,
    renter::Renter,
    room::Room,
};
