//! Read entities definitions.

pub mod contract;

pub use self::contract::Ledger;
