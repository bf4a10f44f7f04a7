//! [`Contract`] read model definition.

use common::Date;

use crate::{
    domain::{Contract, Payment},
    ledger::{self, BalanceView},
};

/// [`Contract`] along with its [`Payment`]s and derived [`BalanceView`].
#[derive(Clone, Debug)]
pub struct Ledger {
    /// [`Contract`] itself.
    pub contract: Contract,

    /// [`Payment`]s made towards the [`Contract`], ordered by date.
    pub payments: Vec<Payment>,

    /// [`BalanceView`] of the [`Contract`] as of today.
    pub view: BalanceView,
}

impl Ledger {
    /// Derives a new [`Ledger`] of the provided [`Contract`] and its
    /// [`Payment`]s as of `today`, or as of its closing if it's closed
    /// earlier.
    #[must_use]
    pub fn new(
        contract: Contract,
        payments: Vec<Payment>,
        calculator: &ledger::Calculator,
        today: Date,
    ) -> Self {
        let view = calculator.balance_view(
            &contract.snapshot(),
            payments.iter().map(|p| p.amount.amount),
            contract.evaluation_date(today),
        );
        Self {
            contract,
            payments,
            view,
        }
    }
}
