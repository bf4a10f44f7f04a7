//! [`LedgerFile`] definitions.

use std::fmt;

use common::{clock, Money};
use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use service::{
    command::{
        record_payment::Amount, CreateContract, CreateRenter, CreateRoom,
        RecordPayment,
    },
    domain::{contract, payment, renter, room},
    infra::Memory,
    query::ContractLedger,
    read, Command as _, Query as _,
};
use tracerr::Traced;
use tracing as log;

use crate::Error;

/// [`service::Service`] replaying [`LedgerFile`]s.
pub type Service = service::Service<Memory, clock::Fixed>;

/// Contract along with its payments, as stored in a file.
#[derive(Clone, Debug, Deserialize)]
pub struct LedgerFile {
    /// Terms of the contract.
    pub contract: Contract,

    /// Payments made towards the contract.
    #[serde(default)]
    pub payments: Vec<Payment>,
}

/// Terms of a contract in a [`LedgerFile`].
#[derive(Clone, Debug, Deserialize)]
pub struct Contract {
    /// Number of the rented room.
    #[serde(default = "Contract::default_room")]
    pub room: String,

    /// Name of the renter.
    #[serde(default = "Contract::default_renter")]
    pub renter: String,

    /// Kind of the contract.
    pub kind: contract::Kind,

    /// First day of the term.
    pub start_date: contract::StartDate,

    /// Last day of the term, if not defaulted by the `kind`.
    pub end_date: Option<contract::EndDate>,

    /// Rent per calendar month.
    pub monthly_rate: Money,

    /// Rent per day, if agreed explicitly.
    pub daily_rate: Option<Money>,

    /// Total rent fixed for the term, if any.
    pub total_rent: Option<Money>,
}

impl Contract {
    fn default_room() -> String {
        "1".to_owned()
    }

    fn default_renter() -> String {
        "Renter".to_owned()
    }
}

/// Payment in a [`LedgerFile`].
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Payment {
    /// Paid amount.
    pub amount: Money,

    /// Date of the payment.
    pub date: payment::Date,
}

impl LedgerFile {
    /// Loads a [`LedgerFile`] from the provided `path`, detecting its format
    /// (TOML, JSON, YAML) by the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or malformed.
    pub fn load(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()))
            .build()?
            .try_deserialize()
    }

    /// Replays this [`LedgerFile`] on the provided [`Service`], returning the
    /// resulting [`read::Ledger`] of the contract.
    ///
    /// # Errors
    ///
    /// Returns an error if the contract or any of its payments is rejected.
    pub async fn replay(
        self,
        service: &Service,
    ) -> Result<read::Ledger, Traced<Error>> {
        let Self { contract, payments } = self;

        let number = room::Number::new(contract.room.clone())
            .ok_or(Error::InvalidRoomNumber(contract.room))
            .map_err(tracerr::wrap!())?;
        let name = renter::Name::new(contract.renter.clone())
            .ok_or(Error::InvalidRenterName(contract.renter))
            .map_err(tracerr::wrap!())?;

        let room = service
            .execute(CreateRoom {
                number,
                monthly_rate: contract.monthly_rate,
            })
            .await
            .map_err(tracerr::map_from_and_wrap!(=> Error))?;
        let renter = service
            .execute(CreateRenter {
                name,
                email: None,
                phone: None,
            })
            .await
            .map_err(tracerr::map_from_and_wrap!(=> Error))?;

        let created = service
            .execute(CreateContract {
                room_id: room.id,
                renter_id: renter.id,
                kind: contract.kind,
                start_date: contract.start_date,
                end_date: contract.end_date,
                monthly_rate: None,
                daily_rate: contract.daily_rate,
                total_rent: contract.total_rent,
            })
            .await
            .map_err(tracerr::map_from_and_wrap!(=> Error))?;
        log::info!(
            "replaying {} payment(s) of `Contract(id: {})` from {} until {}",
            payments.len(),
            created.id,
            created.start_date,
            created.end_date,
        );

        for Payment { amount, date } in payments {
            _ = service
                .execute(RecordPayment {
                    contract_id: created.id,
                    amount: Amount::Exact(amount),
                    date: Some(date),
                })
                .await
                .map_err(tracerr::map_from_and_wrap!(=> Error))?;
        }

        service
            .execute(ContractLedger(created.id))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> Error))?
            .ok_or(Error::LedgerNotExists(created.id))
            .map_err(tracerr::wrap!())
    }
}

/// Printable report of a [`read::Ledger`] in `key: value` lines.
#[derive(Clone, Copy, Debug)]
pub struct Report<'a>(pub &'a read::Ledger);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let read::Ledger {
            contract,
            payments,
            view,
        } = self.0;

        writeln!(f, "contract: {}", contract.id)?;
        writeln!(f, "kind: {}", contract.kind)?;
        writeln!(f, "start_date: {}", contract.start_date)?;
        writeln!(f, "end_date: {}", contract.end_date)?;
        writeln!(f, "payments: {}", payments.len())?;
        writeln!(f, "total_rent: {}", view.total_rent)?;
        writeln!(f, "total_paid: {}", view.total_paid)?;
        writeln!(f, "balance: {}", view.balance)?;
        writeln!(f, "days_overdue: {}", view.days_overdue)?;
        writeln!(f, "late_fee: {}", view.late_fee)?;
        writeln!(f, "total_due: {}", view.total_due)?;
        writeln!(f, "status: {}", view.status)?;
        writeln!(f, "paid_percentage: {}", view.percentage())
    }
}

#[cfg(test)]
mod spec {
    use std::{env, fs};

    use common::clock;
    use service::{infra::Memory, ledger::PaymentStatus};

    use crate::Error;

    use super::{LedgerFile, Report, Service};

    fn service(today: &str) -> Service {
        Service::with_clock(
            service::Config::default(),
            Memory::new(),
            clock::Fixed::at(today.parse().unwrap()),
        )
    }

    fn file(name: &str, content: &str) -> String {
        let path = env::temp_dir().join(name);
        fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[tokio::test]
    async fn replays_toml_ledger() {
        let path = file(
            "rent-ledger-overdue.toml",
            r#"
                [contract]
                kind = "CUSTOM"
                start_date = "2024-01-01"
                end_date = "2024-03-01"
                monthly_rate = "2500USD"
                daily_rate = "100USD"

                [[payments]]
                amount = "1500USD"
                date = "2024-01-10"

                [[payments]]
                amount = "500USD"
                date = "2024-02-10"
            "#,
        );

        let ledger = LedgerFile::load(&path)
            .unwrap()
            .replay(&service("2024-03-11"))
            .await
            .unwrap();

        assert_eq!(ledger.payments.len(), 2);
        assert_eq!(ledger.view.total_rent.to_string(), "5000USD");
        assert_eq!(ledger.view.balance.to_string(), "3000USD");
        assert_eq!(ledger.view.days_overdue, 10);
        assert_eq!(ledger.view.late_fee.to_string(), "1000USD");
        assert_eq!(ledger.view.total_due.to_string(), "4000USD");
        assert_eq!(ledger.view.status, PaymentStatus::Partial);

        let report = Report(&ledger).to_string();
        assert!(report.contains("total_due: 4000USD\n"), "{report}");
        assert!(report.contains("status: PARTIAL\n"), "{report}");
        assert!(report.ends_with("paid_percentage: 40\n"), "{report}");
    }

    #[tokio::test]
    async fn replays_json_ledger_with_stored_total() {
        let path = file(
            "rent-ledger-renewed.json",
            r#"{
                "contract": {
                    "kind": "MONTHLY",
                    "start_date": "2024-01-15",
                    "monthly_rate": "3000USD",
                    "total_rent": "9000USD"
                },
                "payments": [{ "amount": "9000USD", "date": "2024-01-15" }]
            }"#,
        );

        let ledger = LedgerFile::load(&path)
            .unwrap()
            .replay(&service("2024-05-01"))
            .await
            .unwrap();

        assert_eq!(ledger.contract.end_date.to_string(), "2024-02-15");
        assert_eq!(ledger.view.total_rent.to_string(), "9000USD");
        assert_eq!(ledger.view.late_fee.to_string(), "0USD");
        assert_eq!(ledger.view.status, PaymentStatus::Paid);
    }

    #[tokio::test]
    async fn rejects_overpayment() {
        let path = file(
            "rent-ledger-overpaid.toml",
            r#"
                [contract]
                kind = "CUSTOM"
                start_date = "2024-01-01"
                end_date = "2024-02-01"
                monthly_rate = "1000USD"

                [[payments]]
                amount = "1001USD"
                date = "2024-01-10"
            "#,
        );

        let err = LedgerFile::load(&path)
            .unwrap()
            .replay(&service("2024-01-20"))
            .await
            .unwrap_err();
        let err: &Error = err.as_ref();
        assert!(matches!(err, Error::RecordPayment(_)), "{err}");
    }

    #[test]
    fn fails_on_missing_file() {
        assert!(LedgerFile::load("/non-existent/ledger.toml").is_err());
    }
}
