//! [`Config`]-related definitions.

use common::Percent;
use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use service::ledger;
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct Config {
    /// Ledger configuration.
    #[serde(default)]
    pub ledger: Ledger,

    /// Log configuration.
    #[serde(default)]
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Ledger configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Ledger {
    /// Formula of the total rent.
    pub rent_formula: RentFormula,

    /// Policy of charging a late fee.
    pub late_fee: LateFee,

    /// Share of the outstanding balance charged by the [`LateFee::Flat`]
    /// policy.
    #[default(Percent::TEN)]
    pub flat_late_fee_percent: Percent,
}

impl From<Ledger> for service::Config {
    fn from(value: Ledger) -> Self {
        let Ledger {
            rent_formula,
            late_fee,
            flat_late_fee_percent,
        } = value;

        Self {
            ledger: ledger::Calculator {
                rent: rent_formula.into(),
                late_fee: match late_fee {
                    LateFee::PerDiem => ledger::LateFeePolicy::PerDiem,
                    LateFee::Flat => {
                        ledger::LateFeePolicy::Flat(flat_late_fee_percent)
                    }
                },
            },
        }
    }
}

/// Formula of the total rent.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RentFormula {
    /// Whole calendar months plus the remaining days.
    #[default]
    CalendarMonths,

    /// Classification of the term by its length in days.
    DayClassification,
}

impl From<RentFormula> for ledger::RentFormula {
    fn from(value: RentFormula) -> Self {
        match value {
            RentFormula::CalendarMonths => Self::CalendarMonths,
            RentFormula::DayClassification => Self::DayClassification,
        }
    }
}

/// Policy of charging a late fee.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LateFee {
    /// Daily rate for each day overdue.
    #[default]
    PerDiem,

    /// One-time share of the outstanding balance.
    Flat,
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[cfg(test)]
mod spec {
    use std::{env, fs};

    use common::Percent;
    use service::ledger;

    use super::{Config, LateFee, Ledger, LogLevel, RentFormula};

    fn file(name: &str, content: &str) -> String {
        let path = env::temp_dir().join(name);
        fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn defaults_to_canonical_formulas() {
        let config = Config::new("non-existent.toml").unwrap();
        let service: service::Config = config.ledger.into();

        assert_eq!(service.ledger.rent, ledger::RentFormula::CalendarMonths);
        assert_eq!(service.ledger.late_fee, ledger::LateFeePolicy::PerDiem);
    }

    #[test]
    fn selects_legacy_formulas() {
        let service: service::Config = Ledger {
            rent_formula: RentFormula::DayClassification,
            late_fee: LateFee::Flat,
            flat_late_fee_percent: Percent::TEN,
        }
        .into();

        assert_eq!(
            service.ledger.rent,
            ledger::RentFormula::DayClassification,
        );
        assert_eq!(service.ledger.late_fee, ledger::LateFeePolicy::LEGACY_FLAT);
    }

    #[test]
    fn loads_flat_late_fee_percent() {
        let path = file(
            "rent-ledger-config-flat.toml",
            r#"
                [ledger]
                late_fee = "FLAT"
                flat_late_fee_percent = 15

                [log]
                level = "DEBUG"
            "#,
        );

        let config = Config::new(&path).unwrap();
        assert!(matches!(config.log.level, LogLevel::Debug));

        let service: service::Config = config.ledger.into();
        assert_eq!(
            service.ledger.late_fee,
            ledger::LateFeePolicy::Flat("15".parse().unwrap()),
        );
    }

    #[test]
    fn rejects_out_of_range_percent() {
        let path = file(
            "rent-ledger-config-overflow.toml",
            r#"
                [ledger]
                flat_late_fee_percent = 150
            "#,
        );

        assert!(Config::new(&path).is_err());
    }
}
