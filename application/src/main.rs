use std::{io, process::ExitCode, sync::OnceLock};

use application::{Args, Config, LedgerFile, Report, Service};
use common::{clock, Clock as _};
use service::infra::Memory;
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stdout)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (!STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stderr)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
                })),
        )
        .init();

    match start().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE,
    }
}

async fn start() -> Result<(), ()> {
    let Args {
        config,
        ledger,
        today,
    } = Args::parse().unwrap_or_else(|e| e.exit());

    let Config { ledger: calc, log } = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let file = LedgerFile::load(&ledger).map_err(|e| {
        log::error!("failed to load ledger from `{ledger}`: {e}");
    })?;

    let today = today.unwrap_or_else(|| clock::System.today());
    log::debug!("deriving ledger of `{ledger}` as of {today}");

    let service = Service::with_clock(
        calc.into(),
        Memory::new(),
        clock::Fixed::at(today),
    );

    let ledger = file.replay(&service).await.map_err(|e| {
        log::error!("failed to replay ledger: {e}\n{}", e.trace());
    })?;

    print!("{}", Report(&ledger));

    Ok(())
}
