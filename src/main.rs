use chrono::Local;
use clap::Parser;
use money_tracker::args::{Args, Command};
use money_tracker::error::{describe, error_type, ErrorType, IntoResult};
use money_tracker::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {}", describe(&e));
            ExitCode::from(error_type(&e).map(|t| t.exit_code()).unwrap_or(1))
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();
    let json = args.common().json();
    let today = Local::now().date_naive();

    match args.command() {
        Command::Init(init_args) => commands::init(home, init_args).await?.print(json),
        Command::Add(add_args) => commands::add(load(home).await?, add_args, today)
            .await?
            .print(json),
        Command::Delete(delete_args) => commands::delete(load(home).await?, delete_args)
            .await?
            .print(json),
        Command::List(period_args) => commands::list(load(home).await?, period_args, today)
            .await?
            .print(json),
        Command::Summary(period_args) => commands::summary(load(home).await?, period_args, today)
            .await?
            .print(json),
        Command::Report(report_args) => commands::report(load(home).await?, report_args, today)
            .await?
            .print(json),
        Command::Export(export_args) => commands::export(load(home).await?, export_args, today)
            .await?
            .print(json),
        Command::Import(import_args) => commands::import(load(home).await?, import_args)
            .await?
            .print(json),
    }
    Ok(())
}

async fn load(home: &std::path::Path) -> Result<Config> {
    Config::load(home).await.pub_result(ErrorType::Config)
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        // RUST_LOG wins when it is set.
        Some(_) => EnvFilter::from_default_env(),
        // Otherwise only this binary and its library log, at `level`.
        None => EnvFilter::new(format!(
            "{}={level},money_tracker={level}",
            env!("CARGO_CRATE_NAME")
        )),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
