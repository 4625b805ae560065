//! Forex command line front end.
//!
//! Loads the exchange configuration, installs the process-wide exchange and
//! runs one command.

mod cli;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use forex_core::{Exchange, RoundMode};
use forex_shared::ExchangeConfig;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command, Direction};

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forex=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
    let config = ExchangeConfig::load_from(&cli.config_dir, &run_mode)
        .with_context(|| format!("failed to load configuration from {}", cli.config_dir.display()))?;

    let exchange = Exchange::install(Exchange::from_config(&config)?);
    info!(sources = exchange.chain().len(), run_mode = %run_mode, "exchange installed");

    run(&cli.command, &exchange)
}

fn run(command: &Command, exchange: &Arc<Exchange>) -> anyhow::Result<()> {
    match command {
        Command::Convert(args) => {
            let money = match args.at {
                Some(at) => exchange.money_at(args.amount.as_str(), args.from.as_str(), at)?,
                None => exchange.money(args.amount.as_str(), args.from.as_str())?,
            };
            let mut converted = money.to(args.to.as_str())?;
            if args.iso {
                converted = converted.round(RoundMode::Minor);
            }
            println!("{}", converted.render(args.style.into()));
        }
        Command::Round(args) => {
            let money = exchange.money(args.amount.as_str(), args.currency.as_str())?;
            let mode = args.mode();
            let rounded = match args.direction {
                Direction::Nearest => money.round(mode),
                Direction::Up => money.ceil(mode),
                Direction::Down => money.floor(mode),
            };
            println!("{}", rounded.amount());
        }
        Command::Split(args) => {
            let money = exchange.money(args.amount.as_str(), args.currency.as_str())?;
            for part in money.split(args.parts)? {
                println!("{}", part.amount());
            }
        }
        Command::Format(args) => {
            let money = exchange.money(args.amount.as_str(), args.currency.as_str())?;
            let rendered = if args.markup {
                money.to_markup(args.style.into())
            } else {
                money.render(args.style.into())
            };
            println!("{rendered}");
        }
        Command::Sources => {
            for (position, source) in exchange.chain().sources().iter().enumerate() {
                let currencies: Vec<&str> = source.currencies().iter().map(|code| code.as_str()).collect();
                println!("{position}: {} [{}]", source.id(), currencies.join(", "));
            }
        }
    }
    Ok(())
}
