use anyhow::Context;
use api_client::{BankClient, MonzoClient};
use chrono::Local;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use configuration::{init_logging, load_config, Config};
use core_types::{Pot, RuleId};
use engine::LiveEngine;
use executor::LiveExecutor;
use std::path::PathBuf;
use std::sync::Arc;

/// The main entry point for the pot rebalancer.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the token may come from the config or the environment.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    let _log_guard = init_logging(&config.logging)?;
    tracing::debug!(path = %cli.config.display(), "Configuration loaded.");

    // Execute the appropriate command
    match cli.command {
        Commands::Run(args) => handle_run(config, args).await,
        Commands::Pots => handle_pots(config).await,
        Commands::Plan(args) => handle_plan(config, args).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Keeps bank pots topped up, funded and saving according to the rules in their names.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the polling loop.
    Run(RunArgs),
    /// Print every open account's pots with their resolved configuration.
    Pots,
    /// Show the transfers one cycle would make, without moving any money.
    Plan(PlanArgs),
}

#[derive(Parser)]
struct RunArgs {
    /// Log every transfer but send none to the bank.
    #[arg(long)]
    dry_run: bool,

    /// Run a single cycle and exit.
    #[arg(long)]
    once: bool,
}

#[derive(Parser)]
struct PlanArgs {
    /// Only apply these rules, in the order given (e.g. `--rule minimum --rule PGP`).
    #[arg(long = "rule")]
    rules: Vec<RuleId>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn bank_client(config: &Config) -> anyhow::Result<Arc<dyn BankClient>> {
    let client = MonzoClient::new(&config.api).context("failed to build the bank client")?;
    Ok(Arc::new(client))
}

async fn handle_run(mut config: Config, args: RunArgs) -> anyhow::Result<()> {
    if args.dry_run {
        config.engine.dry_run = true;
    }
    let mut engine = build_engine(config)?;
    engine.run(args.once).await?;
    Ok(())
}

fn build_engine(config: Config) -> anyhow::Result<LiveEngine> {
    let api_client = bank_client(&config)?;
    let executor = Arc::new(LiveExecutor::new(
        Arc::clone(&api_client),
        config.engine.transfer_pause(),
    ));
    Ok(LiveEngine::new(config.engine, api_client, executor))
}

async fn handle_pots(config: Config) -> anyhow::Result<()> {
    let mut engine = build_engine(config)?;
    engine.init().await?;

    for snapshot in engine.snapshots().await {
        println!(
            "\n{} ({}) - balance {}",
            snapshot.account.description,
            snapshot.account.id,
            snapshot.balance.map(format_money).unwrap_or_else(|| "n/a".to_string())
        );
        println!("{}", pots_table(&snapshot.pots));
    }
    Ok(())
}

async fn handle_plan(mut config: Config, args: PlanArgs) -> anyhow::Result<()> {
    if !args.rules.is_empty() {
        config.engine.rules = args.rules;
    }
    config.engine.dry_run = true;
    let mut engine = build_engine(config)?;
    engine.init().await?;

    for (account, ledger) in engine.plan(Local::now().date_naive()).await {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec!["Rule", "From", "To", "Amount"]);
        for transfer in ledger.transfers() {
            table.add_row(vec![
                transfer.label.clone(),
                transfer.source.to_string(),
                transfer.destination.to_string(),
                format_money(transfer.amount),
            ]);
        }
        println!(
            "\n{} ({}) - {} planned transfer(s)",
            account.description,
            account.id,
            ledger.transfers().len()
        );
        println!("{table}");
    }
    Ok(())
}

fn pots_table(pots: &[Pot]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Pot", "Balance", "Goal", "Minimum", "MP", "MTD", "FP", "WP", "SV", "SP", "RV", "RM", "In",
        "Out", "Flags",
    ]);
    for pot in pots {
        let c = &pot.config;
        let mut flags = Vec::new();
        if pot.locked {
            flags.push("locked");
        }
        if pot.is_savings {
            flags.push("savings");
        }
        table.add_row(vec![
            pot.name.clone(),
            format_money(pot.balance),
            format_money(pot.goal),
            format_money(c.minimum_amount),
            c.minimum_priority.to_string(),
            c.minimum_transfer_day.to_string(),
            c.funding_priority.to_string(),
            c.weighted_priority.to_string(),
            c.saving_value.to_string(),
            c.saving_priority.to_string(),
            c.roundup_value.to_string(),
            format_money(c.roundup_minimum),
            format_money(pot.activity.credits),
            format_money(pot.activity.debits),
            flags.join(", "),
        ]);
    }
    table
}

/// Formats minor units as pounds and pence.
fn format_money(pence: i64) -> String {
    let sign = if pence < 0 { "-" } else { "" };
    let abs = pence.unsigned_abs();
    format!("{sign}£{}.{:02}", abs / 100, abs % 100)
}
