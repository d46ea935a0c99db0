//! Covenant Engine demo CLI
//!
//! Runs the sustainability-linked loan scenarios, or calls one of the
//! financial calculators directly and prints its result as JSON.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- ratchet-breach
//!   cargo run -p demo -- bypass-attempt
//!   cargo run -p demo -- discount
//!   cargo run -p demo -- ratchet --ndvi 0.65 --spt 0.8 --principal 10000000
//!   cargo run -p demo -- breach-impact --principal 10000000 --base-bps 200 --penalty-bps 225
//!   cargo run -p demo -- spread-schedule --base-bps 200 --penalty-bps 225 --trigger NDVI_Q3

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use covenant_contracts::{
    error::CovenantResult,
    terms::{DEFAULT_BASE_SPREAD_BPS, DEFAULT_STEP_BPS},
};
use covenant_finance::{calculate_breach_impact, calculate_margin_ratchet, generate_spread_schedule_cdm};
use covenant_ref_sll::scenarios::{bypass_attempt, discount, ratchet_breach};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Covenant engine: policy decisions and margin ratchets for
/// sustainability-linked loans.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "Covenant engine sustainability-linked loan demo",
    long_about = "Runs sustainability-linked loan scenarios showing the decision state machine,\n\
                  margin ratchet, spread-schedule diffs, and audit chain integrity."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all three scenarios in sequence.
    RunAll,
    /// Scenario 1: flag then block as NDVI falls through breach tiers.
    RatchetBreach,
    /// Scenario 2: attempts to reopen a blocked transaction are rejected.
    BypassAttempt,
    /// Scenario 3: an outperforming asset earns a spread discount.
    Discount,
    /// Classify one NDVI measurement and compute the margin ratchet.
    Ratchet {
        #[arg(long)]
        ndvi: f64,
        #[arg(long)]
        spt: f64,
        #[arg(long)]
        principal: f64,
        #[arg(long, default_value_t = DEFAULT_BASE_SPREAD_BPS)]
        base_bps: i64,
        #[arg(long, default_value_t = DEFAULT_STEP_BPS)]
        step_bps: i64,
    },
    /// Annualized cost of moving from a base spread to a penalty spread.
    BreachImpact {
        #[arg(long)]
        principal: f64,
        #[arg(long)]
        base_bps: i64,
        #[arg(long)]
        penalty_bps: i64,
    },
    /// Before/after spread-schedule diff for a spread change.
    SpreadSchedule {
        #[arg(long)]
        base_bps: i64,
        #[arg(long)]
        penalty_bps: i64,
        #[arg(long)]
        trigger: String,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::RunAll => {
            print_banner();
            run_all()
        }
        Command::RatchetBreach => {
            print_banner();
            ratchet_breach::run_scenario()
        }
        Command::BypassAttempt => {
            print_banner();
            bypass_attempt::run_scenario()
        }
        Command::Discount => {
            print_banner();
            discount::run_scenario()
        }
        Command::Ratchet { ndvi, spt, principal, base_bps, step_bps } => {
            print_json(&calculate_margin_ratchet(ndvi, spt, principal, base_bps, step_bps))
        }
        Command::BreachImpact { principal, base_bps, penalty_bps } => {
            print_json(&calculate_breach_impact(principal, base_bps, penalty_bps))
        }
        Command::SpreadSchedule { base_bps, penalty_bps, trigger } => {
            print_json(&generate_spread_schedule_cdm(base_bps, penalty_bps, &trigger))
        }
    };

    if let Err(e) = result {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

// ── Dispatch helpers ──────────────────────────────────────────────────────────

fn run_all() -> CovenantResult<()> {
    ratchet_breach::run_scenario()?;
    bypass_attempt::run_scenario()?;
    discount::run_scenario()?;
    println!("All scenarios completed successfully.");
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> CovenantResult<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    debug!(bytes = rendered.len(), "calculator result rendered");
    println!("{}", rendered);
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("Covenant Engine");
    println!("Sustainability-Linked Loan Reference Demo");
    println!("=========================================");
    println!();
    println!("Pipeline per decision:");
    println!("  [1] Rule evaluator proposes ALLOW / BLOCK / FLAG");
    println!("  [2] Transition table validates the move; illegal moves stop here");
    println!("  [3] NDVI measurement fetched and margin ratchet computed");
    println!("  [4] Decision summary and spread-schedule diff written to the deal document");
    println!("  [5] Audit entry appended to the SHA-256 chain; terminal states close it");
    println!();
}
