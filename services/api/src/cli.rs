use crate::infra::{build_service, DEMO_CLIENT};
use crate::server;
use clap::{Args, Parser, Subcommand};
use invest_sim::advisory::SimulationRequest;
use invest_sim::clock::{Clock, SystemClock};
use invest_sim::engine::ClientId;
use invest_sim::error::AppError;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(
    name = "Investment Simulator",
    about = "Run the investment simulation service or price and profile from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Price a single simulation against the demo catalog
    Simulate(SimulateArgs),
    /// Compute the risk profile for a client in the demo portfolio
    Profile(ProfileArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct SimulateArgs {
    /// Product type label, e.g. CDB or Fundo
    #[arg(long)]
    pub(crate) product_type: String,
    /// Amount to invest
    #[arg(long)]
    pub(crate) amount: Decimal,
    /// Investment term in months
    #[arg(long)]
    pub(crate) term_months: i64,
    /// Client requesting the simulation (defaults to the demo client)
    #[arg(long)]
    pub(crate) client_id: Option<Uuid>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ProfileArgs {
    /// Client to profile (defaults to the demo client)
    #[arg(long)]
    pub(crate) client_id: Option<Uuid>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Simulate(args) => run_simulation(args),
        Command::Profile(args) => run_profile(args),
    }
}

fn resolve_client(client_id: Option<Uuid>) -> ClientId {
    client_id.map(ClientId).unwrap_or(DEMO_CLIENT)
}

pub(crate) fn run_simulation(args: SimulateArgs) -> Result<(), AppError> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let service = build_service(true, clock)?;

    let outcome = service.simulate(SimulationRequest {
        client_id: resolve_client(args.client_id),
        amount: args.amount,
        term_months: args.term_months,
        product_type: args.product_type,
    })?;

    print_json(&outcome)
}

pub(crate) fn run_profile(args: ProfileArgs) -> Result<(), AppError> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let service = build_service(true, clock)?;
    let client_id = resolve_client(args.client_id);

    let profile = service.risk_profile(&client_id)?;
    let recommendations = service.recommended_products(&profile.profile)?;

    print_json(&serde_json::json!({
        "profile": profile,
        "recommended_products": recommendations,
    }))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulate_subcommand_parses_decimal_amounts() {
        let cli = Cli::try_parse_from([
            "invest-sim-api",
            "simulate",
            "--product-type",
            "CDB",
            "--amount",
            "1500.50",
            "--term-months",
            "18",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Simulate(args)) => {
                assert_eq!(args.product_type, "CDB");
                assert_eq!(args.amount, rust_decimal_macros::dec!(1500.50));
                assert_eq!(args.term_months, 18);
                assert!(args.client_id.is_none());
            }
            other => panic!("expected simulate command, got {other:?}"),
        }
    }

    #[test]
    fn missing_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["invest-sim-api"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }

    #[test]
    fn profile_defaults_to_the_demo_client() {
        assert_eq!(resolve_client(None), DEMO_CLIENT);
        let other = Uuid::new_v4();
        assert_eq!(resolve_client(Some(other)), ClientId(other));
    }
}
