use clap::{Args, Parser, Subcommand};
use greeks_desk::config::AppConfig;
use greeks_desk::errors::{EngineError, EngineResult};
use greeks_desk::feeds::quote_api::QuoteClient;
use greeks_desk::models::black_scholes::BlackScholes;
use greeks_desk::models::sweep::{self, SweepRange};
use greeks_desk::models::GreeksModel;
use greeks_desk::state::{AppState, OptionParameters};
use greeks_desk::{cli, report, server};

#[derive(Parser)]
#[command(name = "greeks_desk", about = "Black-Scholes prices, Greeks and spot sweeps")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the JSON API (default)
    Serve,
    /// Ask for the parameters interactively
    Prompt,
    /// Price one contract
    Price(ContractArgs),
    /// Print a spot sweep as CSV
    Sweep {
        #[command(flatten)]
        contract: ContractArgs,
        #[arg(long)]
        low_frac: Option<f64>,
        #[arg(long)]
        high_frac: Option<f64>,
        #[arg(long)]
        steps: Option<usize>,
    },
}

#[derive(Args)]
struct ContractArgs {
    /// Underlying price; required unless --ticker is given
    #[arg(long, conflicts_with = "ticker", required_unless_present = "ticker")]
    spot: Option<f64>,
    /// Fetch the underlying price live
    #[arg(long)]
    ticker: Option<String>,
    #[arg(long)]
    strike: f64,
    /// Years to expiry
    #[arg(long)]
    expiry: f64,
    #[arg(long, allow_hyphen_values = true)]
    rate: f64,
    #[arg(long)]
    sigma: f64,
    /// call or put
    #[arg(long, default_value = "call")]
    kind: String,
}

impl ContractArgs {
    /// Resolve the spot (live or manual) and build the parameters.
    async fn resolve(&self, cfg: &AppConfig) -> EngineResult<(OptionParameters, bool)> {
        let (spot, live) = match (&self.ticker, self.spot) {
            (Some(ticker), _) => {
                let quote = QuoteClient::new(&cfg.quote_api_base_url)
                    .latest_close(ticker)
                    .await?;
                (quote.price, true)
            }
            (None, Some(spot)) => (spot, false),
            (None, None) => {
                return Err(EngineError::Config("either --spot or --ticker is required".into()))
            }
        };
        let params = OptionParameters::from_input(
            spot,
            self.strike,
            self.expiry,
            self.rate,
            self.sigma,
            &self.kind,
        )?;
        Ok((params, live))
    }
}

#[tokio::main]
async fn main() {
    // Structured logging on stderr so stdout stays clean for reports/CSV
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cfg = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("config error: {e}");
            std::process::exit(1);
        }
    };

    let result = match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(cfg).await,
        Command::Prompt => prompt(),
        Command::Price(contract) => price(&cfg, &contract).await,
        Command::Sweep {
            contract,
            low_frac,
            high_frac,
            steps,
        } => {
            let defaults = cfg.default_sweep;
            let range = SweepRange {
                low_frac: low_frac.unwrap_or(defaults.low_frac),
                high_frac: high_frac.unwrap_or(defaults.high_frac),
                steps: steps.unwrap_or(defaults.steps),
            };
            print_sweep(&cfg, &contract, range).await
        }
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

async fn serve(cfg: AppConfig) -> EngineResult<()> {
    let addr = format!("0.0.0.0:{}", cfg.server_port);
    let app = server::router(AppState::new(cfg));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("server listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

fn prompt() -> EngineResult<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    cli::run_prompt(&BlackScholes::new(), &mut stdin.lock(), &mut stdout.lock())?;
    Ok(())
}

async fn price(cfg: &AppConfig, contract: &ContractArgs) -> EngineResult<()> {
    let (params, live) = contract.resolve(cfg).await?;
    let greeks = BlackScholes::new().evaluate(&params)?;
    print!(
        "{}",
        report::render_summary(&greeks, params.spot, live, &cfg.currency_symbol)
    );
    Ok(())
}

async fn print_sweep(cfg: &AppConfig, contract: &ContractArgs, range: SweepRange) -> EngineResult<()> {
    let (params, _) = contract.resolve(cfg).await?;
    let result = sweep::sweep(&BlackScholes::new(), &params, range)?;
    print!("{}", report::sweep_csv(&result.to_series()));
    Ok(())
}
