//! `growth-screener`: screen a market for revenue and profit growth.

use std::{fs::File, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{ArgGroup, Args, Parser, Subcommand};
use polars::prelude::{CsvWriter, SerWriter};
use screener::{
    MarketProfile, ProfileKind, ProgressObserver, ProviderChoice, ScreenOutcome,
    Screener, ScreenerConfig, Selection, Symbol, Thresholds, TickerResolver,
};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod render;

use render::{Severity, banner, results_table};

#[derive(Parser, Debug)]
#[command(name = "growth-screener", version)]
#[command(about = "Screen stocks by revenue CAGR, net profit growth and the Rule of 40", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a screen and print the ranked matches
    Run(RunArgs),
    /// List the universes and sectors a profile offers
    Universes {
        /// Market profile
        #[arg(long, env = "SCREENER_PROFILE", default_value = "thai-set")]
        profile: ProfileKind,
    },
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("selection").args(["universe", "sector", "tickers"])))]
struct RunArgs {
    /// Market profile: thai-set, us-sectors or rule-of-40
    #[arg(long, env = "SCREENER_PROFILE", default_value = "thai-set")]
    profile: ProfileKind,

    /// Named universe, e.g. SET50
    #[arg(long)]
    universe: Option<String>,

    /// Named sector, e.g. Technology
    #[arg(long)]
    sector: Option<String>,

    /// Comma-separated tickers, e.g. "AOT, PTT"
    #[arg(long)]
    tickers: Option<String>,

    /// Lookback in years: 1, 3, 5, 7 or 10
    #[arg(long)]
    years: Option<u32>,

    /// Minimum revenue CAGR in percent
    #[arg(long)]
    min_cagr: Option<f64>,

    /// Keep only tickers whose net profit grew
    #[arg(long, overrides_with = "any_profit_growth")]
    profit_growth_only: bool,

    /// Keep tickers regardless of profit growth
    #[arg(long)]
    any_profit_growth: bool,

    /// Minimum Rule of 40 score
    #[arg(long = "min-rule40")]
    min_rule_of_40: Option<f64>,

    /// Maximum Rule of 40 score
    #[arg(long = "max-rule40")]
    max_rule_of_40: Option<f64>,

    /// Fundamentals source: yahoo, fmp or auto
    #[arg(long, default_value = "yahoo")]
    provider: ProviderChoice,

    /// Financial Modeling Prep API key
    #[arg(long, env = "FMP_API_KEY", hide_env_values = true)]
    fmp_api_key: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Write the ranked matches to a CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

impl RunArgs {
    /// The explicit selection, or the profile's first universe or sector.
    fn selection(&self, profile: &MarketProfile) -> Selection {
        if let Some(text) = &self.tickers {
            return Selection::Custom(text.clone());
        }
        if let Some(name) = &self.sector {
            return Selection::Sector(name.clone());
        }
        if let Some(name) = &self.universe {
            return Selection::Universe(name.clone());
        }
        match (profile.universes.first(), profile.sectors.first()) {
            (Some(universe), _) => Selection::Universe(universe.name.clone()),
            (None, Some(sector)) => Selection::Sector(sector.name.clone()),
            (None, None) => Selection::Custom(String::new()),
        }
    }

    /// Profile defaults overridden by whatever was passed.
    fn thresholds(&self, profile: &MarketProfile) -> Thresholds {
        let mut thresholds = profile.default_thresholds.clone();
        if let Some(min) = self.min_cagr {
            thresholds.min_revenue_cagr = min;
        }
        if self.profit_growth_only {
            thresholds.positive_profit_growth = true;
        }
        if self.any_profit_growth {
            thresholds.positive_profit_growth = false;
        }
        if self.min_rule_of_40.is_some() {
            thresholds.min_rule_of_40 = self.min_rule_of_40;
        }
        if self.max_rule_of_40.is_some() {
            thresholds.max_rule_of_40 = self.max_rule_of_40;
        }
        thresholds
    }

    fn config(&self) -> Result<ScreenerConfig> {
        let mut builder = ScreenerConfig::builder()
            .profile(self.profile)
            .provider(self.provider)
            .request_timeout(Duration::from_secs(self.timeout));
        if let Some(years) = self.years {
            builder = builder.years(years);
        }
        if let Some(key) = &self.fmp_api_key {
            builder = builder.fmp_api_key(key.as_str());
        }
        builder.build().context("invalid screener configuration")
    }
}

/// Prints one progress line per ticker to stderr.
#[derive(Debug)]
struct StderrProgress;

impl ProgressObserver for StderrProgress {
    fn on_progress(&self, index: usize, total: usize, symbol: &Symbol) {
        eprintln!("[{index}/{total}] fetching {symbol}");
    }

    fn on_finish(&self) {
        eprintln!("done");
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(args: RunArgs) -> Result<()> {
    let config = args.config()?;
    debug!(?config, "Starting screen");

    let screener = Screener::from_config(&config).context("failed to set up data providers")?;
    let selection = args.selection(screener.profile());
    let thresholds = args.thresholds(screener.profile());

    let outcome = screener.run(&selection, &thresholds, &StderrProgress).await;

    let (severity, message) = banner(&outcome, &thresholds.chain().describe());
    match severity {
        Severity::Success => println!("{} {message}", severity.prefix()),
        Severity::Warning | Severity::Error => eprintln!("{} {message}", severity.prefix()),
    }

    let ScreenOutcome::Matches(report) = outcome else {
        return Ok(());
    };

    println!("{}", results_table(&report));

    if let Some(path) = &args.csv {
        let mut df = report.to_frame()?;
        let mut file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        CsvWriter::new(&mut file)
            .finish(&mut df)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Saved {} rows to {}", df.height(), path.display());
    }

    Ok(())
}

fn list_universes(kind: ProfileKind) {
    let profile = kind.profile();
    let resolver = TickerResolver::new(&profile);

    println!("Profile: {kind}");
    if let Some(suffix) = &profile.market_suffix {
        println!("Market suffix: {suffix}");
    }
    for (label, names) in [
        ("Universes", resolver.universe_names()),
        ("Sectors", resolver.sector_names()),
    ] {
        if !names.is_empty() {
            println!("{label}: {}", names.join(", "));
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run(args).await,
        Commands::Universes { profile } => {
            list_universes(profile);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> RunArgs {
        let argv = ["growth-screener", "run"].into_iter().chain(args.iter().copied());
        match Cli::parse_from(argv).command {
            Commands::Run(args) => args,
            Commands::Universes { .. } => panic!("expected run"),
        }
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_selection_is_first_universe() {
        let args = parse(&["--profile", "thai-set"]);
        let profile = MarketProfile::thai_set();
        assert_eq!(args.selection(&profile), Selection::Universe("SET50".to_string()));

        let args = parse(&["--profile", "us-sectors"]);
        let profile = MarketProfile::us_sectors();
        assert_eq!(args.selection(&profile), Selection::Sector("Technology".to_string()));
    }

    #[test]
    fn test_tickers_selection() {
        let args = parse(&["--tickers", "AOT, PTT"]);
        let profile = MarketProfile::thai_set();
        assert_eq!(args.selection(&profile), Selection::Custom("AOT, PTT".to_string()));
    }

    #[test]
    fn test_selection_flags_conflict() {
        let result = Cli::try_parse_from([
            "growth-screener",
            "run",
            "--universe",
            "SET50",
            "--tickers",
            "AOT",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_threshold_overrides() {
        let profile = MarketProfile::rule_of_40();
        let args = parse(&["--profile", "rule-of-40", "--max-rule40", "150", "--min-cagr", "10"]);
        let thresholds = args.thresholds(&profile);

        assert_eq!(thresholds.min_revenue_cagr, 10.0);
        assert_eq!(thresholds.min_rule_of_40, Some(40.0));
        assert_eq!(thresholds.max_rule_of_40, Some(150.0));
        assert!(!thresholds.positive_profit_growth);

        let args = parse(&["--any-profit-growth"]);
        assert!(!args.thresholds(&MarketProfile::thai_set()).positive_profit_growth);
    }

    #[test]
    fn test_unsupported_lookback_is_rejected() {
        let args = parse(&["--years", "4"]);
        assert!(args.config().is_err());

        let args = parse(&["--years", "10"]);
        assert_eq!(args.config().unwrap().years, 10);
    }
}
