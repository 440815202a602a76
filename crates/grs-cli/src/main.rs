#![forbid(unsafe_code)]

mod cmd;
mod config;
mod output;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use output::{CliError, OutputMode};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "grs: spectral and curvature robustness scores for graphs",
    long_about = None
)]
struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format: pretty, text or json.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Config file (defaults to ./grs.toml when present).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Scoring",
        about = "Score an edge list",
        long_about = "Compute the spectral gap, singular-value variance and average curvature \
                      of an edge list and combine them into a robustness score.",
        after_help = "EXAMPLES:\n    # Score a numeric edge list\n    grs score edges.csv\n\n    # String labels, whitespace separated, proxy curvature\n    grs score net.txt --tokens --whitespace --curvature proxy\n\n    # Legacy weighting with machine-readable output\n    grs score edges.csv --preset legacy --format json"
    )]
    Score(cmd::score::ScoreArgs),

    #[command(
        next_help_heading = "Scoring",
        about = "Remove edges and compare scores",
        long_about = "Remove a fraction of edges (random or hub-targeted) and report the score \
                      before and after the attack.",
        after_help = "EXAMPLES:\n    # Remove 20% of edges at random\n    grs attack edges.csv --fraction 0.2 --seed 7\n\n    # Target hubs and keep the damaged graph\n    grs attack edges.csv --strategy hub -o attacked.csv"
    )]
    Attack(cmd::attack::AttackArgs),

    #[command(
        next_help_heading = "Scoring",
        about = "Score a graph across increasing attack fractions",
        long_about = "Build a degradation curve: the mean, min and max score after removing \
                      evenly spaced fractions of edges.",
        after_help = "EXAMPLES:\n    # Five steps up to half the edges, three trials each\n    grs sweep edges.csv\n\n    # Hub-targeted sweep as JSON\n    grs sweep edges.csv --strategy hub --steps 10 --json"
    )]
    Sweep(cmd::sweep::SweepArgs),

    #[command(
        next_help_heading = "Utilities",
        about = "Generate a sample graph",
        long_about = "Generate a sample graph and write it as an edge list.",
        after_help = "EXAMPLES:\n    # A 12-node cycle on stdout\n    grs sample cycle -n 12\n\n    # A seeded preferential-attachment graph\n    grs sample barabasi-albert -n 200 --m 3 --seed 1 -o ba.csv"
    )]
    Sample(cmd::sample::SampleArgs),

    #[command(
        next_help_heading = "Utilities",
        about = "Show curvature capabilities",
        long_about = "Show which curvature providers this build offers and the configured \
                      exact-curvature edge limit."
    )]
    Caps,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("GRS_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "grs=debug,grs_core=debug,grs_score=debug,info"
        } else {
            "grs=info,warn"
        })
    });

    let format = env::var("GRS_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: &Cli, output: OutputMode) -> anyhow::Result<()> {
    let config = config::load_config(cli.config.as_deref())?;
    debug!(?output, "resolved output mode");

    match &cli.command {
        Commands::Score(args) => cmd::score::run_score(args, &config, output),
        Commands::Attack(args) => cmd::attack::run_attack(args, &config, output),
        Commands::Sweep(args) => cmd::sweep::run_sweep(args, &config, output),
        Commands::Sample(args) => cmd::sample::run_sample(args, output),
        Commands::Caps => cmd::caps::run_caps(&config, output),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = cli.output_mode();
    match run(&cli, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!(error = ?err, "command failed");
            if let Err(render_err) = output::render_error(output, &CliError::from(&err)) {
                eprintln!("error: {err:#} ({render_err})");
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn json_flag_after_subcommand() {
        let cli = Cli::parse_from(["grs", "score", "edges.csv", "--json"]);
        assert!(cli.json);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn format_flag_wins_over_json() {
        let cli = Cli::parse_from(["grs", "--json", "--format", "text", "caps"]);
        assert_eq!(cli.output_mode(), OutputMode::Text);
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::parse_from(["grs", "caps", "--config", "custom.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(matches!(cli.command, Commands::Caps));
    }

    #[test]
    fn sample_subcommand_parses_kind() {
        let cli = Cli::parse_from(["grs", "sample", "double-star", "-n", "8"]);
        match cli.command {
            Commands::Sample(args) => {
                assert_eq!(args.kind, cmd::sample::SampleKind::DoubleStar);
                assert_eq!(args.nodes, 8);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
