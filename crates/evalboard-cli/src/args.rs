//! CLI argument definitions using clap
//!
//! - evalboard aggregate            # Build and write the leaderboard
//! - evalboard show <report>        # Render a written leaderboard
//! - evalboard pricing              # List model pricing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "evalboard")]
#[command(about = "Evalboard - leaderboard aggregation for multi-run benchmark results")]
#[command(version)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate run artifacts and write the leaderboard document
    Aggregate(AggregateArgs),

    /// Render an existing leaderboard document
    Show {
        /// Path to a leaderboard JSON document
        report: PathBuf,

        /// Output format: table, markdown, json
        #[arg(long, short, default_value = "table")]
        format: String,
    },

    /// List the effective model pricing table
    Pricing {
        /// Configuration file (TOML or JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Extra pricing file (TOML or JSON)
        #[arg(long)]
        pricing_file: Option<PathBuf>,

        /// Ignore the builtin pricing table
        #[arg(long)]
        replace: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct AggregateArgs {
    /// Configuration file (TOML or JSON); flags below override it
    #[arg(long, env = "EVALBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Root of the <group>/<implementation>/run-N tree
    #[arg(long, env = "EVALBOARD_RESULTS_DIR")]
    pub results_dir: Option<PathBuf>,

    /// Requested number of runs per implementation
    #[arg(short = 'k', long)]
    pub k: Option<usize>,

    /// Where to write the JSON leaderboard
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Extra pricing file (TOML or JSON)
    #[arg(long)]
    pub pricing_file: Option<PathBuf>,

    /// Only include these server groups (repeatable)
    #[arg(long = "server-group")]
    pub server_groups: Vec<String>,

    /// Console rendering after writing: table, markdown, json
    #[arg(long, short, default_value = "table")]
    pub format: String,

    /// Write the document without printing a rendering
    #[arg(long, short)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aggregate() {
        let cli = Cli::try_parse_from([
            "evalboard",
            "aggregate",
            "--results-dir",
            "./results",
            "-k",
            "3",
            "--server-group",
            "github",
            "--server-group",
            "notion",
            "-o",
            "out.json",
        ])
        .unwrap();

        match cli.command {
            Commands::Aggregate(args) => {
                assert_eq!(args.results_dir, Some(PathBuf::from("./results")));
                assert_eq!(args.k, Some(3));
                assert_eq!(args.server_groups, vec!["github", "notion"]);
                assert_eq!(args.output, Some(PathBuf::from("out.json")));
                assert_eq!(args.format, "table");
            }
            _ => panic!("Expected aggregate command"),
        }
    }

    #[test]
    fn test_parse_show_with_global_verbose() {
        let cli =
            Cli::try_parse_from(["evalboard", "show", "board.json", "--format", "md", "-v"])
                .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Show { report, format } => {
                assert_eq!(report, PathBuf::from("board.json"));
                assert_eq!(format, "md");
            }
            _ => panic!("Expected show command"),
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["evalboard"]).is_err());
    }
}
