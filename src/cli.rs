use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Table for the terminal (default)
    Table,
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImportFormat {
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SummaryFormat {
    /// Colored summary for the terminal (default)
    Terminal,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "chainrisk")]
#[command(about = "Supply-chain risk assessment for suppliers and parts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to .chainrisk.toml discovery)
    #[arg(long, global = true, env = "CHAINRISK_CONFIG")]
    pub config: Option<PathBuf>,

    /// JSON data file holding entities and risk records
    #[arg(
        long,
        global = true,
        env = "CHAINRISK_DATA",
        default_value = "chainrisk-data.json"
    )]
    pub data: PathBuf,

    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Suppress progress bars
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assess suppliers and parts and reconcile their alerts
    Assess {
        /// Only assess suppliers
        #[arg(long, conflicts_with = "parts_only")]
        suppliers_only: bool,

        /// Only assess parts
        #[arg(long)]
        parts_only: bool,

        /// Suggest alternative suppliers for high-risk single-source parts
        #[arg(long)]
        generate_recommendations: bool,

        /// Send recent open alerts to the notification sink
        #[arg(long)]
        dispatch_alerts: bool,

        /// Number of worker threads (0 = all cores)
        #[arg(short = 'j', long = "jobs")]
        jobs: Option<usize>,

        /// Assess entities one at a time
        #[arg(long = "no-parallel")]
        no_parallel: bool,

        /// Stop assessing new entities after this many seconds
        #[arg(long = "timeout")]
        timeout_seconds: Option<u64>,

        /// Summary output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: SummaryFormat,
    },

    /// Write assessed risk records as table, JSON or CSV
    Export {
        #[arg(short, long, value_enum, default_value = "table")]
        format: ExportFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Apply supplier alert thresholds and part low-stock thresholds
    Import {
        /// JSON or CSV file of threshold records
        path: PathBuf,

        /// Input format (defaults to the file extension)
        #[arg(short, long, value_enum)]
        format: Option<ImportFormat>,
    },

    /// List open alerts, or resolve one
    Alerts {
        /// Include resolved alerts
        #[arg(long)]
        all: bool,

        /// Resolve the alert with this id
        #[arg(long)]
        resolve: Option<u64>,

        /// Who resolved the alert
        #[arg(long, requires = "resolve")]
        resolver: Option<String>,
    },

    /// Mark a risk event resolved
    ResolveEvent {
        id: u64,

        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Mark a supplier recommendation reviewed
    ReviewRecommendation {
        id: u64,

        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Initialize a chainrisk configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_only_flags_conflict() {
        let result = Cli::try_parse_from([
            "chainrisk",
            "assess",
            "--suppliers-only",
            "--parts-only",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["chainrisk", "export", "--format", "csv", "-vv"]).unwrap();
        assert_eq!(cli.verbosity, 2);
        assert!(matches!(
            cli.command,
            Commands::Export {
                format: ExportFormat::Csv,
                ..
            }
        ));
    }
}
