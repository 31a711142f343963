use anyhow::Result;
use chainrisk::cli::{Cli, Commands};
use chainrisk::commands::{self, AlertsConfig, AssessConfig, CommandContext};
use chainrisk::observability::{init_tracing, install_panic_hook};
use chainrisk::orchestrator::AssessmentOptions;
use chainrisk::progress::ProgressConfig;
use clap::Parser;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();
    install_panic_hook();
    init_tracing(cli.verbosity);

    if let Commands::Init { force } = cli.command {
        return commands::init_config(Path::new("."), force);
    }

    let progress = ProgressConfig::from_env(cli.quiet);
    let context = CommandContext::load(cli.config.as_deref(), &cli.data, progress)?;

    match cli.command {
        Commands::Assess {
            suppliers_only,
            parts_only,
            generate_recommendations,
            dispatch_alerts,
            jobs,
            no_parallel,
            timeout_seconds,
            format,
        } => commands::handle_assess(
            &context,
            AssessConfig {
                options: AssessmentOptions {
                    suppliers_only,
                    parts_only,
                    generate_recommendations,
                    dispatch_alerts,
                },
                jobs,
                no_parallel,
                timeout_seconds,
                format,
            },
        ),
        Commands::Export { format, output } => commands::handle_export(&context, format, output),
        Commands::Import { path, format } => commands::handle_import(&context, &path, format),
        Commands::Alerts {
            all,
            resolve,
            resolver,
        } => commands::handle_alerts(
            &context,
            AlertsConfig {
                all,
                resolve,
                resolver,
            },
        ),
        Commands::ResolveEvent { id, notes } => commands::resolve_event(&context, id, &notes),
        Commands::ReviewRecommendation { id, notes } => {
            commands::review_recommendation(&context, id, &notes)
        }
        Commands::Init { .. } => Ok(()),
    }
}
