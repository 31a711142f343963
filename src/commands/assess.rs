use super::CommandContext;
use crate::cli::SummaryFormat;
use crate::io::print_run_summary;
use crate::orchestrator::AssessmentOptions;
use anyhow::Result;

#[derive(Debug, Clone)]
pub struct AssessConfig {
    pub options: AssessmentOptions,
    pub jobs: Option<usize>,
    pub no_parallel: bool,
    pub timeout_seconds: Option<u64>,
    pub format: SummaryFormat,
}

/// Run an assessment and persist the results.
///
/// Per-entity failures are reported in the summary; the command only fails
/// when the run itself cannot start or the results cannot be saved.
pub fn handle_assess(context: &CommandContext, assess: AssessConfig) -> Result<()> {
    let mut config = context.config.clone();
    if assess.no_parallel {
        config.parallel.enabled = false;
    }
    if let Some(jobs) = assess.jobs.filter(|&jobs| jobs > 0) {
        config.parallel.max_concurrency = Some(jobs);
    }
    if assess.timeout_seconds.is_some() {
        config.run.timeout_seconds = assess.timeout_seconds;
    }

    let orchestrator = context.orchestrator(config)?;
    let summary = orchestrator.run(&assess.options)?;
    context.save()?;

    match assess.format {
        SummaryFormat::Terminal => print_run_summary(&summary),
        SummaryFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }
    Ok(())
}
