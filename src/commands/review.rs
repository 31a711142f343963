use super::CommandContext;
use crate::core::{EventId, RecommendationId};
use anyhow::Result;

pub fn resolve_event(context: &CommandContext, id: u64, notes: &str) -> Result<()> {
    let orchestrator = context.orchestrator(context.config.clone())?;
    let event = orchestrator.resolve_event(EventId(id), notes)?;
    context.save()?;
    if let Some(date) = event.resolution_date() {
        println!("Resolved {} ({}) on {}", event.id, event.title, date);
    }
    Ok(())
}

pub fn review_recommendation(context: &CommandContext, id: u64, notes: &str) -> Result<()> {
    let orchestrator = context.orchestrator(context.config.clone())?;
    let recommendation = orchestrator.review_recommendation(RecommendationId(id), notes)?;
    context.save()?;
    println!(
        "Reviewed {}: {} as alternative for {}",
        recommendation.id, recommendation.suggested_supplier, recommendation.part
    );
    Ok(())
}
