use super::CommandContext;
use crate::core::AlertId;
use crate::io::alerts_table;
use crate::store::RiskStore;
use anyhow::Result;

#[derive(Debug, Clone, Default)]
pub struct AlertsConfig {
    pub all: bool,
    pub resolve: Option<u64>,
    pub resolver: Option<String>,
}

pub fn handle_alerts(context: &CommandContext, alerts: AlertsConfig) -> Result<()> {
    if let Some(id) = alerts.resolve {
        let orchestrator = context.orchestrator(context.config.clone())?;
        let alert = orchestrator.resolve_alert(AlertId(id), alerts.resolver)?;
        context.save()?;
        println!("Resolved {} for {}", alert.id, alert.entity);
        return Ok(());
    }

    let listed: Vec<_> = context
        .store
        .alerts()?
        .into_iter()
        .filter(|alert| alerts.all || alert.is_open())
        .collect();
    if listed.is_empty() {
        println!("No open alerts");
    } else {
        println!("{}", alerts_table(&listed));
    }
    Ok(())
}
