//! CLI command implementations.
//!
//! - **assess**: run an assessment over the data file
//! - **export**: write assessed risk records as table, JSON or CSV
//! - **import**: apply threshold records
//! - **alerts**: list open alerts or resolve one
//! - **resolve-event** / **review-recommendation**: reviewer actions
//! - **init**: write a default `.chainrisk.toml`
//!
//! Every command except `init` loads the data file into an in-memory store
//! and, when it changed anything, writes it back atomically.

pub mod alerts;
pub mod assess;
pub mod export;
pub mod import;
pub mod init;
pub mod review;

pub use alerts::{handle_alerts, AlertsConfig};
pub use assess::{handle_assess, AssessConfig};
pub use export::handle_export;
pub use import::handle_import;
pub use init::init_config;
pub use review::{resolve_event, review_recommendation};

use crate::config::{load_config, load_config_from, RiskConfig};
use crate::observability::{set_phase, AssessmentPhase};
use crate::orchestrator::Orchestrator;
use crate::progress::ProgressConfig;
use crate::store::{load_snapshot, save_snapshot, InMemoryStore};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Configuration and store shared by the data commands.
pub struct CommandContext {
    pub config: RiskConfig,
    pub store: Arc<InMemoryStore>,
    pub data_path: PathBuf,
    pub progress: ProgressConfig,
}

impl CommandContext {
    pub fn load(
        config_path: Option<&Path>,
        data_path: &Path,
        progress: ProgressConfig,
    ) -> Result<Self> {
        let config = match config_path {
            Some(path) => load_config_from(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => load_config(),
        };
        let store = load_snapshot(data_path)
            .with_context(|| format!("Failed to load data file {}", data_path.display()))?;
        Ok(Self {
            config,
            store: Arc::new(store),
            data_path: data_path.to_path_buf(),
            progress,
        })
    }

    pub fn orchestrator(&self, config: RiskConfig) -> Result<Orchestrator> {
        let orchestrator = Orchestrator::with_defaults(self.store.clone(), Arc::new(config))
            .context("Invalid configuration")?;
        Ok(orchestrator.with_progress(self.progress.clone()))
    }

    pub fn save(&self) -> Result<()> {
        let _phase = set_phase(AssessmentPhase::Reporting);
        save_snapshot(&self.store, &self.data_path)
            .with_context(|| format!("Failed to write data file {}", self.data_path.display()))
    }
}
