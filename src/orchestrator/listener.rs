//! Reassessment of single entities when their source data changes.
//!
//! Writers publish an [`EntityChanged`] for every supplier or part they
//! touch. The listener drains whatever arrived since its last wake-up,
//! collapses duplicates and reassesses each entity once through
//! [`Orchestrator::reassess`].

use super::{EntityOutcome, Orchestrator};
use crate::core::EntityRef;
use crate::errors::{EntityFailure, OperationType, Result, RiskError};
use crossbeam::channel::{self, Receiver, Sender};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityChanged(pub EntityRef);

/// Sending half handed to writers.
#[derive(Debug, Clone)]
pub struct ChangePublisher {
    sender: Sender<EntityChanged>,
}

impl ChangePublisher {
    pub fn publish(&self, entity: impl Into<EntityRef>) -> Result<()> {
        let entity = entity.into();
        self.sender
            .send(EntityChanged(entity))
            .map_err(|_| RiskError::Dispatch(format!("reassessment listener for {entity} is gone")))
    }
}

#[derive(Debug, Default, Clone)]
pub struct ListenerReport {
    pub reassessed: usize,
    pub failures: Vec<EntityFailure>,
}

pub struct ReassessmentListener {
    orchestrator: Arc<Orchestrator>,
    receiver: Receiver<EntityChanged>,
}

impl ReassessmentListener {
    pub fn new(orchestrator: Arc<Orchestrator>) -> (Self, ChangePublisher) {
        let (sender, receiver) = channel::unbounded();
        (
            Self {
                orchestrator,
                receiver,
            },
            ChangePublisher { sender },
        )
    }

    /// Process changes until every publisher has been dropped.
    pub fn run(self) -> ListenerReport {
        let mut report = ListenerReport::default();
        while let Ok(first) = self.receiver.recv() {
            let batch: BTreeSet<EntityRef> = std::iter::once(first)
                .chain(self.receiver.try_iter())
                .map(|EntityChanged(entity)| entity)
                .collect();
            for entity in batch {
                match self.reassess(entity) {
                    Ok(_) => report.reassessed += 1,
                    Err(e) => report.failures.push(e),
                }
            }
        }
        tracing::debug!(reassessed = report.reassessed, "reassessment listener stopped");
        report
    }

    fn reassess(&self, entity: EntityRef) -> std::result::Result<EntityOutcome, EntityFailure> {
        let operation = match entity {
            EntityRef::Supplier(_) => OperationType::SupplierAssessment,
            EntityRef::Part(_) => OperationType::PartAssessment,
        };
        self.orchestrator.reassess(entity).map_err(|e| {
            tracing::warn!(%entity, "Reassessment failed: {}", e);
            EntityFailure::new(entity, operation, &e)
        })
    }

    /// Run on a dedicated thread.
    pub fn spawn(self) -> JoinHandle<ListenerReport> {
        std::thread::spawn(move || self.run())
    }
}
