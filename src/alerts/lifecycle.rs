//! Alert state per entity, reconciled after every assessment.
//!
//! ```text
//! NONE / RESOLVED --(MEDIUM+)--> OPEN
//! OPEN --(level rises)--> OPEN (escalated in place)
//! OPEN --(LOW)--> RESOLVED
//! ```
//!
//! A level that stays the same or drops while remaining above LOW leaves
//! the alert untouched, so an open alert shows the peak severity seen
//! since it opened.

use crate::core::{AlertId, AlertRecord, EntityRef, NewAlert, RiskCategory, RiskLevel};
use crate::errors::{Result, RiskError};
use crate::store::RiskStore;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertState {
    None,
    OpenMedium,
    /// HIGH or CRITICAL
    OpenHigh,
    Resolved,
}

impl AlertState {
    pub fn of_open(open: Option<&AlertRecord>) -> Self {
        match open {
            None => AlertState::None,
            Some(alert) if alert.risk_level.is_high() => AlertState::OpenHigh,
            Some(_) => AlertState::OpenMedium,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertTransition {
    Open { level: RiskLevel },
    Escalate { from: RiskLevel, to: RiskLevel },
    Resolve,
    NoChange,
}

impl AlertTransition {
    /// Transition for an entity with the given open alert, newly assessed at `level`.
    pub fn plan(open: Option<&AlertRecord>, level: RiskLevel) -> Self {
        match open {
            None if level >= RiskLevel::Medium => AlertTransition::Open { level },
            None => AlertTransition::NoChange,
            Some(_) if level == RiskLevel::Low => AlertTransition::Resolve,
            Some(alert) if level > alert.risk_level => AlertTransition::Escalate {
                from: alert.risk_level,
                to: level,
            },
            Some(_) => AlertTransition::NoChange,
        }
    }

    /// An alert was created or escalated to HIGH or above.
    pub fn raises_high(&self) -> bool {
        match self {
            AlertTransition::Open { level } => level.is_high(),
            AlertTransition::Escalate { to, .. } => to.is_high(),
            _ => false,
        }
    }
}

/// What the caller knows about the entity's fresh assessment.
#[derive(Debug, Clone)]
pub struct AlertContext {
    pub entity: EntityRef,
    pub level: RiskLevel,
    pub category: RiskCategory,
    pub alert_type: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertOutcome {
    pub transition: AlertTransition,
    pub state: AlertState,
    /// The alert after the transition, when one was touched.
    pub alert: Option<AlertRecord>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AlertLifecycleManager;

impl AlertLifecycleManager {
    pub fn new() -> Self {
        Self
    }

    /// Apply the planned transition for `context` to the store.
    pub fn reconcile(
        &self,
        store: &dyn RiskStore,
        context: AlertContext,
        now: DateTime<Utc>,
    ) -> Result<AlertOutcome> {
        let open = store.open_alert(context.entity)?;
        match self.apply(store, open, &context, now) {
            // another writer opened an alert between our read and insert
            Err(RiskError::UniqueViolation(_)) => {
                let open = store.open_alert(context.entity)?;
                self.apply(store, open, &context, now)
            }
            other => other,
        }
    }

    fn apply(
        &self,
        store: &dyn RiskStore,
        open: Option<AlertRecord>,
        context: &AlertContext,
        now: DateTime<Utc>,
    ) -> Result<AlertOutcome> {
        let transition = AlertTransition::plan(open.as_ref(), context.level);
        let (state, alert) = match (transition, open) {
            (AlertTransition::Open { level }, _) => {
                let alert = store.insert_alert(NewAlert {
                    entity: context.entity,
                    risk_level: level,
                    alert_type: context.alert_type.to_string(),
                    category: context.category,
                    message: context.message.clone(),
                    alert_date: now,
                    event_pending: transition.raises_high(),
                })?;
                (AlertState::of_open(Some(&alert)), Some(alert))
            }
            (AlertTransition::Escalate { to, .. }, Some(mut alert)) => {
                alert.escalate(to, context.message.clone(), now);
                alert.event_pending |= transition.raises_high();
                store.update_alert(&alert)?;
                (AlertState::of_open(Some(&alert)), Some(alert))
            }
            (AlertTransition::Resolve, Some(mut alert)) => {
                alert.resolve(now, None);
                store.update_alert(&alert)?;
                (AlertState::Resolved, Some(alert))
            }
            (_, open) => (AlertState::of_open(open.as_ref()), open),
        };

        if transition != AlertTransition::NoChange {
            tracing::debug!(entity = %context.entity, ?transition, "alert reconciled");
        }
        Ok(AlertOutcome {
            transition,
            state,
            alert,
        })
    }

    /// Resolve an alert on behalf of a reviewer.
    pub fn resolve_alert(
        &self,
        store: &dyn RiskStore,
        id: AlertId,
        resolver: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<AlertRecord> {
        let mut alert = store.alert(id)?;
        if alert.is_open() {
            alert.resolve(now, resolver);
            store.update_alert(&alert)?;
        }
        Ok(alert)
    }
}
