//! Delivery of open alerts to a notification sink.

use crate::core::{AlertId, AlertRecord, EntityRef, RiskLevel};
use crate::errors::{EntityFailure, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertNotification {
    pub alert: AlertId,
    pub entity: EntityRef,
    pub severity: RiskLevel,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl From<&AlertRecord> for AlertNotification {
    fn from(alert: &AlertRecord) -> Self {
        Self {
            alert: alert.id,
            entity: alert.entity,
            severity: alert.risk_level,
            message: alert.message.clone(),
            at: alert.last_activity(),
        }
    }
}

pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: &AlertNotification) -> Result<()>;
}

/// Emits notifications as tracing events.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, notification: &AlertNotification) -> Result<()> {
        tracing::warn!(
            alert = %notification.alert,
            entity = %notification.entity,
            severity = %notification.severity,
            "{}",
            notification.message
        );
        Ok(())
    }
}

/// Keeps every notification in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    received: Mutex<Vec<AlertNotification>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<AlertNotification> {
        self.received.lock().clone()
    }
}

impl NotificationSink for CollectingSink {
    fn notify(&self, notification: &AlertNotification) -> Result<()> {
        self.received.lock().push(notification.clone());
        Ok(())
    }
}

/// Unresolved alerts created or escalated within `lookback_hours` of `now`.
pub fn due_notifications(
    alerts: &[AlertRecord],
    now: DateTime<Utc>,
    lookback_hours: u32,
) -> Vec<AlertNotification> {
    let cutoff = now - chrono::Duration::hours(i64::from(lookback_hours));
    let mut due: Vec<_> = alerts
        .iter()
        .filter(|alert| alert.is_open() && alert.last_activity() >= cutoff)
        .map(AlertNotification::from)
        .collect();
    due.sort_by_key(|n| (std::cmp::Reverse(n.severity), n.alert));
    due
}

#[derive(Debug, Default, Clone)]
pub struct DispatchReport {
    pub sent: usize,
    pub failed: Vec<EntityFailure>,
}

/// Send every due notification; a failing notification does not stop the rest.
pub fn dispatch_alerts(
    sink: &dyn NotificationSink,
    alerts: &[AlertRecord],
    now: DateTime<Utc>,
    lookback_hours: u32,
) -> DispatchReport {
    let mut report = DispatchReport::default();
    for notification in due_notifications(alerts, now, lookback_hours) {
        match sink.notify(&notification) {
            Ok(()) => report.sent += 1,
            Err(e) => {
                tracing::warn!(alert = %notification.alert, "Failed to dispatch alert: {}", e);
                report
                    .failed
                    .push(EntityFailure::alert_dispatch(notification.entity, &e));
            }
        }
    }
    report
}
