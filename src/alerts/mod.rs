pub mod dispatch;
pub mod lifecycle;

pub use dispatch::{
    dispatch_alerts, due_notifications, AlertNotification, CollectingSink, DispatchReport,
    LogSink, NotificationSink,
};
pub use lifecycle::{
    AlertContext, AlertLifecycleManager, AlertOutcome, AlertState, AlertTransition,
};
