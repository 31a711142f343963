//! Thread-local context tracking for crash reports.
//!
//! Records the current assessment phase and the entity being processed.
//! Context is thread-local, so each rayon worker tracks its own entity,
//! while the run progress is held in global atomic counters.
//!
//! Context guards restore the previous context when dropped.

use crate::core::EntityRef;
use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};

static ENTITIES_PROCESSED: AtomicUsize = AtomicUsize::new(0);
static ENTITIES_TOTAL: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static CURRENT_CONTEXT: RefCell<AssessmentContext> = const { RefCell::new(AssessmentContext::new()) };
}

/// What the current thread was doing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssessmentContext {
    pub phase: Option<AssessmentPhase>,
    pub current_entity: Option<EntityRef>,
}

impl AssessmentContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            current_entity: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssessmentPhase {
    /// Listing suppliers and parts from the store
    Enumeration,
    SupplierAssessment,
    PartAssessment,
    RecommendationGeneration,
    AlertDispatch,
    /// Writing results and reports
    Reporting,
}

impl std::fmt::Display for AssessmentPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enumeration => write!(f, "enumeration"),
            Self::SupplierAssessment => write!(f, "supplier_assessment"),
            Self::PartAssessment => write!(f, "part_assessment"),
            Self::RecommendationGeneration => write!(f, "recommendation_generation"),
            Self::AlertDispatch => write!(f, "alert_dispatch"),
            Self::Reporting => write!(f, "reporting"),
        }
    }
}

/// Restores the previous context on drop.
pub struct ContextGuard {
    previous: AssessmentContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous;
        });
    }
}

#[must_use]
pub fn set_phase(phase: AssessmentPhase) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = *ctx.borrow();
        ctx.borrow_mut().phase = Some(phase);
        ContextGuard { previous }
    })
}

/// Set the entity being assessed on this thread.
///
/// ```ignore
/// for supplier in suppliers {
///     let _entity = set_current_entity(supplier.id);
///     assess(supplier)?;
/// }
/// ```
#[must_use]
pub fn set_current_entity(entity: impl Into<EntityRef>) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = *ctx.borrow();
        ctx.borrow_mut().current_entity = Some(entity.into());
        ContextGuard { previous }
    })
}

/// Thread-safe; can be called from any thread.
pub fn set_progress(processed: usize, total: usize) {
    ENTITIES_PROCESSED.store(processed, Ordering::Relaxed);
    ENTITIES_TOTAL.store(total, Ordering::Relaxed);
}

pub fn increment_processed() {
    ENTITIES_PROCESSED.fetch_add(1, Ordering::Relaxed);
}

#[must_use]
pub fn get_current_context() -> AssessmentContext {
    CURRENT_CONTEXT.with(|ctx| *ctx.borrow())
}

/// (processed, total)
#[must_use]
pub fn get_progress() -> (usize, usize) {
    (
        ENTITIES_PROCESSED.load(Ordering::Relaxed),
        ENTITIES_TOTAL.load(Ordering::Relaxed),
    )
}

pub fn reset_context() {
    CURRENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = AssessmentContext::new();
    });
}
