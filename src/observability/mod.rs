//! Observability infrastructure for logging and crash reports.
//!
//! - **Tracing**: subscriber setup driven by the `-v` count and `RUST_LOG`
//! - **Panic Hook**: structured crash reports with assessment context
//! - **Context Tracking**: thread-local phase and entity tracking
//! - **Progress Tracking**: atomic counters for overall run progress
//!
//! ```ignore
//! use chainrisk::observability::{set_current_entity, set_phase, AssessmentPhase};
//!
//! let _phase = set_phase(AssessmentPhase::PartAssessment);
//! for part in parts {
//!     let _entity = set_current_entity(part.id);
//!     // a panic here reports the phase and the part
//!     assess_part(&part)?;
//! }
//! ```

pub mod context;
pub mod panic_hook;
pub mod tracing;

pub use context::{
    get_current_context, get_progress, increment_processed, set_current_entity, set_phase,
    set_progress, AssessmentContext, AssessmentPhase, ContextGuard,
};
pub use panic_hook::install_panic_hook;
pub use self::tracing::init_tracing;
