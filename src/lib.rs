//! Intent interpretation core.
//!
//! This crate turns structured intent descriptions ("logical forms" produced
//! by an upstream semantic parser) into two kinds of executable artifacts:
//! - [`ConditionInterpreter`]: builds composable [`Condition`] trees that a
//!   controller polls to decide when to stop, wait, or react.
//! - [`LocationResolver`]: computes a concrete [`PlacementPlan`] (absolute
//!   origin plus per-object offsets) from relative directional intent
//!   ("to the left of X", "between X and Y", "make 6, arranged in a circle").
//!
//! The crate does not sense the world, execute motor commands, or parse
//! natural language. World-state access goes through the narrow
//! [`WorldState`] capability trait, and value comparisons are delegated to an
//! external [`ComparatorInterpreter`]; both are supplied by the host agent.

use thiserror::Error;

pub mod arrangement;
pub mod condition;
pub mod geometry;
pub mod spatial;
pub mod world;

pub use arrangement::{arrange, Arrangement, PlacementTemplate};
pub use condition::{
    Comparator, ComparatorInterpreter, Condition, ConditionInterpreter, TimeTrigger,
};
pub use geometry::{rotate, to_block_center, to_block_pos, RelativeDirection};
pub use spatial::{
    repeat_count_from_form, LocationResolver, PlacementPlan, RepeatCount, RepeatSpec,
    SpatialQuery, DEFAULT_NUM_STEPS,
};
pub use world::{Bounds, EntityRef, WorldState};

/// A logical form: the untyped, nested mapping an upstream semantic parser
/// produces for one utterance.
///
/// Logical forms are read-only inputs to this crate; interpreters never hand
/// a mutated form back to the caller.
pub type LogicalForm = serde_json::Value;

/// Recoverable, user-facing interpretation failures.
///
/// Every variant renders a short explanation suitable for dialogue with the
/// speaker; none of them should abort the host process.
#[derive(Debug, Error)]
pub enum InterpretError {
    /// The `condition_type` tag is outside the fixed dispatch vocabulary.
    #[error("I don't understand that condition ({0})")]
    UnsupportedCondition(String),

    /// A recognized condition was missing a required sub-field.
    #[error("I thought there was a condition but I don't understand it (missing {0})")]
    MalformedCondition(&'static str),

    /// No reference entity exposed a navigable interior.
    #[error("I don't know how to go inside there")]
    NoInteriorFound,
}

/// Field-presence check matching the parser's conventions: `null`, empty
/// strings, and empty containers all count as absent.
pub(crate) fn non_empty(value: &LogicalForm) -> bool {
    match value {
        LogicalForm::Null => false,
        LogicalForm::Bool(b) => *b,
        LogicalForm::Number(_) => true,
        LogicalForm::String(s) => !s.is_empty(),
        LogicalForm::Array(a) => !a.is_empty(),
        LogicalForm::Object(m) => !m.is_empty(),
    }
}
