//! Condition tree construction.
//!
//! [`ConditionInterpreter`] walks a tagged logical form and materializes a
//! tree of [`Condition`] nodes. This crate only builds the tree; polling and
//! short-circuit evaluation semantics belong to the controller that owns the
//! returned value. Value comparisons are produced by an external
//! [`ComparatorInterpreter`] and treated as opaque capabilities.

use std::fmt;
use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::world::WorldState;
use crate::{non_empty, InterpretError, LogicalForm};

/// An opaque value-comparison predicate produced by the comparator
/// sub-interpreter.
pub trait Comparator: Send + Sync {
    /// Current truth value of the comparison against live world-state.
    fn evaluate(&self, world: &dyn WorldState) -> bool;
}

/// External sub-interpreter turning comparator logical forms into
/// [`Comparator`] capabilities.
pub trait ComparatorInterpreter: Send + Sync {
    fn build(
        &self,
        speaker: &str,
        form: &LogicalForm,
    ) -> Result<Box<dyn Comparator>, InterpretError>;
}

/// What a `TIME` condition triggers on.
pub enum TimeTrigger {
    /// A named special time event ("SUNSET", "SUNRISE", ...). Resolution is
    /// deferred to the evaluator.
    SpecialEvent(String),
    /// Current time compared against the form's right-hand operand.
    Comparator(Box<dyn Comparator>),
}

impl fmt::Debug for TimeTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SpecialEvent(tag) => f.debug_tuple("SpecialEvent").field(tag).finish(),
            Self::Comparator(_) => f.write_str("Comparator"),
        }
    }
}

/// A composable, lazily evaluated predicate over world-state.
///
/// Built once per interpretation call and owned by the caller; construction
/// never reads world-state, so every non-`Never` node is a pure function of
/// world-state at evaluation time.
pub enum Condition {
    /// Never triggers. Holds the world handle for the evaluator's benefit.
    Never { world: Arc<dyn WorldState> },
    /// All children must hold, in order, short-circuiting per the evaluator's
    /// policy. May be empty.
    And(Vec<Condition>),
    /// Any child must hold. May be empty.
    Or(Vec<Condition>),
    /// A time trigger, optionally gated by a nested event condition that
    /// decides when the time check is meaningful.
    Time {
        trigger: TimeTrigger,
        event: Option<Box<Condition>>,
    },
    /// A bare value comparison.
    Comparator(Box<dyn Comparator>),
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never { .. } => f.write_str("Never"),
            Self::And(children) => f.debug_tuple("And").field(children).finish(),
            Self::Or(children) => f.debug_tuple("Or").field(children).finish(),
            Self::Time { trigger, event } => f
                .debug_struct("Time")
                .field("trigger", trigger)
                .field("event", event)
                .finish(),
            Self::Comparator(_) => f.write_str("Comparator"),
        }
    }
}

/// Sub-interpreter for conditions.
pub struct ConditionInterpreter {
    world: Arc<dyn WorldState>,
    comparators: Arc<dyn ComparatorInterpreter>,
}

impl ConditionInterpreter {
    pub fn new(world: Arc<dyn WorldState>, comparators: Arc<dyn ComparatorInterpreter>) -> Self {
        Self { world, comparators }
    }

    /// Builds a condition tree from a logical form.
    ///
    /// A form with no `condition_type` tag is an unconditional action and
    /// yields `Ok(None)`; an unrecognized tag or a recognized tag missing its
    /// required sub-fields yields a recoverable [`InterpretError`].
    #[tracing::instrument(level = "debug", skip(self, form))]
    pub fn build(
        &self,
        speaker: &str,
        form: &LogicalForm,
    ) -> Result<Option<Condition>, InterpretError> {
        let tag = match form.get("condition_type") {
            None | Some(LogicalForm::Null) => return Ok(None),
            Some(LogicalForm::String(s)) if s.is_empty() => return Ok(None),
            Some(LogicalForm::String(s)) => s.as_str(),
            Some(other) => return Err(InterpretError::UnsupportedCondition(other.to_string())),
        };
        debug!(tag, "building condition node");
        match tag {
            // NEVER doesn't carry a "condition" sibling
            "NEVER" => Ok(Some(Condition::Never {
                world: Arc::clone(&self.world),
            })),
            "AND" | "OR" | "TIME" | "COMPARATOR" => {
                let sub = form
                    .get("condition")
                    .filter(|v| non_empty(v))
                    .ok_or(InterpretError::MalformedCondition("condition"))?;
                let node = match tag {
                    "AND" => Condition::And(self.build_children(speaker, sub, "and_condition")?),
                    "OR" => Condition::Or(self.build_children(speaker, sub, "or_condition")?),
                    "TIME" => self.build_time(speaker, sub)?,
                    _ => Condition::Comparator(self.comparators.build(speaker, sub)?),
                };
                Ok(Some(node))
            }
            other => Err(InterpretError::UnsupportedCondition(other.to_string())),
        }
    }

    /// Builds each element of an `and_condition` / `or_condition` list.
    /// Elements that interpret to no condition are dropped; an empty result
    /// still yields the composite.
    fn build_children(
        &self,
        speaker: &str,
        sub: &LogicalForm,
        key: &'static str,
    ) -> Result<Vec<Condition>, InterpretError> {
        let elements = sub
            .get(key)
            .and_then(LogicalForm::as_array)
            .ok_or(InterpretError::MalformedCondition(key))?;
        let mut children = Vec::new();
        for element in elements {
            if let Some(child) = self.build(speaker, element)? {
                children.push(child);
            }
        }
        Ok(children)
    }

    fn build_time(&self, speaker: &str, sub: &LogicalForm) -> Result<Condition, InterpretError> {
        if let Some(tag) = sub
            .get("special_time_event")
            .and_then(LogicalForm::as_str)
            .filter(|s| !s.is_empty())
        {
            return Ok(Condition::Time {
                trigger: TimeTrigger::SpecialEvent(tag.to_string()),
                event: None,
            });
        }
        let comparator_form = sub
            .get("comparator")
            .filter(|v| non_empty(v))
            .ok_or(InterpretError::MalformedCondition("comparator"))?;

        // The form has no explicit left operand: current time is compared
        // against the right-hand side, so a NULL extractor is synthesized
        // into a copy of the comparator form.
        let mut injected = comparator_form.clone();
        if let Some(fields) = injected.as_object_mut() {
            fields.insert(
                "input_left".to_string(),
                json!({ "value_extractor": "NULL" }),
            );
        }
        let comparator = self.comparators.build(speaker, &injected)?;

        let event = match sub.get("event") {
            Some(event_form) if non_empty(event_form) => {
                self.build(speaker, event_form)?.map(Box::new)
            }
            _ => None,
        };
        Ok(Condition::Time {
            trigger: TimeTrigger::Comparator(comparator),
            event,
        })
    }
}
