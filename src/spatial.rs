//! Spatial location resolution.
//!
//! [`LocationResolver`] turns a [`SpatialQuery`] (reference entities, a
//! relative direction, steps, and a repeat specification) into a
//! [`PlacementPlan`]: one block-quantized origin plus one offset per object
//! to place. The viewer's yaw defines "forward" for every viewer-relative
//! direction, so canonical direction vectors are mapped into world
//! coordinates with the inverse rotation.

use std::sync::Arc;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::arrangement::{arrange, Arrangement, PlacementTemplate};
use crate::geometry::{rotate, to_block_center, to_block_pos, RelativeDirection};
use crate::world::{EntityRef, WorldState};
use crate::{InterpretError, LogicalForm};

/// Steps assumed when a relative direction is given without an explicit
/// count ("a few steps to the left").
pub const DEFAULT_NUM_STEPS: i32 = 5;

/// How many copies to place, and along which direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatSpec {
    pub count: usize,
    pub direction: Option<RelativeDirection>,
}

impl Default for RepeatSpec {
    fn default() -> Self {
        Self {
            count: 1,
            direction: None,
        }
    }
}

/// Repeat count extracted from a logical form's `repeat` sub-form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatCount {
    Exactly(usize),
    /// "all of them" — open-ended; the outer interpreter resolves this
    /// against the set it is acting on before building a [`SpatialQuery`].
    All,
}

/// Reads the optional `repeat` sub-form of a logical form.
///
/// `FOR` carries a count (a number or numeric string); an unparseable count
/// falls back to 2. `ALL` yields the open-ended marker. Anything else means
/// a single placement.
pub fn repeat_count_from_form(form: &LogicalForm) -> RepeatCount {
    let Some(repeat) = form.get("repeat") else {
        return RepeatCount::Exactly(1);
    };
    match repeat.get("repeat_key").and_then(LogicalForm::as_str) {
        Some("FOR") => {
            let count = match repeat.get("repeat_count") {
                Some(LogicalForm::Number(n)) => n.as_u64().map(|n| n as usize),
                Some(LogicalForm::String(s)) => s.trim().parse::<usize>().ok(),
                _ => None,
            };
            RepeatCount::Exactly(count.unwrap_or(2))
        }
        Some("ALL") => RepeatCount::All,
        _ => RepeatCount::Exactly(1),
    }
}

/// Input record for one location resolution. Not persisted.
///
/// `references` must be non-empty; index 0 is the primary anchor and index 1
/// is consulted only for `BETWEEN` (which needs at least two references —
/// both are caller preconditions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialQuery {
    pub references: Vec<EntityRef>,
    pub direction: Option<RelativeDirection>,
    pub steps: Option<i32>,
    pub repeat: RepeatSpec,
    pub templates: Vec<PlacementTemplate>,
    /// Per-axis gap left around each placed object.
    pub padding: [f32; 3],
}

impl Default for SpatialQuery {
    fn default() -> Self {
        Self {
            references: Vec::new(),
            direction: None,
            steps: None,
            repeat: RepeatSpec::default(),
            templates: Vec::new(),
            padding: [1.0, 1.0, 1.0],
        }
    }
}

impl SpatialQuery {
    /// Query anchored at a single reference entity, defaults everywhere else.
    pub fn at(reference: EntityRef) -> Self {
        Self {
            references: vec![reference],
            ..Self::default()
        }
    }
}

/// One origin coordinate plus per-object offsets, all block-quantized.
/// Offsets are added to the origin by the placement executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementPlan {
    pub origin: Vector3<i64>,
    pub offsets: Vec<Vector3<i64>>,
}

/// Sub-interpreter for spatial placement.
pub struct LocationResolver {
    world: Arc<dyn WorldState>,
}

impl LocationResolver {
    pub fn new(world: Arc<dyn WorldState>) -> Self {
        Self { world }
    }

    /// Resolves a placement plan. `viewer` is the already-resolved entity
    /// that issued the command; its yaw anchors every viewer-relative
    /// direction.
    ///
    /// The offset list has length `max(repeat count, templates)`, with a
    /// single zero offset when only one object is placed.
    #[tracing::instrument(level = "debug", skip(self, query))]
    pub fn resolve(
        &self,
        viewer: &EntityRef,
        query: &SpatialQuery,
    ) -> Result<PlacementPlan, InterpretError> {
        let repeat_num = query.repeat.count.max(query.templates.len());
        let origin = self.origin_heuristic(viewer, query)?;
        let offsets = if repeat_num > 1 {
            self.repeat_arrangement(viewer, query, repeat_num)
        } else {
            vec![Vector3::zeros()]
        };
        debug!(?origin, count = offsets.len(), "resolved placement");
        Ok(PlacementPlan {
            origin: to_block_pos(origin),
            offsets: offsets.into_iter().map(to_block_pos).collect(),
        })
    }

    fn origin_heuristic(
        &self,
        viewer: &EntityRef,
        query: &SpatialQuery,
    ) -> Result<Vector3<f32>, InterpretError> {
        let primary = self.world.position_of(&query.references[0]);
        match query.direction {
            None => match query.steps {
                // no direction given: float the placement up by `steps`
                Some(steps) => {
                    Ok(to_block_center(primary) + Vector3::new(0.0, steps as f32, 0.0))
                }
                None => Ok(primary),
            },
            Some(RelativeDirection::Between) => {
                let second = self.world.position_of(&query.references[1]);
                Ok((primary + second) / 2.0)
            }
            Some(RelativeDirection::Inside) => {
                for entity in &query.references {
                    let points = self.world.interior_points_of(entity);
                    if let Some(point) = points.first() {
                        return Ok(*point);
                    }
                }
                Err(InterpretError::NoInteriorFound)
            }
            Some(direction) => {
                if let Some(unit) = direction.unit_vector() {
                    let steps = query.steps.unwrap_or(DEFAULT_NUM_STEPS) as f32;
                    let yaw = self.world.orientation_of(viewer);
                    // the direction was expressed relative to the viewer, so
                    // the inverse transform maps it into world coordinates
                    let dir_vec = rotate(unit, yaw, 0.0, true);
                    Ok(to_block_center(primary) + dir_vec * steps)
                } else {
                    // NEAR / AROUND displace nothing; the tag only matters to
                    // the repeat arrangement
                    Ok(primary)
                }
            }
        }
    }

    fn repeat_arrangement(
        &self,
        viewer: &EntityRef,
        query: &SpatialQuery,
        count: usize,
    ) -> Vec<Vector3<f32>> {
        let repeat_dir = query.repeat.direction.unwrap_or(RelativeDirection::Left);
        let template = query.templates.first();
        if repeat_dir == RelativeDirection::Around {
            let bounds = self.world.bounds_of(&query.references[0]);
            let extra_space = max_component(query.padding);
            arrange(
                Arrangement::Circle {
                    encircled_radius: bounds.max_span(),
                },
                template,
                count,
                extra_space,
            )
        } else {
            // tags without a canonical vector take the LEFT default
            let unit = repeat_dir
                .unit_vector()
                .unwrap_or_else(|| Vector3::new(1.0, 0.0, 0.0));
            let yaw = self.world.orientation_of(viewer);
            let orient = rotate(unit, yaw, 0.0, true);
            let extra_space = query.padding[dominant_axis(orient)];
            arrange(Arrangement::Line { orient }, template, count, extra_space)
        }
    }
}

/// Index of the axis with the largest magnitude.
fn dominant_axis(v: Vector3<f32>) -> usize {
    let mut axis = 0;
    for i in 1..3 {
        if v[i].abs() > v[axis].abs() {
            axis = i;
        }
    }
    axis
}

fn max_component(padding: [f32; 3]) -> f32 {
    padding.iter().copied().fold(f32::NEG_INFINITY, f32::max)
}
