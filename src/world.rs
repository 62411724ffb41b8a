//! World-state query surface.
//!
//! This module is intentionally narrow: it declares only the queries the
//! interpreters actually issue, so hosts can back it with a full memory
//! subsystem and tests can back it with an in-memory fake.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Opaque handle to an already-resolved world entity (a player, an agent, or
/// a remembered object). Resolution from names or descriptions happens
/// upstream; this crate only keys queries off the handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef(pub String);

impl EntityRef {
    /// Convenience constructor.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// Axis-aligned bounding box of an entity, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Bounds {
    /// A unit cube anchored at the origin.
    pub fn unit() -> Self {
        Self {
            min: Vector3::zeros(),
            max: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Largest per-axis extent, used as the footprint of an encircled or
    /// repeated object.
    pub fn max_span(&self) -> f32 {
        let span = self.max - self.min;
        span.x.max(span.y).max(span.z)
    }
}

/// Read-only world-state queries consumed by the interpreters.
///
/// All queries are synchronous, side-effect-free, and assumed fast; nothing
/// here is cached, every call re-queries. Callers guarantee that entity
/// handles passed in are still valid.
pub trait WorldState: Send + Sync {
    /// Current position of the entity.
    fn position_of(&self, entity: &EntityRef) -> Vector3<f32>;

    /// Current yaw of the entity, in radians. Pitch is not consulted by this
    /// crate.
    fn orientation_of(&self, entity: &EntityRef) -> f32;

    /// Current axis-aligned bounds of the entity.
    fn bounds_of(&self, entity: &EntityRef) -> Bounds;

    /// Navigable interior points of the entity, if it has any (a house, a
    /// pen, a ring of blocks). May be empty.
    fn interior_points_of(&self, entity: &EntityRef) -> Vec<Vector3<f32>>;
}
