//! Geometric arrangement synthesis for multi-object placement.
//!
//! Given a shape, an optional object template, and a count, [`arrange`]
//! produces offset vectors relative to an origin chosen elsewhere. Offsets
//! come back with integral components; final block quantization happens at
//! the resolver boundary like every other continuous position.

use std::f32::consts::PI;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::world::Bounds;

/// An object schematic to be placed. Only its largest extent participates in
/// spacing and radius computations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementTemplate {
    pub name: String,
    pub bounds: Bounds,
}

impl PlacementTemplate {
    /// Largest per-axis extent of the template.
    pub fn extent(&self) -> f32 {
        self.bounds.max_span()
    }
}

/// Supported arrangement shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arrangement {
    /// Evenly spaced points along `orient`, starting at the origin.
    Line { orient: Vector3<f32> },
    /// Evenly spaced points on a horizontal circle around the origin, sized
    /// to clear an encircled object of the given radius.
    Circle { encircled_radius: f32 },
}

/// Produces `count` offset vectors in the requested arrangement.
///
/// A missing template behaves as a unit cube. `extra_space` is the gap left
/// between neighboring placements on top of the template footprint.
pub fn arrange(
    arrangement: Arrangement,
    template: Option<&PlacementTemplate>,
    count: usize,
    extra_space: f32,
) -> Vec<Vector3<f32>> {
    let extent = template.map_or(1.0, PlacementTemplate::extent);
    let offsets: Vec<Vector3<f32>> = match arrangement {
        Arrangement::Line { orient } => {
            let spacing = extent + extra_space + 1.0;
            (0..count).map(|i| orient * (i as f32 * spacing)).collect()
        }
        Arrangement::Circle { encircled_radius } => {
            // Radius must both fit `count` footprints on the perimeter and
            // clear the encircled object.
            let radius = (((extent + extra_space) * count as f32) / (2.0 * PI))
                .max(encircled_radius + extent + extra_space);
            (0..count)
                .map(|s| {
                    let angle = 2.0 * PI * s as f32 / count as f32;
                    Vector3::new(radius * angle.cos(), 0.0, radius * angle.sin())
                })
                .collect()
        }
    };
    offsets.into_iter().map(|o| o.map(f32::round)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(extent: f32) -> PlacementTemplate {
        PlacementTemplate {
            name: "cube".to_string(),
            bounds: Bounds {
                min: Vector3::zeros(),
                max: Vector3::new(extent, extent, extent),
            },
        }
    }

    #[test]
    fn line_spacing_adds_extent_and_gap() {
        let offsets = arrange(
            Arrangement::Line {
                orient: Vector3::new(1.0, 0.0, 0.0),
            },
            Some(&template(2.0)),
            3,
            1.0,
        );
        assert_eq!(
            offsets,
            vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(4.0, 0.0, 0.0),
                Vector3::new(8.0, 0.0, 0.0),
            ]
        );
    }

    #[test]
    fn line_without_template_assumes_unit_footprint() {
        let offsets = arrange(
            Arrangement::Line {
                orient: Vector3::new(0.0, 0.0, -1.0),
            },
            None,
            2,
            1.0,
        );
        assert_eq!(offsets[1], Vector3::new(0.0, 0.0, -3.0));
    }

    #[test]
    fn circle_clears_the_encircled_object() {
        let offsets = arrange(
            Arrangement::Circle {
                encircled_radius: 5.0,
            },
            None,
            8,
            1.0,
        );
        assert_eq!(offsets.len(), 8);
        // radius = max(2*8/2pi, 5+1+1) = 7; rounding moves points < 1 block
        for offset in &offsets {
            let horizontal = (offset.x * offset.x + offset.z * offset.z).sqrt();
            assert!(
                (horizontal - 7.0).abs() < 0.75,
                "point {offset:?} off the circle"
            );
            assert_eq!(offset.y, 0.0);
        }
    }

    #[test]
    fn circle_grows_with_count() {
        let offsets = arrange(
            Arrangement::Circle {
                encircled_radius: 0.0,
            },
            None,
            40,
            1.0,
        );
        // perimeter term dominates: radius = 2*40/2pi ~ 12.7
        let first = offsets[0];
        assert!(first.x > 10.0);
    }
}
