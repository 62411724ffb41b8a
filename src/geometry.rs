//! Block-grid quantization, the relative-direction vocabulary, and the
//! viewer-frame rotation transform.
//!
//! Continuous positions become discrete placement targets through exactly two
//! pure functions: [`to_block_pos`] (floor to the grid) and
//! [`to_block_center`] (center of the containing cell). Both are applied at
//! every boundary where geometry leaves this crate.

use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};

/// Floors a continuous position to integer block coordinates.
pub fn to_block_pos(loc: Vector3<f32>) -> Vector3<i64> {
    Vector3::new(
        loc.x.floor() as i64,
        loc.y.floor() as i64,
        loc.z.floor() as i64,
    )
}

/// Center of the block cell containing a continuous position.
pub fn to_block_center(loc: Vector3<f32>) -> Vector3<f32> {
    to_block_pos(loc).map(|c| c as f32) + Vector3::new(0.5, 0.5, 0.5)
}

/// The fixed relative-direction vocabulary of the semantic parser.
///
/// The compass tags carry a canonical unit vector in the viewer's frame;
/// `BETWEEN`, `INSIDE`, `NEAR` and `AROUND` are positional tags with no
/// displacement vector of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelativeDirection {
    Left,
    Right,
    Up,
    Down,
    Front,
    Back,
    Away,
    Between,
    Inside,
    Near,
    Around,
}

impl RelativeDirection {
    /// Canonical unit vector in the viewer's frame, or `None` for the
    /// positional tags.
    pub fn unit_vector(self) -> Option<Vector3<f32>> {
        match self {
            Self::Left => Some(Vector3::new(1.0, 0.0, 0.0)),
            Self::Right => Some(Vector3::new(-1.0, 0.0, 0.0)),
            Self::Up => Some(Vector3::new(0.0, 1.0, 0.0)),
            Self::Down => Some(Vector3::new(0.0, -1.0, 0.0)),
            Self::Front | Self::Away => Some(Vector3::new(0.0, 0.0, 1.0)),
            Self::Back => Some(Vector3::new(0.0, 0.0, -1.0)),
            Self::Between | Self::Inside | Self::Near | Self::Around => None,
        }
    }
}

/// Rotates a vector between the viewer's frame and the world frame.
///
/// Yaw and pitch are clockwise in the standard coordinate system, yaw about
/// the vertical (y) axis and pitch about x. With `inverted = false` the
/// vector is taken from the world frame into the viewer's frame; with
/// `inverted = true` a vector expressed relative to the viewer (as relative
/// directions in speech are) is mapped back into world coordinates.
pub fn rotate(v: Vector3<f32>, yaw: f32, pitch: f32, inverted: bool) -> Vector3<f32> {
    let transform = Rotation3::from_axis_angle(&Vector3::y_axis(), -yaw)
        * Rotation3::from_axis_angle(&Vector3::x_axis(), -pitch);
    if inverted {
        transform.inverse() * v
    } else {
        transform * v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::f32::consts::FRAC_PI_2;

    fn assert_close(actual: Vector3<f32>, expected: Vector3<f32>) {
        assert!(
            (actual - expected).norm() < 1e-5,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn block_pos_floors_toward_negative_infinity() {
        let pos = to_block_pos(Vector3::new(-0.5, 1.9, 2.0));
        assert_eq!(pos, Vector3::new(-1, 1, 2));
    }

    #[test]
    fn block_center_lands_on_half_coordinates() {
        let center = to_block_center(Vector3::new(1.2, 0.0, 1.9));
        assert_eq!(center, Vector3::new(1.5, 0.5, 1.5));
    }

    #[test]
    fn compass_tags_carry_opposed_unit_vectors() {
        let v = |d: RelativeDirection| d.unit_vector().expect("compass tag");
        assert_eq!(v(RelativeDirection::Left), -v(RelativeDirection::Right));
        assert_eq!(v(RelativeDirection::Up), -v(RelativeDirection::Down));
        assert_eq!(v(RelativeDirection::Front), -v(RelativeDirection::Back));
        assert_eq!(v(RelativeDirection::Away), v(RelativeDirection::Front));
    }

    #[test]
    fn positional_tags_have_no_vector() {
        assert!(RelativeDirection::Between.unit_vector().is_none());
        assert!(RelativeDirection::Inside.unit_vector().is_none());
        assert!(RelativeDirection::Near.unit_vector().is_none());
        assert!(RelativeDirection::Around.unit_vector().is_none());
    }

    #[test]
    fn direction_tags_round_trip_with_logical_forms() {
        let tag = serde_json::to_value(RelativeDirection::Between).expect("serialize");
        assert_eq!(tag, json!("BETWEEN"));
        let parsed: RelativeDirection =
            serde_json::from_value(json!("AROUND")).expect("deserialize");
        assert_eq!(parsed, RelativeDirection::Around);
    }

    #[test]
    fn zero_yaw_rotation_is_identity() {
        let v = Vector3::new(1.0, 2.0, 3.0);
        assert_close(rotate(v, 0.0, 0.0, true), v);
    }

    #[test]
    fn inverted_rotation_undoes_the_forward_transform() {
        let v = Vector3::new(0.3, -1.2, 2.5);
        let forward = rotate(v, 1.1, 0.4, false);
        assert_close(rotate(forward, 1.1, 0.4, true), v);
    }

    #[test]
    fn quarter_turn_maps_viewer_x_to_world_minus_z() {
        let rotated = rotate(Vector3::new(1.0, 0.0, 0.0), FRAC_PI_2, 0.0, true);
        assert_close(rotated, Vector3::new(0.0, 0.0, -1.0));
    }
}
