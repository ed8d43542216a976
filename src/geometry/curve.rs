//! Circular-arc bend of a plane mesh
//!
//! The plane's horizontal cross-section is replaced by the arc through its left
//! edge, its midline pushed back by `apex`, and its right edge. Each vertex is
//! placed on that arc according to its `u` coordinate; `y` is left alone.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;

use super::plane::PlaneGeometry;

/// Circle through the three cross-section points of a bent plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveCircle {
    pub center: Vec2,
    pub radius: f32,
    /// Angle swept from the right edge to the left edge
    pub arc: f32,
}

/// Polar angle of `v` normalised into `[0, 2π)`
pub fn polar_angle(v: Vec2) -> f32 {
    (-v.y).atan2(-v.x) + PI
}

/// Rotate `point` around `center` by `angle` radians (counter-clockwise)
pub fn rotate_around(point: Vec2, center: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(point - center) + center
}

/// Solve the bend circle for a plane of `width` and the given apex height.
///
/// Returns `None` when there is nothing to bend: non-finite apex, collinear
/// points, or a radius too large to represent.
pub fn solve_curve(width: f32, apex: f32) -> Option<CurveCircle> {
    if !apex.is_finite() || !width.is_finite() {
        return None;
    }

    let half_width = width * 0.5;
    let a = Vec2::new(-half_width, 0.0);
    let b = Vec2::new(0.0, apex);
    let c = Vec2::new(half_width, 0.0);

    let ab = a - b;
    let bc = b - c;
    let ac = a - c;

    let cross = ab.perp_dot(ac);
    if cross == 0.0 {
        return None;
    }

    let radius = (ab.length() * bc.length() * ac.length()) / (2.0 * cross.abs());
    if !radius.is_finite() {
        return None;
    }

    let center = Vec2::new(0.0, apex - radius);
    let base_angle = polar_angle(a - center) - FRAC_PI_2;

    Some(CurveCircle {
        center,
        radius,
        arc: base_angle * 2.0,
    })
}

/// Bend `geometry` in place. Degenerate inputs leave it untouched.
pub fn plane_curve(geometry: &mut PlaneGeometry, apex: f32) {
    let Some(circle) = solve_curve(geometry.width, apex) else {
        log::trace!("[curve::plane_curve] Skipping degenerate apex {}", apex);
        return;
    };

    let right_edge = Vec2::new(geometry.width * 0.5, 0.0);
    for (position, uv) in geometry.positions.iter_mut().zip(geometry.uvs.iter()) {
        let uv_ratio = 1.0 - uv[0];
        let bent = rotate_around(right_edge, circle.center, circle.arc * uv_ratio);
        *position = [bent.x, position[1], -bent.y];
    }

    geometry.positions_dirty = true;
}
