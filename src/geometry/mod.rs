/// Panel geometry: flat subdivided planes and the arc bend applied to them.

pub mod curve;
pub mod plane;

pub use curve::{plane_curve, polar_angle, rotate_around, solve_curve, CurveCircle};
pub use plane::PlaneGeometry;
