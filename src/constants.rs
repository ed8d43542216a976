// Carousel constants - single source of truth
//
// Everything tunable about the carousel lives here. The build script includes
// this file to emit the WGSL constants, so CPU and GPU agree on shared values.
//
// Keep this file free of crate paths: it is compiled standalone by build.rs.

/// Scroll smoothing
pub mod scroll {
    /// Per-frame lerp factor pulling `current` toward `target`
    pub const EASE: f32 = 0.075;

    /// Height of the artificial scrollable layer in CSS pixels
    pub const SCROLLABLE_HEIGHT: f32 = 100_000_000.0;

    /// Content height of the native virtual page; progress and the wrap are
    /// measured against it, never against the enlarged layer
    pub const PAGE_HEIGHT: f32 = 12_000.0;

    /// Position the page jumps back to once the end is reached
    pub const WRAP_POSITION: f32 = 1.0;
}

/// Carousel layout
pub mod layout {
    /// Distance from the group origin to each panel
    pub const CIRCLE_RADIUS: f32 = 1200.0;

    /// Revolutions per panel over the full scroll range
    pub const ROTATION_SPEED_FACTOR: f32 = 0.5;

    /// Fixed yaw added to the group after the scroll rotation (radians)
    pub const GROUP_YAW_OFFSET: f32 = -60.0;
}

/// Panel geometry and deformation
pub mod panel {
    /// Video aspect ratio
    pub const ASPECT_RATIO: f32 = 16.0 / 9.0;

    /// Panel width as a fraction of viewport width: 1.35 * 0.35
    pub const WIDTH_SCALE: f32 = 1.35 * 0.35;

    /// Grid subdivisions along each axis
    pub const SEGMENTS: u32 = 100;

    /// Apex height applied once when the plane is built
    pub const INITIAL_CURVATURE: f32 = 100.0;

    /// Resting apex height every frame
    pub const BASE_CURVATURE: f32 = 200.0;

    /// Scale from scroll velocity (target - current) to deformation
    pub const DEFORMATION_SCALE: f32 = 0.5;

    /// Half-angle of the cone in which a panel counts as in view
    pub const VIEW_THRESHOLD: f32 = std::f32::consts::PI / 8.0;

    /// Initial value of the alpha uniform
    pub const DEFAULT_ALPHA: f32 = 1.0;
}

/// Camera
pub mod camera {
    /// CSS-style perspective distance used to derive the field of view
    pub const PERSPECTIVE: f32 = 1200.0;

    /// Scale applied to the perspective angle (in place of 180 for degrees)
    pub const FOV_SCALE: f32 = 125.0;

    pub const ZNEAR: f32 = 1.0;
    pub const ZFAR: f32 = 8000.0;
}

/// Values mirrored into WGSL
pub mod shader {
    /// Divisor turning the offset uniform into a UV shift for the red channel
    pub const RGB_SHIFT_DIVISOR: f32 = 500.0;

    pub const PI: f32 = std::f32::consts::PI;
}
