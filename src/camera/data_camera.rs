/// Data-Oriented Camera
///
/// Plain camera data plus free functions. The carousel camera never moves: it
/// sits at the centre of the ring looking down -Z, and only its aspect ratio
/// changes on resize.

use bytemuck::{Pod, Zeroable};
use cgmath::{perspective, Matrix4, Point3, Rad, Vector3};

use crate::constants::camera::{FOV_SCALE, PERSPECTIVE, ZFAR, ZNEAR};
use crate::scroll::Viewport;

/// cgmath builds OpenGL clip space (z in -1..1); wgpu wants z in 0..1
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Camera data as a plain old data structure
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CameraData {
    pub position: [f32; 3],
    pub yaw_radians: f32,
    pub pitch_radians: f32,
    pub aspect_ratio: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
    _padding: [f32; 3],
}

/// Camera uniform buffer for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_projection_matrix: [[f32; 4]; 4],
    pub position: [f32; 3],
    _padding: f32,
}

/// Vertical field of view for a CSS-style perspective distance.
///
/// The angle subtended by the viewport at `perspective`, scaled by 125/π into
/// degrees the way the carousel was tuned.
pub fn fov_for_perspective(viewport_height: f32, perspective: f32) -> f32 {
    let degrees = (FOV_SCALE * (2.0 * (viewport_height / 2.0 / perspective).atan()))
        / std::f32::consts::PI;
    degrees.to_radians()
}

/// Initialize camera data at the ring centre
pub fn init_camera(viewport: Viewport) -> CameraData {
    init_camera_with(viewport, PERSPECTIVE, ZNEAR, ZFAR)
}

/// Initialize camera data with explicit projection parameters
pub fn init_camera_with(viewport: Viewport, perspective: f32, znear: f32, zfar: f32) -> CameraData {
    CameraData {
        position: [0.0, 0.0, 0.0],
        yaw_radians: -std::f32::consts::FRAC_PI_2, // looking down -Z
        pitch_radians: 0.0,
        aspect_ratio: viewport.aspect_ratio(),
        fovy_radians: fov_for_perspective(viewport.height, perspective),
        znear,
        zfar,
        _padding: [0.0; 3],
    }
}

/// Update camera aspect ratio for window resize. The field of view stays as
/// computed at startup.
pub fn update_aspect_ratio(camera: &CameraData, viewport: Viewport) -> CameraData {
    let mut updated = *camera;
    updated.aspect_ratio = viewport.aspect_ratio();
    updated
}

/// Calculate forward vector from camera orientation
pub fn calculate_forward_vector(yaw_rad: f32, pitch_rad: f32) -> Vector3<f32> {
    let (sin_yaw, cos_yaw) = yaw_rad.sin_cos();
    let (sin_pitch, cos_pitch) = pitch_rad.sin_cos();

    Vector3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw)
}

/// Forward vector as a plain array, for callers working in glam
pub fn forward_array(camera: &CameraData) -> [f32; 3] {
    calculate_forward_vector(camera.yaw_radians, camera.pitch_radians).into()
}

/// Build view matrix from camera data
pub fn build_view_matrix(camera: &CameraData) -> Matrix4<f32> {
    let position = Point3::new(camera.position[0], camera.position[1], camera.position[2]);
    let forward = calculate_forward_vector(camera.yaw_radians, camera.pitch_radians);

    Matrix4::look_at_rh(position, position + forward, Vector3::unit_y())
}

/// Build projection matrix from camera data, in wgpu clip space
pub fn build_projection_matrix(camera: &CameraData) -> Matrix4<f32> {
    OPENGL_TO_WGPU_MATRIX
        * perspective(
            Rad(camera.fovy_radians),
            camera.aspect_ratio,
            camera.znear,
            camera.zfar,
        )
}

/// Build camera uniform buffer for GPU
pub fn build_camera_uniform(camera: &CameraData) -> CameraUniform {
    let view_proj = build_projection_matrix(camera) * build_view_matrix(camera);

    CameraUniform {
        view_projection_matrix: view_proj.into(),
        position: camera.position,
        _padding: 0.0,
    }
}

/// Log camera state for debugging
pub fn log_camera_context(camera: &CameraData, context: &str) {
    log::debug!(
        "[CAMERA_CONTEXT] {} - Position: ({:.1}, {:.1}, {:.1}), Yaw: {:.1}°, \
         FOV: {:.2}°, Aspect: {:.3}",
        context,
        camera.position[0],
        camera.position[1],
        camera.position[2],
        camera.yaw_radians.to_degrees(),
        camera.fovy_radians.to_degrees(),
        camera.aspect_ratio
    );
}
