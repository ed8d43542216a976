/// Camera Module
///
/// Data-oriented camera: `CameraData` plus free functions.

pub mod data_camera;

pub use data_camera::{
    build_camera_uniform, build_projection_matrix, build_view_matrix, calculate_forward_vector,
    forward_array, fov_for_perspective, init_camera, init_camera_with, log_camera_context,
    update_aspect_ratio, CameraData, CameraUniform,
};
