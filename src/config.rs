//! Carousel configuration
//!
//! Loaded from TOML or JSON. Every field has a default taken from
//! [`crate::constants`], so a config file only needs to name what it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{camera, layout, panel, scroll};
use crate::error::{config_error, CarouselError, CarouselResult};

/// One carousel entry: the video to stream and its caption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoEntry {
    pub url: String,
    pub heading: String,
}

impl VideoEntry {
    pub fn new(url: impl Into<String>, heading: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            heading: heading.into(),
        }
    }
}

/// Main carousel configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub videos: Vec<VideoEntry>,
    pub circle_radius: f32,
    pub base_curvature: f32,
    pub initial_curvature: f32,
    pub ease: f32,
    pub rotation_speed_factor: f32,
    pub group_yaw_offset: f32,
    pub view_threshold: f32,
    pub perspective: f32,
    pub znear: f32,
    pub zfar: f32,
    pub plane_segments: u32,
    /// Content height of the native virtual page. The browser measures its
    /// own from the `.scrollable` layer.
    pub page_height: f32,
    /// Height the scrollable layer is stretched to so the document never
    /// runs out of scroll before the wrap
    pub scrollable_height: f32,
    /// Run the coarse sine deformation in the vertex shader on top of the
    /// CPU curvature.
    pub vertex_wave: bool,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            window_title: "Scroll Carousel".to_string(),
            window_width: 1920,
            window_height: 1080,
            videos: (1..=5)
                .map(|i| VideoEntry::new(format!("./video/{i}.mp4"), format!("Heading {i}")))
                .collect(),
            circle_radius: layout::CIRCLE_RADIUS,
            base_curvature: panel::BASE_CURVATURE,
            initial_curvature: panel::INITIAL_CURVATURE,
            ease: scroll::EASE,
            rotation_speed_factor: layout::ROTATION_SPEED_FACTOR,
            group_yaw_offset: layout::GROUP_YAW_OFFSET,
            view_threshold: panel::VIEW_THRESHOLD,
            perspective: camera::PERSPECTIVE,
            znear: camera::ZNEAR,
            zfar: camera::ZFAR,
            plane_segments: panel::SEGMENTS,
            page_height: scroll::PAGE_HEIGHT,
            scrollable_height: scroll::SCROLLABLE_HEIGHT,
            vertex_wave: true,
        }
    }
}

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Some(ConfigFormat::Json),
            Some("toml") => Some(ConfigFormat::Toml),
            _ => None,
        }
    }
}

impl CarouselConfig {
    /// Parse a config from text in the given format
    pub fn from_str_with_format(text: &str, format: ConfigFormat) -> Result<Self, String> {
        match format {
            ConfigFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
            ConfigFormat::Toml => toml::from_str(text).map_err(|e| e.to_string()),
        }
    }

    /// Check the values the carousel math cannot work with
    pub fn validate(&self) -> CarouselResult<()> {
        if self.videos.is_empty() {
            return Err(config_error("videos must not be empty"));
        }
        if !(self.circle_radius > 0.0) {
            return Err(config_error(format!(
                "circle_radius must be positive, got {}",
                self.circle_radius
            )));
        }
        if !(self.ease > 0.0 && self.ease <= 1.0) {
            return Err(config_error(format!("ease must be in (0, 1], got {}", self.ease)));
        }
        if self.plane_segments == 0 {
            return Err(config_error("plane_segments must be at least 1"));
        }
        if !(self.znear > 0.0 && self.zfar > self.znear) {
            return Err(config_error(format!(
                "clip planes must satisfy 0 < znear < zfar, got {} / {}",
                self.znear, self.zfar
            )));
        }
        if !(self.perspective > 0.0) {
            return Err(config_error("perspective must be positive"));
        }
        if !(self.page_height > 0.0 && self.scrollable_height >= self.page_height) {
            return Err(config_error(format!(
                "page heights must satisfy 0 < page_height <= scrollable_height, got {} / {}",
                self.page_height, self.scrollable_height
            )));
        }
        Ok(())
    }
}

/// Load and validate a configuration file
pub fn load_config(path: impl AsRef<Path>) -> CarouselResult<CarouselConfig> {
    let path = path.as_ref();

    let format = ConfigFormat::from_path(path).ok_or_else(|| CarouselError::ConfigParse {
        path: path.to_path_buf(),
        error: "unknown config format, expected .toml or .json".to_string(),
    })?;

    let text = std::fs::read_to_string(path).map_err(|source| CarouselError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config = CarouselConfig::from_str_with_format(&text, format).map_err(|error| {
        CarouselError::ConfigParse {
            path: path.to_path_buf(),
            error,
        }
    })?;

    config.validate()?;
    log::info!(
        "[config::load_config] Loaded {:?} with {} videos",
        path,
        config.videos.len()
    );
    Ok(config)
}
