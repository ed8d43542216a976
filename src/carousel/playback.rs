//! Visibility-driven play/pause
//!
//! Only panels near the centre of the view decode video. Each frame a panel is
//! classified in or out of view, and that is compared with the video's own
//! paused flag to decide whether a command is needed.

use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Paused,
    Playing,
}

impl PlaybackState {
    pub fn from_paused(paused: bool) -> Self {
        if paused {
            PlaybackState::Paused
        } else {
            PlaybackState::Playing
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    Play,
    Pause,
}

/// Strict cone test: the boundary itself is out of view
#[inline]
pub fn is_angle_in_view(angle: f32, threshold: f32) -> bool {
    angle < threshold
}

/// Angle between the camera forward vector and the direction to a panel
pub fn view_angle(panel_world_position: Vec3, camera_position: Vec3, camera_forward: Vec3) -> f32 {
    let to_panel = (panel_world_position - camera_position).normalize_or_zero();
    to_panel.angle_between(camera_forward)
}

pub fn is_in_view(
    panel_world_position: Vec3,
    camera_position: Vec3,
    camera_forward: Vec3,
    threshold: f32,
) -> bool {
    let angle = view_angle(panel_world_position, camera_position, camera_forward);
    // NaN (panel at the camera) compares false: out of view
    is_angle_in_view(angle, threshold)
}

/// Command needed to bring the video in line with its visibility, if any
pub fn playback_command(in_view: bool, state: PlaybackState) -> Option<PlaybackCommand> {
    match (in_view, state) {
        (true, PlaybackState::Paused) => Some(PlaybackCommand::Play),
        (false, PlaybackState::Playing) => Some(PlaybackCommand::Pause),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const THRESHOLD: f32 = PI / 8.0;

    #[test]
    fn test_angle_threshold_is_exclusive() {
        assert!(is_angle_in_view(0.0, THRESHOLD));
        assert!(is_angle_in_view(THRESHOLD - 1e-4, THRESHOLD));
        assert!(!is_angle_in_view(THRESHOLD, THRESHOLD));
        assert!(!is_angle_in_view(PI / 4.0, THRESHOLD));
    }

    #[test]
    fn test_straight_ahead_is_in_view() {
        let panel = Vec3::new(0.0, 0.0, -1200.0);
        assert!(is_in_view(panel, Vec3::ZERO, Vec3::NEG_Z, THRESHOLD));
        assert!(view_angle(panel, Vec3::ZERO, Vec3::NEG_Z).abs() < 1e-6);
    }

    #[test]
    fn test_off_axis_panels() {
        let at = |angle: f32| Vec3::new(1200.0 * angle.sin(), 0.0, -1200.0 * angle.cos());
        assert!(is_in_view(at(PI / 10.0), Vec3::ZERO, Vec3::NEG_Z, THRESHOLD));
        assert!(!is_in_view(at(PI / 6.0), Vec3::ZERO, Vec3::NEG_Z, THRESHOLD));
        // Adjacent panel on a five-panel ring is 72° away
        assert!(!is_in_view(at(0.4 * PI), Vec3::ZERO, Vec3::NEG_Z, THRESHOLD));
        assert!(!is_in_view(Vec3::ZERO, Vec3::ZERO, Vec3::NEG_Z, THRESHOLD));
    }

    #[test]
    fn test_playback_transitions() {
        use PlaybackCommand::*;
        use PlaybackState::*;
        assert_eq!(playback_command(true, Paused), Some(Play));
        assert_eq!(playback_command(true, Playing), None);
        assert_eq!(playback_command(false, Playing), Some(Pause));
        assert_eq!(playback_command(false, Paused), None);
    }

    #[test]
    fn test_state_from_paused_flag() {
        assert_eq!(PlaybackState::from_paused(true), PlaybackState::Paused);
        assert_eq!(PlaybackState::from_paused(false), PlaybackState::Playing);
    }
}
