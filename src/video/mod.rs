//! Video sources behind the panels
//!
//! The carousel only ever asks a video whether it is paused and tells it to
//! play or pause. Decoding happens elsewhere: in the browser for
//! `HtmlVideoElement`s, or nowhere at all for the simulated native source.

mod test_card;

pub use test_card::test_card;

use crate::carousel::{PlaybackCommand, PlaybackState};
use crate::error::{CarouselError, CarouselResult};

/// Something a panel can play and pause
pub trait VideoSource {
    fn url(&self) -> &str;

    fn is_paused(&self) -> bool;

    /// Ask playback to start. Environments that start asynchronously report
    /// failures through their own logging and return `Ok` here.
    fn play(&mut self) -> CarouselResult<()>;

    fn pause(&mut self);

    fn playback_state(&self) -> PlaybackState {
        PlaybackState::from_paused(self.is_paused())
    }
}

/// Issue a playback command, logging and dropping start failures
pub fn apply_playback_command<V: VideoSource + ?Sized>(video: &mut V, command: PlaybackCommand) {
    match command {
        PlaybackCommand::Play => {
            if let Err(e) = video.play() {
                log::warn!("[video::apply_playback_command] Error playing video: {}", e);
            } else {
                log::debug!("[video::apply_playback_command] Playing {}", video.url());
            }
        }
        PlaybackCommand::Pause => {
            video.pause();
            log::debug!("[video::apply_playback_command] Paused {}", video.url());
        }
    }
}

/// Handle the "can play through" signal: try to start, never fail
pub fn on_video_ready<V: VideoSource + ?Sized>(video: &mut V) {
    log::info!("[video::on_video_ready] {} buffered, starting playback", video.url());
    if let Err(e) = video.play() {
        log::error!("[video::on_video_ready] Error playing video: {}", e);
    }
}

/// Playback state without a decoder, for the native runner and tests
#[derive(Debug, Clone)]
pub struct SimulatedVideo {
    url: String,
    paused: bool,
    autoplay_blocked: bool,
    frames_played: u64,
}

impl SimulatedVideo {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            paused: true,
            autoplay_blocked: false,
            frames_played: 0,
        }
    }

    /// Make every `play` call fail, as a browser blocking autoplay would
    pub fn with_autoplay_blocked(mut self, blocked: bool) -> Self {
        self.autoplay_blocked = blocked;
        self
    }

    /// Advance one display frame; only moves while playing
    pub fn advance(&mut self) {
        if !self.paused {
            self.frames_played += 1;
        }
    }

    pub fn frames_played(&self) -> u64 {
        self.frames_played
    }
}

impl VideoSource for SimulatedVideo {
    fn url(&self) -> &str {
        &self.url
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn play(&mut self) -> CarouselResult<()> {
        if self.autoplay_blocked {
            return Err(CarouselError::Playback {
                url: self.url.clone(),
                reason: "playback blocked by the environment".to_string(),
            });
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_starts_paused() {
        let video = SimulatedVideo::new("a.mp4");
        assert!(video.is_paused());
        assert_eq!(video.playback_state(), PlaybackState::Paused);
    }

    #[test]
    fn test_commands_toggle_state() {
        let mut video = SimulatedVideo::new("a.mp4");
        apply_playback_command(&mut video, PlaybackCommand::Play);
        assert_eq!(video.playback_state(), PlaybackState::Playing);
        apply_playback_command(&mut video, PlaybackCommand::Pause);
        assert!(video.is_paused());
    }

    #[test]
    fn test_blocked_play_is_not_fatal() {
        let mut video = SimulatedVideo::new("a.mp4").with_autoplay_blocked(true);
        on_video_ready(&mut video);
        apply_playback_command(&mut video, PlaybackCommand::Play);
        assert!(video.is_paused());
    }

    #[test]
    fn test_advance_only_while_playing() {
        let mut video = SimulatedVideo::new("a.mp4");
        video.advance();
        assert_eq!(video.frames_played(), 0);
        on_video_ready(&mut video);
        video.advance();
        video.advance();
        assert_eq!(video.frames_played(), 2);
    }
}
