// End-to-end carousel scenarios
//
// Five panels in a 1920x1080 viewport, driven from scroll progress or from a
// page, with no GPU involved.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use scroll_carousel::camera::{forward_array, init_camera};
use scroll_carousel::native::VirtualPage;
use scroll_carousel::{
    CarouselConfig, CarouselState, PageEnvironment, RenderLoop, ScrollState, SimulatedVideo,
    VideoSource, Viewport,
};

fn config() -> CarouselConfig {
    CarouselConfig {
        plane_segments: 8,
        ..CarouselConfig::default()
    }
}

fn viewport() -> Viewport {
    Viewport::new(1920.0, 1080.0)
}

fn camera_vectors() -> (Vec3, Vec3) {
    let camera = init_camera(viewport());
    (Vec3::from(camera.position), Vec3::from(forward_array(&camera)))
}

/// Smallest forward step from `from` to `to`, in `[0, 2π)`
fn forward_delta(from: f32, to: f32) -> f32 {
    (to - from).rem_euclid(TAU)
}

/// Shortest signed step from `from` to `to`, in `(-π, π]`
fn signed_delta(from: f32, to: f32) -> f32 {
    let delta = forward_delta(from, to);
    if delta > PI {
        delta - TAU
    } else {
        delta
    }
}

#[test]
fn test_full_scroll_turns_two_and_a_half_revolutions() {
    let config = config();
    let mut carousel = CarouselState::new(&config, viewport());
    let (position, forward) = camera_vectors();
    let still = ScrollState::default();

    let mut previous = carousel.advance(still, 0.0, position, forward).rotation_angle;
    let mut accumulated = 0.0;
    for step in 1..=10 {
        let progress = step as f32 / 10.0;
        let update = carousel.advance(still, progress, position, forward);
        assert!((0.0..TAU).contains(&update.rotation_angle));

        let delta = forward_delta(previous, update.rotation_angle);
        assert!((delta - TAU / 4.0).abs() < 1e-3, "step {step}: delta {delta}");
        accumulated += delta;
        previous = update.rotation_angle;
    }

    let revolutions = accumulated / TAU;
    let expected = config.videos.len() as f32 * config.rotation_speed_factor;
    assert!((revolutions - expected).abs() < 1e-3, "{revolutions} revolutions");
    assert!((revolutions - 2.5).abs() < 1e-3);
}

#[test]
fn test_forward_panel_cycles_in_order() {
    let config = config();
    let mut carousel = CarouselState::new(&config, viewport());
    let (position, forward) = camera_vectors();
    let count = carousel.panel_count();

    // Ten coarse steps are a quarter turn each and alias against the 72°
    // spacing, so sweep finely to see every hand-over.
    let mut sequence = Vec::new();
    for sample in 0..=500 {
        let progress = sample as f32 / 500.0;
        carousel.advance(ScrollState::default(), progress, position, forward);
        let index = carousel
            .forward_panel(position, forward)
            .expect("five panels always have a forward one");
        if sequence.last() != Some(&index) {
            sequence.push(index);
        }
    }

    for pair in sequence.windows(2) {
        assert_eq!(pair[1], (pair[0] + 1) % count, "sequence {sequence:?}");
    }
    for index in 0..count {
        assert!(sequence.contains(&index), "panel {index} never came forward");
    }
    // 2.5 revolutions pass 12 or 13 slot boundaries
    assert!(sequence.len() >= 12, "sequence {sequence:?}");
}

#[test]
fn test_panels_stay_bent_and_finite_while_scrolling() {
    let config = config();
    let mut carousel = CarouselState::new(&config, viewport());
    let (position, forward) = camera_vectors();

    let scroll = ScrollState {
        target: 1200.0,
        current: 900.0,
    };
    let update = carousel.advance(scroll, 0.3, position, forward);
    for frame in &update.panels {
        assert!(frame.apex.is_finite());
        assert!(frame.apex < config.base_curvature, "fast scroll flattens the bend");
        assert!(frame.offset.x < 0.0);
        assert_eq!(frame.offset.y, 0.0);
    }
    for panel in &carousel.panels {
        assert!(panel
            .geometry
            .positions
            .iter()
            .all(|p| p.iter().all(|c| c.is_finite())));
    }
}

struct ScriptedPage {
    scroll_y: f32,
    height: f32,
    scrollable_height: f32,
    viewport: Viewport,
}

impl PageEnvironment for ScriptedPage {
    fn scroll_y(&self) -> f32 {
        self.scroll_y
    }
    fn scroll_to(&mut self, y: f32) {
        self.scroll_y = y;
    }
    fn page_height(&self) -> f32 {
        self.height
    }
    fn viewport(&self) -> Viewport {
        self.viewport
    }
    fn set_scrollable_height(&mut self, height: f32) {
        self.scrollable_height = height;
    }
}

#[test]
fn test_scrolling_page_plays_one_video_at_a_time() {
    let config = config();
    let mut videos: Vec<SimulatedVideo> = config
        .videos
        .iter()
        .map(|entry| SimulatedVideo::new(&entry.url))
        .collect();
    let mut render_loop = RenderLoop::new(config, viewport());
    let mut page = ScriptedPage {
        scroll_y: 0.0,
        height: 10_000.0,
        scrollable_height: 0.0,
        viewport: viewport(),
    };
    render_loop.prepare_page(&mut page);
    assert!(page.scrollable_height > page.height);

    let scrollable = page.total_scrollable();
    let mut ever_played = vec![false; videos.len()];
    for frame in 0..990 {
        page.scroll_y = scrollable * frame as f32 / 1000.0;
        let update = render_loop.frame(&mut page, &mut videos);

        let in_view = update.panels.iter().filter(|p| p.in_view).count();
        assert!(in_view <= 1, "frame {frame}: {in_view} panels in view");

        let playing: Vec<usize> = videos
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_paused())
            .map(|(i, _)| i)
            .collect();
        assert!(playing.len() <= 1, "frame {frame}: playing {playing:?}");
        for index in playing {
            ever_played[index] = true;
        }
    }

    println!("Videos played during the sweep: {:?}", ever_played);
    assert!(ever_played.iter().all(|&played| played));
}

#[test]
fn test_default_page_scrolled_in_ten_steps() {
    let config = config();
    let mut videos: Vec<SimulatedVideo> = config
        .videos
        .iter()
        .map(|entry| SimulatedVideo::new(&entry.url))
        .collect();
    let mut page = VirtualPage::new(viewport(), config.page_height);
    let mut render_loop = RenderLoop::new(config, viewport());
    render_loop.prepare_page(&mut page);
    let (position, forward) = camera_vectors();

    let range = page.total_scrollable();
    assert!((range - (12_000.0 - 1080.0)).abs() < 1e-3, "range {range}");

    let mut previous = render_loop.frame(&mut page, &mut videos).rotation_angle;
    let mut forward_panels = vec![render_loop.carousel().forward_panel(position, forward)];
    let mut turned = 0.0;
    for step in 1..10 {
        page.scroll_to(range * step as f32 / 10.0);
        for _ in 0..300 {
            let angle = render_loop.frame(&mut page, &mut videos).rotation_angle;
            turned += signed_delta(previous, angle);
            previous = angle;
        }
        forward_panels.push(render_loop.carousel().forward_panel(position, forward));
    }

    // Nine tenths of the way: 2.25 of the 2.5 revolutions
    let expected = 0.9 * 2.5 * TAU;
    assert!((turned - expected).abs() < 1e-2, "turned {turned}, expected {expected}");

    // A quarter turn is more than half the 72° spacing, so every step hands over
    for pair in forward_panels.windows(2) {
        assert_ne!(pair[0], pair[1], "forward panels {forward_panels:?}");
    }

    // The tenth step reaches the end of the content and wraps back to the top
    page.scroll_to(range);
    let update = render_loop.frame(&mut page, &mut videos);
    assert_eq!(page.scroll_y(), 1.0);
    assert_eq!(update.scroll.target, 1.0);
}
